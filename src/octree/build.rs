//! Recursive build: work-list subdivision plus leaf finalization.
//!
//! The traversal uses an explicit stack instead of language recursion so
//! stack usage stays bounded for meshes with many triangles; the depth cap
//! alone still allows a large fan-out of pending cells.

use smallvec::SmallVec;

use super::cell::{self, CellId};
use super::Octree;
use crate::geometry::MeshGeometry;

impl Octree {
  /// Rebuild the whole tree over `tris`.
  ///
  /// Equivalent to [`build_subtree`](Self::build_subtree) at the root. The
  /// root's split bound is kept; callers changing the region construct a
  /// fresh tree instead.
  #[cfg_attr(
    feature = "tracing",
    tracing::instrument(skip_all, name = "octree::build", fields(tris = tris.len()))
  )]
  pub fn build(&mut self, geo: &mut MeshGeometry, tris: Vec<u32>) {
    self.build_subtree(self.root(), geo, tris);
  }

  /// Rebuild the subtree rooted at `cell` over exactly `tris`.
  ///
  /// Existing descendants are recycled and the cell's loose bound resets to
  /// its split bound before leaf expansion - the one place a loose bound is
  /// allowed to shrink. Afterwards the leaves below `cell` partition `tris`
  /// and every id's reverse maps point at its final (leaf, position).
  ///
  /// A cell ends up subdivided when it holds more than
  /// `max_triangles_per_leaf` and sits above `max_depth`; the depth cap
  /// wins, so a max-depth cell keeps any triangle count. Subdivided-away
  /// cells that received no triangles stay as transient never-finalized
  /// leaves with inverted loose bounds.
  pub fn build_subtree(&mut self, cell: CellId, geo: &mut MeshGeometry, tris: Vec<u32>) {
    // Leaf lists below die with the rebuild; unindex their members so no
    // stale reverse-map entry can outlive it.
    let mut walk: SmallVec<[CellId; 16]> = SmallVec::new();
    walk.push(cell);
    while let Some(id) = walk.pop() {
      match self.cell(id).children {
        Some(kids) => walk.extend_from_slice(&kids),
        None => {
          for pos in 0..self.cell(id).tris.len() {
            let tri = self.cell(id).tris[pos];
            geo.clear_leaf(tri);
          }
        }
      }
    }

    self.free_descendants(cell);
    {
      let c = self.cell_mut(cell);
      c.loose = c.split;
      c.tris = tris;
    }

    let mut stack: Vec<CellId> = vec![cell];
    let mut leaves: Vec<CellId> = Vec::new();
    {
      #[cfg(feature = "tracing")]
      let _span = tracing::info_span!("route_triangles").entered();
      while let Some(id) = stack.pop() {
        let (count, depth) = {
          let c = self.cell(id);
          (c.tris.len(), c.depth)
        };
        if count > self.config().max_triangles_per_leaf && depth < self.config().max_depth {
          let kids = self.subdivide(id, geo);
          stack.extend_from_slice(&kids);
        } else if count > 0 {
          leaves.push(id);
        }
      }
    }

    {
      #[cfg(feature = "tracing")]
      let _span = tracing::info_span!("finalize_leaves").entered();
      for leaf in &leaves {
        self.finalize_leaf(*leaf, geo);
      }
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(leaves = leaves.len(), "subtree built");
  }

  /// Split one overfull cell into 8 children, routing its triangles by
  /// centroid. The cell becomes internal and gives up its triangle list.
  fn subdivide(&mut self, id: CellId, geo: &MeshGeometry) -> [CellId; 8] {
    let (split, depth) = {
      let c = self.cell(id);
      (c.split, c.depth)
    };
    let tris = std::mem::take(&mut self.cell_mut(id).tris);

    let center = split.center();
    let mut buckets: [Vec<u32>; 8] = Default::default();
    for tri in tris {
      buckets[cell::octant_for(center, geo.tri_center(tri))].push(tri);
    }

    let boxes = cell::child_split_boxes(&split);
    let mut kids: SmallVec<[CellId; 8]> = SmallVec::new();
    for (octant, bucket) in buckets.into_iter().enumerate() {
      let child = self.alloc_cell(id, depth + 1, boxes[octant]);
      self.cell_mut(child).tris = bucket;
      kids.push(child);
    }

    let mut out = [id; 8];
    out.copy_from_slice(&kids);
    self.cell_mut(id).children = Some(out);
    out
  }

  /// Register a finished leaf: write every member's (leaf, position) into
  /// the reverse maps and push `split ∪ member boxes` up the ancestor
  /// chain, so the finalized leaf's loose bound is at least its split
  /// bound.
  fn finalize_leaf(&mut self, leaf: CellId, geo: &mut MeshGeometry) {
    let cell = &self.cells[leaf.idx()];
    let mut bounds = cell.split;
    for (pos, &tri) in cell.tris.iter().enumerate() {
      geo.assign_leaf(tri, leaf, pos as u32);
      bounds.expand_to_contain(&geo.tri_box(tri));
    }
    self.expand_loose_upward(leaf, bounds);
  }
}

#[cfg(test)]
#[path = "build_test.rs"]
mod build_test;
