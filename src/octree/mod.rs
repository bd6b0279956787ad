//! Dynamic loose octree over the triangles of one mesh.
//!
//! Cells are stored in an arena indexed by [`CellId`]; the root cell is
//! created with the tree and never freed, everything below it comes and
//! goes with subdivision, rebuild and pruning. The [`Octree`] hosts every
//! operation:
//!
//! - [`build`](Octree::build) / [`build_subtree`](Octree::build_subtree):
//!   work-list subdivision + leaf finalization
//! - [`collect_ray_candidates`](Octree::collect_ray_candidates) /
//!   [`collect_sphere_candidates`](Octree::collect_sphere_candidates):
//!   read-only candidate collection
//! - [`insert_triangle`](Octree::insert_triangle) /
//!   [`remove_triangle`](Octree::remove_triangle) /
//!   [`prune_if_empty`](Octree::prune_if_empty): incremental maintenance
//!
//! No internal locking: queries take `&self` and may run concurrently with
//! each other under an external reader/writer discipline; mutations take
//! `&mut self`.

pub mod build;
pub mod cell;
pub mod config;
pub mod query;
pub mod update;

// Re-exports
pub use cell::{CellId, OctreeCell};
pub use config::OctreeConfig;

use smallvec::SmallVec;

use crate::aabb::Aabb3;
use crate::geometry::MeshGeometry;

/// Arena-backed triangle octree. See the module docs.
#[derive(Debug, Clone)]
pub struct Octree {
  cells: Vec<OctreeCell>,
  free: Vec<CellId>,
  root: CellId,
  config: OctreeConfig,
}

impl Octree {
  /// Create an empty tree whose root routes over `split` with the default
  /// termination caps.
  pub fn new(split: Aabb3) -> Self {
    Self::with_config(split, OctreeConfig::default())
  }

  /// Create an empty tree with explicit termination caps.
  pub fn with_config(split: Aabb3, config: OctreeConfig) -> Self {
    Self {
      cells: vec![OctreeCell::new(None, 0, split)],
      free: Vec::new(),
      root: CellId(0),
      config,
    }
  }

  /// The root cell's id.
  #[inline]
  pub fn root(&self) -> CellId {
    self.root
  }

  #[inline]
  pub fn config(&self) -> &OctreeConfig {
    &self.config
  }

  /// Borrow a cell. The id must be live (root, or obtained from this tree
  /// and not freed since).
  #[inline]
  pub fn cell(&self, id: CellId) -> &OctreeCell {
    &self.cells[id.idx()]
  }

  #[inline]
  pub(crate) fn cell_mut(&mut self, id: CellId) -> &mut OctreeCell {
    &mut self.cells[id.idx()]
  }

  /// Ids of every leaf reachable from the root, in traversal order.
  pub fn leaf_ids(&self) -> Vec<CellId> {
    let mut out = Vec::new();
    let mut stack: SmallVec<[CellId; 16]> = SmallVec::new();
    stack.push(self.root);
    while let Some(id) = stack.pop() {
      match self.cells[id.idx()].children {
        Some(kids) => stack.extend_from_slice(&kids),
        None => out.push(id),
      }
    }
    out
  }

  /// Total triangles stored across all leaves.
  pub fn triangle_count(&self) -> usize {
    self
      .leaf_ids()
      .iter()
      .map(|&id| self.cells[id.idx()].tris.len())
      .sum()
  }

  pub(crate) fn alloc_cell(&mut self, parent: CellId, depth: u32, split: Aabb3) -> CellId {
    match self.free.pop() {
      Some(id) => {
        self.cells[id.idx()] = OctreeCell::new(Some(parent), depth, split);
        id
      }
      None => {
        let id = CellId(self.cells.len() as u32);
        self.cells.push(OctreeCell::new(Some(parent), depth, split));
        id
      }
    }
  }

  /// Return one cell to the free list. The caller guarantees nothing still
  /// references it.
  pub(crate) fn free_cell(&mut self, id: CellId) {
    let cell = &mut self.cells[id.idx()];
    cell.children = None;
    cell.tris.clear();
    cell.loose = Aabb3::EMPTY;
    self.free.push(id);
  }

  /// Free every cell strictly below `id`, leaving `id` itself a leaf.
  pub(crate) fn free_descendants(&mut self, id: CellId) {
    let mut stack: SmallVec<[CellId; 16]> = SmallVec::new();
    if let Some(kids) = self.cells[id.idx()].children.take() {
      stack.extend_from_slice(&kids);
    }
    while let Some(cur) = stack.pop() {
      if let Some(kids) = self.cells[cur.idx()].children.take() {
        stack.extend_from_slice(&kids);
      }
      self.free_cell(cur);
    }
  }

  /// Walk the whole tree asserting the structural invariants. Test and
  /// debugging aid; panics on the first violation.
  ///
  /// Checked: 0-or-8 children, depth bookkeeping and cap, internal cells
  /// hold no triangles, parent back-links, loose bounds contain every
  /// descendant triangle box, each indexed triangle appears in exactly one
  /// leaf and its reverse maps point at its actual slot.
  pub fn check_invariants(&self, geo: &MeshGeometry) {
    let mut seen = vec![false; geo.triangle_count()];
    let mut stack: SmallVec<[CellId; 16]> = SmallVec::new();
    stack.push(self.root);
    while let Some(id) = stack.pop() {
      let cell = &self.cells[id.idx()];
      assert!(
        cell.depth <= self.config.max_depth,
        "cell exceeds depth cap: {} > {}",
        cell.depth,
        self.config.max_depth
      );
      match cell.children {
        Some(kids) => {
          assert!(
            cell.tris.is_empty(),
            "internal cell holds {} triangles",
            cell.tris.len()
          );
          for k in kids {
            let child = &self.cells[k.idx()];
            assert_eq!(child.parent, Some(id), "child parent link broken");
            assert_eq!(child.depth, cell.depth + 1, "child depth broken");
            stack.push(k);
          }
        }
        None => {
          for (pos, &tri) in cell.tris.iter().enumerate() {
            assert!(
              !std::mem::replace(&mut seen[tri as usize], true),
              "triangle {} stored in more than one leaf",
              tri
            );
            assert_eq!(geo.tri_leaf(tri), Some(id), "tri_leaf map stale for {}", tri);
            assert_eq!(
              geo.tri_pos_in_leaf(tri) as usize,
              pos,
              "tri_pos map stale for {}",
              tri
            );
            // Every ancestor's loose bound must contain the triangle box.
            let tri_box = geo.tri_box(tri);
            let mut cur = Some(id);
            while let Some(c) = cur {
              let ancestor = &self.cells[c.idx()];
              assert!(
                ancestor.loose.contains_box(&tri_box),
                "loose bound at depth {} does not contain triangle {}",
                ancestor.depth,
                tri
              );
              cur = ancestor.parent;
            }
          }
        }
      }
    }
    for (tri, reached) in seen.iter().enumerate() {
      if geo.tri_leaf(tri as u32).is_some() {
        assert!(*reached, "triangle {} indexed but not reachable", tri);
      }
    }
  }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;
