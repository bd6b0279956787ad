//! Incremental maintenance: insertion, removal, upward loose-bound
//! expansion and emptiness pruning.
//!
//! None of these reorganize the tree beyond collapsing all-empty sibling
//! groups; only a rebuild re-enforces the triangle-count cap.

use glam::Vec3;

use super::cell::{self, CellId};
use super::Octree;
use crate::aabb::Aabb3;
use crate::geometry::MeshGeometry;

impl Octree {
  /// Route one triangle (box and centroid read from `geo`) to the unique
  /// leaf whose split bound accepts its centroid, append it there and
  /// expand loose bounds from that leaf upward.
  ///
  /// Returns the receiving leaf, or `None` when the centroid falls outside
  /// this tree's root region - the tree never auto-grows; the caller
  /// decides what an out-of-range triangle means. The triangle must not
  /// already be indexed (remove first when relocating).
  ///
  /// The receiving leaf is never re-subdivided here, even past the
  /// triangle-count cap: insertion trades selectivity for O(depth) cost
  /// and structural stability.
  pub fn insert_triangle(&mut self, geo: &mut MeshGeometry, id: u32) -> Option<CellId> {
    debug_assert!(geo.tri_leaf(id).is_none(), "inserting an indexed triangle");
    let center = geo.tri_center(id);
    let leaf = self.route_insert(self.root(), center)?;
    let pos = {
      let cell = self.cell_mut(leaf);
      cell.tris.push(id);
      (cell.tris.len() - 1) as u32
    };
    geo.assign_leaf(id, leaf, pos);
    self.expand_loose_upward(leaf, geo.tri_box(id));
    Some(leaf)
  }

  /// Descend to the accepting leaf. Internal cells delegate to children in
  /// fixed order 0-7 until one accepts; the historical child-box formulas
  /// can leave ULP-wide gaps between siblings for non-dyadic regions, in
  /// which case no child accepts and the insertion reports non-acceptance.
  fn route_insert(&mut self, id: CellId, center: Vec3) -> Option<CellId> {
    if !cell::accepts_centroid(&self.cell(id).split, center) {
      return None;
    }
    match self.cell(id).children {
      Some(kids) => {
        for k in kids {
          if let Some(leaf) = self.route_insert(k, center) {
            return Some(leaf);
          }
        }
        None
      }
      None => Some(id),
    }
  }

  /// Remove one triangle from its leaf via the reverse maps: swap-remove
  /// from the list, patch the moved id's position entry, clear the removed
  /// id's maps, then run the emptiness check from that leaf.
  ///
  /// Returns the leaf it was removed from; no-op `None` for an unindexed
  /// id. Loose bounds are left as-is (they never shrink outside rebuild).
  pub fn remove_triangle(&mut self, geo: &mut MeshGeometry, id: u32) -> Option<CellId> {
    let leaf = geo.tri_leaf(id)?;
    let pos = geo.tri_pos_in_leaf(id) as usize;
    let moved = {
      let tris = &mut self.cell_mut(leaf).tris;
      debug_assert_eq!(tris.get(pos), Some(&id), "tri_pos map out of sync");
      tris.swap_remove(pos);
      tris.get(pos).copied()
    };
    if let Some(moved) = moved {
      geo.set_pos_in_leaf(moved, pos as u32);
    }
    geo.clear_leaf(id);
    self.prune_if_empty(leaf);
    Some(leaf)
  }

  /// Collapse all-empty sibling groups, walking upward.
  ///
  /// If the parent of `cell` has 8 children that are all empty leaves,
  /// free them, turn the parent back into a leaf, and repeat the check one
  /// level up. Removes structure only - triangles are never moved - and is
  /// idempotent on already-pruned trees.
  pub fn prune_if_empty(&mut self, cell: CellId) {
    let Some(parent) = self.cell(cell).parent else {
      return;
    };
    let Some(kids) = self.cell(parent).children else {
      return;
    };
    let all_empty = kids.iter().all(|&k| {
      let c = self.cell(k);
      c.children.is_none() && c.tris.is_empty()
    });
    if !all_empty {
      return;
    }
    for k in kids {
      self.free_cell(k);
    }
    self.cell_mut(parent).children = None;
    self.prune_if_empty(parent);
  }

  /// Union `tri_box` into the loose bound of `from` and each ancestor,
  /// stopping at the first cell that already contained it (everything
  /// above contains it too, by the containment invariant). Runs on every
  /// leaf mutation, unbatched - skipping it would leave ancestor bounds
  /// stale and queries would miss.
  pub(crate) fn expand_loose_upward(&mut self, from: CellId, tri_box: Aabb3) {
    let mut cur = Some(from);
    while let Some(id) = cur {
      let cell = self.cell_mut(id);
      cur = if cell.loose.expand_to_contain(&tri_box) {
        cell.parent
      } else {
        None
      };
    }
  }
}

#[cfg(test)]
#[path = "update_test.rs"]
mod update_test;
