//! OctreeCell - one node of the triangle octree, plus the centroid routing
//! rules shared by build-time subdivision and later insertion.
//!
//! Cells live in the [`Octree`](super::Octree) arena and point at each other
//! by [`CellId`]; the parent link is a plain id, never ownership.

use glam::Vec3;

use crate::aabb::Aabb3;

/// Arena handle for a cell. Stable for the cell's lifetime; recycled after
/// the cell is freed by pruning or a subtree rebuild.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct CellId(pub(crate) u32);

impl CellId {
  #[inline]
  pub(crate) fn idx(self) -> usize {
    self.0 as usize
  }
}

/// One octree node. Either a leaf (no children, owns triangle ids) or an
/// internal cell (exactly 8 children, owns nothing) - 1-7 children never
/// exists.
#[derive(Debug, Clone)]
pub struct OctreeCell {
  /// Owning cell, `None` at the root. Used for upward bound propagation
  /// and emptiness pruning only.
  pub(crate) parent: Option<CellId>,
  /// 0 at the root, parent depth + 1 below.
  pub(crate) depth: u32,
  /// `Some` iff this cell is internal.
  pub(crate) children: Option<[CellId; 8]>,
  /// Conservative bound over everything stored at or beneath this cell.
  /// Monotonically non-shrinking except on (sub)tree rebuild.
  pub(crate) loose: Aabb3,
  /// Fixed routing region; triangles whose centroid this box accepts
  /// belong under this cell.
  pub(crate) split: Aabb3,
  /// Member triangle ids; non-empty only on leaves.
  pub(crate) tris: Vec<u32>,
}

impl OctreeCell {
  pub(crate) fn new(parent: Option<CellId>, depth: u32, split: Aabb3) -> Self {
    Self {
      parent,
      depth,
      children: None,
      loose: Aabb3::EMPTY,
      split,
      tris: Vec::new(),
    }
  }

  /// Leaf = no children.
  #[inline]
  pub fn is_leaf(&self) -> bool {
    self.children.is_none()
  }

  #[inline]
  pub fn depth(&self) -> u32 {
    self.depth
  }

  #[inline]
  pub fn parent(&self) -> Option<CellId> {
    self.parent
  }

  #[inline]
  pub fn children(&self) -> Option<&[CellId; 8]> {
    self.children.as_ref()
  }

  #[inline]
  pub fn loose_bound(&self) -> &Aabb3 {
    &self.loose
  }

  #[inline]
  pub fn split_bound(&self) -> &Aabb3 {
    &self.split
  }

  /// Triangle ids stored directly on this cell (empty unless a leaf).
  #[inline]
  pub fn triangle_ids(&self) -> &[u32] {
    &self.tris
  }
}

/// Pick the child octant for a centroid, given the parent split-bound
/// center. Strict `>` on every axis: a centroid exactly on the center
/// plane goes to the lower octant. Build and insertion both route through
/// here, so ties break identically forever.
///
/// The returned index follows the fixed order the child boxes are laid
/// out in ([`child_split_boxes`]).
#[inline]
pub(crate) fn octant_for(center: Vec3, c: Vec3) -> usize {
  if c.x > center.x {
    if c.y > center.y {
      if c.z > center.z {
        6
      } else {
        5
      }
    } else if c.z > center.z {
      2
    } else {
      1
    }
  } else if c.y > center.y {
    if c.z > center.z {
      7
    } else {
      4
    }
  } else if c.z > center.z {
    3
  } else {
    0
  }
}

/// The 8 child split boxes of a parent split bound.
///
/// These are NOT written as the canonical symmetric octants: alternating
/// children are expressed as a canonical corner offset by a full half
/// extent along one or two axes. Algebraically the same regions, but not
/// bit-identical under f32 rounding for non-dyadic parents - and routing
/// during later insertion tests centroids against these exact stored
/// boxes, so the historical formulas are load-bearing. Do not normalize.
pub(crate) fn child_split_boxes(split: &Aabb3) -> [Aabb3; 8] {
  let d = (split.max - split.min) * 0.5;
  let cen = (split.min + split.max) * 0.5;
  let (xmin, ymin, zmin) = (split.min.x, split.min.y, split.min.z);
  let (xmax, ymax, zmax) = (split.max.x, split.max.y, split.max.z);
  [
    Aabb3::new(
      Vec3::new(xmin, ymin, zmin),
      Vec3::new(cen.x, cen.y, cen.z),
    ),
    Aabb3::new(
      Vec3::new(xmin + d.x, ymin, zmin),
      Vec3::new(cen.x + d.x, cen.y, cen.z),
    ),
    Aabb3::new(
      Vec3::new(cen.x, cen.y - d.y, cen.z),
      Vec3::new(xmax, ymax - d.y, zmax),
    ),
    Aabb3::new(
      Vec3::new(xmin, ymin, zmin + d.z),
      Vec3::new(cen.x, cen.y, cen.z + d.z),
    ),
    Aabb3::new(
      Vec3::new(xmin, ymin + d.y, zmin),
      Vec3::new(cen.x, cen.y + d.y, cen.z),
    ),
    Aabb3::new(
      Vec3::new(cen.x, cen.y, cen.z - d.z),
      Vec3::new(xmax, ymax, zmax - d.z),
    ),
    Aabb3::new(
      Vec3::new(cen.x, cen.y, cen.z),
      Vec3::new(xmax, ymax, zmax),
    ),
    Aabb3::new(
      Vec3::new(cen.x - d.x, cen.y, cen.z),
      Vec3::new(xmax - d.x, ymax, zmax),
    ),
  ]
}

/// Half-open containment used to route an inserted centroid into a split
/// bound: accepted iff `min < c && c <= max` on every axis. Matches the
/// build-time tie-break (ties go low: the low child's max plane accepts,
/// the high child's min plane rejects).
#[inline]
pub(crate) fn accepts_centroid(split: &Aabb3, c: Vec3) -> bool {
  c.x > split.min.x
    && c.y > split.min.y
    && c.z > split.min.z
    && c.x <= split.max.x
    && c.y <= split.max.y
    && c.z <= split.max.z
}

#[cfg(test)]
#[path = "cell_test.rs"]
mod cell_test;
