//! MeshGeometry - per-triangle attribute storage the octree indexes over.
//!
//! Flat arrays, one entry per triangle: tight bounding box, centroid, and
//! the two reverse maps (triangle -> owning leaf, triangle -> position in
//! that leaf's list). The reverse maps are written only by the octree,
//! atomically with every leaf-list mutation, so removal stays O(1).

use glam::Vec3;
use thiserror::Error;

use crate::aabb::Aabb3;
use crate::octree::CellId;

/// Construction-time validation failures. Hot-path operations never return
/// these; they signal via `Option`/no-op instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
  /// Box and centroid arrays must describe the same triangles.
  #[error("triangle attribute arrays disagree: {boxes} boxes vs {centers} centroids")]
  AttributeLengthMismatch { boxes: usize, centers: usize },

  /// A triangle references a vertex the position array does not have.
  #[error("triangle {triangle} references vertex {vertex}, but the mesh has {vertex_count} vertices")]
  VertexOutOfRange {
    triangle: usize,
    vertex: u32,
    vertex_count: usize,
  },
}

/// Per-triangle geometry attributes plus the octree's reverse index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshGeometry {
  boxes: Vec<Aabb3>,
  centers: Vec<Vec3>,
  tri_leaf: Vec<Option<CellId>>,
  tri_pos: Vec<u32>,
}

impl MeshGeometry {
  /// Build from precomputed per-triangle boxes and centroids.
  pub fn from_triangles(boxes: Vec<Aabb3>, centers: Vec<Vec3>) -> Result<Self, GeometryError> {
    if boxes.len() != centers.len() {
      return Err(GeometryError::AttributeLengthMismatch {
        boxes: boxes.len(),
        centers: centers.len(),
      });
    }
    let count = boxes.len();
    Ok(Self {
      boxes,
      centers,
      tri_leaf: vec![None; count],
      tri_pos: vec![0; count],
    })
  }

  /// Build from an indexed mesh: box = min/max of the three vertices,
  /// centroid = their average.
  pub fn from_mesh(positions: &[Vec3], triangles: &[[u32; 3]]) -> Result<Self, GeometryError> {
    let mut boxes = Vec::with_capacity(triangles.len());
    let mut centers = Vec::with_capacity(triangles.len());
    for (i, tri) in triangles.iter().enumerate() {
      for &v in tri {
        if v as usize >= positions.len() {
          return Err(GeometryError::VertexOutOfRange {
            triangle: i,
            vertex: v,
            vertex_count: positions.len(),
          });
        }
      }
      let (v0, v1, v2) = (
        positions[tri[0] as usize],
        positions[tri[1] as usize],
        positions[tri[2] as usize],
      );
      boxes.push(Aabb3::from_triangle(v0, v1, v2));
      centers.push((v0 + v1 + v2) / 3.0);
    }
    Self::from_triangles(boxes, centers)
  }

  /// Number of triangles described.
  #[inline]
  pub fn triangle_count(&self) -> usize {
    self.boxes.len()
  }

  /// Tight bounding box of one triangle.
  #[inline]
  pub fn tri_box(&self, id: u32) -> Aabb3 {
    self.boxes[id as usize]
  }

  /// Centroid of one triangle.
  #[inline]
  pub fn tri_center(&self, id: u32) -> Vec3 {
    self.centers[id as usize]
  }

  /// Leaf currently holding this triangle, `None` when unindexed.
  #[inline]
  pub fn tri_leaf(&self, id: u32) -> Option<CellId> {
    self.tri_leaf[id as usize]
  }

  /// Position of this triangle within its leaf's list.
  /// Meaningless while `tri_leaf(id)` is `None`.
  #[inline]
  pub fn tri_pos_in_leaf(&self, id: u32) -> u32 {
    self.tri_pos[id as usize]
  }

  /// Recompute one triangle's box and centroid after its vertices moved
  /// (sculpt deformation). The octree is not informed; the editor removes
  /// and re-inserts the triangle when its centroid leaves the old region.
  pub fn update_triangle(&mut self, id: u32, v0: Vec3, v1: Vec3, v2: Vec3) {
    self.boxes[id as usize] = Aabb3::from_triangle(v0, v1, v2);
    self.centers[id as usize] = (v0 + v1 + v2) / 3.0;
  }

  /// Union of every triangle box. Handy as the root split bound for a
  /// fresh build; inverted-empty when there are no triangles.
  pub fn enclosing_box(&self) -> Aabb3 {
    let mut out = Aabb3::EMPTY;
    for b in &self.boxes {
      out.expand_to_contain(b);
    }
    out
  }

  pub(crate) fn assign_leaf(&mut self, id: u32, leaf: CellId, pos: u32) {
    self.tri_leaf[id as usize] = Some(leaf);
    self.tri_pos[id as usize] = pos;
  }

  pub(crate) fn set_pos_in_leaf(&mut self, id: u32, pos: u32) {
    self.tri_pos[id as usize] = pos;
  }

  pub(crate) fn clear_leaf(&mut self, id: u32) {
    self.tri_leaf[id as usize] = None;
    self.tri_pos[id as usize] = 0;
  }
}
