//! Candidate collection queries: ray and sphere.
//!
//! Both prune on the loose bounds and append whole leaf lists to a
//! caller-owned buffer; neither allocates on the traversal path nor
//! deduplicates (two hit leaves concatenate). Exact triangle intersection
//! is the caller's follow-up pass.

use glam::Vec3;

use super::cell::CellId;
use super::Octree;

impl Octree {
  /// Append to `out` the ids of every triangle owned by a leaf whose loose
  /// bound the ray intersects.
  ///
  /// `inv_dir` is the precomputed component reciprocal of the ray
  /// direction; axis-aligned rays pass ±inf, which the slab test absorbs.
  /// `out` is not cleared - callers reuse one buffer across frames.
  pub fn collect_ray_candidates(&self, origin: Vec3, inv_dir: Vec3, out: &mut Vec<u32>) {
    self.collect_ray(self.root(), origin, inv_dir, out);
  }

  fn collect_ray(&self, id: CellId, origin: Vec3, inv_dir: Vec3, out: &mut Vec<u32>) {
    let cell = self.cell(id);
    if !cell.loose.intersects_ray(origin, inv_dir) {
      return;
    }
    match cell.children {
      Some(kids) => {
        for k in kids {
          self.collect_ray(k, origin, inv_dir, out);
        }
      }
      None => out.extend_from_slice(&cell.tris),
    }
  }

  /// Append to `out` the ids of every triangle owned by a leaf whose loose
  /// bound comes within the sphere, and record those leaves in
  /// `hit_leaves` (stroke/falloff bookkeeping).
  ///
  /// The test is inclusive at the boundary: a leaf is excluded only when
  /// its squared box distance exceeds `radius_sq`.
  pub fn collect_sphere_candidates(
    &self,
    center: Vec3,
    radius_sq: f32,
    hit_leaves: &mut Vec<CellId>,
    out: &mut Vec<u32>,
  ) {
    self.collect_sphere(self.root(), center, radius_sq, hit_leaves, out);
  }

  fn collect_sphere(
    &self,
    id: CellId,
    center: Vec3,
    radius_sq: f32,
    hit_leaves: &mut Vec<CellId>,
    out: &mut Vec<u32>,
  ) {
    let cell = self.cell(id);
    if cell.loose.distance_squared_to_point(center) > radius_sq {
      return;
    }
    match cell.children {
      Some(kids) => {
        for k in kids {
          self.collect_sphere(k, center, radius_sq, hit_leaves, out);
        }
      }
      None => {
        hit_leaves.push(id);
        out.extend_from_slice(&cell.tris);
      }
    }
  }
}

#[cfg(test)]
#[path = "query_test.rs"]
mod query_test;
