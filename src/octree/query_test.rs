use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::*;
use crate::aabb::Aabb3;
use crate::geometry::MeshGeometry;
use crate::octree::{Octree, OctreeConfig};

/// Flat grid of triangles on the z = 0 plane, one per unit cell of a
/// 16 x 16 patch centered on the origin.
fn grid_fixture() -> (MeshGeometry, Octree) {
  let mut centers = Vec::new();
  let mut boxes = Vec::new();
  for i in 0..16 {
    for j in 0..16 {
      let c = Vec3::new(i as f32 - 7.5, j as f32 - 7.5, 0.0);
      centers.push(c);
      boxes.push(Aabb3::new(
        c - Vec3::new(0.5, 0.5, 0.01),
        c + Vec3::new(0.5, 0.5, 0.01),
      ));
    }
  }
  let mut geo = MeshGeometry::from_triangles(boxes, centers).unwrap();
  let mut tree = Octree::with_config(
    Aabb3::new(Vec3::new(-8.0, -8.0, -8.0), Vec3::new(8.0, 8.0, 8.0)),
    OctreeConfig {
      max_triangles_per_leaf: 4,
      ..Default::default()
    },
  );
  tree.build(&mut geo, (0..256).collect());
  (geo, tree)
}

/// A ray built to pass through a specific triangle's box must surface that
/// triangle as a candidate.
#[test]
fn test_ray_soundness() {
  let (geo, tree) = grid_fixture();
  let target = 37u32;
  let through = geo.tri_center(target);
  let origin = through + Vec3::new(0.0, 0.0, 5.0);
  let dir = (through - origin).normalize();

  let mut out = Vec::new();
  tree.collect_ray_candidates(origin, dir.recip(), &mut out);
  assert!(out.contains(&target));
}

/// Triangles far off the ray's path never appear: a vertical ray down one
/// corner of the grid must not drag in the opposite corner.
#[test]
fn test_ray_prunes_distant_leaves() {
  let (geo, tree) = grid_fixture();
  let origin = Vec3::new(-7.5, -7.5, 5.0);
  let inv_dir = Vec3::new(0.0, 0.0, -1.0).recip();

  let mut out = Vec::new();
  tree.collect_ray_candidates(origin, inv_dir, &mut out);
  assert!(!out.is_empty());
  for &tri in &out {
    let c = geo.tri_center(tri);
    // Everything surfaced sits in the corner leaves the ray pierced.
    assert!(
      c.x < 0.0 && c.y < 0.0,
      "triangle {} at {:?} is nowhere near the ray",
      tri,
      c
    );
  }
}

/// Axis-aligned ray: the reciprocal direction carries ±inf and the slab
/// test must still accept exactly the column of leaves under it.
#[test]
fn test_ray_axis_aligned_hits() {
  let (geo, tree) = grid_fixture();
  let target = 200u32;
  let origin = geo.tri_center(target) + Vec3::new(0.0, 0.0, 7.0);
  let inv_dir = Vec3::new(0.0, 0.0, -1.0).recip();
  assert!(inv_dir.x.is_infinite() && inv_dir.y.is_infinite());

  let mut out = Vec::new();
  tree.collect_ray_candidates(origin, inv_dir, &mut out);
  assert!(out.contains(&target));
}

/// A ray pointing away from the whole tree hits nothing (tmax < 0).
#[test]
fn test_ray_behind_origin_misses() {
  let (_geo, tree) = grid_fixture();
  let origin = Vec3::new(0.0, 0.0, 20.0);
  let inv_dir = Vec3::new(0.0, 0.0, 1.0).recip();

  let mut out = Vec::new();
  tree.collect_ray_candidates(origin, inv_dir, &mut out);
  assert!(out.is_empty());
}

/// Sphere collection reports the leaves it hit, and the candidate ids are
/// exactly those leaves' members.
#[test]
fn test_sphere_hit_leaves_match_candidates() {
  let (_geo, tree) = grid_fixture();
  let mut leaves = Vec::new();
  let mut out = Vec::new();
  tree.collect_sphere_candidates(Vec3::new(3.0, -2.0, 0.0), 4.0, &mut leaves, &mut out);

  assert!(!leaves.is_empty());
  let mut from_leaves: Vec<u32> = leaves
    .iter()
    .flat_map(|&l| tree.cell(l).triangle_ids().iter().copied())
    .collect();
  let mut got = out.clone();
  from_leaves.sort_unstable();
  got.sort_unstable();
  assert_eq!(got, from_leaves);
}

/// Growing the radius only ever adds candidates.
#[test]
fn test_sphere_radius_monotonicity() {
  let (_geo, tree) = grid_fixture();
  let center = Vec3::new(1.3, 0.7, 0.2);
  let mut rng = StdRng::seed_from_u64(9);
  let mut prev: Vec<u32> = Vec::new();
  let mut r = 0.0f32;
  for _ in 0..6 {
    r += rng.random_range(0.5f32..1.5);
    let mut leaves = Vec::new();
    let mut out = Vec::new();
    tree.collect_sphere_candidates(center, r * r, &mut leaves, &mut out);
    out.sort_unstable();
    for tri in &prev {
      assert!(out.binary_search(tri).is_ok(), "radius growth dropped {}", tri);
    }
    prev = out;
  }
}

/// The sphere test is inclusive at the boundary: a box exactly radius away
/// is still collected.
#[test]
fn test_sphere_boundary_inclusive() {
  let mut geo = MeshGeometry::from_triangles(
    vec![Aabb3::new(Vec3::ZERO, Vec3::ONE)],
    vec![Vec3::splat(0.5)],
  )
  .unwrap();
  let mut tree = Octree::new(Aabb3::new(Vec3::ZERO, Vec3::ONE));
  tree.build(&mut geo, vec![0]);

  let probe = Vec3::new(2.0, 0.5, 0.5); // distance 1 from the box face
  let mut leaves = Vec::new();
  let mut out = Vec::new();
  tree.collect_sphere_candidates(probe, 1.0, &mut leaves, &mut out);
  assert_eq!(out, vec![0]);

  leaves.clear();
  out.clear();
  tree.collect_sphere_candidates(probe, 0.99, &mut leaves, &mut out);
  assert!(out.is_empty());
}

/// Queries append; they never clear the caller's buffer.
#[test]
fn test_queries_append_to_buffer() {
  let (_geo, tree) = grid_fixture();
  let mut out = vec![9999];
  tree.collect_ray_candidates(
    Vec3::new(0.2, 0.2, 5.0),
    Vec3::new(0.0, 0.0, -1.0).recip(),
    &mut out,
  );
  assert_eq!(out[0], 9999);
  assert!(out.len() > 1);
}
