use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::*;
use crate::aabb::Aabb3;
use crate::geometry::MeshGeometry;

fn soup(centers: &[Vec3]) -> MeshGeometry {
  let boxes = centers
    .iter()
    .map(|&c| Aabb3::new(c - Vec3::splat(0.05), c + Vec3::splat(0.05)))
    .collect();
  MeshGeometry::from_triangles(boxes, centers.to_vec()).unwrap()
}

fn random_centers(n: usize, seed: u64) -> Vec<Vec3> {
  let mut rng = StdRng::seed_from_u64(seed);
  (0..n)
    .map(|_| {
      Vec3::new(
        rng.random_range(-0.9f32..0.9),
        rng.random_range(-0.9f32..0.9),
        rng.random_range(-0.9f32..0.9),
      )
    })
    .collect()
}

#[test]
fn test_fresh_tree_is_single_leaf() {
  let tree = Octree::new(Aabb3::new(Vec3::splat(-1.0), Vec3::splat(1.0)));
  assert!(tree.cell(tree.root()).is_leaf());
  assert_eq!(tree.cell(tree.root()).depth(), 0);
  assert_eq!(tree.cell(tree.root()).parent(), None);
  assert_eq!(tree.leaf_ids(), vec![tree.root()]);
  assert_eq!(tree.triangle_count(), 0);
}

#[test]
fn test_invariants_hold_on_random_build() {
  let centers = random_centers(800, 11);
  let mut geo = soup(&centers);
  let mut tree = Octree::with_config(
    Aabb3::new(Vec3::splat(-1.0), Vec3::splat(1.0)),
    OctreeConfig {
      max_triangles_per_leaf: 6,
      ..Default::default()
    },
  );
  tree.build(&mut geo, (0..800).collect());
  tree.check_invariants(&geo);
}

/// Collapsing a sibling group returns its 8 cells to the free list, and
/// the next subdivision reuses them instead of growing the arena.
#[test]
fn test_arena_recycles_collapsed_cells() {
  let mut centers = Vec::new();
  for &x in &[-0.5f32, 0.5] {
    for &y in &[-0.5f32, 0.5] {
      for &z in &[-0.5f32, 0.5] {
        centers.push(Vec3::new(x, y, z));
      }
    }
  }
  let mut geo = soup(&centers);
  let mut tree = Octree::with_config(
    Aabb3::new(Vec3::splat(-1.0), Vec3::splat(1.0)),
    OctreeConfig {
      max_triangles_per_leaf: 1,
      ..Default::default()
    },
  );
  tree.build(&mut geo, (0..8).collect());
  let arena_after_build = tree.cells.len();
  assert_eq!(arena_after_build, 9); // root + 8 children
  assert!(tree.free.is_empty());

  for tri in 0..8 {
    tree.remove_triangle(&mut geo, tri);
  }
  assert!(tree.cell(tree.root()).is_leaf());
  assert_eq!(tree.free.len(), 8);

  tree.build(&mut geo, (0..8).collect());
  assert_eq!(tree.cells.len(), arena_after_build, "arena grew instead of recycling");
  assert!(tree.free.is_empty());
  tree.check_invariants(&geo);
}

#[test]
fn test_leaf_ids_cover_all_triangles() {
  let centers = random_centers(300, 12);
  let mut geo = soup(&centers);
  let mut tree = Octree::with_config(
    Aabb3::new(Vec3::splat(-1.0), Vec3::splat(1.0)),
    OctreeConfig {
      max_triangles_per_leaf: 10,
      ..Default::default()
    },
  );
  tree.build(&mut geo, (0..300).collect());

  let total: usize = tree
    .leaf_ids()
    .iter()
    .map(|&id| tree.cell(id).triangle_ids().len())
    .sum();
  assert_eq!(total, 300);
  assert_eq!(tree.triangle_count(), 300);

  for &id in &tree.leaf_ids() {
    assert!(tree.cell(id).is_leaf());
  }
}
