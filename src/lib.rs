//! mesh_octree - dynamic loose octree over the triangles of a 3D mesh
//!
//! This crate provides the spatial index a mesh-editing application keeps
//! hot while the user works the surface: narrow "which triangles does this
//! ray pass near?" (picking) and "which triangles lie within this sphere?"
//! (brush falloff) down to small candidate sets, per frame, without
//! rebuilding after every edit.
//!
//! # Features
//!
//! - **Loose bounds**: each cell carries a conservative box kept valid
//!   incrementally under insertion, so queries never miss after edits
//! - **Work-list build**: bounded stack usage regardless of mesh size
//! - **Incremental maintenance**: O(depth) insertion, O(1) removal via
//!   reverse maps, automatic collapse of all-empty sibling groups
//! - **Zero-allocation queries**: candidates append into caller-owned
//!   buffers reused across frames
//!
//! Queries return candidates only; exact ray-triangle or sphere-triangle
//! intersection is the caller's follow-up pass.
//!
//! # Example
//!
//! ```ignore
//! use glam::Vec3;
//! use mesh_octree::{MeshGeometry, Octree};
//!
//! let mut geo = MeshGeometry::from_mesh(&positions, &triangles)?;
//! let mut tree = Octree::new(geo.enclosing_box());
//! tree.build(&mut geo, (0..geo.triangle_count() as u32).collect());
//!
//! // Pick: candidates under the cursor ray
//! let mut candidates = Vec::new();
//! tree.collect_ray_candidates(ray_origin, ray_dir.recip(), &mut candidates);
//! ```

pub mod aabb;
pub mod geometry;
pub mod octree;

// Re-export commonly used items
pub use aabb::Aabb3;
pub use geometry::{GeometryError, MeshGeometry};
pub use octree::{CellId, Octree, OctreeCell, OctreeConfig};
