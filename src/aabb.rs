//! Single-precision axis-aligned bounding box plus the two query predicates
//! the octree traversals rely on (ray slab test, point distance).

use glam::Vec3;

/// Axis-aligned bounding box.
///
/// The inverted `EMPTY` box (min = +inf, max = -inf) is the identity for
/// union: expanding it by anything yields that thing. Freshly allocated
/// octree cells carry it until a triangle box lands in them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb3 {
  /// Minimum corner (inclusive).
  pub min: Vec3,
  /// Maximum corner (inclusive).
  pub max: Vec3,
}

impl Aabb3 {
  /// Inverted box: contains nothing, unions as identity.
  pub const EMPTY: Aabb3 = Aabb3 {
    min: Vec3::INFINITY,
    max: Vec3::NEG_INFINITY,
  };

  /// Create a new AABB from min and max corners.
  ///
  /// # Panics
  /// Debug-asserts that min <= max on all axes.
  pub fn new(min: Vec3, max: Vec3) -> Self {
    debug_assert!(
      min.x <= max.x && min.y <= max.y && min.z <= max.z,
      "AABB min must be <= max on all axes"
    );
    Self { min, max }
  }

  /// Tight box around a triangle's three vertices.
  #[inline]
  pub fn from_triangle(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
    Self {
      min: v0.min(v1).min(v2),
      max: v0.max(v1).max(v2),
    }
  }

  /// Get the center of the AABB.
  #[inline]
  pub fn center(&self) -> Vec3 {
    (self.min + self.max) * 0.5
  }

  /// Get the size of the AABB (max - min).
  #[inline]
  pub fn size(&self) -> Vec3 {
    self.max - self.min
  }

  /// True when this box fully contains `other` on all axes.
  #[inline]
  pub fn contains_box(&self, other: &Aabb3) -> bool {
    self.min.x <= other.min.x
      && self.min.y <= other.min.y
      && self.min.z <= other.min.z
      && self.max.x >= other.max.x
      && self.max.y >= other.max.y
      && self.max.z >= other.max.z
  }

  /// Grow this box (in place) until it contains `other`.
  ///
  /// Returns whether any component actually moved; upward loose-bound
  /// propagation stops at the first ancestor where nothing moved.
  #[inline]
  pub fn expand_to_contain(&mut self, other: &Aabb3) -> bool {
    let mut changed = false;
    if other.min.x < self.min.x {
      self.min.x = other.min.x;
      changed = true;
    }
    if other.min.y < self.min.y {
      self.min.y = other.min.y;
      changed = true;
    }
    if other.min.z < self.min.z {
      self.min.z = other.min.z;
      changed = true;
    }
    if other.max.x > self.max.x {
      self.max.x = other.max.x;
      changed = true;
    }
    if other.max.y > self.max.y {
      self.max.y = other.max.y;
      changed = true;
    }
    if other.max.z > self.max.z {
      self.max.z = other.max.z;
      changed = true;
    }
    changed
  }

  /// Six-plane slab test against a ray given as origin + reciprocal
  /// direction (`inv_dir = 1/d` per component, precomputed by the caller).
  ///
  /// Axis-aligned rays put ±inf in `inv_dir` and the min/max lattice
  /// absorbs the infinities. An origin lying exactly on a slab plane of
  /// such a ray produces `0 * inf = NaN`, which must poison the miss
  /// comparison (NaN compares false) so the grazing ray still collects -
  /// hence the NaN-propagating helpers instead of `f32::min`/`max`, which
  /// drop NaN and would turn that graze into a miss.
  ///
  /// The box is missed iff `tmax < 0` (entirely behind the origin) or
  /// `tmin >= tmax` (slabs never overlap).
  #[inline]
  pub fn intersects_ray(&self, origin: Vec3, inv_dir: Vec3) -> bool {
    let t1 = (self.min.x - origin.x) * inv_dir.x;
    let t2 = (self.max.x - origin.x) * inv_dir.x;
    let t3 = (self.min.y - origin.y) * inv_dir.y;
    let t4 = (self.max.y - origin.y) * inv_dir.y;
    let t5 = (self.min.z - origin.z) * inv_dir.z;
    let t6 = (self.max.z - origin.z) * inv_dir.z;
    let tmin = nan_max(nan_max(nan_min(t1, t2), nan_min(t3, t4)), nan_min(t5, t6));
    let tmax = nan_min(nan_min(nan_max(t1, t2), nan_max(t3, t4)), nan_max(t5, t6));
    !(tmax < 0.0 || tmin >= tmax)
  }

  /// Squared distance from a point to this box; zero when the point is
  /// inside. Per axis: distance to the nearer face if outside the slab,
  /// else zero, summed as squares.
  #[inline]
  pub fn distance_squared_to_point(&self, p: Vec3) -> f32 {
    let dx = if self.min.x > p.x {
      self.min.x - p.x
    } else if self.max.x < p.x {
      self.max.x - p.x
    } else {
      0.0
    };
    let dy = if self.min.y > p.y {
      self.min.y - p.y
    } else if self.max.y < p.y {
      self.max.y - p.y
    } else {
      0.0
    };
    let dz = if self.min.z > p.z {
      self.min.z - p.z
    } else if self.max.z < p.z {
      self.max.z - p.z
    } else {
      0.0
    };
    dx * dx + dy * dy + dz * dz
  }
}

#[inline]
fn nan_min(a: f32, b: f32) -> f32 {
  if a.is_nan() || a < b {
    a
  } else {
    b
  }
}

#[inline]
fn nan_max(a: f32, b: f32) -> f32 {
  if a.is_nan() || a > b {
    a
  } else {
    b
  }
}
