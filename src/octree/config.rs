//! OctreeConfig - termination policy for recursive build.

/// Subdivision termination caps.
///
/// The depth cap wins: a cell at `max_depth` keeps all its triangles no
/// matter how many, trading query selectivity for bounded tree depth.
/// Incremental insertion ignores `max_triangles_per_leaf` entirely; only a
/// rebuild re-enforces it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OctreeConfig {
  /// Maximum cell depth, root = 0.
  pub max_depth: u32,
  /// A cell holding more than this subdivides, unless at `max_depth`.
  pub max_triangles_per_leaf: usize,
}

impl Default for OctreeConfig {
  fn default() -> Self {
    Self {
      max_depth: 8,
      max_triangles_per_leaf: 100,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_defaults() {
    let config = OctreeConfig::default();
    assert_eq!(config.max_depth, 8);
    assert_eq!(config.max_triangles_per_leaf, 100);
  }

  #[test]
  fn test_struct_update_syntax() {
    let config = OctreeConfig {
      max_triangles_per_leaf: 1,
      ..Default::default()
    };
    assert_eq!(config.max_depth, 8);
    assert_eq!(config.max_triangles_per_leaf, 1);
  }
}
