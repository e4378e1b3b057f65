// src/scene_lib/patch_source.rs

use glam::Vec3;
use crate::geometry::Aabb3;

/// Level of detail. 0 is full resolution; each step halves the sampling rate.
pub type Lod = u32;

/// What the triangle selector needs from a patch-based terrain.
///
/// Patches form a `patch_count() x patch_count()` grid addressed by `(x, z)`.
pub trait TerrainPatchSource {
    fn patch_count(&self) -> usize;

    fn bounding_box(&self, x: usize, z: usize) -> Aabb3;

    /// Clears `out`, fills it with triangle-list indices into `vertices()` and
    /// returns how many were written.
    fn indices_for_patch(&self, out: &mut Vec<u32>, x: usize, z: usize, lod: Lod) -> usize;

    fn vertices(&self) -> &[Vec3];
}
