// src/scene_lib/triangle_selector.rs

use glam::Mat4;
use log::{debug, trace, warn};

use crate::geometry::{Aabb3, Line3, Triangle3};
use crate::scene_lib::patch_source::{Lod, TerrainPatchSource};

/// Answers "which triangles might touch this shape" for collision and picking.
///
/// Every query fills `out` from the front and returns how many triangles it
/// wrote, never more than `out.len()`. When `transform` is given it is applied
/// to each returned vertex as a point transform.
pub trait TriangleSelector {
    fn get_triangles(&self, out: &mut [Triangle3], transform: Option<&Mat4>) -> usize;

    fn get_triangles_in_box(&self, out: &mut [Triangle3], aabb: &Aabb3, transform: Option<&Mat4>) -> usize;

    fn get_triangles_on_line(&self, out: &mut [Triangle3], line: &Line3, transform: Option<&Mat4>) -> usize;

    fn triangle_count(&self) -> usize;
}

#[derive(Clone, Debug, Default)]
pub struct TrianglePatch {
    pub bounding_box: Aabb3,
    pub triangles: Vec<Triangle3>,
}

impl TrianglePatch {
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }
}

/// Triangle selector over a patch-based terrain.
///
/// Filtering is per patch: a patch whose box passes the test contributes all
/// of its triangles. A patch that would not fit in the remaining output space
/// is skipped whole, so a later, smaller patch can still be written after it.
#[derive(Clone, Debug, Default)]
pub struct TerrainTriangleSelector {
    patches: Vec<TrianglePatch>,
    patch_count: usize,
    total_triangles: usize,
    lod: Lod,
}

impl TerrainTriangleSelector {
    pub fn new<S: TerrainPatchSource + ?Sized>(source: &S, lod: Lod) -> Self {
        let mut selector = Self::default();
        selector.set_triangle_data(source, lod);
        selector
    }

    /// Drops all patch data and rebuilds it from `source` at `lod`.
    pub fn set_triangle_data<S: TerrainPatchSource + ?Sized>(&mut self, source: &S, lod: Lod) {
        let patch_count = source.patch_count();
        let vertices = source.vertices();

        self.patches.clear();
        self.patches.reserve(patch_count * patch_count);
        self.patch_count = patch_count;
        self.total_triangles = 0;
        self.lod = lod;

        let mut indices = Vec::new();
        for x in 0..patch_count {
            for z in 0..patch_count {
                let mut patch = TrianglePatch {
                    bounding_box: source.bounding_box(x, z),
                    triangles: Vec::new(),
                };

                let index_count = source.indices_for_patch(&mut indices, x, z, lod).min(indices.len());
                // chunks_exact leaves out a trailing partial triangle.
                for tri in indices[..index_count].chunks_exact(3) {
                    let corners = (
                        vertices.get(tri[0] as usize),
                        vertices.get(tri[1] as usize),
                        vertices.get(tri[2] as usize),
                    );
                    match corners {
                        (Some(&a), Some(&b), Some(&c)) => patch.triangles.push(Triangle3::new(a, b, c)),
                        _ => warn!(
                            "patch ({}, {}) references vertex outside of {} vertices: {:?}",
                            x,
                            z,
                            vertices.len(),
                            tri
                        ),
                    }
                }

                self.total_triangles += patch.triangle_count();
                self.patches.push(patch);
            }
        }

        debug!(
            "terrain selector built {} patches with {} triangles at LOD {}",
            self.patches.len(),
            self.total_triangles,
            lod
        );
    }

    pub fn num_patches(&self) -> usize {
        self.patches.len()
    }

    /// Grid side length of the last build.
    pub fn patch_count(&self) -> usize {
        self.patch_count
    }

    pub fn lod(&self) -> Lod {
        self.lod
    }

    pub fn patch(&self, x: usize, z: usize) -> Option<&TrianglePatch> {
        if x >= self.patch_count || z >= self.patch_count {
            return None;
        }
        self.patches.get(x * self.patch_count + z)
    }

    pub fn patches(&self) -> &[TrianglePatch] {
        &self.patches
    }

    fn collect_patches(
        &self,
        out: &mut [Triangle3],
        transform: Option<&Mat4>,
        mut accept: impl FnMut(&Aabb3) -> bool,
    ) -> usize {
        let limit = self.total_triangles.min(out.len());
        let mut written = 0;

        for patch in &self.patches {
            let count = patch.triangle_count();
            if written + count > limit || !accept(&patch.bounding_box) {
                continue;
            }

            let dest = &mut out[written..written + count];
            match transform {
                Some(mat) => {
                    for (slot, tri) in dest.iter_mut().zip(&patch.triangles) {
                        *slot = tri.transformed(mat);
                    }
                }
                None => dest.copy_from_slice(&patch.triangles),
            }
            written += count;
        }

        trace!("triangle query wrote {} of {} slots", written, out.len());
        written
    }
}

impl TriangleSelector for TerrainTriangleSelector {
    fn get_triangles(&self, out: &mut [Triangle3], transform: Option<&Mat4>) -> usize {
        self.collect_patches(out, transform, |_| true)
    }

    fn get_triangles_in_box(&self, out: &mut [Triangle3], aabb: &Aabb3, transform: Option<&Mat4>) -> usize {
        self.collect_patches(out, transform, |patch_box| patch_box.intersects_box(aabb))
    }

    fn get_triangles_on_line(&self, out: &mut [Triangle3], line: &Line3, transform: Option<&Mat4>) -> usize {
        self.collect_patches(out, transform, |patch_box| patch_box.intersects_line(line))
    }

    fn triangle_count(&self) -> usize {
        self.total_triangles
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use glam::Vec3;

    /// A single patch whose index list holds `counts[lod]` triangles.
    struct LodSource {
        counts: Vec<usize>,
        vertices: Vec<Vec3>,
    }

    impl LodSource {
        fn new(counts: &[usize]) -> Self {
            let most = counts.iter().copied().max().unwrap_or(0);
            let vertices = (0..most * 3).map(|i| Vec3::new(i as f32, 0.0, 0.0)).collect();
            Self { counts: counts.to_vec(), vertices }
        }
    }

    impl TerrainPatchSource for LodSource {
        fn patch_count(&self) -> usize {
            1
        }

        fn bounding_box(&self, _x: usize, _z: usize) -> Aabb3 {
            Aabb3::from_points(self.vertices.iter().copied())
        }

        fn indices_for_patch(&self, out: &mut Vec<u32>, _x: usize, _z: usize, lod: Lod) -> usize {
            out.clear();
            let n = self.counts[lod as usize];
            out.extend(0..(n * 3) as u32);
            out.len()
        }

        fn vertices(&self) -> &[Vec3] {
            &self.vertices
        }
    }

    #[test]
    fn test_default_is_empty() {
        let selector = TerrainTriangleSelector::default();
        let mut out = [Triangle3::default(); 4];
        assert_eq!(selector.triangle_count(), 0);
        assert_eq!(selector.num_patches(), 0);
        assert_eq!(selector.get_triangles(&mut out, None), 0);
    }

    #[test]
    fn test_lod_selects_index_list() {
        let source = LodSource::new(&[4, 2]);
        let selector = TerrainTriangleSelector::new(&source, 1);
        assert_eq!(selector.lod(), 1);
        assert_eq!(selector.triangle_count(), 2);
        assert_eq!(selector.patch(0, 0).map(TrianglePatch::triangle_count), Some(2));
        assert!(selector.patch(0, 1).is_none());
    }

    #[test]
    fn test_out_of_range_index_is_skipped() {
        struct Broken;
        impl TerrainPatchSource for Broken {
            fn patch_count(&self) -> usize {
                1
            }
            fn bounding_box(&self, _x: usize, _z: usize) -> Aabb3 {
                Aabb3::default()
            }
            fn indices_for_patch(&self, out: &mut Vec<u32>, _x: usize, _z: usize, _lod: Lod) -> usize {
                out.clear();
                out.extend_from_slice(&[0, 1, 2, 0, 1, 99]);
                out.len()
            }
            fn vertices(&self) -> &[Vec3] {
                &[Vec3::X, Vec3::Y, Vec3::Z]
            }
        }

        let selector = TerrainTriangleSelector::new(&Broken, 0);
        assert_eq!(selector.triangle_count(), 1);
        assert_eq!(selector.patches()[0].triangles[0], Triangle3::new(Vec3::X, Vec3::Y, Vec3::Z));
    }

    #[test]
    fn test_reported_count_larger_than_buffer_is_clamped() {
        struct Overstated;
        impl TerrainPatchSource for Overstated {
            fn patch_count(&self) -> usize {
                1
            }
            fn bounding_box(&self, _x: usize, _z: usize) -> Aabb3 {
                Aabb3::default()
            }
            fn indices_for_patch(&self, out: &mut Vec<u32>, _x: usize, _z: usize, _lod: Lod) -> usize {
                out.clear();
                out.extend_from_slice(&[0, 1, 2]);
                12
            }
            fn vertices(&self) -> &[Vec3] {
                &[Vec3::X, Vec3::Y, Vec3::Z]
            }
        }

        let selector = TerrainTriangleSelector::new(&Overstated, 0);
        assert_eq!(selector.triangle_count(), 1);
    }
}
