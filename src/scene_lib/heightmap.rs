// src/scene_lib/heightmap.rs

use glam::Vec3;
use log::warn;
use thiserror::Error;

use crate::geometry::Aabb3;
use crate::scene_lib::patch_source::{Lod, TerrainPatchSource};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TerrainError {
    #[error("patch size {0} is not 2^n + 1 (n >= 1)")]
    PatchSize(usize),

    #[error("heightmap holds {actual} samples, a {side}x{side} terrain needs {expected}")]
    HeightmapSize { side: usize, expected: usize, actual: usize },

    #[error("terrain side {side} cannot be split into patches of {patch_size} vertices")]
    SideMismatch { side: usize, patch_size: usize },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerrainConfig {
    /// Vertices along one patch edge, shared with the neighbouring patch.
    pub patch_size: usize,
    pub scale: Vec3,
    pub max_lod: Lod,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            patch_size: 17,
            scale: Vec3::ONE,
            max_lod: 5,
        }
    }
}

impl TerrainConfig {
    pub fn validate(&self) -> Result<(), TerrainError> {
        let cells = self.patch_size.wrapping_sub(1);
        if self.patch_size < 3 || !cells.is_power_of_two() {
            return Err(TerrainError::PatchSize(self.patch_size));
        }
        Ok(())
    }

    /// Side length in vertices of a terrain with `patch_count` patches per edge.
    pub fn side_for(&self, patch_count: usize) -> usize {
        if patch_count == 0 {
            0
        } else {
            patch_count * (self.patch_size - 1) + 1
        }
    }
}

/// Square heightmap split into GeoMipMap patches.
#[derive(Debug)]
pub struct HeightmapTerrain {
    config: TerrainConfig,
    side: usize,
    patch_count: usize,
    max_lod: Lod,
    vertices: Vec<Vec3>,
    patch_boxes: Vec<Aabb3>,
}

impl HeightmapTerrain {
    /// `heights` is row-major by z: sample `(x, z)` lives at `z * side + x`.
    pub fn new(heights: &[f32], side: usize, config: TerrainConfig) -> Result<Self, TerrainError> {
        config.validate()?;

        let expected = side * side;
        if heights.len() != expected {
            return Err(TerrainError::HeightmapSize { side, expected, actual: heights.len() });
        }

        let cells = config.patch_size - 1;
        let patch_count = if side <= 1 {
            0
        } else if (side - 1) % cells == 0 {
            (side - 1) / cells
        } else {
            return Err(TerrainError::SideMismatch { side, patch_size: config.patch_size });
        };

        let mut vertices = Vec::with_capacity(expected);
        for z in 0..side {
            for x in 0..side {
                let h = heights[z * side + x];
                vertices.push(Vec3::new(x as f32, h, z as f32) * config.scale);
            }
        }

        // Deepest LOD still leaving one cell per patch.
        let max_lod = config.max_lod.min(cells.trailing_zeros() + 1);

        let mut terrain = Self {
            config,
            side,
            patch_count,
            max_lod,
            vertices,
            patch_boxes: Vec::with_capacity(patch_count * patch_count),
        };
        for x in 0..patch_count {
            for z in 0..patch_count {
                let aabb = terrain.compute_patch_box(x, z);
                terrain.patch_boxes.push(aabb);
            }
        }
        Ok(terrain)
    }

    pub fn from_fn(
        patch_count: usize,
        config: TerrainConfig,
        mut height: impl FnMut(usize, usize) -> f32,
    ) -> Result<Self, TerrainError> {
        config.validate()?;
        let side = config.side_for(patch_count);
        let mut heights = Vec::with_capacity(side * side);
        for z in 0..side {
            for x in 0..side {
                heights.push(height(x, z));
            }
        }
        Self::new(&heights, side, config)
    }

    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn max_lod(&self) -> Lod {
        self.max_lod
    }

    pub fn height_at(&self, x: usize, z: usize) -> Option<f32> {
        if x >= self.side || z >= self.side {
            return None;
        }
        Some(self.vertices[self.vertex_index(x, z) as usize].y)
    }

    #[inline(always)]
    fn vertex_index(&self, x: usize, z: usize) -> u32 {
        (z * self.side + x) as u32
    }

    fn compute_patch_box(&self, patch_x: usize, patch_z: usize) -> Aabb3 {
        let cells = self.config.patch_size - 1;
        let (x0, z0) = (patch_x * cells, patch_z * cells);
        Aabb3::from_points((z0..=z0 + cells).flat_map(|z| {
            (x0..=x0 + cells).map(move |x| self.vertices[self.vertex_index(x, z) as usize])
        }))
    }
}

impl TerrainPatchSource for HeightmapTerrain {
    fn patch_count(&self) -> usize {
        self.patch_count
    }

    fn bounding_box(&self, x: usize, z: usize) -> Aabb3 {
        self.patch_boxes[x * self.patch_count + z]
    }

    fn indices_for_patch(&self, out: &mut Vec<u32>, patch_x: usize, patch_z: usize, lod: Lod) -> usize {
        out.clear();
        if lod >= self.max_lod {
            warn!("LOD {} out of range for terrain (max {}), patch ({}, {}) left empty", lod, self.max_lod, patch_x, patch_z);
            return 0;
        }

        let cells = self.config.patch_size - 1;
        let step = 1usize << lod;
        let (x0, z0) = (patch_x * cells, patch_z * cells);
        out.reserve((cells / step) * (cells / step) * 6);

        for z in (0..cells).step_by(step) {
            for x in (0..cells).step_by(step) {
                let i11 = self.vertex_index(x0 + x, z0 + z);
                let i21 = self.vertex_index(x0 + x + step, z0 + z);
                let i12 = self.vertex_index(x0 + x, z0 + z + step);
                let i22 = self.vertex_index(x0 + x + step, z0 + z + step);
                out.extend_from_slice(&[i12, i11, i22, i22, i11, i21]);
            }
        }
        out.len()
    }

    fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }
}
