// src/scene_lib/mod.rs

pub mod patch_source;
pub mod heightmap;
pub mod triangle_selector;

pub use patch_source::{Lod, TerrainPatchSource};
pub use heightmap::{HeightmapTerrain, TerrainConfig, TerrainError};
pub use triangle_selector::{TerrainTriangleSelector, TrianglePatch, TriangleSelector};
