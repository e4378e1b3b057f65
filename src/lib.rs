// src/lib.rs

pub mod geometry;
pub mod generator;
pub mod intersection;
pub mod scene_lib;

pub use geometry::{Aabb3, Line3, Triangle3};
pub use scene_lib::{
    HeightmapTerrain, TerrainConfig, TerrainError, TerrainPatchSource, TerrainTriangleSelector,
    TrianglePatch, TriangleSelector,
};
