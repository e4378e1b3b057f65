// src/generator.rs

use rand::Rng;
use crate::scene_lib::heightmap::{HeightmapTerrain, TerrainConfig, TerrainError};

pub struct HeightmapGenerator;

impl HeightmapGenerator {
    /// Rolling hills: a few random sine octaves plus per-sample jitter.
    pub fn generate_heights(
        rng: &mut impl Rng,
        side: usize,
        amplitude: f32,
    ) -> Vec<f32> {
        const OCTAVES: usize = 3;

        let mut waves = Vec::with_capacity(OCTAVES);
        for octave in 0..OCTAVES {
            let frequency = (octave + 1) as f32 * std::f32::consts::PI / side.max(1) as f32;
            let phase_x = rng.gen_range(0.0..std::f32::consts::TAU);
            let phase_z = rng.gen_range(0.0..std::f32::consts::TAU);
            waves.push((frequency, phase_x, phase_z, amplitude / (octave + 1) as f32));
        }

        let jitter = amplitude * 0.02;
        let mut heights = Vec::with_capacity(side * side);
        for z in 0..side {
            for x in 0..side {
                let mut h = 0.0;
                for &(frequency, phase_x, phase_z, amp) in &waves {
                    h += amp * (x as f32 * frequency + phase_x).sin() * (z as f32 * frequency + phase_z).cos();
                }
                if jitter > 0.0 {
                    h += rng.gen_range(-jitter..jitter);
                }
                heights.push(h);
            }
        }
        heights
    }

    pub fn generate_terrain(
        rng: &mut impl Rng,
        patch_count: usize,
        amplitude: f32,
        config: TerrainConfig,
    ) -> Result<HeightmapTerrain, TerrainError> {
        config.validate()?;
        let side = config.side_for(patch_count);
        let heights = Self::generate_heights(rng, side, amplitude);
        HeightmapTerrain::new(&heights, side, config)
    }
}
