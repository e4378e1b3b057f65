// src/main.rs

use anyhow::{Context, Result};
use glam::{Mat4, Vec3};
use log::info;
use rand::{rngs::StdRng, SeedableRng};

use terrain_selector::generator::HeightmapGenerator;
use terrain_selector::{
    Aabb3, Line3, TerrainConfig, TerrainPatchSource, TerrainTriangleSelector, Triangle3,
    TriangleSelector,
};

const DEFAULT_PATCHES: usize = 8;
const DEFAULT_LOD: u32 = 1;
const HILL_AMPLITUDE: f32 = 12.0;

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(value) => value.parse().with_context(|| format!("parsing {}={:?}", name, value)),
        Err(_) => Ok(default),
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let patches: usize = env_or("TERRAIN_PATCHES", DEFAULT_PATCHES)?;
    let lod: u32 = env_or("TERRAIN_LOD", DEFAULT_LOD)?;
    let config = TerrainConfig {
        scale: Vec3::new(4.0, 1.0, 4.0),
        ..Default::default()
    };

    let mut rng = StdRng::seed_from_u64(0x7e77a1);
    let terrain = HeightmapGenerator::generate_terrain(&mut rng, patches, HILL_AMPLITUDE, config)
        .context("building heightmap terrain")?;
    info!("terrain: {} x {} patches, {} vertices", terrain.patch_count(), terrain.patch_count(), terrain.vertices().len());

    let mut selector = TerrainTriangleSelector::new(&terrain, lod);
    info!("LOD {}: {} triangles", selector.lod(), selector.triangle_count());

    let mut buffer = vec![Triangle3::default(); selector.triangle_count()];

    let written = selector.get_triangles(&mut buffer, None);
    info!("all triangles: {}", written);

    let extent = terrain.side().saturating_sub(1) as f32 * config.scale.x;
    let probe = Aabb3::new(
        Vec3::new(extent * 0.25, -HILL_AMPLITUDE * 2.0, extent * 0.25),
        Vec3::new(extent * 0.3, HILL_AMPLITUDE * 2.0, extent * 0.3),
    );
    let world = Mat4::from_translation(Vec3::new(-extent * 0.5, 0.0, -extent * 0.5));
    let written = selector.get_triangles_in_box(&mut buffer, &probe, Some(&world));
    info!("triangles near {:?}: {}", probe, written);

    // Pick straight down through the middle: coarse patch query, then exact test.
    let center = Vec3::new(extent * 0.5, 0.0, extent * 0.5);
    let ray = Line3::new(center + Vec3::Y * 100.0, center - Vec3::Y * 100.0);
    let written = selector.get_triangles_on_line(&mut buffer, &ray, None);
    let hit = buffer[..written]
        .iter()
        .filter_map(|tri| tri.intersect_line(&ray))
        .max_by(|a, b| a.y.total_cmp(&b.y));
    match hit {
        Some(point) => info!("pick: {} candidate triangles, ground at {}", written, point),
        None => info!("pick: {} candidate triangles, no ground hit", written),
    }

    for coarser in lod + 1..terrain.max_lod() {
        selector.set_triangle_data(&terrain, coarser);
        info!("LOD {}: {} triangles", coarser, selector.triangle_count());
    }

    Ok(())
}
