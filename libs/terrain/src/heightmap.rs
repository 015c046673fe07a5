use std::sync::{Mutex, OnceLock};
use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::grid::GridTopology;
use crate::mesh::Vertex;
use crate::types::{HeightmapStrategy, ReseedPolicy};

const RANDOM_DIVISOR: f32 = 130.0;

/// Largest magnitude the random strategy can produce.
pub const RANDOM_AMPLITUDE: f32 = 50.0 / RANDOM_DIVISOR;

/// Rewrites vertex elevations in place. X/Z and normals are untouched; the
/// face and normal passes have to be re-run afterwards.
pub fn apply(grid: &GridTopology, vertices: &mut [Vertex], strategy: HeightmapStrategy) {
    match strategy {
        HeightmapStrategy::Sinusoidal => apply_sinusoidal(grid, vertices),
        HeightmapStrategy::Random { reseed } => apply_random(vertices, reseed),
    }
}

fn apply_sinusoidal(grid: &GridTopology, vertices: &mut [Vertex]) {
    let width = grid.vertex_width();
    let s = grid.scale() as f64;
    // One value per column; the z rows all share it.
    let offsets: Vec<f32> = (0..width)
        .map(|x| (0.7 * x as f64 * s).cos() as f32)
        .collect();

    for row in vertices.chunks_exact_mut(width) {
        for (v, dy) in row.iter_mut().zip(&offsets) {
            v.position[1] += dy;
        }
    }
}

fn apply_random(vertices: &mut [Vertex], reseed: ReseedPolicy) {
    match reseed {
        ReseedPolicy::EveryCall => fill_random(vertices, &mut StdRng::seed_from_u64(clock_seed())),
        ReseedPolicy::Fixed(seed) => fill_random(vertices, &mut StdRng::seed_from_u64(seed)),
        ReseedPolicy::OncePerProcess => {
            let shared = process_rng();
            // A poisoned lock still holds a usable generator.
            let mut rng = shared.lock().unwrap_or_else(|e| e.into_inner());
            fill_random(vertices, &mut *rng);
        }
    }
}

fn fill_random(vertices: &mut [Vertex], rng: &mut impl Rng) {
    for v in vertices {
        let roll: i32 = rng.random_range(0..=100);
        v.position[1] = (roll - 50) as f32 / RANDOM_DIVISOR;
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}

fn process_rng() -> &'static Mutex<StdRng> {
    static RNG: OnceLock<Mutex<StdRng>> = OnceLock::new();
    RNG.get_or_init(|| Mutex::new(StdRng::seed_from_u64(clock_seed())))
}
