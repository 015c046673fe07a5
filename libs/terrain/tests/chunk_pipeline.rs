//! End-to-end checks of the chunk pipeline through the public API:
//! build, perturb, face pass, normal pass.

use glam::Vec3;
use terrain::{
    ChunkConfig, HeightmapStrategy, MissingSample, NormalStrategy, ReseedPolicy, TerrainChunk,
    TerrainError,
};

const EPS: f32 = 1e-5;

fn config(n: u32, s: f32, y0: f32, heightmap: Option<HeightmapStrategy>) -> ChunkConfig {
    ChunkConfig {
        grid_size: n,
        cell_scale: s,
        base_height: y0,
        heightmap,
        ..ChunkConfig::default()
    }
}

fn all_strategies() -> [NormalStrategy; 4] {
    [
        NormalStrategy::FiniteDifference {
            missing: MissingSample::Zero,
        },
        NormalStrategy::FiniteDifference {
            missing: MissingSample::Clamp,
        },
        NormalStrategy::ScaledGradient {
            missing: MissingSample::Clamp,
        },
        NormalStrategy::AngleAreaWeighted,
    ]
}

#[test]
fn test_sizes_for_even_grids() {
    for n in [2u32, 4, 6, 16, 50] {
        let chunk = TerrainChunk::new(&config(n, 1.0, 0.0, None)).unwrap();
        let n = n as usize;
        assert_eq!(chunk.vertices().len(), (n + 1) * (n + 1));
        assert_eq!(chunk.triangles().len(), 2 * n * n);
        assert_eq!(chunk.indices().len(), 6 * n * n);
    }
}

#[test]
fn test_invalid_sizes_are_rejected() {
    for n in [0u32, 1, 9] {
        let result = TerrainChunk::new(&config(n, 1.0, 0.0, None));
        assert!(
            matches!(result, Err(TerrainError::InvalidGridSize { .. })),
            "size {n} should be rejected"
        );
    }
}

#[test]
fn test_deterministic_scenario() {
    let mut chunk = TerrainChunk::new(&config(2, 1.0, 0.0, None)).unwrap();
    assert_eq!(chunk.vertices().len(), 9);
    assert_eq!(chunk.triangles().len(), 8);

    chunk.apply_heightmap(HeightmapStrategy::Sinusoidal);
    for z in 0..=2 {
        let v = chunk.vertices()[chunk.grid().vertex_index(0, z)];
        assert_eq!(v.height(), 1.0, "row {z}");
    }
    for x in 0..=2 {
        let top = chunk.vertices()[chunk.grid().vertex_index(x, 0)].height();
        for z in 1..=2 {
            assert_eq!(chunk.vertices()[chunk.grid().vertex_index(x, z)].height(), top);
        }
    }
}

#[test]
fn test_indices_in_range_and_ccw() {
    let chunk = TerrainChunk::new(&config(12, 0.5, 0.0, None)).unwrap();
    let limit = chunk.vertices().len() as u32;
    assert!(chunk.indices().iter().all(|&i| i < limit));
    for tri in chunk.triangles() {
        let [a, b, c] = tri.map(|i| chunk.vertices()[i as usize].pos());
        // Signed area of the XZ projection seen from +Y.
        let signed = (b - a).cross(c - a).y / 2.0;
        assert!(signed > 0.0, "{tri:?} has signed area {signed}");
    }
}

#[test]
fn test_full_pipeline_unit_normals_for_every_strategy() {
    let heightmaps = [
        HeightmapStrategy::Sinusoidal,
        HeightmapStrategy::Random {
            reseed: ReseedPolicy::Fixed(2024),
        },
    ];
    for heightmap in heightmaps {
        for normals in all_strategies() {
            let chunk = TerrainChunk::generate(&ChunkConfig {
                normals,
                ..config(20, 1.0, 0.0, Some(heightmap))
            })
            .unwrap();

            for (i, n) in chunk.face_normals().iter().enumerate() {
                assert!((n.length() - 1.0).abs() < EPS, "face {i}: {n}");
            }
            for (i, v) in chunk.vertices().iter().enumerate() {
                let len = v.norm().length();
                assert!(
                    (len - 1.0).abs() < EPS,
                    "{heightmap:?}/{normals:?} vertex {i} length {len}"
                );
            }
        }
    }
}

#[test]
fn test_face_areas_use_raw_cross_product() {
    let chunk = TerrainChunk::generate(&config(
        10,
        2.0,
        0.0,
        Some(HeightmapStrategy::Random {
            reseed: ReseedPolicy::Fixed(1),
        }),
    ))
    .unwrap();
    for (tri, area) in chunk.triangles().iter().zip(chunk.face_areas()) {
        let [a, b, c] = tri.map(|i| chunk.vertices()[i as usize].pos());
        let expected = (b - a).cross(c - a).length() / 2.0;
        assert!((area - expected).abs() < 1e-5, "{area} vs {expected}");
        // Never the ~0.5 a normalized vector would give for 2x2 cells.
        assert!(*area >= 2.0 - 1e-5);
    }
}

#[test]
fn test_face_pass_is_idempotent() {
    let mut chunk = TerrainChunk::generate(&config(
        8,
        1.0,
        0.0,
        Some(HeightmapStrategy::Sinusoidal),
    ))
    .unwrap();
    let normals = chunk.face_normals().to_vec();
    let areas = chunk.face_areas().to_vec();
    chunk.recompute_faces();
    for (a, b) in normals.iter().zip(chunk.face_normals()) {
        assert!((*a - *b).length() <= 1e-6);
    }
    for (a, b) in areas.iter().zip(chunk.face_areas()) {
        assert!((a - b).abs() <= 1e-6);
    }
}

#[test]
fn test_random_elevations_bounded_for_many_seeds() {
    let bound = 50.0 / 130.0;
    let mut chunk = TerrainChunk::new(&config(2, 1.0, 0.0, None)).unwrap();
    for seed in 0..1000 {
        chunk.apply_heightmap(HeightmapStrategy::Random {
            reseed: ReseedPolicy::Fixed(seed),
        });
        for v in chunk.vertices() {
            assert!(
                (-bound..=bound).contains(&v.height()),
                "seed {seed}: {}",
                v.height()
            );
        }
    }
}

#[test]
fn test_corner_normals_with_missing_neighbours() {
    let chunk = TerrainChunk::generate(&ChunkConfig {
        normals: NormalStrategy::FiniteDifference {
            missing: MissingSample::Zero,
        },
        ..config(2, 1.0, 0.0, Some(HeightmapStrategy::Sinusoidal))
    })
    .unwrap();
    let grid = *chunk.grid();
    for (x, z) in [(0, 0), (2, 0), (0, 2), (2, 2)] {
        let n = chunk.vertices()[grid.vertex_index(x, z)].norm();
        assert!(n.is_finite());
        assert!((n.length() - 1.0).abs() < EPS, "corner ({x}, {z}): {n}");
    }
    // Corner (0, 0): left and up read 0, right is cos(0.7), down is cos(0).
    let right = (0.7f64).cos() as f32;
    let expected = Vec3::new(0.0 - right, 2.0, 1.0 - 0.0).normalize();
    let n = chunk.vertices()[grid.vertex_index(0, 0)].norm();
    assert!((n - expected).length() < EPS, "{n} vs {expected}");
}

#[test]
fn test_extreme_elevations_never_produce_nan() {
    let mut base = TerrainChunk::new(&config(4, 1.0, 0.0, None)).unwrap();
    base.set_height(2, 2, 3e30);
    base.set_height(1, 2, -3e30);
    base.set_height(3, 3, f32::MAX);
    for normals in all_strategies() {
        let mut chunk = base.clone();
        let report = chunk.set_normal_strategy(normals);
        assert!(report.faces.degenerate > 0);
        for v in chunk.vertices() {
            assert!(v.norm().is_finite(), "{normals:?}: {:?}", v.normal);
            assert!((v.norm().length() - 1.0).abs() < EPS);
        }
        assert!(chunk.face_normals().iter().all(|n| n.is_finite()));
        assert!(chunk.face_areas().iter().all(|a| a.is_finite()));
    }
}

#[test]
fn test_height_at_matches_vertices_and_bounds() {
    let chunk = TerrainChunk::generate(&config(
        8,
        1.5,
        2.0,
        Some(HeightmapStrategy::Sinusoidal),
    ))
    .unwrap();
    for v in chunk.vertices() {
        let [x, y, z] = v.position;
        let h = chunk.height_at(x, z).unwrap();
        assert!((h - y).abs() < 1e-4, "({x}, {z}): {h} vs {y}");
    }
    let edge = chunk.grid().half_extent();
    assert!(chunk.height_at(edge + 0.1, 0.0).is_none());
    assert!(chunk.height_at(0.0, -edge - 0.1).is_none());
}

#[test]
fn test_config_file_drives_generation() {
    let text = r#"(
        grid_size: 6,
        cell_scale: 1.0,
        base_height: 0.0,
        heightmap: Some(Random(reseed: Fixed(77))),
        normals: AngleAreaWeighted,
    )"#;
    let config = ChunkConfig::from_ron_str(text).unwrap();
    let a = TerrainChunk::generate(&config).unwrap();
    let b = TerrainChunk::generate(&config).unwrap();
    assert_eq!(a.vertices(), b.vertices());
    assert_eq!(a.normal_strategy(), NormalStrategy::AngleAreaWeighted);
}

#[test]
fn test_default_normals_use_down_minus_up_with_fixed_rise() {
    let mut chunk = TerrainChunk::new(&config(2, 2.0, 0.0, None)).unwrap();
    for z in 0..=2 {
        for x in 0..=2 {
            chunk.set_height(x, z, z as f32);
        }
    }
    chunk.recompute_surface();
    assert_eq!(chunk.normal_strategy(), NormalStrategy::default());

    // Interior vertex: up reads 0, down reads 2, rise stays 2 at any scale.
    let n = chunk.vertices()[chunk.grid().vertex_index(1, 1)].norm();
    let expected = Vec3::new(0.0, 2.0, 2.0).normalize();
    assert!((n - expected).length() < EPS, "{n} vs {expected}");
}
