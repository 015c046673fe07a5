use bevy::log::debug;
use glam::Vec3;

use crate::grid::GridTopology;
use crate::mesh::Vertex;
use crate::types::{MissingSample, NormalStrategy};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NormalReport {
    /// Vertices whose estimate had no usable direction and fell back to +Y.
    pub degenerate: usize,
}

/// Grid neighbours of a vertex, in rotational order around it.
const RING: [(i64, i64); 6] = [(1, 0), (1, -1), (0, -1), (-1, 0), (-1, 1), (0, 1)];

/// Face bounded by `RING[i]`, `RING[i + 1]` and the centre vertex, given as
/// the cell offset from the centre and the triangle slot within that cell.
const WEDGE_FACES: [(i64, i64, usize); 6] = [
    (0, -1, 1),
    (0, -1, 0),
    (-1, -1, 1),
    (-1, 0, 0),
    (-1, 0, 1),
    (0, 0, 0),
];

/// Recomputes every vertex normal with `strategy`. Face data must be current
/// for [`NormalStrategy::AngleAreaWeighted`].
pub fn recompute(
    grid: &GridTopology,
    vertices: &mut [Vertex],
    face_normals: &[Vec3],
    face_areas: &[f32],
    strategy: NormalStrategy,
) -> NormalReport {
    let report = match strategy {
        NormalStrategy::FiniteDifference { missing } => {
            finite_difference(grid, vertices, missing, |left, right, up, down| {
                Vec3::new(left - right, 2.0, down - up)
            })
        }
        NormalStrategy::ScaledGradient { missing } => {
            let rise = 2.0 * grid.scale();
            finite_difference(grid, vertices, missing, |left, right, up, down| {
                Vec3::new(left - right, rise, up - down)
            })
        }
        NormalStrategy::AngleAreaWeighted => {
            angle_area_weighted(grid, vertices, face_normals, face_areas)
        }
    };

    if report.degenerate > 0 {
        debug!(
            "{} of {} terrain vertex normals fell back to +Y ({:?})",
            report.degenerate,
            vertices.len(),
            strategy
        );
    }
    report
}

fn sample_height(
    grid: &GridTopology,
    vertices: &[Vertex],
    x: i64,
    z: i64,
    missing: MissingSample,
) -> f32 {
    if let Some(i) = grid.checked_vertex_index(x, z) {
        return vertices[i].height();
    }
    match missing {
        MissingSample::Zero => 0.0,
        MissingSample::Clamp => {
            let max = grid.size() as i64;
            let i = grid.vertex_index(x.clamp(0, max) as usize, z.clamp(0, max) as usize);
            vertices[i].height()
        }
    }
}

/// Builds each normal from the four axis neighbours of a vertex, passed to
/// `direction` as `(left, right, up, down)` heights.
fn finite_difference(
    grid: &GridTopology,
    vertices: &mut [Vertex],
    missing: MissingSample,
    direction: impl Fn(f32, f32, f32, f32) -> Vec3,
) -> NormalReport {
    let mut report = NormalReport::default();
    let width = grid.vertex_width();

    for z in 0..width {
        for x in 0..width {
            let (xi, zi) = (x as i64, z as i64);
            let left = sample_height(grid, vertices, xi - 1, zi, missing);
            let right = sample_height(grid, vertices, xi + 1, zi, missing);
            let up = sample_height(grid, vertices, xi, zi - 1, missing);
            let down = sample_height(grid, vertices, xi, zi + 1, missing);

            let normal = match direction(left, right, up, down).try_normalize() {
                Some(n) => n,
                None => {
                    report.degenerate += 1;
                    Vec3::Y
                }
            };
            vertices[grid.vertex_index(x, z)].normal = normal.to_array();
        }
    }
    report
}

/// Sum of incident face normals weighted by face area and by the angle each
/// face subtends at the vertex.
///
/// Wedges whose face lies outside the grid are skipped; this is the same as
/// substituting the nearest valid neighbour for the missing one, which makes
/// that wedge's angle zero.
fn angle_area_weighted(
    grid: &GridTopology,
    vertices: &mut [Vertex],
    face_normals: &[Vec3],
    face_areas: &[f32],
) -> NormalReport {
    let mut report = NormalReport::default();
    let width = grid.vertex_width();

    for z in 0..width {
        for x in 0..width {
            let (xi, zi) = (x as i64, z as i64);
            let centre = vertices[grid.vertex_index(x, z)].pos();

            let edges = RING.map(|(dx, dz)| {
                grid.checked_vertex_index(xi + dx, zi + dz)
                    .and_then(|i| (vertices[i].pos() - centre).try_normalize())
            });

            let mut sum = Vec3::ZERO;
            for (i, &(cx, cz, k)) in WEDGE_FACES.iter().enumerate() {
                let Some(face) = grid.checked_face_index(xi + cx, zi + cz, k) else {
                    continue;
                };
                let (Some(e0), Some(e1)) = (edges[i], edges[(i + 1) % 6]) else {
                    continue;
                };
                let theta = e0.dot(e1).clamp(-1.0, 1.0).acos();
                sum += theta * face_areas[face] * face_normals[face];
            }

            let normal = match sum.try_normalize() {
                Some(n) => n,
                None => {
                    report.degenerate += 1;
                    Vec3::Y
                }
            };
            vertices[grid.vertex_index(x, z)].normal = normal.to_array();
        }
    }
    report
}
