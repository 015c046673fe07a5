use bevy::log::debug;
use glam::Vec3;

use crate::mesh::Vertex;

/// Squared cross-product length at or below which a triangle counts as
/// collapsed. Non-finite lengths (overflowed elevations) are treated the same.
const DEGENERATE_EPSILON_SQ: f32 = 1e-20;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FaceReport {
    /// Faces that fell back to area 0 and an up normal.
    pub degenerate: usize,
}

/// Normal and area of the triangle `(p0, p1, p2)`.
///
/// The area comes from the raw cross product, before normalization.
/// Collapsed triangles yield `(Vec3::Y, 0.0)` and `false`.
#[inline]
pub fn face_geometry(p0: Vec3, p1: Vec3, p2: Vec3) -> (Vec3, f32, bool) {
    let raw = (p1 - p0).cross(p2 - p0);
    let len_sq = raw.length_squared();
    if !(len_sq > DEGENERATE_EPSILON_SQ && len_sq.is_finite()) {
        return (Vec3::Y, 0.0, false);
    }
    let len = len_sq.sqrt();
    (raw / len, len * 0.5, true)
}

/// Recomputes every face normal and area from the current vertex positions.
pub fn recompute(
    vertices: &[Vertex],
    triangles: &[[u32; 3]],
    face_normals: &mut [Vec3],
    face_areas: &mut [f32],
) -> FaceReport {
    debug_assert_eq!(triangles.len(), face_normals.len());
    debug_assert_eq!(triangles.len(), face_areas.len());

    let mut report = FaceReport::default();
    for ((tri, normal), area) in triangles
        .iter()
        .zip(face_normals.iter_mut())
        .zip(face_areas.iter_mut())
    {
        let [p0, p1, p2] = tri.map(|i| vertices[i as usize].pos());
        let (n, a, ok) = face_geometry(p0, p1, p2);
        *normal = n;
        *area = a;
        if !ok {
            report.degenerate += 1;
        }
    }

    if report.degenerate > 0 {
        debug!(
            "{} of {} terrain faces are degenerate; using up normal and zero area",
            report.degenerate,
            triangles.len()
        );
    }
    report
}
