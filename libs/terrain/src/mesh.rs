use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::error::TerrainError;
use crate::grid::GridTopology;

/// One entry of the vertex buffer. Laid out as six packed floats so the
/// whole buffer can be handed to a renderer as `&[f32]`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.position[1]
    }

    #[inline]
    pub fn norm(&self) -> Vec3 {
        Vec3::from_array(self.normal)
    }
}

/// Freshly generated flat grid, before any elevation or normal pass.
#[derive(Clone, Debug)]
pub struct MeshBuffers {
    pub vertices: Vec<Vertex>,
    pub triangles: Vec<[u32; 3]>,
    pub face_normals: Vec<Vec3>,
    pub face_areas: Vec<f32>,
}

pub(crate) fn alloc<T>(buffer: &'static str, count: usize) -> Result<Vec<T>, TerrainError> {
    let mut v = Vec::new();
    v.try_reserve_exact(count)
        .map_err(|_| TerrainError::AllocationFailure { buffer, count })?;
    Ok(v)
}

/// Builds a flat grid centred on the origin at elevation `base_height`.
///
/// Each cell with corners `c = (x, z)`, `a = (x+1, z)`, `b = (x, z+1)`,
/// `d = (x+1, z+1)` is split along the `a`-`b` diagonal:
///
/// ```text
///   b --- d
///   |  \  |
///   c --- a
/// ```
///
/// Triangle 0 is stored as `(a, c, b)` and triangle 1 as `(a, b, d)`, which
/// is counter-clockwise seen from +Y in a right-handed Y-up frame.
pub fn build_flat(grid: &GridTopology, base_height: f32) -> Result<MeshBuffers, TerrainError> {
    let width = grid.vertex_width();
    let s = grid.scale();

    let mut vertices = alloc("vertex", grid.vertex_count())?;
    for z in 0..width {
        for x in 0..width {
            vertices.push(Vertex::new(
                Vec3::new(grid.coord(x), base_height, grid.coord(z)),
                Vec3::Y,
            ));
        }
    }

    let n = grid.size() as usize;
    let mut triangles = alloc("index", grid.triangle_count())?;
    for z in 0..n {
        for x in 0..n {
            let c = grid.vertex_index(x, z) as u32;
            let a = grid.vertex_index(x + 1, z) as u32;
            let b = grid.vertex_index(x, z + 1) as u32;
            let d = grid.vertex_index(x + 1, z + 1) as u32;
            triangles.push([a, c, b]);
            triangles.push([a, b, d]);
        }
    }

    let mut face_normals = alloc("face normal", grid.triangle_count())?;
    face_normals.resize(grid.triangle_count(), Vec3::Y);

    let mut face_areas = alloc("face area", grid.triangle_count())?;
    face_areas.resize(grid.triangle_count(), s * s / 2.0);

    Ok(MeshBuffers {
        vertices,
        triangles,
        face_normals,
        face_areas,
    })
}
