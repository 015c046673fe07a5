use bevy::log::debug;
use glam::Vec3;

use crate::error::TerrainError;
use crate::faces::{self, FaceReport};
use crate::grid::GridTopology;
use crate::heightmap;
use crate::mesh::{self, Vertex};
use crate::normals::{self, NormalReport};
use crate::types::{ChunkConfig, HeightmapStrategy, NormalStrategy};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SurfaceReport {
    pub faces: FaceReport,
    pub normals: NormalReport,
}

/// One square terrain tile: vertex, index, face-normal and face-area buffers
/// plus the strategies used to (re)generate them.
///
/// Buffers are sized once from the grid and never change length. Every
/// `&mut self` operation runs to completion before returning, so readers only
/// ever see a fully recomputed surface.
#[derive(Clone, Debug)]
pub struct TerrainChunk {
    grid: GridTopology,
    base_height: f32,
    heightmap: Option<HeightmapStrategy>,
    normal_strategy: NormalStrategy,
    vertices: Vec<Vertex>,
    triangles: Vec<[u32; 3]>,
    face_normals: Vec<Vec3>,
    face_areas: Vec<f32>,
}

impl TerrainChunk {
    /// Allocates and fills the flat grid. No heightmap is applied yet.
    pub fn new(config: &ChunkConfig) -> Result<Self, TerrainError> {
        let grid = config.validate()?;
        let buffers = mesh::build_flat(&grid, config.base_height)?;

        debug!(
            "built terrain chunk: {} cells per side, {} vertices, {} triangles",
            grid.size(),
            grid.vertex_count(),
            grid.triangle_count()
        );

        Ok(Self {
            grid,
            base_height: config.base_height,
            heightmap: config.heightmap,
            normal_strategy: config.normals,
            vertices: buffers.vertices,
            triangles: buffers.triangles,
            face_normals: buffers.face_normals,
            face_areas: buffers.face_areas,
        })
    }

    /// [`Self::new`] followed by [`Self::regenerate`].
    pub fn generate(config: &ChunkConfig) -> Result<Self, TerrainError> {
        let mut chunk = Self::new(config)?;
        chunk.regenerate();
        Ok(chunk)
    }

    /// Resets elevations to the base plane, applies the configured heightmap,
    /// then recomputes face data and vertex normals.
    pub fn regenerate(&mut self) -> SurfaceReport {
        self.reset_heights();
        if let Some(strategy) = self.heightmap {
            self.apply_heightmap(strategy);
        }
        let report = self.recompute_surface();
        debug!(
            "regenerated terrain chunk ({:?}, {:?}): {} degenerate faces, {} fallback normals",
            self.heightmap, self.normal_strategy, report.faces.degenerate, report.normals.degenerate
        );
        report
    }

    /// Moves every vertex back to the base elevation.
    pub fn reset_heights(&mut self) {
        for v in &mut self.vertices {
            v.position[1] = self.base_height;
        }
    }

    /// Overrides one vertex elevation. Call [`Self::recompute_surface`]
    /// afterwards.
    pub fn set_height(&mut self, x: usize, z: usize, height: f32) {
        let i = self.grid.vertex_index(x, z);
        self.vertices[i].position[1] = height;
    }

    /// Perturbs elevations only. Call [`Self::recompute_surface`] afterwards.
    pub fn apply_heightmap(&mut self, strategy: HeightmapStrategy) {
        heightmap::apply(&self.grid, &mut self.vertices, strategy);
    }

    pub fn recompute_faces(&mut self) -> FaceReport {
        faces::recompute(
            &self.vertices,
            &self.triangles,
            &mut self.face_normals,
            &mut self.face_areas,
        )
    }

    pub fn recompute_normals(&mut self) -> NormalReport {
        normals::recompute(
            &self.grid,
            &mut self.vertices,
            &self.face_normals,
            &self.face_areas,
            self.normal_strategy,
        )
    }

    /// Face pass then normal pass; the order the weighted estimator needs.
    pub fn recompute_surface(&mut self) -> SurfaceReport {
        let faces = self.recompute_faces();
        let normals = self.recompute_normals();
        SurfaceReport { faces, normals }
    }

    /// Switches the normal estimator and recomputes the surface with it.
    pub fn set_normal_strategy(&mut self, strategy: NormalStrategy) -> SurfaceReport {
        self.normal_strategy = strategy;
        self.recompute_surface()
    }

    pub fn set_heightmap(&mut self, strategy: Option<HeightmapStrategy>) {
        self.heightmap = strategy;
    }

    pub fn normal_strategy(&self) -> NormalStrategy {
        self.normal_strategy
    }

    pub fn heightmap(&self) -> Option<HeightmapStrategy> {
        self.heightmap
    }

    pub fn grid(&self) -> &GridTopology {
        &self.grid
    }

    /// Cells per side.
    pub fn grid_size(&self) -> u32 {
        self.grid.size()
    }

    pub fn half_grid_size(&self) -> u32 {
        self.grid.half_size()
    }

    pub fn base_height(&self) -> f32 {
        self.base_height
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Vertex buffer as packed `x, y, z, nx, ny, nz` floats.
    pub fn vertex_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    /// Flat index list, three per triangle.
    pub fn indices(&self) -> &[u32] {
        bytemuck::cast_slice(&self.triangles)
    }

    pub fn face_normals(&self) -> &[Vec3] {
        &self.face_normals
    }

    pub fn face_areas(&self) -> &[f32] {
        &self.face_areas
    }

    pub fn positions(&self) -> Vec<[f32; 3]> {
        self.vertices.iter().map(|v| v.position).collect()
    }

    pub fn normals(&self) -> Vec<[f32; 3]> {
        self.vertices.iter().map(|v| v.normal).collect()
    }

    /// Elevation of the rendered surface at local `(x, z)`.
    ///
    /// Interpolates inside whichever of the cell's two triangles contains the
    /// point, so the result matches what is drawn. `None` outside the chunk.
    pub fn height_at(&self, x: f32, z: f32) -> Option<f32> {
        let n = self.grid.size() as f32;
        let fx = x / self.grid.scale() + self.grid.half_size() as f32;
        let fz = z / self.grid.scale() + self.grid.half_size() as f32;
        if !(0.0..=n).contains(&fx) || !(0.0..=n).contains(&fz) {
            return None;
        }

        let last_cell = self.grid.size() as usize - 1;
        let cx = (fx.floor() as usize).min(last_cell);
        let cz = (fz.floor() as usize).min(last_cell);
        let u = fx - cx as f32;
        let v = fz - cz as f32;

        let h = |x: usize, z: usize| self.vertices[self.grid.vertex_index(x, z)].height();
        let hc = h(cx, cz);
        let ha = h(cx + 1, cz);
        let hb = h(cx, cz + 1);
        let hd = h(cx + 1, cz + 1);

        // Cells split along the a-b diagonal: c's triangle below it, d's above.
        let height = if u + v <= 1.0 {
            hc + u * (ha - hc) + v * (hb - hc)
        } else {
            hd + (1.0 - u) * (hb - hd) + (1.0 - v) * (ha - hd)
        };
        Some(height)
    }
}
