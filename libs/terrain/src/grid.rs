use crate::error::TerrainError;

/// Floats per vertex record in the flat upload view (position + normal).
pub const VERTEX_STRIDE: usize = 6;

/// Sizing and indexing for a square grid of `size` x `size` cells.
///
/// Every component that needs to turn a grid coordinate into a buffer
/// position goes through this type.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridTopology {
    size: u32,
    scale: f32,
}

impl GridTopology {
    /// Odd sizes are rejected rather than clamped: the grid is centred on the
    /// origin and `size / 2` must land on a vertex.
    pub fn new(size: u32, scale: f32) -> Result<Self, TerrainError> {
        if size == 0 {
            return Err(TerrainError::InvalidGridSize {
                size,
                reason: "grid must have at least one cell per side",
            });
        }
        if size % 2 != 0 {
            return Err(TerrainError::InvalidGridSize {
                size,
                reason: "grid size must be even",
            });
        }
        if !scale.is_finite() || scale <= 0.0 {
            return Err(TerrainError::InvalidGridSize {
                size,
                reason: "cell scale must be finite and positive",
            });
        }

        // Indices are u32 and the flat float view must still be addressable.
        let width = size as u64 + 1;
        let vertices = width * width;
        if vertices > u32::MAX as u64 || vertices * VERTEX_STRIDE as u64 > usize::MAX as u64 {
            return Err(TerrainError::InvalidGridSize {
                size,
                reason: "vertex count does not fit u32 indices",
            });
        }

        Ok(Self { size, scale })
    }

    /// Cells per side (`N`).
    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn half_size(&self) -> u32 {
        self.size / 2
    }

    /// World units per cell (`s`).
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Vertices per side (`N + 1`).
    pub fn vertex_width(&self) -> usize {
        self.size as usize + 1
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_width() * self.vertex_width()
    }

    pub fn cell_count(&self) -> usize {
        self.size as usize * self.size as usize
    }

    pub fn triangle_count(&self) -> usize {
        2 * self.cell_count()
    }

    pub fn index_count(&self) -> usize {
        3 * self.triangle_count()
    }

    /// Record index of vertex `(x, z)`; `z` is the outer (row) axis.
    #[inline]
    pub fn vertex_index(&self, x: usize, z: usize) -> usize {
        debug_assert!(x < self.vertex_width() && z < self.vertex_width());
        z * self.vertex_width() + x
    }

    /// Offset of vertex `(x, z)` in the flat stride-6 float view.
    #[inline]
    pub fn float_offset(&self, x: usize, z: usize) -> usize {
        VERTEX_STRIDE * self.vertex_index(x, z)
    }

    /// Vertex index of a signed coordinate, `None` when it falls off the grid.
    #[inline]
    pub fn checked_vertex_index(&self, x: i64, z: i64) -> Option<usize> {
        let w = self.vertex_width() as i64;
        if x < 0 || z < 0 || x >= w || z >= w {
            return None;
        }
        Some(self.vertex_index(x as usize, z as usize))
    }

    /// Triangle `k` (0 or 1) of cell `(cell_x, cell_z)`.
    #[inline]
    pub fn face_index(&self, cell_x: usize, cell_z: usize, k: usize) -> usize {
        debug_assert!(k < 2);
        2 * (cell_z * self.size as usize + cell_x) + k
    }

    /// Signed variant of [`Self::face_index`] for neighbourhood walks.
    #[inline]
    pub fn checked_face_index(&self, cell_x: i64, cell_z: i64, k: usize) -> Option<usize> {
        let n = self.size as i64;
        if cell_x < 0 || cell_z < 0 || cell_x >= n || cell_z >= n {
            return None;
        }
        Some(self.face_index(cell_x as usize, cell_z as usize, k))
    }

    /// Local-space X (or Z) coordinate of grid column (or row) `i`.
    #[inline]
    pub fn coord(&self, i: usize) -> f32 {
        (i as f32 - self.half_size() as f32) * self.scale
    }

    /// Half the side length of the chunk in world units.
    pub fn half_extent(&self) -> f32 {
        self.half_size() as f32 * self.scale
    }
}
