use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::TerrainError;
use crate::grid::GridTopology;

// --- Config ---

#[derive(Resource, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkConfig {
    /// Cells per side. Must be even.
    pub grid_size: u32,
    /// World units per cell.
    pub cell_scale: f32,
    /// Elevation of the initial flat plane.
    pub base_height: f32,
    /// `None` keeps the chunk flat.
    pub heightmap: Option<HeightmapStrategy>,
    pub normals: NormalStrategy,
    /// Base colour (sRGB), uploaded as the flat material colour.
    pub color: (f32, f32, f32),
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            grid_size: 64,
            cell_scale: 2.0,
            base_height: 0.0,
            heightmap: Some(HeightmapStrategy::Sinusoidal),
            normals: NormalStrategy::default(),
            color: (0.105, 0.713, 0.227),
        }
    }
}

impl ChunkConfig {
    pub fn from_ron_str(text: &str) -> Result<Self, TerrainError> {
        let config: ChunkConfig = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every field and returns the grid the config describes. Grid
    /// shape rules live in [`GridTopology::new`].
    pub fn validate(&self) -> Result<GridTopology, TerrainError> {
        if !self.base_height.is_finite() {
            return Err(TerrainError::InvalidConfig(format!(
                "base_height must be finite, got {}",
                self.base_height
            )));
        }
        let (r, g, b) = self.color;
        if ![r, g, b].iter().all(|c| (0.0..=1.0).contains(c)) {
            return Err(TerrainError::InvalidConfig(format!(
                "color components must be in [0, 1], got ({r}, {g}, {b})"
            )));
        }
        GridTopology::new(self.grid_size, self.cell_scale)
    }
}

/// Where the renderer looks for the chunk config, and what it uses when the
/// file cannot be loaded.
#[derive(Resource, Clone, Debug)]
pub struct TerrainSettings {
    /// Path relative to the Bevy asset root (the `assets/` folder).
    pub config_path: String,
    pub fallback: ChunkConfig,
}

// --- Strategies ---

/// How vertex elevations are perturbed after the flat grid is built.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum HeightmapStrategy {
    /// `y += cos(0.7 * x * s)` per grid column `x`. Reproducible.
    Sinusoidal,
    /// `y = (uniform(0..=100) - 50) / 130`, replacing the base elevation.
    Random { reseed: ReseedPolicy },
}

/// Where the random heightmap takes its generator from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReseedPolicy {
    /// Fresh generator seeded from the wall clock on every application.
    #[default]
    EveryCall,
    /// One wall-clock-seeded generator shared for the life of the process.
    OncePerProcess,
    Fixed(u64),
}

/// How per-vertex normals are derived.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NormalStrategy {
    /// `normalize(left - right, 2, down - up)` from the four axis neighbours,
    /// independent of the cell size.
    FiniteDifference { missing: MissingSample },
    /// Central-difference gradient scaled by the cell size:
    /// `normalize(left - right, 2s, up - down)`.
    ScaledGradient { missing: MissingSample },
    AngleAreaWeighted,
}

impl Default for NormalStrategy {
    fn default() -> Self {
        Self::FiniteDifference {
            missing: MissingSample::Zero,
        }
    }
}

impl NormalStrategy {
    /// Cycles through the available strategies (used by the host's toggle key).
    pub fn next(self) -> Self {
        match self {
            Self::FiniteDifference {
                missing: MissingSample::Zero,
            } => Self::FiniteDifference {
                missing: MissingSample::Clamp,
            },
            Self::FiniteDifference {
                missing: MissingSample::Clamp,
            } => Self::ScaledGradient {
                missing: MissingSample::Clamp,
            },
            Self::ScaledGradient { .. } => Self::AngleAreaWeighted,
            Self::AngleAreaWeighted => Self::default(),
        }
    }
}

/// Height used by the finite-difference estimator for neighbours off the grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissingSample {
    /// Missing neighbours read as height 0.
    #[default]
    Zero,
    /// Missing neighbours read as the nearest in-grid sample.
    Clamp,
}
