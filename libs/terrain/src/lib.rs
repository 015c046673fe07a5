pub mod assets;
pub mod chunk;
pub mod error;
pub mod faces;
pub mod grid;
pub mod heightmap;
pub mod mesh;
pub mod normals;
pub mod render;
pub mod shading;
pub mod types;

pub use chunk::{SurfaceReport, TerrainChunk};
pub use error::TerrainError;
pub use grid::GridTopology;
pub use mesh::Vertex;
pub use render::{TerrainChunkEntity, TerrainUploadSet};
pub use shading::ChunkShading;
pub use types::*;

use bevy::prelude::*;

pub struct TerrainPlugin {
    /// Chunk config file, relative to the asset root.
    pub config_path: String,
    /// Used when the config file is missing or invalid.
    pub fallback: types::ChunkConfig,
}

impl Default for TerrainPlugin {
    fn default() -> Self {
        Self {
            config_path: "terrain.ron".to_string(),
            fallback: types::ChunkConfig::default(),
        }
    }
}

impl Plugin for TerrainPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(types::TerrainSettings {
            config_path: self.config_path.clone(),
            fallback: self.fallback.clone(),
        })
        .init_asset::<assets::ChunkConfigAsset>()
        .init_asset_loader::<assets::ChunkConfigAssetLoader>()
        .add_systems(Startup, render::setup_terrain_renderer)
        .add_systems(
            Update,
            (
                render::finish_config_load,
                render::upload_dirty_chunks.in_set(TerrainUploadSet),
            )
                .chain(),
        );
    }
}
