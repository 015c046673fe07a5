use bevy::asset::io::Reader;
use bevy::asset::{AssetLoader, LoadContext};
use bevy::prelude::*;
use bevy::reflect::TypePath;

use crate::error::TerrainError;
use crate::types::ChunkConfig;

#[derive(Asset, TypePath, Debug, Clone)]
pub struct ChunkConfigAsset(pub ChunkConfig);

#[derive(Default)]
pub struct ChunkConfigAssetLoader;

impl AssetLoader for ChunkConfigAssetLoader {
    type Asset = ChunkConfigAsset;
    type Settings = ();
    type Error = TerrainError;

    async fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &Self::Settings,
        _load_context: &mut LoadContext<'_>,
    ) -> Result<Self::Asset, Self::Error> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).await?;

        let text = std::str::from_utf8(&bytes).map_err(|e| {
            TerrainError::InvalidConfig(format!("terrain config was not valid utf-8: {e}"))
        })?;

        Ok(ChunkConfigAsset(ChunkConfig::from_ron_str(text)?))
    }

    fn extensions(&self) -> &[&str] {
        &["ron"]
    }
}
