use bevy::prelude::*;

use terrain::TerrainChunkEntity;

/// `R` regenerates every chunk with its configured strategies, `N` moves
/// every chunk to the next normal strategy. Both mark the chunk for upload.
pub fn terrain_hotkeys(keys: Res<ButtonInput<KeyCode>>, mut chunks: Query<&mut TerrainChunkEntity>) {
    if keys.just_pressed(KeyCode::KeyR) {
        for mut entity in chunks.iter_mut() {
            let report = entity.regenerate();
            info!(
                "terrain regenerated ({} degenerate faces, {} fallback normals)",
                report.faces.degenerate, report.normals.degenerate
            );
        }
    }

    if keys.just_pressed(KeyCode::KeyN) {
        for mut entity in chunks.iter_mut() {
            let next = entity.chunk.normal_strategy().next();
            entity.chunk.set_normal_strategy(next);
            entity.mark_dirty();
            info!("terrain normals now use {next:?}");
        }
    }
}
