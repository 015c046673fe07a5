use bevy::asset::RenderAssetUsages;
use bevy::mesh::{Indices, PrimitiveTopology, VertexAttributeValues};
use bevy::prelude::*;
use glam::{Mat4, Vec3};

use crate::assets::ChunkConfigAsset;
use crate::chunk::{SurfaceReport, TerrainChunk};
use crate::shading::ChunkShading;
use crate::types::{ChunkConfig, TerrainSettings};

/// Systems that push CPU-side chunk changes to the GPU. Anything that mutates
/// a chunk during a frame must run before this set.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct TerrainUploadSet;

/// A spawned chunk: its geometry, its uniforms and the mesh it is drawn from.
#[derive(Component)]
pub struct TerrainChunkEntity {
    pub chunk: TerrainChunk,
    pub shading: ChunkShading,
    mesh: Handle<Mesh>,
    dirty: bool,
}

impl TerrainChunkEntity {
    /// Flags the chunk for re-upload after an edit made through `chunk`.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn regenerate(&mut self) -> SurfaceReport {
        self.dirty = true;
        self.chunk.regenerate()
    }

    /// Terrain elevation under world `(x, z)`, in world units.
    pub fn height_at_world(&self, x: f32, z: f32) -> Option<f32> {
        let local = self.shading.to_local(Vec3::new(x, 0.0, z));
        let h = self.chunk.height_at(local.x, local.z)?;
        Some(self.shading.to_world(Vec3::new(local.x, h, local.z)).y)
    }
}

#[derive(Resource, Clone)]
pub struct ChunkConfigHandle(pub Handle<ChunkConfigAsset>);

pub fn setup_terrain_renderer(
    mut commands: Commands,
    settings: Res<TerrainSettings>,
    asset_server: Res<AssetServer>,
) {
    let handle: Handle<ChunkConfigAsset> = asset_server.load(settings.config_path.clone());
    commands.insert_resource(ChunkConfigHandle(handle));
}

/// Waits for the chunk config to load (or fail), then builds and spawns the
/// chunk. A missing or invalid file falls back to the plugin's config.
pub fn finish_config_load(
    mut commands: Commands,
    handle: Option<Res<ChunkConfigHandle>>,
    configs: Res<Assets<ChunkConfigAsset>>,
    asset_server: Res<AssetServer>,
    settings: Res<TerrainSettings>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let Some(handle) = handle else {
        return;
    };

    let config = match configs.get(&handle.0) {
        Some(asset) => asset.0.clone(),
        None => match asset_server.get_load_state(handle.0.id()) {
            Some(bevy::asset::LoadState::Failed(err)) => {
                warn!(
                    "failed to load terrain config '{}': {err}; using built-in defaults",
                    settings.config_path
                );
                settings.fallback.clone()
            }
            _ => return,
        },
    };
    commands.remove_resource::<ChunkConfigHandle>();

    let chunk = match TerrainChunk::generate(&config) {
        Ok(chunk) => chunk,
        Err(err) => {
            error!("failed to build terrain chunk: {err}");
            return;
        }
    };
    info!(
        "terrain chunk ready: {} cells per side at scale {}",
        chunk.grid_size(),
        config.cell_scale
    );

    spawn_chunk(&mut commands, &mut meshes, &mut materials, chunk, &config);
    commands.insert_resource(config);
}

fn spawn_chunk(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    chunk: TerrainChunk,
    config: &ChunkConfig,
) -> Entity {
    let (r, g, b) = config.color;
    let shading = ChunkShading::new(Mat4::IDENTITY, Vec3::new(r, g, b));
    let mesh = meshes.add(mesh_from_chunk(&chunk));
    let material = materials.add(StandardMaterial {
        base_color: Color::srgb(shading.color.x, shading.color.y, shading.color.z),
        perceptual_roughness: 1.0,
        ..default()
    });

    commands
        .spawn((
            Mesh3d(mesh.clone()),
            MeshMaterial3d(material),
            Transform::from_matrix(shading.model()),
            TerrainChunkEntity {
                chunk,
                shading,
                mesh,
                dirty: false,
            },
        ))
        .id()
}

/// Re-uploads vertex data for chunks edited this frame and keeps the entity
/// transform in step with the chunk's model matrix.
pub fn upload_dirty_chunks(
    mut meshes: ResMut<Assets<Mesh>>,
    mut q: Query<(&mut TerrainChunkEntity, &mut Transform)>,
) {
    for (mut entity, mut transform) in q.iter_mut() {
        if !entity.dirty {
            continue;
        }
        if let Some(mesh) = meshes.get_mut(&entity.mesh) {
            write_vertex_attributes(mesh, &entity.chunk);
        }
        *transform = Transform::from_matrix(entity.shading.model());
        entity.dirty = false;
    }
}

pub fn mesh_from_chunk(chunk: &TerrainChunk) -> Mesh {
    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::default(),
    );
    write_vertex_attributes(&mut mesh, chunk);
    mesh.insert_indices(Indices::U32(chunk.indices().to_vec()));
    mesh
}

/// Indices never change for a chunk, so only positions and normals are
/// rewritten.
fn write_vertex_attributes(mesh: &mut Mesh, chunk: &TerrainChunk) {
    mesh.insert_attribute(
        Mesh::ATTRIBUTE_POSITION,
        VertexAttributeValues::Float32x3(chunk.positions()),
    );
    mesh.insert_attribute(
        Mesh::ATTRIBUTE_NORMAL,
        VertexAttributeValues::Float32x3(chunk.normals()),
    );
}
