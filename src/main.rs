use bevy::prelude::*;

mod game;

use game::GamePlugin;

fn main() {
    App::new()
        .insert_resource(ClearColor(Color::srgb(0.443, 0.560, 0.756)))
        .insert_resource(AmbientLight {
            color: Color::WHITE,
            brightness: 30.0,
            affects_lightmapped_meshes: false,
        })
        .add_plugins(DefaultPlugins)
        .add_plugins(terrain::TerrainPlugin::default())
        .add_plugins(GamePlugin)
        .run();
}
