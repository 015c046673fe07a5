pub mod camera;
pub mod input;
pub mod lighting;

use bevy::prelude::*;

use terrain::TerrainUploadSet;

pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(camera::FlightSettings::default())
            .insert_resource(camera::GroundClearance::default())
            .add_systems(
                Startup,
                (camera::setup_viewer, lighting::setup_sun_light).chain(),
            )
            .add_systems(
                Update,
                (
                    input::terrain_hotkeys.before(TerrainUploadSet),
                    (camera::flight_camera_input, camera::update_ground_clearance).chain(),
                ),
            );
    }
}
