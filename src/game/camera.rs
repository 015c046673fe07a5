use bevy::prelude::*;

use terrain::TerrainChunkEntity;

#[derive(Component)]
pub struct FlightCamera {
    pub yaw: f32,
    pub pitch: f32,
}

#[derive(Resource, Clone)]
pub struct FlightSettings {
    pub speed: f32,
    pub speed_fast: f32,
    pub turn_speed: f32,
    pub climb_speed: f32,
    /// Hard ceiling for the camera's world height.
    pub max_altitude: f32,
    /// Height above the surface the camera is put back at after touching it.
    pub recovery_clearance: f32,
    /// Clearance band that counts as flying close to the ground.
    pub sweet_spot: (f32, f32),
}

impl Default for FlightSettings {
    fn default() -> Self {
        Self {
            speed: 12.0,
            speed_fast: 36.0,
            turn_speed: 1.6,
            climb_speed: 8.0,
            max_altitude: 30.0,
            recovery_clearance: 1.0,
            sweet_spot: (1.0, 10.0),
        }
    }
}

/// Last sampled distance between the camera and the terrain below it.
#[derive(Resource, Default, Clone, Copy, Debug)]
pub struct GroundClearance {
    /// `None` while the camera is outside every chunk.
    pub clearance: Option<f32>,
    pub too_low: bool,
    pub in_sweet_spot: bool,
}

pub fn setup_viewer(mut commands: Commands, settings: Res<FlightSettings>) {
    let yaw = std::f32::consts::PI;
    let pitch = -0.25;
    commands.spawn((
        FlightCamera { yaw, pitch },
        Camera3d::default(),
        Transform::from_xyz(0.0, settings.max_altitude * 0.5, 40.0)
            .with_rotation(Quat::from_euler(EulerRot::YXZ, yaw, pitch, 0.0)),
    ));
}

/// Arrow keys turn and pitch, W/S fly along the view direction, Space and
/// Ctrl climb and sink, Shift flies faster.
pub fn flight_camera_input(
    time: Res<Time>,
    keys: Res<ButtonInput<KeyCode>>,
    settings: Res<FlightSettings>,
    mut q_cam: Query<(&mut FlightCamera, &mut Transform)>,
) {
    let (mut cam, mut transform) = match q_cam.single_mut() {
        Ok(c) => c,
        Err(_) => return,
    };
    let dt = time.delta_secs();

    if keys.pressed(KeyCode::ArrowLeft) {
        cam.yaw += settings.turn_speed * dt;
    }
    if keys.pressed(KeyCode::ArrowRight) {
        cam.yaw -= settings.turn_speed * dt;
    }
    if keys.pressed(KeyCode::ArrowUp) {
        cam.pitch += settings.turn_speed * dt;
    }
    if keys.pressed(KeyCode::ArrowDown) {
        cam.pitch -= settings.turn_speed * dt;
    }
    cam.pitch = cam.pitch.clamp(-1.4, 1.4);
    transform.rotation = Quat::from_euler(EulerRot::YXZ, cam.yaw, cam.pitch, 0.0);

    let mut thrust = 0.0;
    if keys.pressed(KeyCode::KeyW) {
        thrust += 1.0;
    }
    if keys.pressed(KeyCode::KeyS) {
        thrust -= 1.0;
    }
    let speed = if keys.pressed(KeyCode::ShiftLeft) || keys.pressed(KeyCode::ShiftRight) {
        settings.speed_fast
    } else {
        settings.speed
    };
    let forward = transform.forward();
    transform.translation += forward * thrust * speed * dt;

    if keys.pressed(KeyCode::Space) {
        transform.translation.y += settings.climb_speed * dt;
    }
    if keys.pressed(KeyCode::ControlLeft) {
        transform.translation.y -= settings.climb_speed * dt;
    }

    transform.translation.y = transform.translation.y.min(settings.max_altitude);
}

/// Samples the terrain under the camera every frame. Touching the surface
/// lifts the camera back above it.
pub fn update_ground_clearance(
    settings: Res<FlightSettings>,
    mut clearance: ResMut<GroundClearance>,
    chunks: Query<&TerrainChunkEntity>,
    mut q_cam: Query<&mut Transform, With<FlightCamera>>,
) {
    let mut transform = match q_cam.single_mut() {
        Ok(t) => t,
        Err(_) => return,
    };
    let pos = transform.translation;

    let Some(ground) = chunks
        .iter()
        .find_map(|chunk| chunk.height_at_world(pos.x, pos.z))
    else {
        *clearance = GroundClearance::default();
        return;
    };

    let above = pos.y - ground;
    let state = classify(above, &settings);

    if state.too_low {
        if !clearance.too_low {
            warn!("flying too low: clearance {above:.2} at ({:.1}, {:.1})", pos.x, pos.z);
        }
        transform.translation.y = (ground + settings.recovery_clearance).min(settings.max_altitude);
    }
    if state.in_sweet_spot && !clearance.in_sweet_spot {
        debug!("entered low-flight band: clearance {above:.2}");
    }

    *clearance = state;
}

fn classify(above: f32, settings: &FlightSettings) -> GroundClearance {
    let (low, high) = settings.sweet_spot;
    GroundClearance {
        clearance: Some(above),
        too_low: above <= 0.0,
        in_sweet_spot: (low..=high).contains(&above),
    }
}
