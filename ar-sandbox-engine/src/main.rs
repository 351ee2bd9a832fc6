use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use bevy::window::PresentMode;

mod engine;
mod tools;
mod voxel;

use constants::grid::VOXEL_EDGE;
use engine::camera::viewport_camera::{ViewportCamera, camera_controller};
use engine::planes::PlanesPlugin;
use engine::session::{ArSession, SessionPlugin};
use tools::SandboxToolsPlugin;
use tools::block_tool::BlockAssets;

const SCENARIO_ASSET_PATH: &'static str = "scenarios/tabletop.scenario.json";

fn main() {
    let mut app = create_app();

    #[cfg(target_arch = "wasm32")]
    {
        wasm_bindgen_futures::spawn_local(async move {
            app.run();
        });
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        app.run();
    }
}

/// Create application with the simulated AR session and sandbox tools
fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        .add_plugins(SessionPlugin)
        .add_plugins(PlanesPlugin)
        .add_plugins(SandboxToolsPlugin);

    app.insert_resource(ClearColor(Color::srgb(0.05, 0.06, 0.08)))
        .init_resource::<ViewportCamera>()
        .add_systems(Startup, setup)
        .add_systems(Update, (camera_controller, fps_text_update_system));

    app
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}

fn create_window_config() -> Window {
    #[cfg(target_arch = "wasm32")]
    {
        Window {
            title: "AR Sandbox".into(),
            canvas: Some("#bevy".into()),
            fit_canvas_to_parent: true,
            prevent_default_event_handling: false,
            present_mode: PresentMode::AutoVsync,
            ..default()
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        Window {
            title: "AR Sandbox".into(),
            present_mode: PresentMode::AutoVsync,
            ..default()
        }
    }
}

/// Setup camera, lighting, block assets, and kick off the scenario load
fn setup(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut session: ResMut<ArSession>,
) {
    println!("=== AR SANDBOX (SIMULATED SESSION) ===");
    println!("Loading session scenario: {}", SCENARIO_ASSET_PATH);

    session.scenario = Some(asset_server.load(SCENARIO_ASSET_PATH));

    spawn_lighting(&mut commands);
    spawn_camera(&mut commands);
    spawn_fps_text(&mut commands);

    commands.insert_resource(BlockAssets {
        cube_mesh: meshes.add(Cuboid::from_length(VOXEL_EDGE)),
    });
}

fn spawn_lighting(commands: &mut Commands) {
    commands.spawn((
        DirectionalLight {
            shadows_enabled: false,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(
            EulerRot::ZYX,
            0.0,
            1.0,
            -std::f32::consts::FRAC_PI_4,
        )),
    ));
}

fn spawn_camera(commands: &mut Commands) {
    let viewport = ViewportCamera::default();
    commands.spawn((
        Camera3d::default(),
        Transform::from_translation(viewport.focus_point).with_rotation(Quat::from_euler(
            EulerRot::YXZ,
            viewport.yaw,
            viewport.pitch,
            0.0,
        )),
    ));
}

#[derive(Component)]
struct FpsText;

fn spawn_fps_text(commands: &mut Commands) {
    commands.spawn((
        FpsText,
        Text::new("FPS: "),
        TextFont {
            font_size: 14.0,
            ..default()
        },
        TextColor(Color::srgb(1.0, 0.0, 0.0)),
        Node {
            position_type: PositionType::Absolute,
            bottom: Val::Px(12.0),
            left: Val::Px(12.0),
            ..default()
        },
    ));
}

fn fps_text_update_system(
    diagnostics: Res<DiagnosticsStore>,
    mut query: Query<&mut Text, With<FpsText>>,
) {
    for mut text in &mut query {
        if let Some(fps) = diagnostics.get(&FrameTimeDiagnosticsPlugin::FPS) {
            if let Some(value) = fps.smoothed() {
                text.0 = format!("FPS: {value:.1}");
            }
        }
    }
}
