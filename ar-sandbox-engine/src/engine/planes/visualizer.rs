use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use constants::session::{FEATURE_POINTS_PER_PLANE, FEATURE_POINT_SIZE};
use constants::ui::{FEATURE_POINT_COLOR, PLANE_PALETTE};

use super::{PlaneTrackingState, TrackedPlane};

/// Marker for a plane's translucent visualization quad.
#[derive(Component)]
pub struct PlaneVisual;

/// Marker for one feature-point dot; dots double as the feature points
/// the tracked-surface raycast tests against.
#[derive(Component)]
pub struct FeaturePointDot;

/// Marker inserted on a plane entity once its visuals exist.
#[derive(Component)]
pub struct PlaneVisualized;

/// Visibility request for all plane visuals and feature dots; also flips
/// whether the app keeps searching for (and visualizing) new planes.
#[derive(Event)]
pub struct TogglePlanesEvent(pub bool);

/// Owns every spawned visualization entity and the plane-search flag.
#[derive(Resource)]
pub struct PlaneVisualizationManager {
    pub search_enabled: bool,
    spawned: Vec<Entity>,
}

impl Default for PlaneVisualizationManager {
    fn default() -> Self {
        Self {
            search_enabled: true,
            spawned: Vec::new(),
        }
    }
}

impl PlaneVisualizationManager {
    /// Hand back every visualization entity for despawning (scene reset).
    pub fn drain_spawned(&mut self) -> Vec<Entity> {
        std::mem::take(&mut self.spawned)
    }
}

/// Spawn visuals for planes that became tracked and have none yet: a
/// translucent extents quad plus a deterministic scatter of feature-point
/// dots. Skipped entirely while plane search is toggled off.
pub fn visualize_new_planes(
    mut commands: Commands,
    mut manager: ResMut<PlaneVisualizationManager>,
    planes: Query<(Entity, &TrackedPlane), Without<PlaneVisualized>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if !manager.search_enabled {
        return;
    }

    for (plane_entity, plane) in &planes {
        if plane.state != PlaneTrackingState::Tracking {
            continue;
        }

        let rotation = Quat::from_rotation_y(plane.yaw);
        let tint = PLANE_PALETTE[plane.index % PLANE_PALETTE.len()];

        let quad = commands
            .spawn((
                PlaneVisual,
                Mesh3d(meshes.add(
                    Plane3d::default()
                        .mesh()
                        .size(plane.half_extents.x * 2.0, plane.half_extents.y * 2.0),
                )),
                MeshMaterial3d(materials.add(StandardMaterial {
                    base_color: tint,
                    alpha_mode: AlphaMode::Blend,
                    unlit: true,
                    cull_mode: None,
                    ..default()
                })),
                Transform {
                    translation: plane.center,
                    rotation,
                    ..default()
                },
                Name::new(format!("PlaneVisual {}", plane.index)),
            ))
            .id();
        manager.spawned.push(quad);

        // Shared handles for this plane's dots.
        let dot_mesh = meshes.add(Cuboid::from_length(FEATURE_POINT_SIZE));
        let dot_material = materials.add(StandardMaterial {
            base_color: FEATURE_POINT_COLOR,
            unlit: true,
            ..default()
        });

        // Seeded per plane so the scatter is stable across runs.
        let mut rng = StdRng::seed_from_u64(plane.index as u64);
        for dot in 0..FEATURE_POINTS_PER_PLANE {
            let local = Vec3::new(
                rng.gen_range(-plane.half_extents.x..plane.half_extents.x),
                FEATURE_POINT_SIZE,
                rng.gen_range(-plane.half_extents.y..plane.half_extents.y),
            );
            let dot_entity = commands
                .spawn((
                    FeaturePointDot,
                    Mesh3d(dot_mesh.clone()),
                    MeshMaterial3d(dot_material.clone()),
                    Transform::from_translation(plane.center + rotation * local),
                    Name::new(format!("FeaturePoint {}/{dot}", plane.index)),
                ))
                .id();
            manager.spawned.push(dot_entity);
        }

        commands.entity(plane_entity).insert(PlaneVisualized);
        info!(
            "Visualizing newly tracked plane {} ({}x{} m)",
            plane.index,
            plane.half_extents.x * 2.0,
            plane.half_extents.y * 2.0
        );
    }
}

/// Apply a visibility toggle to every plane visual and feature dot, and
/// record the new search flag. Tracking itself is unaffected; hidden
/// planes still anchor placements.
pub fn handle_toggle_planes(
    mut events: EventReader<TogglePlanesEvent>,
    mut manager: ResMut<PlaneVisualizationManager>,
    mut visuals: Query<&mut Visibility, Or<(With<PlaneVisual>, With<FeaturePointDot>)>>,
) {
    for TogglePlanesEvent(enabled) in events.read() {
        manager.search_enabled = *enabled;
        let target = if *enabled {
            Visibility::Visible
        } else {
            Visibility::Hidden
        };
        for mut visibility in &mut visuals {
            *visibility = target;
        }
        info!("Plane visualization toggled {}", enabled);
    }
}
