use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use constants::grid::{RAYCAST_MAX_DISTANCE, VOXEL_EDGE};

use crate::engine::camera::viewport_camera::crosshair_ray;
use crate::engine::planes::visualizer::FeaturePointDot;
use crate::engine::planes::{PlaneTrackingState, TrackedPlane};
use crate::engine::raycast::{
    AimHit, HitFlags, SceneHit, raycast_blocks, raycast_surfaces, resolve_aim,
};
use crate::voxel::grid::{VoxelCoord, lattice_to_world, snap_to_lattice};
use crate::voxel::registry::VoxelRegistry;

use super::color_sampler::PaintColor;

/// Trackable kinds an aim fallback may land on. The surface raycast is
/// only reached when the generic scene raycast misses.
pub const AIM_FILTER: HitFlags = HitFlags::PLANE_WITHIN_POLYGON
    .union(HitFlags::FEATURE_POINT_WITH_SURFACE_NORMAL)
    .union(HitFlags::FEATURE_POINT)
    .union(HitFlags::PLANE_WITHIN_INFINITY);

/// Marker for a placed sandbox cube.
#[derive(Component)]
pub struct PlacedBlock;

/// Shared mesh for every placed cube.
#[derive(Resource)]
pub struct BlockAssets {
    pub cube_mesh: Handle<Mesh>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockAction {
    Place,
    Remove,
}

/// Source of a block action for logging and conditional logic.
#[derive(Debug, Clone, Copy)]
pub enum ActionSource {
    Button,
    Keyboard,
}

/// Single-shot add/remove trigger from a button or shortcut.
#[derive(Event)]
pub struct BlockActionEvent {
    pub action: BlockAction,
    pub source: ActionSource,
}

/// Where a new cube's centre goes for a given aim hit: scene hits push
/// out along the hit normal, surface hits push straight up. The surface
/// branch is vertical on purpose: a tracked-surface pose reports an
/// upright orientation, not a contact normal.
pub fn placement_point(hit: &AimHit, edge: f32) -> Vec3 {
    match hit {
        AimHit::Scene(hit) => hit.point + hit.normal * (edge * 0.5),
        AimHit::Surface(hit) => hit.point + Vec3::Y * (edge * 0.5),
    }
}

/// The cell a removal aims at: half a cube inward from the struck face,
/// which lands inside the struck block itself.
pub fn removal_point(hit: &SceneHit, edge: f32) -> Vec3 {
    hit.point - hit.normal * (edge * 0.5)
}

/// Handle queued add/remove actions with the crosshair raycast cascade.
pub fn handle_block_actions(
    mut events: EventReader<BlockActionEvent>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    planes: Query<&TrackedPlane>,
    feature_dots: Query<&Transform, (With<FeaturePointDot>, Without<PlacedBlock>)>,
    blocks: Query<(Entity, &Transform), With<PlacedBlock>>,
    mut registry: ResMut<VoxelRegistry>,
    paint: Res<PaintColor>,
    block_assets: Res<BlockAssets>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut commands: Commands,
) {
    if events.is_empty() {
        return;
    }
    let Ok(window) = windows.single() else {
        return;
    };
    let Ok((camera, camera_transform)) = cameras.single() else {
        return;
    };

    for event in events.read() {
        let Some(ray) = crosshair_ray(camera, camera_transform, window) else {
            continue;
        };
        let origin = ray.origin;
        let dir = ray.direction.as_vec3();

        let scene_raycast = || {
            raycast_blocks(
                origin,
                dir,
                RAYCAST_MAX_DISTANCE,
                VOXEL_EDGE,
                blocks.iter().map(|(entity, transform)| (entity, transform.translation)),
            )
        };

        match event.action {
            BlockAction::Place => {
                let aim = resolve_aim(scene_raycast, || {
                    raycast_surfaces(
                        origin,
                        dir,
                        RAYCAST_MAX_DISTANCE,
                        AIM_FILTER,
                        planes
                            .iter()
                            .filter(|plane| plane.state == PlaneTrackingState::Tracking),
                        feature_dots.iter().map(|transform| transform.translation),
                    )
                });
                let Some(aim) = aim else {
                    continue; // Nothing under the crosshair.
                };

                let coord = snap_to_lattice(
                    placement_point(&aim, VOXEL_EDGE),
                    VOXEL_EDGE,
                    &mut registry.calibration,
                );
                let centre = lattice_to_world(coord, VOXEL_EDGE, &registry.calibration);
                let color = paint.0;

                let placed = registry.try_place(coord, || {
                    spawn_block(&mut commands, &block_assets, &mut materials, coord, centre, color)
                });
                if placed.is_some() {
                    info!(
                        "Placed block at ({}, {}, {}) via {:?}",
                        coord.x, coord.y, coord.z, event.source
                    );
                }
            }
            BlockAction::Remove => {
                // Removal never falls back to tracked surfaces.
                let Some(hit) = scene_raycast() else {
                    continue;
                };

                let coord = snap_to_lattice(
                    removal_point(&hit, VOXEL_EDGE),
                    VOXEL_EDGE,
                    &mut registry.calibration,
                );
                if let Some(entity) = registry.try_remove(coord) {
                    commands.entity(entity).despawn();
                    info!(
                        "Removed block at ({}, {}, {}) via {:?}",
                        coord.x, coord.y, coord.z, event.source
                    );
                }
            }
        }
    }
}

fn spawn_block(
    commands: &mut Commands,
    assets: &BlockAssets,
    materials: &mut Assets<StandardMaterial>,
    coord: VoxelCoord,
    centre: Vec3,
    color: Color,
) -> Entity {
    commands
        .spawn((
            PlacedBlock,
            coord,
            Mesh3d(assets.cube_mesh.clone()),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: color,
                perceptual_roughness: 0.9,
                ..default()
            })),
            Transform::from_translation(centre),
            Name::new(format!("Block ({}, {}, {})", coord.x, coord.y, coord.z)),
        ))
        .id()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_placement_offsets_along_hit_normal() {
        let hit = AimHit::Scene(SceneHit {
            entity: Entity::from_raw(1),
            point: Vec3::new(1.24, 0.02, -0.3),
            normal: Vec3::Y,
        });
        let point = placement_point(&hit, 0.5);
        assert!((point - Vec3::new(1.24, 0.27, -0.3)).length() < 1e-6);
    }

    #[test]
    fn test_scene_placement_follows_side_faces() {
        let hit = AimHit::Scene(SceneHit {
            entity: Entity::from_raw(1),
            point: Vec3::new(0.5, 0.0, 0.0),
            normal: Vec3::X,
        });
        let point = placement_point(&hit, 0.5);
        assert!((point - Vec3::new(0.75, 0.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_surface_placement_offsets_vertically_only() {
        use crate::engine::raycast::SurfaceHit;

        let hit = AimHit::Surface(SurfaceHit {
            point: Vec3::new(2.0, 0.74, 1.0),
            up: Vec3::Y,
            flags: HitFlags::PLANE_WITHIN_POLYGON,
        });
        let point = placement_point(&hit, 0.5);
        assert!((point - Vec3::new(2.0, 0.99, 1.0)).length() < 1e-6);
    }

    #[test]
    fn test_removal_point_lands_inside_struck_block() {
        // Top face of a block centred at (0, 0, 0), edge 0.5.
        let hit = SceneHit {
            entity: Entity::from_raw(1),
            point: Vec3::new(0.1, 0.25, 0.05),
            normal: Vec3::Y,
        };
        let point = removal_point(&hit, 0.5);
        assert!((point - Vec3::new(0.1, 0.0, 0.05)).length() < 1e-6);

        let mut cal = crate::voxel::grid::GridCalibration::default();
        let coord = snap_to_lattice(point, 0.5, &mut cal);
        assert_eq!(coord, VoxelCoord::new(0, 0, 0));
    }

    #[test]
    fn test_aim_filter_covers_the_trackable_kinds() {
        assert!(AIM_FILTER.contains(HitFlags::PLANE_WITHIN_POLYGON));
        assert!(AIM_FILTER.contains(HitFlags::PLANE_WITHIN_INFINITY));
        assert!(AIM_FILTER.contains(HitFlags::FEATURE_POINT));
        assert!(AIM_FILTER.contains(HitFlags::FEATURE_POINT_WITH_SURFACE_NORMAL));
    }
}
