use bevy::prelude::*;

use crate::engine::planes::visualizer::{PlaneVisualizationManager, PlaneVisualized};
use crate::engine::planes::{PlaneTrackingState, TrackedPlane};
use crate::engine::session::ArSession;
use crate::voxel::registry::VoxelRegistry;

use super::color_sampler::PaintColor;

/// Zero-argument scene reload trigger.
#[derive(Event)]
pub struct ResetSceneEvent;

/// Tear the sandbox back to its initial state: every placed block and
/// plane visual despawns, the voxel map and vertical anchor clear (the
/// next placement re-anchors), the paint returns to white, and the
/// session rewinds so plane detection replays.
pub fn handle_scene_reset(
    mut events: EventReader<ResetSceneEvent>,
    mut commands: Commands,
    mut registry: ResMut<VoxelRegistry>,
    mut manager: ResMut<PlaneVisualizationManager>,
    mut session: ResMut<ArSession>,
    mut paint: ResMut<PaintColor>,
    mut planes: Query<(Entity, &mut TrackedPlane)>,
) {
    if events.is_empty() {
        return;
    }
    events.clear();

    let blocks = registry.drain_all();
    let block_count = blocks.len();
    for entity in blocks {
        commands.entity(entity).despawn();
    }
    for entity in manager.drain_spawned() {
        commands.entity(entity).despawn();
    }
    for (entity, mut plane) in &mut planes {
        plane.state = PlaneTrackingState::Pending;
        commands.entity(entity).remove::<PlaneVisualized>();
    }

    session.restart();
    paint.0 = Color::WHITE;
    info!("Scene reset: cleared {block_count} block(s), re-armed plane detection");
}
