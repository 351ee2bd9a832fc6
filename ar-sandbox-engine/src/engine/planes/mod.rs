//! Tracked planar surfaces and their visualization.
//!
//! Plane entities are spawned once from the session scenario and carry
//! their tracking state; the visualizer reacts to planes that become
//! tracked and the searching indicator reflects the whole set.

/// Plane visualization quads, feature-point scatter, and visibility toggling.
pub mod visualizer;

use bevy::prelude::*;

use crate::engine::session::scenario::SessionScenario;
use crate::engine::session::{ArSession, SessionStatus};
use visualizer::{
    PlaneVisualizationManager, TogglePlanesEvent, handle_toggle_planes, visualize_new_planes,
};

/// Tracking state of one detected plane, mirroring what a tracking stack
/// reports. `Pending` planes exist in the scenario but have not been
/// surfaced by the tracker yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneTrackingState {
    Pending,
    Tracking,
    Paused,
    Stopped,
}

/// One planar surface from the scenario. Horizontal, normal +Y; the yaw
/// spins the extents rectangle about the vertical axis.
#[derive(Component, Debug, Clone)]
pub struct TrackedPlane {
    pub index: usize,
    pub center: Vec3,
    /// Radians about +Y.
    pub yaw: f32,
    pub half_extents: Vec2,
    pub detect_after: f32,
    pub state: PlaneTrackingState,
}

/// The searching predicate: true when no currently tracked plane is in
/// the `Tracking` state, vacuously true for an empty set. Callers pass
/// the states of planes the tracker has surfaced (`Pending` excluded).
pub fn none_tracking<I>(states: I) -> bool
where
    I: IntoIterator<Item = PlaneTrackingState>,
{
    states
        .into_iter()
        .all(|state| state != PlaneTrackingState::Tracking)
}

/// Spawn one plane entity per scenario plane once the asset is loaded.
pub fn spawn_scenario_planes(
    mut commands: Commands,
    mut session: ResMut<ArSession>,
    scenarios: Res<Assets<SessionScenario>>,
) {
    if session.planes_spawned {
        return;
    }
    let Some(scenario) = session
        .scenario
        .as_ref()
        .and_then(|handle| scenarios.get(handle))
    else {
        return;
    };

    for (index, plane) in scenario.planes.iter().enumerate() {
        commands.spawn((
            TrackedPlane {
                index,
                center: Vec3::from_array(plane.center),
                yaw: plane.yaw_degrees.to_radians(),
                half_extents: Vec2::from_array(plane.half_extents),
                detect_after: plane.detect_after_seconds,
                state: PlaneTrackingState::Pending,
            },
            Name::new(format!("TrackedPlane {index}")),
        ));
    }

    session.planes_spawned = true;
    info!(
        "Session scenario '{}' loaded with {} plane(s)",
        scenario.name,
        scenario.planes.len()
    );
}

/// Advance plane tracking states from the session clock and health.
pub fn update_plane_states(session: Res<ArSession>, mut planes: Query<&mut TrackedPlane>) {
    for mut plane in &mut planes {
        let next = match session.status {
            SessionStatus::Tracking => {
                if session.clock >= plane.detect_after {
                    PlaneTrackingState::Tracking
                } else {
                    PlaneTrackingState::Pending
                }
            }
            SessionStatus::ErrorPermissionNotGranted | SessionStatus::ErrorConnectionLost => {
                PlaneTrackingState::Stopped
            }
            // Session alive but not tracking: surfaced planes pause.
            _ => {
                if plane.state == PlaneTrackingState::Pending {
                    PlaneTrackingState::Pending
                } else {
                    PlaneTrackingState::Paused
                }
            }
        };

        if plane.state != next {
            plane.state = next;
        }
    }
}

// Registers plane spawning, state advance, and visualization systems.
pub struct PlanesPlugin;

impl Plugin for PlanesPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlaneVisualizationManager>()
            .add_event::<TogglePlanesEvent>()
            .add_systems(
                Update,
                (
                    spawn_scenario_planes,
                    update_plane_states,
                    visualize_new_planes,
                    handle_toggle_planes,
                )
                    .chain(),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_searching_with_no_planes_is_vacuously_true() {
        assert!(none_tracking([]));
    }

    #[test]
    fn test_one_tracking_plane_clears_searching() {
        assert!(!none_tracking([PlaneTrackingState::Tracking]));
    }

    #[test]
    fn test_non_tracking_states_keep_searching() {
        assert!(none_tracking([PlaneTrackingState::Paused]));
        assert!(none_tracking([PlaneTrackingState::Stopped]));
        assert!(none_tracking([
            PlaneTrackingState::Paused,
            PlaneTrackingState::Stopped
        ]));
    }

    #[test]
    fn test_mixed_states_with_one_tracking() {
        assert!(!none_tracking([
            PlaneTrackingState::Paused,
            PlaneTrackingState::Tracking,
            PlaneTrackingState::Stopped
        ]));
    }
}
