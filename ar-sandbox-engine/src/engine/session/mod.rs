//! Simulated AR session: status, clock, and lifecycle guarding.
//!
//! A real tracking stack reports session health and a set of detected
//! surfaces; here a `SessionScenario` JSON asset scripts both. The rest
//! of the app only ever consumes `ArSession` and the tracked-plane set,
//! so the simulation stays behind the same narrow interface a hardware
//! session would.

/// Quit-on-error guard with toast notice and grace delay.
pub mod lifecycle;

/// JSON scenario asset describing planes, pauses, and scripted failures.
pub mod scenario;

use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;

use lifecycle::{LifecycleGuard, ToastEvent, quit_on_session_errors};
use scenario::{ScenarioFailure, SessionScenario};

/// Health of the simulated tracking session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStatus {
    /// Scenario asset not loaded yet; no tracking data available.
    #[default]
    Initializing,
    Tracking,
    /// Session alive but motion tracking temporarily lost.
    Paused,
    ErrorPermissionNotGranted,
    ErrorConnectionLost,
}

impl SessionStatus {
    pub fn is_tracking(self) -> bool {
        self == SessionStatus::Tracking
    }

    /// A valid session may recover; error states never do.
    pub fn is_valid(self) -> bool {
        !self.is_error()
    }

    pub fn is_error(self) -> bool {
        matches!(
            self,
            SessionStatus::ErrorPermissionNotGranted | SessionStatus::ErrorConnectionLost
        )
    }
}

/// Process-wide session state driven once per frame by `advance_session`.
#[derive(Resource, Default)]
pub struct ArSession {
    pub status: SessionStatus,
    /// Seconds since the session started tracking, frozen on failure.
    pub clock: f32,
    pub scenario: Option<Handle<SessionScenario>>,
    pub planes_spawned: bool,
}

impl ArSession {
    /// Rewind for a scene reset: the clock restarts and plane detection
    /// re-arms, as if the session had just connected.
    pub fn restart(&mut self) {
        self.clock = 0.0;
        self.status = SessionStatus::Initializing;
    }
}

/// Per-frame session advance: ticks the clock once the scenario asset is
/// available and applies scripted pauses and failures. Error states are
/// terminal.
pub fn advance_session(
    time: Res<Time>,
    mut session: ResMut<ArSession>,
    scenarios: Res<Assets<SessionScenario>>,
) {
    if session.status.is_error() {
        return;
    }

    let Some(scenario) = session
        .scenario
        .as_ref()
        .and_then(|handle| scenarios.get(handle))
    else {
        session.status = SessionStatus::Initializing;
        return;
    };

    session.clock += time.delta_secs();

    if let (Some(after), Some(failure)) = (scenario.fail_after_seconds, scenario.failure) {
        if session.clock >= after {
            session.status = match failure {
                ScenarioFailure::PermissionDenied => SessionStatus::ErrorPermissionNotGranted,
                ScenarioFailure::ConnectionLost => SessionStatus::ErrorConnectionLost,
            };
            warn!("Session failed at {:.1}s: {:?}", session.clock, failure);
            return;
        }
    }

    if let Some([start, end]) = scenario.pause_between {
        if session.clock >= start && session.clock < end {
            session.status = SessionStatus::Paused;
            return;
        }
    }

    session.status = SessionStatus::Tracking;
}

// Registers the session resources, the scenario asset loader, and the
// lifecycle guard.
pub struct SessionPlugin;

impl Plugin for SessionPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(JsonAssetPlugin::<SessionScenario>::new(&["scenario.json"]))
            .init_resource::<ArSession>()
            .init_resource::<LifecycleGuard>()
            .add_event::<ToastEvent>()
            .add_systems(Update, (advance_session, quit_on_session_errors).chain());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_states_are_invalid() {
        assert!(!SessionStatus::ErrorPermissionNotGranted.is_valid());
        assert!(!SessionStatus::ErrorConnectionLost.is_valid());
        assert!(SessionStatus::Tracking.is_valid());
        assert!(SessionStatus::Paused.is_valid());
        assert!(SessionStatus::Initializing.is_valid());
    }

    #[test]
    fn test_only_tracking_counts_as_tracking() {
        assert!(SessionStatus::Tracking.is_tracking());
        assert!(!SessionStatus::Paused.is_tracking());
        assert!(!SessionStatus::Initializing.is_tracking());
    }

    #[test]
    fn test_restart_rewinds_clock_and_status() {
        let mut session = ArSession {
            status: SessionStatus::Tracking,
            clock: 7.5,
            scenario: None,
            planes_spawned: true,
        };

        session.restart();
        assert_eq!(session.clock, 0.0);
        assert_eq!(session.status, SessionStatus::Initializing);
        // Plane entities survive a reset; only their states re-arm.
        assert!(session.planes_spawned);
    }
}
