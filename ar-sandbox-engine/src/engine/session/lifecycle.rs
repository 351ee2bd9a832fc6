use bevy::prelude::*;

use constants::session::QUIT_GRACE_SECONDS;

use super::{ArSession, SessionStatus};

/// User-visible notice request; the UI renders it for a fixed duration.
/// Stands in for a platform toast.
#[derive(Event)]
pub struct ToastEvent {
    pub message: String,
}

/// Tracks whether the app is already shutting down due to a session
/// error, and the grace delay that lets the toast render first.
#[derive(Resource)]
pub struct LifecycleGuard {
    quitting: bool,
    grace: Timer,
}

impl Default for LifecycleGuard {
    fn default() -> Self {
        Self {
            quitting: false,
            grace: Timer::from_seconds(QUIT_GRACE_SECONDS, TimerMode::Once),
        }
    }
}

impl LifecycleGuard {
    pub fn is_quitting(&self) -> bool {
        self.quitting
    }
}

/// Quit the application on unrecoverable session errors: show the notice
/// once, give it the grace delay to appear, then exit. Transient
/// non-tracking states are left to the searching indicator.
pub fn quit_on_session_errors(
    time: Res<Time>,
    session: Res<ArSession>,
    mut guard: ResMut<LifecycleGuard>,
    mut toasts: EventWriter<ToastEvent>,
    mut exit: EventWriter<AppExit>,
) {
    if guard.quitting {
        if guard.grace.tick(time.delta()).just_finished() {
            warn!("Shutting down after session error");
            exit.write(AppExit::Success);
        }
        return;
    }

    let message = match session.status {
        SessionStatus::ErrorPermissionNotGranted => {
            "Camera permission is needed to run this application."
        }
        SessionStatus::ErrorConnectionLost => {
            "Tracking encountered a problem connecting. Please start the app again."
        }
        _ => return,
    };

    toasts.write(ToastEvent {
        message: message.to_string(),
    });
    guard.quitting = true;
}
