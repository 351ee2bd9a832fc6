/// Delay between the fatal-error toast and process exit, giving the
/// notice time to render.
pub const QUIT_GRACE_SECONDS: f32 = 0.5;

/// How long a toast message stays on screen.
pub const TOAST_SECONDS: f32 = 4.0;

/// Feature points scattered on each tracked plane by the visualizer.
pub const FEATURE_POINTS_PER_PLANE: usize = 48;

/// Side length of one feature-point dot.
pub const FEATURE_POINT_SIZE: f32 = 0.012;

/// Pickable radius of a feature point for surface raycasts.
pub const FEATURE_POINT_HIT_RADIUS: f32 = 0.03;
