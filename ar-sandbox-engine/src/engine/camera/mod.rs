//! First-person viewport camera standing in for device motion.
//!
//! Provides free-look mouse/keyboard controls with smooth interpolation
//! and the crosshair ray used by every placement, removal, and sampling
//! action.

/// Viewport camera resource, controller system, and crosshair helpers.
pub mod viewport_camera;
