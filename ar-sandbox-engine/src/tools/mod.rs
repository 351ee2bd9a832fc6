//! Interactive sandbox tools bound to the UI panel and keyboard.
//!
//! Every user-facing operation is a zero-argument trigger carried by an
//! event, so buttons and shortcuts share one path:
//!
//! ```text
//! Button press / key press
//!   └─> BlockActionEvent { Place | Remove }
//!   └─> SampleColorEvent
//!   └─> TogglePlanesEvent(bool)
//!   └─> ResetSceneEvent
//!       └─> handler system (same frame, same logical actor)
//! ```
//!
//! ## Placement / Removal
//!
//! Both actions aim through the crosshair at the viewport centre. Adding
//! tries the generic scene raycast against placed blocks first and only
//! falls back to the tracked-surface raycast when it misses; removing
//! uses the scene raycast alone. The hit point is pushed half a cube
//! along the relevant direction so the new cube sits flush on the hit
//! surface, then canonicalized into the voxel lattice. A miss anywhere
//! is a silent no-op, as are duplicate placements and removals of empty
//! cells.
//!
//! ## Colour Sampling
//!
//! Aiming at a placed block copies its material colour; aiming at
//! anything else reads a pixel back from a captured frame just beside
//! the crosshair. The sampled colour becomes the paint for subsequent
//! placements only.

/// Add/remove orchestration: crosshair raycasts, half-edge offsets,
/// lattice canonicalization, registry mediation.
pub mod block_tool;

/// Current paint colour, material sampling, and frame pixel readback.
pub mod color_sampler;

/// Scene reset: despawn, re-anchor, rewind.
pub mod reset;

/// Button panel, snackbar, toast, crosshair, paint swatch, shortcuts.
pub mod ui;

use bevy::prelude::*;

use crate::voxel::registry::VoxelRegistry;
use block_tool::{BlockActionEvent, handle_block_actions};
use color_sampler::{PaintColor, SampleColorEvent, handle_sample_color};
use reset::{ResetSceneEvent, handle_scene_reset};
use ui::{
    ToastState, handle_keyboard_shortcuts, handle_panel_buttons, reflect_block_count,
    reflect_button_interactions, reflect_toggle_label, show_toasts, spawn_sandbox_ui,
    update_paint_swatch, update_searching_snackbar,
};

// Registers the sandbox tool events, state, UI, and handler systems.
pub struct SandboxToolsPlugin;

impl Plugin for SandboxToolsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<VoxelRegistry>()
            .init_resource::<PaintColor>()
            .init_resource::<ToastState>()
            .add_event::<BlockActionEvent>()
            .add_event::<SampleColorEvent>()
            .add_event::<ResetSceneEvent>()
            .add_systems(Startup, spawn_sandbox_ui)
            .add_systems(
                Update,
                (
                    handle_panel_buttons,
                    handle_keyboard_shortcuts,
                    handle_block_actions,
                    handle_sample_color,
                    handle_scene_reset,
                ),
            )
            .add_systems(
                Update,
                (
                    update_searching_snackbar,
                    update_paint_swatch,
                    reflect_block_count,
                    reflect_toggle_label,
                    reflect_button_interactions,
                    show_toasts,
                ),
            );
    }
}
