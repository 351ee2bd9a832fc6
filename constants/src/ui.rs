use bevy::prelude::*;

pub const PANEL_BG: Color = Color::srgb(0.10, 0.11, 0.13);
pub const PANEL_HEADER_BG: Color = Color::srgb(0.14, 0.16, 0.20);
pub const BUTTON_BG: Color = Color::srgb(0.22, 0.24, 0.28);
pub const BUTTON_BG_HOVER: Color = Color::srgb(0.30, 0.34, 0.40);
pub const BUTTON_BG_PRESSED: Color = Color::srgb(0.16, 0.18, 0.22);
pub const BUTTON_BORDER: Color = Color::srgba(0.0, 0.0, 0.0, 0.25);
pub const RESET_BUTTON_BG: Color = Color::srgb(0.28, 0.10, 0.10);

pub const SNACKBAR_BG: Color = Color::srgba(0.0, 0.0, 0.0, 0.65);
pub const TOAST_BG: Color = Color::srgba(0.05, 0.05, 0.05, 0.85);

/// Rotating tint palette for tracked-plane visualizations.
pub const PLANE_PALETTE: [Color; 4] = [
    Color::srgba(1.0, 1.0, 1.0, 0.25),
    Color::srgba(0.4, 0.7, 1.0, 0.25),
    Color::srgba(1.0, 0.8, 0.3, 0.25),
    Color::srgba(0.5, 1.0, 0.6, 0.25),
];

pub const FEATURE_POINT_COLOR: Color = Color::srgb(0.35, 0.72, 1.0);
