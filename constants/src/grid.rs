/// Edge length of one sandbox cube in metres. World points snap to a
/// lattice of this pitch, so every placed cube sits flush with its
/// neighbours.
pub const VOXEL_EDGE: f32 = 0.25;

/// Maximum reach of the crosshair aim raycasts.
pub const RAYCAST_MAX_DISTANCE: f32 = 1000.0;
