use bevy::prelude::*;
use bevy::render::view::screenshot::{Screenshot, ScreenshotCaptured};
use bevy::window::PrimaryWindow;

use constants::grid::{RAYCAST_MAX_DISTANCE, VOXEL_EDGE};
use constants::sampling::SAMPLE_PIXEL_OFFSET;

use crate::engine::camera::viewport_camera::crosshair_ray;
use crate::engine::raycast::raycast_blocks;

use super::block_tool::PlacedBlock;

/// The colour new cubes are painted with. Read at spawn time only;
/// re-sampling never retints existing cubes.
#[derive(Resource)]
pub struct PaintColor(pub Color);

impl Default for PaintColor {
    fn default() -> Self {
        Self(Color::WHITE)
    }
}

/// Zero-argument sample trigger from the panel or shortcut.
#[derive(Event)]
pub struct SampleColorEvent;

/// Pick the paint colour from whatever is under the crosshair: a placed
/// block's material, or, when nothing is hit, a pixel read back from
/// the rendered frame beside the crosshair.
pub fn handle_sample_color(
    mut events: EventReader<SampleColorEvent>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    blocks: Query<(Entity, &Transform), With<PlacedBlock>>,
    block_materials: Query<&MeshMaterial3d<StandardMaterial>, With<PlacedBlock>>,
    materials: Res<Assets<StandardMaterial>>,
    mut paint: ResMut<PaintColor>,
    mut commands: Commands,
) {
    if events.is_empty() {
        return;
    }
    // Several triggers in one frame collapse into one sample.
    events.clear();

    let Ok(window) = windows.single() else {
        return;
    };
    let Ok((camera, camera_transform)) = cameras.single() else {
        return;
    };
    let Some(ray) = crosshair_ray(camera, camera_transform, window) else {
        return;
    };

    let hit = raycast_blocks(
        ray.origin,
        ray.direction.as_vec3(),
        RAYCAST_MAX_DISTANCE,
        VOXEL_EDGE,
        blocks.iter().map(|(entity, transform)| (entity, transform.translation)),
    );

    match hit {
        Some(hit) => {
            let Ok(material_handle) = block_materials.get(hit.entity) else {
                return;
            };
            let Some(material) = materials.get(&material_handle.0) else {
                return;
            };
            paint.0 = material.base_color;
            info!("Sampled paint colour from placed block");
        }
        None => {
            // Nothing solid under the crosshair: capture the frame and
            // read a pixel back next to the viewport centre.
            commands
                .spawn(Screenshot::primary_window())
                .observe(apply_sampled_pixel);
        }
    }
}

/// Observer for the captured frame: reads the pixel at the sampling
/// offset from the viewport centre and promotes it to the paint colour.
fn apply_sampled_pixel(
    trigger: Trigger<ScreenshotCaptured>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut paint: ResMut<PaintColor>,
) {
    let Ok(window) = windows.single() else {
        return;
    };

    let image = &trigger.event().0;
    let (offset_x, offset_y) = SAMPLE_PIXEL_OFFSET;
    let x = window.physical_width() / 2 + offset_x;
    let y = window.physical_height() / 2 + offset_y;

    match image.get_color_at(x, y) {
        Ok(color) => {
            paint.0 = color;
            info!("Sampled paint colour from frame at ({x}, {y})");
        }
        Err(err) => warn!("Frame pixel readback failed: {err:?}"),
    }
}
