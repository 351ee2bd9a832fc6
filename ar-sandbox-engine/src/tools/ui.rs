use bevy::ecs::query::QueryFilter;
use bevy::prelude::*;

use constants::session::TOAST_SECONDS;
use constants::ui::{
    BUTTON_BG, BUTTON_BG_HOVER, BUTTON_BG_PRESSED, BUTTON_BORDER, PANEL_BG, PANEL_HEADER_BG,
    RESET_BUTTON_BG, SNACKBAR_BG, TOAST_BG,
};

use crate::engine::planes::visualizer::{PlaneVisualizationManager, TogglePlanesEvent};
use crate::engine::planes::{PlaneTrackingState, TrackedPlane, none_tracking};
use crate::engine::session::lifecycle::{LifecycleGuard, ToastEvent};
use crate::engine::session::ArSession;

use crate::voxel::registry::VoxelRegistry;

use super::block_tool::{ActionSource, BlockAction, BlockActionEvent};
use super::color_sampler::{PaintColor, SampleColorEvent};
use super::reset::ResetSceneEvent;

// Components
#[derive(Component)]
pub struct SandboxPanel;
#[derive(Component)]
pub struct TogglePlanesButton;
#[derive(Component)]
pub struct TogglePlanesLabel;
#[derive(Component)]
pub struct AddBlockButton;
#[derive(Component)]
pub struct RemoveBlockButton;
#[derive(Component)]
pub struct SampleColorButton;
#[derive(Component)]
pub struct ResetButton;
#[derive(Component)]
pub struct PaintSwatch;
#[derive(Component)]
pub struct BlockCountLabel;
#[derive(Component)]
pub struct SearchingSnackbar;
#[derive(Component)]
pub struct ToastNode;
#[derive(Component)]
pub struct ToastText;

/// Idle background colour to restore after hover/press feedback.
#[derive(Component)]
pub struct ButtonBaseColor(pub Color);

/// Countdown for the currently visible toast.
#[derive(Resource)]
pub struct ToastState {
    timer: Timer,
}

impl Default for ToastState {
    fn default() -> Self {
        Self {
            timer: Timer::from_seconds(0.0, TimerMode::Once),
        }
    }
}

// Spawns the sandbox panel, crosshair, snackbar, and toast overlay
pub fn spawn_sandbox_ui(mut commands: Commands) {
    commands
        .spawn((
            SandboxPanel,
            Name::new("SandboxPanel"),
            BackgroundColor(PANEL_BG),
            Node {
                width: Val::Px(200.0),
                height: Val::Percent(100.0),
                position_type: PositionType::Absolute,
                right: Val::Px(0.0),
                top: Val::Px(0.0),
                display: Display::Flex,
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::Stretch,
                ..default()
            },
        ))
        .with_children(|parent| {
            parent
                .spawn((
                    Name::new("Header"),
                    BackgroundColor(PANEL_HEADER_BG),
                    Node {
                        width: Val::Percent(100.0),
                        padding: UiRect::all(Val::Px(12.0)),
                        display: Display::Flex,
                        justify_content: JustifyContent::Center,
                        ..default()
                    },
                ))
                .with_children(|header| {
                    header.spawn((
                        Text::new("Sandbox"),
                        TextFont {
                            font_size: 18.0,
                            ..default()
                        },
                        TextColor(Color::srgb(1.0, 1.0, 1.0)),
                    ));
                });

            parent
                .spawn((
                    Name::new("Body"),
                    Node {
                        width: Val::Percent(100.0),
                        padding: UiRect::axes(Val::Px(12.0), Val::Px(8.0)),
                        row_gap: Val::Px(8.0),
                        display: Display::Flex,
                        flex_direction: FlexDirection::Column,
                        ..default()
                    },
                ))
                .with_children(|body| {
                    // Toggle planes
                    body.spawn((
                        TogglePlanesButton,
                        Button,
                        Name::new("TogglePlanesButton"),
                        ButtonBaseColor(BUTTON_BG),
                        BackgroundColor(BUTTON_BG),
                        BorderColor(BUTTON_BORDER),
                        button_node(),
                    ))
                    .with_children(|btn| {
                        btn.spawn((
                            TogglePlanesLabel,
                            Text::new("Planes: On"),
                            TextFont {
                                font_size: 15.0,
                                ..default()
                            },
                            TextColor(Color::srgb(1.0, 1.0, 1.0)),
                        ));
                    });

                    // Add block
                    body.spawn((
                        AddBlockButton,
                        Button,
                        Name::new("AddBlockButton"),
                        ButtonBaseColor(BUTTON_BG),
                        BackgroundColor(BUTTON_BG),
                        BorderColor(BUTTON_BORDER),
                        button_node(),
                    ))
                    .with_children(|btn| {
                        btn.spawn((
                            Text::new("Add Block (Space)"),
                            TextFont {
                                font_size: 15.0,
                                ..default()
                            },
                            TextColor(Color::srgb(1.0, 1.0, 1.0)),
                        ));
                    });

                    // Remove block
                    body.spawn((
                        RemoveBlockButton,
                        Button,
                        Name::new("RemoveBlockButton"),
                        ButtonBaseColor(BUTTON_BG),
                        BackgroundColor(BUTTON_BG),
                        BorderColor(BUTTON_BORDER),
                        button_node(),
                    ))
                    .with_children(|btn| {
                        btn.spawn((
                            Text::new("Remove Block (X)"),
                            TextFont {
                                font_size: 15.0,
                                ..default()
                            },
                            TextColor(Color::srgb(1.0, 1.0, 1.0)),
                        ));
                    });

                    // Sample colour
                    body.spawn((
                        SampleColorButton,
                        Button,
                        Name::new("SampleColorButton"),
                        ButtonBaseColor(BUTTON_BG),
                        BackgroundColor(BUTTON_BG),
                        BorderColor(BUTTON_BORDER),
                        button_node(),
                    ))
                    .with_children(|btn| {
                        btn.spawn((
                            Text::new("Sample Colour (C)"),
                            TextFont {
                                font_size: 15.0,
                                ..default()
                            },
                            TextColor(Color::srgb(1.0, 1.0, 1.0)),
                        ));
                    });

                    // Paint swatch row
                    body.spawn((
                        Name::new("PaintRow"),
                        Node {
                            width: Val::Percent(100.0),
                            height: Val::Px(28.0),
                            display: Display::Flex,
                            align_items: AlignItems::Center,
                            column_gap: Val::Px(8.0),
                            ..default()
                        },
                    ))
                    .with_children(|row| {
                        row.spawn((
                            Text::new("Paint"),
                            TextFont {
                                font_size: 14.0,
                                ..default()
                            },
                            TextColor(Color::srgb(0.8, 0.8, 0.8)),
                        ));
                        row.spawn((
                            PaintSwatch,
                            Name::new("PaintSwatch"),
                            BackgroundColor(Color::WHITE),
                            BorderColor(BUTTON_BORDER),
                            Node {
                                width: Val::Px(24.0),
                                height: Val::Px(24.0),
                                border: UiRect::all(Val::Px(1.0)),
                                ..default()
                            },
                        ));
                    });

                    body.spawn((
                        BlockCountLabel,
                        Text::new("Blocks: 0"),
                        TextFont {
                            font_size: 14.0,
                            ..default()
                        },
                        TextColor(Color::srgb(0.8, 0.8, 0.8)),
                    ));

                    // Reset scene
                    body.spawn((
                        ResetButton,
                        Button,
                        Name::new("ResetButton"),
                        ButtonBaseColor(RESET_BUTTON_BG),
                        BackgroundColor(RESET_BUTTON_BG),
                        BorderColor(BUTTON_BORDER),
                        button_node(),
                    ))
                    .with_children(|btn| {
                        btn.spawn((
                            Text::new("Reset Scene (R)"),
                            TextFont {
                                font_size: 15.0,
                                ..default()
                            },
                            TextColor(Color::srgb(1.0, 1.0, 1.0)),
                        ));
                    });
                });
        });

    // Crosshair at the viewport centre
    commands
        .spawn((
            Name::new("Crosshair"),
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                position_type: PositionType::Absolute,
                display: Display::Flex,
                align_items: AlignItems::Center,
                justify_content: JustifyContent::Center,
                ..default()
            },
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("+"),
                TextFont {
                    font_size: 22.0,
                    ..default()
                },
                TextColor(Color::srgba(1.0, 1.0, 1.0, 0.8)),
            ));
        });

    // Searching snackbar
    commands
        .spawn((
            Name::new("SnackbarRow"),
            Node {
                width: Val::Percent(100.0),
                position_type: PositionType::Absolute,
                bottom: Val::Px(24.0),
                display: Display::Flex,
                justify_content: JustifyContent::Center,
                ..default()
            },
        ))
        .with_children(|parent| {
            parent
                .spawn((
                    SearchingSnackbar,
                    Name::new("SearchingSnackbar"),
                    BackgroundColor(SNACKBAR_BG),
                    Visibility::Visible,
                    Node {
                        padding: UiRect::axes(Val::Px(16.0), Val::Px(8.0)),
                        ..default()
                    },
                ))
                .with_children(|snackbar| {
                    snackbar.spawn((
                        Text::new("Searching for surfaces..."),
                        TextFont {
                            font_size: 15.0,
                            ..default()
                        },
                        TextColor(Color::srgb(1.0, 1.0, 1.0)),
                    ));
                });
        });

    // Toast overlay, hidden until a lifecycle notice arrives
    commands
        .spawn((
            Name::new("ToastRow"),
            Node {
                width: Val::Percent(100.0),
                position_type: PositionType::Absolute,
                top: Val::Px(32.0),
                display: Display::Flex,
                justify_content: JustifyContent::Center,
                ..default()
            },
        ))
        .with_children(|parent| {
            parent
                .spawn((
                    ToastNode,
                    Name::new("Toast"),
                    BackgroundColor(TOAST_BG),
                    Visibility::Hidden,
                    Node {
                        padding: UiRect::axes(Val::Px(16.0), Val::Px(10.0)),
                        ..default()
                    },
                ))
                .with_children(|toast| {
                    toast.spawn((
                        ToastText,
                        Text::new(""),
                        TextFont {
                            font_size: 15.0,
                            ..default()
                        },
                        TextColor(Color::srgb(1.0, 0.9, 0.8)),
                    ));
                });
        });
}

fn button_node() -> Node {
    Node {
        width: Val::Percent(100.0),
        height: Val::Px(34.0),
        display: Display::Flex,
        align_items: AlignItems::Center,
        justify_content: JustifyContent::Center,
        border: UiRect::all(Val::Px(1.0)),
        ..default()
    }
}

fn pressed<F: QueryFilter>(query: &Query<&Interaction, F>) -> bool {
    query
        .iter()
        .any(|interaction| *interaction == Interaction::Pressed)
}

/// Translate panel button presses into the sandbox trigger events.
pub fn handle_panel_buttons(
    toggle: Query<&Interaction, (Changed<Interaction>, With<TogglePlanesButton>)>,
    add: Query<&Interaction, (Changed<Interaction>, With<AddBlockButton>)>,
    remove: Query<&Interaction, (Changed<Interaction>, With<RemoveBlockButton>)>,
    sample: Query<&Interaction, (Changed<Interaction>, With<SampleColorButton>)>,
    reset: Query<&Interaction, (Changed<Interaction>, With<ResetButton>)>,
    manager: Res<PlaneVisualizationManager>,
    mut toggle_events: EventWriter<TogglePlanesEvent>,
    mut block_events: EventWriter<BlockActionEvent>,
    mut sample_events: EventWriter<SampleColorEvent>,
    mut reset_events: EventWriter<ResetSceneEvent>,
) {
    if pressed(&toggle) {
        toggle_events.write(TogglePlanesEvent(!manager.search_enabled));
    }
    if pressed(&add) {
        block_events.write(BlockActionEvent {
            action: BlockAction::Place,
            source: ActionSource::Button,
        });
    }
    if pressed(&remove) {
        block_events.write(BlockActionEvent {
            action: BlockAction::Remove,
            source: ActionSource::Button,
        });
    }
    if pressed(&sample) {
        sample_events.write(SampleColorEvent);
    }
    if pressed(&reset) {
        reset_events.write(ResetSceneEvent);
    }
}

/// System handling keyboard shortcuts for the sandbox triggers (native
/// builds only).
#[cfg(not(target_arch = "wasm32"))]
pub fn handle_keyboard_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    manager: Res<PlaneVisualizationManager>,
    mut toggle_events: EventWriter<TogglePlanesEvent>,
    mut block_events: EventWriter<BlockActionEvent>,
    mut sample_events: EventWriter<SampleColorEvent>,
    mut reset_events: EventWriter<ResetSceneEvent>,
) {
    if keyboard.just_pressed(KeyCode::Space) {
        block_events.write(BlockActionEvent {
            action: BlockAction::Place,
            source: ActionSource::Keyboard,
        });
    }
    if keyboard.just_pressed(KeyCode::KeyX) {
        block_events.write(BlockActionEvent {
            action: BlockAction::Remove,
            source: ActionSource::Keyboard,
        });
    }
    if keyboard.just_pressed(KeyCode::KeyC) {
        sample_events.write(SampleColorEvent);
    }
    if keyboard.just_pressed(KeyCode::KeyT) {
        toggle_events.write(TogglePlanesEvent(!manager.search_enabled));
    }
    if keyboard.just_pressed(KeyCode::KeyR) {
        reset_events.write(ResetSceneEvent);
    }
}

/// Placeholder for WASM builds where keyboard shortcuts are disabled.
#[cfg(target_arch = "wasm32")]
pub fn handle_keyboard_shortcuts() {
    // Triggers come from the on-screen panel only.
}

/// Drive the "searching for surfaces" snackbar: while the session is
/// tracking it reflects whether any surfaced plane is actually in the
/// Tracking state; while the session is down (but valid) it shows only
/// when plane search is enabled.
pub fn update_searching_snackbar(
    session: Res<ArSession>,
    guard: Res<LifecycleGuard>,
    manager: Res<PlaneVisualizationManager>,
    planes: Query<&TrackedPlane>,
    mut snackbar: Query<&mut Visibility, With<SearchingSnackbar>>,
) {
    let visible = if session.status.is_tracking() {
        none_tracking(
            planes
                .iter()
                .filter(|plane| plane.state != PlaneTrackingState::Pending)
                .map(|plane| plane.state),
        )
    } else {
        session.status.is_valid() && !guard.is_quitting() && manager.search_enabled
    };

    for mut visibility in &mut snackbar {
        *visibility = if visible {
            Visibility::Visible
        } else {
            Visibility::Hidden
        };
    }
}

/// Keep the swatch in sync with the current paint colour.
pub fn update_paint_swatch(
    paint: Res<PaintColor>,
    mut swatches: Query<&mut BackgroundColor, With<PaintSwatch>>,
) {
    if !paint.is_changed() {
        return;
    }
    for mut background in &mut swatches {
        *background = BackgroundColor(paint.0);
    }
}

/// Keep the placed-block counter in sync with the voxel map.
pub fn reflect_block_count(
    registry: Res<VoxelRegistry>,
    mut labels: Query<&mut Text, With<BlockCountLabel>>,
) {
    if !registry.is_changed() {
        return;
    }
    for mut text in &mut labels {
        *text = Text::new(format!("Blocks: {}", registry.len()));
    }
}

/// Keep the toggle button label in sync with the search flag.
pub fn reflect_toggle_label(
    manager: Res<PlaneVisualizationManager>,
    mut labels: Query<&mut Text, With<TogglePlanesLabel>>,
) {
    if !manager.is_changed() {
        return;
    }
    let label = if manager.search_enabled {
        "Planes: On"
    } else {
        "Planes: Off"
    };
    for mut text in &mut labels {
        if text.0 != label {
            *text = Text::new(label);
        }
    }
}

/// Hover/press feedback for every panel button.
pub fn reflect_button_interactions(
    mut buttons: Query<
        (&Interaction, &ButtonBaseColor, &mut BackgroundColor),
        (Changed<Interaction>, With<Button>),
    >,
) {
    for (interaction, base, mut background) in &mut buttons {
        *background = BackgroundColor(match interaction {
            Interaction::Pressed => BUTTON_BG_PRESSED,
            Interaction::Hovered => BUTTON_BG_HOVER,
            Interaction::None => base.0,
        });
    }
}

/// Render toast notices for a fixed duration.
pub fn show_toasts(
    time: Res<Time>,
    mut events: EventReader<ToastEvent>,
    mut state: ResMut<ToastState>,
    mut toast_nodes: Query<&mut Visibility, With<ToastNode>>,
    mut toast_texts: Query<&mut Text, With<ToastText>>,
) {
    for event in events.read() {
        for mut text in &mut toast_texts {
            *text = Text::new(event.message.clone());
        }
        for mut visibility in &mut toast_nodes {
            *visibility = Visibility::Visible;
        }
        state.timer = Timer::from_seconds(TOAST_SECONDS, TimerMode::Once);
        info!("Toast: {}", event.message);
    }

    if state.timer.tick(time.delta()).just_finished() {
        for mut visibility in &mut toast_nodes {
            *visibility = Visibility::Hidden;
        }
    }
}
