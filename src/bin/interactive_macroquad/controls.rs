use macroquad::prelude::*;
use macroquad::ui::{hash, root_ui, widgets};

use parabolic_rust::core::Phase;

use crate::state::AppRuntime;

#[derive(Default, Clone, Copy)]
pub(crate) struct FrameActions {
    pub(crate) start: bool,
    pub(crate) toggle_preview: bool,
}

impl FrameActions {
    pub(crate) fn merge(self, other: Self) -> Self {
        Self {
            start: self.start || other.start,
            toggle_preview: self.toggle_preview || other.toggle_preview,
        }
    }
}

pub(crate) fn hotkey_actions() -> FrameActions {
    FrameActions {
        start: is_key_pressed(KeyCode::Space),
        toggle_preview: is_key_pressed(KeyCode::P),
    }
}

pub(crate) fn draw_control_panel(state: &mut AppRuntime) -> FrameActions {
    let mut actions = FrameActions::default();
    let phase = state.scheduler.phase();

    widgets::Window::new(hash!(), vec2(18.0, 120.0), vec2(370.0, 330.0))
        .label("Simulation Settings")
        .ui(&mut *root_ui(), |ui| {
            ui.slider(
                hash!(),
                "Velocity (m/s)",
                0.0..500.0,
                &mut state.form.velocity_mps,
            );
            ui.slider(
                hash!(),
                "Angle (deg)",
                0.0..90.0,
                &mut state.form.angle_deg,
            );
            ui.slider(
                hash!(),
                "Time compression",
                0.5..50.0,
                &mut state.form.time_compression,
            );
            ui.separator();
            ui.label(
                None,
                &format!(
                    "Mass: {:.1} kg | Drag: {:.2} (not simulated)",
                    state.form.mass_kg, state.form.drag_coefficient
                ),
            );
            ui.separator();
            if ui.button(None, "Start (Space)") {
                actions.start = true;
            }
            if ui.button(None, "Toggle Preview (P)") {
                actions.toggle_preview = true;
            }
            ui.label(None, &format!("Flight state: {}", phase_text(phase)));
        });

    actions
}

pub(crate) fn phase_text(phase: Phase) -> &'static str {
    match phase {
        Phase::Idle => "Idle",
        Phase::Running => "Flying",
        Phase::Landed => "Landed",
    }
}
