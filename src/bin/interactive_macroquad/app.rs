use macroquad::prelude::*;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use parabolic_rust::core::window::{AxisWindow, ScreenRect};
use parabolic_rust::core::{Phase, TickOutcome};

use crate::constants::{
    BOTTOM_MARGIN, INITIAL_WINDOW_HEIGHT, INITIAL_WINDOW_WIDTH, LEFT_MARGIN, MSAA_SAMPLES,
    RIGHT_MARGIN, TOP_MARGIN, TRAJECTORY_SAMPLES, UI_FONT_PATH,
};
use crate::controls::{FrameActions, draw_control_panel, hotkey_actions};
use crate::hud::draw_hud;
use crate::render::{draw_axis_tick_labels, draw_grid, draw_path, draw_trail};
use crate::state::AppRuntime;

pub(crate) fn window_conf() -> Conf {
    Conf {
        window_title: "ParabolicRust Replay".to_string(),
        window_width: INITIAL_WINDOW_WIDTH,
        window_height: INITIAL_WINDOW_HEIGHT,
        high_dpi: true,
        sample_count: MSAA_SAMPLES,
        ..Default::default()
    }
}

fn apply_actions(state: &mut AppRuntime, actions: FrameActions) {
    if actions.toggle_preview {
        state.show_preview = !state.show_preview;
    }
    if !actions.start {
        return;
    }

    match state.scheduler.start(state.form.to_parameters()) {
        Ok(derived) => {
            state.trail.points.clear();
            state.window = AxisWindow::for_flight(&derived);
            state.preview = derived.sample_trajectory(TRAJECTORY_SAMPLES);
            state.derived = Some(derived);
            state.status_line = "Running".to_string();
        }
        Err(err) => state.set_error_status(err),
    }
}

fn step_replay(state: &mut AppRuntime) {
    match state.scheduler.poll(&mut state.trail) {
        Ok(TickOutcome::Landed { t, x, .. }) => {
            info!(t, x, "landed");
            state.status_line = format!("Landed at x = {x:.2} m after {t:.2} s");
        }
        Ok(_) => {}
        Err(err) => {
            warn!(error = %err, "replay aborted");
            state.set_error_status(err);
        }
    }
}

pub(crate) async fn run() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();

    let ui_font = match load_ttf_font(UI_FONT_PATH).await {
        Ok(font) => Some(font),
        Err(err) => {
            warn!("Could not load '{UI_FONT_PATH}': {err}. Falling back to default font.");
            None
        }
    };

    let mut state = AppRuntime::new();

    loop {
        let screen_w = screen_width();
        let screen_h = screen_height();
        let rect = ScreenRect {
            left: f64::from(LEFT_MARGIN),
            top: f64::from(TOP_MARGIN),
            right: f64::from(screen_w - RIGHT_MARGIN),
            bottom: f64::from(screen_h - BOTTOM_MARGIN),
        };

        let actions = hotkey_actions().merge(draw_control_panel(&mut state));
        apply_actions(&mut state, actions);
        step_replay(&mut state);

        clear_background(Color::from_rgba(250, 251, 253, 255));
        draw_grid(rect, Color::from_rgba(227, 231, 236, 255));
        draw_axis_tick_labels(rect, &state.window, ui_font.as_ref());

        if state.show_preview && state.derived.is_some() {
            let alpha = if state.scheduler.phase() == Phase::Running {
                70
            } else {
                140
            };
            draw_path(
                &state.preview,
                &state.window,
                rect,
                2.0,
                Color::from_rgba(76, 141, 245, alpha),
            );
        }
        draw_trail(&state.trail.points, &state.window, rect);

        draw_hud(&state, LEFT_MARGIN, screen_h, ui_font.as_ref());

        next_frame().await;
    }
}
