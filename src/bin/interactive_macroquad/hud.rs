use macroquad::prelude::*;

use crate::constants::TITLE_Y;
use crate::controls::phase_text;
use crate::render::draw_ui_text;
use crate::state::AppRuntime;

pub(crate) fn draw_hud(state: &AppRuntime, left: f32, screen_h: f32, font: Option<&Font>) {
    draw_header_block(left, font);
    draw_results_block(state, screen_h, font);
    draw_status_block(state, left, screen_h, font);
}

fn draw_header_block(left: f32, font: Option<&Font>) {
    draw_ui_text(
        "ParabolicRust - Projectile Replay",
        left,
        TITLE_Y,
        30,
        Color::from_rgba(30, 30, 35, 255),
        font,
    );
    draw_ui_text(
        "Controls: sliders set the launch | Space start/restart | P toggle preview",
        left,
        TITLE_Y + 30.0,
        20,
        DARKGRAY,
        font,
    );
}

fn draw_results_block(state: &AppRuntime, screen_h: f32, font: Option<&Font>) {
    let x = 30.0;
    let mut y = (screen_h * 0.5) + 40.0;
    draw_ui_text("Results", x, y, 26, BLACK, font);

    let Some(summary) = state.scheduler.last_summary() else {
        draw_ui_text("No run yet", x, y + 30.0, 20, DARKGRAY, font);
        return;
    };
    for line in [
        format!("Time of flight: {} s", summary.time),
        format!("Range: {} m", summary.range),
        format!("Max height: {} m", summary.max_height),
    ] {
        y += 30.0;
        draw_ui_text(&line, x, y, 22, DARKGRAY, font);
    }
}

fn draw_status_block(state: &AppRuntime, left: f32, screen_h: f32, font: Option<&Font>) {
    let (t, (x, y)) = state
        .scheduler
        .state()
        .map_or((0.0, (0.0, 0.0)), |s| (s.virtual_time_s, s.position));

    draw_ui_text(
        &format!(
            "t = {:.2} s | x = {:.2} m | y = {:.2} m | ticks: {} | State: {}",
            t,
            x,
            y,
            state.trail.points.len(),
            phase_text(state.scheduler.phase())
        ),
        left,
        screen_h - 40.0,
        20,
        BLUE,
        font,
    );
    draw_ui_text(&state.status_line, left, screen_h - 12.0, 18, DARKGRAY, font);
}
