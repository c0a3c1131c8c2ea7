use macroquad::prelude::*;

use parabolic_rust::core::window::{AxisWindow, ScreenRect};

use crate::constants::{POINT_RADIUS_PX, X_GRID_LINES, Y_GRID_LINES};

fn format_axis_value(value: f64, axis_max: f64) -> String {
    if axis_max >= 1000.0 {
        format!("{value:.0}")
    } else if axis_max >= 100.0 {
        format!("{value:.1}")
    } else {
        format!("{value:.2}")
    }
}

fn to_screen(window: &AxisWindow, rect: ScreenRect, world: (f64, f64)) -> Vec2 {
    let (x, y) = window.world_to_screen(world, rect);
    vec2(x as f32, y as f32)
}

pub(crate) fn draw_ui_text(
    text: &str,
    x: f32,
    y: f32,
    font_size: u16,
    color: Color,
    font: Option<&Font>,
) {
    draw_text_ex(
        text,
        x,
        y,
        TextParams {
            font,
            font_size,
            color,
            ..Default::default()
        },
    );
}

pub(crate) fn draw_grid(rect: ScreenRect, color: Color) {
    let (left, top, right, bottom) = (
        rect.left as f32,
        rect.top as f32,
        rect.right as f32,
        rect.bottom as f32,
    );
    for i in 0..=X_GRID_LINES {
        let t = i as f32 / X_GRID_LINES as f32;
        let x = left + t * (right - left);
        draw_line(x, top, x, bottom, 1.0, color);
    }
    for i in 0..=Y_GRID_LINES {
        let t = i as f32 / Y_GRID_LINES as f32;
        let y = bottom - t * (bottom - top);
        draw_line(left, y, right, y, 1.0, color);
    }
    draw_line(left, bottom, right, bottom, 2.0, DARKGRAY);
    draw_line(left, top, left, bottom, 2.0, DARKGRAY);
}

pub(crate) fn draw_axis_tick_labels(rect: ScreenRect, window: &AxisWindow, font: Option<&Font>) {
    let label_color = Color::from_rgba(105, 113, 124, 255);
    let tick_font_size: u16 = 16;
    let (left, top, right, bottom) = (
        rect.left as f32,
        rect.top as f32,
        rect.right as f32,
        rect.bottom as f32,
    );

    for i in 0..=X_GRID_LINES {
        let t = i as f32 / X_GRID_LINES as f32;
        let x = left + t * (right - left);
        let label = format_axis_value(f64::from(t) * window.x_span, window.x_span);
        let size = measure_text(&label, font, tick_font_size, 1.0);
        draw_ui_text(
            &label,
            x - (size.width * 0.5),
            bottom + 22.0,
            tick_font_size,
            label_color,
            font,
        );
    }

    for i in 0..=Y_GRID_LINES {
        let t = i as f32 / Y_GRID_LINES as f32;
        let y = bottom - t * (bottom - top);
        let label = format_axis_value(f64::from(t) * window.y_span, window.y_span);
        let size = measure_text(&label, font, tick_font_size, 1.0);
        draw_ui_text(
            &label,
            (left - 8.0) - size.width,
            y + (size.height * 0.35),
            tick_font_size,
            label_color,
            font,
        );
    }

    draw_ui_text(
        "Distance (m)",
        right - 130.0,
        bottom + 48.0,
        18,
        label_color,
        font,
    );
    draw_ui_text("Height (m)", left + 10.0, top - 8.0, 18, label_color, font);
}

pub(crate) fn draw_path(
    points: &[(f64, f64)],
    window: &AxisWindow,
    rect: ScreenRect,
    thickness: f32,
    color: Color,
) {
    if points.len() < 2 {
        return;
    }
    let mut prev = to_screen(window, rect, points[0]);
    for point in points.iter().skip(1).copied() {
        let cur = to_screen(window, rect, point);
        draw_line(prev.x, prev.y, cur.x, cur.y, thickness, color);
        prev = cur;
    }
}

/// One dot per plotted tick, matching how the replay was emitted.
pub(crate) fn draw_trail(points: &[(f64, f64)], window: &AxisWindow, rect: ScreenRect) {
    for point in points.iter().copied() {
        let p = to_screen(window, rect, point);
        draw_circle(p.x, p.y, POINT_RADIUS_PX, BLUE);
    }
    if let Some(last) = points.last().copied() {
        let p = to_screen(window, rect, last);
        draw_circle_lines(p.x, p.y, POINT_RADIUS_PX * 3.0, 2.0, MAROON);
    }
}
