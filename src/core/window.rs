use crate::core::ballistics::DerivedQuantities;

pub const DISTANCE_TO_HEIGHT_RATIO: f64 = 2.0; // x:y data window ratio

const X_PADDING_RATIO: f64 = 0.06;
const Y_PADDING_RATIO: f64 = 0.10;

/// World-space extent of a plot, origin at the bottom-left.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisWindow {
    pub x_span: f64,
    pub y_span: f64,
}

/// Pixel rectangle on a y-down surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenRect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl AxisWindow {
    /// Padded window with a fixed x:y ratio that fits `raw_max_x` by `raw_max_y`.
    pub fn fixed_ratio(raw_max_x: f64, raw_max_y: f64) -> Self {
        let raw_x_span = raw_max_x.max(1.0);
        let raw_y_span = raw_max_y.max(1.0);
        let x_pad = raw_x_span * X_PADDING_RATIO;
        let y_pad = raw_y_span * Y_PADDING_RATIO;

        let mut x_span = (raw_max_x + x_pad).max(1.0);
        let mut y_span = (raw_max_y + y_pad).max(1.0);

        if x_span / y_span < DISTANCE_TO_HEIGHT_RATIO {
            x_span = y_span * DISTANCE_TO_HEIGHT_RATIO;
        } else {
            y_span = x_span / DISTANCE_TO_HEIGHT_RATIO;
        }

        Self { x_span, y_span }
    }

    pub fn for_flight(derived: &DerivedQuantities) -> Self {
        Self::fixed_ratio(derived.max_range_m.abs(), derived.max_height_m.abs())
    }

    /// Maps world meters (y up) into `rect` (y down).
    pub fn world_to_screen(&self, world: (f64, f64), rect: ScreenRect) -> (f64, f64) {
        let plot_w = (rect.right - rect.left).max(1.0);
        let plot_h = (rect.bottom - rect.top).max(1.0);
        let x = rect.left + (world.0 / self.x_span) * plot_w;
        let y = rect.bottom - (world.1 / self.y_span) * plot_h;
        (x, y)
    }
}
