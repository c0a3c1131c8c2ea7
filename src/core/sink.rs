use crate::core::error::RenderError;

/// Receives each plotted position of a running replay.
///
/// Coordinates are world meters with the origin at the launch point and y
/// increasing upward. Sinks that draw onto a y-down surface flip on their side.
pub trait RenderSink {
    fn draw(&mut self, x: f64, y: f64) -> Result<(), RenderError>;
}

impl<F> RenderSink for F
where
    F: FnMut(f64, f64) -> Result<(), RenderError>,
{
    fn draw(&mut self, x: f64, y: f64) -> Result<(), RenderError> {
        self(x, y)
    }
}

/// Keeps every plotted point in memory.
#[derive(Clone, Debug, Default)]
pub struct TrailRecorder {
    points: Vec<(f64, f64)>,
}

impl TrailRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn last(&self) -> Option<(f64, f64)> {
        self.points.last().copied()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}

impl RenderSink for TrailRecorder {
    fn draw(&mut self, x: f64, y: f64) -> Result<(), RenderError> {
        self.points.push((x, y));
        Ok(())
    }
}
