use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::core::ballistics::DerivedQuantities;
use crate::core::error::RenderError;
use crate::core::sink::RenderSink;
use crate::core::window::AxisWindow;

const PREVIEW_SAMPLES: usize = 120;
const POINT_RADIUS_PX: i32 = 2;

/// Render sink that collects the replay and writes it out as an SVG chart,
/// with the predicted arc drawn underneath the plotted points.
#[derive(Clone, Debug)]
pub struct SvgPlotSink {
    window: AxisWindow,
    preview: Vec<(f64, f64)>,
    points: Vec<(f64, f64)>,
    size: (u32, u32),
    labels: bool,
}

impl SvgPlotSink {
    pub fn new(derived: &DerivedQuantities) -> Self {
        Self {
            window: AxisWindow::for_flight(derived),
            preview: derived.sample_trajectory(PREVIEW_SAMPLES),
            points: Vec::new(),
            size: (1500, 565),
            labels: true,
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    /// Axis labels need a system font; turn them off where none is available.
    pub fn with_labels(mut self, labels: bool) -> Self {
        self.labels = labels;
        self
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn save(&self, path: &Path) -> Result<(), RenderError> {
        let root = SVGBackend::new(path, self.size).into_drawing_area();
        self.draw_chart(&root)?;
        root.present().map_err(backend_error)
    }

    pub fn render_to_string(&self) -> Result<String, RenderError> {
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, self.size).into_drawing_area();
            self.draw_chart(&root)?;
            root.present().map_err(backend_error)?;
        }
        Ok(svg)
    }

    fn draw_chart<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
    ) -> Result<(), RenderError> {
        root.fill(&WHITE).map_err(backend_error)?;

        let mut builder = ChartBuilder::on(root);
        builder.margin(20);
        if self.labels {
            builder.x_label_area_size(40).y_label_area_size(50);
        }
        let mut chart = builder
            .build_cartesian_2d(0f64..self.window.x_span, 0f64..self.window.y_span)
            .map_err(backend_error)?;

        if self.labels {
            chart
                .configure_mesh()
                .x_desc("Distance (m)")
                .y_desc("Height (m)")
                .draw()
                .map_err(backend_error)?;
        }

        chart
            .draw_series(LineSeries::new(
                self.preview.iter().copied(),
                RGBColor(76, 141, 245).mix(0.5),
            ))
            .map_err(backend_error)?;
        chart
            .draw_series(
                self.points
                    .iter()
                    .map(|&point| Circle::new(point, POINT_RADIUS_PX, BLUE.filled())),
            )
            .map_err(backend_error)?;
        Ok(())
    }
}

impl RenderSink for SvgPlotSink {
    fn draw(&mut self, x: f64, y: f64) -> Result<(), RenderError> {
        if !x.is_finite() || !y.is_finite() {
            return Err(RenderError::Backend(format!(
                "cannot plot non-finite point ({x}, {y})"
            )));
        }
        self.points.push((x, y));
        Ok(())
    }
}

fn backend_error<E: std::error::Error>(err: E) -> RenderError {
    RenderError::Backend(err.to_string())
}
