use parabolic_rust::core::window::AxisWindow;
use parabolic_rust::core::{
    AnimationScheduler, DerivedQuantities, RenderError, RenderSink, SimulationParameters,
};

/// Slider-backed copy of the launch form. Mass and drag are shown but inert.
#[derive(Clone, Copy)]
pub(crate) struct LaunchForm {
    pub(crate) velocity_mps: f32,
    pub(crate) angle_deg: f32,
    pub(crate) mass_kg: f32,
    pub(crate) drag_coefficient: f32,
    pub(crate) time_compression: f32,
}

impl LaunchForm {
    pub(crate) fn to_parameters(self) -> SimulationParameters {
        SimulationParameters {
            initial_velocity_mps: f64::from(self.velocity_mps),
            launch_angle_deg: f64::from(self.angle_deg),
            mass_kg: f64::from(self.mass_kg),
            drag_coefficient: f64::from(self.drag_coefficient),
            time_compression: f64::from(self.time_compression),
        }
    }
}

impl Default for LaunchForm {
    fn default() -> Self {
        let params = SimulationParameters::default();
        Self {
            velocity_mps: params.initial_velocity_mps as f32,
            angle_deg: params.launch_angle_deg as f32,
            mass_kg: params.mass_kg as f32,
            drag_coefficient: params.drag_coefficient as f32,
            time_compression: params.time_compression as f32,
        }
    }
}

/// Canvas-side sink: keeps plotted world points until the next start.
#[derive(Default)]
pub(crate) struct CanvasTrail {
    pub(crate) points: Vec<(f64, f64)>,
}

impl RenderSink for CanvasTrail {
    fn draw(&mut self, x: f64, y: f64) -> Result<(), RenderError> {
        self.points.push((x, y));
        Ok(())
    }
}

pub(crate) struct AppRuntime {
    pub(crate) form: LaunchForm,
    pub(crate) scheduler: AnimationScheduler,
    pub(crate) trail: CanvasTrail,
    pub(crate) derived: Option<DerivedQuantities>,
    pub(crate) preview: Vec<(f64, f64)>,
    pub(crate) window: AxisWindow,
    pub(crate) show_preview: bool,
    pub(crate) status_line: String,
}

impl AppRuntime {
    pub(crate) fn new() -> Self {
        Self {
            form: LaunchForm::default(),
            scheduler: AnimationScheduler::new(),
            trail: CanvasTrail::default(),
            derived: None,
            preview: Vec::new(),
            window: AxisWindow::fixed_ratio(100.0, 50.0),
            show_preview: true,
            status_line: "Set the launch and press Start".to_string(),
        }
    }

    pub(crate) fn set_error_status(&mut self, err: impl std::fmt::Display) {
        self.status_line = format!("Error: {err}");
    }
}
