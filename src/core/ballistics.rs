use std::fmt;

use serde::Serialize;

use crate::core::params::SimulationParameters;

pub const EARTH_GRAVITY_MPS2: f64 = 9.8;

/// Wall-clock milliseconds per virtual second at a time compression of 1.
pub const BASE_INTERVAL_MS: f64 = 1000.0;

pub fn velocity_components(speed_mps: f64, angle_deg: f64) -> (f64, f64) {
    let theta = angle_deg.to_radians();
    let vx = speed_mps * theta.cos();
    let vy = speed_mps * theta.sin();
    (vx, vy)
}

/// Closed-form flight constants for one launch. Built once per run.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DerivedQuantities {
    pub horizontal_velocity_mps: f64,
    pub vertical_velocity_mps: f64,
    pub time_of_flight_s: f64,
    pub max_range_m: f64,
    pub max_height_m: f64,
}

impl DerivedQuantities {
    /// Total over finite input; no validation happens here.
    pub fn derive(params: &SimulationParameters) -> Self {
        let (vx, vy) = velocity_components(params.initial_velocity_mps, params.launch_angle_deg);
        let time_of_flight_s = (2.0 * vy) / EARTH_GRAVITY_MPS2;
        Self {
            horizontal_velocity_mps: vx,
            vertical_velocity_mps: vy,
            time_of_flight_s,
            max_range_m: vx * time_of_flight_s,
            max_height_m: (vy * vy) / (2.0 * EARTH_GRAVITY_MPS2),
        }
    }

    pub fn position_at(&self, time_s: f64) -> (f64, f64) {
        let x = self.horizontal_velocity_mps * time_s;
        let y = (self.vertical_velocity_mps * time_s)
            - (0.5 * EARTH_GRAVITY_MPS2 * time_s * time_s);
        (x, y)
    }

    /// Evenly spaced points over `[0, time_of_flight_s]`, both ends included.
    pub fn sample_trajectory(&self, samples: usize) -> Vec<(f64, f64)> {
        let sample_count = samples.max(2);
        let flight = self.time_of_flight_s.max(0.0);
        (0..=sample_count)
            .map(|i| {
                let t = (i as f64 * flight) / sample_count as f64;
                self.position_at(t)
            })
            .collect()
    }

    pub fn summary(&self) -> FlightSummary {
        FlightSummary {
            time: format!("{:.2}", self.time_of_flight_s),
            range: format!("{:.2}", self.max_range_m),
            max_height: format!("{:.2}", self.max_height_m),
        }
    }
}

/// Display strings for the results panel, two decimals each.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FlightSummary {
    pub time: String,
    pub range: String,
    pub max_height: String,
}

impl fmt::Display for FlightSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Time of flight: {} s", self.time)?;
        writeln!(f, "Range: {} m", self.range)?;
        write!(f, "Max height: {} m", self.max_height)
    }
}

#[cfg(test)]
mod tests {
    use super::{DerivedQuantities, velocity_components};
    use crate::core::params::SimulationParameters;

    fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "actual={actual}, expected={expected}, tolerance={tolerance}"
        );
    }

    fn derive(speed: f64, angle: f64) -> DerivedQuantities {
        DerivedQuantities::derive(&SimulationParameters::new(speed, angle, 10.0))
    }

    #[test]
    fn forty_five_degrees_at_hundred() {
        let d = derive(100.0, 45.0);
        assert_close(d.horizontal_velocity_mps, 70.7107, 0.001);
        assert_close(d.vertical_velocity_mps, 70.7107, 0.001);

        let summary = d.summary();
        assert_eq!(summary.time, "14.43");
        assert_eq!(summary.range, "1020.41");
        assert_eq!(summary.max_height, "255.10");
    }

    #[test]
    fn zero_velocity_is_all_zero() {
        for angle in [0.0, 30.0, 90.0] {
            let d = derive(0.0, angle);
            assert_eq!(d.time_of_flight_s, 0.0);
            assert_eq!(d.max_range_m, 0.0);
            assert_eq!(d.max_height_m, 0.0);
        }
    }

    #[test]
    fn vertical_shot_has_no_range() {
        let d = derive(50.0, 90.0);
        assert_close(d.max_range_m, 0.0, 1e-9);
        assert_eq!(d.summary().max_height, "127.55");
        assert_eq!(d.summary().time, "10.20");
    }

    #[test]
    fn flat_shot_lands_immediately() {
        let d = derive(30.0, 0.0);
        assert_eq!(d.time_of_flight_s, 0.0);
        assert_eq!(d.max_range_m, 0.0);
        assert_close(d.horizontal_velocity_mps, 30.0, 1e-12);
    }

    #[test]
    fn negative_velocity_mirrors_trajectory() {
        let d = derive(-20.0, 45.0);
        assert!(d.time_of_flight_s < 0.0);
        assert!(d.max_range_m > 0.0);
        assert!(d.max_height_m > 0.0);
    }

    #[test]
    fn reserved_fields_do_not_change_result() {
        let base = SimulationParameters::new(80.0, 30.0, 10.0);
        let heavy = SimulationParameters {
            mass_kg: 500.0,
            drag_coefficient: 2.5,
            ..base
        };
        assert_eq!(
            DerivedQuantities::derive(&base),
            DerivedQuantities::derive(&heavy)
        );
    }

    #[test]
    fn derive_is_repeatable() {
        let params = SimulationParameters::new(42.0, 33.0, 4.0);
        assert_eq!(
            DerivedQuantities::derive(&params),
            DerivedQuantities::derive(&params)
        );
    }

    #[test]
    fn position_at_apex_and_landing() {
        let d = derive(100.0, 45.0);
        let (_, apex_y) = d.position_at(d.time_of_flight_s / 2.0);
        assert_close(apex_y, d.max_height_m, 1e-6);

        let (land_x, land_y) = d.position_at(d.time_of_flight_s);
        assert_close(land_x, d.max_range_m, 1e-6);
        assert_close(land_y, 0.0, 1e-9);
    }

    #[test]
    fn sampled_trajectory_spans_flight() {
        let d = derive(20.0, 60.0);
        let points = d.sample_trajectory(16);
        assert_eq!(points.len(), 17);
        assert_eq!(points[0], (0.0, 0.0));
        let last = points[points.len() - 1];
        assert_close(last.0, d.max_range_m, 1e-9);
        assert_close(last.1, 0.0, 1e-9);
    }

    #[test]
    fn components_follow_degrees() {
        let (vx, vy) = velocity_components(10.0, 30.0);
        assert_close(vx, 8.6603, 0.001);
        assert_close(vy, 5.0, 1e-9);
    }

    #[test]
    fn summary_display_has_units() {
        let text = derive(100.0, 45.0).summary().to_string();
        assert!(text.contains("Time of flight: 14.43 s"));
        assert!(text.contains("Max height: 255.10 m"));
    }
}
