use serde::{Deserialize, Serialize};

use crate::core::error::InputError;

/// Launch parameters captured when a run starts.
///
/// `mass_kg` and `drag_coefficient` are carried through untouched; the
/// closed-form solver in `ballistics` does not read them.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParameters {
    pub initial_velocity_mps: f64,
    pub launch_angle_deg: f64,
    pub mass_kg: f64,
    pub drag_coefficient: f64,
    pub time_compression: f64,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            initial_velocity_mps: 100.0,
            launch_angle_deg: 45.0,
            mass_kg: 5.0,
            drag_coefficient: 0.1,
            time_compression: 10.0,
        }
    }
}

impl SimulationParameters {
    pub fn new(initial_velocity_mps: f64, launch_angle_deg: f64, time_compression: f64) -> Self {
        Self {
            initial_velocity_mps,
            launch_angle_deg,
            time_compression,
            ..Self::default()
        }
    }

    /// Boundary check applied by `AnimationScheduler::start`.
    pub fn validate(&self) -> Result<(), InputError> {
        let fields = [
            ("initial_velocity_mps", self.initial_velocity_mps),
            ("launch_angle_deg", self.launch_angle_deg),
            ("mass_kg", self.mass_kg),
            ("drag_coefficient", self.drag_coefficient),
            ("time_compression", self.time_compression),
        ];
        if let Some((field, value)) = fields.into_iter().find(|(_, v)| !v.is_finite()) {
            return Err(InputError::NonFinite { field, value });
        }
        if self.initial_velocity_mps < 0.0 {
            return Err(InputError::NegativeVelocity(self.initial_velocity_mps));
        }
        if self.time_compression <= 0.0 {
            return Err(InputError::NonPositiveTimeCompression(
                self.time_compression,
            ));
        }
        Ok(())
    }

    /// Wall-clock milliseconds that make up one virtual second.
    pub fn wall_ms_per_virtual_second(&self) -> f64 {
        crate::core::ballistics::BASE_INTERVAL_MS / self.time_compression
    }
}

#[cfg(test)]
mod tests {
    use super::SimulationParameters;
    use crate::core::error::InputError;

    #[test]
    fn defaults_match_launch_form() {
        let params = SimulationParameters::default();
        assert_eq!(params.initial_velocity_mps, 100.0);
        assert_eq!(params.launch_angle_deg, 45.0);
        assert_eq!(params.time_compression, 10.0);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn rejects_nan_velocity() {
        let params = SimulationParameters::new(f64::NAN, 45.0, 10.0);
        match params.validate() {
            Err(InputError::NonFinite { field, .. }) => assert_eq!(field, "initial_velocity_mps"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn rejects_infinite_reserved_fields() {
        let params = SimulationParameters {
            drag_coefficient: f64::INFINITY,
            ..SimulationParameters::default()
        };
        assert!(matches!(
            params.validate(),
            Err(InputError::NonFinite {
                field: "drag_coefficient",
                ..
            })
        ));
    }

    #[test]
    fn rejects_negative_velocity_and_zero_compression() {
        assert_eq!(
            SimulationParameters::new(-1.0, 45.0, 10.0).validate(),
            Err(InputError::NegativeVelocity(-1.0))
        );
        assert_eq!(
            SimulationParameters::new(10.0, 45.0, 0.0).validate(),
            Err(InputError::NonPositiveTimeCompression(0.0))
        );
    }

    #[test]
    fn out_of_range_angles_are_accepted() {
        assert!(SimulationParameters::new(10.0, -30.0, 1.0).validate().is_ok());
        assert!(SimulationParameters::new(10.0, 135.0, 1.0).validate().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let params: SimulationParameters =
            serde_json::from_str(r#"{ "initial_velocity_mps": 50.0 }"#).expect("valid json");
        assert_eq!(params.initial_velocity_mps, 50.0);
        assert_eq!(params.launch_angle_deg, 45.0);
        assert_eq!(params.mass_kg, 5.0);
    }
}
