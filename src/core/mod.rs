pub mod ballistics;
pub mod clock;
pub mod error;
pub mod params;
pub mod plot;
pub mod scheduler;
pub mod sink;
pub mod timer;
pub mod window;

pub use ballistics::{DerivedQuantities, FlightSummary};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{InputError, RenderError, SimulationError, SimulationResult};
pub use params::SimulationParameters;
pub use scheduler::{
    AnimationScheduler, AnimationState, PacingPolicy, Phase, RunId, SimulationSession, TickOutcome,
};
pub use sink::{RenderSink, TrailRecorder};
