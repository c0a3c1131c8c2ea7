//! Real-time replay of a derived trajectory.
//!
//! A run moves `Idle -> Running -> Landed`. Each tick samples the closed-form
//! position at the current virtual time, hands it to a [`RenderSink`] and
//! either lands (`y < 0`) or schedules the next tick on the [`TimerQueue`].
//! Every run carries a [`RunId`]; a new `start` cancels the previous run's
//! pending timer and any timer carrying an old id is discarded unfired.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::core::ballistics::{DerivedQuantities, FlightSummary};
use crate::core::clock::{Clock, SystemClock, delay_from_ms, elapsed_ms};
use crate::core::error::SimulationResult;
use crate::core::params::SimulationParameters;
use crate::core::sink::RenderSink;
use crate::core::timer::{TimerHandle, TimerQueue};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Landed,
}

/// How long to wait after a tick before the next one.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum PacingPolicy {
    /// Wait as many milliseconds as the run's current virtual time in seconds.
    /// Early ticks come fast and the gaps widen as the flight goes on.
    #[default]
    ElapsedVirtualTime,
    /// Wait a constant number of milliseconds between ticks.
    FixedInterval { ms: f64 },
}

impl PacingPolicy {
    pub fn next_delay_ms(&self, virtual_time_s: f64) -> f64 {
        match self {
            Self::ElapsedVirtualTime => virtual_time_s,
            Self::FixedInterval { ms } => *ms,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RunId(u64);

impl RunId {
    pub fn get(self) -> u64 {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationState {
    pub run_start: DateTime<Utc>,
    pub virtual_time_s: f64,
    pub position: (f64, f64),
    pub phase: Phase,
}

/// Everything owned by one run. Only `start` creates it and only ticks
/// mutate it.
#[derive(Debug)]
pub struct SimulationSession {
    run: RunId,
    params: SimulationParameters,
    derived: DerivedQuantities,
    state: AnimationState,
    pending: Option<TimerHandle>,
    ticks: usize,
}

impl SimulationSession {
    pub fn run(&self) -> RunId {
        self.run
    }

    pub fn params(&self) -> &SimulationParameters {
        &self.params
    }

    pub fn derived(&self) -> &DerivedQuantities {
        &self.derived
    }

    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    pub fn ticks(&self) -> usize {
        self.ticks
    }

    fn tick<S>(
        &mut self,
        now: DateTime<Utc>,
        pacing: PacingPolicy,
        timers: &mut TimerQueue<RunId>,
        sink: &mut S,
    ) -> SimulationResult<TickOutcome>
    where
        S: RenderSink + ?Sized,
    {
        self.pending = None;

        let elapsed = elapsed_ms(self.state.run_start, now);
        let t = (elapsed / self.params.wall_ms_per_virtual_second())
            .max(self.state.virtual_time_s);
        let (x, y) = self.derived.position_at(t);
        self.state.virtual_time_s = t;
        self.state.position = (x, y);
        self.ticks += 1;

        if let Err(err) = sink.draw(x, y) {
            self.state.phase = Phase::Landed;
            warn!(run = self.run.0, t, error = %err, "render sink failed, aborting run");
            return Err(err.into());
        }

        if y < 0.0 {
            self.state.phase = Phase::Landed;
            debug!(run = self.run.0, t, x, y, ticks = self.ticks, "landed");
            return Ok(TickOutcome::Landed { t, x, y });
        }

        let due = now + delay_from_ms(pacing.next_delay_ms(t));
        self.pending = Some(timers.schedule_at(due, self.run));
        debug!(run = self.run.0, t, x, y, "tick");
        Ok(TickOutcome::Plotted { t, x, y })
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TickOutcome {
    /// No run is active.
    Inactive,
    /// A run is active but its next tick is not due yet.
    Waiting,
    /// A timer from a superseded run fired and was dropped.
    Stale,
    Plotted { t: f64, x: f64, y: f64 },
    Landed { t: f64, x: f64, y: f64 },
}

pub struct AnimationScheduler<C: Clock = SystemClock> {
    clock: C,
    pacing: PacingPolicy,
    timers: TimerQueue<RunId>,
    session: Option<SimulationSession>,
    next_run: u64,
    last_summary: Option<FlightSummary>,
}

impl AnimationScheduler<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for AnimationScheduler<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> AnimationScheduler<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            pacing: PacingPolicy::default(),
            timers: TimerQueue::new(),
            session: None,
            next_run: 0,
            last_summary: None,
        }
    }

    pub fn with_pacing(mut self, pacing: PacingPolicy) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn pacing(&self) -> PacingPolicy {
        self.pacing
    }

    pub fn phase(&self) -> Phase {
        self.session.as_ref().map_or(Phase::Idle, |s| s.state.phase)
    }

    pub fn session(&self) -> Option<&SimulationSession> {
        self.session.as_ref()
    }

    pub fn state(&self) -> Option<&AnimationState> {
        self.session.as_ref().map(|s| &s.state)
    }

    /// Summary of the last accepted `start`, kept after the run ends.
    pub fn last_summary(&self) -> Option<&FlightSummary> {
        self.last_summary.as_ref()
    }

    /// Begins a new run, replacing any run in progress.
    ///
    /// Invalid parameters are rejected before anything changes, so a prior
    /// run (running or finished) stays exactly as it was.
    pub fn start(&mut self, params: SimulationParameters) -> SimulationResult<DerivedQuantities> {
        if let Err(err) = params.validate() {
            warn!(error = %err, "rejected start");
            return Err(err.into());
        }

        if let Some(previous) = self.session.take() {
            if let Some(handle) = previous.pending {
                self.timers.cancel(handle);
            }
            debug!(run = previous.run.0, phase = ?previous.state.phase, "superseded run");
        }

        let derived = DerivedQuantities::derive(&params);
        let now = self.clock.now();
        let run = RunId(self.next_run);
        self.next_run += 1;

        let handle = self.timers.schedule_at(now, run);
        self.session = Some(SimulationSession {
            run,
            params,
            derived,
            state: AnimationState {
                run_start: now,
                virtual_time_s: 0.0,
                position: (0.0, 0.0),
                phase: Phase::Running,
            },
            pending: Some(handle),
            ticks: 0,
        });
        self.last_summary = Some(derived.summary());

        debug!(
            run = run.0,
            time_of_flight_s = derived.time_of_flight_s,
            max_range_m = derived.max_range_m,
            max_height_m = derived.max_height_m,
            "run started"
        );
        Ok(derived)
    }

    /// Fires at most one due tick. A tick scheduled with zero delay during
    /// this call is left for the next one.
    pub fn poll<S>(&mut self, sink: &mut S) -> SimulationResult<TickOutcome>
    where
        S: RenderSink + ?Sized,
    {
        let now = self.clock.now();
        let Some((_, run)) = self.timers.pop_due(now) else {
            return Ok(match self.phase() {
                Phase::Running => TickOutcome::Waiting,
                Phase::Idle | Phase::Landed => TickOutcome::Inactive,
            });
        };

        match self.session.as_mut() {
            Some(session) if session.run == run && session.state.phase == Phase::Running => {
                session.tick(now, self.pacing, &mut self.timers, sink)
            }
            _ => {
                debug!(run = run.0, "dropped tick from superseded run");
                Ok(TickOutcome::Stale)
            }
        }
    }

    /// When the next tick is due, if any run is waiting on one.
    pub fn next_due(&mut self) -> Option<DateTime<Utc>> {
        self.timers.next_due()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::{AnimationScheduler, PacingPolicy, Phase, TickOutcome};
    use crate::core::clock::{Clock, ManualClock, elapsed_ms};
    use crate::core::error::{InputError, RenderError, SimulationError};
    use crate::core::params::SimulationParameters;
    use crate::core::sink::TrailRecorder;

    fn scheduler() -> (AnimationScheduler<ManualClock>, ManualClock) {
        let clock = ManualClock::default();
        (AnimationScheduler::with_clock(clock.clone()), clock)
    }

    #[test]
    fn starts_idle() {
        let (mut sched, _) = scheduler();
        let mut trail = TrailRecorder::new();
        assert_eq!(sched.phase(), Phase::Idle);
        assert_eq!(sched.poll(&mut trail).unwrap(), TickOutcome::Inactive);
        assert!(sched.last_summary().is_none());
    }

    #[test]
    fn first_tick_is_immediate_at_origin() {
        let (mut sched, _) = scheduler();
        let mut trail = TrailRecorder::new();
        sched.start(SimulationParameters::default()).unwrap();
        assert_eq!(sched.phase(), Phase::Running);

        let outcome = sched.poll(&mut trail).unwrap();
        assert_eq!(
            outcome,
            TickOutcome::Plotted {
                t: 0.0,
                x: 0.0,
                y: 0.0
            }
        );
        assert_eq!(trail.points(), &[(0.0, 0.0)]);
    }

    #[test]
    fn zero_delay_tick_waits_for_next_poll() {
        let (mut sched, clock) = scheduler();
        let mut trail = TrailRecorder::new();
        sched.start(SimulationParameters::default()).unwrap();
        sched.poll(&mut trail).unwrap();

        // t = 0 schedules the next tick with no delay, at the same instant.
        assert_eq!(sched.next_due(), Some(clock.now()));
        assert_eq!(trail.points().len(), 1);
        assert!(matches!(
            sched.poll(&mut trail).unwrap(),
            TickOutcome::Plotted { .. }
        ));
        assert_eq!(trail.points().len(), 2);
    }

    #[test]
    fn virtual_time_scales_with_compression() {
        let (mut sched, clock) = scheduler();
        let mut trail = TrailRecorder::new();
        sched.start(SimulationParameters::new(100.0, 45.0, 10.0)).unwrap();
        sched.poll(&mut trail).unwrap();

        clock.advance_ms(150);
        match sched.poll(&mut trail).unwrap() {
            TickOutcome::Plotted { t, .. } => assert_abs_diff_eq!(t, 1.5, epsilon = 1e-9),
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn elapsed_pacing_delays_by_virtual_time() {
        let (mut sched, clock) = scheduler();
        let mut trail = TrailRecorder::new();
        sched.start(SimulationParameters::new(100.0, 45.0, 10.0)).unwrap();
        sched.poll(&mut trail).unwrap();

        clock.advance_ms(400);
        sched.poll(&mut trail).unwrap();
        // t = 4 s virtual, so the next tick waits 4 ms.
        let due = sched.next_due().expect("next tick scheduled");
        assert_abs_diff_eq!(elapsed_ms(clock.now(), due), 4.0, epsilon = 1e-9);

        clock.advance_ms(3);
        assert_eq!(sched.poll(&mut trail).unwrap(), TickOutcome::Waiting);
        clock.advance_ms(1);
        assert!(matches!(
            sched.poll(&mut trail).unwrap(),
            TickOutcome::Plotted { .. }
        ));
    }

    #[test]
    fn fixed_interval_pacing() {
        let clock = ManualClock::default();
        let mut sched = AnimationScheduler::with_clock(clock.clone())
            .with_pacing(PacingPolicy::FixedInterval { ms: 16.0 });
        let mut trail = TrailRecorder::new();
        sched.start(SimulationParameters::default()).unwrap();
        sched.poll(&mut trail).unwrap();

        let due = sched.next_due().expect("next tick scheduled");
        assert_abs_diff_eq!(elapsed_ms(clock.now(), due), 16.0, epsilon = 1e-9);
    }

    #[test]
    fn lands_on_first_negative_height() {
        let (mut sched, clock) = scheduler();
        let mut trail = TrailRecorder::new();
        sched.start(SimulationParameters::new(10.0, 0.0, 1.0)).unwrap();
        sched.poll(&mut trail).unwrap();
        clock.advance_ms(100);

        match sched.poll(&mut trail).unwrap() {
            TickOutcome::Landed { y, .. } => assert!(y < 0.0),
            other => panic!("unexpected outcome {other:?}"),
        }
        assert_eq!(sched.phase(), Phase::Landed);
        assert_eq!(sched.next_due(), None);

        clock.advance_ms(1_000);
        assert_eq!(sched.poll(&mut trail).unwrap(), TickOutcome::Inactive);
        assert_eq!(trail.points().len(), 2);
    }

    #[test]
    fn restart_replaces_pending_tick() {
        let (mut sched, clock) = scheduler();
        let mut trail = TrailRecorder::new();
        sched.start(SimulationParameters::new(100.0, 45.0, 10.0)).unwrap();
        sched.poll(&mut trail).unwrap();
        clock.advance_ms(200);
        sched.poll(&mut trail).unwrap();
        let first_run = sched.session().unwrap().run();

        let second = sched.start(SimulationParameters::new(20.0, 80.0, 1.0)).unwrap();
        let second_run = sched.session().unwrap().run();
        assert_ne!(first_run, second_run);

        // Past the first run's pending due time (t = 2 s -> 2 ms).
        clock.advance_ms(5);
        trail.clear();
        sched.poll(&mut trail).unwrap();
        assert_eq!(trail.points(), &[second.position_at(0.005)]);
        assert_eq!(sched.session().unwrap().ticks(), 1);
        assert_eq!(sched.poll(&mut trail).unwrap(), TickOutcome::Waiting);
        assert_eq!(trail.points().len(), 1);
    }

    #[test]
    fn rejected_start_keeps_running_run() {
        let (mut sched, _) = scheduler();
        let mut trail = TrailRecorder::new();
        sched.start(SimulationParameters::default()).unwrap();
        sched.poll(&mut trail).unwrap();
        let before = *sched.state().unwrap();
        let summary = sched.last_summary().cloned();

        let err = sched
            .start(SimulationParameters::new(-5.0, 45.0, 10.0))
            .unwrap_err();
        assert_eq!(
            err,
            SimulationError::Input(InputError::NegativeVelocity(-5.0))
        );
        assert_eq!(*sched.state().unwrap(), before);
        assert_eq!(sched.last_summary().cloned(), summary);
        assert_eq!(sched.phase(), Phase::Running);
    }

    #[test]
    fn render_failure_ends_run_and_keeps_summary() {
        let (mut sched, clock) = scheduler();
        sched.start(SimulationParameters::default()).unwrap();
        let mut failing =
            |_x: f64, _y: f64| -> Result<(), RenderError> { Err(RenderError::SinkClosed) };

        let err = sched.poll(&mut failing).unwrap_err();
        assert_eq!(err, SimulationError::Render(RenderError::SinkClosed));
        assert_eq!(sched.phase(), Phase::Landed);
        assert_eq!(sched.last_summary().unwrap().time, "14.43");

        clock.advance_ms(50);
        let mut trail = TrailRecorder::new();
        assert_eq!(sched.poll(&mut trail).unwrap(), TickOutcome::Inactive);
        assert!(trail.points().is_empty());
    }
}
