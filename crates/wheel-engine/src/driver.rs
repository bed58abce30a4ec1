//! Animation driver: The spin state machine
//!
//! ```text
//! Idle ──spin()──> Running ──progress = 1──> Completing ──settle timeout──> Idle
//!   └─────────────────────── dispose() ──────────────────────────> Disposed
//! ```
//!
//! Every callback the driver schedules comes back through [`SpinDriver::dispatch`].
//! Handles that are no longer outstanding are ignored, so a cancelled or
//! disposed spin can never write state or fire its completion hook.

use log::{debug, info, trace, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use wheel_core::{WheelError, WheelResult};
use wheel_stage::{Stage, StageEvent, StagePayload};

use crate::config::SpinConfig;
use crate::geometry::{boundaries_crossed, segment_at_pointer};
use crate::planner::{SpinPlan, SpinPlanner};
use crate::scheduler::{FrameHandle, FrameScheduler, ManualScheduler, ScheduledCallback};
use crate::state::{AnimationFrameContext, WheelState};

/// Per-spin completion hook, called with the verified index
pub type CompletionHook = Box<dyn FnOnce(usize)>;

/// Fire-and-forget receiver for stage events (sound, analytics)
pub type StageSink = Box<dyn FnMut(&StageEvent)>;

/// Driver lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpinPhase {
    Idle,
    Running,
    /// At rest, waiting for the settle delay before notifying
    Completing,
    Disposed,
}

/// Owns the wheel state and animates one spin at a time
pub struct SpinDriver<S: FrameScheduler, R: Rng = ChaCha8Rng> {
    config: SpinConfig,
    planner: SpinPlanner,
    scheduler: S,
    rng: R,
    state: WheelState,
    phase: SpinPhase,
    plan: Option<SpinPlan>,
    frame: AnimationFrameContext,
    pending_frame: Option<FrameHandle>,
    pending_timeout: Option<FrameHandle>,
    verified_index: Option<usize>,
    on_complete: Option<CompletionHook>,
    stage_sink: Option<StageSink>,
    spins_completed: u64,
    drift_corrections: u64,
}

impl<S: FrameScheduler> SpinDriver<S, ChaCha8Rng> {
    /// Driver with a ChaCha8 source; `None` seeds from the OS
    pub fn seeded(config: SpinConfig, scheduler: S, seed: Option<u64>) -> WheelResult<Self> {
        let rng = match seed {
            Some(s) => ChaCha8Rng::seed_from_u64(s),
            None => ChaCha8Rng::from_os_rng(),
        };
        Self::new(config, scheduler, rng)
    }
}

impl<S: FrameScheduler, R: Rng> SpinDriver<S, R> {
    pub fn new(config: SpinConfig, scheduler: S, rng: R) -> WheelResult<Self> {
        config.validate()?;
        let planner = SpinPlanner::from_config(&config)?;

        Ok(Self {
            config,
            planner,
            scheduler,
            rng,
            state: WheelState::default(),
            phase: SpinPhase::Idle,
            plan: None,
            frame: AnimationFrameContext::default(),
            pending_frame: None,
            pending_timeout: None,
            verified_index: None,
            on_complete: None,
            stage_sink: None,
            spins_completed: 0,
            drift_corrections: 0,
        })
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // CONFIGURATION
    // ═══════════════════════════════════════════════════════════════════════════

    /// Replace the config; only allowed between spins
    pub fn set_config(&mut self, config: SpinConfig) -> WheelResult<()> {
        if self.phase != SpinPhase::Idle {
            return Err(WheelError::Busy);
        }
        config.validate()?;
        self.planner = SpinPlanner::from_config(&config)?;
        self.config = config;
        Ok(())
    }

    pub fn set_stage_sink(&mut self, sink: impl FnMut(&StageEvent) + 'static) {
        self.stage_sink = Some(Box::new(sink));
    }

    pub fn clear_stage_sink(&mut self) {
        self.stage_sink = None;
    }

    pub fn config(&self) -> &SpinConfig {
        &self.config
    }

    /// Snapshot for the renderer
    pub fn state(&self) -> WheelState {
        self.state
    }

    pub fn phase(&self) -> SpinPhase {
        self.phase
    }

    pub fn is_spinning(&self) -> bool {
        self.state.is_spinning
    }

    /// Plan of the spin in flight
    pub fn plan(&self) -> Option<&SpinPlan> {
        self.plan.as_ref()
    }

    pub fn frame_context(&self) -> AnimationFrameContext {
        self.frame
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn spins_completed(&self) -> u64 {
        self.spins_completed
    }

    /// Spins whose landed segment differed from the drawn winner
    pub fn drift_corrections(&self) -> u64 {
        self.drift_corrections
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SPIN EXECUTION
    // ═══════════════════════════════════════════════════════════════════════════

    /// Start a spin over `segment_count` segments
    ///
    /// Ignored while a spin is running or settling, on an empty wheel, and
    /// after disposal. `on_complete` fires once with the verified index.
    pub fn spin(&mut self, segment_count: usize, on_complete: impl FnOnce(usize) + 'static) {
        if self.phase != SpinPhase::Idle {
            debug!("Spin ignored: driver is {:?}", self.phase);
            return;
        }

        let plan = match self
            .planner
            .plan(self.state.rotation_degrees, segment_count, &mut self.rng)
        {
            Ok(plan) => plan,
            Err(e) => {
                debug!("Spin ignored: {}", e);
                return;
            }
        };

        debug!(
            "Spin planned: winner {} of {}, {} turns, {:.2}° -> {:.2}°",
            plan.winning_index,
            plan.segment_count,
            plan.extra_spins,
            plan.start_rotation,
            plan.target_rotation
        );

        self.state.is_spinning = true;
        self.state.selected_index = Some(plan.winning_index);
        self.frame.reset();
        self.verified_index = None;
        self.on_complete = Some(Box::new(on_complete));
        self.plan = Some(plan);
        self.phase = SpinPhase::Running;

        let now = self.scheduler.now_ms();
        self.emit(
            StageEvent::new(Stage::SpinStart, now)
                .with_rotation(plan.start_rotation)
                .with_segment_count(plan.segment_count),
        );

        self.pending_frame = Some(self.scheduler.request_frame());
    }

    /// Deliver a fired scheduler callback
    pub fn dispatch(&mut self, callback: ScheduledCallback, now_ms: f64) {
        match callback {
            ScheduledCallback::Frame(handle) if self.pending_frame == Some(handle) => {
                self.pending_frame = None;
                self.on_frame(now_ms);
            }
            ScheduledCallback::Timeout(handle) if self.pending_timeout == Some(handle) => {
                self.pending_timeout = None;
                self.on_settle_timeout(now_ms);
            }
            stale => trace!("Ignoring stale callback {:?}", stale),
        }
    }

    fn on_frame(&mut self, now_ms: f64) {
        let Some(plan) = self.plan else {
            return;
        };

        let start = *self.frame.start_timestamp.get_or_insert(now_ms);
        self.frame.elapsed = (now_ms - start).max(0.0);
        let progress = (self.frame.elapsed / self.config.timing.spin_duration_ms).min(1.0);

        let previous = self.state.rotation_degrees;
        let rotation = if progress >= 1.0 {
            plan.target_rotation
        } else {
            plan.start_rotation + plan.total_delta * self.config.easing.apply(progress)
        };
        self.state.rotation_degrees = rotation;
        trace!("Frame t={:.1}ms progress={:.3} rotation={:.2}°", now_ms, progress, rotation);

        let passed = boundaries_crossed(previous, rotation, plan.segment_count);
        if passed > 0 {
            if let Some(segment_index) = segment_at_pointer(rotation, plan.segment_count) {
                let mut event = StageEvent::with_payload(
                    Stage::SegmentPass { segment_index },
                    now_ms,
                    StagePayload {
                        segments_passed: Some(passed),
                        ..StagePayload::default()
                    },
                );
                event.payload.rotation_deg = Some(rotation);
                self.emit(event);
            }
        }

        if progress < 1.0 {
            self.pending_frame = Some(self.scheduler.request_frame());
        } else {
            self.settle(plan, now_ms);
        }
    }

    fn settle(&mut self, plan: SpinPlan, now_ms: f64) {
        self.phase = SpinPhase::Completing;
        self.state.rotation_degrees = plan.target_rotation;

        let verified = segment_at_pointer(plan.target_rotation, plan.segment_count)
            .unwrap_or(plan.winning_index);
        if verified != plan.winning_index {
            warn!(
                "Landed segment {} differs from drawn winner {}; reporting landed segment",
                verified, plan.winning_index
            );
            self.drift_corrections += 1;
        }

        self.state.selected_index = Some(verified);
        self.state.is_spinning = false;
        self.verified_index = Some(verified);
        self.frame.reset();

        self.emit(
            StageEvent::new(Stage::SpinSettle { segment_index: verified }, now_ms)
                .with_rotation(plan.target_rotation)
                .with_segment_count(plan.segment_count),
        );

        self.pending_timeout = Some(self.scheduler.set_timeout(self.config.timing.settle_delay_ms));
    }

    fn on_settle_timeout(&mut self, now_ms: f64) {
        let Some(verified) = self.verified_index.take() else {
            return;
        };

        self.phase = SpinPhase::Idle;
        self.plan = None;
        self.spins_completed += 1;

        self.emit(StageEvent::new(
            Stage::SpinComplete { segment_index: verified },
            now_ms,
        ));
        info!("Spin {} complete: segment {}", self.spins_completed, verified);

        if let Some(hook) = self.on_complete.take() {
            hook(verified);
        }
    }

    fn emit(&mut self, event: StageEvent) {
        if let Some(sink) = self.stage_sink.as_mut() {
            sink(&event);
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // TEARDOWN
    // ═══════════════════════════════════════════════════════════════════════════

    /// Cancel anything outstanding and stop reacting to callbacks
    ///
    /// The completion hook of an unfinished spin is dropped without being called.
    pub fn dispose(&mut self) {
        if self.phase == SpinPhase::Disposed {
            return;
        }
        if let Some(handle) = self.pending_frame.take() {
            self.scheduler.cancel_frame(handle);
        }
        if let Some(handle) = self.pending_timeout.take() {
            self.scheduler.clear_timeout(handle);
        }
        if self.on_complete.take().is_some() {
            debug!("Disposed during spin; completion hook dropped");
        }
        self.stage_sink = None;
        self.plan = None;
        self.verified_index = None;
        self.phase = SpinPhase::Disposed;
    }
}

impl<R: Rng> SpinDriver<ManualScheduler, R> {
    /// Advance the fake clock and deliver whatever fired
    pub fn advance(&mut self, dt_ms: f64) {
        let due = self.scheduler.advance(dt_ms);
        let now = self.scheduler.now_ms();
        for callback in due {
            self.dispatch(callback, now);
        }
    }

    /// Step the clock by `frame_ms` until nothing is scheduled; returns steps taken
    ///
    /// Zero, negative and NaN steps return immediately. The step must also be
    /// large enough to move the clock at its current magnitude, or the loop
    /// never reaches the next timeout.
    pub fn run_until_idle(&mut self, frame_ms: f64) -> usize {
        if frame_ms.is_nan() || frame_ms <= 0.0 {
            return 0;
        }
        let mut steps = 0;
        while self.scheduler.has_pending() {
            self.advance(frame_ms);
            steps += 1;
        }
        steps
    }
}

impl<S: FrameScheduler, R: Rng> Drop for SpinDriver<S, R> {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::plan_for_index;
    use crate::timing::TimingConfig;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn test_driver(seed: u64) -> SpinDriver<ManualScheduler> {
        SpinDriver::seeded(SpinConfig::default(), ManualScheduler::new(), Some(seed)).unwrap()
    }

    fn counter() -> (Rc<Cell<u32>>, impl FnOnce(usize) + 'static) {
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        (count, move |_| c.set(c.get() + 1))
    }

    #[test]
    fn test_driver_creation() {
        let driver = test_driver(1);
        assert_eq!(driver.phase(), SpinPhase::Idle);
        assert_eq!(driver.state(), WheelState::default());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SpinConfig {
            min_spins: 3,
            max_spins: 2,
            ..SpinConfig::default()
        };
        assert!(SpinDriver::seeded(config, ManualScheduler::new(), Some(1)).is_err());
    }

    #[test]
    fn test_spin_sets_optimistic_state() {
        let mut driver = test_driver(5);
        driver.spin(8, |_| {});

        let plan = *driver.plan().unwrap();
        let state = driver.state();
        assert!(state.is_spinning);
        assert_eq!(state.selected_index, Some(plan.winning_index));
        assert_eq!(state.rotation_degrees, 0.0);
        assert_eq!(driver.phase(), SpinPhase::Running);
        assert!(driver.scheduler().has_pending_frame());
    }

    #[test]
    fn test_full_spin_lands_on_plan() {
        let mut driver = test_driver(42);
        let landed = Rc::new(Cell::new(None));
        let slot = landed.clone();

        driver.spin(4, move |idx| slot.set(Some(idx)));
        let plan = *driver.plan().unwrap();
        driver.run_until_idle(16.0);

        assert_eq!(landed.get(), Some(plan.winning_index));
        assert_eq!(driver.state().rotation_degrees, plan.target_rotation);
        assert_eq!(driver.state().selected_index, Some(plan.winning_index));
        assert!(!driver.is_spinning());
        assert_eq!(driver.phase(), SpinPhase::Idle);
        assert_eq!(driver.drift_corrections(), 0);
    }

    #[test]
    fn test_empty_wheel_is_noop() {
        let mut driver = test_driver(3);
        let (count, hook) = counter();

        driver.spin(0, hook);

        assert_eq!(driver.phase(), SpinPhase::Idle);
        assert!(!driver.scheduler().has_pending());
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_settle_delay_before_callback() {
        let mut driver = test_driver(9);
        let (count, hook) = counter();
        driver.spin(6, hook);

        // First frame at t=16 starts the clock; the last one lands at t >= 3016
        while driver.phase() == SpinPhase::Running {
            driver.advance(16.0);
        }
        assert_eq!(driver.phase(), SpinPhase::Completing);
        assert!(!driver.is_spinning());
        assert_eq!(count.get(), 0);

        driver.advance(50.0);
        assert_eq!(count.get(), 0);
        driver.advance(50.0);
        assert_eq!(count.get(), 1);
        assert_eq!(driver.phase(), SpinPhase::Idle);
    }

    #[test]
    fn test_spin_ignored_while_completing() {
        let mut driver = test_driver(11);
        driver.spin(6, |_| {});
        while driver.phase() == SpinPhase::Running {
            driver.advance(16.0);
        }

        let before = driver.state();
        let (count, hook) = counter();
        driver.spin(6, hook);

        assert_eq!(driver.state(), before);
        driver.run_until_idle(16.0);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_landed_segment_overrides_drawn_winner() {
        let mut driver = test_driver(29);
        let landed = Rc::new(Cell::new(None));
        let slot = landed.clone();
        driver.spin(4, move |idx| slot.set(Some(idx)));

        // Geometry lands on 2 while the plan claims 1
        let mut plan = plan_for_index(0.0, 4, 2, 5).unwrap();
        plan.winning_index = 1;
        if let Some(handle) = driver.pending_frame.take() {
            driver.scheduler.cancel_frame(handle);
        }
        let now = driver.scheduler().now_ms();
        driver.plan = Some(plan);
        driver.settle(plan, now);

        assert_eq!(driver.state().selected_index, Some(2));
        assert_eq!(driver.drift_corrections(), 1);

        driver.run_until_idle(16.0);
        assert_eq!(landed.get(), Some(2));
        assert_eq!(driver.state().selected_index, Some(2));
        assert_eq!(driver.phase(), SpinPhase::Idle);
    }

    #[test]
    fn test_run_until_idle_rejects_bad_step() {
        let mut driver = test_driver(31);
        driver.spin(4, |_| {});

        assert_eq!(driver.run_until_idle(f64::NAN), 0);
        assert_eq!(driver.run_until_idle(0.0), 0);
        assert_eq!(driver.run_until_idle(-16.0), 0);
        assert_eq!(driver.phase(), SpinPhase::Running);
        assert!(driver.run_until_idle(16.0) > 0);
    }

    #[test]
    fn test_stale_callback_ignored() {
        let mut driver = test_driver(13);
        driver.spin(5, |_| {});
        driver.advance(16.0);
        let rotation = driver.state().rotation_degrees;

        driver.dispatch(ScheduledCallback::Frame(9_999), 2_000.0);
        driver.dispatch(ScheduledCallback::Timeout(9_999), 2_000.0);

        assert_eq!(driver.state().rotation_degrees, rotation);
        assert_eq!(driver.phase(), SpinPhase::Running);
    }

    #[test]
    fn test_set_config_between_spins() {
        let mut driver = test_driver(17);
        driver.spin(3, |_| {});
        assert!(matches!(
            driver.set_config(SpinConfig::default()),
            Err(WheelError::Busy)
        ));

        driver.run_until_idle(16.0);
        let studio = SpinConfig {
            timing: TimingConfig::studio(),
            ..SpinConfig::default()
        };
        assert!(driver.set_config(studio).is_ok());
        assert_eq!(driver.config().timing.spin_duration_ms, 600.0);
    }

    #[test]
    fn test_dispose_is_idempotent() {
        let mut driver = test_driver(19);
        driver.spin(4, |_| {});
        driver.dispose();
        driver.dispose();

        assert_eq!(driver.phase(), SpinPhase::Disposed);
        assert_eq!(driver.scheduler().cancellations(), 1);
    }

    #[test]
    fn test_stage_sink_receives_lifecycle() {
        let mut driver = test_driver(23);
        let events: Rc<RefCell<Vec<StageEvent>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        driver.set_stage_sink(move |e| sink.borrow_mut().push(e.clone()));

        driver.spin(10, |_| {});
        driver.run_until_idle(16.0);

        let events = events.borrow();
        assert_eq!(events.first().map(|e| e.type_name()), Some("spin_start"));
        assert_eq!(events.last().map(|e| e.type_name()), Some("spin_complete"));
        assert!(events.iter().any(|e| e.type_name() == "segment_pass"));
    }
}
