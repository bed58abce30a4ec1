//! Wheel session: Categories, driver and results for one player
//!
//! The driver only knows segment counts. The session maps the verified index
//! back to its category, numbers the spins and keeps hit statistics.

use std::cell::Cell;
use std::rc::Rc;

use log::{debug, warn};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use wheel_core::{CategoryList, GameResult, WheelError, WheelResult};

use crate::driver::{SpinDriver, SpinPhase};
use crate::scheduler::{FrameScheduler, ManualScheduler, ScheduledCallback};
use crate::state::WheelState;

/// Called once per finished spin that resolved to a category
pub type ResultHook = Box<dyn FnMut(&GameResult)>;

/// Session statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_spins: u64,
    pub hits_per_segment: Vec<u64>,
}

impl SessionStats {
    pub fn new(segment_count: usize) -> Self {
        Self {
            total_spins: 0,
            hits_per_segment: vec![0; segment_count],
        }
    }

    pub fn record(&mut self, index: usize) {
        if index >= self.hits_per_segment.len() {
            self.hits_per_segment.resize(index + 1, 0);
        }
        self.hits_per_segment[index] += 1;
        self.total_spins += 1;
    }

    /// Share of spins that landed on `index`
    pub fn hit_rate(&self, index: usize) -> f64 {
        if self.total_spins == 0 {
            return 0.0;
        }
        let hits = self.hits_per_segment.get(index).copied().unwrap_or(0);
        hits as f64 / self.total_spins as f64
    }

    /// Pearson chi-square statistic against a uniform wheel
    pub fn chi_square(&self) -> f64 {
        let segments = self.hits_per_segment.len();
        if segments == 0 || self.total_spins == 0 {
            return 0.0;
        }
        let expected = self.total_spins as f64 / segments as f64;
        self.hits_per_segment
            .iter()
            .map(|&observed| {
                let d = observed as f64 - expected;
                d * d / expected
            })
            .sum()
    }
}

/// A wheel bound to a category list
pub struct WheelSession<S: FrameScheduler, R: Rng = ChaCha8Rng> {
    driver: SpinDriver<S, R>,
    categories: CategoryList,
    /// Written by the driver's completion hook, drained after each dispatch
    completed: Rc<Cell<Option<usize>>>,
    spin_count: u32,
    last_result: Option<GameResult>,
    stats: SessionStats,
    on_result: Option<ResultHook>,
}

impl<S: FrameScheduler, R: Rng> WheelSession<S, R> {
    pub fn new(driver: SpinDriver<S, R>, categories: CategoryList) -> Self {
        let stats = SessionStats::new(categories.len());
        Self {
            driver,
            categories,
            completed: Rc::new(Cell::new(None)),
            spin_count: 0,
            last_result: None,
            stats,
            on_result: None,
        }
    }

    pub fn set_result_hook(&mut self, hook: impl FnMut(&GameResult) + 'static) {
        self.on_result = Some(Box::new(hook));
    }

    /// Swap the category list; stats restart for the new wheel
    pub fn set_categories(&mut self, categories: CategoryList) -> WheelResult<()> {
        if self.driver.phase() != SpinPhase::Idle {
            return Err(WheelError::Busy);
        }
        self.stats = SessionStats::new(categories.len());
        self.categories = categories;
        Ok(())
    }

    /// Spin the wheel once; ignored while spinning or with no categories
    pub fn spin(&mut self) {
        if self.categories.is_empty() {
            debug!("Spin ignored: no categories available");
            return;
        }
        let slot = self.completed.clone();
        self.driver
            .spin(self.categories.len(), move |index| slot.set(Some(index)));
    }

    /// Deliver a fired scheduler callback
    pub fn dispatch(&mut self, callback: ScheduledCallback, now_ms: f64) {
        self.driver.dispatch(callback, now_ms);
        self.collect_result();
    }

    fn collect_result(&mut self) {
        let Some(index) = self.completed.take() else {
            return;
        };

        let category = match self.categories.get(index) {
            Ok(category) => category,
            Err(e) => {
                warn!("Spin result dropped: {}", e);
                return;
            }
        };

        self.spin_count += 1;
        self.stats.record(index);
        let result = GameResult::from_category(category, self.spin_count);
        debug!("Spin {} won {}", result.spins, result.category_name);

        if let Some(hook) = self.on_result.as_mut() {
            hook(&result);
        }
        self.last_result = Some(result);
    }

    /// Clear the shown result ("play again")
    pub fn clear_result(&mut self) -> Option<GameResult> {
        self.last_result.take()
    }

    pub fn state(&self) -> WheelState {
        self.driver.state()
    }

    pub fn categories(&self) -> &CategoryList {
        &self.categories
    }

    pub fn last_result(&self) -> Option<&GameResult> {
        self.last_result.as_ref()
    }

    pub fn spin_count(&self) -> u32 {
        self.spin_count
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn driver(&self) -> &SpinDriver<S, R> {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut SpinDriver<S, R> {
        &mut self.driver
    }
}

impl<R: Rng> WheelSession<ManualScheduler, R> {
    pub fn advance(&mut self, dt_ms: f64) {
        self.driver.advance(dt_ms);
        self.collect_result();
    }

    pub fn run_until_idle(&mut self, frame_ms: f64) -> usize {
        let steps = self.driver.run_until_idle(frame_ms);
        self.collect_result();
        steps
    }
}
