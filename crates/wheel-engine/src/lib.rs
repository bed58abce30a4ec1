//! # wheel-engine: Spin selection and animation for the prize wheel
//!
//! Picks a uniformly random winner, plans a rotation that ends with that
//! segment under the pointer, animates it with an easing curve, and reports
//! the segment recovered from the final angle exactly once.
//!
//! ## Architecture
//!
//! ```text
//! WheelSession (categories, results, stats)
//!     │
//!     └── SpinDriver ── FrameScheduler (host frame loop / ManualScheduler)
//!           │
//!           ├── SpinPlanner ── geometry (pointer, segment layout)
//!           ├── Easing
//!           └── StageEvent sink (sound cues)
//!                 │
//!                 v
//!           WheelState → renderer
//! ```

pub mod config;
pub mod driver;
pub mod easing;
pub mod geometry;
pub mod planner;
pub mod scheduler;
pub mod session;
pub mod state;
pub mod timing;

pub use config::*;
pub use driver::*;
pub use easing::*;
pub use geometry::*;
pub use planner::*;
pub use scheduler::*;
pub use session::*;
pub use state::*;
pub use timing::*;
