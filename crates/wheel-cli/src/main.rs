//! SpinWheel simulator
//!
//! Usage:
//!   spinwheel spin --segments 8             - Spin a placeholder wheel
//!   spinwheel spin --categories cats.json   - Spin over exported categories
//!   spinwheel fairness --spins 10000        - Histogram of landed segments

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};

use wheel_core::CategoryList;
use wheel_engine::{
    FrameScheduler, ManualScheduler, SpinConfig, SpinDriver, TimingProfile, WheelSession,
};
use wheel_stage::{Stage, StageEvent, StageTrace};

#[derive(Parser)]
#[command(name = "spinwheel", about = "Prize wheel simulator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Spin the wheel and print each result
    Spin {
        /// Categories JSON (array or `{ "categories": [...] }`)
        #[arg(short, long)]
        categories: Option<PathBuf>,
        /// Placeholder segment count when no categories file is given
        #[arg(short, long, default_value_t = 8)]
        segments: usize,
        /// Number of spins
        #[arg(short = 'n', long, default_value_t = 1)]
        count: u32,
        /// Seed for reproducible spins
        #[arg(long)]
        seed: Option<u64>,
        /// Timing profile
        #[arg(short, long, value_enum, default_value = "normal")]
        profile: Profile,
        /// Engine config JSON (overrides --profile)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Pace frames on the wall clock
        #[arg(long)]
        realtime: bool,
        /// Print stage traces as JSON
        #[arg(long)]
        trace: bool,
    },
    /// Run many spins and report the landing distribution
    Fairness {
        /// Segment count
        #[arg(short, long, default_value_t = 8)]
        segments: usize,
        /// Number of spins
        #[arg(short = 'n', long, default_value_t = 10_000)]
        spins: u32,
        /// Seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Profile {
    Normal,
    Turbo,
    Mobile,
    Studio,
}

impl From<Profile> for TimingProfile {
    fn from(profile: Profile) -> Self {
        match profile {
            Profile::Normal => TimingProfile::Normal,
            Profile::Turbo => TimingProfile::Turbo,
            Profile::Mobile => TimingProfile::Mobile,
            Profile::Studio => TimingProfile::Studio,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Spin {
            categories,
            segments,
            count,
            seed,
            profile,
            config,
            realtime,
            trace,
        } => {
            let categories = load_categories(categories.as_deref(), segments)?;
            let config = load_config(config.as_deref(), profile)?;
            run_spins(categories, config, count, seed, realtime, trace)
        }
        Commands::Fairness {
            segments,
            spins,
            seed,
        } => run_fairness(segments, spins, seed),
    }
}

fn load_categories(path: Option<&Path>, segments: usize) -> Result<CategoryList> {
    let Some(path) = path else {
        return Ok(CategoryList::placeholder(segments));
    };
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read categories from {}", path.display()))?;
    CategoryList::from_json(&json)
        .with_context(|| format!("Invalid categories file {}", path.display()))
}

fn load_config(path: Option<&Path>, profile: Profile) -> Result<SpinConfig> {
    let Some(path) = path else {
        return Ok(SpinConfig::with_profile(profile.into()));
    };
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    SpinConfig::from_json(&json).with_context(|| format!("Invalid config {}", path.display()))
}

fn run_spins(
    categories: CategoryList,
    config: SpinConfig,
    count: u32,
    seed: Option<u64>,
    realtime: bool,
    print_trace: bool,
) -> Result<()> {
    if categories.is_empty() {
        bail!("No categories available");
    }

    let frame_ms = config.timing.frame_interval_ms;
    let reveal_ms = config.timing.result_reveal_delay_ms;
    let driver = SpinDriver::seeded(config, ManualScheduler::new(), seed)?;
    let mut session = WheelSession::new(driver, categories);

    let events: Rc<RefCell<Vec<StageEvent>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = events.clone();
    session
        .driver_mut()
        .set_stage_sink(move |event| sink.borrow_mut().push(event.clone()));

    let mut traces = Vec::new();
    for n in 1..=count {
        session.spin();
        while session.driver().scheduler().has_pending() {
            session.advance(frame_ms);
            if realtime {
                thread::sleep(Duration::from_secs_f64(frame_ms / 1000.0));
            }
        }

        let Some(result) = session.clear_result() else {
            bail!("Spin {} finished without a result", n);
        };
        if realtime {
            thread::sleep(Duration::from_secs_f64(reveal_ms / 1000.0));
        }

        let now = session.driver().scheduler().now_ms();
        let mut trace = StageTrace::new(format!("trace-{:06}", n)).with_spin(format!("spin-{:06}", n));
        for event in events.borrow_mut().drain(..) {
            trace.push(event);
        }
        trace.push(
            StageEvent::new(Stage::ResultReveal, now + reveal_ms)
                .with_category(result.category_id.clone()),
        );

        let validation = trace.validate();
        for warning in validation.warnings() {
            log::warn!("{}: {}", trace.trace_id, warning);
        }

        let state = session.state();
        println!(
            "Spin {}: {} (segment {}, resting at {:.1}°, {} clicks)",
            result.spins,
            result.category_name,
            trace.winning_index().unwrap_or_default(),
            state.normalized_rotation(),
            trace.click_count()
        );
        traces.push(trace);
    }

    if print_trace {
        println!("{}", serde_json::to_string_pretty(&traces)?);
    }
    Ok(())
}

fn run_fairness(segments: usize, spins: u32, seed: Option<u64>) -> Result<()> {
    if segments == 0 {
        bail!("A wheel needs at least one segment");
    }

    // Landing is frame-rate independent, so a coarse clock keeps this fast
    const FRAME_MS: f64 = 100.0;

    let config = SpinConfig::with_profile(TimingProfile::Studio);
    let driver = SpinDriver::seeded(config, ManualScheduler::new(), seed)?;
    let mut session = WheelSession::new(driver, CategoryList::placeholder(segments));

    for _ in 0..spins {
        session.spin();
        session.run_until_idle(FRAME_MS);
    }

    let stats = session.stats();
    let widest = stats.hits_per_segment.iter().copied().max().unwrap_or(0).max(1);
    for (index, &hits) in stats.hits_per_segment.iter().enumerate() {
        let bar = "#".repeat((hits * 40 / widest) as usize);
        println!(
            "{:>4} {:>8} {:>6.2}% {}",
            index,
            hits,
            stats.hit_rate(index) * 100.0,
            bar
        );
    }
    println!(
        "chi-square {:.2} with {} degrees of freedom over {} spins",
        stats.chi_square(),
        segments - 1,
        stats.total_spins
    );

    let drift = session.driver().drift_corrections();
    if drift > 0 {
        log::warn!("{} spins landed away from the drawn winner", drift);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_spin_args() {
        let args = [
            "spinwheel", "spin", "--segments", "6", "-n", "3", "--seed", "7", "-p", "studio",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Commands::Spin {
                segments,
                count,
                seed,
                ..
            } => {
                assert_eq!(segments, 6);
                assert_eq!(count, 3);
                assert_eq!(seed, Some(7));
            }
            Commands::Fairness { .. } => panic!("expected spin"),
        }
    }

    #[test]
    fn test_spin_runs_to_completion() {
        let config = SpinConfig::with_profile(TimingProfile::Studio);
        let result = run_spins(CategoryList::placeholder(5), config, 3, Some(11), false, false);
        assert!(result.is_ok());
    }

    #[test]
    fn test_spin_rejects_empty_wheel() {
        let config = SpinConfig::with_profile(TimingProfile::Studio);
        let result = run_spins(CategoryList::placeholder(0), config, 1, Some(1), false, false);
        assert!(result.is_err());
    }

    #[test]
    fn test_fairness_runs() {
        assert!(run_fairness(4, 50, Some(3)).is_ok());
        assert!(run_fairness(0, 50, Some(3)).is_err());
    }
}
