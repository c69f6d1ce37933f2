//! Placeholder long-running task
//!
//! Simulates a slow computation: draw a random number, hold the calling
//! thread for a fixed wall-clock duration, then report what happened.
//!
//! ```text
//! draw result ─▶ wait (Sleep | Spin) ─▶ log ─▶ measure ─▶ TaskReport
//! ```

use std::thread;
use std::time::{Duration, Instant};

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core_types::TaskParam;
use crate::error::ConfigError;

/// Default wait of the placeholder task.
pub const DEFAULT_TASK_DURATION: Duration = Duration::from_secs(2);

/// How the task holds the thread until its deadline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaitStrategy {
    /// Yield to the OS scheduler until the deadline.
    #[default]
    Sleep,
    /// Poll the clock in a tight loop. Burns a full core; demonstration only.
    Spin,
}

/// `task` section of the app config. Missing fields take their defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskConfig {
    pub duration_secs: f64,
    pub wait: WaitStrategy,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            duration_secs: DEFAULT_TASK_DURATION.as_secs_f64(),
            wait: WaitStrategy::Sleep,
        }
    }
}

impl TaskConfig {
    pub fn duration(&self) -> Result<Duration, ConfigError> {
        Duration::try_from_secs_f64(self.duration_secs)
            .map_err(|_| ConfigError::InvalidTaskDuration(self.duration_secs))
    }
}

/// Outcome of one task run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskReport {
    /// Parameter the task was called with, echoed back
    pub param: TaskParam,
    /// Measured wall-clock time in seconds
    pub duration: f64,
    /// Uniform random value in `[0, 1)`
    pub result: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct LongTask {
    duration: Duration,
    wait: WaitStrategy,
}

impl Default for LongTask {
    fn default() -> Self {
        Self::new(DEFAULT_TASK_DURATION, WaitStrategy::Sleep)
    }
}

impl LongTask {
    pub fn new(duration: Duration, wait: WaitStrategy) -> Self {
        Self { duration, wait }
    }

    pub fn from_config(config: &TaskConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(config.duration()?, config.wait))
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn wait_strategy(&self) -> WaitStrategy {
        self.wait
    }

    /// Run the task once.
    ///
    /// Blocks for at least the configured duration. `report.duration` is
    /// measured after the completion line is logged, so it includes that.
    pub fn run<R: Rng>(&self, param: TaskParam, rng: &mut R) -> TaskReport {
        let result: f64 = rng.gen_range(0.0..1.0);

        let start = Instant::now();
        match self.wait {
            WaitStrategy::Sleep => sleep_until(start + self.duration),
            WaitStrategy::Spin => {
                let spins = spin_until(start, self.duration);
                debug!(param, spins, "busy-wait finished");
            }
        }
        info!("finished task crunching {} with result {:.2}", param, result);
        let duration = start.elapsed().as_secs_f64();

        TaskReport {
            param,
            duration,
            result,
        }
    }
}

/// `thread::sleep` may wake early on some platforms; keep sleeping until the
/// deadline has really passed.
fn sleep_until(deadline: Instant) {
    loop {
        let now = Instant::now();
        if now >= deadline {
            return;
        }
        thread::sleep(deadline - now);
    }
}

fn spin_until(start: Instant, duration: Duration) -> u64 {
    let mut spins = 0u64;
    while start.elapsed() < duration {
        spins += 1;
        std::hint::spin_loop();
    }
    spins
}

/// Run the placeholder task with the defaults: two seconds, sleeping wait,
/// thread-local RNG.
pub fn really_hard_task(param: TaskParam) -> TaskReport {
    LongTask::default().run(param, &mut rand::thread_rng())
}
