//! numlab - two small numeric teaching snippets
//!
//! # Modules
//!
//! - [`core_types`] - Shared type aliases
//! - [`error`] - Error types
//! - [`madd`] - Multiply-accumulate over scalars and broadcast arrays
//! - [`long_task`] - Placeholder task that waits a fixed duration
//! - [`config`] - YAML application config
//! - [`logging`] - tracing subscriber setup

pub mod core_types;
pub mod error;

pub mod long_task;
pub mod madd;

pub mod config;
pub mod logging;

// Convenient re-exports at crate root
pub use config::AppConfig;
pub use core_types::TaskParam;
pub use error::{ConfigError, MathError};
pub use long_task::{LongTask, TaskConfig, TaskReport, WaitStrategy, really_hard_task};
pub use madd::{broadcast_shape, multiply_add, multiply_add_assign, multiply_add_ndarray};
