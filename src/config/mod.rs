//! Configuration module for the code timer host.
//!
//! Provides `AppConfig` (top-level settings), sub-configs for the timer and
//! the hint client, `AppPaths` for the platform config directory, and TOML
//! persistence via `AppConfig::load` / `AppConfig::save`.

pub mod paths;
pub mod settings;

pub use paths::{AppPaths, CONFIG_ENV};
pub use settings::{AppConfig, HintConfig, TimerConfig};
