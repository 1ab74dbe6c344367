//! CLI error types.

use thiserror::Error;

/// CLI result alias.
pub type Result<T> = std::result::Result<T, CliError>;

/// Top-level CLI errors.
///
/// Configuration variants surface before any worker process is spawned; the
/// harness variant carries worker and pool failures through to the exit
/// code.
#[derive(Error, Debug)]
pub enum CliError {
    /// The option-type string matched neither call nor put.
    #[error("invalid option type: {0}")]
    OptionType(#[from] simgen_core::types::OptionKindError),

    /// The engine configuration was invalid.
    #[error("invalid engine configuration: {0}")]
    Engine(#[from] simgen_models::config::EngineConfigError),

    /// The run configuration was invalid.
    #[error("invalid run configuration: {0}")]
    Config(#[from] simgen_harness::ConfigError),

    /// A worker or the supervising pool failed.
    #[error(transparent)]
    Harness(#[from] simgen_harness::HarnessError),
}
