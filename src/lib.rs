pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use adapters::{AutoResolver, ConsoleResolver, LocalStorage};
pub use app::report::{render_table, ReportExporter};
pub use app::runner::{run_enabled_sources, SourceOutcome};
pub use app::sources::{HeadHunterFetcher, SuperJobFetcher};
pub use config::RunConfig;
pub use crate::core::aggregation::AggregationEngine;
pub use domain::model::{LanguageStats, SourceRunResult, SweepMode, TrackedLanguages};
pub use utils::error::{Result, StatsError};
