#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, SourceSelection};
pub use toml_config::{HeadHunterConfig, RunConfig, SuperJobConfig};
