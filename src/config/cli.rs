use crate::config::toml_config::RunConfig;
use crate::domain::model::SweepMode;
use crate::utils::error::Result;
use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceSelection {
    All,
    Headhunter,
    Superjob,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "vacancy-stats")]
#[command(about = "Average salaries of programming languages on HeadHunter and SuperJob")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Which job boards to query
    #[arg(long, value_enum, default_value = "all")]
    pub source: SourceSelection,

    /// Override the sweep mode from config
    #[arg(long, value_enum)]
    pub mode: Option<SweepMode>,

    /// Override the tracked languages (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub languages: Vec<String>,

    /// Export CSV and JSON reports into this directory
    #[arg(long)]
    pub output_path: Option<String>,

    #[arg(long, env = "SUPERJOB_API_TOKEN", hide_env_values = true)]
    pub superjob_token: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// 載入設定檔（沒有就用預設值），再套用命令列覆蓋
    pub fn load_run_config(&self) -> Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::from_file(path)?,
            None => RunConfig::default(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut RunConfig) {
        match self.source {
            SourceSelection::All => {}
            SourceSelection::Headhunter => config.superjob.enabled = false,
            SourceSelection::Superjob => config.headhunter.enabled = false,
        }

        if let Some(mode) = self.mode {
            config.run.mode = mode;
        }

        if !self.languages.is_empty() {
            config.run.languages = self.languages.clone();
        }

        if self.output_path.is_some() {
            config.run.output_path = self.output_path.clone();
        }

        if let Some(token) = &self.superjob_token {
            config.superjob.app_id = Some(token.clone());
        }
    }
}
