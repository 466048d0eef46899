use crate::app::sources::{HeadHunterFetcher, SuperJobFetcher};
use crate::config::toml_config::RunConfig;
use crate::core::aggregation::AggregationEngine;
use crate::domain::model::SourceRunResult;
use crate::domain::ports::ChallengeResolver;
use crate::utils::error::Result;

/// Result of one source's sweep together with its report title.
#[derive(Debug)]
pub struct SourceOutcome {
    pub title: String,
    pub result: Result<SourceRunResult>,
}

pub async fn run_headhunter<R: ChallengeResolver>(
    config: &RunConfig,
    resolver: R,
) -> Result<SourceRunResult> {
    let languages = config.tracked_languages()?;
    let fetcher = HeadHunterFetcher::new(config.headhunter.clone(), resolver)?;
    AggregationEngine::new(fetcher, languages)
        .with_mode(config.run.mode)
        .run()
        .await
}

pub async fn run_superjob(config: &RunConfig) -> Result<SourceRunResult> {
    let languages = config.tracked_languages()?;
    let mut sj_config = config.superjob.clone();
    sj_config.app_id = config.superjob_app_id().map(str::to_string);
    let fetcher = SuperJobFetcher::new(sj_config)?;
    AggregationEngine::new(fetcher, languages)
        .with_mode(config.run.mode)
        .run()
        .await
}

/// Runs every enabled source concurrently. Each source owns its own
/// accumulator, and a failure in one leaves the other untouched.
pub async fn run_enabled_sources<R: ChallengeResolver>(
    config: &RunConfig,
    resolver: R,
) -> Vec<SourceOutcome> {
    let headhunter = async move {
        if config.headhunter.enabled {
            Some(run_headhunter(config, resolver).await)
        } else {
            None
        }
    };
    let superjob = async move {
        if config.superjob.enabled {
            Some(run_superjob(config).await)
        } else {
            None
        }
    };

    let (hh_result, sj_result) = tokio::join!(headhunter, superjob);

    let mut outcomes = Vec::new();
    if let Some(result) = hh_result {
        outcomes.push(SourceOutcome {
            title: config.headhunter.title.clone(),
            result,
        });
    }
    if let Some(result) = sj_result {
        outcomes.push(SourceOutcome {
            title: config.superjob.title.clone(),
            result,
        });
    }
    outcomes
}
