use crate::core::classifier::classify;
use crate::core::finalize::StatsAccumulator;
use crate::core::salary::estimate_for;
use crate::domain::model::{Page, SourceRunResult, SweepMode, TrackedLanguage, TrackedLanguages};
use crate::domain::ports::PageFetcher;
use crate::utils::error::Result;

/// Drives one source's fetcher to exhaustion and aggregates per-language stats.
pub struct AggregationEngine<F: PageFetcher> {
    fetcher: F,
    languages: TrackedLanguages,
    mode: SweepMode,
}

impl<F: PageFetcher> AggregationEngine<F> {
    pub fn new(fetcher: F, languages: TrackedLanguages) -> Self {
        Self {
            fetcher,
            languages,
            mode: SweepMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: SweepMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Runs a full sweep. Any fetch error aborts the run without a partial result.
    pub async fn run(&self) -> Result<SourceRunResult> {
        let source = self.fetcher.source_name();
        tracing::info!(
            "🚀 {}: starting {:?} sweep for {} languages",
            source,
            self.mode,
            self.languages.len()
        );

        let mut accumulator = StatsAccumulator::new(source, &self.languages);

        match self.mode {
            SweepMode::SingleSweep => {
                self.sweep(None, &mut accumulator).await?;
            }
            SweepMode::PerLanguage => {
                for language in self.languages.iter() {
                    self.sweep(Some(language), &mut accumulator).await?;
                }
            }
        }

        let result = accumulator.finalize();
        tracing::info!(
            "✅ {}: sweep finished, {} language matches",
            source,
            result.total_found()
        );
        Ok(result)
    }

    /// One pagination pass. With `keyword` set the source filters by that
    /// language and every posting counts toward it.
    async fn sweep(
        &self,
        keyword: Option<&TrackedLanguage>,
        accumulator: &mut StatsAccumulator,
    ) -> Result<u32> {
        let source = self.fetcher.source_name();
        let currency = self.fetcher.currency();
        let mut page_index = 0;

        loop {
            let Page { postings, has_more } = self
                .fetcher
                .fetch_page(page_index, keyword.map(TrackedLanguage::as_str))
                .await?;

            tracing::debug!(
                "📄 {}: page {} returned {} postings{}",
                source,
                page_index,
                postings.len(),
                keyword.map(|k| format!(" for '{}'", k)).unwrap_or_default()
            );

            for posting in &postings {
                let estimate = estimate_for(posting, currency);
                match keyword {
                    Some(language) => accumulator.record(language, estimate),
                    None => {
                        for language in classify(&posting.title, &self.languages) {
                            accumulator.record(language, estimate);
                        }
                    }
                }
            }

            page_index += 1;
            if !has_more {
                break;
            }
        }

        tracing::debug!("{}: sweep consumed {} pages", source, page_index);
        Ok(page_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{LanguageStats, RawPosting, SalaryBounds};
    use crate::utils::error::StatsError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct ScriptedFetcher {
        sweeps: HashMap<Option<String>, Vec<Page>>,
        calls: Mutex<Vec<(u32, Option<String>)>>,
    }

    impl ScriptedFetcher {
        fn single(pages: Vec<Page>) -> Self {
            let mut sweeps = HashMap::new();
            sweeps.insert(None, pages);
            Self {
                sweeps,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<(u32, Option<String>)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PageFetcher for ScriptedFetcher {
        fn source_name(&self) -> &str {
            "scripted"
        }

        fn currency(&self) -> &str {
            "RUR"
        }

        async fn fetch_page(&self, page: u32, keyword: Option<&str>) -> Result<Page> {
            let keyword = keyword.map(str::to_string);
            self.calls.lock().unwrap().push((page, keyword.clone()));
            self.sweeps
                .get(&keyword)
                .and_then(|pages| pages.get(page as usize))
                .cloned()
                .ok_or_else(|| StatsError::UnexpectedStatus {
                    source_name: "scripted".to_string(),
                    status: 500,
                    body: format!("no page {}", page),
                })
        }
    }

    fn posting(title: &str, currency: &str, from: Option<f64>, to: Option<f64>) -> RawPosting {
        RawPosting {
            title: title.to_string(),
            currency: Some(currency.to_string()),
            salary: SalaryBounds::new(from, to),
        }
    }

    fn page(postings: Vec<RawPosting>, has_more: bool) -> Page {
        Page { postings, has_more }
    }

    #[tokio::test]
    async fn test_multi_match_counts_for_every_language() {
        let fetcher = ScriptedFetcher::single(vec![page(
            vec![posting(
                "Senior JavaScript/Java Developer",
                "RUR",
                Some(100_000.0),
                Some(200_000.0),
            )],
            false,
        )]);
        let langs = TrackedLanguages::new(["JavaScript", "Java"]).unwrap();
        let result = AggregationEngine::new(fetcher, langs).run().await.unwrap();

        let expected = LanguageStats {
            found: 1,
            processed: 1,
            average_salary: 150_000,
        };
        assert_eq!(result.get("JavaScript"), Some(&expected));
        assert_eq!(result.get("Java"), Some(&expected));
    }

    #[tokio::test]
    async fn test_floor_only_estimate_and_missing_bounds() {
        let fetcher = ScriptedFetcher::single(vec![page(
            vec![
                posting("Go developer", "RUR", Some(120_000.0), None),
                posting("Go backend", "RUR", None, None),
            ],
            false,
        )]);
        let langs = TrackedLanguages::new(["Go"]).unwrap();
        let result = AggregationEngine::new(fetcher, langs).run().await.unwrap();

        assert_eq!(
            result.get("Go"),
            Some(&LanguageStats {
                found: 2,
                processed: 1,
                average_salary: 144_000,
            })
        );
    }

    #[tokio::test]
    async fn test_foreign_currency_counts_only_as_found() {
        let fetcher = ScriptedFetcher::single(vec![page(
            vec![posting("Rust engineer", "USD", Some(5_000.0), Some(7_000.0))],
            false,
        )]);
        let langs = TrackedLanguages::new(["Rust"]).unwrap();
        let result = AggregationEngine::new(fetcher, langs).run().await.unwrap();

        let stats = result.get("Rust").unwrap();
        assert_eq!(stats.found, 1);
        assert_eq!(stats.processed, 0);
        assert_eq!(stats.average_salary, 0);
    }

    #[tokio::test]
    async fn test_last_page_is_processed_before_stopping() {
        let fetcher = ScriptedFetcher::single(vec![
            page(vec![posting("Python dev", "RUR", Some(100.0), Some(100.0))], true),
            page(vec![posting("Python dev", "RUR", Some(300.0), Some(300.0))], true),
            page(vec![posting("Python dev", "RUR", Some(500.0), Some(500.0))], false),
        ]);
        let langs = TrackedLanguages::new(["Python"]).unwrap();
        let engine = AggregationEngine::new(fetcher, langs);
        let result = engine.run().await.unwrap();

        let pages: Vec<u32> = engine.fetcher().calls().iter().map(|(p, _)| *p).collect();
        assert_eq!(pages, vec![0, 1, 2]);
        assert_eq!(
            result.get("Python"),
            Some(&LanguageStats {
                found: 3,
                processed: 3,
                average_salary: 300,
            })
        );
    }

    #[tokio::test]
    async fn test_fetch_error_aborts_run() {
        // 第二頁不存在，腳本回傳錯誤
        let fetcher = ScriptedFetcher::single(vec![page(
            vec![posting("PHP developer", "RUR", Some(1.0), None)],
            true,
        )]);
        let langs = TrackedLanguages::new(["PHP"]).unwrap();
        let result = AggregationEngine::new(fetcher, langs).run().await;

        assert!(matches!(
            result,
            Err(StatsError::UnexpectedStatus { status: 500, .. })
        ));
    }

    #[tokio::test]
    async fn test_per_language_mode_counts_every_posting_for_keyword() {
        let mut sweeps = HashMap::new();
        sweeps.insert(
            Some("Kotlin".to_string()),
            vec![page(
                vec![
                    // 標題不含關鍵字也要算進去，因為 API 已經過濾過
                    posting("Android developer", "RUR", Some(200_000.0), None),
                    posting("Mobile engineer", "RUR", None, None),
                ],
                false,
            )],
        );
        sweeps.insert(Some("Swift".to_string()), vec![page(vec![], false)]);
        let fetcher = ScriptedFetcher {
            sweeps,
            calls: Mutex::new(Vec::new()),
        };

        let langs = TrackedLanguages::new(["Kotlin", "Swift"]).unwrap();
        let engine = AggregationEngine::new(fetcher, langs).with_mode(SweepMode::PerLanguage);
        let result = engine.run().await.unwrap();

        assert_eq!(
            engine.fetcher().calls(),
            vec![(0, Some("Kotlin".to_string())), (0, Some("Swift".to_string()))]
        );
        assert_eq!(
            result.get("Kotlin"),
            Some(&LanguageStats {
                found: 2,
                processed: 1,
                average_salary: 240_000,
            })
        );
        assert_eq!(result.get("Swift"), Some(&LanguageStats::default()));
    }
}
