use crate::domain::model::{
    LanguageStats, LanguageTally, SourceRunResult, TrackedLanguage, TrackedLanguages,
};

/// Per-run counters, one tally per tracked language.
///
/// Built fresh for every sweep. `finalize` consumes it, so the averages can
/// only be computed once.
#[derive(Debug, Clone)]
pub struct StatsAccumulator {
    source: String,
    languages: TrackedLanguages,
    tallies: Vec<LanguageTally>,
}

impl StatsAccumulator {
    pub fn new(source: impl Into<String>, languages: &TrackedLanguages) -> Self {
        Self {
            source: source.into(),
            languages: languages.clone(),
            tallies: vec![LanguageTally::default(); languages.len()],
        }
    }

    /// Counts one posting for `language`, adding `estimate` when there is one.
    pub fn record(&mut self, language: &TrackedLanguage, estimate: Option<f64>) {
        let Some(index) = self.languages.position(language) else {
            tracing::warn!("Ignoring untracked language '{}'", language);
            return;
        };

        let tally = &mut self.tallies[index];
        tally.found += 1;
        if let Some(salary) = estimate {
            tally.processed += 1;
            tally.salary_sum += salary;
        }
    }

    /// Turns the running sums into floored averages.
    pub fn finalize(self) -> SourceRunResult {
        let stats = self
            .languages
            .iter()
            .cloned()
            .zip(self.tallies)
            .map(|(language, tally)| (language, finalize_tally(&tally)))
            .collect();

        SourceRunResult {
            source: self.source,
            stats,
        }
    }
}

/// Floors `salary_sum / processed`. Estimates that average below 1 floor to
/// 0 while `processed` stays positive.
fn finalize_tally(tally: &LanguageTally) -> LanguageStats {
    let average_salary = if tally.processed > 0 {
        (tally.salary_sum / tally.processed as f64).floor() as u64
    } else {
        0
    };

    LanguageStats {
        found: tally.found,
        processed: tally.processed,
        average_salary,
    }
}
