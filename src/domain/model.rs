use crate::utils::error::{Result, StatsError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// A programming language name tracked across postings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackedLanguage(String);

impl TrackedLanguage {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackedLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered, duplicate-free set of tracked languages. Order is display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedLanguages {
    languages: Vec<TrackedLanguage>,
    // 預先轉小寫，分類時不用每筆重算
    lowered: Vec<String>,
}

impl TrackedLanguages {
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut languages = Vec::new();

        for name in names {
            let name = name.into();
            if name.trim().is_empty() {
                return Err(StatsError::InvalidConfigValueError {
                    field: "languages".to_string(),
                    value: name,
                    reason: "Language name cannot be empty".to_string(),
                });
            }
            if !seen.insert(name.clone()) {
                return Err(StatsError::InvalidConfigValueError {
                    field: "languages".to_string(),
                    value: name,
                    reason: "Duplicate language".to_string(),
                });
            }
            languages.push(TrackedLanguage(name));
        }

        if languages.is_empty() {
            return Err(StatsError::ConfigError {
                message: "At least one language must be tracked".to_string(),
            });
        }

        let lowered = languages.iter().map(|l| l.0.to_lowercase()).collect();
        Ok(Self { languages, lowered })
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrackedLanguage> {
        self.languages.iter()
    }

    /// Pairs of (language, lower-cased identifier).
    pub(crate) fn iter_lowered(&self) -> impl Iterator<Item = (&TrackedLanguage, &str)> {
        self.languages
            .iter()
            .zip(self.lowered.iter().map(String::as_str))
    }

    pub fn position(&self, language: &TrackedLanguage) -> Option<usize> {
        self.languages.iter().position(|l| l == language)
    }
}

/// Salary range advertised by a posting. Either bound may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SalaryBounds {
    pub from: Option<f64>,
    pub to: Option<f64>,
}

impl SalaryBounds {
    pub fn new(from: Option<f64>, to: Option<f64>) -> Self {
        Self { from, to }
    }
}

/// One posting normalized from a source-specific response shape.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPosting {
    pub title: String,
    pub currency: Option<String>,
    pub salary: SalaryBounds,
}

/// One fetched page and whether the source has more after it.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub postings: Vec<RawPosting>,
    pub has_more: bool,
}

/// How a sweep maps postings to languages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum SweepMode {
    /// One unfiltered sweep; each posting is classified by its title.
    #[default]
    SingleSweep,
    /// One keyword-filtered sweep per language; every posting counts for it.
    PerLanguage,
}

/// Running counters for one language while a sweep is in progress.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LanguageTally {
    pub found: u64,
    pub processed: u64,
    pub salary_sum: f64,
}

/// Final statistics for one language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageStats {
    pub found: u64,
    pub processed: u64,
    pub average_salary: u64,
}

/// Finalized statistics of one source, in display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceRunResult {
    pub source: String,
    pub stats: Vec<(TrackedLanguage, LanguageStats)>,
}

impl SourceRunResult {
    pub fn get(&self, language: &str) -> Option<&LanguageStats> {
        self.stats
            .iter()
            .find(|(l, _)| l.as_str() == language)
            .map(|(_, s)| s)
    }

    pub fn total_found(&self) -> u64 {
        self.stats.iter().map(|(_, s)| s.found).sum()
    }
}

/// Anti-bot challenge raised by the HeadHunter API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    pub captcha_url: String,
    pub back_url: String,
}

impl Challenge {
    /// Captcha page with `backurl` appended so the browser returns to the refused request.
    pub fn solve_url(&self) -> String {
        match url::Url::parse(&self.captcha_url) {
            Ok(mut url) => {
                url.query_pairs_mut().append_pair("backurl", &self.back_url);
                url.to_string()
            }
            Err(_) => format!("{}&backurl={}", self.captcha_url, self.back_url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracked_languages_keep_order() {
        let langs = TrackedLanguages::new(["Python", "Go", "Rust"]).unwrap();
        let names: Vec<&str> = langs.iter().map(|l| l.as_str()).collect();
        assert_eq!(names, vec!["Python", "Go", "Rust"]);
        assert_eq!(langs.position(&TrackedLanguage::new("Rust")), Some(2));
    }

    #[test]
    fn test_tracked_languages_reject_duplicates() {
        assert!(TrackedLanguages::new(["Go", "Rust", "Go"]).is_err());
        // 大小寫不同視為不同語言
        assert!(TrackedLanguages::new(["Go", "GO"]).is_ok());
    }

    #[test]
    fn test_tracked_languages_reject_empty() {
        assert!(TrackedLanguages::new(Vec::<String>::new()).is_err());
        assert!(TrackedLanguages::new(["Go", "  "]).is_err());
    }

    #[test]
    fn test_challenge_solve_url_appends_backurl() {
        let challenge = Challenge {
            captcha_url: "https://hh.ru/account/captcha?state=abc".to_string(),
            back_url: "https://api.hh.ru/vacancies?page=3".to_string(),
        };
        let url = challenge.solve_url();
        assert!(url.starts_with("https://hh.ru/account/captcha?state=abc&backurl="));
        assert!(url.contains("page%3D3"));
    }
}
