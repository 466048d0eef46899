use crate::config::toml_config::HeadHunterConfig;
use crate::domain::model::{Challenge, Page, RawPosting, SalaryBounds};
use crate::domain::ports::{ChallengeResolver, PageFetcher};
use crate::utils::error::{Result, StatsError};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

pub const SOURCE_NAME: &str = "headhunter";

const CAPTCHA_REQUIRED: &str = "captcha_required";

#[derive(Debug, Deserialize)]
struct VacancyPage {
    pages: u32,
    #[serde(default)]
    items: Vec<Vacancy>,
}

#[derive(Debug, Deserialize)]
struct Vacancy {
    #[serde(default)]
    name: String,
    salary: Option<Salary>,
}

#[derive(Debug, Deserialize)]
struct Salary {
    currency: Option<String>,
    from: Option<f64>,
    to: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    value: Option<String>,
    captcha_url: Option<String>,
}

impl Vacancy {
    fn into_posting(self) -> RawPosting {
        let (currency, salary) = match self.salary {
            Some(s) => (s.currency, SalaryBounds::new(s.from, s.to)),
            None => (None, SalaryBounds::default()),
        };
        RawPosting {
            title: self.name,
            currency,
            salary,
        }
    }
}

/// HeadHunter vacancy search. The first response reports the page count.
///
/// A 403 carrying `captcha_required` is handed to the resolver and the same
/// page is requested again.
pub struct HeadHunterFetcher<R: ChallengeResolver> {
    config: HeadHunterConfig,
    resolver: R,
    client: Client,
}

impl<R: ChallengeResolver> HeadHunterFetcher<R> {
    pub fn new(config: HeadHunterConfig, resolver: R) -> Result<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout_seconds {
            builder = builder.timeout(std::time::Duration::from_secs(timeout));
        }

        Ok(Self {
            client: builder.build()?,
            config,
            resolver,
        })
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    fn query(&self, page: u32, keyword: Option<&str>) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("area", self.config.area.to_string()),
            ("professional_role", self.config.professional_role.to_string()),
            ("only_with_salary", self.config.only_with_salary.to_string()),
            ("period", self.config.period_days.to_string()),
            ("page", page.to_string()),
        ];
        if let Some(per_page) = self.config.per_page {
            query.push(("per_page", per_page.to_string()));
        }
        if let Some(text) = keyword {
            query.push(("text", text.to_string()));
        }
        query
    }

    /// Reads a 403 body. Only `captcha_required` is recoverable.
    fn parse_challenge(body: &str, back_url: String) -> Result<Challenge> {
        let parsed: ErrorBody =
            serde_json::from_str(body).map_err(|_| StatsError::UnexpectedChallenge {
                value: body.to_string(),
            })?;

        let Some(first) = parsed.errors.into_iter().next() else {
            return Err(StatsError::UnexpectedChallenge {
                value: "empty errors list".to_string(),
            });
        };

        match (first.value.as_deref(), first.captcha_url) {
            (Some(CAPTCHA_REQUIRED), Some(captcha_url)) => Ok(Challenge {
                captcha_url,
                back_url,
            }),
            (Some(CAPTCHA_REQUIRED), None) => Err(StatsError::UnexpectedChallenge {
                value: format!("{} without captcha_url", CAPTCHA_REQUIRED),
            }),
            (value, _) => Err(StatsError::UnexpectedChallenge {
                value: value.unwrap_or("missing error value").to_string(),
            }),
        }
    }
}

#[async_trait]
impl<R: ChallengeResolver> PageFetcher for HeadHunterFetcher<R> {
    fn source_name(&self) -> &str {
        SOURCE_NAME
    }

    fn currency(&self) -> &str {
        &self.config.currency
    }

    async fn fetch_page(&self, page: u32, keyword: Option<&str>) -> Result<Page> {
        let endpoint = format!("{}/vacancies", self.config.base_url.trim_end_matches('/'));
        let query = self.query(page, keyword);

        loop {
            tracing::debug!("📡 {}: GET {} page {}", SOURCE_NAME, endpoint, page);
            let response = self.client.get(&endpoint).query(&query).send().await?;
            let status = response.status();

            if status == StatusCode::FORBIDDEN {
                let back_url = response.url().to_string();
                let body = response.text().await?;
                let challenge = Self::parse_challenge(&body, back_url)?;

                tracing::warn!(
                    "🛑 {}: captcha required on page {}, waiting for operator",
                    SOURCE_NAME,
                    page
                );
                self.resolver.resolve(&challenge).await?;
                tracing::info!("🔁 {}: retrying page {}", SOURCE_NAME, page);
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(StatsError::UnexpectedStatus {
                    source_name: SOURCE_NAME.to_string(),
                    status: status.as_u16(),
                    body,
                });
            }

            let data: VacancyPage = response.json().await?;
            return Ok(Page {
                has_more: page + 1 < data.pages,
                postings: data.items.into_iter().map(Vacancy::into_posting).collect(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_captcha_challenge() {
        let body = r#"{"errors":[{"type":"forbidden","value":"captcha_required","captcha_url":"https://hh.ru/account/captcha?state=x"}]}"#;
        let challenge = HeadHunterFetcher::<crate::adapters::challenge::AutoResolver>::parse_challenge(
            body,
            "https://api.hh.ru/vacancies?page=2".to_string(),
        )
        .unwrap();
        assert_eq!(challenge.captcha_url, "https://hh.ru/account/captcha?state=x");
        assert_eq!(challenge.back_url, "https://api.hh.ru/vacancies?page=2");
    }

    #[test]
    fn test_parse_other_forbidden_value_is_fatal() {
        let body = r#"{"errors":[{"type":"forbidden","value":"ip_blocked"}]}"#;
        let err = HeadHunterFetcher::<crate::adapters::challenge::AutoResolver>::parse_challenge(
            body,
            String::new(),
        )
        .unwrap_err();
        assert!(matches!(err, StatsError::UnexpectedChallenge { value } if value == "ip_blocked"));
    }

    #[test]
    fn test_captcha_without_url_is_reported_as_such() {
        let body = r#"{"errors":[{"type":"forbidden","value":"captcha_required"}]}"#;
        let err = HeadHunterFetcher::<crate::adapters::challenge::AutoResolver>::parse_challenge(
            body,
            String::new(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            StatsError::UnexpectedChallenge { value } if value == "captcha_required without captcha_url"
        ));
    }

    #[test]
    fn test_vacancy_without_salary_has_no_currency() {
        let vacancy: Vacancy = serde_json::from_str(r#"{"name":"Go dev","salary":null}"#).unwrap();
        let posting = vacancy.into_posting();
        assert_eq!(posting.title, "Go dev");
        assert_eq!(posting.currency, None);
        assert_eq!(posting.salary, SalaryBounds::default());
    }
}
