use crate::config::toml_config::SuperJobConfig;
use crate::domain::model::{Page, RawPosting, SalaryBounds};
use crate::domain::ports::PageFetcher;
use crate::utils::error::{Result, StatsError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

pub const SOURCE_NAME: &str = "superjob";

const APP_ID_HEADER: &str = "X-Api-App-Id";

#[derive(Debug, Deserialize)]
struct VacancyPage {
    more: bool,
    #[serde(default)]
    objects: Vec<Vacancy>,
}

#[derive(Debug, Deserialize)]
struct Vacancy {
    #[serde(default)]
    profession: String,
    currency: Option<String>,
    payment_from: Option<f64>,
    payment_to: Option<f64>,
}

impl Vacancy {
    fn into_posting(self) -> RawPosting {
        RawPosting {
            title: self.profession,
            currency: self.currency,
            // superjob 用 0 表示未填，估算時會當成缺值
            salary: SalaryBounds::new(self.payment_from, self.payment_to),
        }
    }
}

/// SuperJob vacancy search, paged until a response says `more: false`.
pub struct SuperJobFetcher {
    config: SuperJobConfig,
    app_id: String,
    client: Client,
}

impl SuperJobFetcher {
    pub fn new(config: SuperJobConfig) -> Result<Self> {
        let app_id = config
            .app_id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| StatsError::MissingConfigError {
                field: "superjob.app_id (SUPERJOB_API_TOKEN)".to_string(),
            })?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout_seconds {
            builder = builder.timeout(std::time::Duration::from_secs(timeout));
        }

        Ok(Self {
            client: builder.build()?,
            config,
            app_id,
        })
    }

    fn query(&self, page: u32, keyword: Option<&str>) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("town", self.config.town.clone()),
            ("catalogues", self.config.catalogues.to_string()),
            ("page", page.to_string()),
        ];
        if let Some(count) = self.config.count {
            query.push(("count", count.to_string()));
        }
        if let Some(keyword) = keyword {
            query.push(("keyword", keyword.to_string()));
        }
        query
    }
}

#[async_trait]
impl PageFetcher for SuperJobFetcher {
    fn source_name(&self) -> &str {
        SOURCE_NAME
    }

    fn currency(&self) -> &str {
        &self.config.currency
    }

    async fn fetch_page(&self, page: u32, keyword: Option<&str>) -> Result<Page> {
        tracing::debug!("📡 {}: GET {} page {}", SOURCE_NAME, self.config.base_url, page);

        let response = self
            .client
            .get(&self.config.base_url)
            .header(APP_ID_HEADER, &self.app_id)
            .query(&self.query(page, keyword))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StatsError::UnexpectedStatus {
                source_name: SOURCE_NAME.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let data: VacancyPage = response.json().await?;
        Ok(Page {
            has_more: data.more,
            postings: data.objects.into_iter().map(Vacancy::into_posting).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_app_id_is_config_error() {
        let config = SuperJobConfig {
            app_id: None,
            ..SuperJobConfig::default()
        };
        assert!(matches!(
            SuperJobFetcher::new(config),
            Err(StatsError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_vacancy_maps_profession_to_title() {
        let vacancy: Vacancy = serde_json::from_str(
            r#"{"profession":"Python-разработчик","currency":"rub","payment_from":0,"payment_to":150000}"#,
        )
        .unwrap();
        let posting = vacancy.into_posting();
        assert_eq!(posting.title, "Python-разработчик");
        assert_eq!(posting.currency.as_deref(), Some("rub"));
        assert_eq!(posting.salary, SalaryBounds::new(Some(0.0), Some(150_000.0)));
    }
}
