use crate::domain::model::{SweepMode, TrackedLanguages};
use crate::utils::error::{Result, StatsError};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_LANGUAGES: [&str; 12] = [
    "JavaScript",
    "Python",
    "Java",
    "C/С++",
    "PHP",
    "C#",
    "Swift",
    "Kotlin",
    "Go",
    "Ruby",
    "Rust",
    "1с",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub run: RunSection,
    pub headhunter: HeadHunterConfig,
    pub superjob: SuperJobConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSection {
    pub languages: Vec<String>,
    pub mode: SweepMode,
    pub output_path: Option<String>,
}

impl Default for RunSection {
    fn default() -> Self {
        Self {
            languages: DEFAULT_LANGUAGES.iter().map(|l| l.to_string()).collect(),
            mode: SweepMode::default(),
            output_path: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadHunterConfig {
    pub enabled: bool,
    pub title: String,
    pub base_url: String,
    pub user_agent: String,
    pub area: u32,
    pub professional_role: u32,
    pub only_with_salary: bool,
    pub period_days: u32,
    pub per_page: Option<u32>,
    pub currency: String,
    pub timeout_seconds: Option<u64>,
}

impl Default for HeadHunterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            title: "HeadHunter Moscow".to_string(),
            base_url: "https://api.hh.ru".to_string(),
            user_agent: concat!("vacancy-stats/", env!("CARGO_PKG_VERSION")).to_string(),
            area: 1,
            professional_role: 96,
            only_with_salary: true,
            period_days: 31,
            per_page: None,
            currency: "RUR".to_string(),
            timeout_seconds: Some(30),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SuperJobConfig {
    pub enabled: bool,
    pub title: String,
    pub base_url: String,
    pub app_id: Option<String>,
    pub town: String,
    pub catalogues: u32,
    pub count: Option<u32>,
    pub currency: String,
    pub timeout_seconds: Option<u64>,
}

impl Default for SuperJobConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            title: "SuperJob Moscow".to_string(),
            base_url: "https://api.superjob.ru/2.0/vacancies/".to_string(),
            app_id: None,
            town: "Москва".to_string(),
            catalogues: 48,
            count: None,
            currency: "rub".to_string(),
            timeout_seconds: Some(30),
        }
    }
}

impl RunConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(StatsError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| StatsError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SUPERJOB_API_TOKEN})，找不到就保留原字串
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| StatsError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn tracked_languages(&self) -> Result<TrackedLanguages> {
        TrackedLanguages::new(self.run.languages.iter().cloned())
    }

    /// SuperJob 金鑰；未替換的 ${VAR} 視同未設定
    pub fn superjob_app_id(&self) -> Option<&str> {
        self.superjob
            .app_id
            .as_deref()
            .filter(|id| !id.trim().is_empty() && !id.contains("${"))
    }

    pub fn validate_config(&self) -> Result<()> {
        if self.run.languages.is_empty() {
            return Err(StatsError::ConfigValidationError {
                field: "run.languages".to_string(),
                message: "At least one language must be tracked".to_string(),
            });
        }
        for language in &self.run.languages {
            validation::validate_non_empty_string("run.languages", language)?;
        }
        validation::validate_unique("run.languages", &self.run.languages)?;

        if let Some(path) = &self.run.output_path {
            validation::validate_path("run.output_path", path)?;
        }

        if !self.headhunter.enabled && !self.superjob.enabled {
            return Err(StatsError::ConfigError {
                message: "Both sources are disabled, nothing to do".to_string(),
            });
        }

        if self.headhunter.enabled {
            let hh = &self.headhunter;
            validation::validate_url("headhunter.base_url", &hh.base_url)?;
            validation::validate_non_empty_string("headhunter.user_agent", &hh.user_agent)?;
            validation::validate_non_empty_string("headhunter.currency", &hh.currency)?;
            validation::validate_positive_number(
                "headhunter.period_days",
                u64::from(hh.period_days),
                1,
            )?;
            if let Some(per_page) = hh.per_page {
                validation::validate_range("headhunter.per_page", per_page, 1, 100)?;
            }
        }

        if self.superjob.enabled {
            let sj = &self.superjob;
            validation::validate_url("superjob.base_url", &sj.base_url)?;
            validation::validate_non_empty_string("superjob.town", &sj.town)?;
            validation::validate_non_empty_string("superjob.currency", &sj.currency)?;
            validation::validate_required_field(
                "superjob.app_id (SUPERJOB_API_TOKEN)",
                &self.superjob_app_id(),
            )?;
            if let Some(count) = sj.count {
                validation::validate_range("superjob.count", count, 1, 100)?;
            }
        }

        Ok(())
    }
}

impl Validate for RunConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
