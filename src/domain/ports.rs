use crate::domain::model::{Challenge, Page};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// One job board's paginated search endpoint.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Name used in logs, errors and report titles.
    fn source_name(&self) -> &str;

    /// The only currency whose salaries are averaged.
    fn currency(&self) -> &str;

    /// Fetches one page. `keyword` narrows the search to one language when set.
    async fn fetch_page(&self, page: u32, keyword: Option<&str>) -> Result<Page>;
}

/// Hands an anti-bot challenge to whoever can solve it and waits until they did.
#[async_trait]
pub trait ChallengeResolver: Send + Sync {
    async fn resolve(&self, challenge: &Challenge) -> Result<()>;
}
