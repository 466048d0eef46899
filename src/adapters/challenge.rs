use crate::domain::model::Challenge;
use crate::domain::ports::ChallengeResolver;
use crate::utils::error::{Result, StatsError};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};
use tokio::sync::Mutex;

/// Asks the operator to solve the captcha in a browser and waits for a "yes".
///
/// There is no timeout. Closed input is an error rather than a silent retry.
pub struct ConsoleResolver<R> {
    input: Mutex<R>,
}

impl ConsoleResolver<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R: AsyncBufRead + Unpin + Send> ConsoleResolver<R> {
    pub fn new(input: R) -> Self {
        Self {
            input: Mutex::new(input),
        }
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> ChallengeResolver for ConsoleResolver<R> {
    async fn resolve(&self, challenge: &Challenge) -> Result<()> {
        println!("HeadHunter asks for a captcha before the run can continue.");
        println!("Captcha page: {}", challenge.captcha_url);
        println!("Refused request: {}", challenge.back_url);
        println!("Open this link to solve it:\n{}", challenge.solve_url());

        let mut input = self.input.lock().await;
        loop {
            println!("Captcha solved? Yes/No");
            let mut line = String::new();
            if input.read_line(&mut line).await? == 0 {
                return Err(StatsError::ChallengeAborted {
                    message: "input closed before the captcha was confirmed".to_string(),
                });
            }
            if line.to_lowercase().contains('y') {
                tracing::info!("Operator confirmed the captcha");
                return Ok(());
            }
        }
    }
}

/// Confirms every challenge immediately. For tests and unattended dry runs.
#[derive(Debug, Default)]
pub struct AutoResolver {
    resolved: AtomicUsize,
}

impl AutoResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolved(&self) -> usize {
        self.resolved.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChallengeResolver for AutoResolver {
    async fn resolve(&self, challenge: &Challenge) -> Result<()> {
        tracing::debug!("Auto-resolving challenge {}", challenge.captcha_url);
        self.resolved.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
