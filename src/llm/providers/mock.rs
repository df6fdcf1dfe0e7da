//! Offline provider — answers from the keyword resolver after a simulated
//! network delay. Used when no API key is configured, in offline mode, and as
//! the fallback for a failing live provider.

use std::time::Duration;

use tracing::debug;

use crate::assistant::resolver;
use crate::llm::ProviderError;

#[derive(Debug, Clone)]
pub struct MockProvider {
    delay: Duration,
}

impl MockProvider {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub async fn complete(&self, content: &str) -> Result<String, ProviderError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let category = resolver::classify(content);
        debug!(?category, "offline reply");
        Ok(resolver::reply_for(category).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn complete_uses_resolver() {
        let p = MockProvider::new(Duration::ZERO);
        assert_eq!(p.complete("zzz").await.unwrap(), resolver::DEFAULT_REPLY);
    }

    #[tokio::test(start_paused = true)]
    async fn complete_waits_for_delay() {
        let p = MockProvider::new(Duration::from_millis(1000));
        let start = tokio::time::Instant::now();
        p.complete("hello").await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(1000));
    }
}
