//! Routes every API family to the demo store or the REST client

use crate::config::Settings;
use goaltrack_client::HttpClient;
use goaltrack_core::Backend;
use goaltrack_demo::{DemoConfig, DemoStore};
use std::sync::Arc;
use tracing::debug;

pub fn backend(settings: &Settings) -> Backend {
    if settings.demo_mode {
        debug!("Using demo backend ({} ms latency)", settings.demo_latency_ms);
        let store = DemoStore::seeded(DemoConfig::with_latency_ms(settings.demo_latency_ms));
        Backend::uniform(Arc::new(store))
    } else {
        debug!("Using API at {}", settings.api_url);
        let client = HttpClient::new(settings.api_url.clone())
            .with_token(settings.access_token.clone());
        Backend::uniform(Arc::new(client))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_demo_mode_serves_seed_data() {
        let settings = Settings {
            demo_mode: true,
            demo_latency_ms: 0,
            ..Settings::default()
        };
        let backend = backend(&settings);

        assert_eq!(backend.goals.get_goals().await.unwrap().len(), 5);
        assert_eq!(backend.categories.get_all_categories().await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_families_share_one_store() {
        let settings = Settings {
            demo_mode: true,
            demo_latency_ms: 0,
            ..Settings::default()
        };
        let backend = backend(&settings);

        backend.goals.delete_goal(1).await.unwrap();
        let development = backend.categories.get_category(1).await.unwrap();
        assert_eq!(development.goal_count, 2);
    }
}
