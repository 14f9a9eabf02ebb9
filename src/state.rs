use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use crate::auth::{TokenError, TokenKeys};
use crate::config::AppConfig;
use crate::database::{ItemStore, MemoryItemStore, PgItemStore};
use crate::services::feedback::THANK_YOU_IMAGE_CID;
use crate::services::{Catalog, FeedbackNotifier, HttpMailer, InlineImage, LogMailer, Mailer};

/// Read-only per-process context shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub tokens: Arc<TokenKeys>,
    pub catalog: Arc<Catalog>,
    pub feedback: Arc<FeedbackNotifier>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        store: Arc<dyn ItemStore>,
        mailer: Arc<dyn Mailer>,
    ) -> Result<Self, TokenError> {
        let tokens = TokenKeys::new(&config.security.jwt_secret)?;
        let catalog = Catalog::new(store, config.database.store_timeout());
        let feedback = FeedbackNotifier::new(
            mailer,
            config.mail.from.clone(),
            config.mail.feedback_inbox.clone(),
        );

        Ok(Self {
            config: Arc::new(config),
            tokens: Arc::new(tokens),
            catalog: Arc::new(catalog),
            feedback: Arc::new(feedback),
        })
    }

    /// Replace the feedback notifier with one that embeds `image` in thank-you mail.
    pub fn with_thank_you_image(mut self, image: InlineImage) -> Self {
        let feedback = self.feedback.as_ref().clone().with_thank_you_image(image);
        self.feedback = Arc::new(feedback);
        self
    }

    /// Wire the concrete store and mailer selected by `config`.
    pub async fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let thank_you_image = match &config.mail.thank_you_image {
            Some(path) => {
                let bytes = tokio::fs::read(path)
                    .await
                    .with_context(|| format!("failed to read thank-you image {}", path))?;
                Some(InlineImage::png(THANK_YOU_IMAGE_CID, &bytes))
            }
            None => None,
        };

        let store: Arc<dyn ItemStore> = match &config.database.url {
            Some(url) => {
                let store = PgItemStore::open(
                    url,
                    config.database.max_connections,
                    config.database.store_timeout(),
                )
                .await?;
                Arc::new(store)
            }
            None => {
                info!("DATABASE_URL not set, using in-memory item store");
                Arc::new(MemoryItemStore::new())
            }
        };

        let mailer: Arc<dyn Mailer> = match &config.mail.api_url {
            Some(url) => Arc::new(HttpMailer::new(url, config.mail.api_key.clone())?),
            None => Arc::new(LogMailer),
        };

        let state = Self::new(config, store, mailer)?;
        Ok(match thank_you_image {
            Some(image) => state.with_thank_you_image(image),
            None => state,
        })
    }
}
