use std::{sync::Arc, time::Instant};
use tracing::{debug, info};

use crate::{
    config::Config,
    context::{Context, Sources},
    error::AppError,
    features::extract_features,
    intel::Shorteners,
    model::GradientBoostingModel,
    types::{FeatureVector, Verdict},
};

// Feature pipeline plus the classifier it feeds. Both are handed in, so
// either can be swapped for a fixture.
pub struct FisherEngine {
    sources: Sources,
    shorteners: Shorteners,
    model: Arc<GradientBoostingModel>,
}

impl FisherEngine {
    pub fn new(sources: Sources, shorteners: Shorteners, model: Arc<GradientBoostingModel>) -> Self {
        Self {
            sources,
            shorteners,
            model,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        info!("Initializing Fisher engine...");

        // Initialize external sources
        let sources = Sources::from_config(config)?;

        // Load shortener list
        let shorteners = Shorteners::load(&config.shorteners_path)?;

        // Load classifier
        let model = Arc::new(GradientBoostingModel::load(&config.model_path)?);

        info!("Fisher engine initialized successfully");
        Ok(Self::new(sources, shorteners, model))
    }

    pub async fn context(&self, url: &str) -> Result<Context, AppError> {
        Context::build(url, &self.sources).await
    }

    pub fn features(&self, ctx: &Context) -> FeatureVector {
        extract_features(ctx, &self.shorteners)
    }

    pub async fn extract(&self, url: &str) -> Result<FeatureVector, AppError> {
        let ctx = self.context(url).await?;
        Ok(self.features(&ctx))
    }

    pub async fn score(&self, url: &str) -> Result<Verdict, AppError> {
        let start = Instant::now();
        metrics::counter!("fisher_requests_total").increment(1);

        // Extract features
        let features = self.extract(url).await?;
        debug!("Feature vector for {}: {:?}", url, features.as_slice());

        // Classify
        let probability = self.model.predict_proba(&features);
        let safe = self.model.is_benign(&features);
        let verdict = Verdict {
            url: url.to_string(),
            safe,
            probability,
            features,
        };

        // Record metrics
        let latency = start.elapsed().as_millis() as f64;
        metrics::histogram!("fisher_request_duration_ms").record(latency);
        metrics::counter!("fisher_verdicts_total", "safe" => verdict.safe_label()).increment(1);

        info!(
            "Scored {}: {} ({}, {:.0}ms)",
            url,
            verdict.safe_label(),
            verdict.score_label(),
            latency
        );
        Ok(verdict)
    }
}
