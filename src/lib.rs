// Phishing risk scoring for URLs: a 30-indicator feature pipeline over the
// page, its registration record and a few reputation services, feeding a
// gradient-boosted classifier behind a small HTTP API.

pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod features;
pub mod intel;
pub mod model;
pub mod routes;
pub mod sources;
pub mod types;

pub use config::Config;
pub use context::{Context, Sources};
pub use engine::FisherEngine;
pub use error::AppError;
pub use features::extract_features;
pub use types::{Feature, FeatureVector, Verdict, FEATURE_COUNT};
