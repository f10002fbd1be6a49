use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::redirect::Policy;
use tracing::debug;
use url::Url;

use super::{build_client, RankService, TrafficService};
use crate::{
    config::Config,
    error::{AppError, SourceError},
};

static GLOBAL_RANK: Lazy<Regex> = Lazy::new(|| Regex::new(r"Global Rank: ([0-9]+)").unwrap());

static REACH_RANK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<REACH\b[^>]*\bRANK="([0-9]+)""#).unwrap());

// Scrapes the global rank from a checkpagerank-style form endpoint.
pub struct CheckPageRankService {
    client: reqwest::Client,
    endpoint: String,
}

impl CheckPageRankService {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let client = build_client(&config.user_agent, config.request_timeout(), Policy::default())?;
        Ok(Self {
            client,
            endpoint: config.rank_endpoint.clone(),
        })
    }

    async fn query(&self, domain: &str) -> Result<String, SourceError> {
        let response = self
            .client
            .post(&self.endpoint)
            .form(&[("name", domain)])
            .send()
            .await?;
        Ok(response.text().await?)
    }
}

#[async_trait]
impl RankService for CheckPageRankService {
    async fn global_rank(&self, domain: &str) -> i64 {
        match self.query(domain).await {
            Ok(body) => parse_global_rank(&body).unwrap_or(-1),
            Err(e) => {
                debug!("Rank query for {} failed: {}", domain, e);
                -1
            }
        }
    }
}

pub(crate) fn parse_global_rank(body: &str) -> Option<i64> {
    GLOBAL_RANK
        .captures(body)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

// Alexa-style XML traffic rank (`<REACH RANK="...">`).
pub struct AlexaTrafficService {
    client: reqwest::Client,
    endpoint: String,
}

impl AlexaTrafficService {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let client = build_client(&config.user_agent, config.request_timeout(), Policy::default())?;
        Ok(Self {
            client,
            endpoint: config.traffic_endpoint.clone(),
        })
    }
}

#[async_trait]
impl TrafficService for AlexaTrafficService {
    async fn traffic_rank(&self, url: &str) -> Result<u64, SourceError> {
        let query = Url::parse_with_params(
            &self.endpoint,
            &[("cli", "10"), ("dat", "s"), ("url", url)],
        )
        .map_err(|e| SourceError::Parse(e.to_string()))?;

        let body = self.client.get(query).send().await?.text().await?;
        parse_reach_rank(&body)
            .ok_or_else(|| SourceError::Parse("no REACH RANK in traffic response".to_string()))
    }
}

pub(crate) fn parse_reach_rank(body: &str) -> Option<u64> {
    REACH_RANK
        .captures(body)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}
