use async_trait::async_trait;
use reqwest::redirect::Policy;
use scraper::{Html, Selector};
use std::collections::HashSet;
use tracing::debug;
use url::Url;

use super::{build_client, SearchIndex};
use crate::{config::Config, error::AppError};

// Asks a web search page for the URL and counts outbound result links.
pub struct HtmlSearchIndex {
    client: reqwest::Client,
    endpoint: String,
    result_cap: usize,
}

impl HtmlSearchIndex {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let client = build_client(&config.user_agent, config.request_timeout(), Policy::default())?;
        Ok(Self {
            client,
            endpoint: config.search_endpoint.clone(),
            result_cap: config.search_result_cap.max(1),
        })
    }

    async fn search(&self, url: &str) -> Result<usize, AppError> {
        let num = self.result_cap.to_string();
        let query = Url::parse_with_params(&self.endpoint, &[("q", url), ("num", num.as_str())])
            .map_err(|e| AppError::Internal(e.to_string()))?;
        let search_host = query.host_str().unwrap_or_default().to_string();

        let body = self.client.get(query).send().await?.text().await?;
        Ok(count_results(&body, &search_host, self.result_cap))
    }
}

#[async_trait]
impl SearchIndex for HtmlSearchIndex {
    async fn is_indexed(&self, url: &str) -> bool {
        match self.search(url).await {
            Ok(hits) => {
                debug!("Search returned {} results for {}", hits, url);
                hits > 0
            }
            Err(e) => {
                debug!("Search for {} failed: {}", url, e);
                false
            }
        }
    }
}

// Result links are either `/url?q=<target>` redirects or absolute links
// leaving the search host.
pub(crate) fn count_results(body: &str, search_host: &str, cap: usize) -> usize {
    let Ok(anchors) = Selector::parse("a[href]") else {
        return 0;
    };
    let document = Html::parse_document(body);
    let mut seen = HashSet::new();

    for anchor in document.select(&anchors) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let target = match href.strip_prefix("/url?q=") {
            Some(rest) => rest.split('&').next().unwrap_or_default(),
            None => href,
        };
        let Ok(parsed) = Url::parse(target) else {
            continue;
        };
        if !matches!(parsed.scheme(), "http" | "https") {
            continue;
        }
        if parsed.host_str().map_or(true, |h| h == search_host) {
            continue;
        }
        seen.insert(parsed.to_string());
        if seen.len() >= cap {
            break;
        }
    }

    seen.len()
}
