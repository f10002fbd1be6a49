use async_trait::async_trait;
use reqwest::{header::LOCATION, redirect::Policy};
use tracing::debug;
use url::Url;

use super::{build_client, PageFetcher};
use crate::{
    config::Config,
    error::{AppError, SourceError},
    types::Page,
};

const MAX_REDIRECTS: usize = 30;

// GETs a page and follows redirects by hand so the hop count survives.
pub struct HttpPageFetcher {
    client: reqwest::Client,
    max_redirects: usize,
}

impl HttpPageFetcher {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let client = build_client(&config.user_agent, config.request_timeout(), Policy::none())?;
        Ok(Self {
            client,
            max_redirects: MAX_REDIRECTS,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str) -> Result<Page, SourceError> {
        let mut current = Url::parse(url).map_err(|e| SourceError::Parse(e.to_string()))?;
        let mut history_len = 0;

        loop {
            let response = self.client.get(current.clone()).send().await?;
            let status = response.status();

            if status.is_redirection() {
                let location = response
                    .headers()
                    .get(LOCATION)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_owned);
                if let Some(location) = location {
                    if history_len >= self.max_redirects {
                        return Err(SourceError::TooManyRedirects(self.max_redirects));
                    }
                    current = current
                        .join(&location)
                        .map_err(|e| SourceError::Parse(e.to_string()))?;
                    history_len += 1;
                    debug!("Redirect {} -> {}", history_len, current);
                    continue;
                }
            }

            let body = response.text().await?;
            return Ok(Page {
                final_url: current.to_string(),
                status: status.as_u16(),
                body,
                history_len,
            });
        }
    }
}
