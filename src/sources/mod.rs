// External data sources consulted while building a `crate::context::Context`.
//
// Every source sits behind a narrow async trait so the pipeline can run
// against fixtures. None of them is retried.

use async_trait::async_trait;
use std::net::IpAddr;

use crate::{
    error::SourceError,
    types::{Page, WhoisRecord},
};

mod dns;
mod page;
mod rank;
mod search;
mod whois;

pub use dns::SystemDnsResolver;
pub use page::HttpPageFetcher;
pub use rank::{AlexaTrafficService, CheckPageRankService};
pub use search::HtmlSearchIndex;
pub use whois::RdapWhoisLookup;

#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Page, SourceError>;
}

#[async_trait]
pub trait WhoisLookup: Send + Sync {
    async fn lookup(&self, domain: &str) -> Result<WhoisRecord, SourceError>;
}

#[async_trait]
pub trait RankService: Send + Sync {
    // Global rank of `domain`, or -1 when unknown.
    async fn global_rank(&self, domain: &str) -> i64;
}

#[async_trait]
pub trait TrafficService: Send + Sync {
    async fn traffic_rank(&self, url: &str) -> Result<u64, SourceError>;
}

#[async_trait]
pub trait SearchIndex: Send + Sync {
    async fn is_indexed(&self, url: &str) -> bool;
}

#[async_trait]
pub trait DnsResolver: Send + Sync {
    async fn resolve(&self, domain: &str) -> Option<IpAddr>;
}

pub(crate) fn build_client(
    user_agent: &str,
    timeout: Option<std::time::Duration>,
    redirects: reqwest::redirect::Policy,
) -> Result<reqwest::Client, reqwest::Error> {
    let mut builder = reqwest::Client::builder()
        .user_agent(user_agent)
        .redirect(redirects);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build()
}
