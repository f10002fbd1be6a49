use chrono::{NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::{net::IpAddr, sync::Arc};
use tracing::{debug, info};

use crate::{
    config::Config,
    error::{validation_error, AppError},
    sources::{
        AlexaTrafficService, CheckPageRankService, DnsResolver, HtmlSearchIndex, HttpPageFetcher,
        PageFetcher, RankService, RdapWhoisLookup, SearchIndex, SystemDnsResolver, TrafficService,
        WhoisLookup,
    },
    types::{Page, WhoisRecord},
};

static SCHEME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://").unwrap());

// Everything the feature rules look at for one URL. Built once, never mutated.
#[derive(Debug, Clone)]
pub struct Context {
    // URL with a scheme guaranteed.
    pub url: String,
    // Authority of `url` without a leading `www.`; may carry a `:port`.
    pub domain: String,
    // `None` when the page could not be fetched.
    pub page: Option<Page>,
    // `None` when the registry lookup failed.
    pub whois: Option<WhoisRecord>,
    // -1 when unknown.
    pub global_rank: i64,
    pub traffic_rank: Option<u64>,
    pub indexed: bool,
    pub resolved_ip: Option<IpAddr>,
    // Reference date for the registration rules.
    pub today: NaiveDate,
}

impl Context {
    // Collects every signal for `raw_url`, one source after another.
    // Only a URL without a usable authority is an error; every source
    // failure becomes a sentinel instead.
    pub async fn build(raw_url: &str, sources: &Sources) -> Result<Self, AppError> {
        let url = normalize_url(raw_url)?;
        let domain = extract_domain(&url)?;
        info!("Building context for {} (domain {})", url, domain);

        // Fetch page
        let page = match sources.fetcher.fetch(&url).await {
            Ok(page) => Some(page),
            Err(e) => {
                debug!("Fetch of {} failed: {}", url, e);
                None
            }
        };

        // Registration record
        let whois = match sources.whois.lookup(&domain).await {
            Ok(record) => Some(record),
            Err(e) => {
                debug!("WHOIS lookup for {} failed: {}", domain, e);
                None
            }
        };

        // Reputation signals
        let global_rank = sources.rank.global_rank(&domain).await;

        let traffic_rank = match sources.traffic.traffic_rank(&url).await {
            Ok(rank) => Some(rank),
            Err(e) => {
                debug!("Traffic rank for {} unavailable: {}", url, e);
                None
            }
        };

        let indexed = sources.search.is_indexed(&url).await;
        let resolved_ip = sources.dns.resolve(&domain).await;

        Ok(Self {
            url,
            domain,
            page,
            whois,
            global_rank,
            traffic_rank,
            indexed,
            resolved_ip,
            today: Utc::now().date_naive(),
        })
    }

    pub fn body(&self) -> Option<&str> {
        self.page.as_ref().map(|p| p.body.as_str())
    }
}

// The external collaborators a `Context` is built from.
#[derive(Clone)]
pub struct Sources {
    pub fetcher: Arc<dyn PageFetcher>,
    pub whois: Arc<dyn WhoisLookup>,
    pub rank: Arc<dyn RankService>,
    pub traffic: Arc<dyn TrafficService>,
    pub search: Arc<dyn SearchIndex>,
    pub dns: Arc<dyn DnsResolver>,
}

impl Sources {
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        Ok(Self {
            fetcher: Arc::new(HttpPageFetcher::new(config)?),
            whois: Arc::new(RdapWhoisLookup::new(config)?),
            rank: Arc::new(CheckPageRankService::new(config)?),
            traffic: Arc::new(AlexaTrafficService::new(config)?),
            search: Arc::new(HtmlSearchIndex::new(config)?),
            dns: Arc::new(SystemDnsResolver::new()),
        })
    }
}

// Prefixes `http://` when the URL carries no scheme.
pub fn normalize_url(raw: &str) -> Result<String, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(validation_error("empty URL"));
    }
    if SCHEME.is_match(trimmed) {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("http://{}", trimmed))
    }
}

// Text between `://` and the next `/`.
pub fn authority(url: &str) -> Option<&str> {
    let (_, rest) = url.split_once("://")?;
    let end = rest.find('/').unwrap_or(rest.len());
    let authority = &rest[..end];
    (!authority.is_empty()).then_some(authority)
}

pub fn extract_domain(url: &str) -> Result<String, AppError> {
    let authority =
        authority(url).ok_or_else(|| validation_error(&format!("no host in URL: {}", url)))?;
    Ok(authority
        .strip_prefix("www.")
        .unwrap_or(authority)
        .to_string())
}

// Drops a trailing `:port` and IPv6 brackets.
pub fn host_without_port(domain: &str) -> &str {
    if let Some(rest) = domain.strip_prefix('[') {
        return rest.split(']').next().unwrap_or(rest);
    }
    match domain.rsplit_once(':') {
        Some((host, _)) if !host.contains(':') => host,
        _ => domain,
    }
}
