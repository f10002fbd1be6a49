#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use std::{
    net::IpAddr,
    sync::{Arc, Mutex},
};

use fisher_engine::{
    error::SourceError,
    model::{GradientBoostingModel, RegressionTree},
    sources::{DnsResolver, PageFetcher, RankService, SearchIndex, TrafficService, WhoisLookup},
    types::{Page, WhoisRecord},
    Feature, Sources, FEATURE_COUNT,
};

pub const GOOGLE_HTML: &str = r#"<!doctype html>
<html><head>
<link rel="icon" href="/favicon.ico">
<link rel="stylesheet" href="https://www.gstatic.com/og/_/ss/k=og.qtm.a.b.c.css">
<script src="https://www.gstatic.com/og/_/js/k=og.qtm.en_US.a.b.js"></script>
</head><body>
<a href="https://google.com/imghp">Images</a>
<a href="https://mail.google.com/mail">Gmail</a>
<form action="https://google.com/search"><input name="q"></form>
<img src="/images/branding/logo.png">
</body></html>"#;

pub struct FixturePage {
    page: Option<Page>,
    pub requests: Mutex<Vec<String>>,
}

impl FixturePage {
    pub fn ok(body: &str) -> Self {
        Self::with_history(body, 0)
    }

    pub fn with_history(body: &str, history_len: usize) -> Self {
        Self {
            page: Some(Page {
                final_url: String::new(),
                status: 200,
                body: body.to_string(),
                history_len,
            }),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            page: None,
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl PageFetcher for FixturePage {
    async fn fetch(&self, url: &str) -> Result<Page, SourceError> {
        self.requests.lock().unwrap().push(url.to_string());
        match &self.page {
            Some(page) => Ok(Page {
                final_url: url.to_string(),
                ..page.clone()
            }),
            None => Err(SourceError::Lookup("simulated network error".to_string())),
        }
    }
}

pub struct FixtureWhois {
    record: Option<WhoisRecord>,
    pub queried: Mutex<Vec<String>>,
}

impl FixtureWhois {
    pub fn new(record: Option<WhoisRecord>) -> Self {
        Self {
            record,
            queried: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl WhoisLookup for FixtureWhois {
    async fn lookup(&self, domain: &str) -> Result<WhoisRecord, SourceError> {
        self.queried.lock().unwrap().push(domain.to_string());
        self.record
            .clone()
            .ok_or_else(|| SourceError::Lookup("no match".to_string()))
    }
}

pub struct FixtureRank(pub i64);

#[async_trait]
impl RankService for FixtureRank {
    async fn global_rank(&self, _domain: &str) -> i64 {
        self.0
    }
}

pub struct FixtureTraffic(pub Option<u64>);

#[async_trait]
impl TrafficService for FixtureTraffic {
    async fn traffic_rank(&self, _url: &str) -> Result<u64, SourceError> {
        self.0
            .ok_or_else(|| SourceError::Parse("no REACH element".to_string()))
    }
}

pub struct FixtureSearch(pub bool);

#[async_trait]
impl SearchIndex for FixtureSearch {
    async fn is_indexed(&self, _url: &str) -> bool {
        self.0
    }
}

pub struct FixtureDns(pub Option<IpAddr>);

#[async_trait]
impl DnsResolver for FixtureDns {
    async fn resolve(&self, _domain: &str) -> Option<IpAddr> {
        self.0
    }
}

/// Registered in 1997, expiring three years from now.
pub fn long_lived_whois() -> WhoisRecord {
    WhoisRecord {
        registrar: Some("MarkMonitor Inc.".to_string()),
        creation_dates: vec![Utc.with_ymd_and_hms(1997, 9, 15, 4, 0, 0).unwrap()],
        expiration_dates: vec![Utc::now() + Duration::days(3 * 365)],
        raw: r#"{"objectClassName":"domain","ldhName":"GOOGLE.COM"}"#.to_string(),
    }
}

pub fn sources(
    page: Arc<FixturePage>,
    whois: Arc<FixtureWhois>,
    rank: i64,
    traffic: Option<u64>,
    indexed: bool,
    ip: Option<IpAddr>,
) -> Sources {
    Sources {
        fetcher: page,
        whois,
        rank: Arc::new(FixtureRank(rank)),
        traffic: Arc::new(FixtureTraffic(traffic)),
        search: Arc::new(FixtureSearch(indexed)),
        dns: Arc::new(FixtureDns(ip)),
    }
}

/// Everything fails: no page, no WHOIS, no rank, no index, no DNS.
pub fn offline_sources() -> Sources {
    sources(
        Arc::new(FixturePage::failing()),
        Arc::new(FixtureWhois::new(None)),
        -1,
        None,
        false,
        None,
    )
}

pub fn google_sources() -> Sources {
    sources(
        Arc::new(FixturePage::ok(GOOGLE_HTML)),
        Arc::new(FixtureWhois::new(Some(long_lived_whois()))),
        1,
        Some(1),
        true,
        Some("142.250.80.46".parse().unwrap()),
    )
}

/// Single stump: HTTPSDomainURL = 1 is benign, anything else phishing.
pub fn https_stump_model() -> GradientBoostingModel {
    GradientBoostingModel {
        version: Some("fixture".to_string()),
        n_features: FEATURE_COUNT,
        learning_rate: 0.5,
        init_raw: 0.0,
        classes: [-1, 1],
        trees: vec![RegressionTree {
            children_left: vec![1, -1, -1],
            children_right: vec![2, -1, -1],
            feature: vec![Feature::HttpsDomainUrl.index() as i64, -2, -2],
            threshold: vec![0.0, -2.0, -2.0],
            value: vec![0.0, -4.0, 4.0],
        }],
    }
}
