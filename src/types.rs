use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const FEATURE_COUNT: usize = 30;

/// Position of each indicator in the feature vector. The discriminant is the
/// zero-based slot; the classifier was trained on exactly this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    UsingIp = 0,
    LongUrl,
    ShortUrl,
    SymbolAt,
    Redirecting,
    PrefixSuffix,
    SubDomains,
    Https,
    DomainRegLen,
    Favicon,
    NonStdPort,
    HttpsDomainUrl,
    RequestUrl,
    AnchorUrl,
    LinksInScriptTags,
    ServerFormHandler,
    InfoEmail,
    AbnormalUrl,
    WebsiteForwarding,
    StatusBarCust,
    DisableRightClick,
    UsingPopupWindow,
    IframeRedirection,
    AgeOfDomain,
    DnsRecording,
    WebsiteTraffic,
    PageRank,
    GoogleIndex,
    LinksPointingToPage,
    StatsReport,
}

impl Feature {
    pub const ALL: [Feature; FEATURE_COUNT] = [
        Feature::UsingIp,
        Feature::LongUrl,
        Feature::ShortUrl,
        Feature::SymbolAt,
        Feature::Redirecting,
        Feature::PrefixSuffix,
        Feature::SubDomains,
        Feature::Https,
        Feature::DomainRegLen,
        Feature::Favicon,
        Feature::NonStdPort,
        Feature::HttpsDomainUrl,
        Feature::RequestUrl,
        Feature::AnchorUrl,
        Feature::LinksInScriptTags,
        Feature::ServerFormHandler,
        Feature::InfoEmail,
        Feature::AbnormalUrl,
        Feature::WebsiteForwarding,
        Feature::StatusBarCust,
        Feature::DisableRightClick,
        Feature::UsingPopupWindow,
        Feature::IframeRedirection,
        Feature::AgeOfDomain,
        Feature::DnsRecording,
        Feature::WebsiteTraffic,
        Feature::PageRank,
        Feature::GoogleIndex,
        Feature::LinksPointingToPage,
        Feature::StatsReport,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Column name used by the training dataset.
    pub fn name(self) -> &'static str {
        match self {
            Feature::UsingIp => "UsingIP",
            Feature::LongUrl => "LongURL",
            Feature::ShortUrl => "ShortURL",
            Feature::SymbolAt => "Symbol@",
            Feature::Redirecting => "Redirecting//",
            Feature::PrefixSuffix => "PrefixSuffix-",
            Feature::SubDomains => "SubDomains",
            Feature::Https => "HTTPS",
            Feature::DomainRegLen => "DomainRegLen",
            Feature::Favicon => "Favicon",
            Feature::NonStdPort => "NonStdPort",
            Feature::HttpsDomainUrl => "HTTPSDomainURL",
            Feature::RequestUrl => "RequestURL",
            Feature::AnchorUrl => "AnchorURL",
            Feature::LinksInScriptTags => "LinksInScriptTags",
            Feature::ServerFormHandler => "ServerFormHandler",
            Feature::InfoEmail => "InfoEmail",
            Feature::AbnormalUrl => "AbnormalURL",
            Feature::WebsiteForwarding => "WebsiteForwarding",
            Feature::StatusBarCust => "StatusBarCust",
            Feature::DisableRightClick => "DisableRightClick",
            Feature::UsingPopupWindow => "UsingPopupWindow",
            Feature::IframeRedirection => "IframeRedirection",
            Feature::AgeOfDomain => "AgeofDomain",
            Feature::DnsRecording => "DNSRecording",
            Feature::WebsiteTraffic => "WebsiteTraffic",
            Feature::PageRank => "PageRank",
            Feature::GoogleIndex => "GoogleIndex",
            Feature::LinksPointingToPage => "LinksPointingToPage",
            Feature::StatsReport => "StatsReport",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fixed-length encoding of a URL's risk indicators. Crosses the classifier
/// boundary as a flat array; slot meaning comes from [`Feature`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureVector([i8; FEATURE_COUNT]);

impl FeatureVector {
    pub fn get(&self, feature: Feature) -> i8 {
        self.0[feature.index()]
    }

    pub fn set(&mut self, feature: Feature, value: i8) {
        self.0[feature.index()] = value;
    }

    pub fn as_slice(&self) -> &[i8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_f64(&self) -> [f64; FEATURE_COUNT] {
        self.0.map(f64::from)
    }
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self([0; FEATURE_COUNT])
    }
}

impl From<[i8; FEATURE_COUNT]> for FeatureVector {
    fn from(values: [i8; FEATURE_COUNT]) -> Self {
        Self(values)
    }
}

/// A fetched page after redirects were followed.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub final_url: String,
    pub status: u16,
    pub body: String,
    /// Number of redirect hops taken before `final_url`.
    pub history_len: usize,
}

/// Registration metadata for a domain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WhoisRecord {
    pub registrar: Option<String>,
    pub creation_dates: Vec<DateTime<Utc>>,
    pub expiration_dates: Vec<DateTime<Utc>>,
    /// Registry response exactly as received.
    pub raw: String,
}

impl WhoisRecord {
    pub fn earliest_creation(&self) -> Option<DateTime<Utc>> {
        self.creation_dates.iter().min().copied()
    }

    pub fn earliest_expiration(&self) -> Option<DateTime<Utc>> {
        self.expiration_dates.iter().min().copied()
    }
}

impl fmt::Display for WhoisRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Classifier outcome for one URL.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub url: String,
    pub safe: bool,
    /// Probability that the URL is benign, in `[0, 1]`.
    pub probability: f64,
    pub features: FeatureVector,
}

impl Verdict {
    pub fn safe_label(&self) -> &'static str {
        if self.safe {
            "Safe"
        } else {
            "Not Safe"
        }
    }

    pub fn score_label(&self) -> String {
        format!("{:.2}%", self.probability * 100.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FisherResponse {
    pub url: String,
    pub safe: String,
    pub score: String,
}

impl From<Verdict> for FisherResponse {
    fn from(verdict: Verdict) -> Self {
        Self {
            safe: verdict.safe_label().to_string(),
            score: verdict.score_label(),
            url: verdict.url,
        }
    }
}
