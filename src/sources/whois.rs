use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use reqwest::redirect::Policy;
use serde::Deserialize;
use tracing::debug;

use super::{build_client, WhoisLookup};
use crate::{
    config::Config,
    error::{AppError, SourceError},
    types::WhoisRecord,
};

// Registration data over RDAP, the JSON successor of port-43 WHOIS.
pub struct RdapWhoisLookup {
    client: reqwest::Client,
    endpoint: String,
}

impl RdapWhoisLookup {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let client = build_client(
            &config.user_agent,
            config.request_timeout(),
            Policy::limited(5),
        )?;
        Ok(Self {
            client,
            endpoint: config.rdap_endpoint.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl WhoisLookup for RdapWhoisLookup {
    async fn lookup(&self, domain: &str) -> Result<WhoisRecord, SourceError> {
        let url = format!("{}/domain/{}", self.endpoint, domain);
        let response = self
            .client
            .get(&url)
            .header("Accept", "application/rdap+json, application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SourceError::Status(response.status().as_u16()));
        }

        let raw = response.text().await?;
        let record = parse_rdap(&raw)?;
        debug!(
            "RDAP for {}: {} creation, {} expiration dates",
            domain,
            record.creation_dates.len(),
            record.expiration_dates.len()
        );
        Ok(record)
    }
}

#[derive(Debug, Deserialize)]
struct RdapDomain {
    #[serde(default)]
    events: Vec<RdapEvent>,
    #[serde(default)]
    entities: Vec<RdapEntity>,
}

#[derive(Debug, Deserialize)]
struct RdapEvent {
    #[serde(rename = "eventAction")]
    action: String,
    #[serde(rename = "eventDate")]
    date: String,
}

#[derive(Debug, Deserialize)]
struct RdapEntity {
    #[serde(default)]
    roles: Vec<String>,
    #[serde(rename = "vcardArray")]
    vcard_array: Option<serde_json::Value>,
}

pub(crate) fn parse_rdap(raw: &str) -> Result<WhoisRecord, SourceError> {
    let domain: RdapDomain =
        serde_json::from_str(raw).map_err(|e| SourceError::Parse(e.to_string()))?;

    let mut record = WhoisRecord {
        raw: raw.to_string(),
        ..Default::default()
    };

    for event in &domain.events {
        let Some(date) = parse_date(&event.date) else {
            continue;
        };
        match event.action.as_str() {
            "registration" => record.creation_dates.push(date),
            "expiration" => record.expiration_dates.push(date),
            _ => {}
        }
    }

    record.registrar = domain
        .entities
        .iter()
        .find(|e| e.roles.iter().any(|r| r == "registrar"))
        .and_then(|e| e.vcard_array.as_ref())
        .and_then(vcard_full_name);

    Ok(record)
}

fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(value) {
        return Some(date.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Some(date.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|d| d.and_utc())
}

// ["vcard", [["version", {}, "text", "4.0"], ["fn", {}, "text", "Name"]]]
fn vcard_full_name(vcard: &serde_json::Value) -> Option<String> {
    vcard
        .get(1)?
        .as_array()?
        .iter()
        .find(|prop| prop.get(0).and_then(|v| v.as_str()) == Some("fn"))
        .and_then(|prop| prop.get(3))
        .and_then(|v| v.as_str())
        .map(String::from)
}
