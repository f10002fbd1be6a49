// Rules over registration data and the external rank/index/DNS signals.

use chrono::{Datelike, NaiveDate};
use std::net::IpAddr;

use crate::{intel, types::WhoisRecord};

const RANK_CUTOFF: u64 = 100_000;

// Days between today and the earliest expiration date, when known.
pub fn registration_length(whois: Option<&WhoisRecord>, today: NaiveDate) -> Option<i64> {
    let expiration = whois?.earliest_expiration()?.date_naive();
    Some((expiration - today).num_days().abs())
}

fn short_registration(length_days: i64) -> bool {
    length_days <= 365
}

// -1 when the domain is registered for a year or less, or unknown.
pub fn domain_reg_len(registration_length: Option<i64>) -> i8 {
    match registration_length {
        Some(days) if !short_registration(days) => 1,
        _ => -1,
    }
}

pub fn non_std_port(domain: &str) -> i8 {
    let port = match domain.strip_prefix('[') {
        Some(rest) => rest.split_once("]:").map(|(_, port)| port),
        None => domain.split_once(':').map(|(_, port)| port),
    };
    match port {
        Some(port) if !port.is_empty() => -1,
        _ => 1,
    }
}

fn months_between(later: NaiveDate, earlier: NaiveDate) -> i64 {
    (later.year() as i64 - earlier.year() as i64) * 12 + later.month() as i64
        - earlier.month() as i64
}

// -1 once the domain is at least six months old; unknown age is 1.
pub fn age_of_domain(whois: Option<&WhoisRecord>, today: NaiveDate) -> i8 {
    match whois.and_then(WhoisRecord::earliest_creation) {
        Some(created) if months_between(today, created.date_naive()) >= 6 => -1,
        _ => 1,
    }
}

// Same one-year cut as `domain_reg_len`, gated on the lookup succeeding.
pub fn dns_recording(whois: Option<&WhoisRecord>, registration_length: Option<i64>) -> i8 {
    if whois.is_none() {
        return -1;
    }
    if short_registration(registration_length.unwrap_or(0)) {
        -1
    } else {
        1
    }
}

pub fn website_traffic(traffic_rank: Option<u64>) -> i8 {
    match traffic_rank {
        Some(rank) if rank < RANK_CUTOFF => 1,
        Some(_) => 0,
        None => -1,
    }
}

pub fn page_rank(global_rank: i64) -> i8 {
    if global_rank > 0 && (global_rank as u64) < RANK_CUTOFF {
        -1
    } else {
        1
    }
}

pub fn google_index(indexed: bool) -> i8 {
    if indexed {
        1
    } else {
        -1
    }
}

// Fails open: both blocklists are consulted only once the host resolved.
pub fn stats_report(url: &str, resolved_ip: Option<IpAddr>) -> i8 {
    let Some(ip) = resolved_ip else {
        return 1;
    };
    if intel::is_suspicious_host(url) || intel::is_suspicious_ip(&ip) {
        -1
    } else {
        1
    }
}
