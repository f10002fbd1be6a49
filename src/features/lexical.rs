// Rules computed from the URL text alone.

use std::net::IpAddr;

use crate::{
    context::{authority, host_without_port},
    intel::Shorteners,
};

// -1 when the URL or its host is a literal IPv4/IPv6 address.
pub fn using_ip(url: &str) -> i8 {
    if url.parse::<IpAddr>().is_ok() {
        return -1;
    }
    let host = authority(url)
        .and_then(|a| a.rsplit('@').next())
        .map(host_without_port);
    match host {
        Some(host) if host.parse::<IpAddr>().is_ok() => -1,
        _ => 1,
    }
}

pub fn long_url(url: &str) -> i8 {
    match url.chars().count() {
        0..=53 => 1,
        54..=75 => 0,
        _ => -1,
    }
}

pub fn short_url(url: &str, shorteners: &Shorteners) -> i8 {
    if shorteners.matches(url) {
        -1
    } else {
        1
    }
}

pub fn symbol_at(url: &str) -> i8 {
    if url.contains('@') {
        -1
    } else {
        1
    }
}

// A `//` after the scheme separator means an embedded redirect.
pub fn redirecting(url: &str) -> i8 {
    match url.match_indices("//").last() {
        Some((pos, _)) if pos > 6 => -1,
        _ => 1,
    }
}

// -1 for a hyphen-joined authority such as `secure-paypal.com`.
pub fn prefix_suffix(url: &str) -> i8 {
    let lower = url.to_ascii_lowercase();
    if !(lower.starts_with("http://") || lower.starts_with("https://")) {
        return 1;
    }
    let Some(authority) = authority(url) else {
        return 1;
    };
    match authority.split_once('-') {
        Some((prefix, suffix))
            if !prefix.is_empty() && !suffix.is_empty() && !suffix.contains('-') =>
        {
            -1
        }
        _ => 1,
    }
}

pub fn sub_domains(url: &str) -> i8 {
    match url.matches('.').count() {
        1 => 1,
        2 => 0,
        _ => -1,
    }
}

pub fn https_domain_url(url: &str) -> i8 {
    if url.starts_with("https://") {
        1
    } else {
        -1
    }
}
