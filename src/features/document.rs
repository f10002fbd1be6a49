// Rules that read the fetched response. Each takes `None` for a failed
// fetch and returns its fallback value in that case.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};

use crate::types::{Page, WhoisRecord};

static MAIL_CALL: Lazy<Regex> = Lazy::new(|| Regex::new(r"mail\(|mailto:").unwrap());
static STATUS_BAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<script>.+onmouseover.+</script>").unwrap());
static RIGHT_CLICK: Lazy<Regex> = Lazy::new(|| Regex::new(r"event.button ?== ?2").unwrap());
static POPUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"alert\(").unwrap());
static IFRAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<iframe|frameborder").unwrap());

// A reference counts as same-origin when it mentions the page URL or
// domain, or is a bare `name.ext` with a single dot.
pub(crate) fn is_same_origin(reference: &str, url: &str, domain: &str) -> bool {
    reference.contains(url) || reference.contains(domain) || reference.matches('.').count() == 1
}

fn attr_values<'a>(document: &'a Html, css: &str, attr: &str) -> Vec<&'a str> {
    match Selector::parse(css) {
        Ok(selector) => document
            .select(&selector)
            .filter_map(|el| el.value().attr(attr))
            .collect(),
        Err(_) => Vec::new(),
    }
}

// `hits / total` as a percentage, bucketed at `low` and `high`. An empty
// population is treated as clean.
fn percentage_bucket(hits: usize, total: usize, low: f64, high: f64) -> i8 {
    if total == 0 {
        return 1;
    }
    let percentage = hits as f64 / total as f64 * 100.0;
    if percentage < low {
        1
    } else if percentage < high {
        0
    } else {
        -1
    }
}

pub fn https(page: Option<&Page>) -> i8 {
    match page {
        Some(page) if !page.body.is_empty() => 1,
        _ => -1,
    }
}

// Decided by the first `<link href>` in `<head>`; no such link is clean.
pub fn favicon(document: Option<&Html>, url: &str, domain: &str) -> i8 {
    let Some(document) = document else {
        return -1;
    };
    match attr_values(document, "head link[href]", "href").first() {
        Some(href) if is_same_origin(href, url, domain) => 1,
        Some(_) => -1,
        None => 1,
    }
}

pub fn request_url(document: Option<&Html>, url: &str, domain: &str) -> i8 {
    let Some(document) = document else {
        return -1;
    };
    let sources: Vec<&str> = ["img[src]", "audio[src]", "embed[src]", "iframe[src]"]
        .iter()
        .flat_map(|css| attr_values(document, css, "src"))
        .collect();
    let same_origin = sources
        .iter()
        .filter(|src| is_same_origin(src, url, domain))
        .count();
    percentage_bucket(same_origin, sources.len(), 22.0, 61.0)
}

pub fn anchor_url(document: Option<&Html>, url: &str, domain: &str) -> i8 {
    let Some(document) = document else {
        return -1;
    };
    let hrefs = attr_values(document, "a[href]", "href");
    let unsafe_count = hrefs
        .iter()
        .filter(|href| {
            let lower = href.to_lowercase();
            href.contains('#')
                || lower.contains("javascript")
                || lower.contains("mailto")
                || !(href.contains(url) || href.contains(domain))
        })
        .count();
    percentage_bucket(unsafe_count, hrefs.len(), 31.0, 67.0)
}

pub fn links_in_script_tags(document: Option<&Html>, url: &str, domain: &str) -> i8 {
    let Some(document) = document else {
        return -1;
    };
    let mut references = attr_values(document, "link[href]", "href");
    references.extend(attr_values(document, "script[src]", "src"));
    let same_origin = references
        .iter()
        .filter(|r| is_same_origin(r, url, domain))
        .count();
    percentage_bucket(same_origin, references.len(), 17.0, 81.0)
}

// Only the first `<form action>` is inspected. A failed fetch yields 0.
pub fn server_form_handler(document: Option<&Html>, url: &str, domain: &str) -> i8 {
    let Some(document) = document else {
        return 0;
    };
    match attr_values(document, "form[action]", "action").first() {
        None => 1,
        Some(action) if action.is_empty() || *action == "about:blank" => -1,
        Some(action) if !action.contains(url) && !action.contains(domain) => 0,
        Some(_) => 1,
    }
}

fn pattern_flag(body: Option<&str>, pattern: &Regex) -> i8 {
    match body {
        Some(body) if pattern.is_match(body) => 1,
        _ => -1,
    }
}

pub fn info_email(body: Option<&str>) -> i8 {
    match body {
        Some(body) if !MAIL_CALL.is_match(body) => 1,
        _ => -1,
    }
}

pub fn abnormal_url(body: Option<&str>, whois: Option<&WhoisRecord>) -> i8 {
    match (body, whois) {
        (Some(body), Some(record)) if body == record.raw => 1,
        _ => -1,
    }
}

pub fn website_forwarding(page: Option<&Page>) -> i8 {
    match page.map(|p| p.history_len) {
        None | Some(0..=1) => -1,
        Some(2..=4) => 0,
        Some(_) => 1,
    }
}

pub fn status_bar_cust(body: Option<&str>) -> i8 {
    pattern_flag(body, &STATUS_BAR)
}

pub fn disable_right_click(body: Option<&str>) -> i8 {
    pattern_flag(body, &RIGHT_CLICK)
}

pub fn using_popup_window(body: Option<&str>) -> i8 {
    pattern_flag(body, &POPUP)
}

pub fn iframe_redirection(body: Option<&str>) -> i8 {
    pattern_flag(body, &IFRAME)
}

pub fn links_pointing_to_page(body: Option<&str>) -> i8 {
    match body.map(|b| b.matches("<a href=").count()) {
        Some(0) => 1,
        Some(1..=2) => 0,
        _ => -1,
    }
}
