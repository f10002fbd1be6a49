// The 30-slot feature vector. Every rule is a pure function of the
// `Context`; rule order never matters, slot order always does.

pub mod document;
pub mod domain;
pub mod lexical;

use scraper::Html;
use tracing::debug;

use crate::{
    context::Context,
    intel::Shorteners,
    types::{Feature, FeatureVector},
};

pub fn extract_features(ctx: &Context, shorteners: &Shorteners) -> FeatureVector {
    let url = ctx.url.as_str();
    let domain = ctx.domain.as_str();
    let page = ctx.page.as_ref();
    let body = ctx.body();
    let whois = ctx.whois.as_ref();
    let parsed = body.map(Html::parse_document);
    let html = parsed.as_ref();
    let registration_length = domain::registration_length(whois, ctx.today);

    let values = [
        (Feature::UsingIp, lexical::using_ip(url)),
        (Feature::LongUrl, lexical::long_url(url)),
        (Feature::ShortUrl, lexical::short_url(url, shorteners)),
        (Feature::SymbolAt, lexical::symbol_at(url)),
        (Feature::Redirecting, lexical::redirecting(url)),
        (Feature::PrefixSuffix, lexical::prefix_suffix(url)),
        (Feature::SubDomains, lexical::sub_domains(url)),
        (Feature::Https, document::https(page)),
        (Feature::DomainRegLen, domain::domain_reg_len(registration_length)),
        (Feature::Favicon, document::favicon(html, url, domain)),
        (Feature::NonStdPort, domain::non_std_port(domain)),
        (Feature::HttpsDomainUrl, lexical::https_domain_url(url)),
        (Feature::RequestUrl, document::request_url(html, url, domain)),
        (Feature::AnchorUrl, document::anchor_url(html, url, domain)),
        (Feature::LinksInScriptTags, document::links_in_script_tags(html, url, domain)),
        (Feature::ServerFormHandler, document::server_form_handler(html, url, domain)),
        (Feature::InfoEmail, document::info_email(body)),
        (Feature::AbnormalUrl, document::abnormal_url(body, whois)),
        (Feature::WebsiteForwarding, document::website_forwarding(page)),
        (Feature::StatusBarCust, document::status_bar_cust(body)),
        (Feature::DisableRightClick, document::disable_right_click(body)),
        (Feature::UsingPopupWindow, document::using_popup_window(body)),
        (Feature::IframeRedirection, document::iframe_redirection(body)),
        (Feature::AgeOfDomain, domain::age_of_domain(whois, ctx.today)),
        (Feature::DnsRecording, domain::dns_recording(whois, registration_length)),
        (Feature::WebsiteTraffic, domain::website_traffic(ctx.traffic_rank)),
        (Feature::PageRank, domain::page_rank(ctx.global_rank)),
        (Feature::GoogleIndex, domain::google_index(ctx.indexed)),
        (Feature::LinksPointingToPage, document::links_pointing_to_page(body)),
        (Feature::StatsReport, domain::stats_report(url, ctx.resolved_ip)),
    ];

    let mut vector = FeatureVector::default();
    for (feature, value) in values {
        debug!("{} = {}", feature, value);
        vector.set(feature, value);
    }
    vector
}
