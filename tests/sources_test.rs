use fisher_engine::{
    error::SourceError,
    sources::{
        AlexaTrafficService, CheckPageRankService, HtmlSearchIndex, HttpPageFetcher, PageFetcher,
        RankService, RdapWhoisLookup, SearchIndex, TrafficService, WhoisLookup,
    },
    Config,
};
use wiremock::{
    matchers::{body_string_contains, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

fn config_for(server: &MockServer) -> Config {
    Config {
        rank_endpoint: format!("{}/index.php", server.uri()),
        traffic_endpoint: format!("{}/data", server.uri()),
        search_endpoint: format!("{}/search", server.uri()),
        rdap_endpoint: server.uri(),
        request_timeout_secs: Some(5),
        ..Config::default()
    }
}

#[tokio::test]
async fn test_fetch_counts_redirect_hops() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/start"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/hop"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/hop"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "/landing"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/landing"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>landed</html>"))
        .mount(&mock_server)
        .await;

    let fetcher = HttpPageFetcher::new(&config_for(&mock_server)).unwrap();
    let page = fetcher
        .fetch(&format!("{}/start", mock_server.uri()))
        .await
        .unwrap();

    assert_eq!(page.history_len, 2);
    assert_eq!(page.status, 200);
    assert_eq!(page.body, "<html>landed</html>");
    assert!(page.final_url.ends_with("/landing"));
}

#[tokio::test]
async fn test_fetch_without_redirect_has_empty_history() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&mock_server)
        .await;

    let fetcher = HttpPageFetcher::new(&config_for(&mock_server)).unwrap();
    let page = fetcher.fetch(&format!("{}/", mock_server.uri())).await.unwrap();
    assert_eq!(page.history_len, 0);
}

#[tokio::test]
async fn test_fetch_follows_long_redirect_chains() {
    let mock_server = MockServer::start().await;

    for hop in 0..12 {
        Mock::given(method("GET"))
            .and(path(format!("/r{}", hop)))
            .respond_with(
                ResponseTemplate::new(302).insert_header("Location", format!("/r{}", hop + 1)),
            )
            .mount(&mock_server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/r12"))
        .respond_with(ResponseTemplate::new(200).set_body_string("end"))
        .mount(&mock_server)
        .await;

    let fetcher = HttpPageFetcher::new(&config_for(&mock_server)).unwrap();
    let page = fetcher.fetch(&format!("{}/r0", mock_server.uri())).await.unwrap();
    assert_eq!(page.history_len, 12);
    assert_eq!(page.body, "end");
}

#[tokio::test]
async fn test_fetch_gives_up_on_redirect_loop() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/loop"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/loop"))
        .mount(&mock_server)
        .await;

    let fetcher = HttpPageFetcher::new(&config_for(&mock_server)).unwrap();
    let result = fetcher.fetch(&format!("{}/loop", mock_server.uri())).await;
    assert!(matches!(result, Err(SourceError::TooManyRedirects(_))));
}

#[tokio::test]
async fn test_rdap_lookup_parses_events() {
    let mock_server = MockServer::start().await;

    let rdap = r#"{
        "objectClassName": "domain",
        "ldhName": "EXAMPLE.COM",
        "events": [
            {"eventAction": "registration", "eventDate": "1995-08-14T04:00:00Z"},
            {"eventAction": "expiration", "eventDate": "2030-08-13T04:00:00Z"},
            {"eventAction": "last changed", "eventDate": "2024-08-14T07:01:34Z"}
        ],
        "entities": [{
            "roles": ["registrar"],
            "vcardArray": ["vcard", [["version", {}, "text", "4.0"], ["fn", {}, "text", "RESERVED-Internet Assigned Numbers Authority"]]]
        }]
    }"#;

    Mock::given(method("GET"))
        .and(path("/domain/example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_string(rdap))
        .mount(&mock_server)
        .await;

    let whois = RdapWhoisLookup::new(&config_for(&mock_server)).unwrap();
    let record = whois.lookup("example.com").await.unwrap();

    assert_eq!(record.creation_dates.len(), 1);
    assert_eq!(record.expiration_dates.len(), 1);
    assert_eq!(
        record.registrar.as_deref(),
        Some("RESERVED-Internet Assigned Numbers Authority")
    );
    assert_eq!(record.raw, rdap);
}

#[tokio::test]
async fn test_rdap_not_found_is_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/domain/unregistered.example"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let whois = RdapWhoisLookup::new(&config_for(&mock_server)).unwrap();
    let result = whois.lookup("unregistered.example").await;
    assert!(matches!(result, Err(SourceError::Status(404))));
}

#[tokio::test]
async fn test_global_rank_scraped_from_form_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/index.php"))
        .and(body_string_contains("name=google.com"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<div><b>Global Rank: 1</b></div>"),
        )
        .mount(&mock_server)
        .await;

    let rank = CheckPageRankService::new(&config_for(&mock_server)).unwrap();
    assert_eq!(rank.global_rank("google.com").await, 1);
}

#[tokio::test]
async fn test_global_rank_missing_is_minus_one() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/index.php"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<div>No data</div>"))
        .mount(&mock_server)
        .await;

    let rank = CheckPageRankService::new(&config_for(&mock_server)).unwrap();
    assert_eq!(rank.global_rank("nobody.example").await, -1);
}

#[tokio::test]
async fn test_traffic_rank_from_reach_element() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data"))
        .and(query_param("cli", "10"))
        .and(query_param("url", "https://google.com/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<ALEXA><SD><POPULARITY URL="google.com/" TEXT="1"/><REACH RANK="1"/></SD></ALEXA>"#,
        ))
        .mount(&mock_server)
        .await;

    let traffic = AlexaTrafficService::new(&config_for(&mock_server)).unwrap();
    assert_eq!(traffic.traffic_rank("https://google.com/").await.unwrap(), 1);
}

#[tokio::test]
async fn test_traffic_rank_missing_reach_is_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<ALEXA></ALEXA>"))
        .mount(&mock_server)
        .await;

    let traffic = AlexaTrafficService::new(&config_for(&mock_server)).unwrap();
    assert!(traffic.traffic_rank("https://new.example/").await.is_err());
}

#[tokio::test]
async fn test_search_index_counts_external_results() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "https://google.com/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body>
                <a href="/preferences">Settings</a>
                <a href="/url?q=https://google.com/&amp;sa=U">Google</a>
                <a href="https://about.google/">About</a>
            </body></html>"#,
        ))
        .mount(&mock_server)
        .await;

    let search = HtmlSearchIndex::new(&config_for(&mock_server)).unwrap();
    assert!(search.is_indexed("https://google.com/").await);
}

#[tokio::test]
async fn test_search_index_without_results() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body><a href="/preferences">Settings</a></body></html>"#,
        ))
        .mount(&mock_server)
        .await;

    let search = HtmlSearchIndex::new(&config_for(&mock_server)).unwrap();
    assert!(!search.is_indexed("http://fresh-phish.example/").await);
}
