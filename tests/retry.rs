use std::time::Duration;

use kegg_harvest::{
    error::FetchError,
    http::{or_empty, rate_limit::RateLimiter, retry::RetryPolicy, Fetcher},
    kegg::tabular::{parse_links, LinkPair},
};
use tokio::time::Instant;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

fn fetcher(attempts: u32) -> Fetcher {
    Fetcher::new(Duration::from_secs(5), RetryPolicy::immediate(attempts), None)
        .expect("http client builds")
}

#[tokio::test]
async fn transient_failures_are_retried_until_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/list/disease"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/list/disease"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ds:H00001\tLeukemia\n"))
        .expect(1)
        .mount(&server)
        .await;

    let body = fetcher(5)
        .get_text(&format!("{}/list/disease", server.uri()))
        .await
        .expect("third attempt succeeds");
    assert_eq!(body, "ds:H00001\tLeukemia\n");
}

#[tokio::test]
async fn exhaustion_after_exactly_max_attempts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get/H00001"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let err = fetcher(3)
        .get_text(&format!("{}/get/H00001", server.uri()))
        .await
        .unwrap_err();
    match err {
        FetchError::Exhausted { attempts, .. } => assert_eq!(attempts, 3),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn not_found_is_terminal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get/H99999"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let result = fetcher(5)
        .get_text(&format!("{}/get/H99999", server.uri()))
        .await;
    assert!(result.as_ref().is_err_and(FetchError::is_not_found));
    assert_eq!(or_empty(result, "H99999"), String::new());
}

#[tokio::test]
async fn empty_success_body_is_not_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/link/pathway/H00002"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let body = fetcher(5)
        .get_text(&format!("{}/link/pathway/H00002", server.uri()))
        .await
        .expect("empty body is success");
    assert!(body.is_empty());
}

#[tokio::test]
async fn every_retry_waits_for_a_rate_limit_slot() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/link/pathway/hsa:3643"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let window = Duration::from_millis(400);
    let limited = Fetcher::new(
        Duration::from_secs(5),
        RetryPolicy::immediate(3),
        Some(RateLimiter::new(2, window)),
    )
    .expect("http client builds");

    let start = Instant::now();
    let err = limited
        .get_text(&format!("{}/link/pathway/hsa:3643", server.uri()))
        .await
        .unwrap_err();
    let elapsed = start.elapsed();

    assert!(matches!(err, FetchError::Exhausted { attempts: 3, .. }));
    assert!(elapsed >= window, "third attempt ran after {elapsed:?}");
    assert!(elapsed < Duration::from_secs(4));
}

#[tokio::test]
async fn transport_errors_are_retried_then_downgraded() {
    let url = "http://127.0.0.1:1/get/H00001";

    let err = fetcher(3).get_text(url).await.unwrap_err();
    match err {
        FetchError::Exhausted { attempts, .. } => assert_eq!(attempts, 3),
        other => panic!("unexpected error: {other}"),
    }

    let body: String = or_empty(fetcher(2).get_text(url).await, "H00001");
    assert!(body.is_empty());
    let links: Vec<LinkPair> = or_empty(
        fetcher(2).get_text(url).await.map(|body| parse_links(&body)),
        "H00001",
    );
    assert!(links.is_empty());
}
