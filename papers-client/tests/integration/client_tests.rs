//! Integration tests for the E-utilities client request behavior
//! (parameters, batching) against a mocked server.

use papers_client::{ClientConfig, PubMedClient};
use tracing_test::traced_test;
use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

const EMPTY_ARTICLE_SET: &str = r#"<?xml version="1.0" ?>
<PubmedArticleSet>
</PubmedArticleSet>"#;

fn create_client(server: &MockServer) -> PubMedClient {
    let config = ClientConfig::new()
        .with_base_url(server.uri())
        .with_rate_limit(100.0);
    PubMedClient::with_config(config)
}

#[tokio::test]
#[traced_test]
async fn test_search_sends_retmax_and_api_params() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(r"/esearch\.fcgi.*"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"esearchresult": {"idlist": ["1"]}}"#)
                .insert_header("content-type", "application/json"),
        )
        .mount(&server)
        .await;

    let config = ClientConfig::new()
        .with_base_url(server.uri())
        .with_rate_limit(100.0)
        .with_max_results(25)
        .with_api_key("test_key")
        .with_email("tester@example.com")
        .with_tool("papers-test");
    let client = PubMedClient::with_config(config);

    let pmids = client.search_papers("covid-19 vaccine").await.unwrap();
    assert_eq!(pmids, vec!["1"]);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let query = requests[0].url.query().unwrap_or("");
    assert!(query.contains("db=pubmed"));
    assert!(query.contains("retmax=25"));
    assert!(query.contains("retmode=json"));
    assert!(query.contains("api_key=test_key"));
    assert!(query.contains("email=tester%40example.com"));
    assert!(query.contains("tool=papers-test"));
    // Query string itself is URL-encoded
    assert!(query.contains("term=covid-19%20vaccine"));
}

#[tokio::test]
#[traced_test]
async fn test_fetch_batches_large_id_lists() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(r"/efetch\.fcgi.*"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(EMPTY_ARTICLE_SET)
                .insert_header("content-type", "application/xml"),
        )
        .mount(&server)
        .await;

    let client = create_client(&server);

    // 250 IDs must be split into two EFetch requests (200 + 50)
    let pmids: Vec<String> = (1..=250).map(|i| i.to_string()).collect();
    let records = client.fetch_papers(&pmids).await.unwrap();
    assert!(records.is_empty());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2, "250 IDs should produce 2 batched requests");

    let first_query = requests[0].url.query().unwrap_or("").to_string();
    let ids_param = first_query
        .split('&')
        .find(|p| p.starts_with("id="))
        .expect("id parameter present");
    assert_eq!(ids_param.matches("%2C").count() + ids_param.matches(',').count(), 199);
}

#[tokio::test]
#[traced_test]
async fn test_fetch_empty_input_makes_no_requests() {
    let server = MockServer::start().await;
    let client = create_client(&server);

    let records = client.fetch_papers(&[]).await.unwrap();
    assert!(records.is_empty());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 0);
}
