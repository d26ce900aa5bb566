//! Integration tests for the full search → fetch → classify pipeline
//! using mocked NCBI endpoints.

use papers_client::{Classifier, ClientConfig, Pipeline, PubMedClient};
use tracing_test::traced_test;
use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ESEARCH_TWO_IDS: &str = r#"{"esearchresult": {"idlist": ["111", "222"]}}"#;

const EFETCH_PFIZER_AND_HARVARD: &str = r#"<?xml version="1.0" ?>
<PubmedArticleSet>
<PubmedArticle>
    <MedlineCitation>
        <PMID Version="1">111</PMID>
        <Article>
            <ArticleTitle>Phase II trial of a novel kinase inhibitor</ArticleTitle>
            <Journal>
                <JournalIssue>
                    <PubDate>
                        <Year>2024</Year>
                        <Month>Jan</Month>
                    </PubDate>
                </JournalIssue>
            </Journal>
            <AuthorList>
                <Author>
                    <LastName>Miller</LastName>
                    <ForeName>Dana</ForeName>
                    <AffiliationInfo>
                        <Affiliation>Pfizer Inc, New York, NY, USA. dana.miller@pfizer.com</Affiliation>
                    </AffiliationInfo>
                </Author>
            </AuthorList>
        </Article>
    </MedlineCitation>
</PubmedArticle>
<PubmedArticle>
    <MedlineCitation>
        <PMID Version="1">222</PMID>
        <Article>
            <ArticleTitle>Outcomes of adjuvant chemotherapy</ArticleTitle>
            <AuthorList>
                <Author>
                    <LastName>Chen</LastName>
                    <ForeName>Wei</ForeName>
                    <AffiliationInfo>
                        <Affiliation>Harvard Medical School, Boston, MA, USA</Affiliation>
                    </AffiliationInfo>
                </Author>
            </AuthorList>
        </Article>
    </MedlineCitation>
</PubmedArticle>
</PubmedArticleSet>"#;

async fn mount_esearch(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path_regex(r"/esearch\.fcgi.*"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body.to_string())
                .insert_header("content-type", "application/json"),
        )
        .mount(server)
        .await;
}

async fn mount_efetch(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path_regex(r"/efetch\.fcgi.*"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body.to_string())
                .insert_header("content-type", "application/xml"),
        )
        .mount(server)
        .await;
}

fn create_pipeline(server: &MockServer) -> Pipeline {
    let config = ClientConfig::new()
        .with_base_url(server.uri())
        .with_rate_limit(100.0); // High rate limit for tests

    Pipeline::new(PubMedClient::with_config(config), Classifier::new())
}

/// The canonical scenario: one pharma paper passes, one academic paper
/// is filtered out.
#[tokio::test]
#[traced_test]
async fn test_pharma_paper_kept_academic_paper_dropped() {
    let server = MockServer::start().await;
    mount_esearch(&server, ESEARCH_TWO_IDS).await;
    mount_efetch(&server, EFETCH_PFIZER_AND_HARVARD).await;

    let papers = create_pipeline(&server)
        .run("cancer treatment")
        .await
        .expect("Pipeline should succeed");

    assert_eq!(papers.len(), 1, "Only the Pfizer paper should qualify");

    let paper = &papers[0];
    assert_eq!(paper.pmid, "111");
    assert_eq!(paper.title, "Phase II trial of a novel kinase inhibitor");
    assert_eq!(paper.pub_date, "2024-Jan");
    assert_eq!(paper.non_academic_authors, vec!["Dana Miller"]);
    assert_eq!(paper.company_affiliations, vec!["Pfizer Inc"]);
    assert_eq!(
        paper.corresponding_email.as_deref(),
        Some("dana.miller@pfizer.com")
    );
}

/// A search with no hits completes successfully without touching EFetch.
#[tokio::test]
#[traced_test]
async fn test_no_search_results() {
    let server = MockServer::start().await;
    mount_esearch(&server, r#"{"esearchresult": {"idlist": []}}"#).await;

    let papers = create_pipeline(&server)
        .run("zxqj nonexistent")
        .await
        .expect("Empty result set is not an error");

    assert!(papers.is_empty());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1, "Only the ESearch request should be made");
}

/// An empty query fails before any network call.
#[tokio::test]
#[traced_test]
async fn test_empty_query_makes_no_requests() {
    let server = MockServer::start().await;
    mount_esearch(&server, ESEARCH_TWO_IDS).await;

    let result = create_pipeline(&server).run("").await;
    assert!(result.is_err());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 0);
}

/// A record that fails to parse is skipped; the rest of the batch still
/// flows through classification.
#[tokio::test]
#[traced_test]
async fn test_malformed_record_is_skipped() {
    let xml = r#"<?xml version="1.0" ?>
<PubmedArticleSet>
<PubmedArticle>
    <MedlineCitation>
        <PMID>111</PMID>
        <Article></Article>
    </MedlineCitation>
</PubmedArticle>
<PubmedArticle>
    <MedlineCitation>
        <PMID>222</PMID>
        <Article>
            <ArticleTitle>Biomarker discovery at a biotech startup</ArticleTitle>
            <AuthorList>
                <Author>
                    <LastName>Ruiz</LastName>
                    <ForeName>Ana</ForeName>
                    <AffiliationInfo>
                        <Affiliation>Helix Biotech Ltd, Dublin, Ireland</Affiliation>
                    </AffiliationInfo>
                </Author>
            </AuthorList>
        </Article>
    </MedlineCitation>
</PubmedArticle>
</PubmedArticleSet>"#;

    let server = MockServer::start().await;
    mount_esearch(&server, ESEARCH_TWO_IDS).await;
    mount_efetch(&server, xml).await;

    let papers = create_pipeline(&server)
        .run("biomarkers")
        .await
        .expect("Pipeline should tolerate one malformed record");

    assert_eq!(papers.len(), 1);
    assert_eq!(papers[0].pmid, "222");
    assert_eq!(papers[0].company_affiliations, vec!["Helix Biotech Ltd"]);
    assert_eq!(papers[0].corresponding_email, None);
}

/// A paper qualifies exactly once even with several non-academic authors.
#[tokio::test]
#[traced_test]
async fn test_paper_with_multiple_company_authors_appears_once() {
    let xml = r#"<?xml version="1.0" ?>
<PubmedArticleSet>
<PubmedArticle>
    <MedlineCitation>
        <PMID>333</PMID>
        <Article>
            <ArticleTitle>Joint industry study</ArticleTitle>
            <AuthorList>
                <Author>
                    <LastName>Kim</LastName>
                    <ForeName>Joon</ForeName>
                    <AffiliationInfo>
                        <Affiliation>Samsung Bioepis Co, Incheon</Affiliation>
                    </AffiliationInfo>
                </Author>
                <Author>
                    <LastName>Berg</LastName>
                    <ForeName>Lena</ForeName>
                    <AffiliationInfo>
                        <Affiliation>Bayer Pharma AG, Berlin, Germany</Affiliation>
                    </AffiliationInfo>
                </Author>
            </AuthorList>
        </Article>
    </MedlineCitation>
</PubmedArticle>
</PubmedArticleSet>"#;

    let server = MockServer::start().await;
    mount_esearch(&server, r#"{"esearchresult": {"idlist": ["333"]}}"#).await;
    mount_efetch(&server, xml).await;

    let papers = create_pipeline(&server).run("biosimilars").await.unwrap();

    assert_eq!(papers.len(), 1);
    assert_eq!(papers[0].non_academic_authors, vec!["Joon Kim", "Lena Berg"]);
    assert_eq!(
        papers[0].company_affiliations,
        vec!["Samsung Bioepis Co", "Bayer Pharma AG"]
    );
}
