//! End-to-end engine tests against mocked providers.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use citematch::oracle::{DocumentContext, StaticOracle};
use citematch::providers::ProviderKind;
use citematch::review::ProposalStatus;
use citematch::{CitationEngine, Config, Decision, EngineError, EngineOptions};

fn engine_with(
    server: &MockServer,
    kinds: &[ProviderKind],
    options: EngineOptions,
) -> CitationEngine {
    CitationEngine::with_provider_kinds(Config::for_testing(&server.uri()), options, kinds)
        .unwrap()
}

fn empty_semantic_scholar() -> serde_json::Value {
    json!({ "total": 0, "offset": 0, "data": [] })
}

fn empty_crossref() -> serde_json::Value {
    json!({ "status": "ok", "message": { "items": [] } })
}

fn empty_openalex() -> serde_json::Value {
    json!({ "results": [] })
}

/// Five sentences, two providers; provider A knows one paper for sentence 3,
/// provider B knows nothing. Exactly one proposal comes back, attached to
/// sentence 3, scored from title overlap plus year and citation boosts.
#[tokio::test]
async fn test_single_match_document_run() {
    let server = MockServer::start().await;

    let sentence_three =
        "Deep learning models are transforming healthcare delivery across modern hospital systems.";

    Mock::given(method("GET"))
        .and(path("/graph/v1/paper/search"))
        .and(query_param("query", sentence_three))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 1,
            "offset": 0,
            "data": [{
                "paperId": "dl-health",
                "title": "Deep Learning in Healthcare",
                "authors": [{"name": "Jane Smith"}],
                "year": 2022,
                "citationCount": 120,
                "url": "https://example.org/dl-health"
            }]
        })))
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/graph/v1/paper/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty_semantic_scholar()))
        .with_priority(5)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/crossref/works"))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty_crossref()))
        .mount(&server)
        .await;

    let paragraphs = vec![
        "The hospital sector has changed substantially over the last decade.".to_string(),
        "Administrative workloads keep growing for clinical staff everywhere.".to_string(),
        sentence_three.to_string(),
        "Patients increasingly expect digital access to their own records.".to_string(),
        "Funding models differ widely between regions and specialties.".to_string(),
    ];

    let engine = engine_with(
        &server,
        &[ProviderKind::SemanticScholar, ProviderKind::Crossref],
        EngineOptions::default(),
    );
    let outcome = engine.prepare_review(&paragraphs).await.unwrap();
    let payload = outcome.payload;

    assert_eq!(payload.total_citations, 1);
    let proposal = &payload.citations[0];
    assert_eq!(proposal.location.paragraph_index, 3);
    assert_eq!(proposal.location.sentence_index, 1);
    assert_eq!(proposal.location.page_label, "3(1)");
    assert_eq!(proposal.paper.title, "Deep Learning in Healthcare");
    assert_eq!(proposal.status, ProposalStatus::PendingReview);

    // 10 sentence words, 3 shared title words: 0.8 * 0.3, then x1.2 (year)
    // and x1.1 (citations), rounded to 3 decimals.
    assert!((proposal.paper.relevance_score - 0.317).abs() < 1e-9);

    assert_eq!(payload.diagnostics.processed_sentences, 5);
    assert!(payload.diagnostics.api_calls_made <= payload.diagnostics.max_api_calls);
}

/// max_api_calls = 2 with 3 providers and 5 sentences: the whole run makes
/// no more than 2 provider calls.
#[tokio::test]
async fn test_budget_ceiling_holds_across_run() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/graph/v1/paper/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty_semantic_scholar()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/crossref/works"))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty_crossref()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/openalex/works"))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty_openalex()))
        .mount(&server)
        .await;

    let paragraphs: Vec<String> = (1..=5)
        .map(|i| format!("Sentence number {i} makes an academic claim worth citing."))
        .collect();

    let engine = engine_with(
        &server,
        &ProviderKind::ALL,
        EngineOptions { max_api_calls: Some(2), ..EngineOptions::default() },
    );
    let outcome = engine.prepare_review(&paragraphs).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert!(requests.len() <= 2, "made {} calls with a budget of 2", requests.len());
    assert!(outcome.payload.diagnostics.api_calls_made <= 2);
    assert_eq!(outcome.payload.diagnostics.max_api_calls, 2);
}

#[tokio::test]
async fn test_empty_document_is_fatal() {
    let server = MockServer::start().await;
    let engine =
        engine_with(&server, &[ProviderKind::SemanticScholar], EngineOptions::default());

    let err = engine
        .prepare_review(&[String::new(), "   ".to_string()])
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::EmptyDocument));
}

#[tokio::test]
async fn test_authorless_results_produce_no_proposals() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/graph/v1/paper/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 1,
            "offset": 0,
            "data": [{
                "paperId": "ghost",
                "title": "A Paper Nobody Wrote",
                "authors": [],
                "year": 2024
            }]
        })))
        .mount(&server)
        .await;

    let paragraphs =
        vec!["This claim matches a paper that has no listed authors.".to_string()];

    let engine =
        engine_with(&server, &[ProviderKind::SemanticScholar], EngineOptions::default());
    let outcome = engine.prepare_review(&paragraphs).await.unwrap();

    assert_eq!(outcome.payload.total_citations, 0);
}

#[tokio::test]
async fn test_repeated_sentence_is_served_from_cache() {
    let server = MockServer::start().await;

    let sentence = "Corporate governance frameworks shape modern organizations.";

    Mock::given(method("GET"))
        .and(path("/graph/v1/paper/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty_semantic_scholar()))
        .expect(1)
        .mount(&server)
        .await;

    let paragraphs = vec![sentence.to_string(), sentence.to_string()];

    let engine =
        engine_with(&server, &[ProviderKind::SemanticScholar], EngineOptions::default());
    let outcome = engine.prepare_review(&paragraphs).await.unwrap();

    assert_eq!(outcome.payload.diagnostics.api_calls_made, 1);
    assert_eq!(outcome.payload.diagnostics.cache_hits, 1);
    assert_eq!(outcome.payload.diagnostics.processed_sentences, 2);
}

#[tokio::test]
async fn test_oracle_context_enriches_queries() {
    let server = MockServer::start().await;

    let sentence = "Mitochondria produce cellular energy required by tissues.";
    let enriched = format!("{sentence} cell_biology atp organelle");

    Mock::given(method("GET"))
        .and(path("/graph/v1/paper/search"))
        .and(query_param("query", enriched.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty_semantic_scholar()))
        .expect(1)
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/graph/v1/paper/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty_semantic_scholar()))
        .with_priority(5)
        .mount(&server)
        .await;

    let oracle = StaticOracle(DocumentContext {
        research_context: "cell biology energy metabolism".to_string(),
        document_category: "cell_biology".to_string(),
        field_keywords: vec!["atp".to_string(), "organelle".to_string()],
    });

    let engine =
        engine_with(&server, &[ProviderKind::SemanticScholar], EngineOptions::default())
            .with_oracle(Arc::new(oracle));
    let outcome = engine.prepare_review(&[sentence.to_string()]).await.unwrap();

    assert_eq!(outcome.payload.context_info.document_category, "cell_biology");
    assert_eq!(outcome.payload.context_info.field_keywords.len(), 2);
}

#[tokio::test]
async fn test_min_year_filters_stale_best_candidates() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/graph/v1/paper/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 1,
            "offset": 0,
            "data": [{
                "paperId": "old",
                "title": "Governance frameworks shape organizations",
                "authors": [{"name": "Old Author"}],
                "year": 2009,
                "citationCount": 400
            }]
        })))
        .mount(&server)
        .await;

    let paragraphs =
        vec!["Governance frameworks shape organizations in many sectors.".to_string()];

    let engine = engine_with(
        &server,
        &[ProviderKind::SemanticScholar],
        EngineOptions { min_year: Some(2015), ..EngineOptions::default() },
    );
    let outcome = engine.prepare_review(&paragraphs).await.unwrap();

    assert_eq!(outcome.payload.total_citations, 0);
}

#[tokio::test]
async fn test_return_all_carries_ranked_alternates() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/graph/v1/paper/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 2,
            "offset": 0,
            "data": [
                {
                    "paperId": "weak",
                    "title": "Unrelated botany field notes",
                    "authors": [{"name": "Some Botanist"}]
                },
                {
                    "paperId": "strong",
                    "title": "Quantum error correction survey",
                    "authors": [{"name": "Jane Smith"}],
                    "year": 2023,
                    "citationCount": 200
                }
            ]
        })))
        .mount(&server)
        .await;

    let paragraphs =
        vec!["Quantum error correction protects fragile quantum states.".to_string()];

    let engine = engine_with(
        &server,
        &[ProviderKind::SemanticScholar],
        EngineOptions { return_all: true, ..EngineOptions::default() },
    );
    let outcome = engine.prepare_review(&paragraphs).await.unwrap();

    assert_eq!(outcome.payload.total_citations, 1);
    let proposal = &outcome.payload.citations[0];
    assert_eq!(proposal.paper.title, "Quantum error correction survey");
    assert_eq!(proposal.alternates.len(), 1);
    assert!(proposal.paper.relevance_score >= proposal.alternates[0].relevance_score);
}

#[tokio::test]
async fn test_run_deadline_returns_partial_results() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/graph/v1/paper/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(empty_semantic_scholar())
                .set_delay(Duration::from_millis(400)),
        )
        .mount(&server)
        .await;

    let paragraphs: Vec<String> = (1..=4)
        .map(|i| format!("Sentence number {i} makes an academic claim worth citing."))
        .collect();

    let engine = engine_with(
        &server,
        &[ProviderKind::SemanticScholar],
        EngineOptions { run_timeout: Some(Duration::from_millis(100)), ..EngineOptions::default() },
    );

    let started = std::time::Instant::now();
    let outcome = engine.prepare_review(&paragraphs).await.unwrap();

    assert!(started.elapsed() < Duration::from_secs(2));
    assert_eq!(outcome.payload.total_citations, 0);
    assert!(outcome.payload.diagnostics.processed_sentences < 4);
}

/// Full review loop: reject the only proposal and finalize to nothing;
/// accept it in a fresh run and get one formatted citation back.
#[tokio::test]
async fn test_review_decisions_flow_through_finalize() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/graph/v1/paper/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 1,
            "offset": 0,
            "data": [{
                "paperId": "dl-health",
                "title": "Deep Learning in Healthcare",
                "authors": [{"name": "Jane Smith"}],
                "year": 2022,
                "citationCount": 120
            }]
        })))
        .mount(&server)
        .await;

    let paragraphs =
        vec!["Deep learning models are transforming healthcare delivery systems.".to_string()];

    let engine =
        engine_with(&server, &[ProviderKind::SemanticScholar], EngineOptions::default());

    let mut outcome = engine.prepare_review(&paragraphs).await.unwrap();
    let id = outcome.payload.citations[0].id;
    outcome.session.decide(id, Decision::Reject).unwrap();
    assert!(outcome.session.finalize().is_empty());

    let mut outcome = engine.prepare_review(&paragraphs).await.unwrap();
    let id = outcome.payload.citations[0].id;
    outcome.session.decide(id, Decision::Accept).unwrap();

    let finalized = outcome.session.finalize();
    assert_eq!(finalized.len(), 1);
    assert_eq!(finalized[0].citation, "(Jane, 2022)");
    assert_eq!(finalized[0].paragraph_index, 1);
}
