//! Integration tests for `ElasticClient` and the ingestion gate over HTTP.
//!
//! Uses `wiremock` to stand in for an Elasticsearch node.

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use venuedb_core::{GuestRange, Venue, VenueDetails, VenueMap};
use venuedb_store::{index_mappings, ingest, DocumentSink, ElasticClient, StoreError};

fn test_client(server: &MockServer) -> ElasticClient {
    ElasticClient::new(&server.uri(), 5).expect("failed to build test ElasticClient")
}

fn count(n: u64) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "count": n,
        "_shards": { "total": 1, "successful": 1, "skipped": 0, "failed": 0 }
    }))
}

// ---------------------------------------------------------------------------
// Test 1 – index lifecycle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_index_on_missing_index_is_not_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/venues"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": { "type": "index_not_found_exception" },
            "status": 404
        })))
        .expect(1)
        .mount(&server)
        .await;

    let deleted = test_client(&server).delete_index("venues").await.unwrap();
    assert!(!deleted);
}

#[tokio::test]
async fn index_exists_reads_head_status() {
    let server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/present"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/absent"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = test_client(&server);
    assert!(client.index_exists("present").await.unwrap());
    assert!(!client.index_exists("absent").await.unwrap());
}

#[tokio::test]
async fn create_index_sends_mappings() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/venues"))
        .and(body_json(index_mappings()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "acknowledged": true, "shards_acknowledged": true, "index": "venues"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let created = test_client(&server)
        .create_index("venues", &index_mappings())
        .await
        .unwrap();
    assert!(created);
}

#[tokio::test]
async fn create_index_already_exists_is_a_no_op() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/venues"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "type": "resource_already_exists_exception",
                "reason": "index [venues/abc] already exists"
            },
            "status": 400
        })))
        .mount(&server)
        .await;

    let created = test_client(&server)
        .create_index("venues", &index_mappings())
        .await
        .unwrap();
    assert!(!created);
}

#[tokio::test]
async fn create_index_other_bad_request_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/venues"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "type": "mapper_parsing_exception" },
            "status": 400
        })))
        .mount(&server)
        .await;

    let err = test_client(&server)
        .create_index("venues", &index_mappings())
        .await
        .unwrap_err();
    assert!(
        matches!(err, StoreError::UnexpectedStatus { status: 400, ref body, .. } if body.contains("mapper_parsing_exception")),
        "got: {err:?}"
    );
}

// ---------------------------------------------------------------------------
// Test 2 – documents and counts
// ---------------------------------------------------------------------------

#[tokio::test]
async fn count_matching_sends_term_query() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/venues/_count"))
        .and(body_json(json!({ "query": { "term": { "name": "Hall A" } } })))
        .respond_with(count(1))
        .expect(1)
        .mount(&server)
        .await;

    let n = test_client(&server)
        .count_matching("venues", "name", "Hall A")
        .await
        .unwrap();
    assert_eq!(n, 1);
}

#[tokio::test]
async fn write_document_without_id_posts() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/venues/_doc"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "_index": "venues", "_id": "generated-1", "result": "created"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let id = test_client(&server)
        .write_document("venues", &json!({"name": "Hall A"}), None)
        .await
        .unwrap();
    assert_eq!(id, "generated-1");
}

#[tokio::test]
async fn write_document_with_id_puts() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/venues/_doc/hall-a"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "_index": "venues", "_id": "hall-a", "result": "created"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let id = test_client(&server)
        .write_document("venues", &json!({"name": "Hall A"}), Some("hall-a"))
        .await
        .unwrap();
    assert_eq!(id, "hall-a");
}

#[tokio::test]
async fn malformed_count_response_is_json_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/venues/_count"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "hits": 3 })))
        .mount(&server)
        .await;

    let err = test_client(&server).count_all("venues").await.unwrap_err();
    assert!(matches!(err, StoreError::Json { .. }), "got: {err:?}");
}

// ---------------------------------------------------------------------------
// Test 3 – full ingestion over HTTP
// ---------------------------------------------------------------------------

#[tokio::test]
async fn ingest_with_remove_index_on_absent_index() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/venues"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/venues"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/venues"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"acknowledged": true})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/venues/_count"))
        .respond_with(count(0))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/venues/_doc"))
        .and(body_json(json!({
            "name": "Hall A",
            "price": 120,
            "guests": { "gte": 0, "lte": 50 },
            "coordinates": null,
            "website": "https://venues.example/hall-a",
            "review_score": 0.0,
            "has_more_info": false,
            "multiple_events": null,
            "location_type": null
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"_id": "1"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/venues/_refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/venues/_count"))
        .respond_with(count(1))
        .expect(1)
        .mount(&server)
        .await;

    let venues: VenueMap = [Venue::new(
        "Hall A",
        "https://venues.example/hall-a",
        VenueDetails {
            price: Some(120),
            guests: Some(GuestRange::up_to(50)),
            ..VenueDetails::default()
        },
    )
    .unwrap()]
    .into_iter()
    .collect();

    let report = ingest(&test_client(&server), "venues", &venues, true)
        .await
        .unwrap();

    assert_eq!(report.newly_inserted, 1);
    assert_eq!(report.previously_present, 0);
    assert_eq!(report.total_in_sink, 1);
}

#[tokio::test]
async fn ingest_propagates_sink_failure() {
    let server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = ingest(&test_client(&server), "venues", &VenueMap::new(), false).await;
    assert!(matches!(
        result,
        Err(StoreError::UnexpectedStatus { status: 503, .. })
    ));
}
