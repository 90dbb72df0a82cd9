//! Integration tests for Species Catalog
//!
//! These tests drive the Wikipedia client and the PostgREST store against
//! local mock servers.

use mockito::{Matcher, Server, ServerGuard};
use species_catalog::card::{CardContext, Confirmation, DeleteOutcome, RecordCard};
use species_catalog::models::{Kingdom, NewSpeciesRecord, SearchEvent, SpeciesRecord};
use species_catalog::notify::{RecordingNotifier, RecordingRefresher, Variant};
use species_catalog::search::{
    RecordingSink, SearchError, SearchWorkflow, WikipediaClient, NO_RESULTS_TITLE,
};
use species_catalog::store::{RecordStore, RestStore, StoreError};
use std::sync::Arc;

const API_PATH: &str = "/w/api.php";
const API_KEY: &str = "anon-key";

const SEARCH_INFO_BODY: &str = r#"{
    "batchcomplete": "",
    "query": {
        "searchinfo": {"totalhits": 3811},
        "search": [{"ns": 0, "title": "Lion", "pageid": 36896}]
    }
}"#;

const THUMBNAILS_BODY: &str = r#"{
    "batchcomplete": "",
    "query": {
        "pages": {
            "904": {"pageid": 904, "ns": 0, "title": "Asiatic lion", "index": 2,
                    "thumbnail": {"source": "https://upload.wikimedia.org/asiatic.jpg", "width": 100, "height": 75}},
            "36896": {"pageid": 36896, "ns": 0, "title": "Lion", "index": 1,
                      "thumbnail": {"source": "https://upload.wikimedia.org/lion.jpg", "width": 100, "height": 67}}
        }
    }
}"#;

const EXTRACTS_BODY: &str = r#"{
    "batchcomplete": "",
    "query": {
        "pages": {
            "36896": {"pageid": 36896, "ns": 0, "title": "Lion", "index": 1,
                      "extract": "The lion (Panthera leo) is a large cat of the genus Panthera.\nIt has a muscular, broad-chested body."},
            "904": {"pageid": 904, "ns": 0, "title": "Asiatic lion", "index": 2,
                    "extract": "The Asiatic lion is a population of Panthera leo leo."}
        }
    }
}"#;

fn search_info_query() -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("list".into(), "search".into()),
        Matcher::UrlEncoded("srlimit".into(), "20".into()),
    ])
}

fn thumbnails_query() -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("generator".into(), "search".into()),
        Matcher::UrlEncoded("prop".into(), "pageimages".into()),
        Matcher::UrlEncoded("pithumbsize".into(), "100".into()),
    ])
}

fn extracts_query() -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("generator".into(), "search".into()),
        Matcher::UrlEncoded("prop".into(), "extracts".into()),
    ])
}

fn workflow_for(server: &ServerGuard) -> (SearchWorkflow, Arc<RecordingNotifier>) {
    let client = WikipediaClient::new()
        .unwrap()
        .with_base_url(format!("{}{}", server.url(), API_PATH));
    let notifier = Arc::new(RecordingNotifier::new());
    (
        SearchWorkflow::new(Arc::new(client), notifier.clone()),
        notifier,
    )
}

fn lion_record() -> SpeciesRecord {
    SpeciesRecord {
        id: 12,
        scientific_name: "Panthera leo".to_string(),
        common_name: Some("Lion".to_string()),
        image: Some("https://upload.wikimedia.org/lion.jpg".to_string()),
        description: Some("The lion is a large cat.".to_string()),
        total_population: Some(23_000),
        kingdom: Kingdom::Animalia,
        author: "owner-1".to_string(),
    }
}

fn store_for(server: &ServerGuard) -> RestStore {
    RestStore::new(server.url(), API_KEY, "species").unwrap()
}

/// A full search publishes the top-ranked image and the first paragraph
#[tokio::test]
async fn test_wikipedia_search_populates_sink() {
    let mut server = Server::new_async().await;
    let info = server
        .mock("GET", API_PATH)
        .match_query(Matcher::AllOf(vec![
            search_info_query(),
            Matcher::UrlEncoded("srsearch".into(), "Panthera leo".into()),
        ]))
        .with_header("content-type", "application/json")
        .with_body(SEARCH_INFO_BODY)
        .expect(1)
        .create_async()
        .await;
    let thumbs = server
        .mock("GET", API_PATH)
        .match_query(thumbnails_query())
        .with_body(THUMBNAILS_BODY)
        .expect(1)
        .create_async()
        .await;
    let extracts = server
        .mock("GET", API_PATH)
        .match_query(extracts_query())
        .with_body(EXTRACTS_BODY)
        .expect(1)
        .create_async()
        .await;

    let (workflow, notifier) = workflow_for(&server);
    let sink = RecordingSink::new();
    workflow.set_input("  Panthera leo ");

    let outcome = workflow.submit_input(&sink).await.unwrap().unwrap();

    info.assert_async().await;
    thumbs.assert_async().await;
    extracts.assert_async().await;

    assert_eq!(outcome.total_hits, 3811);
    assert_eq!(
        sink.events(),
        vec![
            SearchEvent::ImageFound("https://upload.wikimedia.org/lion.jpg".to_string()),
            SearchEvent::DescriptionFound(
                "The lion (Panthera leo) is a large cat of the genus Panthera.".to_string()
            ),
        ]
    );
    assert_eq!(notifier.count(), 0);
    assert_eq!(workflow.input(), "");
}

/// A single failed lookup fails the whole submission
#[tokio::test]
async fn test_wikipedia_transport_failure_publishes_nothing() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", API_PATH)
        .match_query(search_info_query())
        .with_body(r#"{"query":{"searchinfo":{"totalhits":0}}}"#)
        .create_async()
        .await;
    server
        .mock("GET", API_PATH)
        .match_query(thumbnails_query())
        .with_status(503)
        .create_async()
        .await;
    server
        .mock("GET", API_PATH)
        .match_query(extracts_query())
        .with_body(EXTRACTS_BODY)
        .create_async()
        .await;

    let (workflow, notifier) = workflow_for(&server);
    let sink = RecordingSink::new();

    let result = workflow.submit(Some("lion"), &sink).await;

    assert!(matches!(
        result,
        Err(SearchError::Transport { status: 503, .. })
    ));
    assert!(sink.events().is_empty());
    assert_eq!(notifier.count(), 0);
}

/// Zero hits is reported once and publishes nothing
#[tokio::test]
async fn test_wikipedia_zero_hits_notifies() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", API_PATH)
        .match_query(search_info_query())
        .with_body(r#"{"batchcomplete":"","query":{"searchinfo":{"totalhits":0},"search":[]}}"#)
        .create_async()
        .await;
    server
        .mock("GET", API_PATH)
        .match_query(thumbnails_query())
        .with_body(r#"{"batchcomplete":""}"#)
        .create_async()
        .await;
    server
        .mock("GET", API_PATH)
        .match_query(extracts_query())
        .with_body(r#"{"batchcomplete":""}"#)
        .create_async()
        .await;

    let (workflow, notifier) = workflow_for(&server);
    let sink = RecordingSink::new();

    let outcome = workflow.submit(Some("qzxqzx"), &sink).await.unwrap().unwrap();

    assert_eq!(outcome.total_hits, 0);
    assert!(sink.events().is_empty());
    let received = notifier.received();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].title, NO_RESULTS_TITLE);
}

/// Blank input never reaches the network
#[tokio::test]
async fn test_wikipedia_blank_input_sends_nothing() {
    let mut server = Server::new_async().await;
    let any = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let (workflow, notifier) = workflow_for(&server);
    let sink = RecordingSink::new();

    for raw in [None, Some(""), Some("    ")] {
        assert!(workflow.submit(raw, &sink).await.unwrap().is_none());
    }

    any.assert_async().await;
    assert!(sink.events().is_empty());
    assert_eq!(notifier.count(), 0);
}

#[tokio::test]
async fn test_rest_store_list() {
    let mut server = Server::new_async().await;
    let body = serde_json::to_string(&vec![lion_record()]).unwrap();
    let mock = server
        .mock("GET", "/rest/v1/species")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("select".into(), "*".into()),
            Matcher::UrlEncoded("order".into(), "id.asc".into()),
        ]))
        .match_header("apikey", API_KEY)
        .match_header("authorization", "Bearer anon-key")
        .with_body(body)
        .create_async()
        .await;

    let records = store_for(&server).list().await.unwrap();

    mock.assert_async().await;
    assert_eq!(records, vec![lion_record()]);
}

#[tokio::test]
async fn test_rest_store_insert_returns_representation() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/rest/v1/species")
        .match_header("prefer", "return=representation")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "scientific_name": "Panthera leo",
            "kingdom": "Animalia",
            "author": "owner-1"
        })))
        .with_status(201)
        .with_body(serde_json::to_string(&vec![lion_record()]).unwrap())
        .create_async()
        .await;

    let new = NewSpeciesRecord {
        scientific_name: "Panthera leo".to_string(),
        common_name: Some("Lion".to_string()),
        image: None,
        description: None,
        total_population: None,
        kingdom: Kingdom::Animalia,
        author: "owner-1".to_string(),
    };
    let stored = store_for(&server).insert(&new).await.unwrap();

    mock.assert_async().await;
    assert_eq!(stored.id, 12);
}

#[tokio::test]
async fn test_rest_store_delete_error_message() {
    let mut server = Server::new_async().await;
    server
        .mock("DELETE", "/rest/v1/species")
        .match_query(Matcher::UrlEncoded("id".into(), "eq.12".into()))
        .with_status(401)
        .with_body(r#"{"code":"42501","details":null,"hint":null,"message":"permission denied for table species"}"#)
        .create_async()
        .await;

    let err = store_for(&server).delete_by_id(12).await.unwrap_err();

    match err {
        StoreError::Api { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "permission denied for table species");
        }
        other => panic!("unexpected error: {other}"),
    }
}

/// Confirming a delete on a card removes the record through the REST store,
/// refreshes the list and reports the deleted name
#[tokio::test]
async fn test_card_delete_through_rest_store() {
    let mut server = Server::new_async().await;
    let delete = server
        .mock("DELETE", "/rest/v1/species")
        .match_query(Matcher::UrlEncoded("id".into(), "eq.12".into()))
        .match_header("apikey", API_KEY)
        .with_status(204)
        .expect(2)
        .create_async()
        .await;

    let notifier = Arc::new(RecordingNotifier::new());
    let refresher = Arc::new(RecordingRefresher::new());
    let ctx = CardContext {
        store: Arc::new(store_for(&server)),
        notifier: notifier.clone(),
        refresher: refresher.clone(),
    };

    let mut card = RecordCard::new(lion_record(), "owner-1");

    card.request_delete().unwrap();
    let declined = card.resolve_delete(Confirmation::No, &ctx).await.unwrap();
    assert_eq!(declined, DeleteOutcome::Cancelled);
    assert_eq!(notifier.count(), 0);

    // A repeated delete of the same row is a no-op on the server side
    for _ in 0..2 {
        card.request_delete().unwrap();
        let outcome = card.resolve_delete(Confirmation::Yes, &ctx).await.unwrap();
        assert_eq!(outcome, DeleteOutcome::Deleted);
    }

    delete.assert_async().await;
    assert_eq!(refresher.count(), 2);

    let received = notifier.received();
    assert_eq!(received.len(), 2);
    assert_eq!(received[0].variant, Variant::Normal);
    assert_eq!(
        received[0].description.as_deref(),
        Some("Successfully Deleted Panthera leo.")
    );
}
