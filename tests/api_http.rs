// tests/api_http.rs
//
// HTTP-level tests for the public API Router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot.
//
// Covered:
// - GET /health
// - POST /analyze (+ session recall, 422 on invalid records)
// - POST /blindspots
// - GET /coverage/{region}
// - GET /sources, GET /sources/{region}

use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::json;
use serde_json::Value as Json;
use tower::ServiceExt as _; // for `oneshot`

use blindspot_analyzer::config::AnalyzerConfig;
use blindspot_analyzer::ingest::demo::DemoHeadlines;
use blindspot_analyzer::{create_router, AppState, BlindspotService, SourceRegistry};

const BODY_LIMIT: usize = 1024 * 1024; // 1MB, safe for tests

fn test_router() -> Router {
    let svc = BlindspotService::new(
        AnalyzerConfig::default(),
        SourceRegistry::default_seed(),
        vec![Box::new(DemoHeadlines)],
    );
    create_router(AppState::new(svc))
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Vec<u8>) {
    let resp = app.clone().oneshot(req).await.expect("oneshot");
    let status = resp.status();
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    (status, bytes)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("build GET")
}

fn post_json(uri: &str, payload: &Json) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .expect("build POST")
}

fn border_story() -> Json {
    json!([
        { "title": "Senate Passes Border Security Bill", "source": "Fox News",
          "published_at": "2024-05-06T11:00:00Z" },
        { "title": "Senate passes border-security bill", "source": "Wall Street Journal",
          "published_at": "2024-05-06T12:00:00Z", "url": "https://example.com/wsj" },
        { "title": "Senate passes border security bill", "source": "AP News",
          "published_at": "2024-05-06T10:00:00Z",
          "description": "<p>The measure&nbsp;now heads to the House.</p>" }
    ])
}

#[tokio::test]
async fn api_health_returns_200_and_ok_body() {
    let app = test_router();
    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK, "health should be 200");
    assert_eq!(String::from_utf8(body).expect("utf8").trim(), "OK");
}

#[tokio::test]
async fn api_analyze_scores_cluster_and_remembers_it() {
    let app = test_router();

    let payload = json!({ "region": "us", "items": border_story() });
    let (status, body) = send(&app, post_json("/analyze", &payload)).await;
    assert_eq!(status, StatusCode::OK);

    let v: Json = serde_json::from_slice(&body).expect("json");
    let arr = v.as_array().expect("array");
    assert_eq!(arr.len(), 1);
    let a = &arr[0];
    assert_eq!(a["story"]["title"], "Senate Passes Border Security Bill");
    assert_eq!(a["story"]["items"].as_array().unwrap().len(), 3);
    assert_eq!(a["left_sources"], 0);
    assert_eq!(a["center_sources"], 1);
    assert_eq!(a["right_sources"], 2);
    assert_eq!(a["right_leaning_sources"], json!(["Fox News", "Wall Street Journal"]));
    assert_eq!(a["blindspot"], "Minimal coverage from left-leaning sources");
    assert_eq!(
        a["story"]["items"][2]["description"],
        "The measure now heads to the House."
    );

    let (status, body) = send(&app, get("/session/stories/1")).await;
    assert_eq!(status, StatusCode::OK);
    let stored: Json = serde_json::from_slice(&body).expect("json");
    assert_eq!(stored, *a);

    let (status, body) = send(&app, get("/session/stories/1/framing")).await;
    assert_eq!(status, StatusCode::OK);
    let framing: Json = serde_json::from_slice(&body).expect("json");
    assert_eq!(framing.as_array().unwrap().len(), 3);
    assert_eq!(framing[0]["source"], "Fox News");

    let (status, _) = send(&app, get("/session/stories/2")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, get("/session/stories/0")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn api_session_is_empty_before_any_analysis() {
    let app = test_router();
    let (status, body) = send(&app, get("/session/stories/1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let v: Json = serde_json::from_slice(&body).expect("json");
    assert!(v["error"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn api_analyze_rejects_blank_titles_with_422() {
    let app = test_router();
    let payload = json!({
        "items": [
            { "title": "Budget Plan", "source": "CNN" },
            { "title": "  <b></b> ", "source": "Fox News" }
        ]
    });
    let (status, body) = send(&app, post_json("/analyze", &payload)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let v: Json = serde_json::from_slice(&body).expect("json");
    assert!(v["error"].as_str().unwrap().contains("empty title"));

    // nothing was stored
    let (status, _) = send(&app, get("/session/stories/1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn api_analyze_empty_batch_is_empty_list() {
    let app = test_router();
    let (status, body) = send(&app, post_json("/analyze", &json!({ "items": [] }))).await;
    assert_eq!(status, StatusCode::OK);
    let v: Json = serde_json::from_slice(&body).expect("json");
    assert_eq!(v, json!([]));
}

#[tokio::test]
async fn api_blindspots_filters_and_truncates() {
    let app = test_router();
    let mut items = border_story().as_array().unwrap().clone();
    items.extend([
        // balanced story, no blindspot
        json!({ "title": "Storm hits coast", "source": "CNN", "published_at": "2024-05-06T13:00:00Z" }),
        json!({ "title": "Storm hits coast", "source": "Fox News", "published_at": "2024-05-06T13:00:00Z" }),
        // left only, newest
        json!({ "title": "Markets rally on jobs report", "source": "CNN", "published_at": "2024-05-06T14:00:00Z" }),
    ]);

    let payload = json!({ "region": "US", "items": items });
    let (status, body) = send(&app, post_json("/blindspots", &payload)).await;
    assert_eq!(status, StatusCode::OK);
    let v: Json = serde_json::from_slice(&body).expect("json");
    let titles: Vec<&str> = v
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["story"]["title"].as_str().unwrap())
        .collect();
    assert_eq!(
        titles,
        vec!["Markets rally on jobs report", "Senate Passes Border Security Bill"]
    );
    assert_eq!(v[0]["blindspot"], "Minimal coverage from right-leaning sources");

    let payload = json!({ "region": "US", "items": items, "max_items": 1 });
    let (_, body) = send(&app, post_json("/blindspots", &payload)).await;
    let v: Json = serde_json::from_slice(&body).expect("json");
    assert_eq!(v.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn api_coverage_over_demo_headlines() {
    let app = test_router();

    // nine distinct US stories: large batch, every singleton dropped
    let (status, body) = send(&app, get("/coverage/us")).await;
    assert_eq!(status, StatusCode::OK);
    let v: Json = serde_json::from_slice(&body).expect("json");
    assert_eq!(v, json!([]));

    // five CA stories: small batch kept, no registry entries for CA
    let (_, body) = send(&app, get("/coverage/CA")).await;
    let v: Json = serde_json::from_slice(&body).expect("json");
    let arr = v.as_array().unwrap();
    assert_eq!(arr.len(), 5);
    assert!(arr.iter().all(|a| a["blindspot"].is_null()));

    let (status, _) = send(&app, get("/session/stories/5")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn api_sources_lists_regions_and_entries() {
    let app = test_router();

    let (status, body) = send(&app, get("/sources")).await;
    assert_eq!(status, StatusCode::OK);
    let v: Json = serde_json::from_slice(&body).expect("json");
    assert_eq!(
        v,
        json!([ { "region": "UK", "sources": 3 }, { "region": "US", "sources": 5 } ])
    );

    let (status, body) = send(&app, get("/sources/us")).await;
    assert_eq!(status, StatusCode::OK);
    let v: Json = serde_json::from_slice(&body).expect("json");
    let fox = v
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["name"] == "Fox News")
        .expect("fox listed");
    assert_eq!(fox["bias"], "Far Right");
    assert_eq!(fox["reliability"], "Medium");

    let (status, _) = send(&app, get("/sources/ZZ")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
