//! HTTP adapters exercised against local fake endpoints.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use muse::{
    ApifyPageScraper, GeminiClient, GallerySource, GenerativeModel, HttpImageFetcher,
    ImageFetcher, InMemoryUsageStore, Interpreter, MetMuseumSource, MockImageFetcher,
    ScrapedGallerySource, UsageStore, UsageTracker, WikiArtSource,
};

type Seen = Arc<Mutex<Vec<Value>>>;

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    format!("http://{addr}")
}

async fn met_search(
    State(seen): State<Seen>,
    Query(params): Query<std::collections::HashMap<String, String>>,
) -> Json<Value> {
    seen.lock().unwrap().push(json!(params));
    Json(json!({"total": 5, "objectIDs": [1, 2, 3, 4, 5]}))
}

async fn met_object(Path(id): Path<u64>) -> Result<Json<Value>, StatusCode> {
    match id {
        2 => Err(StatusCode::NOT_FOUND),
        3 => Ok(Json(json!({"objectID": 3, "title": "Sketch", "primaryImage": ""}))),
        _ => Ok(Json(json!({
            "objectID": id,
            "title": format!("Object {id}"),
            "artistDisplayName": "Unknown Hand",
            "primaryImage": format!("https://images.metmuseum.org/{id}.jpg"),
        }))),
    }
}

fn met_app(seen: Seen) -> Router {
    Router::new()
        .route("/search", get(met_search))
        .route("/objects/{id}", get(met_object))
        .with_state(seen)
}

#[tokio::test]
async fn met_skips_failed_and_imageless_objects() {
    let seen = Seen::default();
    let base = serve(met_app(seen.clone())).await;
    let source = MetMuseumSource::new(base);

    let records = source.search("heavy figure", 2).await.unwrap();

    let titles: Vec<&str> = records.iter().map(|r| r.title()).collect();
    assert_eq!(titles, ["Object 1", "Object 4"]);
    assert_eq!(records[1].image_url(), "https://images.metmuseum.org/4.jpg");

    let params = seen.lock().unwrap()[0].clone();
    assert_eq!(params["q"], "heavy figure");
    assert_eq!(params["hasImages"], "true");
}

#[tokio::test]
async fn met_returns_at_most_max_results() {
    let base = serve(met_app(Seen::default())).await;

    let records = MetMuseumSource::new(base).search("x", 10).await.unwrap();

    // Five ids, one missing and one without an image.
    assert_eq!(records.len(), 3);
    assert_eq!(source_name(&MetMuseumSource::default()), "met");
}

#[tokio::test]
async fn met_search_failure_is_upstream_error() {
    let app = Router::new().route(
        "/search",
        get(|| async { StatusCode::SERVICE_UNAVAILABLE }),
    );
    let base = serve(app).await;

    let err = MetMuseumSource::new(base).search("x", 5).await.unwrap_err();

    assert!(err.is_upstream());
}

fn source_name(source: &dyn GallerySource) -> &str {
    source.name()
}

#[tokio::test]
async fn wikiart_resolves_images_and_drops_imageless_paintings() {
    let app = Router::new().route(
        "/PaintingSearch",
        get(|| async {
            Json(json!({"data": [
                {"title": "Sorrow", "artistName": "Vincent van Gogh",
                 "image": "https://uploads.wikiart.org/images/vincent-van-gogh/sorrow.jpg"},
                {"title": "Lost", "artistName": "Nobody", "image": ""},
                {"title": "Evening", "artistName": "Edvard Munch",
                 "image": "evening.jpg", "contentId": 1234}
            ]}))
        }),
    );
    let base = serve(app).await;
    let source = WikiArtSource::new(base);

    let records = source.search("sorrow", 10).await.unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].artist(), "Vincent van Gogh");
    assert_eq!(
        records[1].image_url(),
        "https://uploads.wikiart.org/images/1234/evening.jpg"
    );

    let capped = source.search("sorrow", 1).await.unwrap();
    assert_eq!(capped.len(), 1);
}

async fn gemini_generate(
    State(seen): State<Seen>,
    Path(action): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let key = headers
        .get("x-goog-api-key")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    seen.lock()
        .unwrap()
        .push(json!({"action": action, "key": key, "body": body}));

    if key != "test-key" {
        return (StatusCode::FORBIDDEN, Json(json!({"error": "bad key"})));
    }
    (
        StatusCode::OK,
        Json(json!({"candidates": [
            {"content": {"parts": [{"text": "```\nheavy figure\nsolitude chiaroscuro\n```"}]}}
        ]})),
    )
}

fn gemini_app(seen: Seen) -> Router {
    Router::new()
        .route("/v1beta/models/{action}", post(gemini_generate))
        .with_state(seen)
}

fn interpreter_with(client: GeminiClient, store: Arc<InMemoryUsageStore>) -> Interpreter {
    let model: Arc<dyn GenerativeModel> = Arc::new(client);
    Interpreter::new(
        Some(model),
        Arc::new(MockImageFetcher::new()),
        Arc::new(UsageTracker::new(store)),
    )
}

#[tokio::test]
async fn gemini_keywords_are_cleaned_and_counted() {
    let seen = Seen::default();
    let base = serve(gemini_app(seen.clone())).await;
    let store = Arc::new(InMemoryUsageStore::new());
    let interpreter = interpreter_with(
        GeminiClient::new("test-key", "gemini-test", base),
        store.clone(),
    );

    let keywords = interpreter
        .generate_keywords("the weight of existence", Duration::from_secs(5))
        .await
        .unwrap();

    assert_eq!(keywords, "heavy figure solitude chiaroscuro");

    let request = seen.lock().unwrap()[0].clone();
    assert_eq!(request["action"], "gemini-test:generateContent");
    assert_eq!(request["key"], "test-key");
    let body = &request["body"];
    assert_eq!(body["contents"][0]["parts"][0]["text"], "the weight of existence");
    assert_eq!(body["generationConfig"]["maxOutputTokens"], 100);
    assert_eq!(body["generationConfig"]["topK"], 40);
    assert!(body["systemInstruction"]["parts"][0]["text"]
        .as_str()
        .is_some_and(|s| s.contains("search keywords")));

    let usage = store.load().await.unwrap().expect("request was tracked");
    assert_eq!(usage.total_requests(), 1);
}

#[tokio::test]
async fn gemini_explanation_sends_the_image_inline() {
    let seen = Seen::default();
    let base = serve(gemini_app(seen.clone())).await;
    let interpreter = interpreter_with(
        GeminiClient::new("test-key", "gemini-test", base),
        Arc::new(InMemoryUsageStore::new()),
    );

    interpreter
        .explain_artwork(
            "https://images.example.org/a.png",
            "the weight of existence",
            "Melancholy",
            "Edvard Munch",
            Duration::from_secs(5),
        )
        .await
        .unwrap();

    let request = seen.lock().unwrap()[0].clone();
    let parts = &request["body"]["contents"][0]["parts"];
    assert!(parts[0]["text"]
        .as_str()
        .is_some_and(|s| s.contains("Melancholy") && s.contains("the weight of existence")));
    assert_eq!(parts[1]["inlineData"]["mimeType"], "image/png");
    assert!(parts[1]["inlineData"]["data"]
        .as_str()
        .is_some_and(|d| !d.is_empty()));
    assert_eq!(request["body"]["generationConfig"]["maxOutputTokens"], 512);
}

#[tokio::test]
async fn gemini_http_error_is_upstream_and_not_counted() {
    let base = serve(gemini_app(Seen::default())).await;
    let store = Arc::new(InMemoryUsageStore::new());
    let interpreter = interpreter_with(
        GeminiClient::new("wrong-key", "gemini-test", base),
        store.clone(),
    );

    let err = interpreter
        .generate_keywords("anything", Duration::from_secs(5))
        .await
        .unwrap_err();

    assert!(err.is_upstream());
    assert!(err.to_string().contains("403"));
    assert!(store.load().await.unwrap().is_none());
}

const RESULTS_PAGE: &str = r#"<html><head><title>Suche</title></head><body>
<header><img src="/static/logo.png" alt="Meisterdrucke logo" width="200"></header>
<div class="product-item">
  <a href="/kunstwerke/1.html"><img src="/img/melancholy.jpg" alt="Melancholy by Edvard Munch, 1891"></a>
</div>
<div class="product-item">
  <a href="/kunstwerke/2.html"><img data-src="//cdn.meisterdrucke.example/burden.jpg" src="/img/loading.gif" alt="The Burden"></a>
  <span class="artist-name">Honoré Daumier</span>
</div>
</body></html>"#;

async fn apify_run(
    State(seen): State<Seen>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some("Bearer apify-token");
    if !authorized {
        return Err(StatusCode::UNAUTHORIZED);
    }
    seen.lock().unwrap().push(body);
    Ok(Json(json!([{"url": "ignored", "html": RESULTS_PAGE}])))
}

fn apify_app(seen: Seen) -> Router {
    Router::new()
        .route(
            "/v2/acts/apify~cheerio-scraper/run-sync-get-dataset-items",
            post(apify_run),
        )
        .with_state(seen)
}

#[tokio::test]
async fn scraped_gallery_extracts_artwork_from_the_results_page() {
    let seen = Seen::default();
    let base = serve(apify_app(seen.clone())).await;
    let source =
        ScrapedGallerySource::meisterdrucke(Arc::new(ApifyPageScraper::new("apify-token", base)))
            .unwrap();

    let records = source.search("heavy figure", 10).await.unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].artist(), "Edvard Munch");
    assert_eq!(
        records[0].image_url(),
        "https://www.meisterdrucke.ie/img/melancholy.jpg"
    );
    assert_eq!(records[1].title(), "The Burden");
    assert_eq!(records[1].artist(), "Honoré Daumier");
    assert_eq!(
        records[1].image_url(),
        "https://cdn.meisterdrucke.example/burden.jpg"
    );

    let input = seen.lock().unwrap()[0].clone();
    assert_eq!(
        input["startUrls"][0]["url"],
        "https://www.meisterdrucke.ie/suche/heavy+figure.html"
    );
    assert_eq!(input["maxRequestsPerCrawl"], 1);
}

#[tokio::test]
async fn scraper_rejection_is_upstream_error() {
    let base = serve(apify_app(Seen::default())).await;
    let source =
        ScrapedGallerySource::meisterdrucke(Arc::new(ApifyPageScraper::new("revoked", base)))
            .unwrap();

    let err = source.search("heavy figure", 10).await.unwrap_err();

    assert!(err.is_upstream());
}

#[tokio::test]
async fn empty_actor_dataset_means_no_artwork() {
    let app = Router::new().route(
        "/v2/acts/apify~cheerio-scraper/run-sync-get-dataset-items",
        post(|| async { Json(json!([])) }),
    );
    let base = serve(app).await;
    let source =
        ScrapedGallerySource::meisterdrucke(Arc::new(ApifyPageScraper::new("apify-token", base)))
            .unwrap();

    let records = source.search("heavy figure", 10).await.unwrap();

    assert!(records.is_empty());
}

fn image_app() -> Router {
    Router::new()
        .route(
            "/a.jpg",
            get(|| async {
                (
                    [(header::CONTENT_TYPE, "image/jpeg")],
                    vec![0xFF_u8, 0xD8, 0xFF, 0xE0, 0x00, 0x10],
                )
            }),
        )
        .route(
            "/download",
            get(|| async {
                (
                    [(header::CONTENT_TYPE, "application/octet-stream")],
                    vec![0x89_u8, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A],
                )
            }),
        )
        .route(
            "/page",
            get(|| async { ([(header::CONTENT_TYPE, "text/html")], "<html></html>") }),
        )
}

#[tokio::test]
async fn image_fetcher_uses_header_then_magic_bytes() {
    let base = serve(image_app()).await;
    let fetcher = HttpImageFetcher::new();

    let jpeg = fetcher.fetch(&format!("{base}/a.jpg")).await.unwrap();
    assert_eq!(jpeg.mime_type, "image/jpeg");
    assert_eq!(jpeg.bytes.len(), 6);

    let png = fetcher.fetch(&format!("{base}/download")).await.unwrap();
    assert_eq!(png.mime_type, "image/png");
}

#[tokio::test]
async fn image_fetcher_rejects_missing_and_non_image_responses() {
    let base = serve(image_app()).await;
    let fetcher = HttpImageFetcher::new();

    let missing = fetcher.fetch(&format!("{base}/gone.jpg")).await.unwrap_err();
    assert!(missing.to_string().contains("404"));

    let html = fetcher.fetch(&format!("{base}/page")).await.unwrap_err();
    assert!(html.to_string().contains("not an image"));
}
