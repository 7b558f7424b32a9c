use serde_json::json;
use url_digest::{
    fetch::{ContentFetcher, Source, UrlFetcher},
    FetchError,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const VIDEO_ID: &str = "dQw4w9WgXcQ";

fn fetcher(server: &MockServer) -> UrlFetcher {
    UrlFetcher::new(vec!["en".into(), "hi".into()], false)
        .unwrap()
        .with_youtube_base_url(server.uri())
}

fn page_source(server: &MockServer, page: &str) -> Source {
    Source::parse(&format!("{}/{page}", server.uri())).unwrap()
}

fn video_source() -> Source {
    Source::parse(&format!("https://www.youtube.com/watch?v={VIDEO_ID}")).unwrap()
}

fn watch_page(player_response: serde_json::Value) -> String {
    format!(
        r#"<html><head><script nonce="n0">var ytInitialPlayerResponse = {player_response};var meta = document.createElement('meta');</script></head><body></body></html>"#
    )
}

fn playable_with_tracks(tracks: serde_json::Value) -> serde_json::Value {
    json!({
        "playabilityStatus": { "status": "OK" },
        "videoDetails": { "videoId": VIDEO_ID, "title": "Budget reading" },
        "captions": {
            "playerCaptionsTracklistRenderer": { "captionTracks": tracks }
        }
    })
}

async fn mount_watch_page(server: &MockServer, player_response: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/watch"))
        .and(query_param("v", VIDEO_ID))
        .respond_with(ResponseTemplate::new(200).set_body_raw(watch_page(player_response), "text/html"))
        .expect(1)
        .mount(server)
        .await;
}

// ─── Webpages ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_webpage_text_is_extracted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/article"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "<html><body><h1>Finance Bill</h1><p>The committee tabled its report.</p></body></html>",
            "text/html",
        ))
        .mount(&server)
        .await;

    let source = page_source(&server, "article");
    let documents = fetcher(&server).fetch(&source).await.unwrap();

    assert_eq!(documents.len(), 1);
    assert!(documents[0].text().contains("Finance Bill"));
    assert!(documents[0].text().contains("The committee tabled its report."));
    assert!(!documents[0].text().contains("<p>"));
    assert_eq!(documents[0].source.as_deref(), Some(source.url().as_str()));
}

#[tokio::test]
async fn test_plain_text_passes_through() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/notes.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "first line\n\n\n\nsecond <line>\n",
            "text/plain",
        ))
        .mount(&server)
        .await;

    let documents = fetcher(&server)
        .fetch(&page_source(&server, "notes.txt"))
        .await
        .unwrap();
    assert_eq!(documents[0].text(), "first line\n\nsecond <line>");
}

#[tokio::test]
async fn test_error_status_is_a_fetch_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = fetcher(&server)
        .fetch(&page_source(&server, "missing"))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Status { status: 404, .. }));
}

#[tokio::test]
async fn test_page_without_text_is_empty_content() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/blank"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("<html><body>  </body></html>", "text/html"),
        )
        .mount(&server)
        .await;

    let err = fetcher(&server)
        .fetch(&page_source(&server, "blank"))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::EmptyContent(_)));
}

// ─── YouTube transcripts ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_transcript_is_fetched_in_preferred_language() {
    let server = MockServer::start().await;
    let tracks = json!([
        {
            "baseUrl": format!("{}/api/timedtext?v={VIDEO_ID}&lang=hi", server.uri()),
            "languageCode": "hi"
        },
        {
            "baseUrl": format!("{}/api/timedtext?v={VIDEO_ID}&lang=en&kind=asr", server.uri()),
            "languageCode": "en",
            "kind": "asr"
        }
    ]);
    mount_watch_page(&server, playable_with_tracks(tracks)).await;

    Mock::given(method("GET"))
        .and(path("/api/timedtext"))
        .and(query_param("lang", "en"))
        .and(query_param("fmt", "json3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "events": [
                { "tStartMs": 0, "segs": [{ "utf8": "Order," }, { "utf8": " order." }] },
                { "tStartMs": 1200 },
                { "tStartMs": 2400, "segs": [{ "utf8": "The house\nwill now sit." }] }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let documents = fetcher(&server).fetch(&video_source()).await.unwrap();

    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].text(), "Order, order. The house will now sit.");
    assert_eq!(
        documents[0].source,
        Some(format!("{}/watch?v={VIDEO_ID}", server.uri()))
    );
}

#[tokio::test]
async fn test_video_without_captions_has_no_transcript() {
    let server = MockServer::start().await;
    mount_watch_page(
        &server,
        json!({
            "playabilityStatus": { "status": "OK" },
            "videoDetails": { "videoId": VIDEO_ID }
        }),
    )
    .await;

    let err = fetcher(&server).fetch(&video_source()).await.unwrap_err();
    match err {
        FetchError::TranscriptUnavailable { video_id, languages } => {
            assert_eq!(video_id, VIDEO_ID);
            assert_eq!(languages, "en, hi");
        }
        other => panic!("expected a missing transcript, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unplayable_video_is_reported() {
    let server = MockServer::start().await;
    mount_watch_page(
        &server,
        json!({
            "playabilityStatus": { "status": "ERROR", "reason": "Video unavailable" }
        }),
    )
    .await;

    let err = fetcher(&server).fetch(&video_source()).await.unwrap_err();
    assert!(matches!(
        err,
        FetchError::VideoUnavailable { ref reason, .. } if reason == "Video unavailable"
    ));
}
