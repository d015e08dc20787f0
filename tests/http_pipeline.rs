//! End-to-end ingestion over real HTTP against a local fake feed host/archive.

mod common;

use common::fake_feed_server::{FakeFeedServer, rss};
use news_harvest::error::{ClassifyError, FetchError};
use news_harvest::feeds::{FeedSource, HttpFeedFetcher};
use news_harvest::language::{LanguageClassifier, WhatlangClassifier};
use news_harvest::models::{ArchiveWindow, IngestMode, NOT_AVAILABLE, SourceDescriptor, UNKNOWN_LANGUAGE};
use news_harvest::pipeline::{Coordinator, CoordinatorConfig, SourceOutcome};
use news_harvest::retry::RetryFetch;
use std::time::Duration;

/// Everything is English except text mentioning "Tempête".
struct Stub;

impl LanguageClassifier for Stub {
    fn detect(&self, text: &str) -> Result<String, ClassifyError> {
        if text.contains("Tempête") {
            Ok("fr".to_string())
        } else {
            Ok("en".to_string())
        }
    }
}

fn window() -> ArchiveWindow {
    ArchiveWindow {
        from: chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        to: chrono::NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
    }
}

fn fetcher(server: &FakeFeedServer, timeout: Duration) -> HttpFeedFetcher {
    HttpFeedFetcher::new(timeout, &server.base_url()).unwrap()
}

#[tokio::test]
async fn live_fetch_reports_status_and_timeout() {
    let server = FakeFeedServer::start().await.unwrap();
    server.serve("/down.xml", 503, "").await;
    server
        .serve_slowly("/slow.xml", &rss(&[("Late", "Late")]), Duration::from_secs(3))
        .await;
    server.serve("/junk.xml", 200, "<html>not a feed</html>").await;

    let fetcher = fetcher(&server, Duration::from_millis(300));

    match fetcher.fetch_live(&server.url("/down.xml")).await {
        Err(FetchError::Http { status, .. }) => assert_eq!(status, 503),
        other => panic!("expected HTTP error, got {other:?}"),
    }
    assert!(
        fetcher
            .fetch_live(&server.url("/slow.xml"))
            .await
            .unwrap_err()
            .is_timeout()
    );
    assert!(fetcher.fetch_live(&server.url("/junk.xml")).await.unwrap().is_empty());
}

#[tokio::test]
async fn live_run_dedups_and_isolates_failures() {
    let server = FakeFeedServer::start().await.unwrap();
    server
        .serve(
            "/x.xml",
            200,
            &rss(&[
                ("Storm hits coast", "A powerful storm made landfall overnight."),
                ("Storm hits coast", "Repeated in the same feed."),
                ("Markets rally", "Stocks climbed for a third day."),
            ]),
        )
        .await;
    server
        .serve(
            "/z.xml",
            200,
            &rss(&[
                ("  Storm hits coast  ", "Same story from another outlet."),
                ("Tempête sur la côte", "Tempête violente cette nuit."),
            ]),
        )
        .await;
    server
        .serve_slowly("/y.xml", &rss(&[("Never seen", "Never seen")]), Duration::from_secs(3))
        .await;

    let sources = vec![
        SourceDescriptor::new("X", &server.url("/x.xml"), "Xland"),
        SourceDescriptor::new("Y", &server.url("/y.xml"), "Yland"),
        SourceDescriptor::new("Z", &server.url("/z.xml"), "Zland"),
        SourceDescriptor::new("Gone", &server.url("/gone.xml"), "Nowhere"),
    ];
    let coordinator = Coordinator::new(
        fetcher(&server, Duration::from_millis(300)),
        Stub,
        CoordinatorConfig::default(),
    );

    let (agg, report) = coordinator.run(&sources).await;

    assert_eq!(agg.items.iter().filter(|i| i.title == "Storm hits coast").count(), 1);
    assert_eq!(agg.len(), 3);
    assert!(agg.items.iter().all(|i| i.source != "Y"));
    assert!(agg.items.iter().all(|i| !i.language.is_empty()));
    assert!(agg.items.iter().all(|i| i.url != NOT_AVAILABLE));
    assert!(
        agg.items
            .iter()
            .all(|i| i.publication_date == "Fri, 05 Jan 2024 08:30:00 GMT")
    );
    assert_eq!(agg.by_language["fr"].len(), 1);
    assert_eq!(agg.by_language.values().map(Vec::len).sum::<usize>(), agg.len());

    assert_eq!(report.succeeded(), 2);
    assert_eq!(report.failed(), 2);
    match &report.get("Y").unwrap().outcome {
        SourceOutcome::Failed { error } => assert!(error.contains("timed out"), "{error}"),
        other => panic!("unexpected outcome {other:?}"),
    }
    match &report.get("Gone").unwrap().outcome {
        SourceOutcome::Failed { error } => assert!(error.contains("HTTP 404"), "{error}"),
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[tokio::test]
async fn historical_run_replays_snapshots_in_index_order() {
    let server = FakeFeedServer::start().await.unwrap();
    let endpoint = "http://news.example/world.xml";
    server
        .captures(endpoint, &["20240105000000", "20240207000000"])
        .await;
    server
        .serve(
            &FakeFeedServer::replay_path("20240105000000", endpoint),
            200,
            &rss(&[("Storm hits coast", "January capture.")]),
        )
        .await;
    server
        .serve(
            &FakeFeedServer::replay_path("20240207000000", endpoint),
            200,
            &rss(&[
                ("Storm hits coast", "Still on the front page in February."),
                ("Markets rally", "February capture."),
            ]),
        )
        .await;

    let sources = vec![SourceDescriptor::new("World", endpoint, "Earth")];
    let config = CoordinatorConfig {
        mode: IngestMode::Historical(window()),
        ..Default::default()
    };
    let coordinator = Coordinator::new(fetcher(&server, Duration::from_secs(5)), Stub, config);

    let (agg, report) = coordinator.run(&sources).await;

    let titles: Vec<&str> = agg.items.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, vec!["Storm hits coast", "Markets rally"]);
    assert_eq!(agg.items[0].summary, "January capture.");

    let world = report.get("World").unwrap();
    assert_eq!(world.outcome, SourceOutcome::Completed);
    assert_eq!((world.snapshots, world.admitted, world.duplicates), (2, 2, 1));

    let replays: Vec<String> = server
        .hits()
        .await
        .into_iter()
        .filter(|p| p.starts_with("/web/"))
        .collect();
    assert_eq!(
        replays,
        vec![
            FakeFeedServer::replay_path("20240105000000", endpoint),
            FakeFeedServer::replay_path("20240207000000", endpoint),
        ]
    );
}

#[tokio::test]
async fn historical_lookup_failures_are_not_fatal() {
    let server = FakeFeedServer::start().await.unwrap();
    let broken = "http://news.example/broken.xml";
    let empty = "http://news.example/empty.xml";
    server.captures_fail(broken, 500).await;

    let sources = vec![
        SourceDescriptor::new("Broken", broken, "Earth"),
        SourceDescriptor::new("Empty", empty, "Earth"),
    ];
    let config = CoordinatorConfig {
        mode: IngestMode::Historical(window()),
        ..Default::default()
    };
    let coordinator = Coordinator::new(
        RetryFetch::new(fetcher(&server, Duration::from_secs(5)), 1, Duration::from_millis(10)),
        WhatlangClassifier,
        config,
    );

    let (agg, report) = coordinator.run(&sources).await;

    assert!(agg.is_empty());
    assert_eq!(report.get("Broken").unwrap().outcome, SourceOutcome::NoSnapshots);
    assert_eq!(report.get("Empty").unwrap().outcome, SourceOutcome::NoSnapshots);
    assert_eq!(report.failed(), 0);
}

#[tokio::test]
async fn whatlang_classifies_live_entries() {
    let server = FakeFeedServer::start().await.unwrap();
    server
        .serve(
            "/mixed.xml",
            200,
            &rss(&[
                (
                    "Central bank raises rates",
                    "The central bank raised interest rates again on Thursday, surprising economists who had expected a pause.",
                ),
                (
                    "El gobierno anuncia medidas",
                    "El gobierno anunció este lunes un nuevo paquete de medidas económicas para contener la inflación en todo el país.",
                ),
                ("", ""),
            ]),
        )
        .await;

    let sources = vec![SourceDescriptor::new("Mixed", &server.url("/mixed.xml"), "Earth")];
    let coordinator = Coordinator::new(
        fetcher(&server, Duration::from_secs(5)),
        WhatlangClassifier,
        CoordinatorConfig::default(),
    );

    let (agg, _) = coordinator.run(&sources).await;

    assert_eq!(agg.by_language["en"][0].title, "Central bank raises rates");
    assert_eq!(agg.by_language["es"][0].title, "El gobierno anuncia medidas");
    assert!(
        agg.by_language
            .get(UNKNOWN_LANGUAGE)
            .is_some_and(|items| items.len() == 1)
    );
}
