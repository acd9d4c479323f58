#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

//! End-to-end retrieval over HTTP: real `Fetcher`, mocked documentation site.

use sfref_core::{
    Coordinator, DocTypeSettings, Fetcher, JobOutcome, ReferenceCache, Registry, RetrievalRequest,
    RetrievalState, Selection, Settings, Target,
};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const APEX_PAGE: &str = r#"<!DOCTYPE html>
<html><body>
<nav><a href="/">Home</a></nav>
<div class="toc">
  <ul>
    <li><a href="apex_ref.htm">Apex Reference</a>
      <ul><li><a href="trig.htm">Trigger</a></li></ul>
    </li>
    <li><a href="soql.htm">SOQL</a></li>
  </ul>
</div>
</body></html>"#;

const CONSOLE_TOC: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<toc>
  <tocentry text="Methods for Primary Tabs" href="sforce_api_console_methods_tabs.htm">
    <tocentry text="openPrimaryTab()" href="sforce_api_console_openprimarytab.htm"/>
  </tocentry>
</toc>"#;

fn settings_for(server: &MockServer) -> Settings {
    let mut settings = Settings {
        fetch_timeout_secs: Some(5),
        ..Settings::default()
    };
    for (name, dir, file) in [
        ("apex", "apex", "apex_dev_guide.htm"),
        ("visualforce", "pages", "pages_intro.htm"),
        ("serviceconsole", "console", "toc.xml"),
    ] {
        settings.doc_types.insert(
            name.to_string(),
            DocTypeSettings {
                source_url: Some(format!("{}/{dir}/{file}", server.uri())),
                base_url: Some(format!("{}/{dir}/", server.uri())),
                ..DocTypeSettings::default()
            },
        );
    }
    settings
}

fn coordinator(settings: Settings) -> Coordinator {
    let registry = Registry::with_settings(&settings);
    let cache = ReferenceCache::with_order(registry.names());
    let fetcher = Fetcher::with_timeout(settings.fetch_timeout()).unwrap();
    Coordinator::new(
        Arc::new(registry),
        Arc::new(cache),
        Arc::new(fetcher),
        Arc::new(settings),
    )
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn all_documentation_survives_a_failing_doc_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/apex/apex_dev_guide.htm"))
        .respond_with(ResponseTemplate::new(200).set_body_string(APEX_PAGE))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pages/pages_intro.htm"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/console/toc.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(CONSOLE_TOC))
        .expect(1)
        .mount(&server)
        .await;

    let coordinator = coordinator(settings_for(&server));
    let report = coordinator
        .retrieve(&RetrievalRequest::warm(Target::All))
        .await
        .unwrap();

    assert_eq!(report.state, RetrievalState::PartialFailure);
    assert_eq!(report.failed(), vec!["VISUALFORCE"]);

    let cache = coordinator.cache();
    assert_eq!(
        cache.titles().await,
        vec![
            "Apex Reference",
            "Trigger",
            "SOQL",
            "Methods for Primary Tabs",
            "openPrimaryTab()",
        ]
    );
    assert!(cache.titles_by_doc_type("VISUALFORCE").await.is_empty());

    let trigger = coordinator
        .resolve(&Target::All, Selection::Index(1))
        .await
        .unwrap();
    assert_eq!(trigger, Some(format!("{}/apex/trig.htm", server.uri())));

    let tab = coordinator
        .resolve(&Target::All, Selection::Index(4))
        .await
        .unwrap();
    assert_eq!(
        tab,
        Some(format!("{}/console/sforce_api_console_openprimarytab.htm", server.uri()))
    );
}

#[tokio::test]
async fn repeated_requests_hit_the_network_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/apex/apex_dev_guide.htm"))
        .respond_with(ResponseTemplate::new(200).set_body_string(APEX_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let coordinator = coordinator(settings_for(&server));
    let request = RetrievalRequest::warm(Target::doc_type("apex"));
    for _ in 0..3 {
        coordinator.retrieve(&request).await.unwrap();
    }
    assert_eq!(coordinator.cache().entries_by_doc_type("APEX").await.len(), 3);
    // `expect(1)` is verified when the server drops.
}

#[tokio::test]
async fn slow_source_times_out_without_touching_the_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/apex/apex_dev_guide.htm"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(APEX_PAGE)
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let mut settings = settings_for(&server);
    settings.fetch_timeout_secs = Some(1);
    let coordinator = coordinator(settings);

    let report = coordinator
        .retrieve(&RetrievalRequest::warm(Target::doc_type("APEX")))
        .await
        .unwrap();
    match &report.outcomes[0].outcome {
        JobOutcome::Failed { error, retryable } => {
            assert!(error.contains("timed out"), "{error}");
            assert!(*retryable);
        },
        other => panic!("expected timeout, got {other:?}"),
    }
    assert!(!coordinator.cache().has("APEX").await);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn overlapping_requests_share_the_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/apex/apex_dev_guide.htm"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(APEX_PAGE)
                .set_delay(Duration::from_millis(100)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pages/pages_intro.htm"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<div id="toc"><a href="pages_compref.htm">Standard Component Reference</a></div>"#,
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/console/toc.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(CONSOLE_TOC))
        .mount(&server)
        .await;

    let coordinator = coordinator(settings_for(&server));
    let background = {
        let coordinator = coordinator.clone();
        tokio::spawn(async move { coordinator.retrieve(&RetrievalRequest::startup()).await })
    };
    let foreground = coordinator
        .retrieve(&RetrievalRequest::warm(Target::doc_type("APEX")))
        .await
        .unwrap();
    let background = background.await.unwrap().unwrap();

    assert_eq!(foreground.state, RetrievalState::Ready);
    assert_eq!(background.state, RetrievalState::Ready);

    // However the two requests interleaved, each doc-type is present once.
    let populated = coordinator.cache().populated().await;
    let names: Vec<_> = populated.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["APEX", "VISUALFORCE", "SERVICECONSOLE"]);
    assert_eq!(coordinator.cache().all_entries().await.len(), 3 + 1 + 2);
}
