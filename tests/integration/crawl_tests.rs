//! Integration tests for the crawler
//!
//! These tests use wiremock to stand in for the dictionary site and run the
//! full discover, extract and store cycle end-to-end against a temporary
//! data directory.

use dict_ripple::config::{Config, CrawlerConfig, OutputConfig, SourceConfig, UserAgentConfig};
use dict_ripple::crawler::{Coordinator, CrawlOptions, ExtractOutcome};
use dict_ripple::output::MemorySink;
use dict_ripple::Mode;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing every endpoint at `base`
fn create_test_config(base: &str, dir: &Path) -> Config {
    Config {
        crawler: CrawlerConfig {
            request_delay_ms: 0,
            branch_threshold: 9,
            relation_depth: 2,
            modes: vec![Mode::EnKh],
        },
        source: SourceConfig {
            english_search_url: format!("{}/search_en.php", base),
            khmer_search_url: format!("{}/search_kh.php", base),
            detail_url: format!("{}/word.php", base),
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        output: OutputConfig {
            data_dir: dir.join("data").to_string_lossy().into_owned(),
            activity_log: dir.join("activity.log").to_string_lossy().into_owned(),
        },
    }
}

fn seeds(mode: Mode, prefixes: &[&str]) -> CrawlOptions {
    CrawlOptions {
        modes: vec![mode],
        seeds: prefixes.iter().map(|p| p.to_string()).collect(),
    }
}

/// Detail page with one Khmer text definition and optional synonyms
fn detail_page(gloss: &str, synonyms: &[&str]) -> String {
    let links: String = synonyms
        .iter()
        .map(|s| format!(r#"<a href="word.php?word={0}">{0}</a> "#, s))
        .collect();
    format!(
        r#"<html><body><table>
            <tr><td colspan="2"><b>Definition:</b></td></tr>
            <tr>
                <td><font size="2"><i>noun</i></font></td>
                <td class="khmer">1. {}</td>
            </tr>
            <tr><td colspan="2"><b>Synonym:</b> {}</td></tr>
        </table></body></html>"#,
        gloss, links
    )
}

async fn mount_search(server: &MockServer, endpoint: &str, prefix: &str, words: &[&str]) {
    let body: String = words
        .iter()
        .map(|w| format!(r#"<a href="word.php?word={0}">{0}</a>"#, w))
        .collect();
    Mock::given(method("GET"))
        .and(path(endpoint))
        .and(query_param("q", prefix))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn mount_word(server: &MockServer, word: &str, body: String, expected: u64) {
    Mock::given(method("GET"))
        .and(path("/word.php"))
        .and(query_param("word", word))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(expected)
        .mount(server)
        .await;
}

/// Query values of every request the server saw on `endpoint`
async fn queried(server: &MockServer, endpoint: &str, key: &str) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.url.path() == endpoint)
        .filter_map(|r| {
            r.url
                .query_pairs()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.into_owned())
        })
        .collect()
}

#[tokio::test]
async fn test_small_result_is_not_expanded() {
    let server = MockServer::start().await;
    mount_search(&server, "/search_en.php", "a", &["apple", "ant"]).await;
    mount_word(&server, "apple", detail_page("ផ្លែប៉ោម", &[]), 1).await;
    mount_word(&server, "ant", detail_page("ស្រមោច", &[]), 1).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), dir.path());
    let coordinator = Coordinator::with_sink(&config, Arc::new(MemorySink::new())).unwrap();

    let report = coordinator.run(&seeds(Mode::EnKh, &["a"])).await;

    assert_eq!(queried(&server, "/search_en.php", "q").await, vec!["a"]);
    assert_eq!(report.visited, 2);
    assert_eq!(report.fetched, 2);
    assert!(dir.path().join("data/en_kh/apple.json").is_file());
    assert!(dir.path().join("data/en_kh/ant.json").is_file());
}

#[tokio::test]
async fn test_second_run_is_all_cache_hits() {
    let server = MockServer::start().await;
    mount_search(&server, "/search_en.php", "a", &["apple", "ant"]).await;
    // Each detail page may be requested once across both runs
    mount_word(&server, "apple", detail_page("ផ្លែប៉ោម", &[]), 1).await;
    mount_word(&server, "ant", detail_page("ស្រមោច", &[]), 1).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), dir.path());

    let first_sink = Arc::new(MemorySink::new());
    let first = Coordinator::with_sink(&config, first_sink.clone())
        .unwrap()
        .run(&seeds(Mode::EnKh, &["a"]))
        .await;
    let record = dir.path().join("data/en_kh/apple.json");
    let before = std::fs::read(&record).unwrap();

    let second_sink = Arc::new(MemorySink::new());
    let second = Coordinator::with_sink(&config, second_sink.clone())
        .unwrap()
        .run(&seeds(Mode::EnKh, &["a"]))
        .await;

    assert_eq!(first.fetched, 2);
    assert_eq!(second.fetched, 0);
    assert_eq!(second.cached, 2);
    assert_eq!(second_sink.count("stored"), 0);
    assert_eq!(second_sink.count("fetch"), 0);
    assert_eq!(second_sink.count("skip"), 2);
    assert_eq!(std::fs::read(&record).unwrap(), before);
}

#[tokio::test]
async fn test_full_result_expands_prefix() {
    let server = MockServer::start().await;
    let words: Vec<String> = (1..=9).map(|i| format!("word{}", i)).collect();
    let word_refs: Vec<&str> = words.iter().map(String::as_str).collect();
    mount_search(&server, "/search_en.php", "xyz", &word_refs).await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&server.uri(), dir.path());
    config.crawler.relation_depth = 1;
    let coordinator = Coordinator::with_sink(&config, Arc::new(MemorySink::new())).unwrap();

    let report = coordinator.run(&seeds(Mode::EnKh, &["xyz"])).await;

    let prefixes = queried(&server, "/search_en.php", "q").await;
    assert_eq!(prefixes.len(), 1 + 26);
    assert_eq!(prefixes[0], "xyz");
    assert_eq!(prefixes[1], "xyza");
    assert!(prefixes.iter().all(|p| p.chars().count() <= 4));
    // Unmocked detail pages answer 404 and count as failures
    assert_eq!(report.failed, 9);
    assert_eq!(report.prefixes_queried, 27);
}

#[tokio::test]
async fn test_relations_are_followed_one_hop() {
    let server = MockServer::start().await;
    mount_search(&server, "/search_en.php", "bi", &["big"]).await;
    mount_word(&server, "big", detail_page("ធំ", &["large", "big"]), 1).await;
    mount_word(&server, "large", detail_page("ធំធេង", &["vast"]), 1).await;
    mount_word(&server, "vast", detail_page("ធំល្វឹងល្វើយ", &[]), 0).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), dir.path());
    let coordinator = Coordinator::with_sink(&config, Arc::new(MemorySink::new())).unwrap();

    let report = coordinator.run(&seeds(Mode::EnKh, &["bi"])).await;

    assert_eq!(report.relation_words, 1);
    assert_eq!(report.visited, 2);

    let big: serde_json::Value =
        serde_json::from_slice(&std::fs::read(dir.path().join("data/en_kh/big.json")).unwrap())
            .unwrap();
    assert_eq!(big["synonyms"], serde_json::json!(["large"]));
    assert_eq!(big["definitions"][0]["text"], "ធំ");
    assert_eq!(big["definitions"][0]["partOfSpeech"], "noun");
    assert!(dir.path().join("data/en_kh/large.json").is_file());
    assert!(!dir.path().join("data/en_kh/vast.json").exists());
}

#[tokio::test]
async fn test_hello_fixture_with_image_and_audio() {
    let server = MockServer::start().await;
    let page = r#"<html><head>
        <script>var player = new Audio('/sounds/hello.mp3');</script>
        </head><body><table>
            <tr><td colspan="2"><b>Definition:</b></td></tr>
            <tr>
                <td><font size="2"><i>exclamation</i></font></td>
                <td class="khmer"><img src="/images/def/hello_1.gif"></td>
            </tr>
        </table></body></html>"#;
    mount_word(&server, "hello", page.to_string(), 1).await;
    Mock::given(method("GET"))
        .and(path("/images/def/hello_1.gif"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"GIF89a".to_vec()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/sounds/hello.mp3"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ID3".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), dir.path());
    let sink = Arc::new(MemorySink::new());
    let coordinator = Coordinator::with_sink(&config, sink.clone()).unwrap();

    let outcome = coordinator.fetch_word("hello", Mode::EnKh).await;
    let entry = match outcome {
        ExtractOutcome::Fetched(entry) => entry,
        other => panic!("expected a fetched entry, got {:?}", other),
    };

    assert_eq!(entry.definitions.len(), 1);
    let definition = &entry.definitions[0];
    let image_url = format!("{}/images/def/hello_1.gif", server.uri());
    assert_eq!(definition.image_url.as_deref(), Some(image_url.as_str()));
    assert_eq!(definition.example, None);
    assert_eq!(definition.part_of_speech.as_deref(), Some("exclamation"));
    assert_eq!(
        definition.local_image_path.as_deref(),
        Some("media/images/hello_1.gif")
    );
    assert_eq!(
        entry.local_sound_path.as_deref(),
        Some("media/sounds/hello.mp3")
    );
    assert!(dir.path().join("data/media/images/hello_1.gif").is_file());
    assert!(dir.path().join("data/media/sounds/hello.mp3").is_file());

    // Re-extracting is a cache hit with no further requests
    let again = coordinator.fetch_word("hello", Mode::EnKh).await;
    assert_eq!(again, ExtractOutcome::Cached(entry));
    assert_eq!(sink.count("skip"), 1);
    assert_eq!(sink.count("fetch"), 1);
}

#[tokio::test]
async fn test_not_found_is_retried_next_run() {
    let server = MockServer::start().await;
    mount_word(
        &server,
        "qwzx",
        "<html><body><p>Word not found</p></body></html>".to_string(),
        2,
    )
    .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), dir.path());
    let coordinator = Coordinator::with_sink(&config, Arc::new(MemorySink::new())).unwrap();

    assert_eq!(
        coordinator.fetch_word("qwzx", Mode::EnKh).await,
        ExtractOutcome::NotFound
    );
    assert_eq!(
        coordinator.fetch_word("qwzx", Mode::EnKh).await,
        ExtractOutcome::NotFound
    );
    assert!(!dir.path().join("data/en_kh/qwzx.json").exists());
}

#[tokio::test]
async fn test_khmer_mode_uses_khmer_index() {
    let server = MockServer::start().await;
    mount_search(&server, "/search_kh.php", "ក", &["កា"]).await;
    Mock::given(method("GET"))
        .and(path("/word.php"))
        .and(query_param("mode", "3"))
        .and(query_param("word", "កា"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<table>
                <tr><td><b>Definition:</b></td></tr>
                <tr><td class="english">1. neck <font color="gray" face="Arial">Ex: a long neck</font></td></tr>
            </table>"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), dir.path());
    let coordinator = Coordinator::with_sink(&config, Arc::new(MemorySink::new())).unwrap();

    let report = coordinator.run(&seeds(Mode::KhEn, &["ក"])).await;

    assert_eq!(report.fetched, 1);
    assert!(queried(&server, "/search_en.php", "q").await.is_empty());

    let record: serde_json::Value =
        serde_json::from_slice(&std::fs::read(dir.path().join("data/kh_en/កា.json")).unwrap())
            .unwrap();
    assert_eq!(record["mode"], "KH_EN");
    assert_eq!(record["definitions"][0]["text"], "neck");
    assert_eq!(record["definitions"][0]["example"], "a long neck");
}

#[tokio::test]
async fn test_activity_log_lines_are_timestamped() {
    let server = MockServer::start().await;
    mount_search(&server, "/search_en.php", "a", &["apple"]).await;
    mount_word(&server, "apple", detail_page("ផ្លែប៉ោម", &[]), 1).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), dir.path());
    let coordinator = Coordinator::new(&config).unwrap();

    coordinator.run(&seeds(Mode::EnKh, &["a"])).await;

    let log = std::fs::read_to_string(dir.path().join("activity.log")).unwrap();
    let lines: Vec<&str> = log.lines().collect();
    assert!(!lines.is_empty());

    for line in &lines {
        let (timestamp, rest) = line.split_once(' ').unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok(), "{}", line);
        assert!(rest.starts_with('['), "{}", line);
    }

    let kinds: Vec<&str> = lines
        .iter()
        .filter_map(|l| l.split_once('[').and_then(|(_, r)| r.split_once(']')))
        .map(|(kind, _)| kind)
        .collect();
    assert_eq!(kinds.first(), Some(&"batch-start"));
    assert_eq!(kinds.last(), Some(&"batch-end"));
    assert!(kinds.contains(&"fetch"));
    assert!(kinds.contains(&"stored"));
}
