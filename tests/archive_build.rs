//! End-to-end builds of the fixture archive.
//!
//! The fixture (`fixtures/archive.json` + `fixtures/config.toml`) is a small
//! two-folder list with a reply chain, a deleted spam message and an
//! attachment. Each test renders it into a fresh temporary directory.

use mailarc::config::{self, RenderConfig};
use mailarc::generate::{self, GenerateReport, Options};
use mailarc::labels;
use mailarc::types::DeleteLevel;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tempfile::TempDir;
use walkdir::WalkDir;

const LIVE: [u32; 5] = [0, 1, 2, 3, 5];
const DELETED: u32 = 4;
const FOLDERS: [&str; 2] = ["2024/05/", "2024/06/"];

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

fn fixture_config() -> RenderConfig {
    config::load_config(&fixtures()).unwrap()
}

fn build(config: &RenderConfig, out: &Path) -> GenerateReport {
    let archive = generate::load_archive(&fixtures()).unwrap();
    generate::generate(&archive, config, out, Options::default()).unwrap()
}

fn read(out: &Path, rel: &str) -> String {
    fs::read_to_string(out.join(rel)).unwrap_or_else(|e| panic!("{rel}: {e}"))
}

/// Every file under `dir` with its bytes and modification time.
fn snapshot(dir: &Path) -> BTreeMap<PathBuf, (Vec<u8>, SystemTime)> {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let bytes = fs::read(e.path()).unwrap();
            let mtime = e.metadata().unwrap().modified().unwrap();
            (e.path().strip_prefix(dir).unwrap().to_path_buf(), (bytes, mtime))
        })
        .collect()
}

#[test]
fn fixture_builds_every_page() {
    let tmp = TempDir::new().unwrap();
    let report = build(&fixture_config(), tmp.path());
    let out = tmp.path();

    for rel in [
        "index.html",
        "summary.html",
        "archive_overview.haof",
        "msgindex.txt",
        "202405bydate.html",
        "202406byauthor.html",
        "2024/05/index.html",
        "2024/05/date.html",
        "2024/05/archive_overview.haof",
        "2024/05/0000.html",
        "2024/06/0005.html",
    ] {
        assert!(out.join(rel).exists(), "{rel} missing");
    }
    assert_eq!(report.messages, 6);
    assert_eq!(report.live, 5);
    assert_eq!(report.articles.written, 6);
    assert!(report.store_saved);
}

/// Each live message is listed exactly once per ordering, across folders.
#[test]
fn live_messages_listed_once_per_index() {
    let tmp = TempDir::new().unwrap();
    build(&fixture_config(), tmp.path());

    for index in ["date.html", "subject.html", "author.html", "index.html"] {
        let pages: Vec<String> = FOLDERS
            .iter()
            .map(|folder| read(tmp.path(), &format!("{folder}{index}")))
            .collect();
        for num in LIVE {
            let anchor = format!("id=\"msg{num}\"");
            let seen: usize = pages.iter().map(|page| page.matches(&anchor).count()).sum();
            assert_eq!(seen, 1, "message {num} in {index}");
        }
        let anchor = format!("id=\"msg{DELETED}\"");
        assert!(pages.iter().all(|page| !page.contains(&anchor)), "deleted message in {index}");
    }
}

#[test]
fn period_indices_list_their_month() {
    let tmp = TempDir::new().unwrap();
    build(&fixture_config(), tmp.path());
    let may = read(tmp.path(), "202405bydate.html");
    assert!(may.contains("id=\"msg0\""));
    assert!(may.contains("id=\"msg2\""));
    assert!(!may.contains("id=\"msg3\""));
    let summary = read(tmp.path(), "summary.html");
    assert!(summary.contains("June 2024"));
}

#[test]
fn unchanged_rerun_touches_nothing() {
    let tmp = TempDir::new().unwrap();
    let config = fixture_config();
    build(&config, tmp.path());
    let before = snapshot(tmp.path());

    let report = build(&config, tmp.path());
    let after = snapshot(tmp.path());

    assert_eq!(before.keys().collect::<Vec<_>>(), after.keys().collect::<Vec<_>>());
    for (path, (bytes, mtime)) in &before {
        let (new_bytes, new_mtime) = &after[path];
        assert_eq!(bytes, new_bytes, "{} changed", path.display());
        assert_eq!(mtime, new_mtime, "{} rewritten", path.display());
    }
    assert_eq!(report.pages_changed(), 0);
    assert!(report.new_articles.is_empty());
}

#[test]
fn deleted_body_hidden_at_default_level() {
    let tmp = TempDir::new().unwrap();
    build(&fixture_config(), tmp.path());
    let page = read(tmp.path(), "2024/06/0004.html");
    assert!(page.contains(labels::MESSAGE_DELETED));
    assert!(page.contains(labels::SENDER_DELETED) || page.contains("&lt;sender deleted&gt;"));
    assert!(!page.contains("Buy now."));
    assert!(!page.contains("spam@example.net"));
}

#[test]
fn deleted_body_kept_when_leaving_text() {
    let tmp = TempDir::new().unwrap();
    let mut config = fixture_config();
    config.deletion.level = DeleteLevel::LeavesText;
    build(&config, tmp.path());
    assert!(read(tmp.path(), "2024/06/0004.html").contains("Buy now."));
}

#[test]
fn deleted_page_removed_when_removing_files() {
    let tmp = TempDir::new().unwrap();
    let config = fixture_config();
    build(&config, tmp.path());
    assert!(tmp.path().join("2024/06/0004.html").exists());

    let mut removing = config.clone();
    removing.deletion.level = DeleteLevel::RemovesFiles;
    let report = build(&removing, tmp.path());
    assert!(!tmp.path().join("2024/06/0004.html").exists());
    assert_eq!(report.removed, vec!["2024/06/0004.html"]);
}

#[test]
fn reply_chain_links_across_folders() {
    let tmp = TempDir::new().unwrap();
    build(&fixture_config(), tmp.path());
    let reply = read(tmp.path(), "2024/06/0003.html");
    assert!(reply.contains("href=\"../../2024/05/0001.html\""));
    let parent = read(tmp.path(), "2024/05/0001.html");
    assert!(parent.contains("href=\"../../2024/06/0003.html\""));
}

#[test]
fn overview_files_describe_the_archive() {
    let tmp = TempDir::new().unwrap();
    build(&fixture_config(), tmp.path());
    let msgindex = read(tmp.path(), "msgindex.txt");
    assert!(msgindex.starts_with("0000 0005\n0000 2024/05/0000.html\n"));
    let haof = read(tmp.path(), "archive_overview.haof");
    assert_eq!(haof.matches("<mail>").count(), 5);
    assert!(haof.contains("<file>2024/06/0005.html</file>"));
}

#[test]
fn force_rewrites_articles_with_identical_bytes() {
    let tmp = TempDir::new().unwrap();
    let config = fixture_config();
    build(&config, tmp.path());
    let before = read(tmp.path(), "2024/05/0000.html");

    let archive = generate::load_archive(&fixtures()).unwrap();
    let options = Options {
        force: true,
        ..Options::default()
    };
    let report = generate::generate(&archive, &config, tmp.path(), options).unwrap();
    assert_eq!(report.articles.written, 6);
    assert_eq!(read(tmp.path(), "2024/05/0000.html"), before);
}
