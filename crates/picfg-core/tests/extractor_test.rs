#![allow(clippy::unwrap_used)]
// Integration tests for the extraction workflow against a wiremock Prime.

use std::time::Duration;

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use picfg_core::{
    ConfigVersionId, CoreError, ExtractProgress, Extractor, ExtractorConfig, FileState,
};

// ── Helpers ─────────────────────────────────────────────────────────

const LISTING: &str = "/webacs/api/v1/data/ConfigVersions.xml";
const EXTRACT: &str = "/webacs/api/v1/op/configArchiveService/extractSanitizedFile.xml";

async fn setup(page_size: u32) -> (MockServer, Extractor) {
    let server = MockServer::start().await;
    let mut config = ExtractorConfig::new(
        Url::parse(&server.uri()).unwrap(),
        "admin",
        SecretString::from("secret".to_string()),
    );
    config.request_delay = Duration::ZERO;
    config.page_size = page_size;
    let extractor = Extractor::connect(&config).unwrap();
    (server, extractor)
}

fn listing_xml(count: u64, ids: &[&str]) -> String {
    let entities: String = ids
        .iter()
        .map(|id| format!(r#"<entityId type="ConfigVersions">{id}</entityId>"#))
        .collect();
    format!(r#"<?xml version="1.0"?><queryResponse type="ConfigVersions" count="{count}">{entities}</queryResponse>"#)
}

fn version_xml(ip: &str, name: &str, files: &[(&str, &str, &str)]) -> String {
    let infos: String = files
        .iter()
        .map(|(id, state, kind)| {
            format!("<fileInfo><fileId>{id}</fileId><fileState>{state}</fileState><fileType>{kind}</fileType></fileInfo>")
        })
        .collect();
    format!(
        "<queryResponse><entity><configVersionsDTO>\
         <deviceIpAddress>{ip}</deviceIpAddress><deviceName>{name}</deviceName>\
         <fileInfos>{infos}</fileInfos>\
         </configVersionsDTO></entity></queryResponse>"
    )
}

fn file_xml(config: &str) -> String {
    format!("<mgmtResponse><extractFileResult><fileData>{config}</fileData></extractFileResult></mgmtResponse>")
}

async fn mount_page(server: &MockServer, first: u64, max: u64, body: String) {
    Mock::given(method("GET"))
        .and(path(LISTING))
        .and(query_param(".firstResult", first.to_string()))
        .and(query_param(".maxResults", max.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_version(server: &MockServer, id: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(format!("/webacs/api/v1/data/ConfigVersions/{id}.xml")))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn mount_file(server: &MockServer, file_id: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(EXTRACT))
        .and(query_param("fileId", file_id))
        .respond_with(response)
        .mount(server)
        .await;
}

// ── End-to-end scenario ─────────────────────────────────────────────

#[tokio::test]
async fn test_startup_kept_binary_skipped_failed_fetch_dropped() {
    let (server, extractor) = setup(100).await;

    mount_page(&server, 0, 100, listing_xml(2, &["A", "B"])).await;
    mount_version(
        &server,
        "A",
        version_xml(
            "10.0.0.1",
            "edge-a",
            &[
                ("A1", "STARTUPCONFIG", "STARTUPCONFIG"),
                ("A2", "BINARY", "VLAN"),
            ],
        ),
    )
    .await;
    mount_version(
        &server,
        "B",
        version_xml("10.0.0.2", "edge-b", &[("B1", "RUNNINGCONFIG", "RUNNINGCONFIG")]),
    )
    .await;
    mount_file(
        &server,
        "A1",
        ResponseTemplate::new(200).set_body_string(file_xml("hostname edge-a\n!\nend\n")),
    )
    .await;
    mount_file(&server, "B1", ResponseTemplate::new(500)).await;

    let results = extractor.extract().await.unwrap();

    assert_eq!(results.len(), 1);
    let only = &results[0];
    assert_eq!(only.device_id, ConfigVersionId::new("A"));
    assert_eq!(only.device_ip, "10.0.0.1");
    assert_eq!(only.device_name, "edge-a");
    assert_eq!(only.file_id, "A1");
    assert_eq!(only.file_state, FileState::StartupConfig);
    assert_eq!(only.file_type, "STARTUPCONFIG");
    assert_eq!(only.config, "hostname edge-a\n!\nend\n");

    // The binary file is never requested.
    let requested_binary = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .any(|r| r.url.query().is_some_and(|q| q.contains("fileId=A2")));
    assert!(!requested_binary);
}

#[tokio::test]
async fn test_empty_file_type_does_not_abort_run() {
    let (server, extractor) = setup(100).await;

    mount_page(&server, 0, 100, listing_xml(1, &["A"])).await;
    mount_version(
        &server,
        "A",
        "<queryResponse><entity><configVersionsDTO>\
         <deviceIpAddress>10.0.0.1</deviceIpAddress><deviceName>edge-a</deviceName>\
         <fileInfos>\
         <fileInfo><fileId>A1</fileId><fileState>BINARY</fileState><fileType/></fileInfo>\
         <fileInfo><fileId>A2</fileId><fileState>STARTUPCONFIG</fileState><fileType>STARTUPCONFIG</fileType></fileInfo>\
         </fileInfos>\
         </configVersionsDTO></entity></queryResponse>"
            .into(),
    )
    .await;
    mount_file(
        &server,
        "A2",
        ResponseTemplate::new(200).set_body_string(file_xml("hostname edge-a\n")),
    )
    .await;

    let results = extractor.extract().await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].file_id, "A2");
    assert_eq!(results[0].file_state, FileState::StartupConfig);
    assert_eq!(results[0].config, "hostname edge-a\n");
}

#[tokio::test]
async fn test_results_follow_version_then_file_order() {
    let (server, extractor) = setup(100).await;

    mount_page(&server, 0, 100, listing_xml(2, &["20", "10"])).await;
    mount_version(
        &server,
        "20",
        version_xml(
            "10.0.0.20",
            "b",
            &[
                ("r20", "RUNNINGCONFIG", "RUNNINGCONFIG"),
                ("s20", "STARTUPCONFIG", "STARTUPCONFIG"),
            ],
        ),
    )
    .await;
    mount_version(
        &server,
        "10",
        version_xml("10.0.0.10", "a", &[("s10", "STARTUPCONFIG", "STARTUPCONFIG")]),
    )
    .await;
    for id in ["r20", "s20", "s10"] {
        mount_file(
            &server,
            id,
            ResponseTemplate::new(200).set_body_string(file_xml(id)),
        )
        .await;
    }

    let files: Vec<String> = extractor
        .extract()
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.file_id)
        .collect();
    assert_eq!(files, ["r20", "s20", "s10"]);
}

// ── Stage A: paging ─────────────────────────────────────────────────

#[tokio::test]
async fn test_paging_collects_every_id_once() {
    let (server, extractor) = setup(100).await;

    let all: Vec<String> = (0..250).map(|i| format!("v{i}")).collect();
    let page = |range: std::ops::Range<usize>| {
        let ids: Vec<&str> = all[range].iter().map(String::as_str).collect();
        listing_xml(250, &ids)
    };

    mount_page(&server, 0, 100, page(0..100)).await;
    mount_page(&server, 100, 200, page(100..200)).await;
    mount_page(&server, 200, 300, page(200..250)).await;

    let ids = extractor.list_version_ids().await.unwrap();

    let expected: Vec<ConfigVersionId> = all.iter().map(|s| ConfigVersionId::new(s.as_str())).collect();
    assert_eq!(ids, expected);
}

#[tokio::test]
async fn test_overlapping_pages_are_deduplicated() {
    let (server, extractor) = setup(2).await;

    // Servers that read `.maxResults` as a page size return overlapping windows.
    mount_page(&server, 0, 2, listing_xml(3, &["1", "2"])).await;
    mount_page(&server, 2, 4, listing_xml(3, &["2", "3"])).await;

    let ids = extractor.list_version_ids().await.unwrap();
    assert_eq!(ids, vec!["1".into(), "2".into(), ConfigVersionId::new("3")]);
}

#[tokio::test]
async fn test_zero_count_makes_a_single_request() {
    let (server, extractor) = setup(100).await;

    mount_page(&server, 0, 100, listing_xml(0, &[])).await;

    let results = extractor.extract().await.unwrap();
    assert!(results.is_empty());
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_exact_multiple_of_page_size_stops_on_time() {
    let (server, extractor) = setup(2).await;

    mount_page(&server, 0, 2, listing_xml(4, &["1", "2"])).await;
    mount_page(&server, 2, 4, listing_xml(4, &["3", "4"])).await;

    let ids = extractor.list_version_ids().await.unwrap();
    assert_eq!(ids.len(), 4);
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_shrinking_count_is_accepted() {
    let (server, extractor) = setup(2).await;

    mount_page(&server, 0, 2, listing_xml(6, &["1", "2"])).await;
    // Records were deleted meanwhile: the new count ends the loop early.
    mount_page(&server, 2, 4, listing_xml(3, &["3"])).await;

    let ids = extractor.list_version_ids().await.unwrap();
    assert_eq!(ids, vec!["1".into(), "2".into(), ConfigVersionId::new("3")]);
}

#[tokio::test]
async fn test_zero_page_size_is_rejected() {
    let (_server, extractor) = setup(0).await;

    let err = extractor.list_version_ids().await.unwrap_err();
    assert!(matches!(err, CoreError::Config { .. }), "got: {err:?}");
}

// ── Fatal failures ──────────────────────────────────────────────────

#[tokio::test]
async fn test_listing_auth_failure_is_fatal() {
    let (server, extractor) = setup(100).await;

    Mock::given(method("GET"))
        .and(path(LISTING))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = extractor.extract().await.unwrap_err();
    assert!(
        matches!(err, CoreError::Api(picfg_api::Error::Authentication { .. })),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn test_malformed_version_record_aborts_run() {
    let (server, extractor) = setup(100).await;

    mount_page(&server, 0, 100, listing_xml(2, &["A", "B"])).await;
    mount_version(
        &server,
        "A",
        "<queryResponse><deviceIpAddress>10.0.0.1</deviceIpAddress></queryResponse>".into(),
    )
    .await;
    mount_version(&server, "B", version_xml("10.0.0.2", "b", &[])).await;

    let err = extractor.extract().await.unwrap_err();
    assert!(
        matches!(&err, CoreError::MissingField { field, .. } if field == "deviceName"),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn test_missing_version_detail_is_fatal() {
    let (server, extractor) = setup(100).await;

    mount_page(&server, 0, 100, listing_xml(1, &["gone"])).await;

    let err = extractor.extract().await.unwrap_err();
    assert!(
        err.api_error().is_some_and(picfg_api::Error::is_not_found),
        "got: {err:?}"
    );
}

// ── Stage C: tolerated failures ─────────────────────────────────────

#[tokio::test]
async fn test_every_content_failure_is_skipped() {
    let (server, extractor) = setup(100).await;

    mount_page(&server, 0, 100, listing_xml(1, &["A"])).await;
    mount_version(
        &server,
        "A",
        version_xml(
            "10.0.0.1",
            "a",
            &[
                ("missing", "RUNNINGCONFIG", "RUNNINGCONFIG"),
                ("empty", "RUNNINGCONFIG", "RUNNINGCONFIG"),
                ("broken", "STARTUPCONFIG", "STARTUPCONFIG"),
                ("denied", "STARTUPCONFIG", "STARTUPCONFIG"),
                ("ok", "STARTUPCONFIG", "STARTUPCONFIG"),
            ],
        ),
    )
    .await;
    mount_file(&server, "missing", ResponseTemplate::new(404)).await;
    mount_file(
        &server,
        "empty",
        ResponseTemplate::new(200).set_body_string("<mgmtResponse><fileData/></mgmtResponse>"),
    )
    .await;
    mount_file(
        &server,
        "broken",
        ResponseTemplate::new(200).set_body_string("<mgmtResponse>"),
    )
    .await;
    mount_file(&server, "denied", ResponseTemplate::new(403)).await;
    mount_file(
        &server,
        "ok",
        ResponseTemplate::new(200).set_body_string(file_xml("hostname a")),
    )
    .await;

    let mut failed = Vec::new();
    let results = extractor
        .extract_with_progress(|event| {
            if let ExtractProgress::FileFailed { file_id, .. } = event {
                failed.push(file_id.to_owned());
            }
        })
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].file_id, "ok");
    assert_eq!(failed, ["missing", "empty", "broken", "denied"]);
}

#[tokio::test]
async fn test_progress_reports_each_device() {
    let (server, extractor) = setup(100).await;

    mount_page(&server, 0, 100, listing_xml(2, &["A", "B"])).await;
    mount_version(&server, "A", version_xml("10.0.0.1", "a", &[])).await;
    mount_version(&server, "B", version_xml("10.0.0.2", "b", &[])).await;

    let mut events = Vec::new();
    extractor
        .extract_with_progress(|event| {
            events.push(match event {
                ExtractProgress::Listed { total } => format!("listed {total}"),
                ExtractProgress::Device { index, total, id } => format!("{index}/{total} {id}"),
                ExtractProgress::FileFailed { file_id, .. } => format!("failed {file_id}"),
            });
        })
        .await
        .unwrap();

    assert_eq!(events, ["listed 2", "1/2 A", "2/2 B"]);
}
