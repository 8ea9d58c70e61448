//! End-to-end download tests against a mock HTTP server (spec.md §4.5).

use mvx_archive::Algorithm;
use mvx_installer::{ChecksumSource, DownloadError, DownloadPlan, Downloader};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sha256_hex(data: &[u8]) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

#[tokio::test]
async fn downloads_and_writes_file_to_dest() {
    let server = MockServer::start().await;
    let body = b"hello from a fake jdk archive, padded to clear min-size".repeat(32);
    Mock::given(method("GET"))
        .and(path("/archive.tar.gz"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.clone()))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let dest = dir.path().join("archive.tar.gz");
    let plan = DownloadPlan::new("java", "21.0.4", format!("{}/archive.tar.gz", server.uri()), dest.clone())
        .with_min_size(16);

    let downloader = Downloader::new().unwrap();
    let outcome = downloader.download(&plan).await.unwrap();

    assert_eq!(outcome.bytes_written, body.len() as u64);
    assert_eq!(std::fs::read(&dest).unwrap(), body);
}

#[tokio::test]
async fn inline_checksum_mismatch_is_not_retried() {
    let server = MockServer::start().await;
    let body = b"some bytes that do not match the checksum".repeat(8);
    Mock::given(method("GET"))
        .and(path("/file.bin"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let dest = dir.path().join("file.bin");
    let plan = DownloadPlan::new("go", "1.23.0", format!("{}/file.bin", server.uri()), dest.clone())
        .with_min_size(16)
        .with_checksum(ChecksumSource::Inline {
            hex: "0".repeat(64),
            algorithm: Algorithm::Sha256,
        });

    let downloader = Downloader::new().unwrap();
    let err = downloader.download(&plan).await.unwrap_err();

    assert!(matches!(err, DownloadError::Checksum(_)));
    assert!(!dest.exists());
}

#[tokio::test]
async fn inline_checksum_match_succeeds() {
    let server = MockServer::start().await;
    let body = b"a correctly checksummed payload padded out".repeat(8);
    let hex = sha256_hex(&body);
    Mock::given(method("GET"))
        .and(path("/file.bin"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.clone()))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let dest = dir.path().join("file.bin");
    let plan = DownloadPlan::new("node", "20.17.0", format!("{}/file.bin", server.uri()), dest.clone())
        .with_min_size(16)
        .with_checksum(ChecksumSource::Inline {
            hex,
            algorithm: Algorithm::Sha256,
        });

    let downloader = Downloader::new().unwrap();
    let outcome = downloader.download(&plan).await.unwrap();
    assert_eq!(outcome.bytes_written, body.len() as u64);
}

#[tokio::test]
async fn listing_checksum_is_fetched_and_matched() {
    let server = MockServer::start().await;
    let body = b"node binary payload for the listing test, padded".repeat(8);
    let hex = sha256_hex(&body);
    Mock::given(method("GET"))
        .and(path("/node-v20.17.0.tar.gz"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.clone()))
        .mount(&server)
        .await;
    let listing = format!("{hex}  node-v20.17.0.tar.gz\ndeadbeef  some-other-file.tar.gz\n");
    Mock::given(method("GET"))
        .and(path("/SHASUMS256.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let dest = dir.path().join("node-v20.17.0.tar.gz");
    let plan = DownloadPlan::new(
        "node",
        "20.17.0",
        format!("{}/node-v20.17.0.tar.gz", server.uri()),
        dest.clone(),
    )
    .with_min_size(16)
    .with_checksum(ChecksumSource::Listing {
        url: format!("{}/SHASUMS256.txt", server.uri()),
        algorithm: Algorithm::Sha256,
    });

    let downloader = Downloader::new().unwrap();
    let outcome = downloader.download(&plan).await.unwrap();
    assert_eq!(outcome.bytes_written, body.len() as u64);
}

#[tokio::test]
async fn too_small_response_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tiny.bin"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"x".to_vec()))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let dest = dir.path().join("tiny.bin");
    let plan = DownloadPlan::new("go", "1.23.0", format!("{}/tiny.bin", server.uri()), dest.clone())
        .with_min_size(1024);

    let downloader = Downloader::new().unwrap();
    let err = downloader.download(&plan).await.unwrap_err();
    assert!(matches!(err, DownloadError::TooSmall { .. }));
    assert!(!dest.exists());
}

#[tokio::test]
async fn http_error_status_surfaces_as_http_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing.bin"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let dest = dir.path().join("missing.bin");
    let plan = DownloadPlan::new("go", "1.23.0", format!("{}/missing.bin", server.uri()), dest)
        .with_max_retries(0);

    let downloader = Downloader::new().unwrap();
    let err = downloader.download(&plan).await.unwrap_err();
    assert!(matches!(err, DownloadError::HttpStatus { status: 404, .. }));
}

#[tokio::test]
async fn transient_failure_recovers_via_retry() {
    let server = MockServer::start().await;
    let body = b"payload served after one failed attempt, padded".repeat(8);

    Mock::given(method("GET"))
        .and(path("/flaky.bin"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/flaky.bin"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.clone()))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let dest = dir.path().join("flaky.bin");
    let plan = DownloadPlan::new("go", "1.23.0", format!("{}/flaky.bin", server.uri()), dest.clone())
        .with_min_size(16)
        .with_max_retries(3);

    let downloader = Downloader::new().unwrap();
    let outcome = downloader.download(&plan).await.unwrap();
    assert_eq!(outcome.bytes_written, body.len() as u64);
}

#[tokio::test]
async fn check_url_reports_availability() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/exists.bin"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/missing.bin"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let downloader = Downloader::new().unwrap();
    assert!(downloader.check_url(&format!("{}/exists.bin", server.uri())).await);
    assert!(!downloader.check_url(&format!("{}/missing.bin", server.uri())).await);
}
