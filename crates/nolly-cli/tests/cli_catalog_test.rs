#![allow(clippy::unwrap_used)]
#![allow(missing_docs)]

use assert_cmd::cargo_bin_cmd;
use predicates::prelude::predicate;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn test_movies_popular_help() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("nolly");
    cmd.args(["movies", "popular", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--pages"));
}

#[test]
fn test_movies_popular_requires_token() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("nolly");
    cmd.env_remove("NOLLY_TMDB_TOKEN")
        .args(["movies", "popular", "--dir"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "NOLLY_TMDB_TOKEN environment variable is required",
        ));
}

#[test]
fn test_movies_pages_out_of_range() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("nolly");
    cmd.args(["movies", "popular", "--pages", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--pages"));
}

#[test]
fn test_movie_details_missing_id() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("nolly");
    cmd.args(["movie", "details"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--id"));
}

#[test]
fn test_search_missing_query() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("nolly");
    cmd.args(["search"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--query"));
}

#[tokio::test]
async fn test_movies_popular_against_mock_server() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/3/movie/popular"))
        .and(query_param("page", "1"))
        .and(header("Authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            include_str!("../../../fixtures/catalog/movie_popular_page1.json"),
            "application/json",
        ))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/3/genre/movie/list"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            include_str!("../../../fixtures/catalog/genre_movie_list.json"),
            "application/json",
        ))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        format!("[catalog]\nbase_url = \"{}/3/\"\n", server.uri()),
    )
    .unwrap();
    let dir_path = dir.path().to_path_buf();

    // Act
    let assert = tokio::task::spawn_blocking(move || {
        let mut cmd = cargo_bin_cmd!("nolly");
        cmd.env("NOLLY_TMDB_TOKEN", "test-token")
            .env("RUST_LOG", "info")
            .env_remove("OTEL_EXPORTER_OTLP_ENDPOINT")
            .args(["movies", "popular", "--dir"])
            .arg(&dir_path)
            .assert()
    })
    .await
    .unwrap();

    // Assert
    assert
        .success()
        .stdout(predicate::str::contains("Deadpool & Wolverine"))
        .stdout(predicate::str::contains("of 902441 results"));
}
