//! Integration tests for the TMDB catalog against a mock API.

use marquee::catalog::{Catalog, TmdbCatalog};
use marquee::config::TmdbConfig;
use marquee_common::{CategoryId, MediaKind};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> TmdbConfig {
    TmdbConfig {
        api_key: "test-key".into(),
        base_url: server.uri(),
        ..TmdbConfig::default()
    }
}

#[tokio::test]
async fn discover_sends_genre_sort_and_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/discover/tv"))
        .and(query_param("api_key", "test-key"))
        .and(query_param("language", "en-US"))
        .and(query_param("with_genres", "18"))
        .and(query_param("sort_by", "popularity.desc"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 2,
            "results": [
                { "id": 1396, "name": "Breaking Bad", "backdrop_path": "/bb.jpg", "poster_path": "/bbp.jpg" },
                { "id": 66732, "name": "Stranger Things", "backdrop_path": null, "poster_path": null }
            ],
            "total_pages": 12
        })))
        .expect(1)
        .mount(&server)
        .await;

    let catalog = TmdbCatalog::with_rate_limit(&config_for(&server), 100);
    let page = catalog
        .discover(MediaKind::Tv, CategoryId::new(18), 2)
        .await
        .unwrap();

    assert_eq!(page.page, 2);
    assert_eq!(page.total_pages, Some(12));
    assert!(!page.is_last());
    assert_eq!(page.results.len(), 2);
    assert_eq!(page.results[0].title, "Breaking Bad");
    assert!(page.results[0].has_image());
    assert!(!page.results[1].has_image());
}

#[tokio::test]
async fn discover_movies_uses_movie_path() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/discover/movie"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 1,
            "results": [{ "id": 603, "title": "The Matrix", "backdrop_path": "/m.jpg" }],
            "total_pages": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let catalog = TmdbCatalog::with_rate_limit(&config_for(&server), 100);
    let page = catalog
        .discover(MediaKind::Movie, CategoryId::new(28), 1)
        .await
        .unwrap();

    assert_eq!(page.results[0].title, "The Matrix");
    assert!(page.is_last());
}

#[tokio::test]
async fn genres_lists_categories() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/genre/tv/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "genres": [
                { "id": 18, "name": "Drama" },
                { "id": 35, "name": "Comedy" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let catalog = TmdbCatalog::with_rate_limit(&config_for(&server), 100);
    let genres = catalog.genres(MediaKind::Tv).await.unwrap();

    assert_eq!(genres.len(), 2);
    assert_eq!(genres[0].id, CategoryId::new(18));
    assert_eq!(genres[1].name, "Comedy");
}

#[tokio::test]
async fn retries_after_429() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/genre/movie/list"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "0"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/genre/movie/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "genres": [{ "id": 28, "name": "Action" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let catalog = TmdbCatalog::with_rate_limit(&config_for(&server), 100);
    let genres = catalog.genres(MediaKind::Movie).await.unwrap();
    assert_eq!(genres[0].name, "Action");
}

#[tokio::test]
async fn server_error_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/discover/tv"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let catalog = TmdbCatalog::with_rate_limit(&config_for(&server), 100);
    let err = catalog
        .discover(MediaKind::Tv, CategoryId::new(18), 1)
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("/discover/tv"));
}

#[tokio::test]
async fn missing_api_key_fails_without_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = TmdbConfig {
        api_key: String::new(),
        ..config_for(&server)
    };
    let catalog = TmdbCatalog::new(&config);
    assert!(!catalog.is_available());
    assert!(catalog.genres(MediaKind::Tv).await.is_err());
}
