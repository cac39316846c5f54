use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use movie_rerank::{
    api::{create_router, AppState},
    data::{DemographicTable, GenreTable, ItemTags, RatingStore},
    middleware::request_id::REQUEST_ID_HEADER,
    models::{Candidate, Demographics, Preference, Sex},
    services::{candidates::PrecomputedCandidates, signals::Signals, RecommendationEngine},
    RerankConfig,
};

fn create_test_app() -> Router {
    let ratings = Arc::new(RatingStore::from_preferences(vec![
        Preference::new(1, 10, 5.0),
        Preference::new(2, 10, 4.0),
        Preference::new(2, 20, 2.0),
        Preference::new(3, 303, 4.0),
    ]));

    let candidates = PrecomputedCandidates::new(
        vec![
            (1, Candidate::new(101, 0.9)),
            (1, Candidate::new(202, 0.8)),
            (1, Candidate::new(303, 0.7)),
            (1, Candidate::new(404, 0.6)),
            (1, Candidate::new(505, 0.5)),
            (1, Candidate::new(606, 0.4)),
            (2, Candidate::new(101, 0.3)),
        ],
        &ratings,
    );

    let genres: ItemTags = vec![
        (10, vec!["Sci-Fi", "Thriller"]),
        (404, vec!["Sci-Fi", "Thriller"]),
        (101, vec!["Romance"]),
    ]
    .into_iter()
    .collect();

    let demographics = DemographicTable::from_profiles([
        (1, Demographics::new(Sex::Female, Some(1985))),
        (2, Demographics::new(Sex::Male, Some(1990))),
    ]);

    let signals = Signals::none()
        .with_genres(Arc::new(GenreTable::new(genres)))
        .with_demographics(Arc::new(demographics));

    let engine = RecommendationEngine::new(
        ratings.clone(),
        signals,
        Arc::new(candidates),
        RerankConfig::default(),
    );

    create_router(AppState::new(engine))
}

async fn get(app: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, headers, body)
}

#[tokio::test]
async fn test_health_check() {
    let (status, headers, body) = get(create_test_app(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert!(headers.contains_key(REQUEST_ID_HEADER));
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let id = "67e55044-10b1-426f-9247-bb680e5fe0c8";
    let response = create_test_app()
        .oneshot(
            Request::builder()
                .uri("/health")
                .header(REQUEST_ID_HEADER, id)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers()[REQUEST_ID_HEADER], id);
}

#[tokio::test]
async fn test_capabilities() {
    let (status, _, body) = get(create_test_app(), "/capabilities").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["demographics"], true);
    assert_eq!(body["genres"], true);
    assert_eq!(body["content"], false);
}

#[tokio::test]
async fn test_user_recommendations_are_reranked_and_truncated() {
    let (status, _, body) = get(create_test_app(), "/users/1/recommendations").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"], 1);

    let items: Vec<u64> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["item_id"].as_u64().unwrap())
        .collect();

    // 404 shares both genres with the liked item 10 and jumps to the top;
    // 606 falls off the end
    assert_eq!(items, vec![404, 101, 202, 303, 505]);

    let top = body["items"][0]["score"].as_f64().unwrap();
    assert!((top - 1.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_unknown_user_is_not_found() {
    let (status, _, body) = get(create_test_app(), "/users/99/recommendations").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("99"));
}

#[tokio::test]
async fn test_user_missing_from_demographics_is_not_found() {
    // user 3 has ratings but no demographic profile
    let (status, _, _) = get(create_test_app(), "/users/3/recommendations").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_user_id_is_rejected() {
    let (status, _, _) = get(create_test_app(), "/users/abc/recommendations").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_batch_fails_when_a_user_cannot_be_ranked() {
    let (status, _, _) = get(create_test_app(), "/recommendations").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
