use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use crate::{
    config::Config,
    db::{memory::MemoryStore, Repository},
    models::{jobmodel::ServiceType, usermodel::User},
    routes::create_router,
    service::test_support::{needy, provider, RecordingNotifier},
    utils::token::create_token,
    AppState,
};

const SECRET: &str = "handler-test-secret";

fn test_config() -> Config {
    Config {
        database_url: None,
        jwt_secret: SECRET.to_string(),
        jwt_maxage: 60,
        port: 0,
        from_email: "Servease <noreply@servease.app>".to_string(),
        resend_api_key: None,
        smtp: None,
        seed_users_file: None,
        issue_dev_tokens: false,
        cors_origins: Vec::new(),
    }
}

fn app(users: Vec<User>) -> Router {
    let db_client: Arc<dyn Repository> = Arc::new(MemoryStore::with_users(users));
    let (notifier, _rx) = RecordingNotifier::new();
    create_router(Arc::new(AppState::new(
        test_config(),
        db_client,
        Arc::new(notifier),
    )))
}

fn token_for(user: &User) -> String {
    create_token(&user.id.to_string(), SECRET.as_bytes(), 60).unwrap()
}

fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn sink_job() -> Value {
    json!({
        "title": "Fix sink",
        "description": "Kitchen sink is leaking",
        "budget": 500.0,
        "location": "Pune",
        "required_service_type": "Plumber"
    })
}

#[tokio::test]
async fn health_check_is_public() {
    let app = app(Vec::new());
    let (status, body) = send(&app, request(Method::GET, "/health", None, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn protected_routes_require_a_valid_token() {
    let ada = needy("Ada");
    let app = app(vec![ada.clone()]);

    let (status, body) = send(&app, request(Method::GET, "/api/jobs/needy", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], "fail");

    let (status, _) = send(
        &app,
        request(Method::GET, "/api/jobs/needy", Some("not-a-token"), None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Signed correctly but for a user the directory does not know.
    let stranger = create_token(&Uuid::new_v4().to_string(), SECRET.as_bytes(), 60).unwrap();
    let (status, _) = send(
        &app,
        request(Method::GET, "/api/jobs/needy", Some(&stranger), None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_cookie_is_accepted() {
    let ada = needy("Ada");
    let app = app(vec![ada.clone()]);

    let req = Request::builder()
        .method(Method::GET)
        .uri("/api/users/me")
        .header(header::COOKIE, format!("token={}", token_for(&ada)))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, req).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "ada@example.com");
    assert_eq!(body["data"]["name"], "Ada");
}

#[tokio::test]
async fn needy_posts_and_lists_jobs() {
    let ada = needy("Ada");
    let app = app(vec![ada.clone()]);
    let token = token_for(&ada);

    let (status, body) = send(
        &app,
        request(Method::POST, "/api/jobs/post", Some(&token), Some(sink_job())),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"]["status"], "Posted");
    assert_eq!(body["data"]["provider_id"], Value::Null);

    let (status, body) = send(
        &app,
        request(Method::GET, "/api/jobs/needy", Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn wrong_role_is_forbidden() {
    let ravi = provider("Ravi", ServiceType::Plumber);
    let app = app(vec![ravi.clone()]);

    let (status, body) = send(
        &app,
        request(Method::POST, "/api/jobs/post", Some(&token_for(&ravi)), Some(sink_job())),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["status"], "fail");
}

#[tokio::test]
async fn lifecycle_over_http() {
    let ada = needy("Ada");
    let ravi = provider("Ravi", ServiceType::Plumber);
    let app = app(vec![ada.clone(), ravi.clone()]);
    let needy_token = token_for(&ada);
    let provider_token = token_for(&ravi);

    let (_, body) = send(
        &app,
        request(Method::POST, "/api/jobs/post", Some(&needy_token), Some(sink_job())),
    )
    .await;
    let job_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        request(Method::GET, "/api/providers/jobs", Some(&provider_token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["id"], job_id.as_str());

    let (status, body) = send(
        &app,
        request(
            Method::PUT,
            &format!("/api/jobs/{}/respond", job_id),
            Some(&provider_token),
            Some(json!({ "action": "Proposal" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ProviderProposal");

    let (status, body) = send(
        &app,
        request(
            Method::PUT,
            &format!("/api/jobs/{}/status", job_id),
            Some(&needy_token),
            Some(json!({ "newStatus": "Needy Accepted" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "NeedyAccepted");

    // Reviews are only accepted once the job is completed.
    let (status, _) = send(
        &app,
        request(
            Method::POST,
            "/api/reviews",
            Some(&needy_token),
            Some(json!({ "job_id": job_id, "rating": 5 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        request(
            Method::PUT,
            &format!("/api/jobs/{}/complete", job_id),
            Some(&provider_token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "Completed");

    let review = json!({ "job_id": job_id, "rating": 5, "comment": "Quick and tidy" });
    let (status, _) = send(
        &app,
        request(Method::POST, "/api/reviews", Some(&needy_token), Some(review.clone())),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &app,
        request(Method::POST, "/api/reviews", Some(&needy_token), Some(review)),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(
        &app,
        request(Method::GET, &format!("/api/reviews/{}", ravi.id), None, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["rating"]["average_rating"], 5.0);
    assert_eq!(body["data"]["rating"]["total_reviews"], 1);
    assert!(body["data"]["rating"].get("rating_sum").is_none());
    assert_eq!(body["data"]["reviews"][0]["comment"], "Quick and tidy");

    let (status, body) = send(
        &app,
        request(Method::GET, "/api/providers/analytics/me", Some(&provider_token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_earning"], 500.0);
    assert_eq!(body["data"]["completed_jobs_count"], 1);
}

#[tokio::test]
async fn service_errors_map_to_status_codes() {
    let ada = needy("Ada");
    let ravi = provider("Ravi", ServiceType::Plumber);
    let app = app(vec![ada.clone(), ravi.clone()]);
    let needy_token = token_for(&ada);

    let mut blank = sink_job();
    blank["title"] = json!("   ");
    let (status, _) = send(
        &app,
        request(Method::POST, "/api/jobs/post", Some(&needy_token), Some(blank)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        request(
            Method::GET,
            &format!("/api/jobs/{}", Uuid::new_v4()),
            Some(&needy_token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        request(Method::GET, &format!("/api/reviews/{}", ada.id), None, None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        request(
            Method::PUT,
            "/api/providers/profile",
            Some(&token_for(&ravi)),
            Some(json!({ "is_open_for_jobs": false })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let booking = json!({
        "title": "Fix sink",
        "description": "Kitchen sink is leaking",
        "budget": 500.0,
        "location": "Pune",
        "provider_id": ravi.id
    });
    let (status, _) = send(
        &app,
        request(Method::POST, "/api/jobs/book", Some(&needy_token), Some(booking)),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn malformed_bodies_are_validation_errors() {
    let ada = needy("Ada");
    let ravi = provider("Ravi", ServiceType::Plumber);
    let app = app(vec![ada.clone(), ravi.clone()]);
    let needy_token = token_for(&ada);

    let mut missing_title = sink_job();
    missing_title.as_object_mut().unwrap().remove("title");
    let mut unknown_trade = sink_job();
    unknown_trade["required_service_type"] = json!("Welder");

    for body in [missing_title, unknown_trade] {
        let (status, body) = send(
            &app,
            request(Method::POST, "/api/jobs/post", Some(&needy_token), Some(body)),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "fail");
        assert!(body["message"].as_str().unwrap().starts_with("Validation error"));
    }

    let (_, body) = send(
        &app,
        request(Method::POST, "/api/jobs/post", Some(&needy_token), Some(sink_job())),
    )
    .await;
    let job_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        request(
            Method::PUT,
            &format!("/api/jobs/{}/respond", job_id),
            Some(&token_for(&ravi)),
            Some(json!({ "action": "Complete" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "fail");

    let (status, _) = send(
        &app,
        request(
            Method::PUT,
            &format!("/api/jobs/{}/status", job_id),
            Some(&needy_token),
            Some(json!({ "new_status": "Completed" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Nothing reached the store.
    let (_, body) = send(
        &app,
        request(Method::GET, "/api/jobs/needy", Some(&needy_token), None),
    )
    .await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["data"][0]["status"], "Posted");
}

#[tokio::test]
async fn needy_dashboard_names_the_provider() {
    let ada = needy("Ada");
    let ravi = provider("Ravi", ServiceType::Plumber);
    let app = app(vec![ada.clone(), ravi.clone()]);
    let needy_token = token_for(&ada);

    let (_, body) = send(
        &app,
        request(Method::POST, "/api/jobs/post", Some(&needy_token), Some(sink_job())),
    )
    .await;
    let job_id = body["data"]["id"].as_str().unwrap().to_string();
    send(
        &app,
        request(
            Method::PUT,
            &format!("/api/jobs/{}/respond", job_id),
            Some(&token_for(&ravi)),
            Some(json!({ "action": "Proposal" })),
        ),
    )
    .await;

    let (status, body) = send(
        &app,
        request(Method::GET, "/api/jobs/needy", Some(&needy_token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let row = &body["data"][0];
    assert_eq!(row["id"], job_id.as_str());
    assert_eq!(row["status"], "ProviderProposal");
    assert_eq!(row["provider"]["name"], "Ravi");
    assert_eq!(row["provider"]["hourly_rate"], 250.0);

    let (_, body) = send(
        &app,
        request(Method::GET, "/api/jobs/provider", Some(&token_for(&ravi)), None),
    )
    .await;
    assert_eq!(body["data"][0]["needy"]["name"], "Ada");
    assert_eq!(body["data"][0]["needy"]["location"], "Pune");
}
