use assert_matches::assert_matches;
use axum::extract::{Extension, Path, State};
use axum::Json;
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use contact_cell::handlers::{list_messages, solve_message};
use contact_cell::models::{ContactError, SubmitContactRequest};
use contact_cell::ContactService;
use shared_models::error::AppError;
use shared_utils::test_utils::{MockStoreResponses, TestConfig, TestUser};

const TOKEN: &str = "staff-token";

async fn service_against(mock_server: &MockServer) -> ContactService {
    let config = TestConfig::with_store_url(&mock_server.uri()).to_app_config();
    ContactService::new(&config)
}

#[tokio::test]
async fn submit_stores_the_message() {
    let mock_server = MockServer::start().await;
    let id = Uuid::new_v4().to_string();

    Mock::given(method("POST"))
        .and(path("/rest/v1/contact_messages"))
        .and(body_partial_json(json!({ "name": "Bob", "email": "b@b.com" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockStoreResponses::contact_message_response(&id, "Bob")
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = service_against(&mock_server).await;
    let message = service
        .submit(SubmitContactRequest {
            name: "Bob".to_string(),
            email: "b@b.com".to_string(),
            message: "Hi".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(message.name, "Bob");
}

#[tokio::test]
async fn solve_deletes_and_reports_success() {
    let mock_server = MockServer::start().await;
    let id = Uuid::new_v4();

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/contact_messages"))
        .and(query_param("id", format!("eq.{}", id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreResponses::contact_message_response(&id.to_string(), "X")
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = service_against(&mock_server).await;
    service.solve_message(id, TOKEN).await.unwrap();
}

#[tokio::test]
async fn solve_unknown_id_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/contact_messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let service = service_against(&mock_server).await;
    let result = service.solve_message(Uuid::new_v4(), TOKEN).await;

    assert_matches!(result, Err(ContactError::NotFound));
}

#[tokio::test]
async fn inbox_is_staff_only() {
    let visitor = TestUser::policyholder("member@example.com");

    let listed = list_messages(
        State(TestConfig::default().to_arc()),
        TypedHeader(Authorization::bearer(TOKEN).unwrap()),
        Extension(visitor.to_user()),
    )
    .await;
    assert_matches!(listed, Err(AppError::Auth(_)));

    let solved = solve_message(
        State(TestConfig::default().to_arc()),
        Path(Uuid::new_v4()),
        TypedHeader(Authorization::bearer(TOKEN).unwrap()),
        Extension(visitor.to_user()),
    )
    .await;
    assert_matches!(solved, Err(AppError::Auth(_)));
}

#[tokio::test]
async fn solve_handler_returns_success_envelope() {
    let mock_server = MockServer::start().await;
    let staff = TestUser::staff("ops@example.com");
    let id = Uuid::new_v4();

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/contact_messages"))
        .and(query_param("id", format!("eq.{}", id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreResponses::contact_message_response(&id.to_string(), "X")
        ])))
        .mount(&mock_server)
        .await;

    let config = TestConfig::with_store_url(&mock_server.uri());
    let Json(body) = solve_message(
        State(config.to_arc()),
        Path(id),
        TypedHeader(Authorization::bearer(TOKEN).unwrap()),
        Extension(staff.to_user()),
    )
    .await
    .unwrap();

    assert_eq!(body, json!({ "success": true }));
}
