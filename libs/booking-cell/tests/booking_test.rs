use assert_matches::assert_matches;
use chrono::NaiveDate;
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use booking_cell::models::{BookAppointmentRequest, BookingError};
use booking_cell::services::booking::BookingService;
use shared_utils::test_utils::{MockStoreResponses, TestConfig};

const TOKEN: &str = "test-token";

fn date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
}

fn booking_request(day: &str, time: &str) -> BookAppointmentRequest {
    BookAppointmentRequest {
        date: date(day),
        time: time.to_string(),
        reason: Some("Policy review".to_string()),
    }
}

async fn service_against(mock_server: &MockServer) -> BookingService {
    let config = TestConfig::with_store_url(&mock_server.uri()).to_app_config();
    BookingService::new(&config)
}

async fn mount_supply(mock_server: &MockServer, day: &str, slots: &[&str], booked: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/availabilities"))
        .and(query_param("date", format!("eq.{}", day)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreResponses::availability_response(day, slots)
        ])))
        .mount(mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("date", format!("eq.{}", day)))
        .respond_with(ResponseTemplate::new(200).set_body_json(booked))
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn book_writes_one_appointment() {
    let mock_server = MockServer::start().await;
    let user_id = Uuid::new_v4();

    mount_supply(&mock_server, "2050-01-15", &["09:00", "10:00", "11:00"], json!([])).await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockStoreResponses::appointment_response(&user_id.to_string(), "2050-01-15", "10:00")
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = service_against(&mock_server).await;
    let appointment = service
        .book(user_id, booking_request("2050-01-15", "10:00"), TOKEN)
        .await
        .unwrap();

    assert_eq!(appointment.time, "10:00");
    assert_eq!(appointment.date, date("2050-01-15"));
    assert_eq!(appointment.user_id, user_id);
}

#[tokio::test]
async fn book_rejects_date_without_availability() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/availabilities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let service = service_against(&mock_server).await;
    let result = service
        .book(Uuid::new_v4(), booking_request("2099-01-01", "09:00"), TOKEN)
        .await;

    assert_matches!(result, Err(BookingError::SlotUnavailable));
}

#[tokio::test]
async fn book_rejects_unlisted_time() {
    let mock_server = MockServer::start().await;

    mount_supply(&mock_server, "2050-01-15", &["09:00", "10:00"], json!([])).await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let service = service_against(&mock_server).await;
    let result = service
        .book(Uuid::new_v4(), booking_request("2050-01-15", "23:00"), TOKEN)
        .await;

    assert_matches!(result, Err(BookingError::SlotUnavailable));
}

#[tokio::test]
async fn book_rejects_already_taken_slot() {
    let mock_server = MockServer::start().await;
    let earlier_booker = Uuid::new_v4().to_string();

    mount_supply(
        &mock_server,
        "2050-01-15",
        &["09:00", "10:00"],
        json!([MockStoreResponses::appointment_response(
            &earlier_booker,
            "2050-01-15",
            "10:00"
        )]),
    )
    .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let service = service_against(&mock_server).await;
    let result = service
        .book(Uuid::new_v4(), booking_request("2050-01-15", "10:00"), TOKEN)
        .await;

    assert_matches!(result, Err(BookingError::SlotUnavailable));
}

/// Two bookers race past the optimistic pre-check; the storage layer's
/// unique constraint lets exactly one insert through and the loser sees
/// the slot as unavailable.
#[tokio::test]
async fn racing_bookers_get_one_success_one_unavailable() {
    let mock_server = MockServer::start().await;
    let winner = Uuid::new_v4();
    let loser = Uuid::new_v4();

    // Neither booker's pre-check observes the other's write.
    mount_supply(&mock_server, "2050-01-15", &["10:00"], json!([])).await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockStoreResponses::appointment_response(&winner.to_string(), "2050-01-15", "10:00")
        ])))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(409).set_body_string(
            r#"{"code":"23505","message":"duplicate key value violates unique constraint \"appointments_date_time_key\""}"#,
        ))
        .mount(&mock_server)
        .await;

    let service = service_against(&mock_server).await;

    let first = service
        .book(winner, booking_request("2050-01-15", "10:00"), TOKEN)
        .await;
    let second = service
        .book(loser, booking_request("2050-01-15", "10:00"), TOKEN)
        .await;

    assert_eq!(first.unwrap().time, "10:00");
    assert_matches!(second, Err(BookingError::SlotUnavailable));
}

#[tokio::test]
async fn upcoming_and_past_listings_filter_by_user() {
    let mock_server = MockServer::start().await;
    let user_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("user_id", format!("eq.{}", user_id)))
        .and(query_param("date", "gte.2050-01-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreResponses::appointment_response(&user_id.to_string(), "2050-01-15", "10:00")
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("user_id", format!("eq.{}", user_id)))
        .and(query_param("date", "lt.2050-01-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let service = service_against(&mock_server).await;
    let today = date("2050-01-01");

    let upcoming = service
        .upcoming_appointments(user_id, today, TOKEN)
        .await
        .unwrap();
    let past = service.past_appointments(user_id, today, TOKEN).await.unwrap();

    assert_eq!(upcoming.len(), 1);
    assert_eq!(upcoming[0].user_id, user_id);
    assert!(past.is_empty());
}
