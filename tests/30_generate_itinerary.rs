mod common;

use std::sync::Arc;

use anyhow::Result;
use axum::http::StatusCode;
use chrono::NaiveDate;
use itinerary_api::database::models::{NewTrip, TripStatus};
use itinerary_api::database::{MemoryTripStore, TripStore};
use itinerary_api::services::{ContentGenerator, OpenAiClient};
use rust_decimal::Decimal;
use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn seeded_trip(store: &MemoryTripStore, owner: &str, destination: &str, days: i32) -> Result<String> {
    let id = store
        .create_trip(
            NewTrip {
                destination: destination.to_string(),
                start_date: NaiveDate::from_ymd_opt(2024, 10, 1).expect("date"),
                end_date: NaiveDate::from_ymd_opt(2024, 10, 3).expect("date"),
                budget: Some(Decimal::new(2000, 0)),
            },
            owner,
        )
        .await?;
    for day in 1..=days {
        store.seed_itinerary(&id, day).await;
    }
    Ok(id)
}

#[tokio::test]
async fn tokyo_mock_itinerary_is_written_to_every_row() -> Result<()> {
    let app = common::mock_app();
    let trip_id = seeded_trip(&app.store, "u1", "Tokyo", 3).await?;

    let (status, body) = common::post_json(
        &app.router,
        "/generate-itinerary/",
        Some(&common::user_bearer("u1")),
        json!({ "trip_id": trip_id, "days": 3 }),
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Itinerary generated");
    let text = body["content"]["content"].as_str().expect("content text");
    assert!(text.contains("3-day itinerary for Tokyo"));
    assert!(text.contains("Day 1"));
    assert!(text.contains("Final Day"));
    assert_eq!(body["content"]["status"], "completed");
    assert_eq!(body["content"]["day"], 1);

    let rows = app.store.itineraries(&trip_id).await;
    assert_eq!(rows.len(), 3);
    for row in rows {
        assert_eq!(row.generated_content.as_ref(), Some(&body["content"]));
    }
    let trip = app.store.trip(&trip_id).await.expect("trip");
    assert_eq!(trip.status, TripStatus::Completed);
    Ok(())
}

#[tokio::test]
async fn trip_without_itinerary_rows_is_not_found() -> Result<()> {
    let app = common::mock_app();
    let trip_id = seeded_trip(&app.store, "u1", "Oslo", 0).await?;

    let (status, body) = common::post_json(
        &app.router,
        "/generate-itinerary",
        Some(&common::user_bearer("u1")),
        json!({ "trip_id": trip_id, "days": 2 }),
    )
    .await?;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
    assert_eq!(body["message"], "No itineraries found for this trip");
    assert_eq!(app.store.trip(&trip_id).await.expect("trip").status, TripStatus::Draft);
    Ok(())
}

#[tokio::test]
async fn other_users_trip_is_not_found() -> Result<()> {
    let app = common::mock_app();
    let trip_id = seeded_trip(&app.store, "u1", "Rome", 2).await?;

    let (status, body) = common::post_json(
        &app.router,
        "/generate-itinerary",
        Some(&common::user_bearer("u2")),
        json!({ "trip_id": trip_id, "days": 2 }),
    )
    .await?;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Trip not found");
    assert!(app
        .store
        .itineraries(&trip_id)
        .await
        .iter()
        .all(|row| row.generated_content.is_none()));
    Ok(())
}

#[tokio::test]
async fn service_identity_generates_for_any_owner() -> Result<()> {
    let app = common::mock_app();
    let trip_id = seeded_trip(&app.store, "u1", "Rome", 1).await?;

    let (status, _) = common::post_json(
        &app.router,
        "/generate-itinerary",
        Some(&common::service_bearer()),
        json!({ "trip_id": trip_id, "days": 1 }),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn request_body_must_match_exactly() -> Result<()> {
    let app = common::mock_app();
    let auth = common::user_bearer("u1");

    let (status, body) = common::post_json(
        &app.router,
        "/generate-itinerary",
        Some(&auth),
        json!({ "trip_id": "t1", "days": 3, "budget": 10 }),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");

    let (status, _) = common::post_json(&app.router, "/generate-itinerary", Some(&auth), json!({ "trip_id": "t1" })).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn live_mode_uses_provider_text_and_reduced_tags() -> Result<()> {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({
            "messages": [
                {"role": "system", "content": "You are a travel assistant. Generate a detailed day-by-day itinerary."},
                {"role": "user", "content": "Generate a 3-day itinerary for a trip to Tokyo. Budget: 2000 USD."}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "Day 1: Asakusa\nDay 2: Shibuya\nDay 3: Nikko"}}]
        })))
        .expect(1)
        .mount(&provider)
        .await;

    let client = OpenAiClient::new(&SecretString::from("sk-test".to_string()), "gpt-3.5-turbo", provider.uri())?;
    let app = common::test_app(ContentGenerator::live(Arc::new(client)));
    let trip_id = seeded_trip(&app.store, "u1", "Tokyo", 2).await?;

    let (status, body) = common::post_json(
        &app.router,
        "/generate-itinerary",
        Some(&common::user_bearer("u1")),
        json!({ "trip_id": trip_id, "days": 3 }),
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"]["content"], "Day 1: Asakusa\nDay 2: Shibuya\nDay 3: Nikko");
    assert_eq!(body["content"]["interests"], json!(["Sightseeing", "Local Culture", "Food & Dining"]));
    assert_eq!(body["content"]["preferences"], json!(["Moderate pace", "Mix of activities"]));
    Ok(())
}

#[tokio::test]
async fn provider_failure_is_generation_failed() -> Result<()> {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&provider)
        .await;

    let client = OpenAiClient::new(&SecretString::from("sk-test".to_string()), "gpt-3.5-turbo", provider.uri())?;
    let app = common::test_app(ContentGenerator::live(Arc::new(client)));
    let trip_id = seeded_trip(&app.store, "u1", "Tokyo", 2).await?;

    let (status, body) = common::post_json(
        &app.router,
        "/generate-itinerary",
        Some(&common::user_bearer("u1")),
        json!({ "trip_id": trip_id, "days": 3 }),
    )
    .await?;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "GENERATION_FAILED");
    assert_eq!(app.store.trip(&trip_id).await.expect("trip").status, TripStatus::Draft);
    Ok(())
}
