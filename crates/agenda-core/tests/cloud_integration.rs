//! Integration tests for the REST client against a mock server.

use agenda_core::cloud::CloudClient;
use agenda_core::{Category, CloudError, Event, Priority, Task};
use chrono::NaiveDate;
use mockito::Matcher;
use serde_json::json;
use std::time::Duration;

const DEVICE: &str = "3d652250-7db0-411a-a8bb-1ce9904c5ef9";

fn client_for(server: &mockito::ServerGuard) -> CloudClient {
    CloudClient::new(&format!("{}/api", server.url()), Duration::from_secs(5)).unwrap()
}

fn sample_event() -> Event {
    let start = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap().and_hms_opt(14, 0, 0).unwrap();
    Event::new("Lab session", start, start + chrono::Duration::hours(2))
        .unwrap()
        .with_category("UNIVERSITY")
        .with_travel_time(30)
        .with_participants(vec!["ana@example.com".into()])
}

#[tokio::test]
async fn test_generate_uuid_strips_quotes() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/uuid")
        .with_status(200)
        .with_body(format!("\"{DEVICE}\"\n"))
        .create_async()
        .await;

    let uuid = client_for(&server).generate_uuid().await.unwrap();
    assert_eq!(uuid, DEVICE);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_create_task_posts_wire_json() {
    let mut server = mockito::Server::new_async().await;
    let task = Task::new("Essay", Some(Category::University), Some("draft".into()), Priority::UrgentImportant)
        .unwrap();
    let mock = server
        .mock("POST", format!("/api/todos/{DEVICE}").as_str())
        .match_body(Matcher::Json(json!({
            "id": task.id,
            "task": "Essay",
            "category": "UNIVERSITY",
            "description": "draft",
            "priority": "URGENT_IMPORTANT",
        })))
        .with_status(201)
        .create_async()
        .await;

    client_for(&server).create_task(DEVICE, &task).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_list_tasks_parses_lenient_priorities() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", format!("/api/todos/{DEVICE}").as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([
                {"id": "a", "task": "One", "category": "work", "priority": 2},
                {"id": "b", "task": "Two", "priority": "3"},
                {"id": "c", "task": "Three", "description": null}
            ])
            .to_string(),
        )
        .create_async()
        .await;

    let tasks = client_for(&server).list_tasks(DEVICE).await.unwrap();
    assert_eq!(tasks.len(), 3);
    assert_eq!(tasks[0].category, Some(Category::Work));
    assert_eq!(tasks[0].priority, Priority::UrgentNotImportant);
    assert_eq!(tasks[1].priority, Priority::NotUrgentImportant);
    assert_eq!(tasks[2].priority, Priority::NotUrgentNotImportant);
}

#[tokio::test]
async fn test_list_tasks_rejects_malformed_body() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", format!("/api/todos/{DEVICE}").as_str())
        .with_status(200)
        .with_body("[{\"task\": \"no id\"}]")
        .create_async()
        .await;

    let err = client_for(&server).list_tasks(DEVICE).await.unwrap_err();
    match err {
        CloudError::Parse(message) => assert!(message.starts_with("Error parsing task list")),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_non_success_status_is_reported() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("DELETE", format!("/api/todos/{DEVICE}/gone").as_str())
        .with_status(404)
        .with_body("no such task")
        .create_async()
        .await;

    let err = client_for(&server).delete_task(DEVICE, "gone").await.unwrap_err();
    assert!(matches!(err, CloudError::Status { status: 404, ref body } if body == "no such task"));
}

#[tokio::test]
async fn test_update_event_puts_to_event_path() {
    let mut server = mockito::Server::new_async().await;
    let event = sample_event();
    let mock = server
        .mock("PUT", format!("/api/events/{DEVICE}/{}", event.id).as_str())
        .match_body(Matcher::PartialJson(json!({
            "event_id": event.id,
            "startDateTime": "2024-05-02T14:00:00",
            "endDateTime": "2024-05-02T16:00:00",
            "travelTime": 30,
            "participants": ["ana@example.com"],
        })))
        .with_status(200)
        .create_async()
        .await;

    client_for(&server).update_event(DEVICE, &event).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_share_then_fetch_event() {
    let mut server = mockito::Server::new_async().await;
    let event = sample_event();
    let share = server
        .mock("POST", "/api/share")
        .match_body(Matcher::PartialJson(json!({"event_id": event.id})))
        .with_status(201)
        .create_async()
        .await;
    let fetch = server
        .mock("GET", format!("/api/share/{}", event.id).as_str())
        .with_status(200)
        .with_body(agenda_core::cloud::codec::event_to_json(&event).to_string())
        .create_async()
        .await;

    let client = client_for(&server);
    let code = client.share_event(&event).await.unwrap();
    assert_eq!(code, event.id);
    let fetched = client.fetch_shared_event(&format!(" {code} ")).await.unwrap();
    assert_eq!(fetched, event);
    share.assert_async().await;
    fetch.assert_async().await;
}

#[tokio::test]
async fn test_fetch_shared_event_rejects_blank_code() {
    let server = mockito::Server::new_async().await;
    let err = client_for(&server).fetch_shared_event("   ").await.unwrap_err();
    assert!(matches!(err, CloudError::Parse(_)));
}
