//! End-to-end route coverage for the users API over the in-memory store.

use std::sync::Arc;

use actix_web::{test as actix_test, web, App};
use chrono::{Duration, TimeZone, Utc};
use rstest::rstest;
use serde_json::Value;

use backend::domain::UserDirectoryService;
use backend::inbound::http::health::HealthState;
use backend::inbound::http::state::HttpState;
use backend::outbound::memory::InMemoryUserStore;
use backend::server;
use directory_model::{Role, User, UserId};

fn roster() -> Vec<User> {
    let base = Utc
        .with_ymd_and_hms(2024, 5, 1, 9, 0, 0)
        .single()
        .expect("valid timestamp");
    let rows = [
        ("Tanvir Hasan", "tanvir@x.com", Role::Viewer, true),
        ("David Kim", "david@x.com", Role::Viewer, false),
        ("Lisa Anderson", "lisa@x.com", Role::Admin, false),
    ];
    rows.iter()
        .enumerate()
        .map(|(index, (name, email, role, active))| {
            User::new(
                UserId::random(),
                *name,
                *email,
                *role,
                *active,
                base - Duration::minutes(index as i64),
            )
            .expect("valid roster user")
        })
        .collect()
}

async fn init_app(
    rows: Vec<User>,
) -> impl actix_web::dev::Service<
    actix_http::Request,
    Response = actix_web::dev::ServiceResponse,
    Error = actix_web::Error,
> {
    let store = Arc::new(InMemoryUserStore::with_users(rows));
    let state = HttpState::new(Arc::new(UserDirectoryService::new(store)));
    let health = web::Data::new(HealthState::new());
    health.mark_ready();
    actix_test::init_service(App::new().configure(server::configure(state, health))).await
}

#[actix_web::test]
async fn role_filter_scenario_returns_the_viewer_rows() {
    let app = init_app(roster()).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/users?role=viewer&page=1&limit=10")
            .to_request(),
    )
    .await;
    assert!(response.status().is_success());
    let value: Value =
        serde_json::from_slice(&actix_test::read_body(response).await).expect("JSON body");

    let names: Vec<&str> = value["data"]
        .as_array()
        .expect("data array")
        .iter()
        .map(|row| row["name"].as_str().expect("name string"))
        .collect();
    assert_eq!(names, vec!["Tanvir Hasan", "David Kim"]);
    assert_eq!(
        value["meta"],
        serde_json::json!({"page": 1, "limit": 10, "total": 2, "totalPages": 1})
    );
}

#[rstest]
#[case(1, 2, 2, 4)]
#[case(2, 2, 2, 4)]
#[case(4, 2, 1, 4)]
#[case(5, 2, 0, 4)]
#[actix_web::test]
async fn window_length_is_min_of_limit_and_remaining_rows(
    #[case] page: u32,
    #[case] limit: u32,
    #[case] expected_len: usize,
    #[case] expected_pages: u64,
) {
    // Seven rows, so page boundaries fall mid-roster.
    let base = Utc
        .with_ymd_and_hms(2024, 5, 1, 9, 0, 0)
        .single()
        .expect("valid timestamp");
    let rows: Vec<User> = (0..7)
        .map(|index| {
            User::new(
                UserId::random(),
                format!("Member {index}"),
                format!("member{index}@x.com"),
                Role::Viewer,
                true,
                base - Duration::minutes(index),
            )
            .expect("valid user")
        })
        .collect();
    let app = init_app(rows).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/users?page={page}&limit={limit}"))
            .to_request(),
    )
    .await;
    assert!(response.status().is_success());
    let value: Value =
        serde_json::from_slice(&actix_test::read_body(response).await).expect("JSON body");

    assert_eq!(value["data"].as_array().expect("data array").len(), expected_len);
    assert_eq!(value["meta"]["total"], 7);
    assert_eq!(value["meta"]["totalPages"], expected_pages);
}

#[actix_web::test]
async fn toggle_then_get_reads_the_flipped_value() {
    let rows = roster();
    let target_id = rows[0].id().clone();
    let app = init_app(rows).await;

    let toggled = actix_test::call_service(
        &app,
        actix_test::TestRequest::patch()
            .uri(&format!("/users/{target_id}/toggle-active"))
            .to_request(),
    )
    .await;
    assert!(toggled.status().is_success());
    let toggled_value: Value =
        serde_json::from_slice(&actix_test::read_body(toggled).await).expect("JSON body");
    assert_eq!(toggled_value["active"], false);

    let fetched = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/users/{target_id}"))
            .to_request(),
    )
    .await;
    assert!(fetched.status().is_success());
    let fetched_value: Value =
        serde_json::from_slice(&actix_test::read_body(fetched).await).expect("JSON body");
    assert_eq!(fetched_value["active"], false);
}

#[actix_web::test]
async fn double_toggle_round_trips_through_the_routes() {
    let rows = roster();
    let target_id = rows[1].id().clone();
    let original_active = rows[1].active();
    let app = init_app(rows).await;

    for _ in 0..2 {
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::patch()
                .uri(&format!("/users/{target_id}/toggle-active"))
                .to_request(),
        )
        .await;
        assert!(response.status().is_success());
    }

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/users/{target_id}"))
            .to_request(),
    )
    .await;
    let value: Value =
        serde_json::from_slice(&actix_test::read_body(response).await).expect("JSON body");
    assert_eq!(value["active"], Value::from(original_active));
}

#[actix_web::test]
async fn invalid_role_is_rejected_before_reaching_the_service() {
    let app = init_app(roster()).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/users?role=superuser")
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), actix_web::http::StatusCode::BAD_REQUEST);
    let value: Value =
        serde_json::from_slice(&actix_test::read_body(response).await).expect("JSON body");
    assert_eq!(value["details"]["field"], "role");
}

#[actix_web::test]
async fn health_probes_are_wired() {
    let app = init_app(Vec::new()).await;

    for uri in ["/health/live", "/health/ready"] {
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri(uri).to_request(),
        )
        .await;
        assert!(response.status().is_success(), "{uri} should be 200");
    }
}
