//! Tests for the client module

use super::*;
use crate::models::{Course, User};
use crate::testing::{ScriptedTransport, BASE};
use crate::wire::{CourseInclude, CourseWorkflowState, EnrollmentType, FlagSet, Wire};
use futures::TryStreamExt;
use pretty_assertions::assert_eq;
use serde_json::json;

fn config() -> ClientConfig {
    let mut config = ClientConfig::new(BASE, "secret-token");
    config.retry.base_delay_ms = 1;
    config.retry.max_delay_ms = 5;
    config
}

fn client_with(config: &ClientConfig, transport: &Arc<ScriptedTransport>) -> CanvasClient {
    CanvasClient::with_transport(config, transport.clone()).unwrap()
}

#[test]
fn test_invalid_config_is_rejected() {
    let transport = ScriptedTransport::new();
    let err = CanvasClient::with_transport(&ClientConfig::new(BASE, ""), transport).unwrap_err();
    assert!(matches!(err, Error::MissingConfigField { .. }));
}

#[test]
fn test_debug_hides_token() {
    let transport = ScriptedTransport::new();
    let client = client_with(&config(), &transport);
    let debug = format!("{client:?}");
    assert!(!debug.contains("secret-token"));
    assert!(debug.contains("REDACTED"));
}

#[tokio::test]
async fn test_get_decodes_object() {
    let transport = ScriptedTransport::new();
    transport.push_json(200, json!({"id": 5, "name": "Ada", "login_id": "ada"}));

    let client = client_with(&config(), &transport);
    let user: User = client.get("/api/v1/users/self").await.unwrap();
    assert_eq!(user.login_id.as_deref(), Some("ada"));
}

#[tokio::test]
async fn test_fetch_one_of_empty_page_is_malformed() {
    let transport = ScriptedTransport::new();
    transport.push_json(200, json!([]));

    let client = client_with(&config(), &transport);
    let err = client
        .fetch_one::<User>(&RequestDescriptor::get("/api/v1/users/self"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::MalformedResponse { .. }));
}

#[tokio::test]
async fn test_per_page_added_to_first_request_only() {
    let transport = ScriptedTransport::new();
    transport
        .push_page(json!([{"id": 1}]), Some(&format!("{BASE}/api/v1/courses?page=2&per_page=2")))
        .push_page(json!([{"id": 2}]), None);

    let mut config = config();
    config.per_page = Some(2);
    let client = client_with(&config, &transport);

    let items: Vec<serde_json::Value> = client
        .stream(RequestDescriptor::get("/api/v1/courses"))
        .collect_all()
        .await
        .unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(
        transport.urls(),
        vec![
            format!("{BASE}/api/v1/courses?per_page=2"),
            format!("{BASE}/api/v1/courses?page=2&per_page=2"),
        ]
    );
}

#[tokio::test]
async fn test_explicit_per_page_wins() {
    let transport = ScriptedTransport::new();
    transport.push_page(json!([]), None);

    let mut config = config();
    config.per_page = Some(100);
    let client = client_with(&config, &transport);

    client
        .stream::<serde_json::Value>(RequestDescriptor::get("/api/v1/courses").query("per_page", 10))
        .collect_all()
        .await
        .unwrap();
    assert_eq!(transport.urls(), vec![format!("{BASE}/api/v1/courses?per_page=10")]);
}

// ============================================================================
// Impersonation
// ============================================================================

#[tokio::test]
async fn test_guard_clears_on_drop() {
    let transport = ScriptedTransport::new();
    transport
        .push_json(200, json!({"id": 42, "name": "Student"}))
        .push_json(200, json!({"id": 1, "name": "Admin"}));

    let mut client = client_with(&config(), &transport);
    {
        let guard = client.impersonate(42u64);
        assert_eq!(guard.acting_as(), Some(&UserId::from(42u64)));
        let user = guard.current_user().await.unwrap();
        assert_eq!(user.id, 42);
    }
    assert!(client.acting_as().is_none());

    client.current_user().await.unwrap();
    let urls = transport.urls();
    assert_eq!(urls[0], format!("{BASE}/api/v1/users/self?as_user_id=42"));
    assert_eq!(urls[1], format!("{BASE}/api/v1/users/self"));
}

#[tokio::test]
async fn test_with_impersonation_clears_after_error() {
    let transport = ScriptedTransport::new();
    transport.push_json(404, json!({"errors": [{"message": "not found"}]}));

    let mut client = client_with(&config(), &transport);
    let result = client
        .with_impersonation(UserId::sis("S1"), |client| {
            Box::pin(async move { client.get::<User>("/api/v1/users/self").await })
        })
        .await;

    assert_eq!(result.unwrap_err().status(), Some(404));
    assert!(client.acting_as().is_none());
    assert!(transport.urls()[0].ends_with("as_user_id=sis_user_id%3AS1"));
}

#[tokio::test]
async fn test_begin_overwrites_and_end_is_idempotent() {
    let transport = ScriptedTransport::new();
    let mut client = client_with(&config(), &transport);

    assert_eq!(client.begin_impersonation(1u64), None);
    assert_eq!(client.begin_impersonation(2u64), Some(UserId::from(1u64)));
    assert_eq!(client.end_impersonation(), Some(UserId::from(2u64)));
    assert_eq!(client.end_impersonation(), None);
}

#[tokio::test]
async fn test_impersonation_stripped_from_next_links() {
    let transport = ScriptedTransport::new();
    transport
        .push_page(
            json!([{"id": 1}]),
            Some(&format!("{BASE}/api/v1/courses?page=2&as_user_id=42")),
        )
        .push_page(json!([]), None);

    let mut client = client_with(&config(), &transport);
    client.begin_impersonation(42u64);
    client.end_impersonation();

    // The link echoes a stale target; the request must not carry it.
    let mut pages = client.stream::<serde_json::Value>(RequestDescriptor::get("/api/v1/courses"));
    while pages.next_item().await.is_some() {}

    assert_eq!(transport.urls()[1], format!("{BASE}/api/v1/courses?page=2"));
}

#[tokio::test]
async fn test_worker_client_is_independent() {
    let transport = ScriptedTransport::new();
    let mut parent = client_with(&config(), &transport);
    parent.begin_impersonation(9u64);

    let mut worker = parent.for_worker();
    assert!(worker.acting_as().is_none());

    worker.begin_impersonation(3u64);
    assert_eq!(parent.acting_as(), Some(&UserId::from(9u64)));
    assert_eq!(worker.base_url(), parent.base_url());
}

// ============================================================================
// Resource helpers
// ============================================================================

#[tokio::test]
async fn test_account_courses_with_includes() {
    let transport = ScriptedTransport::new();
    transport.push_page(
        json!([{"id": 10, "name": "Bio", "workflow_state": "available", "term": {"id": 1, "name": "Fall"}}]),
        None,
    );

    let client = client_with(&config(), &transport);
    let courses: Vec<Course> = client
        .account_courses(1, CourseInclude::Term | CourseInclude::TotalStudents)
        .into_stream()
        .try_collect()
        .await
        .unwrap();

    assert_eq!(courses[0].workflow_state, Some(Wire::Known(CourseWorkflowState::Available)));
    assert_eq!(
        transport.urls()[0],
        format!("{BASE}/api/v1/accounts/1/courses?include%5B%5D=term&include%5B%5D=total_students")
    );
}

#[tokio::test]
async fn test_account_courses_without_includes() {
    let transport = ScriptedTransport::new();
    transport.push_page(json!([]), None);

    let client = client_with(&config(), &transport);
    let courses = client
        .account_courses("sis_account_id:MAIN", FlagSet::empty())
        .collect_all()
        .await
        .unwrap();

    assert!(courses.is_empty());
    assert_eq!(
        transport.urls()[0],
        format!("{BASE}/api/v1/accounts/sis_account_id:MAIN/courses")
    );
}

#[tokio::test]
async fn test_course_enrollments_filters_types() {
    let transport = ScriptedTransport::new();
    transport.push_page(
        json!([{"id": 1, "user_id": 2, "course_id": 3, "type": "StudentEnrollment", "enrollment_state": "active"}]),
        None,
    );

    let client = client_with(&config(), &transport);
    let enrollments = client
        .course_enrollments(3, &[EnrollmentType::Student, EnrollmentType::Observer])
        .collect_all()
        .await
        .unwrap();

    assert_eq!(enrollments[0].enrollment_type, Wire::Known(EnrollmentType::Student));
    assert_eq!(
        transport.urls()[0],
        format!("{BASE}/api/v1/courses/3/enrollments?type%5B%5D=StudentEnrollment&type%5B%5D=ObserverEnrollment")
    );
}

#[tokio::test]
async fn test_account_terms_reads_wrapped_list() {
    let transport = ScriptedTransport::new();
    transport.push_page(
        json!({"enrollment_terms": [{"id": 1, "name": "Default Term"}, {"id": 2, "name": "Spring"}]}),
        None,
    );

    let client = client_with(&config(), &transport);
    let terms = client.account_terms(1).collect_all().await.unwrap();

    let names: Vec<&str> = terms.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Default Term", "Spring"]);
}

#[tokio::test]
async fn test_account_terms_follows_next_link() {
    let transport = ScriptedTransport::new();
    transport
        .push_page(
            json!({"enrollment_terms": [{"id": 1, "name": "Default Term"}]}),
            Some(&format!("{BASE}/api/v1/accounts/1/terms?page=2&per_page=1")),
        )
        .push_page(json!({"enrollment_terms": [{"id": 2, "name": "Spring"}]}), None);

    let client = client_with(&config(), &transport);
    let terms = client.account_terms(1).collect_all().await.unwrap();

    let ids: Vec<u64> = terms.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(transport.calls(), 2);
}

#[tokio::test]
async fn test_account_users() {
    let transport = ScriptedTransport::new();
    transport.push_page(json!([{"id": 1, "name": "A"}, {"id": 2, "name": "B"}]), None);

    let client = client_with(&config(), &transport);
    let users = client.account_users("self").collect_all().await.unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(transport.urls()[0], format!("{BASE}/api/v1/accounts/self/users"));
}
