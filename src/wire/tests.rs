//! Tests for the wire registry

use super::*;
use pretty_assertions::assert_eq;
use serde::Deserialize;
use serde_json::json;
use test_case::test_case;

// ============================================================================
// Plain Enum Tests
// ============================================================================

#[test]
fn test_every_enumerant_round_trips() {
    for state in CourseWorkflowState::ALL {
        assert_eq!(
            CourseWorkflowState::from_wire(state.to_wire()),
            Wire::Known(*state)
        );
    }
    for kind in EnrollmentType::ALL {
        assert_eq!(EnrollmentType::from_wire(kind.to_wire()), Wire::Known(*kind));
    }
    for state in EnrollmentState::ALL {
        assert_eq!(EnrollmentState::from_wire(state.to_wire()), Wire::Known(*state));
    }
}

#[test_case("StudentEnrollment", EnrollmentType::Student)]
#[test_case("TaEnrollment", EnrollmentType::Ta)]
#[test_case("ObserverEnrollment", EnrollmentType::Observer)]
fn test_from_wire_known(token: &str, expected: EnrollmentType) {
    assert_eq!(EnrollmentType::from_wire(token).known(), Some(expected));
}

#[test]
fn test_unknown_token_is_reported_not_failed() {
    let decoded = EnrollmentType::from_wire("StudentViewEnrollment");
    assert!(!decoded.is_known());
    assert_eq!(decoded.known(), None);
    assert_eq!(decoded.token(), "StudentViewEnrollment");
    assert_eq!(
        decoded,
        Wire::Unknown("StudentViewEnrollment".to_string())
    );
}

#[test]
fn test_tokens_are_case_sensitive() {
    assert!(!CourseWorkflowState::from_wire("Available").is_known());
}

#[test]
fn test_display_uses_wire_token() {
    assert_eq!(EnrollmentState::CreationPending.to_string(), "creation_pending");
    let wire: Wire<EnrollmentState> = EnrollmentState::Active.into();
    assert_eq!(wire.to_string(), "active");
}

#[test]
fn test_wire_serde() {
    #[derive(Deserialize)]
    struct Row {
        workflow_state: Wire<CourseWorkflowState>,
    }

    let row: Row = serde_json::from_value(json!({"workflow_state": "available"})).unwrap();
    assert_eq!(row.workflow_state.known(), Some(CourseWorkflowState::Available));

    let row: Row = serde_json::from_value(json!({"workflow_state": "archived"})).unwrap();
    assert_eq!(row.workflow_state.token(), "archived");

    let out = serde_json::to_value(&row.workflow_state).unwrap();
    assert_eq!(out, json!("archived"));
    assert_eq!(
        serde_json::to_value(CourseWorkflowState::Deleted).unwrap(),
        json!("deleted")
    );
}

#[test]
fn test_mapping_metadata() {
    let mapping = EnrollmentState::mapping();
    assert_eq!(mapping.type_name(), "EnrollmentState");
    assert_eq!(mapping.len(), EnrollmentState::ALL.len());
    assert_eq!(mapping.ordinal(EnrollmentState::Invited), 1);
}

// ============================================================================
// Construction Failures
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Broken {
    A,
    B,
}

impl WireEnum for Broken {
    const ALL: &'static [Self] = &[Broken::A, Broken::B];

    fn mapping() -> &'static EnumMapping<Self> {
        unimplemented!("tests build mappings directly")
    }
}

#[test]
#[should_panic(expected = "declared by both")]
fn test_duplicate_token_is_fatal() {
    let _ = EnumMapping::new("Broken", &[(Broken::A, "x"), (Broken::B, "x")]);
}

#[test]
#[should_panic(expected = "no wire token declared")]
fn test_missing_token_is_fatal() {
    let _ = EnumMapping::new("Broken", &[(Broken::A, "a")]);
}

#[test]
#[should_panic(expected = "more than one wire token")]
fn test_double_declaration_is_fatal() {
    let _ = EnumMapping::new("Broken", &[(Broken::A, "a"), (Broken::A, "b")]);
}

// ============================================================================
// Flag Tests
// ============================================================================

#[test]
fn test_flags_from_wire_ignores_unmapped_tokens() {
    let set = FlagSet::<CourseInclude>::from_wire(["term", "teachers", "hologram"]);
    assert_eq!(set.len(), 2);
    assert!(set.contains(CourseInclude::Term));
    assert!(set.contains(CourseInclude::Teachers));
    assert!(!set.contains(CourseInclude::Tabs));
}

#[test]
fn test_flags_to_wire_in_declaration_order() {
    let set = CourseInclude::Teachers | CourseInclude::Term | CourseInclude::SyllabusBody;
    assert_eq!(set.to_wire(), vec!["syllabus_body", "term", "teachers"]);
}

#[test]
fn test_flags_round_trip_every_combination_of_submission_types() {
    let count = SubmissionType::ALL.len();
    for mask in 0u64..(1u64 << count) {
        let set: FlagSet<SubmissionType> = SubmissionType::ALL
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, flag)| *flag)
            .collect();
        assert_eq!(set.bits(), mask);
        assert_eq!(FlagSet::<SubmissionType>::from_wire(set.to_wire()), set);
    }
}

#[test]
fn test_flag_set_operations() {
    let mut set = FlagSet::<SubmissionType>::empty();
    assert!(set.is_empty());

    set |= SubmissionType::OnlineUpload;
    set.insert(SubmissionType::OnlineUrl);
    assert_eq!(set.len(), 2);

    set.remove(SubmissionType::OnlineUpload);
    assert_eq!(set.iter().collect::<Vec<_>>(), vec![SubmissionType::OnlineUrl]);

    let all = FlagSet::<SubmissionType>::all();
    assert_eq!(all.len(), SubmissionType::ALL.len());
    assert_eq!(set | all, all);
}

#[test]
fn test_flag_set_serde() {
    let set: FlagSet<SubmissionType> =
        serde_json::from_value(json!(["online_upload", "none", "carrier_pigeon"])).unwrap();
    assert_eq!(set, SubmissionType::None | SubmissionType::OnlineUpload);
    assert_eq!(
        serde_json::to_value(set).unwrap(),
        json!(["none", "online_upload"])
    );
    assert_eq!(format!("{set:?}"), r#"{"none", "online_upload"}"#);
}
