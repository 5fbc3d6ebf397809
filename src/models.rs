//! Canvas resource models
//!
//! Only the fields the resource helpers rely on are modeled. Anything else
//! in a response is ignored. Enum-valued fields are [`Wire`] so an
//! unfamiliar token from a newer Canvas release does not fail decoding.

use crate::wire::{CourseWorkflowState, EnrollmentState, EnrollmentType, Wire};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A Canvas user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub sortable_name: Option<String>,
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub login_id: Option<String>,
    #[serde(default)]
    pub sis_user_id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// An enrollment term
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Term {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub start_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub sis_term_id: Option<String>,
    #[serde(default)]
    pub workflow_state: Option<String>,
}

/// A course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub course_code: Option<String>,
    #[serde(default)]
    pub workflow_state: Option<Wire<CourseWorkflowState>>,
    #[serde(default)]
    pub account_id: Option<u64>,
    #[serde(default)]
    pub enrollment_term_id: Option<u64>,
    #[serde(default)]
    pub sis_course_id: Option<String>,
    #[serde(default)]
    pub start_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_at: Option<DateTime<Utc>>,
    /// Present with `include[]=term`
    #[serde(default)]
    pub term: Option<Term>,
    /// Present with `include[]=total_students`
    #[serde(default)]
    pub total_students: Option<u64>,
}

/// A user's membership in a course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: u64,
    pub user_id: u64,
    pub course_id: u64,
    #[serde(rename = "type")]
    pub enrollment_type: Wire<EnrollmentType>,
    pub enrollment_state: Wire<EnrollmentState>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub course_section_id: Option<u64>,
    #[serde(default)]
    pub user: Option<User>,
}
