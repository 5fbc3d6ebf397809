//! Typed shortcuts for common Canvas endpoints

use super::CanvasClient;
use crate::error::Result;
use crate::http::RequestDescriptor;
use crate::models::{Course, Enrollment, Term, User};
use crate::pagination::Paginated;
use crate::wire::{CourseInclude, EnrollmentType, FlagSet};
use std::fmt::Display;

impl CanvasClient {
    /// The user the token belongs to, or the impersonated user
    pub async fn current_user(&self) -> Result<User> {
        self.get("/api/v1/users/self").await
    }

    /// Courses of an account, with optional associations
    pub fn account_courses(
        &self,
        account: impl Display,
        includes: FlagSet<CourseInclude>,
    ) -> Paginated<'_, Course> {
        let request = RequestDescriptor::get(format!("/api/v1/accounts/{account}/courses"))
            .query_flags("include", includes);
        self.stream(request)
    }

    /// Users of an account
    pub fn account_users(&self, account: impl Display) -> Paginated<'_, User> {
        self.stream(RequestDescriptor::get(format!(
            "/api/v1/accounts/{account}/users"
        )))
    }

    /// Enrollments of a course, optionally restricted to some roles
    pub fn course_enrollments(
        &self,
        course: impl Display,
        types: &[EnrollmentType],
    ) -> Paginated<'_, Enrollment> {
        let request = types.iter().fold(
            RequestDescriptor::get(format!("/api/v1/courses/{course}/enrollments")),
            |request, kind| request.query_wire("type[]", *kind),
        );
        self.stream(request)
    }

    /// Enrollment terms of a root account
    pub fn account_terms(&self, account: impl Display) -> Paginated<'_, Term> {
        self.stream(
            RequestDescriptor::get(format!("/api/v1/accounts/{account}/terms"))
                .items_key("enrollment_terms"),
        )
    }
}
