//! Canvas vocabularies used by the resource helpers

crate::wire_enum! {
    /// Lifecycle state of a course
    pub enum CourseWorkflowState {
        Unpublished => "unpublished",
        Available => "available",
        Completed => "completed",
        Deleted => "deleted",
    }
}

crate::wire_enum! {
    /// Role a user holds in a course
    pub enum EnrollmentType {
        Student => "StudentEnrollment",
        Teacher => "TeacherEnrollment",
        Ta => "TaEnrollment",
        Designer => "DesignerEnrollment",
        Observer => "ObserverEnrollment",
    }
}

crate::wire_enum! {
    /// Lifecycle state of an enrollment
    pub enum EnrollmentState {
        Active => "active",
        Invited => "invited",
        CreationPending => "creation_pending",
        Deleted => "deleted",
        Rejected => "rejected",
        Completed => "completed",
        Inactive => "inactive",
    }
}

crate::wire_flags! {
    /// Optional associations for course listings (`include[]`)
    pub enum CourseInclude {
        NeedsGradingCount => "needs_grading_count",
        SyllabusBody => "syllabus_body",
        PublicDescription => "public_description",
        TotalScores => "total_scores",
        CurrentGradingPeriodScores => "current_grading_period_scores",
        Term => "term",
        Account => "account",
        CourseProgress => "course_progress",
        Sections => "sections",
        StorageQuotaUsedMb => "storage_quota_used_mb",
        TotalStudents => "total_students",
        PassbackStatus => "passback_status",
        Favorites => "favorites",
        Teachers => "teachers",
        ObservedUsers => "observed_users",
        Tabs => "tabs",
        CourseImage => "course_image",
        Concluded => "concluded",
    }
}

crate::wire_flags! {
    /// Accepted submission kinds of an assignment
    pub enum SubmissionType {
        OnlineQuiz => "online_quiz",
        None => "none",
        OnPaper => "on_paper",
        DiscussionTopic => "discussion_topic",
        ExternalTool => "external_tool",
        OnlineUpload => "online_upload",
        OnlineTextEntry => "online_text_entry",
        OnlineUrl => "online_url",
        MediaRecording => "media_recording",
        StudentAnnotation => "student_annotation",
    }
}
