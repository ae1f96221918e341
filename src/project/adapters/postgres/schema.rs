//! Diesel schema for project lifecycle persistence.

diesel::table! {
    /// Posted projects.
    projects (id) {
        /// Project identifier.
        id -> Uuid,
        /// Project title.
        #[max_length = 255]
        title -> Varchar,
        /// Free-form description.
        description -> Text,
        /// Fixed-point budget.
        budget -> Numeric,
        /// Category reference.
        category_id -> Uuid,
        /// Employer who posted the project.
        employer_id -> Uuid,
        /// Selected freelancer, once work has started.
        freelancer_id -> Nullable<Uuid>,
    }
}

diesel::table! {
    /// Lifecycle records, one per project.
    project_lifecycles (id) {
        /// Lifecycle identifier.
        id -> Uuid,
        /// Owning project.
        project_id -> Uuid,
        /// Lifecycle status.
        #[max_length = 50]
        status -> Varchar,
        /// When applications open.
        applications_start_date -> Timestamptz,
        /// When applications close.
        applications_deadline -> Timestamptz,
        /// When work is due to start.
        work_start_date -> Timestamptz,
        /// When work is due to be delivered.
        work_deadline -> Timestamptz,
        /// External confirmation that the deliverable was accepted.
        acceptance_confirmed -> Bool,
        /// Last status change.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Freelancer applications to projects.
    freelancer_applications (id) {
        /// Application identifier.
        id -> Uuid,
        /// Project applied to.
        project_id -> Uuid,
        /// Applying freelancer.
        freelancer_id -> Uuid,
        /// Application status.
        #[max_length = 50]
        status -> Varchar,
        /// Submission timestamp, used for stable ordering.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(project_lifecycles -> projects (project_id));
diesel::joinable!(freelancer_applications -> projects (project_id));

diesel::allow_tables_to_appear_in_same_query!(projects, project_lifecycles, freelancer_applications);
