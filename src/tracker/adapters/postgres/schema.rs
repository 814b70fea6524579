//! Diesel schema for tracker persistence.

diesel::table! {
    /// Project records owning tasks of either subtype.
    projects (id) {
        /// Project identifier.
        id -> Uuid,
        /// Project name.
        #[max_length = 255]
        name -> Varchar,
        /// Optional free-text description.
        description -> Nullable<Text>,
        /// Planned start date.
        start_date -> Date,
        /// Planned end date.
        end_date -> Date,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Task records of both subtypes in one table, discriminated by kind.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Owning project identifier.
        project_id -> Uuid,
        /// Task title.
        #[max_length = 255]
        title -> Varchar,
        /// Optional free-text description.
        description -> Nullable<Text>,
        /// Calendar date the task is due.
        due_date -> Date,
        /// Lifecycle status.
        #[max_length = 20]
        status -> Varchar,
        /// Subtype discriminant, duplicated from the details payload for
        /// filtered queries.
        #[max_length = 20]
        kind -> Varchar,
        /// Tagged subtype payload (language/framework or tool/file format).
        details -> Jsonb,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(tasks -> projects (project_id));
diesel::allow_tables_to_appear_in_same_query!(projects, tasks);
