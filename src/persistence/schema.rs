//! Diesel schema for users, tasks, and task shares.

diesel::table! {
    /// Registered accounts.
    users (id) {
        /// Store-assigned identifier.
        id -> Int8,
        /// Account role label (`ADMIN` or `USER`).
        #[max_length = 16]
        role -> Varchar,
        /// Account status label (`ACTIVE` or `INACTIVE`).
        #[max_length = 16]
        status -> Varchar,
        /// Unique login name.
        #[max_length = 255]
        username -> Varchar,
        /// Password digest.
        #[max_length = 255]
        encrypted_password -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Tasks owned by a single user.
    tasks (id) {
        /// Store-assigned identifier.
        id -> Int8,
        /// Owning user.
        owner_id -> Int8,
        /// Task title.
        #[max_length = 255]
        title -> Varchar,
        /// Optional free-form description.
        description -> Nullable<Text>,
        /// Priority rank from 0 (none) to 3 (high).
        priority -> Int2,
        /// Optional due date.
        due_date -> Nullable<Timestamptz>,
        /// Completion timestamp; present once the task is done.
        completed_at -> Nullable<Timestamptz>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
        /// Label written by the reclassification job (`LATE` or `DONE`).
        #[max_length = 16]
        status -> Nullable<Varchar>,
    }
}

diesel::table! {
    /// Append-only collaborator grants.
    task_shares (id) {
        /// Store-assigned identifier.
        id -> Int8,
        /// Shared task.
        task_id -> Int8,
        /// Owner who granted the share.
        shared_by_id -> Int8,
        /// Collaborator receiving access.
        shared_with_id -> Int8,
        /// Time the share was granted.
        shared_at -> Timestamptz,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(tasks -> users (owner_id));
diesel::joinable!(task_shares -> tasks (task_id));

diesel::allow_tables_to_appear_in_same_query!(users, tasks, task_shares);
