//! Diesel schema for task lifecycle persistence.

diesel::table! {
    /// Client-posted tasks with embedded bid lists.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Short task title.
        #[max_length = 255]
        title -> Varchar,
        /// Detailed description of the work.
        description -> Text,
        /// Free-text category.
        #[max_length = 255]
        category -> Varchar,
        /// Free-text location or coordinate string.
        #[max_length = 255]
        location -> Varchar,
        /// Posting client.
        client_id -> Uuid,
        /// Assigned provider, if any.
        provider_id -> Nullable<Uuid>,
        /// Budget in minor currency units.
        budget_minor -> BigInt,
        /// Requested schedule.
        scheduled_at -> Timestamptz,
        /// Skill requirements as a JSON array.
        skills_required -> Jsonb,
        /// Scheduling urgency.
        #[max_length = 50]
        urgency -> Varchar,
        /// Embedded bid list as a JSON array.
        bids -> Jsonb,
        /// Task lifecycle state.
        #[max_length = 50]
        state -> Varchar,
        /// Optimistic-concurrency version.
        version -> BigInt,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
