//! Diesel schema for review persistence.

diesel::table! {
    /// Post-completion reviews between task participants.
    reviews (id) {
        /// Review identifier.
        id -> Uuid,
        /// Reviewed task.
        task_id -> Uuid,
        /// Reviewing identity.
        reviewer_id -> Uuid,
        /// Reviewed identity.
        reviewee_id -> Uuid,
        /// Rating between 1 and 5.
        rating -> SmallInt,
        /// Optional comment text.
        comment -> Nullable<Text>,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}
