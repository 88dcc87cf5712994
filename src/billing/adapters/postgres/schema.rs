//! Diesel schema for payment-ledger persistence.

diesel::table! {
    /// Payment-ledger entries for task engagements.
    transactions (id) {
        /// Transaction identifier.
        id -> Uuid,
        /// Task the engagement belongs to.
        task_id -> Uuid,
        /// Paying client.
        client_id -> Uuid,
        /// Paid provider.
        provider_id -> Uuid,
        /// Amount in minor currency units.
        amount_minor -> BigInt,
        /// Platform fee in minor currency units.
        platform_fee_minor -> BigInt,
        /// Payment status.
        #[max_length = 50]
        status -> Varchar,
        /// Settlement timestamp, if settled.
        paid_at -> Nullable<Timestamptz>,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}
