//! Diesel schema for identity persistence.

diesel::table! {
    /// Registered marketplace participants.
    identities (id) {
        /// Identity identifier.
        id -> Uuid,
        /// Participant display name.
        #[max_length = 255]
        display_name -> Varchar,
        /// Normalized email address, unique across identities.
        #[max_length = 255]
        email -> Varchar,
        /// Password digest from the hashing collaborator.
        #[max_length = 255]
        password_hash -> Varchar,
        /// Marketplace role.
        #[max_length = 50]
        role -> Varchar,
        /// Provider skill tags as a JSON array.
        skills -> Jsonb,
        /// Verification flag.
        verified -> Bool,
        /// Running average review rating.
        rating -> Double,
        /// Number of reviews received.
        review_count -> Integer,
        /// Points balance.
        points -> BigInt,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
