//! Diesel table definitions for the PostgreSQL schema.
//!
//! These must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Users known to the identity provider.
    users (id) {
        /// Stable user identifier.
        id -> Uuid,
        /// Name shown to other attendees.
        display_name -> Varchar,
        /// Optional avatar image URL.
        avatar_url -> Nullable<Text>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Trips and their current join code.
    trips (id) {
        id -> Uuid,
        /// User allowed to rotate the join code.
        owner_id -> Uuid,
        name -> Varchar,
        /// Currently valid invitation secret; compared byte-exact.
        #[max_length = 64]
        join_code -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Trip memberships. The composite primary key enforces one row per
    /// `(trip_id, user_id)`.
    trip_attendees (trip_id, user_id) {
        trip_id -> Uuid,
        user_id -> Uuid,
        /// Display name snapshot taken at join time.
        name -> Varchar,
        /// Avatar URL snapshot taken at join time.
        avatar_url -> Nullable<Text>,
        joined_at -> Timestamptz,
    }
}

diesel::joinable!(trips -> users (owner_id));
diesel::joinable!(trip_attendees -> trips (trip_id));
diesel::joinable!(trip_attendees -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(users, trips, trip_attendees);
