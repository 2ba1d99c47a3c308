//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Reader profiles. Account credentials live on the same row.
    profiles (id) {
        id -> Uuid,
        email -> Varchar,
        /// Argon2id PHC string.
        password_hash -> Text,
        full_name -> Nullable<Varchar>,
        avatar_url -> Nullable<Text>,
        bio -> Nullable<Varchar>,
        location -> Nullable<Varchar>,
        website -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Local book catalogue.
    books (id) {
        id -> Uuid,
        title -> Varchar,
        /// Lowercase, whitespace-collapsed title for duplicate detection.
        normalized_title -> Varchar,
        author -> Varchar,
        cover_url -> Nullable<Text>,
        isbn -> Nullable<Varchar>,
        publisher -> Nullable<Varchar>,
        published_date -> Nullable<Varchar>,
        page_count -> Nullable<Int4>,
        description -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Shelf entries; unique per (user_id, book_id).
    user_books (id) {
        id -> Uuid,
        user_id -> Uuid,
        book_id -> Uuid,
        status -> Varchar,
        rating -> Nullable<Int2>,
        notes -> Nullable<Text>,
        is_favorite -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Directed friendships; unique per unordered pair.
    friendships (id) {
        id -> Uuid,
        requester_id -> Uuid,
        addressee_id -> Uuid,
        status -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Recommendations; unique per (sender_id, receiver_id, book_id).
    book_recommendations (id) {
        id -> Uuid,
        sender_id -> Uuid,
        receiver_id -> Uuid,
        book_id -> Uuid,
        message -> Nullable<Varchar>,
        is_read -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    notifications (id) {
        id -> Uuid,
        user_id -> Uuid,
        #[sql_name = "type"]
        kind -> Varchar,
        title -> Text,
        message -> Text,
        related_user_id -> Nullable<Uuid>,
        related_book_id -> Nullable<Uuid>,
        is_read -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(user_books -> profiles (user_id));
diesel::joinable!(user_books -> books (book_id));
diesel::joinable!(book_recommendations -> books (book_id));
diesel::joinable!(notifications -> profiles (user_id));

diesel::allow_tables_to_appear_in_same_query!(
    profiles,
    books,
    user_books,
    friendships,
    book_recommendations,
    notifications,
);
