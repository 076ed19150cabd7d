//! Flat row types, one per query.
//!
//! Every field decodes the same way on PostgreSQL and SQLite. Averages are
//! cast to `DOUBLE PRECISION` in SQL so they arrive here as `f64`.

use sqlx::FromRow;

/// User joined to one of their latest reviews.
///
/// A user without reviews produces exactly one row with all review columns
/// set to `NULL`.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct UserReviewRow {
    pub user_id: i64,
    pub user_name: String,
    pub user_image: String,
    pub review_id: Option<i64>,
    pub review_body: Option<String>,
    pub review_rating: Option<i64>,
    pub movie_id: Option<i64>,
    pub movie_image: Option<String>,
    pub movie_title: Option<String>,
    pub movie_avg_rating: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct PersonRow {
    pub id: i64,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub image: String,
    pub bio: String,
}

/// Movie a person acted in or directed.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct FilmographyRow {
    pub id: i64,
    pub image: String,
    pub title: String,
    pub year: i64,
    pub avg_rating: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct MovieRow {
    pub id: i64,
    pub image: String,
    pub title: String,
    pub year: i64,
    pub description: String,
}

/// Person attached to a movie through a director or cast edge.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct CreditRow {
    pub person_id: i64,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub image: String,
    pub list_order: Option<i64>,
}

/// Review of a movie joined to its author.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct MovieReviewRow {
    pub review_id: i64,
    pub body: String,
    pub rating: i64,
    pub author_id: i64,
    pub author_name: String,
    pub author_image: String,
}
