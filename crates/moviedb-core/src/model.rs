//! Nested output records.
//!
//! These are the JSON shapes returned by the read procedures. They are
//! built once per call by [`crate::assemble`] and never mutated.

use serde::Serialize;

/// `get_user` result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserDetails {
    pub id: i64,
    pub name: String,
    pub image: String,
    /// Newest first, at most [`crate::procedures::LATEST_REVIEWS_LIMIT`].
    pub latest_reviews: Vec<UserReview>,
}

/// A review as listed on its author's page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserReview {
    pub id: i64,
    pub body: String,
    pub rating: i64,
    pub movie: MovieSummary,
}

/// Short movie reference embedded in a review.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieSummary {
    pub id: i64,
    pub image: String,
    pub title: String,
    pub avg_rating: Option<f64>,
}

/// `get_person` result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonDetails {
    pub id: i64,
    pub full_name: String,
    pub image: String,
    pub bio: String,
    pub acted_in: Vec<MovieListing>,
    pub directed: Vec<MovieListing>,
}

/// A movie in a person's filmography.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieListing {
    pub id: i64,
    pub image: String,
    pub title: String,
    pub year: i64,
    pub avg_rating: Option<f64>,
}

/// `get_movie` result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieDetails {
    pub id: i64,
    pub image: String,
    pub title: String,
    pub year: i64,
    pub description: String,
    /// Mean of `reviews[*].rating`, `None` when there are no reviews.
    pub avg_rating: Option<f64>,
    pub directors: Vec<PersonSummary>,
    pub cast: Vec<PersonSummary>,
    pub reviews: Vec<MovieReview>,
}

/// Director or cast member of a movie.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonSummary {
    pub id: i64,
    pub full_name: String,
    pub image: String,
}

/// A review as listed on a movie's page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieReview {
    pub id: i64,
    pub body: String,
    pub rating: i64,
    pub author: Author,
}

/// Review author.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Author {
    pub id: i64,
    pub name: String,
    pub image: String,
}
