//! Pure mapping from fetched rows to nested records.
//!
//! Nothing here touches a connection; row order is taken as given by the
//! queries.

use crate::error::{Error, Result};
use crate::model::{
    Author, MovieDetails, MovieListing, MovieReview, MovieSummary, PersonDetails, PersonSummary,
    UserDetails, UserReview,
};
use crate::rows::{CreditRow, FilmographyRow, MovieReviewRow, MovieRow, PersonRow, UserReviewRow};

/// Join name parts, skipping empty ones.
pub fn full_name(first: &str, middle: &str, last: &str) -> String {
    [first, middle, last]
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Arithmetic mean of `ratings`, `None` for an empty set.
pub fn mean_rating(ratings: impl IntoIterator<Item = i64>) -> Option<f64> {
    let (sum, count) = ratings
        .into_iter()
        .fold((0i64, 0u64), |(sum, count), rating| (sum + rating, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum as f64 / count as f64)
    }
}

/// Build a user record from the joined user/review rows.
///
/// Rows without a review id are the `LEFT JOIN` filler for a user with no
/// reviews and are skipped.
pub fn user_details(id: i64, rows: Vec<UserReviewRow>) -> Result<UserDetails> {
    let first = rows.first().ok_or(Error::NotFound { entity: "user", id })?;
    let mut details = UserDetails {
        id: first.user_id,
        name: first.user_name.clone(),
        image: first.user_image.clone(),
        latest_reviews: Vec::with_capacity(rows.len()),
    };

    for row in rows {
        let Some(review_id) = row.review_id else {
            continue;
        };
        details.latest_reviews.push(UserReview {
            id: review_id,
            body: row.review_body.unwrap_or_default(),
            rating: row.review_rating.unwrap_or_default(),
            movie: MovieSummary {
                id: row.movie_id.unwrap_or_default(),
                image: row.movie_image.unwrap_or_default(),
                title: row.movie_title.unwrap_or_default(),
                avg_rating: row.movie_avg_rating,
            },
        });
    }

    Ok(details)
}

fn movie_listing(row: FilmographyRow) -> MovieListing {
    MovieListing {
        id: row.id,
        image: row.image,
        title: row.title,
        year: row.year,
        avg_rating: row.avg_rating,
    }
}

/// Build a person record from the base row and both filmography lists.
pub fn person_details(
    person: PersonRow,
    acted_in: Vec<FilmographyRow>,
    directed: Vec<FilmographyRow>,
) -> PersonDetails {
    PersonDetails {
        id: person.id,
        full_name: full_name(&person.first_name, &person.middle_name, &person.last_name),
        image: person.image,
        bio: person.bio,
        acted_in: acted_in.into_iter().map(movie_listing).collect(),
        directed: directed.into_iter().map(movie_listing).collect(),
    }
}

fn person_summary(row: CreditRow) -> PersonSummary {
    PersonSummary {
        id: row.person_id,
        full_name: full_name(&row.first_name, &row.middle_name, &row.last_name),
        image: row.image,
    }
}

/// Build a movie record.
///
/// `avg_rating` is recomputed from `reviews` so it always agrees with the
/// review list in the same record.
pub fn movie_details(
    movie: MovieRow,
    directors: Vec<CreditRow>,
    cast: Vec<CreditRow>,
    reviews: Vec<MovieReviewRow>,
) -> MovieDetails {
    let avg_rating = mean_rating(reviews.iter().map(|review| review.rating));

    MovieDetails {
        id: movie.id,
        image: movie.image,
        title: movie.title,
        year: movie.year,
        description: movie.description,
        avg_rating,
        directors: directors.into_iter().map(person_summary).collect(),
        cast: cast.into_iter().map(person_summary).collect(),
        reviews: reviews
            .into_iter()
            .map(|row| MovieReview {
                id: row.review_id,
                body: row.body,
                rating: row.rating,
                author: Author {
                    id: row.author_id,
                    name: row.author_name,
                    image: row.author_image,
                },
            })
            .collect(),
    }
}
