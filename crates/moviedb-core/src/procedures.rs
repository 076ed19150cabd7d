//! Read procedures and the operation dispatcher.

use serde::Serialize;

use crate::assemble;
use crate::error::{Error, Result};
use crate::model::{MovieDetails, PersonDetails, UserDetails};
use crate::operation::Operation;
use crate::session::{with_snapshot, Backend, Session};

/// Maximum number of reviews listed on a user page.
pub const LATEST_REVIEWS_LIMIT: i64 = 10;

/// Fetch a user with their latest reviews.
///
/// Issues a single statement on a plain pooled connection.
pub async fn user_details<B>(backend: &B, id: i64) -> Result<UserDetails>
where
    B: Backend + ?Sized,
{
    let mut conn = backend.acquire().await?;
    let rows = conn
        .user_with_latest_reviews(id, LATEST_REVIEWS_LIMIT)
        .await?;
    assemble::user_details(id, rows)
}

/// Fetch a person with both filmography lists from one snapshot.
pub async fn person_details<B>(backend: &B, id: i64) -> Result<PersonDetails>
where
    B: Backend + ?Sized,
{
    with_snapshot(backend, |tx| {
        Box::pin(async move {
            let person = tx
                .person(id)
                .await?
                .ok_or(Error::NotFound { entity: "person", id })?;
            let acted_in = tx.acted_in(id).await?;
            let directed = tx.directed(id).await?;
            Ok(assemble::person_details(person, acted_in, directed))
        })
    })
    .await
}

/// Fetch a movie with directors, cast and reviews from one snapshot.
pub async fn movie_details<B>(backend: &B, id: i64) -> Result<MovieDetails>
where
    B: Backend + ?Sized,
{
    with_snapshot(backend, |tx| {
        Box::pin(async move {
            let movie = tx
                .movie(id)
                .await?
                .ok_or(Error::NotFound { entity: "movie", id })?;
            let directors = tx.directors(id).await?;
            let cast = tx.cast(id).await?;
            let reviews = tx.movie_reviews(id).await?;
            Ok(assemble::movie_details(movie, directors, cast, reviews))
        })
    })
    .await
}

/// Result of any operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Details {
    User(UserDetails),
    Person(PersonDetails),
    Movie(MovieDetails),
}

/// Run `operation` for `id`.
pub async fn run<B>(backend: &B, operation: Operation, id: i64) -> Result<Details>
where
    B: Backend + ?Sized,
{
    tracing::trace!(backend = backend.name(), %operation, id, "running operation");

    let details = match operation {
        Operation::GetUser => Details::User(user_details(backend, id).await?),
        Operation::GetPerson => Details::Person(person_details(backend, id).await?),
        Operation::GetMovie => Details::Movie(movie_details(backend, id).await?),
    };
    Ok(details)
}

/// Run `operation` for `id` and encode the record as JSON.
pub async fn bench_query<B>(backend: &B, operation: Operation, id: i64) -> Result<String>
where
    B: Backend + ?Sized,
{
    let details = run(backend, operation, id).await?;
    Ok(serde_json::to_string(&details)?)
}

/// Like [`bench_query`], resolving the operation by name first.
pub async fn bench_query_named<B>(backend: &B, operation: &str, id: i64) -> Result<String>
where
    B: Backend + ?Sized,
{
    let operation = operation.parse::<Operation>()?;
    bench_query(backend, operation, id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rows::{CreditRow, FilmographyRow, MovieReviewRow, MovieRow, PersonRow, UserReviewRow};
    use crate::session::testing::{Event, FakeBackend, Fixture};
    use crate::session::IsolationLevel;

    fn person() -> PersonRow {
        PersonRow {
            id: 9,
            first_name: "Greta".to_string(),
            middle_name: String::new(),
            last_name: "Gerwig".to_string(),
            image: "p9.jpg".to_string(),
            bio: "Writer and director.".to_string(),
        }
    }

    fn film(id: i64, year: i64) -> FilmographyRow {
        FilmographyRow {
            id,
            image: format!("m{}.jpg", id),
            title: format!("Movie {}", id),
            year,
            avg_rating: Some(7.5),
        }
    }

    fn movie_fixture() -> Fixture {
        Fixture {
            movie: Some(MovieRow {
                id: 42,
                image: "m42.jpg".to_string(),
                title: "Lady Bird".to_string(),
                year: 2017,
                description: "Sacramento.".to_string(),
            }),
            directors: vec![CreditRow {
                person_id: 9,
                first_name: "Greta".to_string(),
                middle_name: String::new(),
                last_name: "Gerwig".to_string(),
                image: "p9.jpg".to_string(),
                list_order: Some(1),
            }],
            reviews: [4, 5, 6]
                .into_iter()
                .enumerate()
                .map(|(i, rating)| MovieReviewRow {
                    review_id: i as i64 + 1,
                    body: "ok".to_string(),
                    rating,
                    author_id: 1,
                    author_name: "Alice".to_string(),
                    author_image: "u1.jpg".to_string(),
                })
                .collect(),
            ..Fixture::default()
        }
    }

    #[tokio::test]
    async fn test_user_details_skips_transaction() {
        let backend = FakeBackend::new(Fixture {
            users: vec![UserReviewRow {
                user_id: 1,
                user_name: "Alice".to_string(),
                user_image: "u1.jpg".to_string(),
                review_id: None,
                review_body: None,
                review_rating: None,
                movie_id: None,
                movie_image: None,
                movie_title: None,
                movie_avg_rating: None,
            }],
            ..Fixture::default()
        });

        let details = user_details(&backend, 1).await.unwrap();
        assert!(details.latest_reviews.is_empty());
        assert_eq!(backend.events(), vec![Event::Acquire, Event::Release]);
    }

    #[tokio::test]
    async fn test_person_details_uses_one_snapshot() {
        let backend = FakeBackend::new(Fixture {
            person: Some(person()),
            acted_in: vec![film(1, 2010)],
            directed: vec![film(2, 2017), film(3, 2019)],
            ..Fixture::default()
        });

        let details = person_details(&backend, 9).await.unwrap();

        assert_eq!(details.full_name, "Greta Gerwig");
        assert_eq!(details.directed.len(), 2);
        assert_eq!(
            backend.events(),
            vec![
                Event::Begin(IsolationLevel::RepeatableRead),
                Event::Commit,
                Event::Release,
            ]
        );
    }

    #[tokio::test]
    async fn test_person_missing_rolls_back() {
        let backend = FakeBackend::new(Fixture::default());

        let err = person_details(&backend, 9).await.unwrap_err();

        assert!(matches!(err, Error::NotFound { entity: "person", id: 9 }));
        assert!(backend.events().contains(&Event::Rollback));
        assert!(!backend.events().contains(&Event::Commit));
    }

    #[tokio::test]
    async fn test_relation_failure_propagates_after_rollback() {
        let backend = FakeBackend::new(Fixture {
            fail_on: Some("cast"),
            ..movie_fixture()
        });

        let err = movie_details(&backend, 42).await.unwrap_err();

        assert!(matches!(err, Error::Database(_)));
        assert_eq!(
            backend.events(),
            vec![
                Event::Begin(IsolationLevel::RepeatableRead),
                Event::Rollback,
                Event::Release,
            ]
        );
    }

    #[tokio::test]
    async fn test_movie_avg_rating_from_reviews() {
        let backend = FakeBackend::new(movie_fixture());

        let json = bench_query(&backend, Operation::GetMovie, 42).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["avg_rating"], serde_json::json!(5.0));
        assert_eq!(value["directors"][0]["full_name"], "Greta Gerwig");
        assert_eq!(value["reviews"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_named_dispatch_rejects_unknown_operation() {
        let backend = FakeBackend::new(movie_fixture());

        let err = bench_query_named(&backend, "get_everything", 1)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::InvalidOperation(_)));
        assert!(backend.events().is_empty());
    }
}
