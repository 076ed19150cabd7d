//! Database backends.
//!
//! Each backend wraps an `sqlx` pool. Pooled connections and open
//! transactions are both exposed as sessions; the queries themselves are
//! shared in [`sql`].

/// Implement [`crate::session::Session`] for a session wrapper whose inner
/// handle dereferences to the given `sqlx` connection type.
macro_rules! impl_session {
    ($session:ident, $conn:ty) => {
        #[async_trait::async_trait]
        impl<C> $crate::session::Session for $session<C>
        where
            C: std::ops::DerefMut<Target = $conn> + Send,
        {
            async fn user_with_latest_reviews(
                &mut self,
                id: i64,
                limit: i64,
            ) -> $crate::error::Result<Vec<$crate::rows::UserReviewRow>> {
                Ok(sqlx::query_as($crate::backends::sql::USER_WITH_LATEST_REVIEWS)
                    .bind(id)
                    .bind(limit)
                    .fetch_all(&mut *self.conn)
                    .await?)
            }

            async fn person(
                &mut self,
                id: i64,
            ) -> $crate::error::Result<Option<$crate::rows::PersonRow>> {
                Ok(sqlx::query_as($crate::backends::sql::PERSON)
                    .bind(id)
                    .fetch_optional(&mut *self.conn)
                    .await?)
            }

            async fn acted_in(
                &mut self,
                person_id: i64,
            ) -> $crate::error::Result<Vec<$crate::rows::FilmographyRow>> {
                Ok(sqlx::query_as($crate::backends::sql::ACTED_IN)
                    .bind(person_id)
                    .fetch_all(&mut *self.conn)
                    .await?)
            }

            async fn directed(
                &mut self,
                person_id: i64,
            ) -> $crate::error::Result<Vec<$crate::rows::FilmographyRow>> {
                Ok(sqlx::query_as($crate::backends::sql::DIRECTED)
                    .bind(person_id)
                    .fetch_all(&mut *self.conn)
                    .await?)
            }

            async fn movie(
                &mut self,
                id: i64,
            ) -> $crate::error::Result<Option<$crate::rows::MovieRow>> {
                Ok(sqlx::query_as($crate::backends::sql::MOVIE)
                    .bind(id)
                    .fetch_optional(&mut *self.conn)
                    .await?)
            }

            async fn directors(
                &mut self,
                movie_id: i64,
            ) -> $crate::error::Result<Vec<$crate::rows::CreditRow>> {
                Ok(sqlx::query_as($crate::backends::sql::DIRECTORS)
                    .bind(movie_id)
                    .fetch_all(&mut *self.conn)
                    .await?)
            }

            async fn cast(
                &mut self,
                movie_id: i64,
            ) -> $crate::error::Result<Vec<$crate::rows::CreditRow>> {
                Ok(sqlx::query_as($crate::backends::sql::CAST)
                    .bind(movie_id)
                    .fetch_all(&mut *self.conn)
                    .await?)
            }

            async fn movie_reviews(
                &mut self,
                movie_id: i64,
            ) -> $crate::error::Result<Vec<$crate::rows::MovieReviewRow>> {
                Ok(sqlx::query_as($crate::backends::sql::MOVIE_REVIEWS)
                    .bind(movie_id)
                    .fetch_all(&mut *self.conn)
                    .await?)
            }

            async fn ids(
                &mut self,
                operation: $crate::operation::Operation,
            ) -> $crate::error::Result<Vec<i64>> {
                let sql = $crate::backends::sql::ids(operation.table());
                Ok(sqlx::query_scalar(&sql).fetch_all(&mut *self.conn).await?)
            }
        }
    };
}

pub mod postgres;
pub mod sql;
pub mod sqlite;

pub use postgres::PostgresBackend;
pub use sqlite::SqliteBackend;
