//! Session capability consumed by the read procedures.
//!
//! A [`Backend`] hands out pooled connections and transactions. Both
//! implement [`Session`], which runs the fixed set of parameterized reads.
//! Dropping either returns the connection to its pool; dropping an
//! uncommitted transaction rolls it back.

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::error::Result;
use crate::operation::Operation;
use crate::rows::{CreditRow, FilmographyRow, MovieReviewRow, MovieRow, PersonRow, UserReviewRow};

/// Transaction isolation level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsolationLevel {
    ReadCommitted,
    RepeatableRead,
    Serializable,
}

impl IsolationLevel {
    /// SQL keyword form, as used in `SET TRANSACTION ISOLATION LEVEL`.
    pub fn as_sql(&self) -> &'static str {
        match self {
            IsolationLevel::ReadCommitted => "READ COMMITTED",
            IsolationLevel::RepeatableRead => "REPEATABLE READ",
            IsolationLevel::Serializable => "SERIALIZABLE",
        }
    }
}

/// Parameterized reads against one checked-out connection.
#[async_trait]
pub trait Session: Send {
    /// User row left-joined to at most `limit` of their newest reviews.
    async fn user_with_latest_reviews(&mut self, id: i64, limit: i64)
        -> Result<Vec<UserReviewRow>>;

    async fn person(&mut self, id: i64) -> Result<Option<PersonRow>>;

    /// Movies the person acted in, by year then title.
    async fn acted_in(&mut self, person_id: i64) -> Result<Vec<FilmographyRow>>;

    /// Movies the person directed, by year then title.
    async fn directed(&mut self, person_id: i64) -> Result<Vec<FilmographyRow>>;

    async fn movie(&mut self, id: i64) -> Result<Option<MovieRow>>;

    /// Director edges, by list order (nulls last) then last name.
    async fn directors(&mut self, movie_id: i64) -> Result<Vec<CreditRow>>;

    /// Cast edges, by list order (nulls last) then last name.
    async fn cast(&mut self, movie_id: i64) -> Result<Vec<CreditRow>>;

    /// Reviews of a movie with their authors, newest first.
    async fn movie_reviews(&mut self, movie_id: i64) -> Result<Vec<MovieReviewRow>>;

    /// Every id of the root entity of `operation`.
    async fn ids(&mut self, operation: Operation) -> Result<Vec<i64>>;
}

/// A session inside an open transaction.
#[async_trait]
pub trait TransactionSession: Session + Sized {
    async fn commit(self) -> Result<()>;

    async fn rollback(self) -> Result<()>;
}

/// A pooled database the procedures run against.
#[async_trait]
pub trait Backend: Send + Sync {
    type Connection: Session;
    type Transaction: TransactionSession;

    /// Short name used in reports.
    fn name(&self) -> &str;

    /// Check a connection out of the pool.
    async fn acquire(&self) -> Result<Self::Connection>;

    /// Check a connection out of the pool and begin a transaction on it.
    async fn begin(&self, isolation: IsolationLevel) -> Result<Self::Transaction>;

    /// Close the pool, waiting for checked-out connections to return.
    async fn close(&self);
}

/// Run `steps` inside one REPEATABLE READ transaction.
///
/// Commits when `steps` succeeds. On failure the transaction is rolled back
/// and the error from `steps` is returned; a failing rollback is only
/// logged. If the returned future is dropped early the transaction handle is
/// dropped with it, which rolls back and releases the connection.
pub async fn with_snapshot<B, T, F>(backend: &B, steps: F) -> Result<T>
where
    B: Backend + ?Sized,
    T: Send,
    F: for<'t> FnOnce(&'t mut B::Transaction) -> BoxFuture<'t, Result<T>> + Send,
{
    let mut tx = backend.begin(IsolationLevel::RepeatableRead).await?;

    match steps(&mut tx).await {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::warn!(
                    backend = backend.name(),
                    error = %rollback_err,
                    "rollback failed"
                );
            }
            Err(err)
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory backend that records transaction lifecycle events.

    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::error::Error;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Event {
        Acquire,
        Begin(IsolationLevel),
        Commit,
        Rollback,
        Release,
    }

    #[derive(Clone, Default)]
    pub struct Fixture {
        pub users: Vec<UserReviewRow>,
        pub person: Option<PersonRow>,
        pub acted_in: Vec<FilmographyRow>,
        pub directed: Vec<FilmographyRow>,
        pub movie: Option<MovieRow>,
        pub directors: Vec<CreditRow>,
        pub cast: Vec<CreditRow>,
        pub reviews: Vec<MovieReviewRow>,
        pub ids: Vec<i64>,
        /// Fail the statement with this name.
        pub fail_on: Option<&'static str>,
    }

    #[derive(Clone, Default)]
    pub struct FakeBackend {
        pub fixture: Fixture,
        pub events: Arc<Mutex<Vec<Event>>>,
    }

    impl FakeBackend {
        pub fn new(fixture: Fixture) -> Self {
            Self {
                fixture,
                events: Arc::default(),
            }
        }

        pub fn events(&self) -> Vec<Event> {
            self.events.lock().unwrap().clone()
        }

        fn session(&self) -> FakeSession {
            FakeSession {
                fixture: self.fixture.clone(),
                events: self.events.clone(),
            }
        }
    }

    pub struct FakeSession {
        fixture: Fixture,
        events: Arc<Mutex<Vec<Event>>>,
    }

    impl FakeSession {
        fn record(&self, event: Event) {
            self.events.lock().unwrap().push(event);
        }

        fn check(&self, statement: &'static str) -> Result<()> {
            if self.fixture.fail_on == Some(statement) {
                return Err(Error::Database(sqlx::Error::Protocol(format!(
                    "{} failed",
                    statement
                ))));
            }
            Ok(())
        }
    }

    impl Drop for FakeSession {
        fn drop(&mut self) {
            self.record(Event::Release);
        }
    }

    #[async_trait]
    impl Session for FakeSession {
        async fn user_with_latest_reviews(
            &mut self,
            _id: i64,
            limit: i64,
        ) -> Result<Vec<UserReviewRow>> {
            self.check("user")?;
            Ok(self.fixture.users.iter().take(limit as usize).cloned().collect())
        }

        async fn person(&mut self, _id: i64) -> Result<Option<PersonRow>> {
            self.check("person")?;
            Ok(self.fixture.person.clone())
        }

        async fn acted_in(&mut self, _person_id: i64) -> Result<Vec<FilmographyRow>> {
            self.check("acted_in")?;
            Ok(self.fixture.acted_in.clone())
        }

        async fn directed(&mut self, _person_id: i64) -> Result<Vec<FilmographyRow>> {
            self.check("directed")?;
            Ok(self.fixture.directed.clone())
        }

        async fn movie(&mut self, _id: i64) -> Result<Option<MovieRow>> {
            self.check("movie")?;
            Ok(self.fixture.movie.clone())
        }

        async fn directors(&mut self, _movie_id: i64) -> Result<Vec<CreditRow>> {
            self.check("directors")?;
            Ok(self.fixture.directors.clone())
        }

        async fn cast(&mut self, _movie_id: i64) -> Result<Vec<CreditRow>> {
            self.check("cast")?;
            Ok(self.fixture.cast.clone())
        }

        async fn movie_reviews(&mut self, _movie_id: i64) -> Result<Vec<MovieReviewRow>> {
            self.check("reviews")?;
            Ok(self.fixture.reviews.clone())
        }

        async fn ids(&mut self, _operation: Operation) -> Result<Vec<i64>> {
            self.check("ids")?;
            Ok(self.fixture.ids.clone())
        }
    }

    #[async_trait]
    impl TransactionSession for FakeSession {
        async fn commit(self) -> Result<()> {
            self.check("commit")?;
            self.record(Event::Commit);
            Ok(())
        }

        async fn rollback(self) -> Result<()> {
            self.record(Event::Rollback);
            Ok(())
        }
    }

    #[async_trait]
    impl Backend for FakeBackend {
        type Connection = FakeSession;
        type Transaction = FakeSession;

        fn name(&self) -> &str {
            "fake"
        }

        async fn acquire(&self) -> Result<FakeSession> {
            self.events.lock().unwrap().push(Event::Acquire);
            Ok(self.session())
        }

        async fn begin(&self, isolation: IsolationLevel) -> Result<FakeSession> {
            self.events.lock().unwrap().push(Event::Begin(isolation));
            Ok(self.session())
        }

        async fn close(&self) {}
    }
}
