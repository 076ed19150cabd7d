//! Schema setup and dataset population for both backends.

use sqlx::{PgPool, Postgres, QueryBuilder, Sqlite, SqlitePool};

use crate::error::Result;
use crate::fixtures::Dataset;

/// Rows per multi-row `INSERT`.
/// Kept well below the bind parameter limits of both engines.
const POPULATION_BATCH_SIZE: usize = 1_000;

pub const POSTGRES_SCHEMA: &str = r#"
    DROP TABLE IF EXISTS reviews, directors, actors, movies, persons, users CASCADE;

    CREATE TABLE users (
        id BIGINT PRIMARY KEY,
        name TEXT NOT NULL,
        image TEXT NOT NULL
    );

    CREATE TABLE persons (
        id BIGINT PRIMARY KEY,
        first_name TEXT NOT NULL,
        middle_name TEXT NOT NULL DEFAULT '',
        last_name TEXT NOT NULL,
        image TEXT NOT NULL,
        bio TEXT NOT NULL
    );

    CREATE TABLE movies (
        id BIGINT PRIMARY KEY,
        image TEXT NOT NULL,
        title TEXT NOT NULL,
        year BIGINT NOT NULL,
        description TEXT NOT NULL
    );

    CREATE TABLE reviews (
        id BIGINT PRIMARY KEY,
        body TEXT NOT NULL,
        rating BIGINT NOT NULL,
        creation_time TIMESTAMPTZ NOT NULL,
        author_id BIGINT NOT NULL REFERENCES users(id),
        movie_id BIGINT NOT NULL REFERENCES movies(id)
    );

    CREATE TABLE directors (
        id BIGINT PRIMARY KEY,
        list_order BIGINT,
        person_id BIGINT NOT NULL REFERENCES persons(id),
        movie_id BIGINT NOT NULL REFERENCES movies(id)
    );

    CREATE TABLE actors (
        id BIGINT PRIMARY KEY,
        list_order BIGINT,
        person_id BIGINT NOT NULL REFERENCES persons(id),
        movie_id BIGINT NOT NULL REFERENCES movies(id)
    );

    CREATE INDEX idx_reviews_author ON reviews(author_id);
    CREATE INDEX idx_reviews_movie ON reviews(movie_id);
    CREATE INDEX idx_reviews_creation_time ON reviews(creation_time);
    CREATE INDEX idx_directors_person ON directors(person_id);
    CREATE INDEX idx_directors_movie ON directors(movie_id);
    CREATE INDEX idx_actors_person ON actors(person_id);
    CREATE INDEX idx_actors_movie ON actors(movie_id);
"#;

pub const SQLITE_SCHEMA: &str = r#"
    DROP TABLE IF EXISTS reviews;
    DROP TABLE IF EXISTS directors;
    DROP TABLE IF EXISTS actors;
    DROP TABLE IF EXISTS movies;
    DROP TABLE IF EXISTS persons;
    DROP TABLE IF EXISTS users;

    CREATE TABLE users (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        image TEXT NOT NULL
    );

    CREATE TABLE persons (
        id INTEGER PRIMARY KEY,
        first_name TEXT NOT NULL,
        middle_name TEXT NOT NULL DEFAULT '',
        last_name TEXT NOT NULL,
        image TEXT NOT NULL,
        bio TEXT NOT NULL
    );

    CREATE TABLE movies (
        id INTEGER PRIMARY KEY,
        image TEXT NOT NULL,
        title TEXT NOT NULL,
        year INTEGER NOT NULL,
        description TEXT NOT NULL
    );

    CREATE TABLE reviews (
        id INTEGER PRIMARY KEY,
        body TEXT NOT NULL,
        rating INTEGER NOT NULL,
        creation_time TEXT NOT NULL,
        author_id INTEGER NOT NULL REFERENCES users(id),
        movie_id INTEGER NOT NULL REFERENCES movies(id)
    );

    CREATE TABLE directors (
        id INTEGER PRIMARY KEY,
        list_order INTEGER,
        person_id INTEGER NOT NULL REFERENCES persons(id),
        movie_id INTEGER NOT NULL REFERENCES movies(id)
    );

    CREATE TABLE actors (
        id INTEGER PRIMARY KEY,
        list_order INTEGER,
        person_id INTEGER NOT NULL REFERENCES persons(id),
        movie_id INTEGER NOT NULL REFERENCES movies(id)
    );

    CREATE INDEX idx_reviews_author ON reviews(author_id);
    CREATE INDEX idx_reviews_movie ON reviews(movie_id);
    CREATE INDEX idx_reviews_creation_time ON reviews(creation_time);
    CREATE INDEX idx_directors_person ON directors(person_id);
    CREATE INDEX idx_directors_movie ON directors(movie_id);
    CREATE INDEX idx_actors_person ON actors(person_id);
    CREATE INDEX idx_actors_movie ON actors(movie_id);
"#;

/// Insert every table of a dataset inside one transaction.
///
/// Parents are written before children so foreign keys hold at every step.
macro_rules! populate_with {
    ($db:ty, $pool:expr, $dataset:expr) => {{
        let dataset: &Dataset = $dataset;
        let mut tx = $pool.begin().await?;

        for chunk in dataset.users.chunks(POPULATION_BATCH_SIZE) {
            let mut builder = QueryBuilder::<$db>::new("INSERT INTO users (id, name, image) ");
            builder.push_values(chunk, |mut row, user| {
                row.push_bind(user.id)
                    .push_bind(user.name.as_str())
                    .push_bind(user.image.as_str());
            });
            builder.build().execute(&mut *tx).await?;
        }

        for chunk in dataset.persons.chunks(POPULATION_BATCH_SIZE) {
            let mut builder = QueryBuilder::<$db>::new(
                "INSERT INTO persons (id, first_name, middle_name, last_name, image, bio) ",
            );
            builder.push_values(chunk, |mut row, person| {
                row.push_bind(person.id)
                    .push_bind(person.first_name.as_str())
                    .push_bind(person.middle_name.as_str())
                    .push_bind(person.last_name.as_str())
                    .push_bind(person.image.as_str())
                    .push_bind(person.bio.as_str());
            });
            builder.build().execute(&mut *tx).await?;
        }

        for chunk in dataset.movies.chunks(POPULATION_BATCH_SIZE) {
            let mut builder = QueryBuilder::<$db>::new(
                "INSERT INTO movies (id, image, title, year, description) ",
            );
            builder.push_values(chunk, |mut row, movie| {
                row.push_bind(movie.id)
                    .push_bind(movie.image.as_str())
                    .push_bind(movie.title.as_str())
                    .push_bind(movie.year)
                    .push_bind(movie.description.as_str());
            });
            builder.build().execute(&mut *tx).await?;
        }

        for chunk in dataset.reviews.chunks(POPULATION_BATCH_SIZE) {
            let mut builder = QueryBuilder::<$db>::new(
                "INSERT INTO reviews (id, body, rating, creation_time, author_id, movie_id) ",
            );
            builder.push_values(chunk, |mut row, review| {
                row.push_bind(review.id)
                    .push_bind(review.body.as_str())
                    .push_bind(review.rating)
                    .push_bind(review.creation_time)
                    .push_bind(review.author_id)
                    .push_bind(review.movie_id);
            });
            builder.build().execute(&mut *tx).await?;
        }

        for (table, edges) in [("directors", &dataset.directors), ("actors", &dataset.cast)] {
            for chunk in edges.chunks(POPULATION_BATCH_SIZE) {
                let mut builder = QueryBuilder::<$db>::new(format!(
                    "INSERT INTO {} (id, list_order, person_id, movie_id) ",
                    table
                ));
                builder.push_values(chunk, |mut row, edge| {
                    row.push_bind(edge.id)
                        .push_bind(edge.list_order)
                        .push_bind(edge.person_id)
                        .push_bind(edge.movie_id);
                });
                builder.build().execute(&mut *tx).await?;
            }
        }

        tx.commit().await?;

        tracing::info!(
            users = dataset.users.len(),
            persons = dataset.persons.len(),
            movies = dataset.movies.len(),
            reviews = dataset.reviews.len(),
            "dataset populated"
        );
        Ok(())
    }};
}

/// Drop and recreate every table.
pub async fn setup_postgres(pool: &PgPool) -> Result<()> {
    sqlx::raw_sql(POSTGRES_SCHEMA).execute(pool).await?;
    Ok(())
}

pub async fn populate_postgres(pool: &PgPool, dataset: &Dataset) -> Result<()> {
    populate_with!(Postgres, pool, dataset)
}

/// Drop and recreate every table.
pub async fn setup_sqlite(pool: &SqlitePool) -> Result<()> {
    sqlx::raw_sql(SQLITE_SCHEMA).execute(pool).await?;
    Ok(())
}

pub async fn populate_sqlite(pool: &SqlitePool, dataset: &Dataset) -> Result<()> {
    populate_with!(Sqlite, pool, dataset)
}
