//! SQL shared by the PostgreSQL and SQLite backends.
//!
//! Both engines accept `$N` placeholders, `NULLS LAST` and
//! `CAST(... AS DOUBLE PRECISION)`, so one text serves both.

/// `$1` user id, `$2` review limit.
pub const USER_WITH_LATEST_REVIEWS: &str = r#"
    SELECT
        u.id AS user_id,
        u.name AS user_name,
        u.image AS user_image,
        r.id AS review_id,
        r.body AS review_body,
        r.rating AS review_rating,
        m.id AS movie_id,
        m.image AS movie_image,
        m.title AS movie_title,
        (SELECT CAST(avg(mr.rating) AS DOUBLE PRECISION)
           FROM reviews mr
          WHERE mr.movie_id = m.id) AS movie_avg_rating
    FROM users u
    LEFT JOIN (
        SELECT id, body, rating, creation_time, author_id, movie_id
          FROM reviews
         WHERE author_id = $1
         ORDER BY creation_time DESC, id DESC
         LIMIT $2
    ) r ON r.author_id = u.id
    LEFT JOIN movies m ON m.id = r.movie_id
    WHERE u.id = $1
    ORDER BY r.creation_time DESC, r.id DESC
"#;

pub const PERSON: &str = r#"
    SELECT id, first_name, middle_name, last_name, image, bio
    FROM persons
    WHERE id = $1
"#;

pub const ACTED_IN: &str = r#"
    SELECT
        m.id, m.image, m.title, m.year,
        (SELECT CAST(avg(r.rating) AS DOUBLE PRECISION)
           FROM reviews r
          WHERE r.movie_id = m.id) AS avg_rating
    FROM actors a
    JOIN movies m ON m.id = a.movie_id
    WHERE a.person_id = $1
    ORDER BY m.year ASC, m.title ASC, m.id ASC
"#;

pub const DIRECTED: &str = r#"
    SELECT
        m.id, m.image, m.title, m.year,
        (SELECT CAST(avg(r.rating) AS DOUBLE PRECISION)
           FROM reviews r
          WHERE r.movie_id = m.id) AS avg_rating
    FROM directors d
    JOIN movies m ON m.id = d.movie_id
    WHERE d.person_id = $1
    ORDER BY m.year ASC, m.title ASC, m.id ASC
"#;

pub const MOVIE: &str = r#"
    SELECT id, image, title, year, description
    FROM movies
    WHERE id = $1
"#;

pub const DIRECTORS: &str = r#"
    SELECT
        p.id AS person_id, p.first_name, p.middle_name, p.last_name, p.image,
        d.list_order
    FROM directors d
    JOIN persons p ON p.id = d.person_id
    WHERE d.movie_id = $1
    ORDER BY d.list_order ASC NULLS LAST, p.last_name ASC, p.id ASC
"#;

pub const CAST: &str = r#"
    SELECT
        p.id AS person_id, p.first_name, p.middle_name, p.last_name, p.image,
        a.list_order
    FROM actors a
    JOIN persons p ON p.id = a.person_id
    WHERE a.movie_id = $1
    ORDER BY a.list_order ASC NULLS LAST, p.last_name ASC, p.id ASC
"#;

pub const MOVIE_REVIEWS: &str = r#"
    SELECT
        r.id AS review_id, r.body, r.rating,
        u.id AS author_id, u.name AS author_name, u.image AS author_image
    FROM reviews r
    JOIN users u ON u.id = r.author_id
    WHERE r.movie_id = $1
    ORDER BY r.creation_time DESC, r.id DESC
"#;

/// Id listing for the root table of an operation.
pub fn ids(table: &str) -> String {
    format!("SELECT id FROM {} ORDER BY id", table)
}
