//! Deterministic dataset generation.
//!
//! Every generator is seeded, so the same [`Scale`] always produces the
//! same rows and benchmark runs are comparable.

use chrono::{DateTime, Duration, Utc};
use clap::ValueEnum;
use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};

/// Scale factor for benchmark data generation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Scale {
    /// 10 users, 20 persons, 10 movies, 40 reviews.
    /// Use for quick tests and development iteration.
    Tiny,
    /// 100 users, 200 persons, 100 movies, 1,000 reviews.
    #[default]
    Small,
    /// 1,000 users, 2,000 persons, 1,000 movies, 20,000 reviews.
    Medium,
    /// 100,000 users and persons, 10,000 movies, 500,000 reviews.
    Large,
}

impl Scale {
    pub fn users(&self) -> usize {
        match self {
            Scale::Tiny => 10,
            Scale::Small => 100,
            Scale::Medium => 1_000,
            Scale::Large => 100_000,
        }
    }

    pub fn persons(&self) -> usize {
        match self {
            Scale::Tiny => 20,
            Scale::Small => 200,
            Scale::Medium => 2_000,
            Scale::Large => 100_000,
        }
    }

    pub fn movies(&self) -> usize {
        match self {
            Scale::Tiny => 10,
            Scale::Small => 100,
            Scale::Medium => 1_000,
            Scale::Large => 10_000,
        }
    }

    pub fn reviews(&self) -> usize {
        match self {
            Scale::Tiny => 40,
            Scale::Small => 1_000,
            Scale::Medium => 20_000,
            Scale::Large => 500_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserData {
    pub id: i64,
    pub name: String,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PersonData {
    pub id: i64,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub image: String,
    pub bio: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MovieData {
    pub id: i64,
    pub image: String,
    pub title: String,
    pub year: i64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReviewData {
    pub id: i64,
    pub body: String,
    pub rating: i64,
    pub creation_time: DateTime<Utc>,
    pub author_id: i64,
    pub movie_id: i64,
}

/// Director or cast edge.
#[derive(Debug, Clone, PartialEq)]
pub struct CreditData {
    pub id: i64,
    pub list_order: Option<i64>,
    pub person_id: i64,
    pub movie_id: i64,
}

/// A complete set of rows for every table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub users: Vec<UserData>,
    pub persons: Vec<PersonData>,
    pub movies: Vec<MovieData>,
    pub reviews: Vec<ReviewData>,
    pub directors: Vec<CreditData>,
    pub cast: Vec<CreditData>,
}

impl Dataset {
    /// Generate the dataset for `scale`.
    pub fn generate(scale: Scale) -> Self {
        let users = generate_users(scale.users());
        let persons = generate_persons(scale.persons());
        let movies = generate_movies(scale.movies());
        let reviews = generate_reviews(scale.reviews(), users.len(), movies.len());
        let (directors, cast) = generate_credits(movies.len(), persons.len());

        Self {
            users,
            persons,
            movies,
            reviews,
            directors,
            cast,
        }
    }
}

const FIRST_NAMES: [&str; 10] = [
    "Alice", "Bob", "Charlie", "David", "Eve", "Frank", "Grace", "Henry", "Ivy", "Jack",
];

const LAST_NAMES: [&str; 8] = [
    "Anderson", "Brooks", "Carter", "Diaz", "Ellis", "Foster", "Garcia", "Hughes",
];

const TITLE_WORDS: [&str; 8] = [
    "Night", "River", "Glass", "Empire", "Echo", "Harbor", "Signal", "Winter",
];

/// Generation starts at 2019-11-14T22:13:20Z.
const EPOCH_START_SECS: i64 = 1_573_769_600;

/// Reviews are spread over five years.
const REVIEW_WINDOW_SECS: i64 = 5 * 365 * 24 * 60 * 60;

/// Generate a random string of lowercase words.
fn random_text(rng: &mut StdRng, words: usize) -> String {
    (0..words)
        .map(|_| {
            let len = rng.gen_range(2..9);
            (0..len)
                .map(|_| rng.gen_range(b'a'..=b'z') as char)
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn generate_users(count: usize) -> Vec<UserData> {
    (0..count)
        .map(|i| {
            let id = i as i64 + 1;
            UserData {
                id,
                name: format!("{}_{}", FIRST_NAMES[i % FIRST_NAMES.len()], id),
                image: format!("images/user/{}.jpg", id),
            }
        })
        .collect()
}

pub fn generate_persons(count: usize) -> Vec<PersonData> {
    const SEED: u64 = 24680;
    let mut rng = StdRng::seed_from_u64(SEED);

    (0..count)
        .map(|i| {
            let id = i as i64 + 1;
            // Every third person has a middle name.
            let middle_name = if i % 3 == 0 {
                FIRST_NAMES[(i / 3) % FIRST_NAMES.len()].to_string()
            } else {
                String::new()
            };
            PersonData {
                id,
                first_name: FIRST_NAMES[i % FIRST_NAMES.len()].to_string(),
                middle_name,
                last_name: format!("{}{}", LAST_NAMES[(i / 2) % LAST_NAMES.len()], i / 16),
                image: format!("images/person/{}.jpg", id),
                bio: random_text(&mut rng, 12),
            }
        })
        .collect()
}

pub fn generate_movies(count: usize) -> Vec<MovieData> {
    const SEED: u64 = 13579;
    let mut rng = StdRng::seed_from_u64(SEED);

    (0..count)
        .map(|i| {
            let id = i as i64 + 1;
            let first = TITLE_WORDS[rng.gen_range(0..TITLE_WORDS.len())];
            let second = TITLE_WORDS[rng.gen_range(0..TITLE_WORDS.len())];
            MovieData {
                id,
                image: format!("images/movie/{}.jpg", id),
                title: format!("{} {} {}", first, second, id),
                year: rng.gen_range(1950..=2024),
                description: random_text(&mut rng, 20),
            }
        })
        .collect()
}

/// Generate reviews with random authors and movies from `1..=users` and
/// `1..=movies`. Timestamps have whole-second precision.
pub fn generate_reviews(count: usize, users: usize, movies: usize) -> Vec<ReviewData> {
    const SEED: u64 = 54321;
    let mut rng = StdRng::seed_from_u64(SEED);

    if users == 0 || movies == 0 {
        return Vec::new();
    }

    let start = DateTime::<Utc>::default() + Duration::seconds(EPOCH_START_SECS);

    (0..count)
        .map(|i| ReviewData {
            id: i as i64 + 1,
            body: random_text(&mut rng, 16),
            rating: rng.gen_range(1..=5),
            creation_time: start + Duration::seconds(rng.gen_range(0..REVIEW_WINDOW_SECS)),
            author_id: rng.gen_range(1..=users as i64),
            movie_id: rng.gen_range(1..=movies as i64),
        })
        .collect()
}

/// Generate director and cast edges for every movie.
///
/// Each movie gets one or two directors and two to six cast members, all
/// distinct persons. Roughly one edge in eight has no list order.
pub fn generate_credits(movies: usize, persons: usize) -> (Vec<CreditData>, Vec<CreditData>) {
    const SEED: u64 = 97531;
    let mut rng = StdRng::seed_from_u64(SEED);

    let mut directors = Vec::new();
    let mut cast = Vec::new();
    if persons == 0 {
        return (directors, cast);
    }

    for movie in 0..movies {
        let movie_id = movie as i64 + 1;
        let n_directors = rng.gen_range(1..=2).min(persons);
        let n_cast = rng.gen_range(2..=6).min(persons - n_directors);
        let picked = sample(&mut rng, persons, n_directors + n_cast);

        for (slot, person) in picked.iter().enumerate() {
            let list_order = if rng.gen_ratio(1, 8) {
                None
            } else {
                Some(slot as i64)
            };
            let edges = if slot < n_directors {
                &mut directors
            } else {
                &mut cast
            };
            edges.push(CreditData {
                id: edges.len() as i64 + 1,
                list_order,
                person_id: person as i64 + 1,
                movie_id,
            });
        }
    }

    (directors, cast)
}
