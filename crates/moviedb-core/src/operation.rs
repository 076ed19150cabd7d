//! Benchmark operations.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::Error;

/// A read procedure the dispatcher can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    GetUser,
    GetPerson,
    GetMovie,
}

impl Operation {
    /// All operations, in report order.
    pub const ALL: [Operation; 3] = [Operation::GetUser, Operation::GetPerson, Operation::GetMovie];

    /// Wire name of the operation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::GetUser => "get_user",
            Operation::GetPerson => "get_person",
            Operation::GetMovie => "get_movie",
        }
    }

    /// Table holding the root entity of this operation.
    pub fn table(&self) -> &'static str {
        match self {
            Operation::GetUser => "users",
            Operation::GetPerson => "persons",
            Operation::GetMovie => "movies",
        }
    }

    /// Singular entity name used in errors and logs.
    pub fn entity(&self) -> &'static str {
        match self {
            Operation::GetUser => "user",
            Operation::GetPerson => "person",
            Operation::GetMovie => "movie",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "get_user" => Ok(Operation::GetUser),
            "get_person" => Ok(Operation::GetPerson),
            "get_movie" => Ok(Operation::GetMovie),
            other => Err(Error::InvalidOperation(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_names() {
        for op in Operation::ALL {
            assert_eq!(op.as_str().parse::<Operation>().unwrap(), op);
        }
    }

    #[test]
    fn test_unknown_name_is_rejected() {
        let err = "get_review".parse::<Operation>().unwrap_err();
        assert!(matches!(err, Error::InvalidOperation(name) if name == "get_review"));
    }

    #[test]
    fn test_serializes_as_snake_case() {
        assert_eq!(
            serde_json::to_string(&Operation::GetPerson).unwrap(),
            r#""get_person""#
        );
    }
}
