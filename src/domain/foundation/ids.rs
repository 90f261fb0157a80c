//! Strongly-typed identifier value objects.
//!
//! Records use database-assigned numeric identifiers, so each id wraps an
//! `i64` rather than a generated UUID.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Unique identifier for a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Creates a UserId from a raw database id.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the inner numeric id.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

/// Unique identifier for a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseId(i64);

impl CourseId {
    /// Creates a CourseId from a raw database id.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the inner numeric id.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CourseId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

/// Unique identifier for a quiz question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(i64);

impl QuestionId {
    /// Creates a QuestionId from a raw database id.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the inner numeric id.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for QuestionId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_roundtrips_through_display() {
        let id = UserId::new(7);
        assert_eq!(id.to_string(), "7");
        assert_eq!("7".parse::<UserId>().unwrap(), id);
    }

    #[test]
    fn course_id_parses_with_whitespace() {
        assert_eq!(" 42 ".parse::<CourseId>().unwrap(), CourseId::new(42));
    }

    #[test]
    fn ids_reject_non_numeric_input() {
        assert!("abc".parse::<UserId>().is_err());
        assert!("".parse::<CourseId>().is_err());
        assert!("1.5".parse::<QuestionId>().is_err());
    }

    #[test]
    fn ids_serialize_transparently() {
        let json = serde_json::to_string(&CourseId::new(3)).unwrap();
        assert_eq!(json, "3");
        let back: CourseId = serde_json::from_str("3").unwrap();
        assert_eq!(back, CourseId::new(3));
    }
}
