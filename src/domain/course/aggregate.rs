//! Course aggregate and sub-course tree.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CourseId, Timestamp, ValidationError};

use super::Price;

/// A course, possibly a sub-course of another course.
///
/// The parent/child relation forms a one-level tree: deleting a parent
/// removes its children first (the store enforces the ordering inside one
/// transaction).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    pub description: String,
    pub price: Price,
    pub video_url: Option<String>,
    pub cover_image: Option<String>,
    pub parent_course_id: Option<CourseId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Course {
    pub fn is_sub_course(&self) -> bool {
        self.parent_course_id.is_some()
    }
}

/// A course about to be inserted; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewCourse {
    pub title: String,
    pub description: String,
    pub price: Price,
    pub video_url: Option<String>,
    pub cover_image: Option<String>,
}

impl NewCourse {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        price: Price,
        video_url: Option<String>,
        cover_image: Option<String>,
    ) -> Result<Self, ValidationError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(ValidationError::empty_field("title"));
        }

        Ok(Self {
            title,
            description: description.into(),
            price,
            video_url,
            cover_image,
        })
    }
}

/// Partial update of course attributes. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct CourseUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<Price>,
    pub video_url: Option<String>,
    pub cover_image: Option<String>,
}

impl Course {
    /// Applies a partial update in place.
    pub fn apply_update(&mut self, update: CourseUpdate, now: Timestamp) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(video_url) = update.video_url {
            self.video_url = Some(video_url);
        }
        if let Some(cover_image) = update.cover_image {
            self.cover_image = Some(cover_image);
        }
        self.updated_at = now;
    }
}

/// A course together with its direct sub-courses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseTree {
    #[serde(flatten)]
    pub course: Course,
    pub sub_courses: Vec<Course>,
}
