//! PostgreSQL implementation of CourseRepository.
//!
//! Sub-courses reference their parent through `parent_course_id` with a
//! RESTRICT foreign key, so the delete path removes children inside the
//! same transaction before touching the parent. Questions hang off a
//! cascading foreign key and disappear with their course.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};

use crate::domain::course::{Course, CourseTree, CourseUpdate, NewCourse, Price};
use crate::domain::foundation::{CourseId, DomainError, ErrorCode, Timestamp};
use crate::ports::CourseRepository;

/// PostgreSQL implementation of the CourseRepository port.
pub struct PostgresCourseRepository {
    pool: PgPool,
}

impl PostgresCourseRepository {
    /// Creates a new repository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a course.
#[derive(Debug, sqlx::FromRow)]
struct CourseRow {
    id: i64,
    title: String,
    description: String,
    price_cents: i64,
    video_url: Option<String>,
    cover_image: Option<String>,
    parent_course_id: Option<i64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<CourseRow> for Course {
    type Error = DomainError;

    fn try_from(row: CourseRow) -> Result<Self, Self::Error> {
        let price = Price::from_cents(row.price_cents).map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid price: {}", e))
        })?;

        Ok(Course {
            id: CourseId::new(row.id),
            title: row.title,
            description: row.description,
            price,
            video_url: row.video_url,
            cover_image: row.cover_image,
            parent_course_id: row.parent_course_id.map(CourseId::new),
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

const COURSE_COLUMNS: &str = "id, title, description, price_cents, video_url, cover_image, \
                              parent_course_id, created_at, updated_at";

fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("{}: {}", context, e))
}

async fn insert_course(
    tx: &mut Transaction<'_, Postgres>,
    course: &NewCourse,
    parent: Option<CourseId>,
) -> Result<Course, DomainError> {
    let row: CourseRow = sqlx::query_as(&format!(
        r#"
        INSERT INTO courses (
            title, description, price_cents, video_url, cover_image, parent_course_id
        ) VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {}
        "#,
        COURSE_COLUMNS
    ))
    .bind(&course.title)
    .bind(&course.description)
    .bind(course.price.as_minor_units())
    .bind(&course.video_url)
    .bind(&course.cover_image)
    .bind(parent.map(|id| id.as_i64()))
    .fetch_one(&mut **tx)
    .await
    .map_err(|e| db_error("Failed to save course", e))?;

    row.try_into()
}

#[async_trait]
impl CourseRepository for PostgresCourseRepository {
    async fn create(&self, course: NewCourse) -> Result<Course, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to open transaction", e))?;

        let created = insert_course(&mut tx, &course, None).await?;

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit course", e))?;

        Ok(created)
    }

    async fn create_with_subcourses(
        &self,
        course: NewCourse,
        sub_courses: Vec<NewCourse>,
    ) -> Result<CourseTree, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to open transaction", e))?;

        let parent = insert_course(&mut tx, &course, None).await?;

        let mut children = Vec::with_capacity(sub_courses.len());
        for sub_course in &sub_courses {
            children.push(insert_course(&mut tx, sub_course, Some(parent.id)).await?);
        }

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit course tree", e))?;

        Ok(CourseTree {
            course: parent,
            sub_courses: children,
        })
    }

    async fn find_by_id(&self, id: CourseId) -> Result<Option<Course>, DomainError> {
        let row: Option<CourseRow> = sqlx::query_as(&format!(
            "SELECT {} FROM courses WHERE id = $1",
            COURSE_COLUMNS
        ))
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to find course", e))?;

        row.map(Course::try_from).transpose()
    }

    async fn find_tree(&self, id: CourseId) -> Result<Option<CourseTree>, DomainError> {
        let Some(course) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let rows: Vec<CourseRow> = sqlx::query_as(&format!(
            "SELECT {} FROM courses WHERE parent_course_id = $1 ORDER BY id",
            COURSE_COLUMNS
        ))
        .bind(id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to load sub-courses", e))?;

        let sub_courses = rows
            .into_iter()
            .map(Course::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(CourseTree {
            course,
            sub_courses,
        }))
    }

    async fn list(&self) -> Result<Vec<CourseTree>, DomainError> {
        let rows: Vec<CourseRow> =
            sqlx::query_as(&format!("SELECT {} FROM courses ORDER BY id", COURSE_COLUMNS))
                .fetch_all(&self.pool)
                .await
                .map_err(|e| db_error("Failed to list courses", e))?;

        let courses = rows
            .into_iter()
            .map(Course::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        // Group children under their parents in one pass.
        let (parents, children): (Vec<_>, Vec<_>) =
            courses.into_iter().partition(|c| !c.is_sub_course());

        Ok(parents
            .into_iter()
            .map(|parent| {
                let sub_courses = children
                    .iter()
                    .filter(|c| c.parent_course_id == Some(parent.id))
                    .cloned()
                    .collect();
                CourseTree {
                    course: parent,
                    sub_courses,
                }
            })
            .collect())
    }

    async fn update(&self, id: CourseId, update: CourseUpdate) -> Result<Course, DomainError> {
        let row: Option<CourseRow> = sqlx::query_as(&format!(
            r#"
            UPDATE courses SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                price_cents = COALESCE($4, price_cents),
                video_url = COALESCE($5, video_url),
                cover_image = COALESCE($6, cover_image),
                updated_at = now()
            WHERE id = $1
            RETURNING {}
            "#,
            COURSE_COLUMNS
        ))
        .bind(id.as_i64())
        .bind(&update.title)
        .bind(&update.description)
        .bind(update.price.map(|p| p.as_minor_units()))
        .bind(&update.video_url)
        .bind(&update.cover_image)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to update course", e))?;

        row.ok_or_else(|| DomainError::new(ErrorCode::CourseNotFound, "Course not found"))?
            .try_into()
    }

    async fn delete(&self, id: CourseId) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to open transaction", e))?;

        // Children first; their questions go with them via the cascading
        // foreign key. The parent FK is RESTRICT, so skipping this step
        // would make the final delete fail.
        sqlx::query("DELETE FROM courses WHERE parent_course_id = $1")
            .bind(id.as_i64())
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to delete sub-courses", e))?;

        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id.as_i64())
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to delete course", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::CourseNotFound,
                "Course not found",
            ));
        }

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit course deletion", e))?;

        Ok(())
    }
}
