//! PostgreSQL implementation of UserRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, UserId};
use crate::domain::user::{Cpf, NewUser, Role, User};
use crate::ports::UserRepository;

/// PostgreSQL implementation of the UserRepository port.
///
/// Uses sqlx for type-safe database operations with connection pooling.
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a new repository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a user.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    state: String,
    about: String,
    profile_picture: Option<String>,
    cpf: String,
    profession: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = DomainError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = Role::parse(&row.role).map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid role: {}", e))
        })?;
        let cpf = Cpf::new(row.cpf).map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid cpf: {}", e))
        })?;

        Ok(User {
            id: UserId::new(row.id),
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            role,
            state: row.state,
            about: row.about,
            profile_picture: row.profile_picture,
            cpf,
            profession: row.profession,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

const USER_COLUMNS: &str = "id, name, email, password_hash, role, state, about, \
                            profile_picture, cpf, profession, created_at, updated_at";

/// Maps unique-constraint violations to DuplicateUser with the field that
/// tripped.
fn map_insert_error(e: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &e {
        match db_err.constraint() {
            Some("users_email_key") => {
                return DomainError::new(
                    ErrorCode::DuplicateUser,
                    "A user with this email is already registered",
                )
                .with_detail("field", "email");
            }
            Some("users_cpf_key") => {
                return DomainError::new(
                    ErrorCode::DuplicateUser,
                    "A user with this CPF is already registered",
                )
                .with_detail("field", "cpf");
            }
            _ => {}
        }
    }
    DomainError::new(
        ErrorCode::DatabaseError,
        format!("Failed to save user: {}", e),
    )
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let row: UserRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO users (
                name, email, password_hash, role, state, about,
                profile_picture, cpf, profession
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(&user.state)
        .bind(&user.about)
        .bind(&user.profile_picture)
        .bind(user.cpf.as_str())
        .bind(&user.profession)
        .fetch_one(&self.pool)
        .await
        .map_err(map_insert_error)?;

        row.try_into()
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
                .bind(id.as_i64())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::new(
                        ErrorCode::DatabaseError,
                        format!("Failed to find user: {}", e),
                    )
                })?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to find user: {}", e),
            )
        })?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_cpf(&self, cpf: &str) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {} FROM users WHERE cpf = $1", USER_COLUMNS))
                .bind(cpf)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::new(
                        ErrorCode::DatabaseError,
                        format!("Failed to find user: {}", e),
                    )
                })?;

        row.map(User::try_from).transpose()
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        let rows: Vec<UserRow> =
            sqlx::query_as(&format!("SELECT {} FROM users ORDER BY id", USER_COLUMNS))
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::new(
                        ErrorCode::DatabaseError,
                        format!("Failed to list users: {}", e),
                    )
                })?;

        rows.into_iter().map(User::try_from).collect()
    }

    async fn update(&self, user: &User) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE users SET
                name = $2,
                email = $3,
                state = $4,
                about = $5,
                cpf = $6,
                profession = $7,
                updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(user.id.as_i64())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.state)
        .bind(&user.about)
        .bind(user.cpf.as_str())
        .bind(&user.profession)
        .bind(user.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(map_insert_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(ErrorCode::UserNotFound, "User not found"));
        }

        Ok(())
    }

    async fn update_password_hash(
        &self,
        id: UserId,
        password_hash: &str,
    ) -> Result<(), DomainError> {
        let result =
            sqlx::query("UPDATE users SET password_hash = $2, updated_at = now() WHERE id = $1")
                .bind(id.as_i64())
                .bind(password_hash)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::new(
                        ErrorCode::DatabaseError,
                        format!("Failed to update password: {}", e),
                    )
                })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(ErrorCode::UserNotFound, "User not found"));
        }

        Ok(())
    }

    async fn update_profile_picture(
        &self,
        id: UserId,
        profile_picture: Option<String>,
    ) -> Result<User, DomainError> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            r#"
            UPDATE users SET profile_picture = $2, updated_at = now()
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(id.as_i64())
        .bind(&profile_picture)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to update profile picture: {}", e),
            )
        })?;

        row.ok_or_else(|| DomainError::new(ErrorCode::UserNotFound, "User not found"))?
            .try_into()
    }

    async fn delete(&self, id: UserId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to delete user: {}", e),
                )
            })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(ErrorCode::UserNotFound, "User not found"));
        }

        Ok(())
    }
}
