use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use time::OffsetDateTime;

use crate::domain::{
    models::UserId, ports::outbound::UserRepository, FieldViolation, NewUser, User, UserError,
    UserFilter, UserPatch,
};

const USER_COLUMNS: &str = "id, email, full_name, bio, role, profile_url, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i32,
    email: String,
    full_name: String,
    bio: String,
    role: String,
    profile_url: String,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::new(row.id),
            email: row.email,
            full_name: row.full_name,
            bio: row.bio,
            role: row.role.into(),
            profile_url: row.profile_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn map_error(err: sqlx::Error) -> UserError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return UserError::Validation(vec![FieldViolation::new(
                "email",
                "email is already taken",
            )]);
        }
        if db_err.is_check_violation() {
            let field = match db_err.constraint() {
                Some("users_full_name_check") => "fullName",
                Some("users_bio_check") => "bio",
                _ => "user",
            };
            return UserError::validation(field, "violates a constraint");
        }
    }
    UserError::Storage(err.to_string())
}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &UserFilter) {
    builder.push(" WHERE TRUE");
    if let Some(id) = filter.id {
        builder.push(" AND id = ").push_bind(id.as_i32());
    }
    if let Some(email) = &filter.email {
        builder.push(" AND email = ").push_bind(email.clone());
    }
    if let Some(role) = filter.role {
        builder.push(" AND role = ").push_bind(role.to_string());
    }
}

/// Selects the id of the first matching row and locks it, so the enclosing
/// statement acts on exactly one record.
fn push_first_match(builder: &mut QueryBuilder<'_, Postgres>, filter: &UserFilter) {
    builder.push(" WHERE id = (SELECT id FROM users");
    push_filter(builder, filter);
    builder.push(" ORDER BY id LIMIT 1 FOR UPDATE)");
}

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn insert(&self, user: &NewUser) -> Result<User, UserError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (email, full_name, bio, role)
            VALUES ($1, $2, $3, $4)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&user.email)
        .bind(&user.full_name)
        .bind(&user.bio)
        .bind(user.role.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(map_error)?;

        Ok(row.into())
    }

    async fn find_many(&self, filter: &UserFilter) -> Result<Vec<User>, UserError> {
        let mut builder = QueryBuilder::new(format!("SELECT {USER_COLUMNS} FROM users"));
        push_filter(&mut builder, filter);
        builder.push(" ORDER BY id");

        let rows = builder
            .build_query_as::<UserRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_error)?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn find_one(&self, filter: &UserFilter) -> Result<Option<User>, UserError> {
        let mut builder = QueryBuilder::new(format!("SELECT {USER_COLUMNS} FROM users"));
        push_filter(&mut builder, filter);
        builder.push(" ORDER BY id LIMIT 1");

        let row = builder
            .build_query_as::<UserRow>()
            .fetch_optional(&self.pool)
            .await
            .map_err(map_error)?;

        Ok(row.map(User::from))
    }

    async fn find_one_and_update(
        &self,
        filter: &UserFilter,
        patch: &UserPatch,
    ) -> Result<Option<User>, UserError> {
        let mut builder = QueryBuilder::new("UPDATE users SET email = COALESCE(");
        builder
            .push_bind(patch.email.clone())
            .push(", email), full_name = COALESCE(")
            .push_bind(patch.full_name.clone())
            .push(", full_name), bio = COALESCE(")
            .push_bind(patch.bio.clone())
            .push(", bio), profile_url = COALESCE(")
            .push_bind(patch.profile_url.clone())
            .push(", profile_url), updated_at = now()");
        push_first_match(&mut builder, filter);
        builder.push(format!(" RETURNING {USER_COLUMNS}"));

        let row = builder
            .build_query_as::<UserRow>()
            .fetch_optional(&self.pool)
            .await
            .map_err(map_error)?;

        Ok(row.map(User::from))
    }

    async fn find_one_and_remove(&self, filter: &UserFilter) -> Result<Option<User>, UserError> {
        let mut builder = QueryBuilder::new("DELETE FROM users");
        push_first_match(&mut builder, filter);
        builder.push(format!(" RETURNING {USER_COLUMNS}"));

        let row = builder
            .build_query_as::<UserRow>()
            .fetch_optional(&self.pool)
            .await
            .map_err(map_error)?;

        Ok(row.map(User::from))
    }
}
