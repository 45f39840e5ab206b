use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use crate::database::models::{Logo, User, UserRole};
use crate::database::DatabaseManager;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub role: Option<UserRole>,
}

#[derive(Debug, Deserialize)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub brand_name: Option<String>,
    pub role: Option<UserRole>,
}

/// User with the optional brand logo attached, as served by the listing
/// endpoints
#[derive(Debug, Serialize)]
pub struct UserWithLogo {
    #[serde(flatten)]
    pub user: User,
    pub logo: Option<Logo>,
}

pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub async fn new() -> Result<Self, ApiError> {
        Ok(Self {
            pool: DatabaseManager::pool().await?,
        })
    }

    pub async fn find_all(&self) -> Result<Vec<UserWithLogo>, ApiError> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at")
            .fetch_all(&self.pool)
            .await?;

        let ids: Vec<Uuid> = users.iter().map(|u| u.id).collect();
        let logos = sqlx::query_as::<_, Logo>("SELECT * FROM logos WHERE user_id = ANY($1)")
            .bind(&ids)
            .fetch_all(&self.pool)
            .await?;
        let mut by_user: HashMap<Uuid, Logo> =
            logos.into_iter().map(|l| (l.user_id, l)).collect();

        Ok(users
            .into_iter()
            .map(|user| {
                let logo = by_user.remove(&user.id);
                UserWithLogo { user, logo }
            })
            .collect())
    }

    pub async fn create(&self, new_user: NewUser) -> Result<User, ApiError> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (name, email, role) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(&new_user.name)
        .bind(&new_user.email)
        .bind(new_user.role.unwrap_or(UserRole::User))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "Email already exists"))?;
        Ok(user)
    }

    pub async fn find_one(&self, id: Uuid) -> Result<UserWithLogo, ApiError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ApiError::not_found("User not found"))?;

        let logo = sqlx::query_as::<_, Logo>("SELECT * FROM logos WHERE user_id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(UserWithLogo { user, logo })
    }

    pub async fn update(&self, id: Uuid, update: UserUpdate) -> Result<User, ApiError> {
        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET
                name = COALESCE($2, name),
                phone = COALESCE($3, phone),
                website = COALESCE($4, website),
                brand_name = COALESCE($5, brand_name),
                role = COALESCE($6, role),
                updated_at = now()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(update.name)
        .bind(update.phone)
        .bind(update.website)
        .bind(update.brand_name)
        .bind(update.role)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
        Ok(user)
    }

    pub async fn delete(&self, id: Uuid) -> Result<User, ApiError> {
        let user = sqlx::query_as::<_, User>("DELETE FROM users WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ApiError::not_found("User not found"))?;
        Ok(user)
    }
}

/// Translate a Postgres unique violation into a client-facing conflict
pub fn map_unique_violation(err: sqlx::Error, message: &str) -> ApiError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.code().as_deref() == Some("23505") {
            return ApiError::conflict(message);
        }
    }
    err.into()
}
