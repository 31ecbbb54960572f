//! Administrative commands run by `registrar-cli`.
//!
//! Registration over HTTP always yields a guest, so the first admin has to be
//! created here.

use anyhow::anyhow;
use registrar_core::{AppError, Privilege, generate_salt, hash_password};
use registrar_db::conflict_on_unique;
use sqlx::PgPool;
use validator::Validate;

use crate::modules::users::model::{CreateUserDto, User};
use crate::validator::format_errors;

pub async fn create_admin(db: &PgPool, dto: CreateUserDto) -> Result<User, AppError> {
    dto.validate()
        .map_err(|errors| AppError::unprocessable(anyhow!("{}", format_errors(&errors))))?;

    let salt = generate_salt();
    let hashed = hash_password(&dto.password, &salt)?;

    sqlx::query_as::<_, User>(
        r#"INSERT INTO users (login, password, salt, name, surname, lastname, privilege)
           VALUES ($1, $2, $3, $4, $5, $6, $7)
           RETURNING id, login, name, surname, lastname, privilege, created_at, updated_at"#,
    )
    .bind(&dto.login)
    .bind(&hashed)
    .bind(&salt)
    .bind(&dto.name)
    .bind(&dto.surname)
    .bind(&dto.lastname)
    .bind(Privilege::Admin)
    .fetch_one(db)
    .await
    .map_err(|e| conflict_on_unique(e, || format!("User with login '{}' already exists", dto.login)))
}
