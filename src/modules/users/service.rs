use registrar_core::privilege::{ensure, ensure_owner_or};
use registrar_core::{
    AppError, Capability, EntityKind, Privilege, generate_salt, hash_password, reconcile,
};
use registrar_db::{RowLookup, conflict_on_unique, delete_batch};
use registrar_models::UserId;
use sqlx::PgPool;
use tracing::{info, instrument};

use super::model::{BulkUpdateUsersDto, CreateUserDto, UpdateUserDto, User};

const USER_COLUMNS: &str = "id, login, name, surname, lastname, privilege, created_at, updated_at";

/// The caller of a user operation.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub id: UserId,
    pub privilege: Privilege,
}

pub struct UserService;

impl UserService {
    /// Registers a new account. Every account starts as a guest.
    #[instrument(skip(db, dto), fields(login = %dto.login))]
    pub async fn create_user(db: &PgPool, dto: CreateUserDto) -> Result<User, AppError> {
        let salt = generate_salt();
        let hashed = hash_password(&dto.password, &salt)?;

        let user = sqlx::query_as::<_, User>(&format!(
            r#"INSERT INTO users (login, password, salt, name, surname, lastname, privilege)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               RETURNING {USER_COLUMNS}"#
        ))
        .bind(&dto.login)
        .bind(&hashed)
        .bind(&salt)
        .bind(&dto.name)
        .bind(&dto.surname)
        .bind(&dto.lastname)
        .bind(Privilege::Guest)
        .fetch_one(db)
        .await
        .map_err(|e| {
            conflict_on_unique(e, || format!("User with login '{}' already exists", dto.login))
        })?;

        info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// One user when `user_id` is given, otherwise all users ordered by id.
    #[instrument(skip(db))]
    pub async fn get_users(db: &PgPool, user_id: Option<UserId>) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE $1::BIGINT IS NULL OR id = $1 ORDER BY id"
        ))
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(users)
    }

    #[instrument(skip(db))]
    pub async fn get_user(db: &PgPool, id: UserId) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User {} not found", id)))
    }

    /// Applies every item of the batch, or none of them.
    ///
    /// Items are checked and written in request order. Users may edit their
    /// own record; editing anyone else's, or changing any privilege, takes an
    /// admin.
    #[instrument(skip(db, dto), fields(items = dto.items.len()))]
    pub async fn update_users(
        db: &PgPool,
        actor: Actor,
        dto: BulkUpdateUsersDto,
    ) -> Result<u64, AppError> {
        let requested: Vec<i64> = dto.items.iter().map(|item| item.id.into_inner()).collect();

        let mut tx = db.begin().await?;
        let targets = reconcile(
            &mut RowLookup::new(&mut *tx, EntityKind::User),
            &requested,
            EntityKind::User.label(),
        )
        .await?;

        for item in &dto.items {
            ensure_owner_or(&actor.id, &item.id, actor.privilege, Capability::EditOtherUsers)?;
            if item.changes_privilege() {
                ensure(actor.privilege, Capability::ChangePrivilege)?;
            }
            Self::apply_update(&mut *tx, item).await?;
        }

        tx.commit().await?;

        info!(updated = targets.len(), "Users updated");
        Ok(targets.len() as u64)
    }

    async fn apply_update(
        conn: &mut sqlx::PgConnection,
        item: &UpdateUserDto,
    ) -> Result<(), AppError> {
        let (password, salt) = match &item.password {
            Some(password) => {
                let salt = generate_salt();
                (Some(hash_password(password, &salt)?), Some(salt))
            }
            None => (None, None),
        };

        sqlx::query(
            r#"UPDATE users SET
                   login = COALESCE($2, login),
                   password = COALESCE($3, password),
                   salt = COALESCE($4, salt),
                   name = COALESCE($5, name),
                   surname = COALESCE($6, surname),
                   lastname = COALESCE($7, lastname),
                   privilege = COALESCE($8, privilege),
                   updated_at = NOW()
               WHERE id = $1"#,
        )
        .bind(item.id)
        .bind(&item.login)
        .bind(password)
        .bind(salt)
        .bind(&item.name)
        .bind(&item.surname)
        .bind(&item.lastname)
        .bind(item.privilege.map(i16::from))
        .execute(conn)
        .await
        .map_err(|e| {
            conflict_on_unique(e, || {
                format!(
                    "User with login '{}' already exists",
                    item.login.as_deref().unwrap_or_default()
                )
            })
        })?;

        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn delete_users(db: &PgPool, ids: &[i64]) -> Result<u64, AppError> {
        let mut tx = db.begin().await?;
        let deleted = delete_batch(&mut *tx, EntityKind::User, ids).await?;
        tx.commit().await?;

        info!(deleted, "Users deleted");
        Ok(deleted)
    }
}
