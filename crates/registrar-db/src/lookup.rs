use std::collections::HashSet;
use std::future::Future;

use registrar_core::{AppError, EntityKind, ExistenceLookup};
use sqlx::{PgConnection, PgExecutor};

/// Existence lookup against one entity table.
///
/// Rows that are found are locked `FOR UPDATE` until the surrounding
/// transaction ends, so a batch cannot lose its targets mid-flight.
pub struct RowLookup<'c> {
    conn: &'c mut PgConnection,
    kind: EntityKind,
}

impl<'c> RowLookup<'c> {
    pub fn new(conn: &'c mut PgConnection, kind: EntityKind) -> Self {
        Self { conn, kind }
    }
}

impl ExistenceLookup<i64> for RowLookup<'_> {
    fn existing_ids(
        &mut self,
        ids: &[i64],
    ) -> impl Future<Output = Result<HashSet<i64>, AppError>> + Send {
        let sql = format!(
            "SELECT id FROM {} WHERE id = ANY($1) FOR UPDATE",
            self.kind.table()
        );

        async move {
            let found: Vec<i64> = sqlx::query_scalar(&sql)
                .bind(ids)
                .fetch_all(&mut *self.conn)
                .await?;
            Ok(found.into_iter().collect())
        }
    }
}

/// Fails with 404 unless row `id` of `kind` exists, locking it on success.
pub async fn ensure_exists(
    conn: &mut PgConnection,
    kind: EntityKind,
    id: i64,
) -> Result<(), AppError> {
    registrar_core::reconcile(&mut RowLookup::new(conn, kind), &[id], kind.label())
        .await
        .map(|_| ())
}

/// Fails with 404 unless row `id` of `kind` exists. Takes no lock, for read
/// paths.
pub async fn ensure_present<'e, E>(executor: E, kind: EntityKind, id: i64) -> Result<(), AppError>
where
    E: PgExecutor<'e>,
{
    let sql = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1)", kind.table());
    let exists: bool = sqlx::query_scalar(&sql).bind(id).fetch_one(executor).await?;

    if exists {
        Ok(())
    } else {
        Err(AppError::missing_ids(kind.label(), &[id]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use sqlx::PgPool;

    async fn seed_group(pool: &PgPool) -> i64 {
        sqlx::query_scalar("INSERT INTO groups (name) VALUES ('PI-21') RETURNING id")
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[sqlx::test(migrator = "crate::MIGRATOR")]
    async fn test_ensure_present_reports_missing(pool: PgPool) {
        let id = seed_group(&pool).await;

        assert!(ensure_present(&pool, EntityKind::Group, id).await.is_ok());

        let err = ensure_present(&pool, EntityKind::Group, id + 1).await.unwrap_err();
        assert_eq!(err.status.as_u16(), 404);
        assert_eq!(err.details.unwrap()["missing_ids"], serde_json::json!([id + 1]));
    }

    #[sqlx::test(migrator = "crate::MIGRATOR")]
    async fn test_ensure_present_reads_past_row_locks(pool: PgPool) {
        let id = seed_group(&pool).await;

        let mut writer = pool.begin().await.unwrap();
        ensure_exists(&mut *writer, EntityKind::Group, id).await.unwrap();

        let read = tokio::time::timeout(
            Duration::from_secs(5),
            ensure_present(&pool, EntityKind::Group, id),
        )
        .await;
        assert!(matches!(read, Ok(Ok(()))));

        writer.rollback().await.unwrap();
    }

    #[sqlx::test(migrator = "crate::MIGRATOR")]
    async fn test_row_lookup_splits_existing(pool: PgPool) {
        let a = seed_group(&pool).await;
        let b = seed_group(&pool).await;

        let mut conn = pool.acquire().await.unwrap();
        let found = RowLookup::new(&mut *conn, EntityKind::Group)
            .existing_ids(&[a, b, b + 100])
            .await
            .unwrap();
        assert_eq!(found, HashSet::from([a, b]));
    }
}
