//! Deletes that follow the relation table.
//!
//! [`delete_cascading`] visits every edge leaving the deleted entity kind
//! (see `registrar_core::cascade::RELATIONS`) before removing the parent rows:
//! cascading children are deleted recursively, detached children get their
//! foreign key cleared, and blocking children abort the delete with 409.
//!
//! Callers run these inside a transaction so a failure anywhere rolls back
//! the whole batch.

use std::future::Future;
use std::pin::Pin;

use registrar_core::cascade::{RELATIONS, dependents};
use registrar_core::{AppError, DeleteBehavior, EntityKind, Relation, reconcile};
use sqlx::PgConnection;
use tracing::debug;

use crate::lookup::RowLookup;

type BoxedCount<'a> = Pin<Box<dyn Future<Output = Result<u64, AppError>> + Send + 'a>>;

/// Deletes the `requested` rows of `kind`, or none of them.
///
/// Fails with 404 naming every missing ID before anything is touched.
/// Returns the number of `kind` rows deleted.
pub async fn delete_batch(
    conn: &mut PgConnection,
    kind: EntityKind,
    requested: &[i64],
) -> Result<u64, AppError> {
    let targets = reconcile(&mut RowLookup::new(&mut *conn, kind), requested, kind.label()).await?;
    delete_cascading(conn, kind, &targets).await
}

/// Applies the delete policy for `kind` to `ids`, then deletes them.
pub fn delete_cascading<'a>(
    conn: &'a mut PgConnection,
    kind: EntityKind,
    ids: &'a [i64],
) -> BoxedCount<'a> {
    delete_cascading_with(conn, RELATIONS, kind, ids)
}

/// Same as [`delete_cascading`], walking `relations` instead of the schema's
/// table.
pub fn delete_cascading_with<'a>(
    conn: &'a mut PgConnection,
    relations: &'static [Relation],
    kind: EntityKind,
    ids: &'a [i64],
) -> BoxedCount<'a> {
    Box::pin(async move {
        if ids.is_empty() {
            return Ok(0);
        }

        for relation in dependents(relations, kind) {
            let child = relation.child.table();
            let fk = relation.foreign_key;

            match relation.on_delete {
                DeleteBehavior::Detach => {
                    let sql = format!(
                        "UPDATE {child} SET {fk} = NULL, updated_at = NOW() WHERE {fk} = ANY($1)"
                    );
                    let detached = sqlx::query(&sql).bind(ids).execute(&mut *conn).await?;
                    debug!(parent = %kind, child = %child, rows = detached.rows_affected(), "Detached children");
                }
                DeleteBehavior::Cascade => {
                    let sql = format!("SELECT id FROM {child} WHERE {fk} = ANY($1)");
                    let child_ids: Vec<i64> = sqlx::query_scalar(&sql)
                        .bind(ids)
                        .fetch_all(&mut *conn)
                        .await?;
                    let removed =
                        delete_cascading_with(&mut *conn, relations, relation.child, &child_ids)
                            .await?;
                    debug!(parent = %kind, child = %child, rows = removed, "Cascaded delete");
                }
                DeleteBehavior::Block => {
                    let sql = format!("SELECT EXISTS(SELECT 1 FROM {child} WHERE {fk} = ANY($1))");
                    let blocked: bool = sqlx::query_scalar(&sql)
                        .bind(ids)
                        .fetch_one(&mut *conn)
                        .await?;
                    if blocked {
                        return Err(AppError::conflict(format!(
                            "Cannot delete {}: dependent {} still exist",
                            kind.table(),
                            child
                        )));
                    }
                }
            }
        }

        let sql = format!("DELETE FROM {} WHERE id = ANY($1)", kind.table());
        let result = sqlx::query(&sql).bind(ids).execute(&mut *conn).await?;
        Ok(result.rows_affected())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::PgPool;

    /// Schema edges for students, except exams now hold the student back.
    const EXAMS_BLOCK_STUDENTS: &[Relation] = &[
        Relation {
            parent: EntityKind::Student,
            child: EntityKind::Diploma,
            foreign_key: "student_id",
            on_delete: DeleteBehavior::Cascade,
        },
        Relation {
            parent: EntityKind::Student,
            child: EntityKind::Exam,
            foreign_key: "student_id",
            on_delete: DeleteBehavior::Block,
        },
    ];

    async fn seed_student(pool: &PgPool, with_exam: bool) -> i64 {
        let student_id: i64 = sqlx::query_scalar(
            "INSERT INTO students (educational_id, name, surname) VALUES ($1, 'Ivan', 'Petrov') RETURNING id",
        )
        .bind(if with_exam { "E-1" } else { "E-2" })
        .fetch_one(pool)
        .await
        .unwrap();

        sqlx::query("INSERT INTO diplomas (student_id, title) VALUES ($1, 'Thesis')")
            .bind(student_id)
            .execute(pool)
            .await
            .unwrap();

        if with_exam {
            let subject_id: i64 =
                sqlx::query_scalar("INSERT INTO subjects (name) VALUES ('Logic') RETURNING id")
                    .fetch_one(pool)
                    .await
                    .unwrap();
            sqlx::query(
                "INSERT INTO exams (student_id, subject_id, semester, year, score) VALUES ($1, $2, 1, 2024, 80)",
            )
            .bind(student_id)
            .bind(subject_id)
            .execute(pool)
            .await
            .unwrap();
        }

        student_id
    }

    async fn count(pool: &PgPool, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[sqlx::test(migrator = "crate::MIGRATOR")]
    async fn test_blocking_child_aborts_and_rolls_back(pool: PgPool) {
        let student_id = seed_student(&pool, true).await;

        let mut tx = pool.begin().await.unwrap();
        let err =
            delete_cascading_with(&mut *tx, EXAMS_BLOCK_STUDENTS, EntityKind::Student, &[student_id])
                .await
                .unwrap_err();
        tx.rollback().await.unwrap();

        assert_eq!(err.status.as_u16(), 409);
        assert!(err.error.to_string().contains("exams"));
        assert_eq!(count(&pool, "students").await, 1);
        assert_eq!(count(&pool, "diplomas").await, 1);
        assert_eq!(count(&pool, "exams").await, 1);
    }

    #[sqlx::test(migrator = "crate::MIGRATOR")]
    async fn test_blocking_edge_without_children_allows_delete(pool: PgPool) {
        let student_id = seed_student(&pool, false).await;

        let mut tx = pool.begin().await.unwrap();
        let deleted =
            delete_cascading_with(&mut *tx, EXAMS_BLOCK_STUDENTS, EntityKind::Student, &[student_id])
                .await
                .unwrap();
        tx.commit().await.unwrap();

        assert_eq!(deleted, 1);
        assert_eq!(count(&pool, "students").await, 0);
        assert_eq!(count(&pool, "diplomas").await, 0);
    }

    #[sqlx::test(migrator = "crate::MIGRATOR")]
    async fn test_delete_batch_follows_schema_relations(pool: PgPool) {
        let student_id = seed_student(&pool, true).await;

        let mut tx = pool.begin().await.unwrap();
        let err = delete_batch(&mut *tx, EntityKind::Student, &[student_id, 404])
            .await
            .unwrap_err();
        assert_eq!(err.status.as_u16(), 404);
        tx.rollback().await.unwrap();

        let mut tx = pool.begin().await.unwrap();
        assert_eq!(delete_batch(&mut *tx, EntityKind::Student, &[student_id]).await.unwrap(), 1);
        tx.commit().await.unwrap();

        assert_eq!(count(&pool, "diplomas").await, 0);
        assert_eq!(count(&pool, "exams").await, 0);
        assert_eq!(count(&pool, "subjects").await, 1);
    }
}
