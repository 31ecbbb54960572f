use registrar_core::{AppError, EntityKind, reconcile};
use registrar_db::{RowLookup, delete_batch};
use registrar_models::SubjectId;
use sqlx::PgPool;
use tracing::{info, instrument};

use super::model::{BulkUpdateSubjectsDto, CreateSubjectDto, Subject};

pub struct SubjectService;

impl SubjectService {
    #[instrument(skip(db, dto))]
    pub async fn create_subject(db: &PgPool, dto: CreateSubjectDto) -> Result<Subject, AppError> {
        let subject = sqlx::query_as::<_, Subject>(
            "INSERT INTO subjects (name) VALUES ($1) RETURNING id, name, created_at, updated_at",
        )
        .bind(&dto.name)
        .fetch_one(db)
        .await?;

        info!(subject_id = %subject.id, "Subject created");
        Ok(subject)
    }

    #[instrument(skip(db))]
    pub async fn get_subjects(
        db: &PgPool,
        subject_id: Option<SubjectId>,
    ) -> Result<Vec<Subject>, AppError> {
        let subjects = sqlx::query_as::<_, Subject>(
            r#"SELECT id, name, created_at, updated_at FROM subjects
               WHERE $1::BIGINT IS NULL OR id = $1
               ORDER BY id"#,
        )
        .bind(subject_id)
        .fetch_all(db)
        .await?;
        Ok(subjects)
    }

    #[instrument(skip(db, dto), fields(items = dto.items.len()))]
    pub async fn update_subjects(db: &PgPool, dto: BulkUpdateSubjectsDto) -> Result<u64, AppError> {
        let requested: Vec<i64> = dto.items.iter().map(|item| item.id.into_inner()).collect();

        let mut tx = db.begin().await?;
        let targets = reconcile(
            &mut RowLookup::new(&mut *tx, EntityKind::Subject),
            &requested,
            EntityKind::Subject.label(),
        )
        .await?;

        for item in &dto.items {
            sqlx::query(
                "UPDATE subjects SET name = COALESCE($2, name), updated_at = NOW() WHERE id = $1",
            )
            .bind(item.id)
            .bind(&item.name)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(updated = targets.len(), "Subjects updated");
        Ok(targets.len() as u64)
    }

    /// Deletes the subjects together with every exam taken in them.
    #[instrument(skip(db))]
    pub async fn delete_subjects(db: &PgPool, ids: &[i64]) -> Result<u64, AppError> {
        let mut tx = db.begin().await?;
        let deleted = delete_batch(&mut *tx, EntityKind::Subject, ids).await?;
        tx.commit().await?;

        info!(deleted, "Subjects deleted");
        Ok(deleted)
    }
}
