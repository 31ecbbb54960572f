use std::collections::BTreeSet;

use chrono::Datelike;
use registrar_core::{AppError, EntityKind, reconcile};
use registrar_db::{RowLookup, conflict_on_unique, delete_batch, ensure_exists, ensure_present};
use registrar_models::StudentId;
use sqlx::{PgConnection, PgPool};
use tracing::{info, instrument};

use super::model::{
    BulkUpdateStudentsDto, CreateExamDto, CreateStudentDto, Diploma, Exam, Student, StudentInfo,
    UpdateStudentDto, UpsertDiplomaDto,
};

const STUDENT_COLUMNS: &str = "id, educational_id, name, surname, lastname, phone, entrance, \
                               group_id, created_at, updated_at";

const STUDENT_INFO_SELECT: &str = r#"SELECT
        s.id,
        s.educational_id,
        s.name,
        s.surname,
        s.lastname,
        s.phone,
        s.entrance,
        g.name AS "group",
        d.title AS diploma,
        (SELECT COUNT(*) FROM exams e WHERE e.student_id = s.id) AS exams,
        s.created_at,
        s.updated_at
    FROM students s
    LEFT JOIN groups g ON g.id = s.group_id
    LEFT JOIN diplomas d ON d.student_id = s.id"#;

const EXAM_SELECT: &str = r#"SELECT
        e.id, e.student_id, e.subject_id, sub.name AS subject,
        e.semester, e.year, e.score, e.created_at, e.updated_at
    FROM exams e
    JOIN subjects sub ON sub.id = e.subject_id"#;

fn duplicate_educational_id(educational_id: &str) -> String {
    format!("Student with educational id '{}' already exists", educational_id)
}

pub struct StudentService;

impl StudentService {
    #[instrument(skip(db, dto))]
    pub async fn create_student(db: &PgPool, dto: CreateStudentDto) -> Result<Student, AppError> {
        let mut tx = db.begin().await?;

        if let Some(group_id) = dto.group_id {
            ensure_exists(&mut tx, EntityKind::Group, group_id.into_inner()).await?;
        }

        let student = sqlx::query_as::<_, Student>(&format!(
            r#"INSERT INTO students (educational_id, name, surname, lastname, phone, entrance, group_id)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               RETURNING {STUDENT_COLUMNS}"#
        ))
        .bind(&dto.educational_id)
        .bind(&dto.name)
        .bind(&dto.surname)
        .bind(&dto.lastname)
        .bind(&dto.phone)
        .bind(dto.entrance)
        .bind(dto.group_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| conflict_on_unique(e, || duplicate_educational_id(&dto.educational_id)))?;

        tx.commit().await?;

        info!(student_id = %student.id, "Student created");
        Ok(student)
    }

    /// One student when `student_id` is given, otherwise all students
    /// ordered by id, each with its group name, diploma title and exam count.
    #[instrument(skip(db))]
    pub async fn get_students(
        db: &PgPool,
        student_id: Option<StudentId>,
    ) -> Result<Vec<StudentInfo>, AppError> {
        let students = sqlx::query_as::<_, StudentInfo>(&format!(
            "{STUDENT_INFO_SELECT} WHERE $1::BIGINT IS NULL OR s.id = $1 ORDER BY s.id"
        ))
        .bind(student_id)
        .fetch_all(db)
        .await?;
        Ok(students)
    }

    /// Applies every item of the batch, or none of them.
    ///
    /// Groups named by the items must exist as well; a `null` group removes
    /// the student from its group.
    #[instrument(skip(db, dto), fields(items = dto.items.len()))]
    pub async fn update_students(db: &PgPool, dto: BulkUpdateStudentsDto) -> Result<u64, AppError> {
        let requested: Vec<i64> = dto.items.iter().map(|item| item.id.into_inner()).collect();
        let groups: Vec<i64> = dto
            .items
            .iter()
            .filter_map(|item| item.group_id.flatten())
            .map(|group_id| group_id.into_inner())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut tx = db.begin().await?;
        let targets = reconcile(
            &mut RowLookup::new(&mut *tx, EntityKind::Student),
            &requested,
            EntityKind::Student.label(),
        )
        .await?;

        if !groups.is_empty() {
            reconcile(
                &mut RowLookup::new(&mut *tx, EntityKind::Group),
                &groups,
                EntityKind::Group.label(),
            )
            .await?;
        }

        for item in &dto.items {
            Self::apply_update(&mut *tx, item).await?;
        }

        tx.commit().await?;

        info!(updated = targets.len(), "Students updated");
        Ok(targets.len() as u64)
    }

    async fn apply_update(conn: &mut PgConnection, item: &UpdateStudentDto) -> Result<(), AppError> {
        let (set_group, group_id) = match item.group_id {
            Some(group_id) => (true, group_id),
            None => (false, None),
        };

        sqlx::query(
            r#"UPDATE students SET
                   educational_id = COALESCE($2, educational_id),
                   name = COALESCE($3, name),
                   surname = COALESCE($4, surname),
                   lastname = COALESCE($5, lastname),
                   phone = COALESCE($6, phone),
                   entrance = COALESCE($7, entrance),
                   group_id = CASE WHEN $8 THEN $9 ELSE group_id END,
                   updated_at = NOW()
               WHERE id = $1"#,
        )
        .bind(item.id)
        .bind(&item.educational_id)
        .bind(&item.name)
        .bind(&item.surname)
        .bind(&item.lastname)
        .bind(&item.phone)
        .bind(item.entrance)
        .bind(set_group)
        .bind(group_id)
        .execute(conn)
        .await
        .map_err(|e| {
            conflict_on_unique(e, || {
                duplicate_educational_id(item.educational_id.as_deref().unwrap_or_default())
            })
        })?;

        Ok(())
    }

    /// Deletes the students with their diplomas and exams.
    #[instrument(skip(db))]
    pub async fn delete_students(db: &PgPool, ids: &[i64]) -> Result<u64, AppError> {
        let mut tx = db.begin().await?;
        let deleted = delete_batch(&mut *tx, EntityKind::Student, ids).await?;
        tx.commit().await?;

        info!(deleted, "Students deleted");
        Ok(deleted)
    }

    /// Creates the student's diploma, or replaces every field of the
    /// existing one.
    #[instrument(skip(db, dto))]
    pub async fn put_diploma(
        db: &PgPool,
        student_id: StudentId,
        dto: UpsertDiplomaDto,
    ) -> Result<Diploma, AppError> {
        let mut tx = db.begin().await?;
        ensure_exists(&mut tx, EntityKind::Student, student_id.into_inner()).await?;

        let diploma = sqlx::query_as::<_, Diploma>(
            r#"INSERT INTO diplomas (student_id, assignment, title, chapters, originality)
               VALUES ($1, $2, $3, COALESCE($4, 0), COALESCE($5, 0))
               ON CONFLICT (student_id) DO UPDATE SET
                   assignment = EXCLUDED.assignment,
                   title = EXCLUDED.title,
                   chapters = EXCLUDED.chapters,
                   originality = EXCLUDED.originality,
                   updated_at = NOW()
               RETURNING id, student_id, assignment, title, chapters, originality,
                         created_at, updated_at"#,
        )
        .bind(student_id)
        .bind(&dto.assignment)
        .bind(&dto.title)
        .bind(dto.chapters)
        .bind(dto.originality)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(student_id = %student_id, diploma_id = %diploma.id, "Diploma saved");
        Ok(diploma)
    }

    #[instrument(skip(db))]
    pub async fn get_diploma(db: &PgPool, student_id: StudentId) -> Result<Diploma, AppError> {
        ensure_present(db, EntityKind::Student, student_id.into_inner()).await?;

        sqlx::query_as::<_, Diploma>(
            r#"SELECT id, student_id, assignment, title, chapters, originality,
                      created_at, updated_at
               FROM diplomas WHERE student_id = $1"#,
        )
        .bind(student_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| {
            AppError::not_found(anyhow::anyhow!("Student {} has no diploma", student_id))
        })
    }

    /// Records an exam. `year` defaults to the current year.
    #[instrument(skip(db, dto))]
    pub async fn add_exam(
        db: &PgPool,
        student_id: StudentId,
        dto: CreateExamDto,
    ) -> Result<Exam, AppError> {
        let mut tx = db.begin().await?;
        ensure_exists(&mut tx, EntityKind::Student, student_id.into_inner()).await?;
        ensure_exists(&mut tx, EntityKind::Subject, dto.subject_id.into_inner()).await?;

        let year = dto.year.unwrap_or_else(|| chrono::Utc::now().year());

        let exam = sqlx::query_as::<_, Exam>(
            r#"WITH e AS (
                   INSERT INTO exams (student_id, subject_id, semester, year, score)
                   VALUES ($1, $2, $3, $4, $5)
                   RETURNING *
               )
               SELECT e.id, e.student_id, e.subject_id, sub.name AS subject,
                      e.semester, e.year, e.score, e.created_at, e.updated_at
               FROM e
               JOIN subjects sub ON sub.id = e.subject_id"#,
        )
        .bind(student_id)
        .bind(dto.subject_id)
        .bind(dto.semester)
        .bind(year)
        .bind(dto.score)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(student_id = %student_id, exam_id = %exam.id, "Exam recorded");
        Ok(exam)
    }

    /// The student's exams, oldest first.
    #[instrument(skip(db))]
    pub async fn list_exams(db: &PgPool, student_id: StudentId) -> Result<Vec<Exam>, AppError> {
        ensure_present(db, EntityKind::Student, student_id.into_inner()).await?;

        let exams = sqlx::query_as::<_, Exam>(&format!(
            "{EXAM_SELECT} WHERE e.student_id = $1 ORDER BY e.year, e.semester, e.id"
        ))
        .bind(student_id)
        .fetch_all(db)
        .await?;

        Ok(exams)
    }
}
