use std::collections::HashMap;

use registrar_core::{AppError, EntityKind, reconcile};
use registrar_db::{RowLookup, delete_batch, ensure_exists};
use registrar_models::{GroupId, StudentId};
use sqlx::PgPool;
use tracing::{info, instrument};

use super::model::{BulkUpdateGroupsDto, CreateGroupDto, Group, GroupMember, GroupQuery, GroupView};

pub struct GroupService;

impl GroupService {
    #[instrument(skip(db, dto))]
    pub async fn create_group(db: &PgPool, dto: CreateGroupDto) -> Result<Group, AppError> {
        let group = sqlx::query_as::<_, Group>(
            "INSERT INTO groups (name) VALUES ($1) RETURNING id, name, created_at, updated_at",
        )
        .bind(&dto.name)
        .fetch_one(db)
        .await?;

        info!(group_id = %group.id, "Group created");
        Ok(group)
    }

    /// One group when `group_id` is given, otherwise all groups ordered by
    /// id. With `with_students` every group carries its members.
    #[instrument(skip(db))]
    pub async fn get_groups(db: &PgPool, query: GroupQuery) -> Result<Vec<GroupView>, AppError> {
        let groups = sqlx::query_as::<_, Group>(
            r#"SELECT id, name, created_at, updated_at FROM groups
               WHERE $1::BIGINT IS NULL OR id = $1
               ORDER BY id"#,
        )
        .bind(query.group_id)
        .fetch_all(db)
        .await?;

        let mut views: Vec<GroupView> = groups.into_iter().map(GroupView::from).collect();
        if !query.with_students || views.is_empty() {
            return Ok(views);
        }

        let ids: Vec<i64> = views.iter().map(|g| g.id.into_inner()).collect();
        let members = sqlx::query_as::<_, GroupMember>(
            r#"SELECT id, educational_id, name, surname, lastname, group_id
               FROM students
               WHERE group_id = ANY($1)
               ORDER BY id"#,
        )
        .bind(&ids)
        .fetch_all(db)
        .await?;

        let mut by_group: HashMap<GroupId, Vec<GroupMember>> = HashMap::new();
        for member in members {
            if let Some(group_id) = member.group_id {
                by_group.entry(group_id).or_default().push(member);
            }
        }

        for view in &mut views {
            view.students = Some(by_group.remove(&view.id).unwrap_or_default());
        }

        Ok(views)
    }

    /// Renames every group in the batch, or none of them.
    #[instrument(skip(db, dto), fields(items = dto.items.len()))]
    pub async fn update_groups(db: &PgPool, dto: BulkUpdateGroupsDto) -> Result<u64, AppError> {
        let requested: Vec<i64> = dto.items.iter().map(|item| item.id.into_inner()).collect();

        let mut tx = db.begin().await?;
        let targets = reconcile(
            &mut RowLookup::new(&mut *tx, EntityKind::Group),
            &requested,
            EntityKind::Group.label(),
        )
        .await?;

        for item in &dto.items {
            sqlx::query(
                "UPDATE groups SET name = COALESCE($2, name), updated_at = NOW() WHERE id = $1",
            )
            .bind(item.id)
            .bind(&item.name)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(updated = targets.len(), "Groups updated");
        Ok(targets.len() as u64)
    }

    /// Deletes the groups. Their students stay, without a group.
    #[instrument(skip(db))]
    pub async fn delete_groups(db: &PgPool, ids: &[i64]) -> Result<u64, AppError> {
        let mut tx = db.begin().await?;
        let deleted = delete_batch(&mut *tx, EntityKind::Group, ids).await?;
        tx.commit().await?;

        info!(deleted, "Groups deleted");
        Ok(deleted)
    }

    /// Puts a student into a group, moving it out of any other group.
    #[instrument(skip(db))]
    pub async fn add_student(
        db: &PgPool,
        student_id: StudentId,
        group_id: GroupId,
    ) -> Result<(), AppError> {
        let mut tx = db.begin().await?;
        ensure_exists(&mut tx, EntityKind::Student, student_id.into_inner()).await?;
        ensure_exists(&mut tx, EntityKind::Group, group_id.into_inner()).await?;

        let current: Option<GroupId> =
            sqlx::query_scalar("SELECT group_id FROM students WHERE id = $1")
                .bind(student_id)
                .fetch_one(&mut *tx)
                .await?;

        if current == Some(group_id) {
            return Err(AppError::conflict(format!(
                "Student {} is already in group {}",
                student_id, group_id
            )));
        }

        sqlx::query("UPDATE students SET group_id = $2, updated_at = NOW() WHERE id = $1")
            .bind(student_id)
            .bind(group_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(
            student_id = %student_id,
            group_id = %group_id,
            previous_group_id = ?current.map(GroupId::into_inner),
            "Student added to group"
        );
        Ok(())
    }

    /// Takes a student out of its group.
    #[instrument(skip(db))]
    pub async fn remove_student(db: &PgPool, student_id: StudentId) -> Result<(), AppError> {
        let mut tx = db.begin().await?;
        ensure_exists(&mut tx, EntityKind::Student, student_id.into_inner()).await?;

        let current: Option<GroupId> =
            sqlx::query_scalar("SELECT group_id FROM students WHERE id = $1")
                .bind(student_id)
                .fetch_one(&mut *tx)
                .await?;

        let Some(group_id) = current else {
            return Err(AppError::not_found(anyhow::anyhow!(
                "Student {} is not in a group",
                student_id
            )));
        };

        sqlx::query("UPDATE students SET group_id = NULL, updated_at = NOW() WHERE id = $1")
            .bind(student_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(student_id = %student_id, group_id = %group_id, "Student removed from group");
        Ok(())
    }
}
