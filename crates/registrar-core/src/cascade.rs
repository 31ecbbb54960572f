//! Delete behavior between related entities.
//!
//! Every parent/child edge in the schema is listed once in [`RELATIONS`],
//! together with the child's foreign-key column and what happens to the
//! children when a parent row is deleted. The database layer walks this
//! table when it deletes, so the rules live here and nowhere else.
//!
//! ```text
//! Group   ──detach──▶ Student   (students.group_id    → NULL)
//! Student ──cascade─▶ Diploma   (diplomas.student_id)
//! Student ──cascade─▶ Exam      (exams.student_id)
//! Subject ──cascade─▶ Exam      (exams.subject_id)
//! ```

use std::fmt;

/// Entities that own a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    User,
    Group,
    Student,
    Diploma,
    Exam,
    Subject,
}

impl EntityKind {
    pub const ALL: [EntityKind; 6] = [
        EntityKind::User,
        EntityKind::Group,
        EntityKind::Student,
        EntityKind::Diploma,
        EntityKind::Exam,
        EntityKind::Subject,
    ];

    pub const fn table(self) -> &'static str {
        match self {
            EntityKind::User => "users",
            EntityKind::Group => "groups",
            EntityKind::Student => "students",
            EntityKind::Diploma => "diplomas",
            EntityKind::Exam => "exams",
            EntityKind::Subject => "subjects",
        }
    }

    /// Plural label used in error messages.
    pub const fn label(self) -> &'static str {
        match self {
            EntityKind::User => "Users",
            EntityKind::Group => "Groups",
            EntityKind::Student => "Students",
            EntityKind::Diploma => "Diplomas",
            EntityKind::Exam => "Exams",
            EntityKind::Subject => "Subjects",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table())
    }
}

/// What deleting a parent does to its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeleteBehavior {
    /// Children are deleted along with the parent.
    Cascade,
    /// Children survive with their foreign key set to NULL.
    Detach,
    /// The delete is refused while children exist.
    Block,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relation {
    pub parent: EntityKind,
    pub child: EntityKind,
    /// Column on the child table referencing the parent's `id`.
    pub foreign_key: &'static str,
    pub on_delete: DeleteBehavior,
}

pub const RELATIONS: &[Relation] = &[
    Relation {
        parent: EntityKind::Group,
        child: EntityKind::Student,
        foreign_key: "group_id",
        on_delete: DeleteBehavior::Detach,
    },
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
        on_delete: DeleteBehavior::Cascade,
    },
    Relation {
        parent: EntityKind::Subject,
        child: EntityKind::Exam,
        foreign_key: "subject_id",
        on_delete: DeleteBehavior::Cascade,
    },
];

/// Behavior for the `(parent, child)` edge, if the two are related.
pub fn on_delete(parent: EntityKind, child: EntityKind) -> Option<DeleteBehavior> {
    RELATIONS
        .iter()
        .find(|r| r.parent == parent && r.child == child)
        .map(|r| r.on_delete)
}

/// Edges of `relations` leaving `parent`, in table order.
pub fn dependents(
    relations: &'static [Relation],
    parent: EntityKind,
) -> impl Iterator<Item = &'static Relation> {
    relations.iter().filter(move |r| r.parent == parent)
}
