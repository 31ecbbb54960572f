use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::{LoginRequest, TokenResponse};
use crate::modules::groups::model::{
    BulkUpdateGroupsDto, CreateGroupDto, Group, GroupMember, GroupView, StatusResponse,
    UpdateGroupDto,
};
use crate::modules::students::model::{
    BulkUpdateStudentsDto, CreateExamDto, CreateStudentDto, Diploma, Exam, Student, StudentInfo,
    UpdateStudentDto, UpsertDiplomaDto,
};
use crate::modules::subjects::model::{
    BulkUpdateSubjectsDto, CreateSubjectDto, Subject, UpdateSubjectDto,
};
use crate::modules::users::model::{
    BulkDeleteDto, BulkUpdateUsersDto, CreateUserDto, DeletedResponse, UpdateUserDto,
    UpdatedResponse, User,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::login_user,
        crate::modules::users::controller::create_user,
        crate::modules::users::controller::get_users,
        crate::modules::users::controller::get_me,
        crate::modules::users::controller::update_users,
        crate::modules::users::controller::delete_users,
        crate::modules::students::controller::create_student,
        crate::modules::students::controller::get_students,
        crate::modules::students::controller::update_students,
        crate::modules::students::controller::delete_students,
        crate::modules::students::controller::put_diploma,
        crate::modules::students::controller::get_diploma,
        crate::modules::students::controller::add_exam,
        crate::modules::students::controller::list_exams,
        crate::modules::groups::controller::create_group,
        crate::modules::groups::controller::get_groups,
        crate::modules::groups::controller::update_groups,
        crate::modules::groups::controller::delete_groups,
        crate::modules::groups::controller::add_student,
        crate::modules::groups::controller::remove_student,
        crate::modules::subjects::controller::create_subject,
        crate::modules::subjects::controller::get_subjects,
        crate::modules::subjects::controller::update_subjects,
        crate::modules::subjects::controller::delete_subjects,
    ),
    components(
        schemas(
            ErrorResponse,
            LoginRequest,
            TokenResponse,
            User,
            CreateUserDto,
            UpdateUserDto,
            BulkUpdateUsersDto,
            BulkDeleteDto,
            UpdatedResponse,
            DeletedResponse,
            StatusResponse,
            Student,
            StudentInfo,
            CreateStudentDto,
            UpdateStudentDto,
            BulkUpdateStudentsDto,
            Diploma,
            UpsertDiplomaDto,
            Exam,
            CreateExamDto,
            Group,
            GroupView,
            GroupMember,
            CreateGroupDto,
            UpdateGroupDto,
            BulkUpdateGroupsDto,
            Subject,
            CreateSubjectDto,
            UpdateSubjectDto,
            BulkUpdateSubjectsDto,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Login and session tokens"),
        (name = "Users", description = "User accounts"),
        (name = "Students", description = "Students, diplomas and exams"),
        (name = "Groups", description = "Groups and membership"),
        (name = "Subjects", description = "Subjects")
    ),
    info(
        title = "Registrar API",
        version = "0.1.0",
        description = "Educational records API built with Rust, Axum, and PostgreSQL.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_bulk_endpoints() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;
        for path in [
            "/oauth2/authorize",
            "/api/user",
            "/api/user/me",
            "/api/student",
            "/api/student/{id}/diploma",
            "/api/student/{id}/exams",
            "/api/group",
            "/api/group/add",
            "/api/group/remove",
            "/api/subject",
        ] {
            assert!(paths.contains_key(path), "missing {}", path);
        }
    }

    #[test]
    fn test_bearer_scheme_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.unwrap();
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
