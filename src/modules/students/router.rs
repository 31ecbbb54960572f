use axum::{
    Router,
    routing::{get, put},
};

use super::controller::{
    add_exam, create_student, delete_students, get_diploma, get_students, list_exams,
    put_diploma, update_students,
};
use crate::state::AppState;

pub fn init_students_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(get_students)
                .post(create_student)
                .put(update_students)
                .delete(delete_students),
        )
        .route("/{id}/diploma", put(put_diploma).get(get_diploma))
        .route("/{id}/exams", get(list_exams).post(add_exam))
}
