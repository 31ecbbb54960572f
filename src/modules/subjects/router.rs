use axum::{Router, routing::get};

use super::controller::{create_subject, delete_subjects, get_subjects, update_subjects};
use crate::state::AppState;

pub fn init_subjects_router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(get_subjects)
            .post(create_subject)
            .put(update_subjects)
            .delete(delete_subjects),
    )
}
