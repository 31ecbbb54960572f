use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{
    add_student, create_group, delete_groups, get_groups, remove_student, update_groups,
};
use crate::state::AppState;

pub fn init_groups_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(get_groups)
                .post(create_group)
                .put(update_groups)
                .delete(delete_groups),
        )
        .route("/add", post(add_student))
        .route("/remove", post(remove_student))
}
