use axum::{Router, routing::get};

use super::controller::{create_user, delete_users, get_me, get_users, update_users};
use crate::state::AppState;

pub fn init_users_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(get_users)
                .post(create_user)
                .put(update_users)
                .delete(delete_users),
        )
        .route("/me", get(get_me))
}
