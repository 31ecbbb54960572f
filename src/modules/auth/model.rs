pub use registrar_models::auth::*;
