use registrar_config::{CorsConfig, DatabaseConfig, JwtConfig};
use registrar_db::{PgPool, init_db_pool, prepare_schema};

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
}

impl AppState {
    pub fn new(db: PgPool, jwt_config: JwtConfig, cors_config: CorsConfig) -> Self {
        Self {
            db,
            jwt_config,
            cors_config,
        }
    }
}

/// Connects to the database, brings the schema up to date and reads the
/// remaining configuration from the environment.
pub async fn init_app_state() -> anyhow::Result<AppState> {
    let database = DatabaseConfig::from_env()?;
    let db = init_db_pool(&database).await?;
    prepare_schema(&db, database.drop_on_start).await?;

    Ok(AppState::new(db, JwtConfig::from_env(), CorsConfig::from_env()))
}
