use std::sync::Arc;

use rollbook_store::{PgStudentStore, PgTeacherStore, StudentStore, TeacherStore};

use crate::config::cors::CorsConfig;
use crate::config::database::init_db_pool;

/// Shared application state.
///
/// The storage handles are constructed once at startup and injected here;
/// nothing else in the application owns persistent state, so every request
/// handler is stateless apart from what it borrows from this struct.
#[derive(Clone)]
pub struct AppState {
    pub students: Arc<dyn StudentStore>,
    pub teachers: Arc<dyn TeacherStore>,
    pub cors_config: CorsConfig,
}

pub async fn init_app_state() -> AppState {
    let pool = init_db_pool().await;

    AppState {
        students: Arc::new(PgStudentStore::new(pool.clone())),
        teachers: Arc::new(PgTeacherStore::new(pool)),
        cors_config: CorsConfig::from_env(),
    }
}
