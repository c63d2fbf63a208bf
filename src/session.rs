use crate::errors::AppError;
use crate::store::GymStore;
use moka::future::Cache;
use rust_decimal::Decimal;
use std::{sync::Arc, time::Duration};
use tokio::sync::Mutex;
use tower_sessions::{Expiry, Session, SessionManagerLayer};
use tower_sessions_moka_store::MokaStore;
use tracing::debug;
use uuid::Uuid;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "adams_inn_session";

const GYM_SESSION_KEY: &str = "gym_session_id";

/// Upper bound on live sessions, for both cookie records and gym stores.
pub const MAX_SESSIONS: u64 = 10_000;

/// One gym store, locked for the whole of each request that touches it.
pub type SharedStore = Arc<Mutex<GymStore>>;

/// Per-browser gym stores, dropped after `idle` without a request.
#[derive(Clone)]
pub struct SessionRegistry {
    stores: Cache<Uuid, SharedStore>,
    default_goal: Decimal,
}

impl SessionRegistry {
    pub fn new(idle: Duration, default_goal: Decimal) -> Self {
        Self {
            stores: Cache::builder()
                .max_capacity(MAX_SESSIONS)
                .time_to_idle(idle)
                .build(),
            default_goal,
        }
    }

    pub async fn store_for(&self, id: Uuid) -> SharedStore {
        let goal = self.default_goal;
        self.stores
            .get_with(id, async move {
                debug!(%id, "starting gym session");
                Arc::new(Mutex::new(GymStore::seeded(goal)))
            })
            .await
    }

    /// Finds the store behind the caller's cookie, issuing a new id on first visit.
    pub async fn resolve(&self, session: &Session) -> Result<SharedStore, AppError> {
        let id = match session.get::<Uuid>(GYM_SESSION_KEY).await? {
            Some(id) => id,
            None => {
                let id = Uuid::new_v4();
                session.insert(GYM_SESSION_KEY, id).await?;
                id
            }
        };

        Ok(self.store_for(id).await)
    }
}

/// Cookie sessions backed by moka, which drops records once they expire.
pub fn session_layer(idle: Duration) -> SessionManagerLayer<MokaStore> {
    let idle_seconds = i64::try_from(idle.as_secs()).unwrap_or(i64::MAX);

    SessionManagerLayer::new(MokaStore::new(Some(MAX_SESSIONS)))
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(idle_seconds),
        ))
        .with_secure(false)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
