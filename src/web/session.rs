use anyhow::anyhow;
use tower_sessions::cookie::{Key, SameSite};
use tower_sessions::service::SignedCookie;
use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};
use tracing::warn;

use crate::config;

pub const AUTHENTICATED_USER_ID: &str = "authenticated_user_id";
pub const FLASH: &str = "flash";
pub const REDIRECT_PATH_AFTER_LOGIN: &str = "redirect_path_after_login";

/// Configure the session layer: signed cookie, fixed inactivity lifetime.
pub fn layer<S>(
    store: S,
    settings: &config::Session,
) -> anyhow::Result<SessionManagerLayer<S, SignedCookie>>
where
    S: SessionStore + Clone,
{
    let key = signing_key(settings.secret.as_deref())?;
    let lifetime = time::Duration::hours(i64::from(settings.lifetime_hours));

    Ok(SessionManagerLayer::new(store)
        .with_name("session")
        .with_secure(settings.secure)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(lifetime))
        .with_signed(key))
}

fn signing_key(secret: Option<&str>) -> anyhow::Result<Key> {
    match secret {
        Some(secret) => Key::try_from(secret.as_bytes())
            .map_err(|e| anyhow!("session secret must be at least 64 bytes: {e:?}")),
        None => {
            warn!("no session secret configured, sessions will not survive a restart");
            Ok(Key::generate())
        }
    }
}
