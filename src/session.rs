//! Session Context
//!
//! Token, user and expiry live under three storage keys. They are written
//! together after a successful login and cleared together on logout, on
//! expiry, or when a restore finds any of them missing.

use std::rc::Rc;

use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

use crate::api::auth::{self, Credentials, LoginResponse};
use crate::api::ApiClient;
use crate::error::ApiResult;
use crate::models::User;
use crate::storage::StorageAdapter;

pub const TOKEN_KEY: &str = "authToken";
pub const USER_KEY: &str = "authUser";
pub const EXPIRY_KEY: &str = "authExpiry";

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: User,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// The server's `expiresIn` wins over the configured default
    pub fn from_login(response: LoginResponse, default_ttl: Duration, now: DateTime<Utc>) -> Self {
        let ttl = response
            .expires_in
            .filter(|secs| *secs > 0)
            .map(Duration::seconds)
            .unwrap_or(default_ttl);
        Self {
            token: response.token,
            user: response.user,
            expires_at: now + ttl,
        }
    }

    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        !self.token.is_empty() && now < self.expires_at
    }
}

#[derive(Clone)]
pub struct SessionStore {
    storage: Rc<dyn StorageAdapter>,
    current: Option<Session>,
}

impl SessionStore {
    /// Read a persisted session; anything incomplete or expired is wiped
    pub fn restore(storage: Rc<dyn StorageAdapter>, now: DateTime<Utc>) -> Self {
        let mut store = Self { storage, current: None };
        match store.read_persisted() {
            Some(session) if session.is_valid(now) => {
                info!("Restored session for {}", session.user.email);
                store.current = Some(session);
            }
            Some(_) => {
                info!("Stored session expired");
                store.clear_storage();
            }
            None => store.clear_storage(),
        }
        store
    }

    fn read_persisted(&self) -> Option<Session> {
        let token = self.storage.get(TOKEN_KEY)?;
        let user = self.storage.get(USER_KEY)?;
        let expiry = self.storage.get(EXPIRY_KEY)?;

        let user: User = match serde_json::from_str(&user) {
            Ok(user) => user,
            Err(e) => {
                warn!("Discarding stored user: {}", e);
                return None;
            }
        };
        let expires_at = match DateTime::parse_from_rfc3339(&expiry) {
            Ok(at) => at.with_timezone(&Utc),
            Err(e) => {
                warn!("Discarding stored expiry {:?}: {}", expiry, e);
                return None;
            }
        };
        Some(Session { token, user, expires_at })
    }

    fn clear_storage(&self) {
        for key in [TOKEN_KEY, USER_KEY, EXPIRY_KEY] {
            self.storage.remove(key);
        }
    }

    /// Persist and adopt a session. Nothing is kept if any write fails.
    pub fn establish(&mut self, session: Session) -> ApiResult<()> {
        let user = serde_json::to_string(&session.user)?;
        let written = self
            .storage
            .set(TOKEN_KEY, &session.token)
            .and_then(|_| self.storage.set(USER_KEY, &user))
            .and_then(|_| self.storage.set(EXPIRY_KEY, &session.expires_at.to_rfc3339()));
        if let Err(e) = written {
            self.clear_storage();
            self.current = None;
            return Err(e);
        }
        self.current = Some(session);
        Ok(())
    }

    /// Log in against the API. On any failure the store is left untouched.
    pub async fn login(
        &mut self,
        client: &ApiClient,
        credentials: &Credentials,
        now: DateTime<Utc>,
    ) -> ApiResult<Session> {
        let response = auth::login(client, credentials).await?;
        let session = Session::from_login(response, client.config().session_ttl(), now);
        self.establish(session.clone())?;
        info!("Logged in as {}", session.user.email);
        Ok(session)
    }

    pub fn logout(&mut self) {
        if self.current.take().is_some() {
            info!("Logged out");
        }
        self.clear_storage();
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        self.current.as_ref().is_some_and(|s| s.is_valid(now))
    }

    /// Log out if the session has run past its expiry. Returns true when it did.
    pub fn check_expiry(&mut self, now: DateTime<Utc>) -> bool {
        if self.current.is_some() && !self.is_valid(now) {
            warn!("Session expired");
            self.logout();
            true
        } else {
            false
        }
    }

    pub fn token(&self) -> Option<String> {
        self.current.as_ref().map(|s| s.token.clone())
    }

    pub fn user(&self) -> Option<&User> {
        self.current.as_ref().map(|s| &s.user)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::api::testing::ScriptedTransport;
    use crate::config::AppConfig;
    use crate::storage::MemoryStorage;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
    }

    fn client(transport: &ScriptedTransport) -> ApiClient {
        ApiClient::new(Rc::new(transport.clone()), AppConfig::default())
    }

    fn seeded(expiry: DateTime<Utc>) -> Rc<MemoryStorage> {
        let storage = Rc::new(MemoryStorage::new());
        storage.set(TOKEN_KEY, "tok").unwrap();
        storage.set(USER_KEY, r#"{"_id":"u1","name":"Asha","email":"asha@lab.in"}"#).unwrap();
        storage.set(EXPIRY_KEY, &expiry.to_rfc3339()).unwrap();
        storage
    }

    #[test]
    fn test_restore_valid_session() {
        let storage = seeded(now() + Duration::hours(2));
        let store = SessionStore::restore(storage.clone(), now());

        assert!(store.is_authenticated());
        assert_eq!(store.token().as_deref(), Some("tok"));
        assert_eq!(store.user().unwrap().name, "Asha");
        assert_eq!(storage.len(), 3);
    }

    #[test]
    fn test_restore_expired_clears_all_keys() {
        let storage = seeded(now() - Duration::minutes(1));
        let store = SessionStore::restore(storage.clone(), now());

        assert!(!store.is_authenticated());
        assert!(storage.is_empty());
    }

    #[test]
    fn test_restore_partial_clears_all_keys() {
        let storage = seeded(now() + Duration::hours(2));
        storage.remove(EXPIRY_KEY);
        let store = SessionStore::restore(storage.clone(), now());

        assert!(!store.is_authenticated());
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn test_login_writes_session_with_default_ttl() {
        let transport = ScriptedTransport::new();
        transport.reply(200, r#"{"token":"new","user":{"_id":"u2","name":"Ravi","email":"ravi@lab.in"}}"#);
        let storage = Rc::new(MemoryStorage::new());
        let mut store = SessionStore::restore(storage.clone(), now());

        let session = store.login(&client(&transport), &Credentials::new("ravi@lab.in", "pw"), now()).await.unwrap();
        assert_eq!(session.expires_at, now() + Duration::hours(24));
        assert_eq!(storage.get(TOKEN_KEY).as_deref(), Some("new"));
        assert!(store.is_valid(now()));
        assert!(!store.is_valid(now() + Duration::hours(25)));
    }

    #[tokio::test]
    async fn test_failed_login_writes_nothing() {
        let transport = ScriptedTransport::new();
        transport.reply(401, r#"{"message":"Invalid credentials"}"#);
        let storage = Rc::new(MemoryStorage::new());
        let mut store = SessionStore::restore(storage.clone(), now());

        let result = store.login(&client(&transport), &Credentials::new("a@b.c", "bad"), now()).await;
        assert!(result.is_err());
        assert!(!store.is_authenticated());
        assert!(storage.get(TOKEN_KEY).is_none());
    }

    #[tokio::test]
    async fn test_server_expiry_is_honoured() {
        let transport = ScriptedTransport::new();
        transport.reply(200, r#"{"token":"t","expiresIn":60}"#);
        let mut store = SessionStore::restore(Rc::new(MemoryStorage::new()), now());

        store.login(&client(&transport), &Credentials::new("a@b.c", "pw"), now()).await.unwrap();
        assert!(!store.check_expiry(now() + Duration::seconds(30)));
        assert!(store.check_expiry(now() + Duration::seconds(61)));
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_logout_clears_storage() {
        let storage = seeded(now() + Duration::hours(2));
        let mut store = SessionStore::restore(storage.clone(), now());
        store.logout();

        assert!(!store.is_authenticated());
        assert!(storage.is_empty());
    }
}
