//! Session, ledger, and navigation core for finhero
//!
//! The [`App`] service owns the pieces every page of the original client
//! shared: the durable session store, the auth gateway handle, and the
//! in-memory transaction ledger. It is constructed once at startup and
//! injected into consumers, replacing the ambient global state of the
//! browser client.

pub mod error;
pub mod guard;
pub mod ledger;
pub mod models;

use log::{info, warn};
use std::sync::RwLock;

use finhero_client::{AuthRef, AuthResponse, TransactionRecord};
use finhero_store::{SessionStore, StoreError, StoredSession};

pub use error::{CoreError, CoreResult, ErrorCode};
pub use guard::{resolve, Route, RouteAction};
pub use ledger::{Ledger, Totals};
pub use models::{Session, Transaction, TransactionDraft, TransactionKind, User};

/// The session-level state machine: authenticated or not
///
/// Transitions: login/signup success moves to `Authenticated`, logout moves
/// back. The initial state is derived from durable storage at hydrate time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    Authenticated,
}

/// Owned session/ledger service
pub struct App {
    store: SessionStore,
    auth: AuthRef,
    session: RwLock<Option<Session>>,
    ledger: RwLock<Ledger>,
    /// Serializes login/signup so two concurrent submissions cannot race
    /// the session write; the second caller observes the first one's result.
    auth_flight: tokio::sync::Mutex<()>,
}

impl App {
    /// Create the service; call [`App::hydrate`] before first use
    pub fn new(store: SessionStore, auth: AuthRef) -> Self {
        Self {
            store,
            auth,
            session: RwLock::new(None),
            ledger: RwLock::new(Ledger::new()),
            auth_flight: tokio::sync::Mutex::new(()),
        }
    }

    // ==================== Session ====================

    /// Restore the session from durable storage, if one is present
    ///
    /// Pure read apart from populating in-memory state: nothing is written
    /// back. A corrupt user record is logged and treated as absent rather
    /// than failing startup.
    pub fn hydrate(&self) -> CoreResult<Option<Session>> {
        let stored: Option<StoredSession<User>> = match self.store.hydrate() {
            Ok(stored) => stored,
            Err(StoreError::Corrupt { path, reason }) => {
                warn!("ignoring corrupt session record at {}: {}", path, reason);
                None
            }
            Err(e) => return Err(e.into()),
        };

        let session = stored.map(|s| Session {
            token: s.token,
            user: s.user,
        });

        if let Some(ref s) = session {
            info!("restored session for {}", s.user.email);
        }
        *self.session.write().unwrap() = session.clone();
        Ok(session)
    }

    /// Current session state
    pub fn auth_state(&self) -> AuthState {
        if self.session.read().unwrap().is_some() {
            AuthState::Authenticated
        } else {
            AuthState::Unauthenticated
        }
    }

    /// Whether a session is currently held
    pub fn is_authenticated(&self) -> bool {
        self.auth_state() == AuthState::Authenticated
    }

    /// Snapshot of the current session
    pub fn session(&self) -> Option<Session> {
        self.session.read().unwrap().clone()
    }

    /// Current session, or an unauthenticated-access error
    ///
    /// Every ledger or backend operation below goes through this; callers
    /// must re-login to recover.
    pub fn require_session(&self) -> CoreResult<Session> {
        self.session
            .read()
            .unwrap()
            .clone()
            .ok_or(CoreError::Unauthenticated)
    }

    /// Exchange credentials for a session and persist it
    ///
    /// A failed attempt never alters the stored session. If another
    /// login/signup established a session while this call waited on the
    /// in-flight guard, that session is returned without a second request.
    pub async fn login(&self, email: &str, password: &str) -> CoreResult<Session> {
        let _flight = self.auth_flight.lock().await;
        if let Some(existing) = self.session.read().unwrap().clone() {
            info!("login skipped; session already established");
            return Ok(existing);
        }

        let response = self.auth.login(email, password).await?;
        self.install_session(response)
    }

    /// Register a new account and persist the resulting session
    ///
    /// The password-length precondition fails fast, before any request.
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> CoreResult<Session> {
        finhero_client::validate_password(password).map_err(CoreError::from)?;

        let _flight = self.auth_flight.lock().await;
        if let Some(existing) = self.session.read().unwrap().clone() {
            info!("signup skipped; session already established");
            return Ok(existing);
        }

        let response = self.auth.signup(name, email, password).await?;
        self.install_session(response)
    }

    fn install_session(&self, response: AuthResponse) -> CoreResult<Session> {
        let user = User::from(response.user);
        self.store.set(&response.token, &user)?;

        let session = Session {
            token: response.token,
            user,
        };
        info!("session established for {}", session.user.email);
        *self.session.write().unwrap() = Some(session.clone());
        Ok(session)
    }

    /// Drop the session from storage and memory
    pub fn logout(&self) -> CoreResult<()> {
        self.store.clear()?;
        *self.session.write().unwrap() = None;
        info!("session cleared");
        Ok(())
    }

    // ==================== Navigation ====================

    /// Resolve a requested path against the current session state
    pub fn resolve_route(&self, path: &str) -> RouteAction {
        guard::resolve(path, self.is_authenticated())
    }

    // ==================== Ledger ====================

    /// Append a transaction to the ledger
    pub fn add_transaction(&self, draft: TransactionDraft) -> CoreResult<Transaction> {
        self.require_session()?;
        self.ledger.write().unwrap().append(draft)
    }

    /// Full transaction list, most recent first
    pub fn transactions(&self) -> CoreResult<Vec<Transaction>> {
        self.require_session()?;
        Ok(self.ledger.read().unwrap().list().to_vec())
    }

    /// Income, expense, and balance over the current ledger
    pub fn totals(&self) -> CoreResult<Totals> {
        self.require_session()?;
        Ok(self.ledger.read().unwrap().totals())
    }

    /// Replace the ledger contents with records fetched from the backend
    pub fn ingest_remote(&self, records: Vec<TransactionRecord>) -> CoreResult<usize> {
        self.require_session()?;
        let transactions = records
            .into_iter()
            .map(Transaction::try_from)
            .collect::<CoreResult<Vec<_>>>()?;
        let count = transactions.len();
        self.ledger.write().unwrap().replace_all(transactions);
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use finhero_client::{AuthApi, ClientError, ClientResult, UserRecord};
    use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Backend double; counts calls and either succeeds or rejects
    struct MockAuth {
        reject: bool,
        calls: AtomicUsize,
    }

    impl MockAuth {
        fn accepting() -> Arc<Self> {
            Arc::new(Self {
                reject: false,
                calls: AtomicUsize::new(0),
            })
        }

        fn rejecting() -> Arc<Self> {
            Arc::new(Self {
                reject: true,
                calls: AtomicUsize::new(0),
            })
        }

        fn respond(&self) -> ClientResult<AuthResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.reject {
                return Err(ClientError::Unauthorized);
            }
            Ok(AuthResponse {
                token: "tok-1".to_string(),
                user: UserRecord {
                    id: "u-1".to_string(),
                    name: "Maria".to_string(),
                    email: "maria@example.com".to_string(),
                },
            })
        }
    }

    #[async_trait]
    impl AuthApi for MockAuth {
        async fn login(&self, _email: &str, _password: &str) -> ClientResult<AuthResponse> {
            self.respond()
        }

        async fn signup(
            &self,
            _name: &str,
            _email: &str,
            _password: &str,
        ) -> ClientResult<AuthResponse> {
            self.respond()
        }
    }

    static DIR_SEQ: AtomicU32 = AtomicU32::new(0);

    fn temp_store() -> SessionStore {
        let seq = DIR_SEQ.fetch_add(1, Ordering::Relaxed);
        let dir = std::env::temp_dir().join(format!(
            "finhero-core-test-{}-{}",
            std::process::id(),
            seq
        ));
        let _ = std::fs::remove_dir_all(&dir);
        SessionStore::new(dir)
    }

    fn draft() -> TransactionDraft {
        TransactionDraft {
            id: None,
            title: "Mercado".to_string(),
            amount: 80.0,
            kind: TransactionKind::Expense,
            category: "Alimentação".to_string(),
            date: "2025-02-10".to_string(),
            description: None,
        }
    }

    #[tokio::test]
    async fn test_login_persists_session() {
        let store = temp_store();
        let app = App::new(store.clone(), MockAuth::accepting());

        let session = app.login("maria@example.com", "secret1").await.unwrap();
        assert_eq!(session.token, "tok-1");
        assert!(app.is_authenticated());

        // A fresh service hydrating the same store sees the session
        let other = App::new(store, MockAuth::accepting());
        let restored = other.hydrate().unwrap().unwrap();
        assert_eq!(restored.user.email, "maria@example.com");
    }

    #[tokio::test]
    async fn test_rejected_login_leaves_store_empty() {
        let store = temp_store();
        let app = App::new(store.clone(), MockAuth::rejecting());

        let err = app.login("maria@example.com", "wrong").await.unwrap_err();
        assert!(matches!(err, CoreError::AuthenticationFailed));
        assert!(!app.is_authenticated());

        let stored: Option<StoredSession<User>> = store.hydrate().unwrap();
        assert!(stored.is_none());
    }

    #[tokio::test]
    async fn test_signup_short_password_skips_backend() {
        let auth = MockAuth::accepting();
        let app = App::new(temp_store(), auth.clone());

        let err = app
            .signup("Maria", "maria@example.com", "12345")
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationError);
        assert_eq!(auth.calls.load(Ordering::SeqCst), 0);
        assert!(!app.is_authenticated());
    }

    #[tokio::test]
    async fn test_concurrent_logins_issue_one_request() {
        let auth = MockAuth::accepting();
        let app = Arc::new(App::new(temp_store(), auth.clone()));

        let a = app.clone();
        let b = app.clone();
        let (first, second) = tokio::join!(
            a.login("maria@example.com", "secret1"),
            b.login("maria@example.com", "secret1"),
        );

        assert_eq!(first.unwrap(), second.unwrap());
        assert_eq!(auth.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_logout_returns_to_unauthenticated() {
        let store = temp_store();
        let app = App::new(store.clone(), MockAuth::accepting());
        app.login("maria@example.com", "secret1").await.unwrap();

        app.logout().unwrap();
        assert_eq!(app.auth_state(), AuthState::Unauthenticated);
        let stored: Option<StoredSession<User>> = store.hydrate().unwrap();
        assert!(stored.is_none());
    }

    #[tokio::test]
    async fn test_ledger_requires_session() {
        let app = App::new(temp_store(), MockAuth::accepting());

        assert!(matches!(
            app.add_transaction(draft()),
            Err(CoreError::Unauthenticated)
        ));
        assert!(matches!(app.totals(), Err(CoreError::Unauthenticated)));
        assert!(matches!(
            app.transactions(),
            Err(CoreError::Unauthenticated)
        ));
    }

    #[tokio::test]
    async fn test_ledger_flow_after_login() {
        let app = App::new(temp_store(), MockAuth::accepting());
        app.login("maria@example.com", "secret1").await.unwrap();

        let stored = app.add_transaction(draft()).unwrap();
        let listed = app.transactions().unwrap();
        assert_eq!(listed[0], stored);

        let totals = app.totals().unwrap();
        assert_eq!(totals.expense, 80.0);
        assert_eq!(totals.balance, -80.0);
    }

    #[tokio::test]
    async fn test_resolve_route_follows_session_state() {
        let app = App::new(temp_store(), MockAuth::accepting());
        assert_eq!(app.resolve_route("/home"), RouteAction::RedirectToAuth);

        app.login("maria@example.com", "secret1").await.unwrap();
        assert_eq!(app.resolve_route("/home"), RouteAction::Render(Route::Home));
        assert_eq!(app.resolve_route("/"), RouteAction::RedirectToHome);
    }
}
