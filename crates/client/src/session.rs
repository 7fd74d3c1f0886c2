//! Authenticated session against the Snappy backend.
//!
//! A [`Session`] owns the bearer token and the cached [`Account`]. Both are
//! mirrored to a [`SessionStorage`] so a new session in the same scope picks
//! them up again. Remote calls never touch cached state until the backend has
//! accepted them.

use std::future::Future;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use domain::{
    Account, AuthResponse, EstablishmentTypeView, ProfileResponse, Role, RoleGrantResponse,
    UserSnapshot,
};
use serde::Serialize;

use crate::api::ApiClient;
use crate::error::{ClientError, ClientResult};
use crate::pending::InFlight;
use crate::storage::{SessionStorage, TOKEN_KEY, USER_KEY};

const LOGIN_PATH: &str = "/api/auth/login";
const REGISTER_PATH: &str = "/api/auth/registro";
const PROFILE_PATH: &str = "/api/auth/yo";
const REGISTER_BUSINESS_PATH: &str = "/api/auth/registrar-negocio";
const BECOME_COURIER_PATH: &str = "/api/auth/ser-domiciliario";
const ESTABLISHMENT_TYPES_PATH: &str = "/api/auth/tipos-establecimiento";

const LOGIN_FAILED: &str = "Error al iniciar sesión";
const REGISTER_FAILED: &str = "Error al registrarse";
const REGISTER_BUSINESS_FAILED: &str = "Error al registrar el negocio";
const BECOME_COURIER_FAILED: &str = "Error al registrarte como domiciliario";
const ESTABLISHMENT_TYPES_FAILED: &str = "Error al cargar los tipos de establecimiento";
const PROFILE_FAILED: &str = "Error al cargar el perfil";

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    #[serde(rename = "contraseña")]
    password: &'a str,
}

#[derive(Serialize)]
struct RegisterRequest<'a> {
    #[serde(rename = "correo")]
    email: &'a str,
    #[serde(rename = "contrasena")]
    password: &'a str,
    #[serde(rename = "nombre")]
    name: &'a str,
}

#[derive(Serialize)]
struct EmptyBody {}

/// Fields sent when registering a business
#[derive(Debug, Clone, Default, Serialize)]
pub struct BusinessRegistration {
    #[serde(rename = "nombre_negocio")]
    pub business_name: String,
    #[serde(rename = "direccion", skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(rename = "telefono", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// `comida` or `tienda`
    #[serde(rename = "tipo_establecimiento")]
    pub establishment_type: String,
}

#[derive(Default)]
struct SessionState {
    token: Option<String>,
    account: Option<Account>,
    last_error: Option<String>,
}

struct SessionInner {
    api: ApiClient,
    storage: Arc<dyn SessionStorage>,
    state: RwLock<SessionState>,
    in_flight: InFlight,
}

/// Shared handle to the current session. Clones observe the same state.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.read();
        f.debug_struct("Session")
            .field("token", &state.token.as_ref().map(|_| "[REDACTED]"))
            .field("account", &state.account.as_ref().map(Account::email))
            .field("last_error", &state.last_error)
            .finish()
    }
}

impl Session {
    /// Create a session, restoring any token and account found in `storage`.
    ///
    /// A snapshot that no longer parses is dropped from storage.
    pub fn new(api: ApiClient, storage: Arc<dyn SessionStorage>) -> Self {
        let token = match storage.get(TOKEN_KEY) {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, "Could not read cached token");
                None
            }
        };
        let account = restore_account(storage.as_ref());

        if let Some(account) = &account {
            tracing::debug!(user_id = %account.id(), "Restored cached session");
        }

        Self {
            inner: Arc::new(SessionInner {
                api,
                storage,
                state: RwLock::new(SessionState {
                    token,
                    account,
                    last_error: None,
                }),
                in_flight: InFlight::default(),
            }),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.inner
            .state
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.inner
            .state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // =========================================================================
    // State accessors
    // =========================================================================

    /// Cached account, if signed in
    pub fn current(&self) -> Option<Account> {
        self.read().account.clone()
    }

    pub fn token(&self) -> Option<String> {
        self.read().token.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().account.is_some()
    }

    /// Message of the most recent failed operation
    pub fn last_error(&self) -> Option<String> {
        self.read().last_error.clone()
    }

    /// Whether a remote call is in flight
    pub fn is_busy(&self) -> bool {
        self.inner.in_flight.is_busy()
    }

    // =========================================================================
    // Remote operations
    // =========================================================================

    /// Exchange credentials for a token and cache the account.
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<Account> {
        let body = LoginRequest { email, password };
        self.track(LOGIN_FAILED, self.authenticate(LOGIN_PATH, &body))
            .await
    }

    /// Create an account. New accounts hold the client role only.
    pub async fn register(&self, email: &str, password: &str, name: &str) -> ClientResult<Account> {
        let body = RegisterRequest {
            email,
            password,
            name,
        };
        self.track(REGISTER_FAILED, self.authenticate(REGISTER_PATH, &body))
            .await
    }

    /// Reload the account together with its establishment and courier records.
    ///
    /// Failures are swallowed: the cached account stays as it was and
    /// `Ok(None)` is returned. Only a local storage failure is an error, and
    /// it is recorded in [`Session::last_error`] like any other failure.
    pub async fn fetch_profile(&self) -> ClientResult<Option<Account>> {
        let Some(token) = self.token() else {
            return Ok(None);
        };

        let _pending = self.inner.in_flight.start();
        let response = self.inner.api.get::<ProfileResponse>(PROFILE_PATH, Some(&token)).await;
        let profile = match response {
            Ok(profile) => profile,
            Err(e) => {
                tracing::debug!(error = %e, "Profile refresh failed, keeping cached account");
                return Ok(None);
            }
        };

        let mut account = match Account::from_profile(profile) {
            Ok(account) => account,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring malformed profile response");
                return Ok(None);
            }
        };
        self.keep_active_role(&mut account);
        if let Err(err) = self.store_account(&account) {
            return Err(self.record_failure(PROFILE_FAILED, err));
        }

        Ok(Some(account))
    }

    /// Register a business for the signed-in user and refresh the account.
    pub async fn register_business(
        &self,
        registration: &BusinessRegistration,
    ) -> ClientResult<Account> {
        self.track(
            REGISTER_BUSINESS_FAILED,
            self.grant_role(REGISTER_BUSINESS_PATH, registration),
        )
        .await
    }

    /// Sign the current user up as a courier and refresh the account.
    pub async fn become_courier(&self) -> ClientResult<Account> {
        self.track(
            BECOME_COURIER_FAILED,
            self.grant_role(BECOME_COURIER_PATH, &EmptyBody {}),
        )
        .await
    }

    /// Establishment categories accepted by [`Session::register_business`]
    pub async fn establishment_types(&self) -> ClientResult<Vec<EstablishmentTypeView>> {
        self.track(
            ESTABLISHMENT_TYPES_FAILED,
            self.inner.api.get(ESTABLISHMENT_TYPES_PATH, None),
        )
        .await
    }

    // =========================================================================
    // Local operations
    // =========================================================================

    /// Switch the active role of the cached account. No request is made.
    ///
    /// Returns `false` when signed out or when the role is not held.
    pub fn set_active_role(&self, role: Role) -> ClientResult<bool> {
        let snapshot = {
            let mut state = self.write();
            let Some(account) = state.account.as_mut() else {
                return Ok(false);
            };
            if !account.set_active_role(role) {
                return Ok(false);
            }
            account.to_snapshot()
        };
        self.persist_snapshot(&snapshot)?;
        Ok(true)
    }

    /// Forget the token and account. The backend is not contacted.
    pub fn logout(&self) -> ClientResult<()> {
        {
            let mut state = self.write();
            if let Some(account) = &state.account {
                tracing::info!(user_id = %account.id(), "Signing out");
            }
            *state = SessionState::default();
        }
        self.inner.storage.remove(TOKEN_KEY)?;
        self.inner.storage.remove(USER_KEY)?;
        Ok(())
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// Run a remote operation with the busy flag raised, recording its
    /// failure message before the error is returned.
    async fn track<T, F>(&self, fallback: &str, operation: F) -> ClientResult<T>
    where
        F: Future<Output = ClientResult<T>>,
    {
        self.write().last_error = None;
        let _pending = self.inner.in_flight.start();

        operation
            .await
            .map_err(|err| self.record_failure(fallback, err))
    }

    fn record_failure(&self, fallback: &str, err: ClientError) -> ClientError {
        let message = err.user_message(fallback);
        tracing::warn!(error = %err, "{}", message);
        self.write().last_error = Some(message);
        err
    }

    async fn authenticate<B>(&self, path: &str, body: &B) -> ClientResult<Account>
    where
        B: Serialize + ?Sized,
    {
        let response: AuthResponse = self.inner.api.post(path, body, None).await?;
        let account = Account::from_snapshot(response.user)?;
        let snapshot = serde_json::to_string(&account.to_snapshot())?;

        self.persist_credentials(&response.token, &snapshot)?;
        {
            let mut state = self.write();
            state.token = Some(response.token);
            state.account = Some(account.clone());
        }

        tracing::info!(user_id = %account.id(), "Signed in");
        Ok(account)
    }

    async fn grant_role<B>(&self, path: &str, body: &B) -> ClientResult<Account>
    where
        B: Serialize + ?Sized,
    {
        let token = self.token().ok_or(ClientError::NotAuthenticated)?;
        let grant: RoleGrantResponse = self.inner.api.post(path, body, Some(&token)).await?;
        tracing::info!(message = %grant.message, "Role granted");

        let mut account = Account::from_snapshot(grant.user)?;
        self.keep_active_role(&mut account);
        self.store_account(&account)?;

        Ok(self.fetch_profile().await?.unwrap_or(account))
    }

    /// Carry the locally chosen active role over to a freshly fetched account.
    fn keep_active_role(&self, account: &mut Account) {
        let active = self.read().account.as_ref().map(|a| a.active_role().clone());
        if let Some(role) = active {
            account.set_active_role(role);
        }
    }

    fn store_account(&self, account: &Account) -> ClientResult<()> {
        self.persist_snapshot(&account.to_snapshot())?;
        self.write().account = Some(account.clone());
        Ok(())
    }

    /// Write token and snapshot as a pair.
    ///
    /// When the snapshot cannot be written the previous token is put back, so
    /// storage never pairs one user's token with another user's snapshot.
    fn persist_credentials(&self, token: &str, snapshot: &str) -> ClientResult<()> {
        let storage = &self.inner.storage;
        let previous_token = storage.get(TOKEN_KEY)?;
        storage.set(TOKEN_KEY, token)?;

        if let Err(err) = storage.set(USER_KEY, snapshot) {
            let rollback = match &previous_token {
                Some(previous) => storage.set(TOKEN_KEY, previous),
                None => storage.remove(TOKEN_KEY),
            };
            if let Err(e) = rollback {
                tracing::error!(error = %e, "Could not restore cached token");
            }
            return Err(err);
        }

        Ok(())
    }

    fn persist_snapshot(&self, snapshot: &UserSnapshot) -> ClientResult<()> {
        let json = serde_json::to_string(snapshot)?;
        self.inner.storage.set(USER_KEY, &json)
    }
}

fn restore_account(storage: &dyn SessionStorage) -> Option<Account> {
    let json = match storage.get(USER_KEY) {
        Ok(Some(json)) => json,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(error = %e, "Could not read cached user");
            return None;
        }
    };

    match Account::from_json(&json) {
        Ok(account) => Some(account),
        Err(e) => {
            tracing::warn!(error = %e, "Discarding unreadable cached user");
            if let Err(e) = storage.remove(USER_KEY) {
                tracing::warn!(error = %e, "Could not clear cached user");
            }
            None
        }
    }
}
