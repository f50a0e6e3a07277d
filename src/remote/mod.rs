//! Contracts of the hosted services the application talks to.
//!
//! - [`CredentialService`]: accounts, sessions and identity claims
//! - [`DocumentStore`]: document reads/writes and realtime change feeds
//! - [`PrivilegedFunctions`]: server-side operations reserved to admins
//!
//! `db::LocalBackend` implements all of them on top of SQLite.

pub mod gateway;
pub mod paths;
pub mod subscription;

pub use gateway::RemoteGateway;
pub use subscription::{ChangeBatch, ChangeKind, DocChange, Subscription};

use crate::errors::AppResult;
use crate::models::identity::{Claims, Identity};
use serde_json::{Map, Value};

/// Field map of a stored document.
pub type Fields = Map<String, Value>;

/// Key of the sentinel object the store replaces with its own clock.
pub const SERVER_TIMESTAMP_KEY: &str = "$serverTimestamp";

/// Placeholder resolved to the store's current time when written.
pub fn server_timestamp() -> Value {
    let mut m = Map::new();
    m.insert(SERVER_TIMESTAMP_KEY.to_string(), Value::Bool(true));
    Value::Object(m)
}

pub fn is_server_timestamp(v: &Value) -> bool {
    matches!(v, Value::Object(m) if m.len() == 1 && m.get(SERVER_TIMESTAMP_KEY) == Some(&Value::Bool(true)))
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetOptions {
    /// Only the supplied top-level fields are written; others keep their value.
    pub merge: bool,
}

impl SetOptions {
    pub fn merge() -> Self {
        Self { merge: true }
    }

    pub fn replace() -> Self {
        Self { merge: false }
    }
}

/// Query filter on a top-level field.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq(String, Value),
}

impl Filter {
    pub fn eq<V: Into<Value>>(field: &str, value: V) -> Self {
        Filter::Eq(field.to_string(), value.into())
    }

    pub fn matches(&self, fields: &Fields) -> bool {
        match self {
            Filter::Eq(field, value) => fields.get(field) == Some(value),
        }
    }
}

pub trait CredentialService {
    /// Create a credential and return its uid.
    fn create_account(&self, email: &str, password: &str) -> AppResult<String>;

    fn sign_in(&self, email: &str, password: &str) -> AppResult<Identity>;

    fn sign_out(&self, identity: &Identity) -> AppResult<()>;

    fn send_password_reset(&self, email: &str) -> AppResult<()>;

    /// Identity bound to a persisted session token, `None` once the
    /// session is gone (signed out, account deleted or disabled).
    fn restore(&self, token: &str) -> AppResult<Option<Identity>>;

    /// Claims of the identity. With `force_refresh` the claims are read
    /// again from the account instead of the ones captured at sign-in.
    fn identity_claims(&self, identity: &Identity, force_refresh: bool) -> AppResult<Claims>;
}

pub trait DocumentStore {
    fn get(&self, path: &str) -> AppResult<Option<Fields>>;

    fn set(&self, path: &str, fields: Fields, opts: SetOptions) -> AppResult<()>;

    fn delete(&self, path: &str) -> AppResult<()>;

    fn query(&self, collection: &str, filters: &[Filter]) -> AppResult<Vec<Document>>;

    /// Open a change feed on a collection. The first batch lists every
    /// existing document as `Added`.
    fn subscribe(&self, collection: &str) -> AppResult<Subscription>;

    /// Push pending changes to live subscriptions and return how many
    /// batches were delivered.
    fn deliver_pending(&self) -> AppResult<usize>;
}

pub trait PrivilegedFunctions {
    /// Remove the credential of `uid`. The caller must hold the admin claim,
    /// verified on the service side.
    fn delete_credential(&self, caller: &Identity, uid: &str) -> AppResult<()>;
}

/// Internal diagnostics log.
pub trait OperationLog {
    fn record(&self, operation: &str, target: &str, message: &str);
}

/// Everything the session controller needs from the backing services.
pub trait Backend: CredentialService + DocumentStore + PrivilegedFunctions + OperationLog {}

impl<T> Backend for T where T: CredentialService + DocumentStore + PrivilegedFunctions + OperationLog {}
