//! Signed-in identity as handed out by the credential service.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub uid: String,
    pub email: Option<String>,
    /// Opaque session token; the CLI persists it between invocations.
    pub token: String,
}

/// Custom claims attached to an identity. `admin` is granted out-of-band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub admin: bool,
}
