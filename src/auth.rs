//! Signed subscriptions for authenticated channels.
//!
//! Own-account fills only carry the account identifier on an
//! authenticated subscription. The subscribe request is signed like a
//! `GET /users/self/verify` REST call and carries the key, passphrase,
//! timestamp, and signature inline.

use std::time::{SystemTime, UNIX_EPOCH};

use base64::prelude::*;
use hmac::{Hmac, Mac};
use serde::Serialize;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::Result;
use crate::error::CambistError;

const VERIFY_METHOD: &str = "GET";
const VERIFY_PATH: &str = "/users/self/verify";

/// API credentials. Secret material is wiped on drop.
#[derive(Clone)]
pub struct Credentials {
    pub key: String,
    pub secret: Zeroizing<String>,
    pub passphrase: Zeroizing<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &self.key)
            .field("secret", &"<redacted>")
            .field("passphrase", &"<redacted>")
            .finish()
    }
}

/// Authentication fields flattened into a subscribe request.
#[derive(Debug, Clone, Serialize)]
pub struct SignedAuth {
    pub signature: String,
    pub key: String,
    pub passphrase: String,
    pub timestamp: String,
}

/// Signs a subscription using the current wall-clock time.
///
/// # Errors
///
/// Returns [`CambistError::Auth`] if the secret is not valid base64.
pub fn sign_subscription(credentials: &Credentials) -> Result<SignedAuth> {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| CambistError::Auth(format!("system clock before UNIX epoch: {e}")))?
        .as_secs();

    sign_subscription_at(credentials, timestamp)
}

/// Signs a subscription for a fixed UNIX timestamp (seconds).
///
/// # Errors
///
/// Returns [`CambistError::Auth`] if the secret is not valid base64.
pub fn sign_subscription_at(credentials: &Credentials, timestamp: u64) -> Result<SignedAuth> {
    let timestamp = timestamp.to_string();
    let signature = sign(&credentials.secret, &timestamp, VERIFY_METHOD, VERIFY_PATH)?;

    Ok(SignedAuth {
        signature,
        key: credentials.key.clone(),
        passphrase: credentials.passphrase.as_str().to_string(),
        timestamp,
    })
}

/// Computes the request signature.
///
/// Algorithm: `Base64(HMAC-SHA256(Base64Decode(secret), timestamp + method + path))`
fn sign(api_secret: &str, timestamp: &str, method: &str, path: &str) -> Result<String> {
    let secret = Zeroizing::new(
        BASE64_STANDARD
            .decode(api_secret)
            .map_err(|e| CambistError::Auth(format!("invalid base64 api_secret: {e}")))?,
    );

    let mut mac = Hmac::<Sha256>::new_from_slice(&secret)
        .map_err(|e| CambistError::Auth(format!("invalid HMAC key: {e}")))?;
    mac.update(timestamp.as_bytes());
    mac.update(method.as_bytes());
    mac.update(path.as_bytes());

    Ok(BASE64_STANDARD.encode(mac.finalize().into_bytes()))
}
