//! Auth endpoints: login, register, logout, profile.

use crate::api::ApiClient;
use crate::types::{AuthResponse, LoginCredentials, RegisterRequest, Result, User};
use tracing::warn;

/// Logs in with username and password.
///
/// The endpoint follows the OAuth2 password-form convention, so credentials
/// go out form-encoded rather than as JSON. On success the returned access
/// token replaces whatever the store held before.
pub async fn login(client: &ApiClient, credentials: &LoginCredentials) -> Result<AuthResponse> {
    let response: AuthResponse = client.post_form("/auth/login", credentials).await?;
    if !response.access_token.is_empty() {
        client.store().set(&response.access_token)?;
    }
    Ok(response)
}

/// Registers a new account. The API logs the new user in directly, so a
/// returned token is stored just like after `login`.
pub async fn register(client: &ApiClient, request: &RegisterRequest) -> Result<AuthResponse> {
    let response: AuthResponse = client.post_json("/auth/register", request).await?;
    if !response.access_token.is_empty() {
        client.store().set(&response.access_token)?;
    }
    Ok(response)
}

/// Logs out: the local token is cleared first, then the server session is
/// ended best-effort. A failing server call cannot resurrect the token.
pub async fn logout(client: &ApiClient) -> Result<()> {
    client.store().clear()?;
    if let Err(e) = client.post_empty("/auth/logout").await {
        warn!(error = %e, "server-side logout failed; local token already cleared");
    }
    Ok(())
}

/// Fetches the profile of the authenticated user.
pub async fn me(client: &ApiClient) -> Result<User> {
    client.get("/auth/me").await
}
