//! Authentication service: login/register flows delegating to `todo_core::auth`.

use todo_core::auth::AuthError;
use todo_core::auth::jwt::issue_access_token;
use todo_core::auth::password::{
    CredentialHash, hash_password, validate_password_strength, verify_password,
};
use todo_core::models::{NewUser, User};
use todo_core::models::auth::normalize_email;
use todo_core::store::{StoreError, UserStore};
use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::models::{RegisterRequest, TokenResponse};

/// Token type reported alongside access tokens.
pub const TOKEN_TYPE: &str = "bearer";

/// Run bcrypt off the async executor.
async fn blocking<T, F>(f: F) -> AppResult<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal(format!("blocking task failed: {e}")))
}

/// Authenticate with email + password and mint an access token.
///
/// Unknown email and wrong password are indistinguishable to the caller.
pub async fn login(
    store: &dyn UserStore,
    email: &str,
    password: &str,
    jwt_secret: &[u8],
    ttl: chrono::Duration,
) -> AppResult<TokenResponse> {
    let email = email.trim().to_lowercase();
    let Some(record) = store.find_user_by_email(&email).await? else {
        debug!("login for unknown email");
        return Err(AuthError::CredentialError.into());
    };

    let hash = record.credential_hash();
    let candidate = password.to_string();
    if !blocking(move || verify_password(&candidate, &hash)).await? {
        debug!(user_id = record.user.id, "login with wrong password");
        return Err(AuthError::CredentialError.into());
    }

    let access_token = issue_access_token(record.user.id, &record.user.email, ttl, jwt_secret)?;
    info!(user_id = record.user.id, "user logged in");

    Ok(TokenResponse {
        access_token,
        token_type: TOKEN_TYPE.to_string(),
    })
}

/// Create a new user account.
pub async fn register(store: &dyn UserStore, body: RegisterRequest) -> AppResult<User> {
    let email = normalize_email(&body.email)?;

    if store.find_user_by_email(&email).await?.is_some() {
        return Err(AppError::BadRequest(
            "User with this email already exists".into(),
        ));
    }

    validate_password_strength(&body.password).map_err(|e| match e {
        AuthError::ValidationError(reason) => {
            AppError::BadRequest(format!("Password validation failed: {reason}"))
        }
        other => AppError::from(other),
    })?;

    let password = body.password;
    let password_hash: CredentialHash =
        blocking(move || hash_password(&password)).await??;

    let user = store
        .create_user(NewUser {
            email,
            name: body.name,
            first_name: body.first_name,
            last_name: body.last_name,
            password_hash,
        })
        .await
        .map_err(|e| match e {
            // Lost a race with a concurrent registration.
            StoreError::Conflict(_) => {
                AppError::BadRequest("User with this email already exists".into())
            }
            other => AppError::from(other),
        })?;

    info!(user_id = user.id, "user registered");
    Ok(user)
}

/// Load the user behind an authenticated request.
pub async fn current_user(store: &dyn UserStore, user_id: i64) -> AppResult<User> {
    store
        .find_user_by_id(user_id)
        .await?
        .ok_or(AppError::UserNotFound)
}

/// Like [`current_user`], but refuses deactivated accounts.
pub async fn active_user(store: &dyn UserStore, user_id: i64) -> AppResult<User> {
    let user = current_user(store, user_id).await?;
    if !user.is_active {
        return Err(AppError::Forbidden("Inactive user".into()));
    }
    Ok(user)
}
