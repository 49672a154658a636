//! User accounts and login.

use entities::{User, ValidationErrors};
use hotel_store::{Repository, Store, StoreError, UserFilter, UserRepository};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ServerError, ServerResult};
use crate::middleware::Caller;
use crate::state::AppState;

pub const EMAIL_IN_USE: &str = "Email already in use";

/// Body of the registration request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserParams {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Body of the profile update request. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserParams {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub is_admin: Option<bool>,
}

/// Body of the login request.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginParams {
    pub email: String,
    pub password: String,
}

/// Successful login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

fn email_in_use() -> ServerError {
    ServerError::Validation(ValidationErrors::single("email", EMAIL_IN_USE))
}

/// Maps a unique-key conflict from the store onto the email field.
fn map_conflict(error: StoreError) -> ServerError {
    match error {
        StoreError::AlreadyExists { .. } => email_in_use(),
        other => other.into(),
    }
}

/// Returns true if `email` belongs to a user other than `except`.
async fn email_taken<S: Store>(
    state: &AppState<S>,
    email: &str,
    except: Option<Uuid>,
) -> ServerResult<bool> {
    let existing = state.store.users().get_by_email(email).await?;
    Ok(existing.is_some_and(|user| Some(user.id) != except))
}

/// Hashes the password and stores a new user.
async fn insert_user<S: Store>(
    state: &AppState<S>,
    user: User,
    password: &str,
) -> ServerResult<User> {
    let hash = state.hasher.hash(password).await?;
    let user = user.with_password_hash(hash);
    state
        .store
        .users()
        .create(&user)
        .await
        .map_err(map_conflict)?;
    Ok(user)
}

/// Registers a new user. Self-registration never grants admin rights.
pub async fn create_user<S: Store>(
    state: &AppState<S>,
    params: CreateUserParams,
) -> ServerResult<User> {
    let user = User::new(params.first_name, params.last_name, params.email);

    let mut errors = user.validate(Some(&params.password));
    if !errors.contains("email") && email_taken(state, &user.email, None).await? {
        errors.add("email", EMAIL_IN_USE);
    }
    errors.into_result()?;

    let user = insert_user(state, user, &params.password).await?;

    tracing::info!(user_id = %user.id, email = %user.email, "User registered");

    Ok(user)
}

/// Gets a user. Only the user themself and administrators may look.
pub async fn get_user<S: Store>(
    state: &AppState<S>,
    caller: &Caller,
    id: Uuid,
) -> ServerResult<User> {
    if !caller.can_access(id) {
        return Err(ServerError::PermissionDenied);
    }
    state
        .store
        .users()
        .get_by_id(id)
        .await?
        .ok_or(ServerError::NotFound)
}

/// Lists all users.
pub async fn list_users<S: Store>(state: &AppState<S>, caller: &Caller) -> ServerResult<Vec<User>> {
    caller.require_admin()?;
    Ok(state.store.users().get(&UserFilter::new()).await?)
}

/// Updates a user's profile. The password hash is never touched here.
pub async fn update_user<S: Store>(
    state: &AppState<S>,
    caller: &Caller,
    id: Uuid,
    params: UpdateUserParams,
) -> ServerResult<User> {
    if !caller.can_access(id) {
        return Err(ServerError::PermissionDenied);
    }

    let mut user = state
        .store
        .users()
        .get_by_id(id)
        .await?
        .ok_or(ServerError::NotFound)?;

    if let Some(is_admin) = params.is_admin {
        if is_admin != user.is_admin {
            caller.require_admin()?;
            user.is_admin = is_admin;
        }
    }
    if let Some(first_name) = params.first_name {
        user.first_name = first_name;
    }
    if let Some(last_name) = params.last_name {
        user.last_name = last_name;
    }
    if let Some(email) = params.email {
        user.email = email;
    }

    let mut errors = user.validate(None);
    if !errors.contains("email") && email_taken(state, &user.email, Some(id)).await? {
        errors.add("email", EMAIL_IN_USE);
    }
    errors.into_result()?;

    state
        .store
        .users()
        .update_by_id(id, &user)
        .await
        .map_err(map_conflict)?;

    tracing::info!(user_id = %id, "User updated");

    Ok(user)
}

/// Deletes a user. Their bookings are kept.
pub async fn delete_user<S: Store>(
    state: &AppState<S>,
    caller: &Caller,
    id: Uuid,
) -> ServerResult<()> {
    if !caller.can_access(id) {
        return Err(ServerError::PermissionDenied);
    }
    state.store.users().delete_by_id(id).await?;

    tracing::info!(user_id = %id, "User deleted");

    Ok(())
}

/// Exchanges credentials for a bearer token.
///
/// Unknown email and wrong password fail the same way.
pub async fn login<S: Store>(
    state: &AppState<S>,
    params: LoginParams,
) -> ServerResult<LoginResponse> {
    let Some(user) = state.store.users().get_by_email(&params.email).await? else {
        tracing::debug!(email = %params.email, "Login for unknown email");
        return Err(ServerError::AuthFailed);
    };

    let verified = !user.password_hash.is_empty()
        && state
            .hasher
            .verify(&params.password, &user.password_hash)
            .await?;
    if !verified {
        tracing::debug!(user_id = %user.id, "Login with wrong password");
        return Err(ServerError::AuthFailed);
    }

    let token = state
        .jwt_manager
        .generate_token(user.id, user.email.clone(), user.is_admin)?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(LoginResponse { token, user })
}

/// Makes sure an administrator account exists for `email`.
///
/// An existing user with that email is promoted and keeps their password.
pub async fn bootstrap_admin<S: Store>(
    state: &AppState<S>,
    email: &str,
    password: &str,
) -> ServerResult<User> {
    if let Some(mut user) = state.store.users().get_by_email(email).await? {
        if !user.is_admin {
            user.is_admin = true;
            state.store.users().update_by_id(user.id, &user).await?;
            tracing::info!(user_id = %user.id, "Existing user promoted to admin");
        }
        return Ok(user);
    }

    let user = User::new("Admin", "Admin", email).with_admin(true);
    user.validate(Some(password)).into_result()?;
    let user = insert_user(state, user, password).await?;

    tracing::info!(user_id = %user.id, email = %user.email, "Admin account created");

    Ok(user)
}
