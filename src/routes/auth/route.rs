use axum::{Json, Router, http::StatusCode, routing::post};

use super::dto::{ChangePasswordRequest, ChangePasswordResponse, LoginRequest, LoginResponse};
use crate::config::{APP_CONFIG, JWT_EXPIRY_SECONDS};
use crate::entities::sea_orm_active_enums::RoleEnum;
use crate::extractor::AuthClaims;
use crate::repositories::{AccountRepository, StudentRepository};
use crate::utils::jwt::{JwtManager, UserRole};

pub fn create_route() -> Router {
    Router::new()
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/auth/change-password", post(change_password))
}

/// Login endpoint - returns JWT token
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Authentication"
)]
pub async fn login(
    Json(payload): Json<LoginRequest>,
) -> Result<(StatusCode, Json<LoginResponse>), (StatusCode, String)> {
    let account_repo = AccountRepository::new();

    let account = account_repo
        .find_by_username(&payload.username)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", e),
            )
        })?
        .ok_or_else(|| {
            (
                StatusCode::UNAUTHORIZED,
                "Invalid username or password".to_string(),
            )
        })?;

    let password_valid = bcrypt::verify(&payload.password, &account.password).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Password verification error: {}", e),
        )
    })?;

    if !password_valid {
        return Err((
            StatusCode::UNAUTHORIZED,
            "Invalid username or password".to_string(),
        ));
    }

    let user_role = match account.role {
        RoleEnum::Student => UserRole::Student,
        RoleEnum::Instructor => UserRole::Instructor,
    };

    // Students get their profile name in the token; instructors have no
    // profile row and keep the username
    let display_name = if account.role == RoleEnum::Student {
        let student_repo = StudentRepository::new();
        student_repo
            .find_by_id(&account.username)
            .await
            .map_err(|e| {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Database error: {}", e),
                )
            })?
            .map(|s| s.full_name)
            .unwrap_or_else(|| account.username.clone())
    } else {
        account.username.clone()
    };

    let jwt_manager = JwtManager::new(APP_CONFIG.jwt_secret.clone());
    let token = jwt_manager
        .create_jwt(&account.username, &display_name, user_role, JWT_EXPIRY_SECONDS)
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to create token: {}", e),
            )
        })?;

    let role_str = match account.role {
        RoleEnum::Student => "student",
        RoleEnum::Instructor => "instructor",
    };

    let response = LoginResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: JWT_EXPIRY_SECONDS,
        username: account.username,
        role: role_str.to_string(),
    };

    Ok((StatusCode::OK, Json(response)))
}

/// Change password endpoint - verify old password then set new password
#[utoipa::path(
    post,
    path = "/api/v1/auth/change-password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed successfully", body = ChangePasswordResponse),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "Invalid old password"),
        (status = 404, description = "Account not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
pub async fn change_password(
    AuthClaims(auth_claims): AuthClaims,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<(StatusCode, Json<ChangePasswordResponse>), (StatusCode, String)> {
    if payload.new_password.len() < 6 {
        return Err((
            StatusCode::BAD_REQUEST,
            "New password must be at least 6 characters".to_string(),
        ));
    }

    let account_repo = AccountRepository::new();

    let account = account_repo
        .find_by_username(&auth_claims.username)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", e),
            )
        })?
        .ok_or_else(|| (StatusCode::NOT_FOUND, "Account not found".to_string()))?;

    let password_valid = bcrypt::verify(&payload.old_password, &account.password).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Password verification error: {}", e),
        )
    })?;

    if !password_valid {
        return Err((
            StatusCode::UNAUTHORIZED,
            "Old password is incorrect".to_string(),
        ));
    }

    let hashed_password =
        bcrypt::hash(&payload.new_password, bcrypt::DEFAULT_COST).map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to hash password: {}", e),
            )
        })?;

    account_repo
        .update_password(&account.username, hashed_password)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to update password: {}", e),
            )
        })?;

    let response = ChangePasswordResponse {
        message: "Password has been changed successfully".to_string(),
    };

    Ok((StatusCode::OK, Json(response)))
}
