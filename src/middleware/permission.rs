use axum::http::StatusCode;

use crate::utils::jwt::{TokenClaims, UserRole};

pub fn is_instructor(claims: &TokenClaims) -> bool {
    claims.role == UserRole::Instructor
}

pub fn require_instructor(claims: &TokenClaims) -> Result<(), (StatusCode, String)> {
    if is_instructor(claims) {
        Ok(())
    } else {
        Err((
            StatusCode::FORBIDDEN,
            "Instructor role required".to_string(),
        ))
    }
}

/// Students may only access their own records; instructors may access any.
pub fn require_self_or_instructor(
    claims: &TokenClaims,
    student_id: &str,
) -> Result<(), (StatusCode, String)> {
    if is_instructor(claims) || claims.username == student_id {
        Ok(())
    } else {
        Err((
            StatusCode::FORBIDDEN,
            "You can only access your own records".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(username: &str, role: UserRole) -> TokenClaims {
        TokenClaims {
            username: username.to_string(),
            name: username.to_string(),
            role,
            iat: 0,
            exp: i64::MAX,
        }
    }

    #[test]
    fn instructor_passes_both_checks() {
        let instructor = claims("instructor01", UserRole::Instructor);
        assert!(require_instructor(&instructor).is_ok());
        assert!(require_self_or_instructor(&instructor, "SV001").is_ok());
    }

    #[test]
    fn student_is_limited_to_own_records() {
        let student = claims("SV001", UserRole::Student);
        assert!(require_instructor(&student).is_err());
        assert!(require_self_or_instructor(&student, "SV001").is_ok());
        assert!(require_self_or_instructor(&student, "SV002").is_err());
    }
}
