use anyhow::Result;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Student,
    Instructor,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub username: String,
    pub name: String,
    pub role: UserRole,
    pub iat: i64,
    pub exp: i64,
}

pub struct JwtManager {
    secret: String,
}

impl JwtManager {
    pub fn new(secret: String) -> Self {
        Self { secret }
    }

    pub fn create_jwt(
        &self,
        username: &str,
        name: &str,
        role: UserRole,
        expires_in: i64,
    ) -> Result<String> {
        let now = chrono::Utc::now().timestamp();
        let claims = TokenClaims {
            username: username.to_string(),
            name: name.to_string(),
            role,
            iat: now,
            exp: now + expires_in,
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;
        Ok(token)
    }

    pub fn verify_jwt(&self, token: &str) -> Result<TokenClaims> {
        let data = decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_claims() {
        let manager = JwtManager::new("test-secret".to_string());
        let token = manager
            .create_jwt("SV001", "Nguyen Van A", UserRole::Student, 3600)
            .unwrap();

        let claims = manager.verify_jwt(&token).unwrap();
        assert_eq!(claims.username, "SV001");
        assert_eq!(claims.name, "Nguyen Van A");
        assert_eq!(claims.role, UserRole::Student);
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let manager = JwtManager::new("test-secret".to_string());
        let other = JwtManager::new("other-secret".to_string());
        let token = other
            .create_jwt("SV001", "Nguyen Van A", UserRole::Student, 3600)
            .unwrap();

        assert!(manager.verify_jwt(&token).is_err());
    }

    #[test]
    fn rejects_expired_token() {
        let manager = JwtManager::new("test-secret".to_string());
        let token = manager
            .create_jwt("SV001", "Nguyen Van A", UserRole::Student, -3600)
            .unwrap();

        assert!(manager.verify_jwt(&token).is_err());
    }
}
