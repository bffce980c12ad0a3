use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use contracts::domain::a003_employee::aggregate::Employee;
use contracts::system::auth::TokenClaims;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;

use crate::shared::config::AuthConfig;

/// Token signing secret and lifetimes
#[derive(Clone)]
pub struct AuthSettings {
    secret: String,
    pub access_token_hours: i64,
    pub refresh_token_days: i64,
}

impl std::fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSettings")
            .field("secret", &"***")
            .field("access_token_hours", &self.access_token_hours)
            .field("refresh_token_days", &self.refresh_token_days)
            .finish()
    }
}

impl AuthSettings {
    pub fn from_config(config: &AuthConfig) -> Self {
        let secret = match config.jwt_secret.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => {
                tracing::info!("No jwt_secret configured, generated a random one");
                generate_jwt_secret()
            }
        };
        Self {
            secret,
            access_token_hours: config.access_token_hours,
            refresh_token_days: config.refresh_token_days,
        }
    }
}

/// Generate JWT access token for an employee
pub fn generate_access_token(settings: &AuthSettings, employee: &Employee) -> Result<String> {
    let now = Utc::now();
    let exp = (now + chrono::Duration::hours(settings.access_token_hours)).timestamp() as usize;
    let iat = now.timestamp() as usize;

    let claims = TokenClaims {
        sub: employee.to_string_id(),
        name: employee.base.description.clone(),
        email: employee.email.clone(),
        role: employee.role,
        exp,
        iat,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(settings.secret.as_bytes()),
    )
    .context("Failed to encode JWT token")
}

/// Validate JWT token and extract claims
pub fn validate_token(settings: &AuthSettings, token: &str) -> Result<TokenClaims> {
    let token_data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(settings.secret.as_bytes()),
        &Validation::default(),
    )
    .context("Failed to decode JWT token")?;

    Ok(token_data.claims)
}

/// Generate refresh token (UUID-based)
pub fn generate_refresh_token() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Refresh token expiration moment
pub fn refresh_token_expiration(settings: &AuthSettings) -> DateTime<Utc> {
    Utc::now() + chrono::Duration::days(settings.refresh_token_days)
}

/// Generate a cryptographically secure JWT secret (256 bits)
fn generate_jwt_secret() -> String {
    use base64::{engine::general_purpose, Engine as _};
    let mut rng = rand::thread_rng();
    let random_bytes: Vec<u8> = (0..32).map(|_| rng.gen::<u8>()).collect();
    general_purpose::STANDARD.encode(&random_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a003_employee::aggregate::EmployeeDto;
    use contracts::enums::Role;

    fn employee() -> Employee {
        Employee::new_for_insert(
            "EMP-0001".into(),
            &EmployeeDto {
                id: None,
                code: None,
                name: "Marta Vidal".into(),
                email: "marta@erp.local".into(),
                phone: None,
                position: None,
                role: Role::Sales,
                is_blocked: false,
                hired_on: None,
                comment: None,
                password: None,
            },
        )
    }

    #[test]
    fn test_token_roundtrip() {
        let settings = AuthSettings::from_config(&AuthConfig::default());
        let e = employee();
        let token = generate_access_token(&settings, &e).unwrap();
        let claims = validate_token(&settings, &token).unwrap();
        assert_eq!(claims.sub, e.to_string_id());
        assert_eq!(claims.role, Role::Sales);
        assert_eq!(claims.email, "marta@erp.local");
    }

    #[test]
    fn test_foreign_secret_is_rejected() {
        let a = AuthSettings::from_config(&AuthConfig::default());
        let b = AuthSettings::from_config(&AuthConfig::default());
        let token = generate_access_token(&a, &employee()).unwrap();
        assert!(validate_token(&b, &token).is_err());
    }

    #[test]
    fn test_configured_secret_is_used() {
        let config = AuthConfig {
            jwt_secret: Some("fixed-secret".into()),
            ..Default::default()
        };
        let a = AuthSettings::from_config(&config);
        let b = AuthSettings::from_config(&config);
        let token = generate_access_token(&a, &employee()).unwrap();
        assert!(validate_token(&b, &token).is_ok());
    }
}
