//! JWT access token signing and verification, plus opaque refresh token
//! generation. Implements the access token + rotating refresh token pattern.

use crate::{config::AppConfig, error::AppError};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::rngs::OsRng;
use rand::RngCore;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims carried by an access token.
///
/// A fixed struct rather than a claim map, so the shape cannot drift
/// between issuance and verification.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AccessClaims {
    /// Subject (user ID)
    pub sub: String,

    /// Username
    pub username: String,

    /// User roles
    pub roles: Vec<String>,

    /// JWT ID (unique per issued token)
    pub jti: String,

    /// Issued at
    pub iat: i64,

    /// Expiration
    pub exp: i64,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,
}

/// A freshly signed access token together with its expiry.
#[derive(Debug, Clone)]
pub struct SignedAccessToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// JWT service
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    valid_issuer: String,
    valid_audience: String,
    access_token_validity: Duration,
    refresh_token_validity: Duration,
}

impl JwtService {
    /// Create JWT service from config
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let secret = config.jwt.secret.expose_secret();

        // Ensure secret is at least 32 bytes for HS256
        if secret.len() < 32 {
            return Err(AppError::Config("JWT secret too short (min 32 chars)".to_string()));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            valid_issuer: config.jwt.valid_issuer.clone(),
            valid_audience: config.jwt.valid_audience.clone(),
            access_token_validity: Duration::minutes(config.jwt.access_token_minutes as i64),
            refresh_token_validity: Duration::days(config.jwt.refresh_token_days as i64),
        })
    }

    /// Sign a new access token.
    ///
    /// Every call produces a fresh `jti`, so two tokens signed for the same
    /// user in the same second are still distinguishable.
    pub fn sign_access_token(
        &self,
        user_id: &str,
        username: &str,
        roles: Vec<String>,
    ) -> Result<SignedAccessToken, AppError> {
        let now = Utc::now();
        let expires_at = now + self.access_token_validity;

        let claims = AccessClaims {
            sub: user_id.to_string(),
            username: username.to_string(),
            roles,
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            iss: self.valid_issuer.clone(),
            aud: self.valid_audience.clone(),
        };

        let token =
            encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
                tracing::error!("Failed to encode access token: {:?}", e);
                AppError::Internal(format!("Failed to encode access token: {}", e))
            })?;

        Ok(SignedAccessToken { token, expires_at })
    }

    /// Fully validate an access token: signature, HS256 algorithm, expiry,
    /// issuer and audience. This is what the auth middleware runs on every
    /// protected request.
    pub fn verify_live(&self, token: &str) -> Result<AccessClaims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.valid_issuer]);
        validation.set_audience(&[&self.valid_audience]);

        Ok(decode::<AccessClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| {
                tracing::debug!("Access token validation failed: {:?}", e);
                AppError::Unauthorized
            })?
            .claims)
    }

    /// Validate signature and algorithm only, accepting an expired token.
    ///
    /// This relaxed mode exists solely for the refresh flow: a just-expired
    /// access token must still be provably authentic before its claims can
    /// be trusted to mint a replacement. A separate function, not a flag,
    /// so normal call sites cannot reach it by accident. Signature
    /// mismatch, malformed structure and a non-HS256 algorithm all collapse
    /// into the same uniform error.
    pub fn verify_for_refresh(&self, token: &str) -> Result<AccessClaims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_aud = false;

        Ok(decode::<AccessClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| {
                tracing::debug!("Refresh-mode token validation failed: {:?}", e);
                AppError::InvalidToken
            })?
            .claims)
    }

    /// Generate an opaque refresh token and its expiry.
    ///
    /// 64 bytes (512 bits) from the OS RNG, base64 encoded. Carries no
    /// claims: leaking it reveals nothing about the account.
    pub fn generate_refresh_token(&self) -> (String, DateTime<Utc>) {
        let mut bytes = [0u8; 64];
        OsRng.fill_bytes(&mut bytes);

        (BASE64.encode(bytes), Utc::now() + self.refresh_token_validity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        DatabaseConfig, JwtConfig, LoggingConfig, SecurityConfig, ServerConfig, StorageConfig,
    };
    use base64::Engine as _;
    use secrecy::Secret;

    fn test_config() -> AppConfig {
        AppConfig {
            server: ServerConfig {
                addr: "127.0.0.1:3000".to_string(),
                graceful_shutdown_timeout_secs: 30,
            },
            database: DatabaseConfig {
                url: Secret::new("postgresql://localhost/test".to_string()),
                max_connections: 10,
                min_connections: 1,
                acquire_timeout_secs: 30,
                idle_timeout_secs: 600,
                max_lifetime_secs: 1800,
            },
            logging: LoggingConfig { level: "info".to_string(), format: "json".to_string() },
            jwt: JwtConfig {
                secret: Secret::new("test_secret_key_32_characters_long!".to_string()),
                valid_issuer: "rent-system".to_string(),
                valid_audience: "rent-clients".to_string(),
                access_token_minutes: 15,
                refresh_token_days: 7,
            },
            security: SecurityConfig {
                password_min_length: 8,
                password_require_uppercase: true,
                password_require_digit: true,
                password_require_special: false,
            },
            storage: StorageConfig {
                base_path: "/tmp/rent-system-test".to_string(),
                public_base_url: "http://localhost:3000/photos".to_string(),
            },
        }
    }

    #[test]
    fn test_sign_and_verify_access_token() {
        let service = JwtService::from_config(&test_config()).unwrap();
        let user_id = Uuid::new_v4().to_string();

        let signed = service
            .sign_access_token(&user_id, "testuser", vec!["Landlord".to_string()])
            .unwrap();

        let claims = service.verify_live(&signed.token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.username, "testuser");
        assert!(claims.roles.contains(&"Landlord".to_string()));
        assert_eq!(claims.iss, "rent-system");
        assert_eq!(claims.aud, "rent-clients");
        assert_eq!(claims.exp, signed.expires_at.timestamp());
    }

    #[test]
    fn test_secret_too_short() {
        let mut config = test_config();
        config.jwt.secret = Secret::new("short".to_string());

        assert!(JwtService::from_config(&config).is_err());
    }

    #[test]
    fn test_jti_is_fresh_per_sign() {
        let service = JwtService::from_config(&test_config()).unwrap();

        let a = service.sign_access_token("1", "testuser", vec![]).unwrap();
        let b = service.sign_access_token("1", "testuser", vec![]).unwrap();

        let claims_a = service.verify_live(&a.token).unwrap();
        let claims_b = service.verify_live(&b.token).unwrap();
        assert_ne!(claims_a.jti, claims_b.jti);
    }

    #[test]
    fn test_verify_for_refresh_accepts_expired_token() {
        let mut config = test_config();
        config.jwt.access_token_minutes = 15;
        let service = JwtService::from_config(&config).unwrap();

        // 手工构造一个已过期的令牌
        let now = Utc::now();
        let claims = AccessClaims {
            sub: "1".to_string(),
            username: "testuser".to_string(),
            roles: vec![],
            jti: Uuid::new_v4().to_string(),
            iat: (now - Duration::hours(2)).timestamp(),
            exp: (now - Duration::hours(1)).timestamp(),
            iss: "rent-system".to_string(),
            aud: "rent-clients".to_string(),
        };
        let token =
            encode(&Header::new(Algorithm::HS256), &claims, &service.encoding_key).unwrap();

        // 常规校验拒绝过期令牌
        assert!(service.verify_live(&token).is_err());

        // 刷新模式校验只看签名
        let recovered = service.verify_for_refresh(&token).unwrap();
        assert_eq!(recovered.username, "testuser");
    }

    #[test]
    fn test_tampered_signature_rejected_in_both_modes() {
        let service = JwtService::from_config(&test_config()).unwrap();
        let signed = service.sign_access_token("1", "testuser", vec![]).unwrap();

        // 翻转签名段最后一个字符
        let mut tampered = signed.token.clone();
        let last = tampered.pop().unwrap();
        tampered.push(if last == 'A' { 'B' } else { 'A' });

        assert!(service.verify_live(&tampered).is_err());
        assert!(service.verify_for_refresh(&tampered).is_err());
    }

    #[test]
    fn test_wrong_algorithm_rejected() {
        let service = JwtService::from_config(&test_config()).unwrap();

        let now = Utc::now();
        let claims = AccessClaims {
            sub: "1".to_string(),
            username: "testuser".to_string(),
            roles: vec![],
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(15)).timestamp(),
            iss: "rent-system".to_string(),
            aud: "rent-clients".to_string(),
        };

        // 同一密钥但 HS512 签名，两种校验都必须拒绝
        let token =
            encode(&Header::new(Algorithm::HS512), &claims, &service.encoding_key).unwrap();

        assert!(service.verify_live(&token).is_err());
        assert!(service.verify_for_refresh(&token).is_err());
    }

    #[test]
    fn test_garbage_token_rejected_not_panicking() {
        let service = JwtService::from_config(&test_config()).unwrap();

        assert!(service.verify_live("not-a-token").is_err());
        assert!(service.verify_for_refresh("not-a-token").is_err());
        assert!(service.verify_for_refresh("a.b.c").is_err());
        assert!(service.verify_for_refresh("").is_err());
    }

    #[test]
    fn test_refresh_tokens_are_unique_and_opaque() {
        let service = JwtService::from_config(&test_config()).unwrap();

        let (token_a, expires_a) = service.generate_refresh_token();
        let (token_b, _) = service.generate_refresh_token();

        assert_ne!(token_a, token_b);
        assert!(expires_a > Utc::now());

        // 64 字节 base64 编码后的长度
        assert_eq!(BASE64.decode(&token_a).unwrap().len(), 64);
    }
}
