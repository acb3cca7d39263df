use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::api::constants::{GENERATED_SECRET_LENGTH, TOKEN_ISSUER, TOKEN_SUBJECT};
use crate::errors::Result;
use crate::storage::Database;

/// Time source used for issuing and checking tokens
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Session Token Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub iss: String,
    pub sub: String,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
    pub jti: String,
}

/// JWT Service for generating and validating session tokens
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    session_minutes: u64,
    clock: Clock,
}

impl JwtService {
    pub fn new(secret: &str, session_minutes: u64) -> Self {
        Self::with_clock(secret, session_minutes, Arc::new(Utc::now))
    }

    /// Same as [`JwtService::new`] with an explicit time source, so expiry
    /// can be tested without waiting.
    pub fn with_clock(secret: &str, session_minutes: u64, clock: Clock) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            session_minutes,
            clock,
        }
    }

    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    /// Lifetime of a session issued by [`JwtService::generate_session_token`]
    pub fn login_duration(&self) -> Duration {
        Duration::minutes(self.session_minutes as i64)
    }

    pub fn generate_token(&self, duration: Duration) -> Result<String> {
        let now = self.now();
        let claims = SessionClaims {
            iss: TOKEN_ISSUER.to_string(),
            sub: TOKEN_SUBJECT.to_string(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: (now + duration).timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
        };

        Ok(encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.encoding_key,
        )?)
    }

    pub fn generate_session_token(&self) -> Result<String> {
        self.generate_token(self.login_duration())
    }

    /// Validate a session token against the signing key, the issuer and the
    /// service clock (`nbf <= now < exp`).
    pub fn validate_token(&self, token: &str) -> Option<SessionClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        // 时间由 self.clock 检查
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.set_issuer(&[TOKEN_ISSUER]);

        let claims = match decode::<SessionClaims>(token, &self.decoding_key, &validation) {
            Ok(data) => data.claims,
            Err(e) => {
                debug!("Rejected session token: {}", e);
                return None;
            }
        };

        let now = self.now().timestamp();
        if claims.sub != TOKEN_SUBJECT || claims.nbf > now || claims.exp <= now {
            debug!(
                "Rejected session token: sub={}, nbf={}, exp={}, now={}",
                claims.sub, claims.nbf, claims.exp, now
            );
            return None;
        }

        Some(claims)
    }
}

/// Build the service with the signing secret from, in order: configuration,
/// the store, or a freshly generated one that is then persisted.
pub async fn load_jwt_service(
    db: &Database,
    configured_secret: Option<&str>,
    session_minutes: u64,
) -> Result<JwtService> {
    if let Some(secret) = configured_secret.filter(|s| !s.is_empty()) {
        debug!("Using JWT secret from configuration");
        return Ok(JwtService::new(secret, session_minutes));
    }

    if let Some(secret) = db.get_jwt_secret().await? {
        debug!("Using JWT secret from store");
        return Ok(JwtService::new(&secret, session_minutes));
    }

    warn!("JWT secret not configured, generating secure random token");
    let secret = crate::utils::generate_secure_token(GENERATED_SECRET_LENGTH);
    db.set_jwt_secret(&secret).await?;
    info!("Generated JWT secret has been saved to the store");
    Ok(JwtService::new(&secret, session_minutes))
}
