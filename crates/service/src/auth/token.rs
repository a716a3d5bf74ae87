//! Stateless session tokens: a pure function of (claims, secret, clock).
//!
//! There is no server-side session table and no revocation; a token stops
//! working only once `exp` has passed.

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;

use super::domain::{Claims, SessionToken, TokenUser};
use super::errors::AuthError;

/// Sign a token for `username` valid from `now` for `ttl`.
pub fn issue(username: &str, secret: &[u8], now: DateTime<Utc>, ttl: Duration) -> Result<SessionToken, AuthError> {
    let expires_at = now
        .checked_add_signed(ttl)
        .ok_or_else(|| AuthError::TokenError(format!("token ttl {ttl} overflows the expiry instant")))?;
    let claims = Claims { sub: username.to_string(), iat: now.timestamp(), exp: expires_at.timestamp() };
    let token = encode(&Header::new(Algorithm::HS256), &claims, &EncodingKey::from_secret(secret))
        .map_err(|e| AuthError::TokenError(e.to_string()))?;
    let expires_at = Utc.timestamp_opt(claims.exp, 0).single().unwrap_or(expires_at);
    Ok(SessionToken { token, username: username.to_string(), expires_at })
}

/// Check signature and expiry against `now`. Every failure collapses into
/// [`AuthError::Unauthorized`].
pub fn verify(token: &str, secret: &[u8], now: DateTime<Utc>) -> Result<TokenUser, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    // expiry is checked below against the injected clock, without leeway
    validation.validate_exp = false;
    validation.leeway = 0;

    let data = decode::<Claims>(token, &DecodingKey::from_secret(secret), &validation).map_err(|e| {
        debug!(error = %e, "token rejected");
        AuthError::Unauthorized
    })?;
    let claims = data.claims;
    if now.timestamp() >= claims.exp {
        debug!(sub = %claims.sub, exp = claims.exp, "token expired");
        return Err(AuthError::Unauthorized);
    }
    if claims.sub.is_empty() {
        return Err(AuthError::Unauthorized);
    }
    Ok(TokenUser { username: claims.sub })
}
