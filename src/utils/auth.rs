use actix_web_httpauth::extractors::bearer::BearerAuth;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::utils::errors::ServiceError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (user id)
    pub exp: usize,  // Expiration time (Unix timestamp)
}

/// The user a request acts on behalf of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: i64,
}

/// Reads the actor from a bearer token issued by the platform's auth service.
///
/// Requests without a token, or deployments without `JWT_SECRET`, have no
/// actor. A token that is present but fails verification is rejected.
pub fn resolve_actor(bearer: Option<&BearerAuth>, config: &AppConfig) -> Result<Option<Actor>, ServiceError> {
    let Some(bearer) = bearer else {
        return Ok(None);
    };

    let Some(secret) = config.jwt_secret.as_deref() else {
        log::debug!("Bearer token ignored: JWT_SECRET is not configured");
        return Ok(None);
    };

    actor_from_token(bearer.token(), secret).map(Some)
}

pub fn actor_from_token(token: &str, secret: &str) -> Result<Actor, ServiceError> {
    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )
    .map_err(|_| ServiceError::Unauthorized("Invalid token".to_string()))?;

    let user_id: i64 = claims
        .claims
        .sub
        .parse()
        .map_err(|_| ServiceError::Unauthorized("Invalid user ID in token".to_string()))?;

    Ok(Actor { user_id })
}
