//! JWT claims of the signed-in user and their request extractor.

use std::future::{Ready, ready};

use actix_identity::IdentityExt;
use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::domain::types::{TenantId, TypeConstraintError};
use crate::models::config::ServerConfig;

/// Claim set issued by the external auth service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub sub: String,
    pub email: String,
    pub tenant_id: i32,
    pub name: String,
    pub roles: Vec<String>,
    pub exp: usize,
}

impl AuthenticatedUser {
    pub fn tenant(&self) -> Result<TenantId, TypeConstraintError> {
        TenantId::new(self.tenant_id)
    }

    /// Moves the expiry `days` into the future.
    pub fn set_expiration(&mut self, days: i64) {
        let expiration = Utc::now() + Duration::days(days);
        self.exp = expiration.timestamp().max(0) as usize;
    }

    pub fn to_jwt(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        encode(
            &Header::new(Algorithm::HS256),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    pub fn from_jwt(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map(|data| data.claims)
    }
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(config) = req.app_data::<web::Data<ServerConfig>>() else {
            log::error!("Server config is not registered");
            return ready(Err(actix_web::error::ErrorInternalServerError(
                "server config missing",
            )));
        };

        let token = req
            .get_identity()
            .ok()
            .and_then(|identity| identity.id().ok())
            .or_else(|| bearer_token(req));

        let Some(token) = token else {
            return ready(Err(actix_web::error::ErrorUnauthorized("missing token")));
        };

        let result = Self::from_jwt(&token, &config.secret).map_err(|err| {
            log::warn!("Rejected token: {err}");
            actix_web::error::ErrorUnauthorized("invalid token")
        });
        ready(result)
    }
}
