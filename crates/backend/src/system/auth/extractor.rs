use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use contracts::enums::{Access, Section};
use contracts::system::auth::TokenClaims;

use crate::shared::activity_log::Actor;
use crate::shared::error::{ErpError, ErpResult};

/// Extractor for getting current user from JWT token
/// Usage in handlers: `async fn handler(user: CurrentUser) -> Response`
pub struct CurrentUser(pub TokenClaims);

impl CurrentUser {
    /// Check the role table and return the actor for the operation
    pub fn require(&self, section: Section, access: Access) -> ErpResult<Actor> {
        if !self.0.role.can(section, access) {
            tracing::warn!(
                "Access denied: {} ({}) needs {:?} on {:?}",
                self.0.email,
                self.0.role.code(),
                access,
                section
            );
            return Err(ErpError::Forbidden);
        }
        Ok(Actor::from(&self.0))
    }

    pub fn actor(&self) -> Actor {
        Actor::from(&self.0)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ErpError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Extract TokenClaims from request extensions (set by middleware)
        parts
            .extensions
            .get::<TokenClaims>()
            .cloned()
            .map(CurrentUser)
            .ok_or(ErpError::Unauthorized)
    }
}
