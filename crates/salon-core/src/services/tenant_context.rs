//! Tenant resolution for incoming calls

use salon_shared::config::TenantSettings;
use tracing::debug;

use crate::domain::TenantId;
use crate::error::DomainError;

/// Turns the caller's authenticated salon into a [`TenantId`].
///
/// Built once from configuration. Falling back to a default salon is opt-in:
/// without `allow_default_fallback` an anonymous call is a missing tenant.
#[derive(Debug, Clone, Copy, Default)]
pub struct TenantResolver {
    fallback: Option<TenantId>,
}

impl TenantResolver {
    pub fn new(fallback: Option<TenantId>) -> Self {
        Self { fallback }
    }

    /// Resolver that never falls back.
    pub fn strict() -> Self {
        Self::default()
    }

    pub fn from_settings(settings: &TenantSettings) -> Result<Self, DomainError> {
        if !settings.allow_default_fallback {
            return Ok(Self::strict());
        }
        let fallback = settings
            .default_salon_id
            .filter(|id| *id > 0)
            .ok_or_else(|| {
                DomainError::ValidationError(
                    "tenant.default_salon_id must be a positive id when the default fallback is allowed".into(),
                )
            })?;
        Ok(Self::new(Some(TenantId::new(fallback)?)))
    }

    pub fn fallback(&self) -> Option<TenantId> {
        self.fallback
    }

    pub fn resolve(&self, authenticated: Option<i64>) -> Result<TenantId, DomainError> {
        if let Some(tenant) = authenticated.and_then(|raw| TenantId::new(raw).ok()) {
            return Ok(tenant);
        }
        match self.fallback {
            Some(tenant) => {
                debug!(%tenant, "No authenticated salon, using configured default");
                Ok(tenant)
            }
            None => Err(DomainError::MissingTenant),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authenticated_tenant_wins() {
        let resolver = TenantResolver::new(Some(TenantId::new(1).unwrap()));
        assert_eq!(resolver.resolve(Some(5)).unwrap().get(), 5);
    }

    #[test]
    fn test_strict_resolver_rejects_anonymous() {
        let resolver = TenantResolver::strict();
        assert!(matches!(resolver.resolve(None), Err(DomainError::MissingTenant)));
        assert!(matches!(resolver.resolve(Some(0)), Err(DomainError::MissingTenant)));
    }

    #[test]
    fn test_fallback_is_opt_in() {
        let settings = TenantSettings {
            default_salon_id: Some(3),
            allow_default_fallback: false,
        };
        let resolver = TenantResolver::from_settings(&settings).unwrap();
        assert!(resolver.resolve(None).is_err());

        let settings = TenantSettings {
            allow_default_fallback: true,
            ..settings
        };
        let resolver = TenantResolver::from_settings(&settings).unwrap();
        assert_eq!(resolver.resolve(None).unwrap().get(), 3);
        assert_eq!(resolver.resolve(Some(0)).unwrap().get(), 3);
    }

    #[test]
    fn test_fallback_without_default_is_misconfigured() {
        let settings = TenantSettings {
            default_salon_id: None,
            allow_default_fallback: true,
        };
        assert!(matches!(
            TenantResolver::from_settings(&settings),
            Err(DomainError::ValidationError(_))
        ));
    }
}
