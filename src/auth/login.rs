//! Tenant-scoped login redirect.
//!
//! Shared by the authentication and role gates: redirects always target the
//! login page on a tenant subdomain, never a bare `/login`.

use crate::config::DomainConfig;
use crate::tenant::resolver::{extract_subdomain, tenant_url};

/// Build the login URL for a request.
///
/// Subdomain precedence: explicit route parameter, else derived from the
/// request host against the base domain, else the platform default tenant.
pub fn login_url(
    subdomain_param: Option<&str>,
    host: Option<&str>,
    domain: &DomainConfig,
) -> String {
    let subdomain = subdomain_param
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .or_else(|| host.and_then(|h| extract_subdomain(h, &domain.base_domain)))
        .unwrap_or_else(|| domain.default_tenant.clone());

    tenant_url(domain, &subdomain, "/login")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_param_wins() {
        let domain = DomainConfig::default();
        let url = login_url(Some("alpha"), Some("beta.academy.test"), &domain);
        assert_eq!(url, "https://alpha.academy.test/login");
    }

    #[test]
    fn host_derivation_is_second() {
        let domain = DomainConfig::default();
        let url = login_url(None, Some("beta.academy.test:443"), &domain);
        assert_eq!(url, "https://beta.academy.test/login");
    }

    #[test]
    fn default_tenant_is_the_fallback() {
        let domain = DomainConfig::default();
        let url = login_url(None, Some("academy.test"), &domain);
        assert_eq!(url, "https://itqan-academy.academy.test/login");
        let url = login_url(None, None, &domain);
        assert_eq!(url, "https://itqan-academy.academy.test/login");
    }
}
