//! Reserved service labels
//!
//! Labels recognized by the scanner and the configuration builder. Anything
//! else on a service is informational and only participates in the
//! fingerprint.

/// Services carrying this label are not proxy targets and are skipped entirely.
pub const EXCLUDE_LABEL: &str = "no_lb_proxy";

/// JSON object with `virtualservice` and/or `pool` scoped partial override
/// trees, merged onto the built configuration.
pub const PROXY_OVERRIDE_LABEL: &str = "lb_proxy";

/// Replaces the default SSL certificate name.
pub const SSL_CERT_LABEL: &str = "lb_ssl_cert";

/// Replaces the resolved cloud reference.
pub const CLOUD_LABEL: &str = "lb_cloud";

/// Replaces the derived FQDN.
pub const FQDN_LABEL: &str = "lb_fqdn";

/// Replaces the derived application profile by name.
pub const APP_PROFILE_LABEL: &str = "lb_app_profile";

/// Scope key for virtual-service level overrides inside [`PROXY_OVERRIDE_LABEL`].
pub const OVERRIDE_SCOPE_VS: &str = "virtualservice";

/// Scope key for pool level overrides inside [`PROXY_OVERRIDE_LABEL`].
pub const OVERRIDE_SCOPE_POOL: &str = "pool";
