//! Process-wide cache namespace.
//!
//! Keys written by a service are scoped by its namespace. Unless a service
//! sets one explicitly, the namespace is read from `SERVICE_NAME` on every
//! derivation.

use std::sync::{Arc, PoisonError, RwLock};

use backbone_config::ServiceConfig;

static NAMESPACE: RwLock<Option<Arc<str>>> = RwLock::new(None);

/// Sets the namespace used by [`derive_key`](crate::derive_key).
///
/// Derivations already in flight keep the namespace they started with.
pub fn set_namespace(namespace: impl Into<Arc<str>>) {
    let mut slot = NAMESPACE.write().unwrap_or_else(PoisonError::into_inner);
    *slot = Some(namespace.into());
}

/// Drops an explicitly set namespace, falling back to `SERVICE_NAME` again.
pub fn reset_namespace() {
    let mut slot = NAMESPACE.write().unwrap_or_else(PoisonError::into_inner);
    *slot = None;
}

/// Snapshot of the current namespace.
///
/// The returned value is taken once and never changes underneath the caller.
pub fn namespace() -> Arc<str> {
    let explicit = NAMESPACE
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone();
    explicit.unwrap_or_else(|| Arc::from(ServiceConfig::from_env().name))
}
