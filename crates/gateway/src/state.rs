use std::sync::Arc;

use crate::resolver::RequestResolver;

/// Shared gateway runtime state, wrapped in Arc for use across handlers.
pub struct GatewayState {
    pub resolver: RequestResolver,
    /// Server version string.
    pub version: String,
}

impl GatewayState {
    pub fn new(resolver: RequestResolver) -> Arc<Self> {
        Arc::new(Self {
            resolver,
            version: env!("CARGO_PKG_VERSION").to_string(),
        })
    }
}
