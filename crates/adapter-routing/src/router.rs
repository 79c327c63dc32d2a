//! Vendor adapter registry and service resolution.

use adapter_core::{AdapterError, AdapterResult, VendorAdapter};
use dashmap::DashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Resolves logical services to vendor adapters.
///
/// Holds two maps: vendor id → adapter, and service id → vendor id. A service
/// mapping can only point at a vendor that is already registered, and removing
/// a vendor removes every mapping that pointed at it.
#[derive(Default)]
pub struct RequestRouter {
    adapters: DashMap<String, Arc<dyn VendorAdapter>>,
    services: DashMap<String, String>,
}

impl RequestRouter {
    /// Create an empty router.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a vendor adapter under its own id.
    ///
    /// Re-registering replaces the previous adapter; existing service
    /// mappings keep pointing at the vendor id.
    pub fn register_vendor(&self, adapter: Arc<dyn VendorAdapter>) {
        let vendor_id = adapter.vendor_id().to_string();
        info!(vendor = %vendor_id, category = %adapter.category(), "vendor adapter registered");
        self.adapters.insert(vendor_id, adapter);
    }

    /// Map a logical service onto a registered vendor.
    pub fn register_service_mapping(
        &self,
        service_id: impl Into<String>,
        vendor_id: impl Into<String>,
    ) -> AdapterResult<()> {
        let service_id = service_id.into();
        let vendor_id = vendor_id.into();
        if !self.adapters.contains_key(&vendor_id) {
            return Err(AdapterError::validation(format!(
                "cannot map service '{service_id}': vendor '{vendor_id}' is not registered"
            )));
        }
        debug!(service = %service_id, vendor = %vendor_id, "service mapping registered");
        self.services.insert(service_id, vendor_id);
        Ok(())
    }

    /// Resolve a service id to its vendor adapter.
    pub fn resolve(&self, service_id: &str) -> AdapterResult<Arc<dyn VendorAdapter>> {
        let vendor_id = self
            .services
            .get(service_id)
            .map(|v| v.clone())
            .ok_or_else(|| AdapterError::service_not_found(service_id))?;
        self.adapters
            .get(&vendor_id)
            .map(|a| Arc::clone(&a))
            .ok_or_else(|| AdapterError::service_not_found(service_id))
    }

    /// The vendor id a service currently maps to, if any.
    #[must_use]
    pub fn vendor_for_service(&self, service_id: &str) -> Option<String> {
        self.services.get(service_id).map(|v| v.clone())
    }

    /// Look up a registered adapter by vendor id.
    #[must_use]
    pub fn get(&self, vendor_id: &str) -> Option<Arc<dyn VendorAdapter>> {
        self.adapters.get(vendor_id).map(|a| Arc::clone(&a))
    }

    /// Remove a vendor and every service mapping pointing at it.
    pub fn remove_vendor(&self, vendor_id: &str) -> Option<Arc<dyn VendorAdapter>> {
        let removed = self.adapters.remove(vendor_id).map(|(_, a)| a);
        if removed.is_some() {
            self.services.retain(|_, mapped| mapped != vendor_id);
            info!(vendor = %vendor_id, "vendor adapter removed");
        }
        removed
    }

    /// Ids of every registered vendor.
    #[must_use]
    pub fn list_vendors(&self) -> Vec<String> {
        self.adapters.iter().map(|e| e.key().clone()).collect()
    }
}
