//! Shared test utilities

use std::collections::HashMap;

use async_trait::async_trait;
use jkds_utility::store::{LookupError, VersionLookup};

/// Lookup answering from a fixed table; unknown apps are not found
#[derive(Default)]
pub struct StubLookup {
    versions: HashMap<String, String>,
}

impl StubLookup {
    pub fn with_version(mut self, app_id: &str, version: &str) -> Self {
        self.versions.insert(app_id.to_string(), version.to_string());
        self
    }
}

#[async_trait]
impl VersionLookup for StubLookup {
    async fn lookup_version(&self, app_id: &str) -> Result<String, LookupError> {
        self.versions
            .get(app_id)
            .cloned()
            .ok_or_else(|| LookupError::NotFound(app_id.to_string()))
    }
}
