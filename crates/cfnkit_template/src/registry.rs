//! Typed queries over the heterogeneous resource mapping.
//!
//! Entries already holding the requested kind are returned as-is. Raw entries
//! carrying the requested discriminator are decoded on demand.

use indexmap::IndexMap;
use tracing::debug;

use crate::error::{LookupFailure, TemplateError, TemplateResult};
use crate::resource::{ResourceEntry, ResourceKind};
use crate::template::Template;

impl Template {
    /// Every resource of kind `K`, keyed by logical name, in template order.
    ///
    /// Entries of kind `K` whose properties fail to decode are skipped.
    pub fn all_of_kind<K: ResourceKind>(&self) -> IndexMap<String, K> {
        let mut results = IndexMap::new();
        for (name, entry) in &self.resources {
            match decode_entry::<K>(entry) {
                Ok(resource) => {
                    results.insert(name.clone(), resource);
                }
                Err(LookupFailure::Malformed(message)) => {
                    debug!("Skipping malformed {} resource {}: {}", K::KIND, name, message);
                }
                Err(_) => {}
            }
        }
        results
    }

    /// The resource named `name`, as kind `K`.
    ///
    /// Absence, a different kind and undecodable properties all fail with
    /// [`TemplateError::ResourceNotFound`]; the `reason` tells them apart.
    pub fn by_name<K: ResourceKind>(&self, name: &str) -> TemplateResult<K> {
        let entry = self.resources.get(name).ok_or(LookupFailure::Absent);
        entry
            .and_then(decode_entry::<K>)
            .map_err(|reason| TemplateError::ResourceNotFound {
                name: name.to_string(),
                kind: K::KIND.to_string(),
                reason,
            })
    }
}

fn decode_entry<K: ResourceKind>(entry: &ResourceEntry) -> Result<K, LookupFailure> {
    match entry {
        ResourceEntry::Typed(typed) => {
            let resource = typed.resource();
            if let Some(exact) = resource.as_any().downcast_ref::<K>() {
                return Ok(exact.clone());
            }
            if resource.kind() != K::KIND {
                return Err(LookupFailure::KindMismatch {
                    found: Some(resource.kind().to_string()),
                });
            }
            // Same discriminator, different Rust type: go through the envelope.
            let envelope = typed
                .to_envelope()
                .map_err(|e| LookupFailure::Malformed(e.to_string()))?;
            K::from_envelope(&envelope).map_err(|e| LookupFailure::Malformed(e.to_string()))
        }
        ResourceEntry::Raw(raw) => {
            if raw.kind() != Some(K::KIND) {
                return Err(LookupFailure::KindMismatch {
                    found: raw.kind().map(str::to_string),
                });
            }
            K::from_envelope(&raw.to_value()).map_err(|e| LookupFailure::Malformed(e.to_string()))
        }
    }
}
