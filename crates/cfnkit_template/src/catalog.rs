//! Kind catalogue: discriminator to decoder lookup.

use std::collections::HashMap;

use tracing::debug;

use crate::error::TemplateResult;
use crate::resource::{AnyResource, RawResource, ResourceEntry, ResourceKind, TypedResource};
use crate::template::Template;

type Decoder = fn(&serde_json::Value) -> TemplateResult<Box<dyn AnyResource>>;

fn decode_boxed<K: ResourceKind>(envelope: &serde_json::Value) -> TemplateResult<Box<dyn AnyResource>> {
    Ok(Box::new(K::from_envelope(envelope)?))
}

/// A registry of resource kinds that can be decoded from raw envelopes.
///
/// Kinds are registered by catalogue crates; the template engine never names
/// a kind itself. Registering the same identifier twice replaces the decoder.
pub struct KindCatalog {
    decoders: HashMap<&'static str, Decoder>,
}

impl KindCatalog {
    /// Create an empty catalogue.
    pub fn new() -> Self {
        Self {
            decoders: HashMap::new(),
        }
    }

    /// Register a kind under its identifier.
    pub fn register<K: ResourceKind>(&mut self) -> &mut Self {
        debug!("Registering resource kind: {}", K::KIND);
        self.decoders.insert(K::KIND, decode_boxed::<K>);
        self
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.decoders.contains_key(kind)
    }

    /// Registered identifiers, sorted.
    pub fn kinds(&self) -> Vec<&'static str> {
        let mut kinds: Vec<_> = self.decoders.keys().copied().collect();
        kinds.sort_unstable();
        kinds
    }

    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }

    /// Decode an envelope into its typed kind.
    ///
    /// Returns `None` when the discriminator is missing or not registered.
    pub fn decode(&self, envelope: &serde_json::Value) -> Option<TemplateResult<Box<dyn AnyResource>>> {
        let kind = envelope.get("Type")?.as_str()?;
        let decoder = self.decoders.get(kind)?;
        Some(decoder(envelope))
    }

    /// Type a raw entry without losing any of it.
    ///
    /// `Ok(None)` when the kind is not catalogued, or when its typed form
    /// would not reproduce the entry exactly. Decode failures are errors.
    pub fn upgrade(&self, raw: &RawResource) -> TemplateResult<Option<TypedResource>> {
        match self.decode(&raw.to_value()) {
            Some(decoded) => TypedResource::from_raw(decoded?, raw),
            None => Ok(None),
        }
    }
}

impl std::fmt::Debug for KindCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KindCatalog")
            .field("kinds", &self.kinds())
            .finish()
    }
}

impl Template {
    /// Replace every raw entry of a catalogued kind with its typed form.
    ///
    /// Entries that fail to decode, or that the typed form cannot reproduce,
    /// stay raw. Returns the number of entries upgraded.
    pub fn upgrade_with(&mut self, catalog: &KindCatalog) -> usize {
        let mut upgraded = 0;
        for (name, entry) in self.resources.iter_mut() {
            let ResourceEntry::Raw(raw) = entry else {
                continue;
            };
            match catalog.upgrade(raw) {
                Ok(Some(typed)) => {
                    *entry = ResourceEntry::Typed(typed);
                    upgraded += 1;
                }
                Ok(None) => {
                    if raw.kind().is_some_and(|kind| catalog.contains(kind)) {
                        debug!("Leaving {} raw: typed form would not reproduce it", name);
                    }
                }
                Err(e) => debug!("Leaving {} raw: {}", name, e),
            }
        }
        upgraded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "PascalCase", default)]
    struct Queue {
        #[serde(skip_serializing_if = "Option::is_none")]
        queue_name: Option<Value>,
    }

    crate::resource_kind!(Queue, "Example::Queue");

    fn catalog() -> KindCatalog {
        let mut catalog = KindCatalog::new();
        catalog.register::<Queue>();
        catalog
    }

    #[test]
    fn test_catalog_register() {
        let catalog = catalog();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.contains("Example::Queue"));
        assert!(!catalog.contains("Example::Topic"));
        assert_eq!(catalog.kinds(), vec!["Example::Queue"]);
    }

    #[test]
    fn test_catalog_decode() {
        let catalog = catalog();

        let decoded = catalog
            .decode(&json!({"Type": "Example::Queue", "Properties": {"QueueName": "jobs"}}))
            .unwrap()
            .unwrap();
        assert_eq!(decoded.kind(), "Example::Queue");
        assert_eq!(
            decoded.as_any().downcast_ref::<Queue>().unwrap().queue_name,
            Some("jobs".into())
        );

        assert!(catalog.decode(&json!({"Type": "Vendor::Thing"})).is_none());
        assert!(catalog.decode(&json!({"Properties": {}})).is_none());
        assert!(catalog
            .decode(&json!({"Type": "Example::Queue", "Properties": []}))
            .unwrap()
            .is_err());
    }

    #[test]
    fn test_upgrade_with() {
        let mut template = Template::new();
        template.resources.insert(
            "Jobs".to_string(),
            ResourceEntry::Raw(RawResource::new("Example::Queue", json!({"QueueName": "jobs"}))),
        );
        template.resources.insert(
            "Broken".to_string(),
            ResourceEntry::Raw(RawResource::new("Example::Queue", json!("oops"))),
        );
        template.resources.insert(
            "Foreign".to_string(),
            ResourceEntry::Raw(RawResource::new("Vendor::Thing", json!({}))),
        );

        assert_eq!(template.upgrade_with(&catalog()), 1);
        assert!(template.resources["Jobs"].is_typed());
        assert!(!template.resources["Broken"].is_typed());
        assert!(!template.resources["Foreign"].is_typed());
    }

    #[test]
    fn test_upgrade_keeps_envelope_intact() {
        let envelope = json!({
            "Type": "Example::Queue",
            "DependsOn": "Key",
            "UpdateReplacePolicy": "Retain",
            "Properties": {"QueueName": "jobs", "KmsMasterKeyId": {"Ref": "Key"}}
        });
        let mut template = Template::new();
        template.resources.insert(
            "Jobs".to_string(),
            ResourceEntry::Raw(RawResource::try_from(envelope.clone()).unwrap()),
        );
        let before: serde_json::Value =
            serde_json::from_slice(&template.render_json().unwrap()).unwrap();

        assert_eq!(template.upgrade_with(&catalog()), 1);
        assert!(template.resources["Jobs"].is_typed());

        let after: serde_json::Value =
            serde_json::from_slice(&template.render_json().unwrap()).unwrap();
        assert_eq!(after, before);
        assert_eq!(after["Resources"]["Jobs"], envelope);
    }

    #[test]
    fn test_upgrade_leaves_lossy_entries_raw() {
        let mut template = Template::new();
        template.resources.insert(
            "Jobs".to_string(),
            ResourceEntry::Raw(RawResource::new(
                "Example::Queue",
                json!({"QueueName": {"Fn::GetAtt": "Key.Arn"}}),
            )),
        );

        assert_eq!(template.upgrade_with(&catalog()), 0);
        assert!(!template.resources["Jobs"].is_typed());
    }
}
