//! Resource kinds and the `{Type, Properties}` envelope codec.
//!
//! Concrete kinds live outside this crate. A kind is any serde struct that
//! implements [`ResourceKind`]; the template engine only ever sees it through
//! the object-safe [`AnyResource`] view, so new kinds plug in without any
//! change here.

use std::any::Any;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::trace;

use crate::error::{TemplateError, TemplateResult};
use crate::value::Tag;

/// Optional capability: a kind exposing an ordered, appendable tag list.
pub trait HasTags {
    fn tags_mut(&mut self) -> &mut Vec<Tag>;
}

/// A strongly typed resource kind.
///
/// Implementors serialize to their bare property set (omitting empty fields);
/// the envelope is added by [`ResourceKind::to_envelope`].
pub trait ResourceKind:
    Serialize + DeserializeOwned + Clone + Default + fmt::Debug + 'static
{
    /// Provider type identifier, e.g. `AWS::EC2::VPC`.
    const KIND: &'static str;

    /// The tagging capability, for kinds that carry a `Tags` list.
    fn as_tagged(&mut self) -> Option<&mut dyn HasTags> {
        None
    }

    fn to_envelope(&self) -> TemplateResult<serde_json::Value> {
        encode_envelope(Self::KIND, self)
    }

    fn from_envelope(envelope: &serde_json::Value) -> TemplateResult<Self> {
        match envelope {
            serde_json::Value::Object(map) => decode_properties(map.get("Properties")),
            other => Err(TemplateError::Decode {
                kind: Self::KIND.to_string(),
                message: format!("expected a resource object, got {}", other),
            }),
        }
    }
}

/// Builds `{"Type": kind, "Properties": {...}}` from a serializable property set.
pub fn encode_envelope<P: Serialize + ?Sized>(
    kind: &str,
    properties: &P,
) -> TemplateResult<serde_json::Value> {
    let properties = serde_json::to_value(properties)
        .map_err(|e| TemplateError::Serialization(format!("{}: {}", kind, e)))?;

    let mut envelope = serde_json::Map::new();
    envelope.insert("Type".to_string(), serde_json::Value::String(kind.to_string()));
    envelope.insert("Properties".to_string(), properties);
    Ok(serde_json::Value::Object(envelope))
}

/// Decodes the `Properties` part of an envelope into a kind.
///
/// Absent or `null` properties yield the zero-valued kind.
pub fn decode_properties<K: ResourceKind>(
    properties: Option<&serde_json::Value>,
) -> TemplateResult<K> {
    match properties {
        None | Some(serde_json::Value::Null) => Ok(K::default()),
        Some(properties) => K::deserialize(properties).map_err(|e| TemplateError::Decode {
            kind: K::KIND.to_string(),
            message: e.to_string(),
        }),
    }
}

/// Object-safe view of any [`ResourceKind`].
pub trait AnyResource: fmt::Debug {
    fn kind(&self) -> &'static str;
    fn encode(&self) -> TemplateResult<serde_json::Value>;
    fn tagged_mut(&mut self) -> Option<&mut dyn HasTags>;
    fn as_any(&self) -> &dyn Any;
    fn clone_box(&self) -> Box<dyn AnyResource>;
}

impl<K: ResourceKind> AnyResource for K {
    fn kind(&self) -> &'static str {
        K::KIND
    }

    fn encode(&self) -> TemplateResult<serde_json::Value> {
        self.to_envelope()
    }

    fn tagged_mut(&mut self) -> Option<&mut dyn HasTags> {
        self.as_tagged()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn clone_box(&self) -> Box<dyn AnyResource> {
        Box::new(self.clone())
    }
}

impl Clone for Box<dyn AnyResource> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Declares a [`ResourceKind`] for a serde struct.
///
/// ```rust,ignore
/// resource_kind!(Ec2Vpc, "AWS::EC2::VPC", tags);   // `tags: Vec<Tag>` is auto-tagged
/// resource_kind!(IamRole, "AWS::IAM::Role");
/// ```
#[macro_export]
macro_rules! resource_kind {
    ($ty:ty, $kind:literal) => {
        impl $crate::ResourceKind for $ty {
            const KIND: &'static str = $kind;
        }
    };
    ($ty:ty, $kind:literal, $tags:ident) => {
        impl $crate::ResourceKind for $ty {
            const KIND: &'static str = $kind;

            fn as_tagged(&mut self) -> Option<&mut dyn $crate::HasTags> {
                Some(self)
            }
        }

        impl $crate::HasTags for $ty {
            fn tags_mut(&mut self) -> &mut Vec<$crate::Tag> {
                &mut self.$tags
            }
        }
    };
}

/// An untyped resource as found in a parsed or hand-authored template.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawResource {
    body: serde_json::Map<String, serde_json::Value>,
}

impl RawResource {
    pub fn new(kind: impl Into<String>, properties: serde_json::Value) -> Self {
        let mut body = serde_json::Map::new();
        body.insert("Type".to_string(), serde_json::Value::String(kind.into()));
        body.insert("Properties".to_string(), properties);
        Self { body }
    }

    /// The `Type` discriminator, if present and a string.
    pub fn kind(&self) -> Option<&str> {
        self.body.get("Type").and_then(|t| t.as_str())
    }

    pub fn properties(&self) -> Option<&serde_json::Value> {
        self.body.get("Properties")
    }

    pub fn body(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.body
    }

    pub fn to_value(&self) -> serde_json::Value {
        serde_json::Value::Object(self.body.clone())
    }
}

impl TryFrom<serde_json::Value> for RawResource {
    type Error = TemplateError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        match value {
            serde_json::Value::Object(body) => Ok(Self { body }),
            other => Err(TemplateError::Decode {
                kind: "resource".to_string(),
                message: format!("expected a resource object, got {}", other),
            }),
        }
    }
}

type Map = serde_json::Map<String, serde_json::Value>;

/// A typed resource, plus whatever of its envelope the kind does not model.
///
/// Typing a parsed entry keeps the envelope keys besides `Type` and
/// `Properties` (`DependsOn`, `Condition`, `Metadata`...) and every property
/// the kind dropped on decode. Both are merged back when the entry is encoded.
#[derive(Debug, Clone)]
pub struct TypedResource {
    resource: Box<dyn AnyResource>,
    attributes: Map,
    residue: Map,
    explicit_properties: bool,
}

impl TypedResource {
    pub fn new(resource: Box<dyn AnyResource>) -> Self {
        Self {
            resource,
            attributes: Map::new(),
            residue: Map::new(),
            explicit_properties: true,
        }
    }

    /// Pair a decoded resource with the raw entry it was decoded from.
    ///
    /// Returns `None` when the typed form cannot reproduce `raw` exactly,
    /// e.g. when the kind rewrites a value or a list element it only
    /// partially models.
    pub fn from_raw(resource: Box<dyn AnyResource>, raw: &RawResource) -> TemplateResult<Option<Self>> {
        let (raw_properties, explicit_properties) = match raw.properties() {
            None | Some(serde_json::Value::Null) => (Map::new(), false),
            Some(serde_json::Value::Object(properties)) => (properties.clone(), true),
            Some(_) => return Ok(None),
        };

        let encoded = encoded_properties(&*resource)?;
        let attributes = raw
            .body()
            .iter()
            .filter(|(key, _)| !matches!(key.as_str(), "Type" | "Properties"))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        let typed = Self {
            residue: property_residue(&raw_properties, &encoded),
            resource,
            attributes,
            explicit_properties,
        };

        let mut expected = raw.body().clone();
        if !explicit_properties {
            expected.remove("Properties");
        }
        if typed.to_envelope()? == serde_json::Value::Object(expected) {
            Ok(Some(typed))
        } else {
            Ok(None)
        }
    }

    pub fn resource(&self) -> &dyn AnyResource {
        &*self.resource
    }

    pub fn resource_mut(&mut self) -> &mut dyn AnyResource {
        &mut *self.resource
    }

    /// Envelope keys carried alongside `Type` and `Properties`.
    pub fn attributes(&self) -> &Map {
        &self.attributes
    }

    /// Properties present in the source envelope that the kind does not model.
    pub fn residue(&self) -> &Map {
        &self.residue
    }

    pub fn to_envelope(&self) -> TemplateResult<serde_json::Value> {
        let mut properties = encoded_properties(&*self.resource)?;
        merge_residue(&mut properties, &self.residue);

        let mut envelope = Map::new();
        envelope.insert(
            "Type".to_string(),
            serde_json::Value::String(self.resource.kind().to_string()),
        );
        if self.explicit_properties || !properties.is_empty() {
            envelope.insert("Properties".to_string(), serde_json::Value::Object(properties));
        }
        for (key, value) in &self.attributes {
            envelope.insert(key.clone(), value.clone());
        }
        Ok(serde_json::Value::Object(envelope))
    }
}

fn encoded_properties(resource: &dyn AnyResource) -> TemplateResult<Map> {
    match resource.encode()? {
        serde_json::Value::Object(mut envelope) => match envelope.remove("Properties") {
            Some(serde_json::Value::Object(properties)) => Ok(properties),
            None | Some(serde_json::Value::Null) => Ok(Map::new()),
            Some(other) => Err(TemplateError::Serialization(format!(
                "{} properties encode to {}, expected an object",
                resource.kind(),
                other
            ))),
        },
        other => Err(TemplateError::Serialization(format!(
            "{} encodes to {}, expected an envelope object",
            resource.kind(),
            other
        ))),
    }
}

/// What of `raw` is missing from `encoded`, recursing into nested objects.
fn property_residue(raw: &Map, encoded: &Map) -> Map {
    let mut residue = Map::new();
    for (key, value) in raw {
        match (encoded.get(key), value) {
            (Some(encoded_value), _) if encoded_value == value => {}
            (Some(serde_json::Value::Object(encoded_map)), serde_json::Value::Object(raw_map)) => {
                let nested = property_residue(raw_map, encoded_map);
                if !nested.is_empty() {
                    residue.insert(key.clone(), serde_json::Value::Object(nested));
                }
            }
            _ => {
                residue.insert(key.clone(), value.clone());
            }
        }
    }
    residue
}

/// Fill the gaps of `properties` from `residue`. Typed values win.
fn merge_residue(properties: &mut Map, residue: &Map) {
    for (key, value) in residue {
        match properties.get_mut(key) {
            Some(serde_json::Value::Object(target)) => {
                if let serde_json::Value::Object(nested) = value {
                    merge_residue(target, nested);
                }
            }
            Some(_) => {}
            None => {
                properties.insert(key.clone(), value.clone());
            }
        }
    }
}

/// A resource held by a template: typed, or opaque structured data.
#[derive(Debug, Clone)]
pub enum ResourceEntry {
    Typed(TypedResource),
    Raw(RawResource),
}

impl ResourceEntry {
    /// The discriminator of this entry, whichever representation holds it.
    pub fn kind(&self) -> Option<&str> {
        match self {
            ResourceEntry::Typed(typed) => Some(typed.resource().kind()),
            ResourceEntry::Raw(raw) => raw.kind(),
        }
    }

    pub fn is_typed(&self) -> bool {
        matches!(self, ResourceEntry::Typed(_))
    }

    /// The wire envelope of this entry.
    pub fn to_envelope(&self) -> TemplateResult<serde_json::Value> {
        match self {
            ResourceEntry::Typed(typed) => typed.to_envelope(),
            ResourceEntry::Raw(raw) => {
                if raw.kind().is_none() {
                    return Err(TemplateError::Serialization(
                        "resource envelope has no string Type discriminator".to_string(),
                    ));
                }
                Ok(raw.to_value())
            }
        }
    }
}

impl<K: ResourceKind> From<K> for ResourceEntry {
    fn from(resource: K) -> Self {
        ResourceEntry::Typed(TypedResource::new(Box::new(resource)))
    }
}

impl From<RawResource> for ResourceEntry {
    fn from(raw: RawResource) -> Self {
        ResourceEntry::Raw(raw)
    }
}

impl Serialize for ResourceEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let envelope = self.to_envelope().map_err(serde::ser::Error::custom)?;
        envelope.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ResourceEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawResource::deserialize(deserializer)?;
        trace!("Parsed raw resource of kind {:?}", raw.kind());
        Ok(ResourceEntry::Raw(raw))
    }
}
