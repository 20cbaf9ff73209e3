//! The template document and its wire format.

use std::fmt;
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_yaml::value::TaggedValue;
use tracing::{debug, info};

use crate::error::{TemplateError, TemplateResult};
use crate::resource::ResourceEntry;
use crate::value::Value;

/// Template format version understood by the provisioning engine.
pub const FORMAT_VERSION: &str = "2010-09-09";

/// Type of a template parameter.
///
/// Provider-specific types (`AWS::EC2::KeyPair::KeyName`, `List<Number>`...)
/// are kept verbatim in [`ParameterType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParameterType {
    String,
    Number,
    CommaDelimitedList,
    Other(String),
}

impl ParameterType {
    pub fn as_str(&self) -> &str {
        match self {
            ParameterType::String => "String",
            ParameterType::Number => "Number",
            ParameterType::CommaDelimitedList => "CommaDelimitedList",
            ParameterType::Other(name) => name,
        }
    }
}

impl From<&str> for ParameterType {
    fn from(name: &str) -> Self {
        match name {
            "String" => ParameterType::String,
            "Number" => ParameterType::Number,
            "CommaDelimitedList" => ParameterType::CommaDelimitedList,
            other => ParameterType::Other(other.to_string()),
        }
    }
}

impl Serialize for ParameterType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ParameterType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(ParameterType::from(name.as_str()))
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Scalar defaults (`Default: 3`) are read as their string form.
fn scalar_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(default)) => Ok(Some(default)),
        Some(serde_json::Value::Number(default)) => Ok(Some(default.to_string())),
        Some(serde_json::Value::Bool(default)) => Ok(Some(default.to_string())),
        Some(other) => Err(de::Error::custom(format!(
            "parameter default must be a scalar, got {}",
            other
        ))),
    }
}

/// A template parameter declaration.
///
/// Constraint keys without a dedicated field (`AllowedValues`, `NoEcho`,
/// `MinValue`...) are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Parameter {
    #[serde(rename = "Type")]
    pub param_type: ParameterType,
    #[serde(
        default,
        deserialize_with = "scalar_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub default: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
}

impl Parameter {
    pub fn new(param_type: ParameterType) -> Self {
        Self {
            param_type,
            default: None,
            description: None,
            extra: IndexMap::new(),
        }
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Export block of an output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Export {
    pub name: Value,
}

/// A template output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Output {
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export: Option<Export>,
    /// `Condition` and any other key without a dedicated field.
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
}

impl Output {
    pub fn new(value: Value) -> Self {
        Self {
            value,
            description: None,
            export: None,
            extra: IndexMap::new(),
        }
    }

    /// Attach a human-readable description.
    pub fn describe(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = Some(description.into());
        self
    }

    pub fn export_as(&mut self, name: Value) -> &mut Self {
        self.export = Some(Export { name });
        self
    }
}

/// Output serialization format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "yaml" | "yml" => Some(OutputFormat::Yaml),
            _ => None,
        }
    }

    /// Guess the format from a file extension, defaulting to JSON.
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_str)
            .unwrap_or_default()
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An infrastructure template: parameters, resources and outputs.
///
/// Each mapping keeps insertion order, so rendering the same template twice
/// gives byte-identical output. The three mappings are independent
/// namespaces. Other top-level sections (`Metadata`, `Mappings`,
/// `Conditions`, `Transform`...) are carried through `sections` untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Template {
    #[serde(
        rename = "AWSTemplateFormatVersion",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub format_version: Option<String>,

    #[serde(rename = "Description", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(flatten)]
    pub sections: IndexMap<String, serde_json::Value>,

    #[serde(rename = "Parameters", default, skip_serializing_if = "IndexMap::is_empty")]
    pub parameters: IndexMap<String, Parameter>,

    #[serde(rename = "Resources", default)]
    pub resources: IndexMap<String, ResourceEntry>,

    #[serde(rename = "Outputs", default, skip_serializing_if = "IndexMap::is_empty")]
    pub outputs: IndexMap<String, Output>,
}

impl Template {
    /// Create an empty template.
    pub fn new() -> Self {
        Self::default()
    }

    /// Render to pretty-printed JSON.
    pub fn render_json(&self) -> TemplateResult<Vec<u8>> {
        let rendered = serde_json::to_vec_pretty(self)
            .map_err(|e| TemplateError::Serialization(e.to_string()))?;
        info!(
            "Rendered template with {} resources ({} bytes)",
            self.resources.len(),
            rendered.len()
        );
        Ok(rendered)
    }

    /// Render to YAML.
    pub fn render_yaml(&self) -> TemplateResult<Vec<u8>> {
        let rendered =
            serde_yaml::to_string(self).map_err(|e| TemplateError::Serialization(e.to_string()))?;
        info!(
            "Rendered template with {} resources ({} bytes)",
            self.resources.len(),
            rendered.len()
        );
        Ok(rendered.into_bytes())
    }

    pub fn render(&self, format: OutputFormat) -> TemplateResult<Vec<u8>> {
        match format {
            OutputFormat::Json => self.render_json(),
            OutputFormat::Yaml => self.render_yaml(),
        }
    }

    /// Parse a JSON template. Every resource starts out raw.
    pub fn from_json(bytes: &[u8]) -> TemplateResult<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Parse a YAML template. Every resource starts out raw.
    ///
    /// Short-form intrinsics (`!Ref`, `!Sub`, `!GetAtt`...) are read as
    /// their long form.
    pub fn from_yaml(content: &str) -> TemplateResult<Self> {
        let document: serde_yaml::Value = serde_yaml::from_str(content)?;
        Ok(serde_yaml::from_value(expand_yaml_intrinsics(document))?)
    }

    /// Load a template from disk, choosing the parser by file extension.
    pub fn from_file(path: &Path) -> TemplateResult<Self> {
        let content = fs::read_to_string(path)?;
        let template = match OutputFormat::from_path(path) {
            OutputFormat::Json => Self::from_json(content.as_bytes())?,
            OutputFormat::Yaml => Self::from_yaml(&content)?,
        };
        debug!(
            "Loaded template {:?}: {} parameters, {} resources, {} outputs",
            path,
            template.parameters.len(),
            template.resources.len(),
            template.outputs.len()
        );
        Ok(template)
    }
}

/// Rewrite YAML short-form intrinsics into their long form, recursively.
///
/// `!Ref X` becomes `{Ref: X}`, `!Condition X` becomes `{Condition: X}` and
/// every other tag `!Name v` becomes `{"Fn::Name": v}`.
pub fn expand_yaml_intrinsics(value: serde_yaml::Value) -> serde_yaml::Value {
    match value {
        serde_yaml::Value::Tagged(tagged) => {
            let TaggedValue { tag, value } = *tagged;
            let tag = tag.to_string();
            let name = tag.trim_start_matches('!');
            let key = match name {
                "Ref" | "Condition" => name.to_string(),
                other => format!("Fn::{}", other),
            };
            let mut long_form = serde_yaml::Mapping::new();
            long_form.insert(serde_yaml::Value::String(key), expand_yaml_intrinsics(value));
            serde_yaml::Value::Mapping(long_form)
        }
        serde_yaml::Value::Sequence(items) => {
            serde_yaml::Value::Sequence(items.into_iter().map(expand_yaml_intrinsics).collect())
        }
        serde_yaml::Value::Mapping(entries) => serde_yaml::Value::Mapping(
            entries
                .into_iter()
                .map(|(key, value)| (key, expand_yaml_intrinsics(value)))
                .collect(),
        ),
        other => other,
    }
}
