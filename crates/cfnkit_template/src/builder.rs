//! Resource set builder.
//!
//! A [`ResourceSet`] owns one [`Template`] and is the only way calling code
//! writes into it. Every call is scoped to a logical name and hands back a
//! reference [`Value`] bound to that name, so further resources can be wired
//! to it without ever touching the serialized form.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::KindCatalog;
use crate::error::{TemplateError, TemplateResult};
use crate::resource::{AnyResource, RawResource, ResourceEntry, ResourceKind, TypedResource};
use crate::template::{Output, Parameter, ParameterType, Template, FORMAT_VERSION};
use crate::value::{pseudo, Tag, Value};

/// `{"Fn::Sub": "${AWS::StackName}-<suffix>"}`, for physical resource names.
pub fn make_name(suffix: &str) -> Value {
    Value::sub(format!("${{{}}}-{}", pseudo::STACK_NAME, suffix))
}

/// A `Name` tag valued `{"Fn::Sub": "${AWS::StackName}/<suffix>"}`.
pub fn make_auto_name_tag(suffix: &str) -> Tag {
    Tag::new(
        "Name",
        Value::sub(format!("${{{}}}/{}", pseudo::STACK_NAME, suffix)),
    )
}

/// String literals as a list of values.
pub fn make_string_slice(items: &[&str]) -> Vec<Value> {
    items.iter().map(|s| Value::from(*s)).collect()
}

/// Append the auto name tag if the resource supports tags.
fn maybe_set_name_tag(name: &str, resource: &mut dyn AnyResource) {
    let kind = resource.kind();
    match resource.tagged_mut() {
        Some(tagged) => {
            tagged.tags_mut().push(make_auto_name_tag(name));
            debug!("Tagged {} resource {}", kind, name);
        }
        None => debug!("{} resource {} has no tags, not tagging", kind, name),
    }
}

fn check_name(name: &str) -> TemplateResult<()> {
    if name.is_empty() {
        return Err(TemplateError::InvalidName(
            "logical names must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// An output value reported by a deployed stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StackOutput {
    pub output_key: String,
    pub output_value: String,
}

impl StackOutput {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            output_key: key.into(),
            output_value: value.into(),
        }
    }
}

/// Builder for a single template.
#[derive(Debug, Clone, Default)]
pub struct ResourceSet {
    template: Template,
}

impl ResourceSet {
    /// Create a resource set over an empty template.
    pub fn new() -> Self {
        Self {
            template: Template::new(),
        }
    }

    /// Set the template description; also pins the format version.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.template.format_version = Some(FORMAT_VERSION.to_string());
        self.template.description = Some(description.into());
    }

    /// Declare a parameter and return a reference to it.
    ///
    /// An empty default means no default, and redeclaring a name replaces
    /// the previous declaration.
    pub fn new_parameter(
        &mut self,
        name: &str,
        param_type: ParameterType,
        default: Option<&str>,
    ) -> TemplateResult<Value> {
        let mut parameter = Parameter::new(param_type);
        if let Some(default) = default.filter(|d| !d.is_empty()) {
            parameter = parameter.with_default(default);
        }
        self.new_parameter_with(name, parameter)
    }

    /// Declare a fully specified parameter and return a reference to it.
    pub fn new_parameter_with(&mut self, name: &str, parameter: Parameter) -> TemplateResult<Value> {
        check_name(name)?;
        debug!("Declaring {} parameter {}", parameter.param_type, name);
        self.template.parameters.insert(name.to_string(), parameter);
        Ok(Value::reference(name))
    }

    pub fn new_string_parameter(&mut self, name: &str, default: Option<&str>) -> TemplateResult<Value> {
        self.new_parameter(name, ParameterType::String, default)
    }

    pub fn new_number_parameter(&mut self, name: &str, default: Option<&str>) -> TemplateResult<Value> {
        self.new_parameter(name, ParameterType::Number, default)
    }

    /// Add a typed resource, tagging it with a `Name` tag if it has tags.
    ///
    /// Replaces any resource already registered under `name`.
    pub fn new_resource<K: ResourceKind>(&mut self, name: &str, resource: K) -> TemplateResult<Value> {
        self.insert_typed(name, TypedResource::new(Box::new(resource)))
    }

    /// Add an opaque resource. Raw resources are never tagged.
    pub fn new_raw_resource(
        &mut self,
        name: &str,
        kind: &str,
        properties: serde_json::Value,
    ) -> TemplateResult<Value> {
        check_name(name)?;
        debug!("Adding raw {} resource {}", kind, name);
        self.template
            .resources
            .insert(name.to_string(), ResourceEntry::Raw(RawResource::new(kind, properties)));
        Ok(Value::reference(name))
    }

    /// Add a resource from its envelope, typing it through the catalogue.
    ///
    /// Known kinds are decoded (and tagged like [`Self::new_resource`]); a
    /// known kind that fails to decode is an error. Envelope keys and
    /// properties the kind does not model are kept. Unknown kinds, and known
    /// kinds whose typed form would alter the envelope, are stored raw.
    pub fn new_catalogued_resource(
        &mut self,
        name: &str,
        envelope: serde_json::Value,
        catalog: &KindCatalog,
    ) -> TemplateResult<Value> {
        check_name(name)?;
        let raw = RawResource::try_from(envelope)?;
        if let Some(typed) = catalog.upgrade(&raw)? {
            return self.insert_typed(name, typed);
        }

        match raw.kind() {
            Some(kind) if catalog.contains(kind) => {
                warn!("Keeping {} resource {} untyped: its typed form would alter it", kind, name)
            }
            kind => debug!("Adding uncatalogued {:?} resource {}", kind, name),
        }
        self.template
            .resources
            .insert(name.to_string(), ResourceEntry::Raw(raw));
        Ok(Value::reference(name))
    }

    fn insert_typed(&mut self, name: &str, mut typed: TypedResource) -> TemplateResult<Value> {
        check_name(name)?;
        maybe_set_name_tag(name, typed.resource_mut());
        debug!("Adding {} resource {}", typed.resource().kind(), name);
        self.template
            .resources
            .insert(name.to_string(), ResourceEntry::Typed(typed));
        Ok(Value::reference(name))
    }

    /// Declare an output; the returned handle can attach a description.
    pub fn new_output(&mut self, name: &str, value: Value) -> TemplateResult<&mut Output> {
        check_name(name)?;
        debug!("Declaring output {}", name);
        let (index, _) = self
            .template
            .outputs
            .insert_full(name.to_string(), Output::new(value));
        Ok(&mut self.template.outputs[index])
    }

    /// Declare an output bound to an attribute of a resource.
    pub fn new_output_from_att(
        &mut self,
        name: &str,
        resource: &str,
        attribute: &str,
    ) -> TemplateResult<&mut Output> {
        self.new_output(name, Value::get_att(resource, attribute))
    }

    /// Declare an output exported as `${AWS::StackName}::<name>`.
    pub fn new_exported_output(&mut self, name: &str, value: Value) -> TemplateResult<&mut Output> {
        let export = Value::sub(format!("${{{}}}::{}", pseudo::STACK_NAME, name));
        let output = self.new_output(name, value)?;
        output.export_as(export);
        Ok(output)
    }

    /// Match the outputs reported by a deployed stack against the declared
    /// outputs, in declaration order.
    pub fn collect_outputs(&self, stack_outputs: &[StackOutput]) -> TemplateResult<IndexMap<String, String>> {
        let mut collected = IndexMap::new();
        for name in self.template.outputs.keys() {
            let reported = stack_outputs
                .iter()
                .find(|o| &o.output_key == name)
                .ok_or_else(|| TemplateError::MissingOutput(name.clone()))?;
            collected.insert(name.clone(), reported.output_value.clone());
        }
        debug!("Collected {} stack outputs", collected.len());
        Ok(collected)
    }

    /// Whether deploying this template needs IAM capabilities.
    pub fn requires_iam(&self) -> bool {
        self.template
            .resources
            .values()
            .filter_map(ResourceEntry::kind)
            .any(|kind| kind.starts_with("AWS::IAM::"))
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn into_template(self) -> Template {
        self.template
    }

    pub fn render_json(&self) -> TemplateResult<Vec<u8>> {
        self.template.render_json()
    }

    pub fn render_yaml(&self) -> TemplateResult<Vec<u8>> {
        self.template.render_yaml()
    }
}
