//! # cfnkit_template
//!
//! Typed CloudFormation template model and resource set builder for cfnkit.
//!
//! This crate assembles declarative infrastructure templates made of
//! parameters, resources and outputs, and renders them to the
//! `{Type, Properties}` envelope format the provisioning engine consumes.
//!
//! ## Features
//!
//! - Reference-based builder with automatic `Name` tagging
//! - Open set of resource kinds: any serde struct can become a kind
//! - Lossless handling of untyped resources from parsed templates
//! - Typed queries that decode raw entries on demand
//! - JSON and YAML rendering with stable ordering
//!
//! ## Example
//!
//! ```rust
//! use cfnkit_template::{make_name, resource_kind, ResourceSet, Tag, Value};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Clone, Default, Serialize, Deserialize)]
//! #[serde(rename_all = "PascalCase", default)]
//! struct Cluster {
//!     #[serde(skip_serializing_if = "Option::is_none")]
//!     name: Option<Value>,
//!     #[serde(skip_serializing_if = "Vec::is_empty")]
//!     tags: Vec<Tag>,
//! }
//!
//! resource_kind!(Cluster, "Example::Cluster", tags);
//!
//! let mut set = ResourceSet::new();
//! set.new_string_parameter("ClusterName", Some("dev")).unwrap();
//! let cluster = set
//!     .new_resource("ControlPlane", Cluster { name: Some(make_name("cp")), ..Default::default() })
//!     .unwrap();
//! set.new_output("Name", cluster).unwrap();
//!
//! let json = set.render_json().unwrap();
//! assert!(String::from_utf8(json).unwrap().contains("${AWS::StackName}/ControlPlane"));
//! ```

pub mod builder;
pub mod catalog;
pub mod error;
pub mod registry;
pub mod resource;
pub mod template;
pub mod value;

pub use builder::{make_auto_name_tag, make_name, make_string_slice, ResourceSet, StackOutput};
pub use catalog::KindCatalog;
pub use error::{LookupFailure, TemplateError, TemplateResult};
pub use resource::{
    decode_properties, encode_envelope, AnyResource, HasTags, RawResource, ResourceEntry,
    ResourceKind, TypedResource,
};
pub use template::{
    expand_yaml_intrinsics, Export, Output, OutputFormat, Parameter, ParameterType, Template,
    FORMAT_VERSION,
};
pub use value::{pseudo, Tag, Value};
