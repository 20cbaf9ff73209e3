//! Stack definition files.
//!
//! A stack file is a YAML description of the parameters, resources and
//! outputs of one template:
//!
//! ```yaml
//! description: Demo cluster
//! parameters:
//!   ClusterName:
//!     type: String
//!     default: dev
//!     description: Name of the cluster
//! resources:
//!   VPC:
//!     Type: AWS::EC2::VPC
//!     Properties:
//!       CidrBlock: 192.168.0.0/16
//!       Tags:
//!         - Key: Cluster
//!           Value: !Ref ClusterName
//! outputs:
//!   VpcId:
//!     value: { Ref: VPC }
//!     description: VPC of the cluster
//!     export: true
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use cfnkit_template::{
    expand_yaml_intrinsics, KindCatalog, Parameter, ParameterType, ResourceSet, Value,
};

/// Parameter declaration in a stack file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterSpec {
    #[serde(rename = "type")]
    pub param_type: ParameterType,
    #[serde(default)]
    pub default: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Output declaration in a stack file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSpec {
    pub value: Value,
    #[serde(default)]
    pub description: Option<String>,
    /// Export as `${AWS::StackName}::<name>`.
    #[serde(default)]
    pub export: bool,
}

/// A stack definition loaded from YAML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StackFile {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub parameters: IndexMap<String, ParameterSpec>,
    /// Resource envelopes, `{Type, Properties}`.
    #[serde(default)]
    pub resources: IndexMap<String, serde_json::Value>,
    #[serde(default)]
    pub outputs: IndexMap<String, OutputSpec>,
}

impl StackFile {
    /// Load a stack file from YAML. Short-form intrinsics such as `!Ref`
    /// are accepted.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read stack file {}", path.display()))?;
        let stack = Self::from_yaml(&content)
            .with_context(|| format!("Invalid stack file {}", path.display()))?;
        info!(
            "Loaded stack file {:?} with {} resources",
            path,
            stack.resources.len()
        );
        Ok(stack)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let document: serde_yaml::Value = serde_yaml::from_str(content)?;
        Ok(serde_yaml::from_value(expand_yaml_intrinsics(document))?)
    }

    /// Build a resource set from this definition.
    ///
    /// Resources of catalogued kinds are typed (and so auto-tagged); others
    /// are carried through untouched.
    pub fn build(&self, catalog: &KindCatalog) -> Result<ResourceSet> {
        let mut set = ResourceSet::new();

        if let Some(description) = &self.description {
            set.set_description(description.clone());
        }

        for (name, spec) in &self.parameters {
            let mut parameter = Parameter::new(spec.param_type.clone());
            if let Some(default) = spec.default.as_deref().filter(|d| !d.is_empty()) {
                parameter = parameter.with_default(default);
            }
            if let Some(description) = &spec.description {
                parameter = parameter.with_description(description.clone());
            }
            set.new_parameter_with(name, parameter)
                .with_context(|| format!("Invalid parameter {}", name))?;
        }

        for (name, envelope) in &self.resources {
            set.new_catalogued_resource(name, envelope.clone(), catalog)
                .with_context(|| format!("Invalid resource {}", name))?;
        }

        for (name, spec) in &self.outputs {
            let output = if spec.export {
                set.new_exported_output(name, spec.value.clone())
            } else {
                set.new_output(name, spec.value.clone())
            }
            .with_context(|| format!("Invalid output {}", name))?;

            if let Some(description) = &spec.description {
                output.describe(description.clone());
            }
        }

        debug!(
            "Built resource set: {} typed of {} resources",
            set.template()
                .resources
                .values()
                .filter(|entry| entry.is_typed())
                .count(),
            set.template().resources.len()
        );
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cfnkit_resources::{catalog, Ec2Vpc};
    use cfnkit_template::make_auto_name_tag;
    use tempfile::tempdir;

    const STACK: &str = r#"
description: Demo cluster
parameters:
  VpcCidr:
    type: String
    default: 192.168.0.0/16
    description: Address range of the VPC
  NodeCount:
    type: Number
resources:
  VPC:
    Type: AWS::EC2::VPC
    Properties:
      CidrBlock: { Ref: VpcCidr }
  Queue:
    Type: AWS::SQS::Queue
    Properties:
      DelaySeconds: 5
outputs:
  VpcId:
    value: { Ref: VPC }
    description: VPC of the cluster
    export: true
"#;

    #[test]
    fn test_load_stack_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stack.yaml");
        fs::write(&path, STACK).unwrap();

        let stack = StackFile::from_file(&path).unwrap();
        assert_eq!(stack.description.as_deref(), Some("Demo cluster"));
        assert_eq!(stack.parameters["NodeCount"].param_type, ParameterType::Number);
        assert_eq!(stack.parameters["NodeCount"].default, None);
        assert_eq!(stack.resources.len(), 2);
        assert!(stack.outputs["VpcId"].export);
    }

    #[test]
    fn test_build_types_catalogued_resources() {
        let stack: StackFile = serde_yaml::from_str(STACK).unwrap();
        let set = stack.build(&catalog()).unwrap();

        let template = set.template();
        assert!(template.resources["VPC"].is_typed());
        assert!(!template.resources["Queue"].is_typed());

        let vpc: Ec2Vpc = template.by_name("VPC").unwrap();
        assert_eq!(vpc.cidr_block, Some(Value::reference("VpcCidr")));
        assert_eq!(vpc.tags, vec![make_auto_name_tag("VPC")]);

        let output = &template.outputs["VpcId"];
        assert_eq!(output.description.as_deref(), Some("VPC of the cluster"));
        assert!(output.export.is_some());
    }

    #[test]
    fn test_parameter_description_is_rendered() {
        let stack = StackFile::from_yaml(STACK).unwrap();
        let set = stack.build(&catalog()).unwrap();

        let rendered: serde_json::Value = serde_json::from_slice(&set.render_json().unwrap()).unwrap();
        assert_eq!(
            rendered["Parameters"]["VpcCidr"],
            serde_json::json!({
                "Type": "String",
                "Default": "192.168.0.0/16",
                "Description": "Address range of the VPC"
            })
        );
        assert_eq!(
            rendered["Parameters"]["NodeCount"],
            serde_json::json!({"Type": "Number"})
        );
    }

    #[test]
    fn test_build_keeps_unmodelled_resource_data() {
        let stack = StackFile::from_yaml(
            r#"
resources:
  Gateway:
    Type: AWS::EC2::InternetGateway
  VPC:
    Type: AWS::EC2::VPC
    DependsOn: Gateway
    DeletionPolicy: Retain
    Properties:
      CidrBlock: !Ref VpcCidr
      Ipv4IpamPoolId: pool-1
"#,
        )
        .unwrap();
        let set = stack.build(&catalog()).unwrap();
        assert!(set.template().resources["VPC"].is_typed());

        let rendered: serde_json::Value = serde_json::from_slice(&set.render_json().unwrap()).unwrap();
        assert_eq!(
            rendered["Resources"]["VPC"],
            serde_json::json!({
                "Type": "AWS::EC2::VPC",
                "Properties": {
                    "CidrBlock": {"Ref": "VpcCidr"},
                    "Tags": [{"Key": "Name", "Value": {"Fn::Sub": "${AWS::StackName}/VPC"}}],
                    "Ipv4IpamPoolId": "pool-1"
                },
                "DependsOn": "Gateway",
                "DeletionPolicy": "Retain"
            })
        );
    }

    #[test]
    fn test_build_rejects_malformed_catalogued_resource() {
        let stack: StackFile = serde_yaml::from_str(
            r#"
resources:
  VPC:
    Type: AWS::EC2::VPC
    Properties:
      Tags: not-a-list
"#,
        )
        .unwrap();

        let err = stack.build(&catalog()).unwrap_err();
        assert!(format!("{:#}", err).contains("Invalid resource VPC"));
    }

    #[test]
    fn test_missing_stack_file() {
        let dir = tempdir().unwrap();
        assert!(StackFile::from_file(&dir.path().join("absent.yaml")).is_err());
    }
}
