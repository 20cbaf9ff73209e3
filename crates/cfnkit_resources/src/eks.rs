//! EKS resource kinds.

use cfnkit_template::{resource_kind, Value};
use serde::{Deserialize, Serialize};

/// `AWS::EKS::Cluster`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct EksCluster {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources_vpc_config: Option<ResourcesVpcConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_arn: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<Value>,
}

resource_kind!(EksCluster, "AWS::EKS::Cluster");

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ResourcesVpcConfig {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub security_group_ids: Vec<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subnet_ids: Vec<Value>,
}
