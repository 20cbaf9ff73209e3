//! EC2 networking resource kinds.
//!
//! All of these carry a `Tags` list and are auto-tagged when registered
//! through a resource set.

use cfnkit_template::{resource_kind, Tag, Value};
use serde::{Deserialize, Serialize};

/// `AWS::EC2::VPC`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Ec2Vpc {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cidr_block: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_dns_hostnames: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_dns_support: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_tenancy: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
}

resource_kind!(Ec2Vpc, "AWS::EC2::VPC", tags);

/// `AWS::EC2::Subnet`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Ec2Subnet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability_zone: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cidr_block: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_public_ip_on_launch: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vpc_id: Option<Value>,
}

resource_kind!(Ec2Subnet, "AWS::EC2::Subnet", tags);

/// `AWS::EC2::InternetGateway`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Ec2InternetGateway {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
}

resource_kind!(Ec2InternetGateway, "AWS::EC2::InternetGateway", tags);

/// `AWS::EC2::SecurityGroup`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Ec2SecurityGroup {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_description: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_name: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub security_group_ingress: Vec<IngressRule>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vpc_id: Option<Value>,
}

resource_kind!(Ec2SecurityGroup, "AWS::EC2::SecurityGroup", tags);

/// Inline ingress rule of a security group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct IngressRule {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cidr_ip: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_port: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_protocol: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_security_group_id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_port: Option<Value>,
}
