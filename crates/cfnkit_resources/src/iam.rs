//! IAM resource kinds.

use cfnkit_template::{resource_kind, Value};
use serde::{Deserialize, Serialize};

/// `AWS::IAM::Role`
///
/// Policy documents are kept as structured JSON; their grammar is not modelled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct IamRole {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assume_role_policy_document: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub managed_policy_arns: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub policies: Vec<IamPolicy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_name: Option<Value>,
}

resource_kind!(IamRole, "AWS::IAM::Role");

/// Inline policy attached to a role.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct IamPolicy {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_document: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_name: Option<Value>,
}

impl IamRole {
    /// A role assumable by the given service principals.
    pub fn for_services(services: &[&str]) -> Self {
        Self {
            assume_role_policy_document: Some(serde_json::json!({
                "Version": "2012-10-17",
                "Statement": [{
                    "Effect": "Allow",
                    "Principal": {"Service": services},
                    "Action": ["sts:AssumeRole"]
                }]
            })),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cfnkit_template::ResourceKind;

    #[test]
    fn test_role_has_no_tags() {
        assert!(IamRole::default().as_tagged().is_none());
    }

    #[test]
    fn test_for_services() {
        let role = IamRole::for_services(&["eks.amazonaws.com"]);
        let document = role.assume_role_policy_document.as_ref().unwrap();
        assert_eq!(
            document["Statement"][0]["Principal"]["Service"][0],
            "eks.amazonaws.com"
        );
        assert_eq!(IamRole::from_envelope(&role.to_envelope().unwrap()).unwrap(), role);
    }
}
