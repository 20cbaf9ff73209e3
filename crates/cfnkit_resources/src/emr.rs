//! EMR resource kinds.

use cfnkit_template::{resource_kind, Value};
use serde::{Deserialize, Serialize};

/// `AWS::EMR::Step`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct EmrStep {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_on_failure: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hadoop_jar_step: Option<HadoopJarStepConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_flow_id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,
}

resource_kind!(EmrStep, "AWS::EMR::Step");

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct HadoopJarStepConfig {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jar: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_class: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub step_properties: Vec<KeyValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct KeyValue {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}
