//! CloudWatch Logs resource kinds.

use cfnkit_template::{resource_kind, Value};
use serde::{Deserialize, Serialize};

/// `AWS::Logs::MetricFilter`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct LogsMetricFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_pattern: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_group_name: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub metric_transformations: Vec<MetricTransformation>,
}

resource_kind!(LogsMetricFilter, "AWS::Logs::MetricFilter");

/// How matched log events become metric data points.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct MetricTransformation {
    /// Value published when no log event matches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric_name: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric_namespace: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric_value: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use cfnkit_template::ResourceKind;
    use serde_json::json;

    #[test]
    fn test_metric_filter_envelope() {
        let filter = LogsMetricFilter {
            filter_pattern: Some("ERROR".into()),
            log_group_name: Some(Value::reference("LogGroup")),
            metric_transformations: vec![MetricTransformation {
                metric_name: Some("Errors".into()),
                metric_namespace: Some("App".into()),
                metric_value: Some("1".into()),
                ..Default::default()
            }],
        };

        assert_eq!(
            filter.to_envelope().unwrap(),
            json!({
                "Type": "AWS::Logs::MetricFilter",
                "Properties": {
                    "FilterPattern": "ERROR",
                    "LogGroupName": {"Ref": "LogGroup"},
                    "MetricTransformations": [
                        {"MetricName": "Errors", "MetricNamespace": "App", "MetricValue": "1"}
                    ]
                }
            })
        );
        assert_eq!(LogsMetricFilter::from_envelope(&filter.to_envelope().unwrap()).unwrap(), filter);
    }
}
