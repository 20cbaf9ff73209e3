//! Integration tests for the template model.

use std::fs;

use cfnkit_template::{
    make_auto_name_tag, make_name, resource_kind, KindCatalog, LookupFailure, ResourceKind,
    ResourceSet, StackOutput, Tag, Template, TemplateError, Value,
};
use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tempfile::tempdir;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct Cluster {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    subnet_ids: Vec<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tags: Vec<Tag>,
}

resource_kind!(Cluster, "Example::Cluster", tags);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct Endpoint {
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<Value>,
}

resource_kind!(Endpoint, "Example::Endpoint");

fn rendered_json(set: &ResourceSet) -> serde_json::Value {
    serde_json::from_slice(&set.render_json().unwrap()).unwrap()
}

#[test]
fn test_cluster_template_document() {
    let mut set = ResourceSet::new();
    set.new_string_parameter("ClusterName", Some("dev")).unwrap();
    let control_plane = set
        .new_resource(
            "ControlPlane",
            Cluster {
                name: Some(Value::reference("ClusterName")),
                ..Default::default()
            },
        )
        .unwrap();
    set.new_output("Name", control_plane).unwrap();

    assert_eq!(
        rendered_json(&set),
        json!({
            "Parameters": {
                "ClusterName": {"Type": "String", "Default": "dev"}
            },
            "Resources": {
                "ControlPlane": {
                    "Type": "Example::Cluster",
                    "Properties": {
                        "Name": {"Ref": "ClusterName"},
                        "Tags": [
                            {"Key": "Name", "Value": {"Fn::Sub": "${AWS::StackName}/ControlPlane"}}
                        ]
                    }
                }
            },
            "Outputs": {
                "Name": {"Value": {"Ref": "ControlPlane"}}
            }
        })
    );
}

#[test]
fn test_references_wire_resources_together() {
    let mut set = ResourceSet::new();
    let endpoint = set
        .new_resource(
            "Endpoint",
            Endpoint {
                url: Some(make_name("endpoint")),
            },
        )
        .unwrap();
    set.new_resource(
        "Cluster",
        Cluster {
            subnet_ids: vec![endpoint.clone(), Value::from("subnet-1")],
            ..Default::default()
        },
    )
    .unwrap();

    let document = rendered_json(&set);
    assert_eq!(
        document["Resources"]["Endpoint"],
        json!({"Type": "Example::Endpoint", "Properties": {"Url": {"Fn::Sub": "${AWS::StackName}-endpoint"}}})
    );
    assert_eq!(
        document["Resources"]["Cluster"]["Properties"]["SubnetIds"],
        json!([{"Ref": "Endpoint"}, "subnet-1"])
    );
}

#[test]
fn test_round_trip_through_envelope() {
    let cluster = Cluster {
        name: Some(Value::sub("${AWS::StackName}-cluster")),
        version: Some(Value::from("1.10")),
        subnet_ids: vec![Value::reference("SubnetA"), Value::reference("SubnetB")],
        tags: vec![Tag::new("env", "dev")],
    };
    assert_eq!(Cluster::from_envelope(&cluster.to_envelope().unwrap()).unwrap(), cluster);

    let empty = Cluster::default();
    assert_eq!(Cluster::from_envelope(&empty.to_envelope().unwrap()).unwrap(), empty);
}

#[test]
fn test_render_parse_render_is_lossless() {
    let mut set = ResourceSet::new();
    set.set_description("EKS cluster");
    set.new_number_parameter("NodeCount", Some("3")).unwrap();
    set.new_resource("ControlPlane", Cluster::default()).unwrap();
    set.new_raw_resource(
        "Bucket",
        "Vendor::Bucket",
        json!({"Versioning": {"Status": "Enabled"}, "Extra": [1, 2, 3]}),
    )
    .unwrap();
    set.new_exported_output("ClusterArn", Value::get_att("ControlPlane", "Arn"))
        .unwrap()
        .describe("Cluster ARN");

    let first = set.render_json().unwrap();
    let parsed = Template::from_json(&first).unwrap();
    let second = parsed.render_json().unwrap();

    assert_eq!(String::from_utf8(first).unwrap(), String::from_utf8(second).unwrap());
    assert!(parsed.resources.values().all(|entry| !entry.is_typed()));
}

#[test]
fn test_parsed_template_queried_by_kind() {
    let document = json!({
        "Resources": {
            "Good": {"Type": "Example::Cluster", "Properties": {"Name": "good"}},
            "Bad": {"Type": "Example::Cluster", "Properties": {"SubnetIds": {"not": "a list"}}},
            "Api": {"Type": "Example::Endpoint"}
        }
    });
    let template = Template::from_json(document.to_string().as_bytes()).unwrap();

    let clusters = template.all_of_kind::<Cluster>();
    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters["Good"].name, Some(Value::from("good")));

    let err = template.by_name::<Cluster>("Bad").unwrap_err();
    assert!(matches!(
        err,
        TemplateError::ResourceNotFound { reason: LookupFailure::Malformed(_), .. }
    ));

    assert_eq!(template.by_name::<Endpoint>("Api").unwrap(), Endpoint::default());
    assert!(template.by_name::<Endpoint>("Good").is_err());
}

#[test]
fn test_upgrade_then_query() {
    let mut catalog = KindCatalog::new();
    catalog.register::<Cluster>().register::<Endpoint>();

    let mut template = Template::from_yaml(
        r#"
Resources:
  ControlPlane:
    Type: Example::Cluster
    Properties:
      Name: prod
  Endpoint:
    Type: Example::Endpoint
    Properties:
      Url:
        Fn::Sub: "${AWS::StackName}-api"
  Unknown:
    Type: Vendor::Thing
"#,
    )
    .unwrap();

    assert_eq!(template.upgrade_with(&catalog), 2);
    assert!(template.resources["ControlPlane"].is_typed());
    assert!(!template.resources["Unknown"].is_typed());

    let endpoint: Endpoint = template.by_name("Endpoint").unwrap();
    assert_eq!(endpoint.url, Some(make_name("api")));
}

#[test]
fn test_render_determinism_yaml_and_json() {
    let mut set = ResourceSet::new();
    for name in ["Zeta", "Alpha", "Mid"] {
        set.new_resource(name, Cluster::default()).unwrap();
    }

    assert_eq!(set.render_json().unwrap(), set.render_json().unwrap());
    assert_eq!(set.render_yaml().unwrap(), set.render_yaml().unwrap());

    let names: Vec<_> = set.template().resources.keys().cloned().collect();
    assert_eq!(names, vec!["Zeta", "Alpha", "Mid"]);
}

#[test]
fn test_template_from_file() {
    let dir = tempdir().unwrap();

    let mut set = ResourceSet::new();
    set.new_resource("ControlPlane", Cluster::default()).unwrap();

    let json_path = dir.path().join("stack.json");
    fs::write(&json_path, set.render_json().unwrap()).unwrap();
    let yaml_path = dir.path().join("stack.yaml");
    fs::write(&yaml_path, set.render_yaml().unwrap()).unwrap();

    let from_json = Template::from_file(&json_path).unwrap();
    let from_yaml = Template::from_file(&yaml_path).unwrap();

    let expected = Cluster {
        tags: vec![make_auto_name_tag("ControlPlane")],
        ..Default::default()
    };
    assert_eq!(from_json.by_name::<Cluster>("ControlPlane").unwrap(), expected);
    assert_eq!(from_yaml.by_name::<Cluster>("ControlPlane").unwrap(), expected);

    assert!(matches!(
        Template::from_file(&dir.path().join("missing.json")),
        Err(TemplateError::Io(_))
    ));
}

#[test]
fn test_collect_outputs_after_deploy() {
    let mut set = ResourceSet::new();
    set.new_output("ClusterName", Value::reference("ControlPlane"))
        .unwrap();
    set.new_output_from_att("Endpoint", "ControlPlane", "Endpoint")
        .unwrap();

    let outputs = set
        .collect_outputs(&[
            StackOutput::new("Endpoint", "https://example.com"),
            StackOutput::new("ClusterName", "prod"),
        ])
        .unwrap();

    assert_eq!(outputs["ClusterName"], "prod");
    assert_eq!(outputs["Endpoint"], "https://example.com");
}
