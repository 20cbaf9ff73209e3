//! Template values: literals, references and intrinsic functions.
//!
//! A [`Value`] is what every resource property, output and tag holds. Literals
//! render bare; everything else renders as a single-key intrinsic function
//! object such as `{"Ref": "Vpc"}` or `{"Fn::Sub": "${AWS::StackName}-vpc"}`.

use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

/// Pseudo parameters resolved by the provisioning engine at deploy time.
pub mod pseudo {
    /// Name of the enclosing stack.
    pub const STACK_NAME: &str = "AWS::StackName";
    pub const STACK_ID: &str = "AWS::StackId";
    pub const REGION: &str = "AWS::Region";
    pub const ACCOUNT_ID: &str = "AWS::AccountId";
    pub const PARTITION: &str = "AWS::Partition";
    pub const URL_SUFFIX: &str = "AWS::URLSuffix";
}

/// A template value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Number(serde_json::Number),
    Bool(bool),
    /// `{"Ref": name}` - a parameter or resource logical name.
    Ref(String),
    /// `{"Fn::Sub": template}` - a string with `${name}` placeholders.
    Sub(String),
    /// `{"Fn::GetAtt": [resource, attribute]}`
    GetAtt { resource: String, attribute: String },
    /// `{"Fn::Join": [delimiter, [values...]]}`
    Join { delimiter: String, values: Vec<Value> },
    /// `{"Fn::ImportValue": value}`
    ImportValue(Box<Value>),
}

impl Value {
    pub fn reference(name: impl Into<String>) -> Self {
        Value::Ref(name.into())
    }

    pub fn sub(template: impl Into<String>) -> Self {
        Value::Sub(template.into())
    }

    pub fn get_att(resource: impl Into<String>, attribute: impl Into<String>) -> Self {
        Value::GetAtt {
            resource: resource.into(),
            attribute: attribute.into(),
        }
    }

    pub fn join(delimiter: impl Into<String>, values: Vec<Value>) -> Self {
        Value::Join {
            delimiter: delimiter.into(),
            values,
        }
    }

    pub fn import(value: impl Into<Value>) -> Self {
        Value::ImportValue(Box::new(value.into()))
    }

    /// Whether this is a bare literal rather than an intrinsic function.
    pub fn is_literal(&self) -> bool {
        matches!(self, Value::String(_) | Value::Number(_) | Value::Bool(_))
    }

    /// The logical name this value refers to, if it is a `Ref`.
    pub fn as_ref_name(&self) -> Option<&str> {
        match self {
            Value::Ref(name) => Some(name),
            _ => None,
        }
    }

    fn from_intrinsic(key: &str, inner: serde_json::Value) -> Result<Self, String> {
        use serde_json::Value as Json;

        match (key, inner) {
            ("Ref", Json::String(name)) => Ok(Value::Ref(name)),
            ("Fn::Sub", Json::String(template)) => Ok(Value::Sub(template)),
            ("Fn::GetAtt", Json::String(dotted)) => match dotted.split_once('.') {
                Some((resource, attribute)) => Ok(Value::get_att(resource, attribute)),
                None => Err(format!("Fn::GetAtt expects Resource.Attribute, got {}", dotted)),
            },
            ("Fn::GetAtt", Json::Array(parts)) => match parts.as_slice() {
                [Json::String(resource), Json::String(attribute)] => {
                    Ok(Value::get_att(resource.as_str(), attribute.as_str()))
                }
                _ => Err("Fn::GetAtt expects [resource, attribute]".to_string()),
            },
            ("Fn::Join", Json::Array(parts)) => {
                let mut parts = parts.into_iter();
                match (parts.next(), parts.next(), parts.next()) {
                    (Some(Json::String(delimiter)), Some(Json::Array(items)), None) => {
                        let values = items
                            .into_iter()
                            .map(Value::try_from)
                            .collect::<Result<Vec<_>, _>>()?;
                        Ok(Value::Join { delimiter, values })
                    }
                    _ => Err("Fn::Join expects [delimiter, [values...]]".to_string()),
                }
            }
            ("Fn::ImportValue", inner) => Ok(Value::ImportValue(Box::new(Value::try_from(inner)?))),
            (key, inner) => Err(format!("unsupported intrinsic {} with argument {}", key, inner)),
        }
    }
}

impl TryFrom<serde_json::Value> for Value {
    type Error = String;

    fn try_from(raw: serde_json::Value) -> Result<Self, Self::Error> {
        use serde_json::Value as Json;

        match raw {
            Json::String(s) => Ok(Value::String(s)),
            Json::Number(n) => Ok(Value::Number(n)),
            Json::Bool(b) => Ok(Value::Bool(b)),
            Json::Object(map) => {
                let mut entries = map.into_iter();
                match (entries.next(), entries.next()) {
                    (Some((key, inner)), None) => Value::from_intrinsic(&key, inner),
                    _ => Err("expected a single-key intrinsic function object".to_string()),
                }
            }
            other => Err(format!("unsupported template value: {}", other)),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n.into())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

fn single_entry<S, T>(serializer: S, key: &str, value: &T) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Serialize + ?Sized,
{
    let mut map = serializer.serialize_map(Some(1))?;
    map.serialize_entry(key, value)?;
    map.end()
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::String(s) => serializer.serialize_str(s),
            Value::Number(n) => n.serialize(serializer),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Ref(name) => single_entry(serializer, "Ref", name),
            Value::Sub(template) => single_entry(serializer, "Fn::Sub", template),
            Value::GetAtt {
                resource,
                attribute,
            } => single_entry(serializer, "Fn::GetAtt", &[resource, attribute]),
            Value::Join { delimiter, values } => {
                single_entry(serializer, "Fn::Join", &(delimiter, values))
            }
            Value::ImportValue(inner) => single_entry(serializer, "Fn::ImportValue", inner.as_ref()),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        Value::try_from(raw).map_err(de::Error::custom)
    }
}

/// A `{Key, Value}` tag pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Tag {
    pub key: Value,
    pub value: Value,
}

impl Tag {
    pub fn new(key: impl Into<Value>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}
