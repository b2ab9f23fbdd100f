// values.rs
use anyhow::{Result, anyhow, bail};
use serde_json::Value as JsonValue;

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Map(Vec<(String, Value)>),
    Object(Object),
    Handle(Handle),
}

/// Structured object: a class name plus ordered properties.
#[derive(Clone, Debug, PartialEq)]
pub struct Object {
    pub class: String,
    pub props: Vec<(String, Value)>,
}

/// Open external resource, e.g. a file or stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Handle {
    pub id: u64,
    pub kind: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind { Null, Bool, Int, Float, Str, List, Map, Object, Handle }

impl Kind {
    pub fn name(self) -> &'static str {
        match self {
            Kind::Null => "null",
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Float => "float",
            Kind::Str => "string",
            Kind::List => "list",
            Kind::Map => "map",
            Kind::Object => "object",
            Kind::Handle => "handle",
        }
    }
}

impl Object {
    pub fn new(class: impl Into<String>) -> Self {
        Self { class: class.into(), props: Vec::new() }
    }

    pub fn with_prop(mut self, name: impl Into<String>, v: Value) -> Self {
        self.props.push((name.into(), v));
        self
    }
}

impl Handle {
    pub fn new(id: u64, kind: impl Into<String>) -> Self {
        Self { id, kind: kind.into() }
    }
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Bool,
            Value::Int(_) => Kind::Int,
            Value::Float(_) => Kind::Float,
            Value::Str(_) => Kind::Str,
            Value::List(_) => Kind::List,
            Value::Map(_) => Kind::Map,
            Value::Object(_) => Kind::Object,
            Value::Handle(_) => Kind::Handle,
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Value::Null | Value::Bool(_) | Value::Int(_) | Value::Float(_) | Value::Str(_)
        )
    }

    /// Numeric view for delta checks. Bool and null are never numeric here.
    pub fn as_number(&self) -> Option<f64> {
        match self { Value::Int(i) => Some(*i as f64), Value::Float(f) => Some(*f), _ => None }
    }

    /// Interprets a command-line literal: JSON when it parses, raw string otherwise.
    pub fn parse_literal(src: &str) -> Result<Value> {
        match serde_json::from_str::<JsonValue>(src) {
            Ok(json) => Value::from_json(&json),
            Err(_) => Ok(Value::Str(src.to_string())),
        }
    }

    pub fn from_json(json: &JsonValue) -> Result<Value> {
        Ok(match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(*b),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if n.is_f64() {
                    Value::Float(n.as_f64().ok_or_else(|| anyhow!("unrepresentable number {n}"))?)
                } else {
                    // u64 above i64::MAX
                    bail!("integer {n} out of range")
                }
            }
            JsonValue::String(s) => Value::Str(s.clone()),
            JsonValue::Array(items) => {
                Value::List(items.iter().map(Value::from_json).collect::<Result<_>>()?)
            }
            JsonValue::Object(map) => {
                if let Some(tag) = map.get("$float") {
                    return special_float(tag);
                }
                if let Some(class) = map.get("$object") {
                    let class = class.as_str().ok_or_else(|| anyhow!("$object needs a class name"))?;
                    let mut obj = Object::new(class);
                    if let Some(props) = map.get("props") {
                        let props = props.as_object().ok_or_else(|| anyhow!("$object props must be a map"))?;
                        for (k, v) in props {
                            obj.props.push((k.clone(), Value::from_json(v)?));
                        }
                    }
                    return Ok(Value::Object(obj));
                }
                if let Some(kind) = map.get("$handle") {
                    let kind = kind.as_str().ok_or_else(|| anyhow!("$handle needs a kind"))?;
                    let id = map.get("id").and_then(|v| v.as_u64()).unwrap_or(0);
                    return Ok(Value::Handle(Handle::new(id, kind)));
                }
                let mut out = Vec::with_capacity(map.len());
                for (k, v) in map {
                    out.push((k.clone(), Value::from_json(v)?));
                }
                Value::Map(out)
            }
        })
    }
}

fn special_float(tag: &JsonValue) -> Result<Value> {
    let f = match tag.as_str() {
        Some("NAN") => f64::NAN,
        Some("INF") => f64::INFINITY,
        Some("-INF") => f64::NEG_INFINITY,
        _ => match tag.as_f64() {
            Some(f) => f,
            None => bail!("$float expects NAN, INF, -INF or a number"),
        },
    };
    Ok(Value::Float(f))
}

impl From<&str> for Value {
    fn from(s: &str) -> Self { Value::Str(s.to_string()) }
}
