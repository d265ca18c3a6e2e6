//! Union model: naming of generated unions and their token-driven decoder.

use std::collections::HashMap;

use serde_json::Value;

use crate::ir::{ClassRef, IrType, UnionSet};
use crate::naming;

/// Joins styled alternative names in a generated union name.
const UNION_NAME_SEPARATOR: &str = "Or";

/// Logical name of a type, before styling. Classes use their allocated name.
pub fn display_name(t: &IrType, class_names: &HashMap<ClassRef, String>) -> String {
    match t {
        IrType::Nothing => "anything".into(),
        IrType::Null => "null".into(),
        IrType::Bool => "bool".into(),
        IrType::Integer => "integer".into(),
        IrType::Double => "double".into(),
        IrType::String => "string".into(),
        IrType::Array(inner) => format!("{}_array", display_name(inner, class_names)),
        IrType::Map(inner) => format!("{}_map", display_name(inner, class_names)),
        IrType::Class(r) => class_names.get(r).cloned().unwrap_or_default(),
        IrType::Union(set) => match set.nullable_member() {
            Some(inner) => format!("nullable_{}", display_name(inner, class_names)),
            None => set
                .non_null()
                .map(|alt| display_name(alt, class_names))
                .collect::<Vec<_>>()
                .join("_or_"),
        },
    }
}

/// `"FooOrIntegerOrString"` for `{Class Foo, Integer, String}`. `Null` does
/// not contribute.
pub fn preferred_type_name(set: &UnionSet, class_names: &HashMap<ClassRef, String>) -> String {
    let mut parts: Vec<String> = set.non_null().map(|alt| display_name(alt, class_names)).collect();
    parts.sort();
    parts.iter().map(|p| naming::style(p)).collect::<Vec<_>>().join(UNION_NAME_SEPARATOR)
}

pub fn preferred_field_name(alt: &IrType, class_names: &HashMap<ClassRef, String>) -> String {
    naming::style(&display_name(alt, class_names))
}

/// `Newtonsoft.Json.JsonToken` kinds the decoder dispatches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Null,
    Integer,
    Float,
    Boolean,
    String,
    Date,
    StartArray,
    StartObject,
}

impl TokenKind {
    pub fn csharp(self) -> &'static str {
        match self {
            TokenKind::Null => "JsonToken.Null",
            TokenKind::Integer => "JsonToken.Integer",
            TokenKind::Float => "JsonToken.Float",
            TokenKind::Boolean => "JsonToken.Boolean",
            TokenKind::String => "JsonToken.String",
            TokenKind::Date => "JsonToken.Date",
            TokenKind::StartArray => "JsonToken.StartArray",
            TokenKind::StartObject => "JsonToken.StartObject",
        }
    }

    /// Kind of the first token a reader would produce for `value`.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => TokenKind::Null,
            Value::Bool(_) => TokenKind::Boolean,
            Value::Number(n) if n.is_i64() || n.is_u64() => TokenKind::Integer,
            Value::Number(_) => TokenKind::Float,
            Value::String(_) => TokenKind::String,
            Value::Array(_) => TokenKind::StartArray,
            Value::Object(_) => TokenKind::StartObject,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Leave every field unset.
    Null,
    /// Decode into the field of this alternative.
    Field(IrType),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arm {
    pub tokens: Vec<TokenKind>,
    pub target: Target,
}

/// Ordered token-kind dispatch for one union. Token kinds not covered by any
/// arm are fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodePlan {
    pub arms: Vec<Arm>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeError {
    #[error("Cannot convert {union}")]
    Unconvertible { union: String },
}

/// Result of decoding one value: at most one populated field.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub field: Option<(IrType, Value)>,
}

impl DecodePlan {
    pub fn new(set: &UnionSet) -> Self {
        let has = |t: IrType| set.contains(&t);
        let mut arms = Vec::new();
        let mut arm = |tokens: Vec<TokenKind>, target: Target| arms.push(Arm { tokens, target });

        if has(IrType::Null) {
            arm(vec![TokenKind::Null], Target::Null);
        }
        if has(IrType::Integer) {
            arm(vec![TokenKind::Integer], Target::Field(IrType::Integer));
        }
        if has(IrType::Double) {
            // An integer literal is a valid double.
            let tokens = if has(IrType::Integer) {
                vec![TokenKind::Float]
            } else {
                vec![TokenKind::Integer, TokenKind::Float]
            };
            arm(tokens, Target::Field(IrType::Double));
        }
        if has(IrType::Bool) {
            arm(vec![TokenKind::Boolean], Target::Field(IrType::Bool));
        }
        if has(IrType::String) {
            arm(vec![TokenKind::String, TokenKind::Date], Target::Field(IrType::String));
        }
        if let Some(array) = set.iter().find(|t| matches!(t, IrType::Array(_))) {
            arm(vec![TokenKind::StartArray], Target::Field(array.clone()));
        }
        let object = set
            .iter()
            .find(|t| matches!(t, IrType::Class(_)))
            .or_else(|| set.iter().find(|t| matches!(t, IrType::Map(_))));
        if let Some(object) = object {
            arm(vec![TokenKind::StartObject], Target::Field(object.clone()));
        }
        Self { arms }
    }

    pub fn route(&self, token: TokenKind) -> Option<&Target> {
        self.arms.iter().find(|a| a.tokens.contains(&token)).map(|a| &a.target)
    }

    /// Evaluate the plan the way the generated decoder does. Composite values
    /// are handed over whole, as the ambient deserializer would consume them.
    pub fn decode(&self, union_name: &str, value: &Value) -> Result<Decoded, DecodeError> {
        let unconvertible = || DecodeError::Unconvertible { union: union_name.to_string() };
        match self.route(TokenKind::of(value)).ok_or_else(unconvertible)? {
            Target::Null => Ok(Decoded { field: None }),
            Target::Field(IrType::Double) => {
                let f = value.as_f64().ok_or_else(unconvertible)?;
                let v = serde_json::Number::from_f64(f).map(Value::Number).ok_or_else(unconvertible)?;
                Ok(Decoded { field: Some((IrType::Double, v)) })
            }
            Target::Field(alt) => Ok(Decoded { field: Some((alt.clone(), value.clone())) }),
        }
    }
}
