//! IR type → C# type expression.

use super::{CSharpRenderer, RenderError};
use crate::ir::IrType;

/// C# value types need an explicit `?` to hold null.
pub fn is_value_type(t: &IrType) -> bool {
    matches!(t, IrType::Bool | IrType::Integer | IrType::Double)
}

impl CSharpRenderer<'_> {
    /// Type expression for `t`. Reads the registry, never writes it.
    pub fn render_type(&self, t: &IrType) -> Result<String, RenderError> {
        Ok(match t {
            IrType::Nothing | IrType::Null => "object".to_string(),
            IrType::Bool => "bool".to_string(),
            IrType::Integer => "long".to_string(),
            IrType::Double => "double".to_string(),
            IrType::String => "string".to_string(),
            IrType::Array(inner) => format!("{}[]", self.render_type(inner)?),
            IrType::Map(inner) => format!("Dictionary<string, {}>", self.render_type(inner)?),
            IrType::Class(r) => self
                .names
                .class(*r)
                .ok_or(RenderError::UnregisteredClass(r.0))?
                .to_string(),
            IrType::Union(set) => match set.nullable_member() {
                Some(inner) => self.render_nullable(inner)?,
                None => self
                    .names
                    .union(set)
                    .ok_or_else(|| RenderError::UnregisteredUnion(set.iter().cloned().collect()))?
                    .to_string(),
            },
        })
    }

    /// Like [`Self::render_type`], marked nullable when `t` is a value type.
    pub fn render_nullable(&self, t: &IrType) -> Result<String, RenderError> {
        let rendered = self.render_type(t)?;
        Ok(if is_value_type(t) { format!("{rendered}?") } else { rendered })
    }
}
