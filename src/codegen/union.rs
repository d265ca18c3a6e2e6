//! Generated union structs: one nullable field per non-null alternative and
//! a constructor that decodes from the reader's current token.

use super::unions::{DecodePlan, Target};
use super::{CSharpRenderer, RenderError};
use crate::ir::{IrType, UnionSet};
use crate::source::SourceWriter;

impl CSharpRenderer<'_> {
    pub fn emit_union(&self, w: &mut SourceWriter, set: &UnionSet) -> Result<(), RenderError> {
        let unregistered = || RenderError::UnregisteredUnion(set.iter().cloned().collect());
        let name = self.names.union(set).ok_or_else(unregistered)?;
        let fields = self.names.union_fields(set).ok_or_else(unregistered)?;
        let field_name = |alt: &IrType| {
            fields.lookup(alt).ok_or_else(|| RenderError::UnregisteredField {
                union: name.to_string(),
                alternative: alt.clone(),
            })
        };
        let plan = DecodePlan::new(set);

        w.block(format!("public struct {name}"), |w| -> Result<(), RenderError> {
            for alt in set.non_null() {
                w.line(format!("public {} {};", self.render_nullable(alt)?, field_name(alt)?));
            }
            w.blank();
            w.block(
                format!("public {name}(JsonReader reader, JsonSerializer serializer)"),
                |w| -> Result<(), RenderError> {
                    for alt in set.non_null() {
                        w.line(format!("{} = null;", field_name(alt)?));
                    }
                    w.blank();
                    w.block("switch (reader.TokenType)", |w| -> Result<(), RenderError> {
                        for arm in &plan.arms {
                            for token in &arm.tokens {
                                w.line(format!("case {}:", token.csharp()));
                            }
                            w.indented(|w| -> Result<(), RenderError> {
                                if let Target::Field(alt) = &arm.target {
                                    w.line(format!(
                                        "{} = serializer.Deserialize<{}>(reader);",
                                        field_name(alt)?,
                                        self.render_type(alt)?
                                    ));
                                }
                                w.line("return;");
                                Ok(())
                            })?;
                        }
                        Ok(())
                    })?;
                    w.line(format!("throw new Exception(\"Cannot convert {name}\");"));
                    Ok(())
                },
            )
        })
    }
}
