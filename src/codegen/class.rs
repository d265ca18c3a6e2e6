//! Plain record types. Decoding is left to the serializer: each member's
//! declared type is unambiguous, unions included.

use super::{CSharpRenderer, RenderError};
use crate::ir::{ClassDef, ClassRef};
use crate::naming::csharp_string_escape;
use crate::source::SourceWriter;

impl CSharpRenderer<'_> {
    pub fn emit_class(&self, w: &mut SourceWriter, r: ClassRef, class: &ClassDef) -> Result<(), RenderError> {
        let name = self.names.class(r).ok_or(RenderError::UnregisteredClass(r.0))?;
        let scope = self.names.properties(r).ok_or(RenderError::UnregisteredClass(r.0))?;
        w.block(format!("public partial class {name}"), |w| -> Result<(), RenderError> {
            for (key, ty) in &class.properties {
                let member = scope.lookup(key).ok_or_else(|| RenderError::UnregisteredProperty {
                    class: r.0,
                    key: key.clone(),
                })?;
                w.line(format!("[JsonProperty(\"{}\")]", csharp_string_escape(key)));
                w.line(format!("public {} {member} {{ get; set; }}", self.render_type(ty)?));
                w.blank();
            }
            Ok(())
        })
    }
}
