//! Public entry point and the `JsonConverter` routing generated unions to
//! their decoding constructors. Writing unions is not supported.

use super::{CSharpRenderer, RenderError, CONVERTER_CLASS, ENTRY_CLASS};
use crate::source::SourceWriter;

impl CSharpRenderer<'_> {
    pub fn emit_entry_point(&self, w: &mut SourceWriter) -> Result<(), RenderError> {
        let top = self.render_type(&self.graph.top_level)?;
        let settings = if self.names.has_unions() {
            format!(", {CONVERTER_CLASS}.Settings")
        } else {
            String::new()
        };
        w.block(format!("public static class {ENTRY_CLASS}"), |w| {
            w.line(format!(
                "public static {top} FromJson(string json) => JsonConvert.DeserializeObject<{top}>(json{settings});"
            ));
        });
        Ok(())
    }

    pub fn emit_converter(&self, w: &mut SourceWriter) -> Result<(), RenderError> {
        let unions = self
            .names
            .unions()
            .map(|set| {
                self.names
                    .union(set)
                    .ok_or_else(|| RenderError::UnregisteredUnion(set.iter().cloned().collect()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        w.block(format!("internal class {CONVERTER_CLASS} : JsonConverter"), |w| {
            let checks = unions.iter().map(|n| format!("t == typeof({n})")).collect::<Vec<_>>();
            w.line(format!("public override bool CanConvert(Type t) => {};", checks.join(" || ")));
            w.blank();
            w.block(
                "public override object ReadJson(JsonReader reader, Type t, object existingValue, JsonSerializer serializer)",
                |w| {
                    for name in &unions {
                        w.line(format!("if (t == typeof({name}))"));
                        w.indented(|w| w.line(format!("return new {name}(reader, serializer);")));
                    }
                    w.line("throw new Exception(\"Unknown type\");");
                },
            );
            w.blank();
            w.block("public override void WriteJson(JsonWriter writer, object value, JsonSerializer serializer)", |w| {
                w.line("throw new NotImplementedException();");
            });
            w.blank();
            w.line("public static readonly JsonSerializerSettings Settings = new JsonSerializerSettings");
            w.line("{");
            w.indented(|w| {
                w.line("MetadataPropertyHandling = MetadataPropertyHandling.Ignore,");
                w.line(format!("Converters = {{ new {CONVERTER_CLASS}() }},"));
            });
            w.line("};");
        });
        Ok(())
    }
}
