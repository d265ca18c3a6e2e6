//! C# (Newtonsoft.Json) renderer.
//!
//! One pass over an immutable [`Graph`]:
//!
//! 1. [`Names::build`] allocates every identifier up front.
//! 2. The entry point, the union converter (only when generated unions
//!    exist), each class and each generated union are written in that
//!    order, inside one namespace block.
//!
//! Rendering only reads the registry, so output is byte-identical for the
//! same graph and forward references always agree with declarations.
pub mod class;
pub mod converter;
pub mod types;
pub mod union;
pub mod unions;

use crate::ir::{Graph, IrType};
use crate::naming::{self, Names};
use crate::source::SourceWriter;

/// Static class holding the generated `FromJson` entry point.
pub const ENTRY_CLASS: &str = "JsonParser";
/// `JsonConverter` subclass dispatching to generated unions.
pub const CONVERTER_CLASS: &str = "Converter";

/// Names the generated code relies on; no generated type may take them.
pub const FORBIDDEN_NAMES: &[&str] = &[
    ENTRY_CLASS,
    CONVERTER_CLASS,
    "JsonConverter",
    "JsonConvert",
    "JsonSerializer",
    "JsonSerializerSettings",
    "JsonReader",
    "JsonWriter",
    "JsonToken",
    "JsonProperty",
    "Type",
    "Exception",
    "NotImplementedException",
    "Dictionary",
    "MetadataPropertyHandling",
    "Newtonsoft",
    "System",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Enclosing C# namespace.
    pub namespace: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { namespace: "QuickType".to_string() }
    }
}

impl RenderOptions {
    /// The namespace as written in the output.
    pub fn namespace_ident(&self) -> String {
        legal_namespace(&self.namespace)
    }

    pub fn forbidden_names(&self) -> Vec<String> {
        let namespace = self.namespace_ident();
        FORBIDDEN_NAMES
            .iter()
            .map(|s| s.to_string())
            .chain(namespace.split('.').map(str::to_string))
            .collect()
    }
}

/// Legalize each dotted segment of a namespace: `"my models.2nd"` becomes
/// `my_models._2nd`.
pub fn legal_namespace(raw: &str) -> String {
    raw.split('.').map(naming::legalize).collect::<Vec<_>>().join(".")
}

/// Programmer errors: the registry has no name for something in the graph.
/// Only reachable with a graph that failed [`Graph::validate`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("class {0} has no registered name")]
    UnregisteredClass(usize),
    #[error("union {0:?} has no registered name")]
    UnregisteredUnion(Vec<IrType>),
    #[error("property {key:?} of class {class} has no registered name")]
    UnregisteredProperty { class: usize, key: String },
    #[error("alternative {alternative:?} of union {union} has no registered field")]
    UnregisteredField { union: String, alternative: IrType },
}

/// Render `graph` as one C# source file.
pub fn render(graph: &Graph, options: &RenderOptions) -> Result<String, RenderError> {
    let names = Names::build(graph, options.forbidden_names());
    CSharpRenderer::new(graph, &names, options).render()
}

pub struct CSharpRenderer<'a> {
    graph: &'a Graph,
    names: &'a Names,
    options: &'a RenderOptions,
}

impl<'a> CSharpRenderer<'a> {
    pub fn new(graph: &'a Graph, names: &'a Names, options: &'a RenderOptions) -> Self {
        Self { graph, names, options }
    }

    pub fn render(&self) -> Result<String, RenderError> {
        let mut w = SourceWriter::new();
        self.emit_header(&mut w);
        w.block(format!("namespace {}", self.options.namespace_ident()), |w| -> Result<(), RenderError> {
            w.line("using System;");
            w.line("using System.Collections.Generic;");
            w.blank();
            w.line("using Newtonsoft.Json;");
            w.blank();
            self.emit_entry_point(w)?;
            if self.names.has_unions() {
                w.blank();
                self.emit_converter(w)?;
            }
            for (r, class) in self.graph.class_refs() {
                w.blank();
                self.emit_class(w, r, class)?;
            }
            for set in self.names.unions() {
                w.blank();
                self.emit_union(w, set)?;
            }
            Ok(())
        })?;
        tracing::debug!(
            classes = self.graph.classes.len(),
            unions = self.names.unions().count(),
            "rendered C# source"
        );
        Ok(w.into_string())
    }

    fn emit_header(&self, w: &mut SourceWriter) {
        w.line("// To parse this JSON data, add NuGet 'Newtonsoft.Json' then do:");
        w.line("//");
        w.line(format!("//    using {};", self.options.namespace_ident()));
        w.line("//");
        w.line(format!("//    var data = {ENTRY_CLASS}.FromJson(jsonString);"));
        w.line("//");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{ClassDef, UnionSet};

    fn union(alts: impl IntoIterator<Item = IrType>) -> IrType {
        IrType::Union(UnionSet::new(alts).unwrap())
    }

    fn sample_graph() -> Graph {
        Graph {
            classes: vec![
                ClassDef::new("top level")
                    .with_property("id", IrType::Integer)
                    .with_property("score", union([IrType::Double, IrType::Null]))
                    .with_property("value", union([IrType::Integer, IrType::String, IrType::Null]))
                    .with_property("items", IrType::array(IrType::class(1)))
                    .with_property("extra", IrType::map(IrType::Nothing)),
                ClassDef::new("item")
                    .with_property("name", IrType::String)
                    .with_property("flag", union([IrType::Bool, IrType::Null])),
            ],
            top_level: IrType::class(0),
        }
    }

    #[test]
    fn renders_whole_file_in_order() {
        let src = render(&sample_graph(), &RenderOptions::default()).unwrap();
        let expected = r#"// To parse this JSON data, add NuGet 'Newtonsoft.Json' then do:
//
//    using QuickType;
//
//    var data = JsonParser.FromJson(jsonString);
//
namespace QuickType
{
    using System;
    using System.Collections.Generic;

    using Newtonsoft.Json;

    public static class JsonParser
    {
        public static TopLevel FromJson(string json) => JsonConvert.DeserializeObject<TopLevel>(json, Converter.Settings);
    }

    internal class Converter : JsonConverter
    {
        public override bool CanConvert(Type t) => t == typeof(IntegerOrString);

        public override object ReadJson(JsonReader reader, Type t, object existingValue, JsonSerializer serializer)
        {
            if (t == typeof(IntegerOrString))
                return new IntegerOrString(reader, serializer);
            throw new Exception("Unknown type");
        }

        public override void WriteJson(JsonWriter writer, object value, JsonSerializer serializer)
        {
            throw new NotImplementedException();
        }

        public static readonly JsonSerializerSettings Settings = new JsonSerializerSettings
        {
            MetadataPropertyHandling = MetadataPropertyHandling.Ignore,
            Converters = { new Converter() },
        };
    }

    public partial class TopLevel
    {
        [JsonProperty("extra")]
        public Dictionary<string, object> Extra { get; set; }

        [JsonProperty("id")]
        public long Id { get; set; }

        [JsonProperty("items")]
        public Item[] Items { get; set; }

        [JsonProperty("score")]
        public double? Score { get; set; }

        [JsonProperty("value")]
        public IntegerOrString Value { get; set; }
    }

    public partial class Item
    {
        [JsonProperty("flag")]
        public bool? Flag { get; set; }

        [JsonProperty("name")]
        public string Name { get; set; }
    }

    public struct IntegerOrString
    {
        public long? Integer;
        public string String;

        public IntegerOrString(JsonReader reader, JsonSerializer serializer)
        {
            Integer = null;
            String = null;

            switch (reader.TokenType)
            {
                case JsonToken.Null:
                    return;
                case JsonToken.Integer:
                    Integer = serializer.Deserialize<long>(reader);
                    return;
                case JsonToken.String:
                case JsonToken.Date:
                    String = serializer.Deserialize<string>(reader);
                    return;
            }
            throw new Exception("Cannot convert IntegerOrString");
        }
    }
}
"#;
        assert_eq!(src, expected);
    }

    #[test]
    fn rendering_is_deterministic() {
        let graph = sample_graph();
        let options = RenderOptions::default();
        assert_eq!(render(&graph, &options).unwrap(), render(&graph, &options).unwrap());
    }

    #[test]
    fn converter_is_omitted_without_unions() {
        let graph = Graph {
            classes: vec![ClassDef::new("a").with_property("b", union([IrType::Integer, IrType::Null]))],
            top_level: IrType::array(IrType::class(0)),
        };
        let src = render(&graph, &RenderOptions::default()).unwrap();
        assert!(!src.contains("JsonConverter"), "{src}");
        assert!(!src.contains("Converter.Settings"), "{src}");
        assert!(src.contains("public static A[] FromJson(string json) => JsonConvert.DeserializeObject<A[]>(json);"));
        assert!(src.contains("public long? B { get; set; }"));
    }

    #[test]
    fn forbidden_names_round_trip_through_annotations() {
        let graph = Graph {
            classes: vec![
                ClassDef::new("converter")
                    .with_property("Type", IrType::String)
                    .with_property("Converter", IrType::class(0))
                    .with_property("u", union([IrType::Bool, IrType::Double])),
            ],
            top_level: IrType::class(0),
        };
        let src = render(&graph, &RenderOptions::default()).unwrap();
        assert!(src.contains("public partial class OtherConverter"), "{src}");
        assert!(src.contains("[JsonProperty(\"Type\")]\n        public string Type { get; set; }"), "{src}");
        assert!(src.contains("[JsonProperty(\"Converter\")]\n        public OtherConverter Converter { get; set; }"), "{src}");
        assert!(src.contains("internal class Converter : JsonConverter"), "{src}");
        assert!(src.contains("t == typeof(BoolOrDouble)"), "{src}");
    }

    #[test]
    fn namespace_name_is_reserved() {
        let graph = Graph { classes: vec![ClassDef::new("models")], top_level: IrType::class(0) };
        let options = RenderOptions { namespace: "Models".into() };
        let src = render(&graph, &options).unwrap();
        assert!(src.starts_with("// To parse"));
        assert!(src.contains("namespace Models\n{"));
        assert!(src.contains("public partial class OtherModels"));
    }

    #[test]
    fn namespace_segments_are_legalized() {
        assert_eq!(legal_namespace("Acme.Models"), "Acme.Models");
        assert_eq!(legal_namespace("my models"), "my_models");
        assert_eq!(legal_namespace("acme.2nd.$gen"), "acme._2nd.__gen");
        assert_eq!(legal_namespace("a..b"), "a.Empty.b");

        let graph = Graph { classes: vec![ClassDef::new("acme")], top_level: IrType::class(0) };
        let options = RenderOptions { namespace: "Acme.my models".into() };
        let src = render(&graph, &options).unwrap();
        assert!(src.contains("//    using Acme.my_models;\n"), "{src}");
        assert!(src.contains("namespace Acme.my_models\n{"), "{src}");
        // each segment is reserved, so the class cannot shadow the outer namespace
        assert!(src.contains("public partial class OtherAcme"), "{src}");
    }

    #[test]
    fn dangling_reference_aborts() {
        let graph = Graph { classes: vec![], top_level: IrType::class(4) };
        assert_eq!(render(&graph, &RenderOptions::default()), Err(RenderError::UnregisteredClass(4)));
    }
}
