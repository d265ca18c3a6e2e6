//! Render typed IR graphs of inferred JSON shapes as C# data types with
//! Newtonsoft.Json marshalling, including token-driven decoders for unions.
pub mod cli;
pub mod codegen;
pub mod ir;
pub mod naming;
pub mod path_de;
pub mod source;

pub use codegen::{render, RenderError, RenderOptions};
pub use ir::{ClassDef, ClassRef, Graph, GraphError, IrType, UnionSet};
