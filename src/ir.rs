// Typed IR consumed by the emitter. Built elsewhere, read-only here.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::naming;

/// Reference to a class definition: its index in [`Graph::classes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassRef(pub usize);

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IrType {
    Nothing,                 // no samples seen
    Null,
    Bool,
    Integer,
    Double,
    String,
    Array(Box<IrType>),
    Map(Box<IrType>),        // string-keyed
    Class(ClassRef),
    Union(UnionSet),
}

impl IrType {
    pub fn array(inner: IrType) -> Self { IrType::Array(Box::new(inner)) }
    pub fn map(inner: IrType) -> Self { IrType::Map(Box::new(inner)) }
    pub fn class(index: usize) -> Self { IrType::Class(ClassRef(index)) }
}

/// A set of at least two distinct, non-union alternatives.
///
/// Iteration follows the derived `Ord` of [`IrType`], which is what the
/// decoder means by "first array alternative" and friends.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<IrType>", into = "Vec<IrType>")]
pub struct UnionSet(BTreeSet<IrType>);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnionError {
    #[error("a union needs at least two distinct alternatives, got {0}")]
    TooFewAlternatives(usize),
    #[error("a union alternative cannot itself be a union")]
    NestedUnion,
}

impl UnionSet {
    pub fn new<I: IntoIterator<Item = IrType>>(alternatives: I) -> Result<Self, UnionError> {
        let set: BTreeSet<IrType> = alternatives.into_iter().collect();
        if set.iter().any(|t| matches!(t, IrType::Union(_))) {
            return Err(UnionError::NestedUnion);
        }
        if set.len() < 2 {
            return Err(UnionError::TooFewAlternatives(set.len()));
        }
        Ok(Self(set))
    }
    pub fn iter(&self) -> impl Iterator<Item = &IrType> { self.0.iter() }
    pub fn len(&self) -> usize { self.0.len() }
    pub fn contains(&self, t: &IrType) -> bool { self.0.contains(t) }
    pub fn has_null(&self) -> bool { self.0.contains(&IrType::Null) }
    pub fn non_null(&self) -> impl Iterator<Item = &IrType> {
        self.0.iter().filter(|t| !matches!(t, IrType::Null))
    }

    /// `T` when this union is exactly `{T, Null}`.
    pub fn nullable_member(&self) -> Option<&IrType> {
        if self.0.len() != 2 || !self.has_null() {
            return None;
        }
        self.non_null().next()
    }
}

impl TryFrom<Vec<IrType>> for UnionSet {
    type Error = UnionError;
    fn try_from(v: Vec<IrType>) -> Result<Self, Self::Error> { Self::new(v) }
}

impl From<UnionSet> for Vec<IrType> {
    fn from(u: UnionSet) -> Self { u.0.into_iter().collect() }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassDef {
    /// Candidate names merged from inference; see [`ClassDef::base_name`].
    pub names: BTreeSet<String>,
    /// Keyed by the raw JSON property name; iteration is key order.
    #[serde(default)]
    pub properties: BTreeMap<String, IrType>,
}

/// Shortest styled common prefix worth keeping as a combined class name.
const MIN_COMBINED_PREFIX: usize = 3;

impl ClassDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { names: BTreeSet::from([name.into()]), properties: BTreeMap::new() }
    }

    pub fn with_property(mut self, key: impl Into<String>, ty: IrType) -> Self {
        self.properties.insert(key.into(), ty);
        self
    }

    /// Combine the candidate names into one base name.
    pub fn base_name(&self) -> String {
        let mut it = self.names.iter();
        let Some(first) = it.next() else { return String::new() };
        if self.names.len() == 1 {
            return first.clone();
        }
        let styled: Vec<String> = self.names.iter().map(|n| naming::style(n)).collect();
        let prefix = common_prefix(&styled);
        if prefix.chars().count() >= MIN_COMBINED_PREFIX {
            prefix
        } else {
            first.clone()
        }
    }
}

fn common_prefix(names: &[String]) -> String {
    let Some((head, rest)) = names.split_first() else { return String::new() };
    let mut out = String::new();
    'chars: for (i, c) in head.chars().enumerate() {
        for other in rest {
            if other.chars().nth(i) != Some(c) { break 'chars; }
        }
        out.push(c);
    }
    out
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    #[serde(default)]
    pub classes: Vec<ClassDef>,
    pub top_level: IrType,
}

#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("at JSON path {path}: {message}")]
    Decode { path: String, message: String },
    #[error("class reference {index} is out of range ({count} classes defined), at {site}")]
    DanglingClass { index: usize, count: usize, site: String },
}

impl Graph {
    pub fn class(&self, r: ClassRef) -> Option<&ClassDef> { self.classes.get(r.0) }

    pub fn class_refs(&self) -> impl Iterator<Item = (ClassRef, &ClassDef)> {
        self.classes.iter().enumerate().map(|(i, c)| (ClassRef(i), c))
    }

    /// Decode a graph from JSON text and validate it.
    pub fn from_json_str(src: &str) -> Result<Self, GraphError> {
        let graph: Graph = crate::path_de::from_str_with_path(src)?;
        graph.validate()?;
        Ok(graph)
    }

    /// Every class reference must resolve.
    pub fn validate(&self) -> Result<(), GraphError> {
        self.check(&self.top_level, "top_level")?;
        for (r, class) in self.class_refs() {
            for (key, ty) in &class.properties {
                self.check(ty, &format!("classes[{}].properties[{key:?}]", r.0))?;
            }
        }
        Ok(())
    }

    fn check(&self, t: &IrType, site: &str) -> Result<(), GraphError> {
        match t {
            IrType::Class(r) if r.0 >= self.classes.len() => Err(GraphError::DanglingClass {
                index: r.0,
                count: self.classes.len(),
                site: site.to_string(),
            }),
            IrType::Array(inner) | IrType::Map(inner) => self.check(inner, site),
            IrType::Union(u) => u.iter().try_for_each(|alt| self.check(alt, site)),
            _ => Ok(()),
        }
    }

    /// Each non-nullable union reachable from the graph, deduplicated, in
    /// first-encounter order: class properties (class order, key order), then
    /// the top-level type.
    pub fn unions(&self) -> indexmap::IndexSet<UnionSet> {
        let mut out = indexmap::IndexSet::new();
        for class in &self.classes {
            for ty in class.properties.values() {
                collect_unions(ty, &mut out);
            }
        }
        collect_unions(&self.top_level, &mut out);
        out
    }
}

fn collect_unions(t: &IrType, out: &mut indexmap::IndexSet<UnionSet>) {
    match t {
        IrType::Array(inner) | IrType::Map(inner) => collect_unions(inner, out),
        IrType::Union(u) => {
            for alt in u.iter() {
                collect_unions(alt, out);
            }
            if u.nullable_member().is_none() {
                out.insert(u.clone());
            }
        }
        _ => {}
    }
}
