//! Name allocation registry.
//!
//! [`Names::build`] allocates every class, union, property and union field
//! name in one pass. Afterwards the registry only answers lookups, so
//! renderers can never ask for a name that was not pre-registered.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use indexmap::IndexMap;
use serde::Serialize;

use crate::codegen::unions;
use crate::ir::{ClassRef, Graph, IrType, UnionSet};

/// One naming scope: the names taken in it and the key each was given to.
#[derive(Debug, Clone)]
pub struct Scope<K> {
    taken: HashSet<String>,
    assigned: IndexMap<K, String>,
}

impl<K: Hash + Eq> Scope<K> {
    pub fn new<I, S>(forbidden: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            taken: forbidden.into_iter().map(Into::into).collect(),
            assigned: IndexMap::new(),
        }
    }

    /// Style `preferred`, resolve collisions with the "Other" prefix and bind
    /// the result to `key`. A key keeps its first name.
    pub(crate) fn allocate(&mut self, key: K, preferred: &str) -> &str {
        let styled = super::style(preferred);
        let idx = match self.assigned.get_index_of(&key) {
            Some(idx) => idx,
            None => {
                let name = super::dedupe(styled.clone(), &self.taken, super::other_prefixed);
                if name != styled {
                    tracing::debug!(preferred, %name, "renamed to avoid a collision");
                }
                self.taken.insert(name.clone());
                self.assigned.insert_full(key, name).0
            }
        };
        &self.assigned[idx]
    }

    pub fn lookup(&self, key: &K) -> Option<&str> {
        self.assigned.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &str)> {
        self.assigned.iter().map(|(k, v)| (k, v.as_str()))
    }

    pub fn len(&self) -> usize { self.assigned.len() }
    pub fn is_empty(&self) -> bool { self.assigned.is_empty() }
}

/// Keys of the global type scope. Classes and unions share it so a union
/// can never be named like a real class.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeKey {
    Class(ClassRef),
    Union(UnionSet),
}

#[derive(Debug, Clone)]
pub struct Names {
    types: Scope<TypeKey>,
    properties: HashMap<ClassRef, Scope<String>>,
    union_fields: IndexMap<UnionSet, Scope<IrType>>,
}

impl Names {
    /// Allocate all names for `graph`. `forbidden` seeds the global scope.
    pub fn build<I, S>(graph: &Graph, forbidden: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut types = Scope::new(forbidden);

        // Classes first, so a class keeps its name when a union display
        // name would coincide with it.
        let mut class_names = HashMap::new();
        for (r, class) in graph.class_refs() {
            let name = types.allocate(TypeKey::Class(r), &class.base_name()).to_string();
            class_names.insert(r, name);
        }

        let mut union_fields = IndexMap::new();
        for set in graph.unions() {
            let preferred = unions::preferred_type_name(&set, &class_names);
            let union_name = types.allocate(TypeKey::Union(set.clone()), &preferred).to_string();
            let mut fields = Scope::new([union_name]);
            for alt in set.non_null() {
                fields.allocate(alt.clone(), &unions::preferred_field_name(alt, &class_names));
            }
            union_fields.insert(set, fields);
        }

        let mut properties = HashMap::new();
        for (r, class) in graph.class_refs() {
            let mut scope = Scope::new([class_names[&r].clone()]);
            for key in class.properties.keys() {
                scope.allocate(key.clone(), key);
            }
            properties.insert(r, scope);
        }

        tracing::debug!(
            classes = class_names.len(),
            unions = union_fields.len(),
            "allocated names"
        );
        Self { types, properties, union_fields }
    }

    pub fn class(&self, r: ClassRef) -> Option<&str> {
        self.types.lookup(&TypeKey::Class(r))
    }

    pub fn union(&self, set: &UnionSet) -> Option<&str> {
        self.types.lookup(&TypeKey::Union(set.clone()))
    }

    pub fn properties(&self, r: ClassRef) -> Option<&Scope<String>> {
        self.properties.get(&r)
    }

    pub fn union_fields(&self, set: &UnionSet) -> Option<&Scope<IrType>> {
        self.union_fields.get(set)
    }

    /// Generated unions in allocation order.
    pub fn unions(&self) -> impl Iterator<Item = &UnionSet> {
        self.union_fields.keys()
    }

    pub fn has_unions(&self) -> bool { !self.union_fields.is_empty() }

    /// Debug view of every allocation.
    pub fn report(&self, graph: &Graph) -> NamesReport {
        let classes = graph
            .class_refs()
            .map(|(r, class)| ClassReport {
                index: r.0,
                base_name: class.base_name(),
                name: self.class(r).unwrap_or_default().to_string(),
                properties: self
                    .properties(r)
                    .map(|scope| scope.iter().map(|(k, v)| (k.clone(), v.to_string())).collect())
                    .unwrap_or_default(),
            })
            .collect();
        let unions = self
            .union_fields
            .iter()
            .map(|(set, fields)| UnionReport {
                alternatives: set.iter().cloned().collect(),
                name: self.union(set).unwrap_or_default().to_string(),
                fields: fields
                    .iter()
                    .map(|(alt, name)| FieldReport { alternative: alt.clone(), name: name.to_string() })
                    .collect(),
            })
            .collect();
        NamesReport { classes, unions }
    }
}

#[derive(Debug, Serialize)]
pub struct NamesReport {
    pub classes: Vec<ClassReport>,
    pub unions: Vec<UnionReport>,
}

#[derive(Debug, Serialize)]
pub struct ClassReport {
    pub index: usize,
    pub base_name: String,
    pub name: String,
    pub properties: IndexMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct UnionReport {
    pub alternatives: Vec<IrType>,
    pub name: String,
    pub fields: Vec<FieldReport>,
}

#[derive(Debug, Serialize)]
pub struct FieldReport {
    pub alternative: IrType,
    pub name: String,
}
