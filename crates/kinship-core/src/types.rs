//! Common types shared by the record store, view assembler and renderer

/// Birth/death marker meaning "unknown".
pub const NOT_AVAILABLE: &str = "N/A";

/// A person or company record, identified by its directory name.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: String,
    pub name: String,
    pub kind: NodeKind,
    pub birth: String,
    pub death: String,
    /// Free text; line breaks are preserved and rendered as line breaks.
    pub desc: String,
    pub links: Vec<String>,
}

/// Kind-specific attributes of a node
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Person {
        sex: String,
        /// Alternate names in record order, e.g. `("字", "子美")`.
        other_names: Vec<(String, String)>,
    },
    Company {
        full_name: Option<String>,
    },
}

impl Node {
    pub fn is_company(&self) -> bool {
        matches!(self.kind, NodeKind::Company { .. })
    }

    pub fn is_person(&self) -> bool {
        matches!(self.kind, NodeKind::Person { .. })
    }

    /// Birth marker, or `None` when it is the `"N/A"` sentinel.
    pub fn known_birth(&self) -> Option<&str> {
        if self.birth == NOT_AVAILABLE {
            None
        } else {
            Some(&self.birth)
        }
    }
}

/// A directed, labeled edge between two nodes
#[derive(Debug, Clone, PartialEq)]
pub struct Relation {
    pub from: String,
    pub to: String,
    pub desc: String,
}

impl Relation {
    /// Composite key, unique across all loaded relations.
    pub fn key(&self) -> String {
        relation_key(&self.from, &self.to)
    }
}

pub fn relation_key(from: &str, to: &str) -> String {
    format!("{from}->{to}")
}

/// A grouping of nodes around a head node
#[derive(Debug, Clone, PartialEq)]
pub struct Family {
    /// Group id, taken from the record file name.
    pub id: String,
    pub head: String,
    pub inner: Vec<String>,
    pub outer: Vec<String>,
}

impl Family {
    /// `head`, then `inner`, then `outer`, in declaration order.
    pub fn members(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.head.as_str())
            .chain(self.inner.iter().map(String::as_str))
            .chain(self.outer.iter().map(String::as_str))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.members().any(|member| member == id)
    }
}

/// One entry of the view configuration: a title and the groups it draws.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct ViewSpec {
    pub name: String,
    pub families: Vec<String>,
}
