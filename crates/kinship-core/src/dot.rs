//! Graphviz DOT output for a [`View`]
//!
//! Rendering happens in two steps: [`DotGraph::from_view`] resolves every
//! visible record into plain declarations (shape, color, label parts, edge
//! style), and [`DotGraph::to_dot`] serializes those declarations to text.

use std::fmt::Write as FmtWrite;

use crate::store::RecordStore;
use crate::style::{EdgeStyle, classify};
use crate::types::{Node, NodeKind};
use crate::view::View;

/// Suffix appended to a group's head name in its boundary label ("family").
pub const FAMILY_LABEL_SUFFIX: &str = "家族";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Box,
    Ellipse,
}

impl Shape {
    pub fn as_str(self) -> &'static str {
        match self {
            Shape::Box => "box",
            Shape::Ellipse => "ellipse",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Blue,
    Red,
    Green,
}

impl Color {
    pub fn as_str(self) -> &'static str {
        match self {
            Color::Blue => "blue",
            Color::Red => "red",
            Color::Green => "green",
        }
    }

    /// Companies are green, men blue, everyone else red.
    pub fn of(node: &Node) -> Self {
        match &node.kind {
            NodeKind::Company { .. } => Color::Green,
            NodeKind::Person { sex, .. } if sex == "M" => Color::Blue,
            NodeKind::Person { .. } => Color::Red,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeDecl {
    pub id: String,
    pub shape: Shape,
    pub color: Color,
    pub name: String,
    pub birth: Option<String>,
    pub other_names: Option<String>,
    pub portrait: Option<String>,
    pub desc: String,
}

impl NodeDecl {
    pub fn new(node: &Node, portrait: Option<String>) -> Self {
        let shape = if node.is_person() {
            Shape::Box
        } else {
            Shape::Ellipse
        };
        Self {
            id: node.id.clone(),
            shape,
            color: Color::of(node),
            name: node.name.clone(),
            birth: node.known_birth().map(str::to_string),
            other_names: other_names(node),
            portrait,
            desc: node.desc.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeDecl {
    pub from: String,
    pub to: String,
    pub label: String,
    pub style: EdgeStyle,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GroupDecl {
    /// A group whose own id is a company: that node is declared again, unboxed.
    Node(NodeDecl),
    /// A person-headed group boxed together with its inner members.
    Cluster {
        head: String,
        members: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DotGraph {
    pub title: String,
    pub nodes: Vec<NodeDecl>,
    pub edges: Vec<EdgeDecl>,
    /// Only filled in when the view draws more than one group.
    pub groups: Vec<GroupDecl>,
}

impl DotGraph {
    pub fn from_view(view: &View<'_>, store: &RecordStore) -> Self {
        let node_decl = |node: &Node| {
            let portrait = store
                .portrait(&node.id)
                .map(|path| path.display().to_string());
            NodeDecl::new(node, portrait)
        };

        let nodes = view
            .nodes
            .iter()
            .filter_map(|id| store.node(id))
            .map(|node| node_decl(node))
            .collect();

        let edges = view
            .relations
            .iter()
            .filter_map(|relation| {
                let target = store.node(&relation.to)?;
                Some(EdgeDecl {
                    from: relation.from.clone(),
                    to: relation.to.clone(),
                    label: relation.desc.clone(),
                    style: classify(&relation.desc),
                    color: Color::of(target),
                })
            })
            .collect();

        let mut groups = Vec::new();
        if view.is_grouped() {
            for family in &view.families {
                let company = store.node(&family.id).filter(|node| node.is_company());
                if let Some(company) = company {
                    groups.push(GroupDecl::Node(node_decl(company)));
                } else {
                    let members = std::iter::once(&family.head)
                        .chain(family.inner.iter())
                        .cloned()
                        .collect();
                    groups.push(GroupDecl::Cluster {
                        head: family.head.clone(),
                        members,
                    });
                }
            }
        }

        Self {
            title: view.name.clone(),
            nodes,
            edges,
            groups,
        }
    }

    pub fn to_dot(&self) -> String {
        let mut body = String::new();

        for node in &self.nodes {
            push_node(&mut body, node);
        }
        body.push('\n');

        for edge in &self.edges {
            let _ = writeln!(
                &mut body,
                "\t{} -> {} [label=\"{}\", style={}, color=\"{}\"];",
                quote_id(&edge.from),
                quote_id(&edge.to),
                escape_quoted(&edge.label),
                edge.style,
                edge.color.as_str()
            );
        }
        body.push('\n');

        for group in &self.groups {
            match group {
                GroupDecl::Node(node) => push_node(&mut body, node),
                GroupDecl::Cluster { head, members } => {
                    let members = members
                        .iter()
                        .map(|id| quote_id(id))
                        .collect::<Vec<_>>()
                        .join("; ");
                    let _ = write!(
                        &mut body,
                        "\n\tsubgraph {}\n\t{{\n\t\tfontsize=\"18\";\n\t\tlabel=\"{}{}\";\n\t\t{};\n\t}}\n",
                        quote_id(&format!("cluster_{head}")),
                        escape_quoted(head),
                        FAMILY_LABEL_SUFFIX,
                        members
                    );
                }
            }
        }

        let title = escape_quoted(&self.title);
        let mut output = String::new();
        let _ = write!(
            &mut output,
            "\ndigraph \"{title}\"\n{{\n\
             \trankdir = \"LR\";\n\
             \tranksep = 0.5;\n\
             \tlabel = \"{title}\";\n\
             \tlabelloc = \"t\";\n\
             \tfontsize = \"24\";\n\
             \tfontname = \"SimHei\";\n\
             \n\
             \tgraph [style=\"filled\", color=\"lightgrey\"];\n\
             \tnode [fontname=\"SimSun\"];\n\
             \tedge [fontname=\"SimSun\"];\n\
             \n\
             {body}\n\
             }}\n"
        );
        output
    }
}

/// Resolve and serialize a view in one step.
pub fn render_view(view: &View<'_>, store: &RecordStore) -> String {
    DotGraph::from_view(view, store).to_dot()
}

/// Second label line: `key:value` pairs for people, the full name for companies.
fn other_names(node: &Node) -> Option<String> {
    let text = match &node.kind {
        NodeKind::Person { other_names, .. } => other_names
            .iter()
            .map(|(key, value)| format!("{key}:{value}"))
            .collect::<Vec<_>>()
            .join(", "),
        NodeKind::Company { full_name } => full_name.clone().unwrap_or_default(),
    };
    (!text.is_empty()).then_some(text)
}

fn push_node(buf: &mut String, node: &NodeDecl) {
    let birth = node
        .birth
        .as_ref()
        .map(|birth| format!(" [{}]", escape_html_text(birth)))
        .unwrap_or_default();
    let other_names = node
        .other_names
        .as_ref()
        .map(|names| format!("<tr><td>({})</td></tr>", escape_html_text(names)))
        .unwrap_or_default();
    let portrait = node
        .portrait
        .as_ref()
        .map(|src| format!("<tr><td><img src=\"{}\"/></td></tr>", escape_html_attr(src)))
        .unwrap_or_default();
    let desc = escape_html_text(&node.desc).replace('\n', "<br/>");

    let _ = writeln!(
        buf,
        "\t{} [shape=\"{}\", color=\"{}\", label=<<table border=\"0\" cellborder=\"0\">\
         <tr><td>{}{}</td></tr>{}{}<tr><td>{}</td></tr></table>>];",
        quote_id(&node.id),
        node.shape.as_str(),
        node.color.as_str(),
        escape_html_text(&node.name),
        birth,
        other_names,
        portrait,
        desc
    );
}

fn quote_id(id: &str) -> String {
    format!("\"{}\"", escape_quoted(id))
}

fn escape_quoted(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

fn escape_html_attr(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn escape_html_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
