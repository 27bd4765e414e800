//! Edge styling by kinship term
//!
//! Relation descriptions are short Chinese kinship terms. The style of an
//! edge is chosen by the first rule in [`STYLE_RULES`] whose marker matches
//! the description; anything unmatched is drawn dotted.

use std::fmt;

/// DOT edge style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeStyle {
    Bold,
    Solid,
    Dashed,
    Dotted,
}

impl EdgeStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            EdgeStyle::Bold => "bold",
            EdgeStyle::Solid => "solid",
            EdgeStyle::Dashed => "dashed",
            EdgeStyle::Dotted => "dotted",
        }
    }
}

impl fmt::Display for EdgeStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a rule's literals are compared with a description
#[derive(Debug, Clone, Copy)]
pub enum Marker {
    /// Description begins with the literal.
    Prefix(&'static str),
    /// Description is exactly the literal.
    Exact(&'static str),
    /// Description is one of `terms`, optionally preceded by one of `qualifiers`.
    Qualified {
        qualifiers: &'static [char],
        terms: &'static [char],
    },
    /// Description ends with one of the characters, anything may come before.
    EndsWithAny(&'static [char]),
}

/// Birth-order qualifiers: only, eldest, second .. seventh.
pub const BIRTH_ORDER: &[char] = &['独', '长', '次', '三', '四', '五', '六', '七'];
/// Son, daughter.
pub const CHILD_TERMS: &[char] = &['子', '女'];
/// Elder brother, younger brother, elder sister, younger sister.
pub const SIBLING_TERMS: &[char] = &['兄', '弟', '姐', '妹'];

/// Ordered classification table; first match wins.
pub const STYLE_RULES: &[(Marker, EdgeStyle)] = &[
    // husband
    (Marker::Prefix("夫"), EdgeStyle::Bold),
    // wife
    (Marker::Exact("妻"), EdgeStyle::Bold),
    // father
    (Marker::Prefix("父"), EdgeStyle::Solid),
    // mother
    (Marker::Exact("母"), EdgeStyle::Solid),
    (
        Marker::Qualified {
            qualifiers: BIRTH_ORDER,
            terms: CHILD_TERMS,
        },
        EdgeStyle::Solid,
    ),
    (Marker::EndsWithAny(SIBLING_TERMS), EdgeStyle::Dashed),
];

impl Marker {
    pub fn matches(self, desc: &str) -> bool {
        match self {
            Marker::Prefix(literal) => desc.starts_with(literal),
            Marker::Exact(literal) => desc == literal,
            Marker::Qualified { qualifiers, terms } => {
                let mut chars = desc.chars().rev();
                match (chars.next(), chars.next(), chars.next()) {
                    (Some(term), None, _) => terms.contains(&term),
                    (Some(term), Some(qualifier), None) => {
                        terms.contains(&term) && qualifiers.contains(&qualifier)
                    }
                    _ => false,
                }
            }
            Marker::EndsWithAny(suffixes) => desc
                .chars()
                .next_back()
                .is_some_and(|last| suffixes.contains(&last)),
        }
    }
}

/// Style for an edge labeled `desc`.
pub fn classify(desc: &str) -> EdgeStyle {
    STYLE_RULES
        .iter()
        .find(|(marker, _)| marker.matches(desc))
        .map(|(_, style)| *style)
        .unwrap_or(EdgeStyle::Dotted)
}
