//! # kinship-core
//!
//! Core library for turning hand-written genealogy records into Graphviz
//! diagrams.
//!
//! This library provides:
//! - Loading and cross-checking person, company and family records
//! - Selecting the nodes and relations visible in a configured view
//! - Serializing a view to DOT, with edge styles chosen by kinship term
//!
//! ## Example
//!
//! ```no_run
//! use kinship_core::{RecordStore, View, render_view};
//!
//! # fn example() -> kinship_core::Result<()> {
//! let store = RecordStore::load("data")?;
//! for spec in store.load_views("data/graph.yaml")? {
//!     let view = View::assemble(&store, &spec);
//!     println!("{}", render_view(&view, &store));
//! }
//! # Ok(())
//! # }
//! ```

pub mod dot;
pub mod error;
pub mod store;
pub mod style;
pub mod types;
pub mod view;

// Re-export commonly used types
pub use dot::{DotGraph, render_view};
pub use error::{Error, Result};
pub use store::RecordStore;
pub use style::{EdgeStyle, classify};
pub use types::{Family, Node, NodeKind, Relation, ViewSpec};
pub use view::View;
