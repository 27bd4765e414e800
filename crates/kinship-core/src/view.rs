//! Per-view node and relation selection

use crate::store::RecordStore;
use crate::types::{Family, Relation, ViewSpec};

/// The nodes, relations and groups visible in one rendered diagram.
#[derive(Debug, Clone)]
pub struct View<'a> {
    pub name: String,
    /// Groups in drawing order: the reverse of the configured order.
    pub families: Vec<&'a Family>,
    /// Visible node ids, first-seen order, no duplicates.
    pub nodes: Vec<&'a str>,
    /// Visible relations, in load order within each group scan, no duplicates.
    pub relations: Vec<&'a Relation>,
}

impl<'a> View<'a> {
    /// Select what `spec` shows out of `store`.
    ///
    /// Groups are processed in reverse configuration order. A relation is
    /// visible only when both of its endpoints are members of one and the
    /// same group; relations that cross two groups of the view are left out
    /// even when both endpoints are drawn.
    ///
    /// Family ids missing from the store are skipped; [`RecordStore::load_views`]
    /// rejects them up front.
    pub fn assemble(store: &'a RecordStore, spec: &ViewSpec) -> Self {
        let families: Vec<&Family> = spec
            .families
            .iter()
            .rev()
            .filter_map(|id| store.family(id))
            .collect();

        let mut nodes: Vec<&str> = Vec::new();
        let mut relations: Vec<&Relation> = Vec::new();

        for family in families.iter().copied() {
            for member in family.members() {
                if !nodes.contains(&member) {
                    nodes.push(member);
                }
            }

            for relation in store.relations() {
                if family.contains(&relation.from)
                    && family.contains(&relation.to)
                    && !relations.iter().any(|seen| std::ptr::eq(*seen, relation))
                {
                    relations.push(relation);
                }
            }
        }

        Self {
            name: spec.name.clone(),
            families,
            nodes,
            relations,
        }
    }

    /// Whether the view nests members into per-group boundaries.
    pub fn is_grouped(&self) -> bool {
        self.families.len() > 1
    }
}
