//! Record loading and cross-reference validation
//!
//! Records live in a fixed layout under the data directory:
//!
//! ```text
//! data/
//!   person/<id>/brief.yaml
//!   person/<id>/portrait.png   (optional)
//!   company/<id>/brief.yaml
//!   family/<id>.yaml
//!   graph.yaml
//! ```
//!
//! Everything is validated while loading, so the view assembler and the
//! renderer can look ids up without further checks.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::types::{Family, NOT_AVAILABLE, Node, NodeKind, Relation, ViewSpec};

pub const PERSON_DIR: &str = "person";
pub const COMPANY_DIR: &str = "company";
pub const FAMILY_DIR: &str = "family";
pub const BRIEF_FILE: &str = "brief.yaml";
pub const PORTRAIT_FILE: &str = "portrait.png";
pub const VIEWS_FILE: &str = "graph.yaml";

#[derive(Debug, Deserialize)]
struct NodeRecord {
    name: String,
    #[serde(default)]
    birth: Option<Value>,
    #[serde(default)]
    death: Option<Value>,
    #[serde(default)]
    desc: Option<String>,
    #[serde(default)]
    links: Option<Vec<String>>,
    #[serde(default)]
    sex: Option<String>,
    #[serde(default)]
    other_names: Option<Mapping>,
    #[serde(default)]
    full_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FamilyRecord {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    inner: Vec<String>,
    #[serde(default)]
    outer: Vec<String>,
    #[serde(default)]
    relations: Vec<Vec<Value>>,
}

/// In-memory index of every node, relation and family.
///
/// Built once, read-only afterwards.
#[derive(Debug, Default)]
pub struct RecordStore {
    data_dir: Option<PathBuf>,
    nodes: HashMap<String, Node>,
    relations: Vec<Relation>,
    relation_keys: HashSet<String>,
    families: HashMap<String, Family>,
}

impl RecordStore {
    /// An empty store with no backing directory; populate it with
    /// [`insert_node`](Self::insert_node) and [`insert_family`](Self::insert_family).
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and validate every record under `data_dir`.
    pub fn load(data_dir: impl AsRef<Path>) -> Result<Self> {
        let data_dir = data_dir.as_ref();
        let mut store = Self {
            data_dir: Some(data_dir.to_path_buf()),
            ..Self::default()
        };

        for (kind_dir, is_company) in [(PERSON_DIR, false), (COMPANY_DIR, true)] {
            for entry in kind_entries(&data_dir.join(kind_dir))? {
                if !entry.is_dir() {
                    warn!("skipping non-directory entry {}", entry.display());
                    continue;
                }
                let id = entry_name(&entry)?;
                let brief = entry.join(BRIEF_FILE);
                let record: NodeRecord = read_yaml(&brief)?;
                let node = node_from_record(id, record, is_company, &brief)?;
                store.insert_node(node)?;
            }
        }
        info!("Node number: {}", store.nodes.len());

        for entry in kind_entries(&data_dir.join(FAMILY_DIR))? {
            if !entry.is_file() || entry.extension().and_then(|e| e.to_str()) != Some("yaml") {
                warn!("skipping non-record entry {}", entry.display());
                continue;
            }
            let id = entry
                .file_stem()
                .and_then(|stem| stem.to_str())
                .ok_or_else(|| invalid_record(&entry, "file name is not valid UTF-8"))?
                .to_string();
            if !store.nodes.contains_key(&id) {
                return Err(Error::invalid_reference("family name", id));
            }

            let record: FamilyRecord = read_yaml(&entry)?;
            let relations = record
                .relations
                .iter()
                .map(|triple| relation_from_triple(triple, &entry))
                .collect::<Result<Vec<_>>>()?;
            let family = Family {
                head: record.name.unwrap_or_else(|| id.clone()),
                id,
                inner: record.inner,
                outer: record.outer,
            };
            store.insert_family(family, relations)?;
        }
        info!("Relation number: {}", store.relations.len());
        info!("Family number: {}", store.families.len());

        Ok(store)
    }

    /// Add a node; its id must not be taken by any node of either kind.
    pub fn insert_node(&mut self, node: Node) -> Result<()> {
        if self.nodes.contains_key(&node.id) {
            return Err(Error::DuplicateIdentity(node.id));
        }
        self.nodes.insert(node.id.clone(), node);
        Ok(())
    }

    /// Add a family together with the relations its record declares.
    ///
    /// Relations are checked first (key uniqueness, then both endpoints),
    /// then every family member. Nothing is inserted if any check fails.
    pub fn insert_family(&mut self, family: Family, relations: Vec<Relation>) -> Result<()> {
        if !self.nodes.contains_key(&family.id) {
            return Err(Error::invalid_reference("family name", family.id));
        }

        let mut new_keys = HashSet::new();
        for relation in &relations {
            let key = relation.key();
            if self.relation_keys.contains(&key) || !new_keys.insert(key.clone()) {
                return Err(Error::DuplicateRelation(key));
            }
            if !self.nodes.contains_key(&relation.from) {
                return Err(Error::invalid_reference(
                    "relation \"from\" attr",
                    relation.from.as_str(),
                ));
            }
            if !self.nodes.contains_key(&relation.to) {
                return Err(Error::invalid_reference(
                    "relation \"to\" attr",
                    relation.to.as_str(),
                ));
            }
        }

        if let Some(unknown) = family.members().find(|id| !self.nodes.contains_key(*id)) {
            return Err(Error::invalid_reference("family member", unknown));
        }

        self.relation_keys.extend(new_keys);
        self.relations.extend(relations);
        self.families.insert(family.id.clone(), family);
        Ok(())
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn family(&self, id: &str) -> Option<&Family> {
        self.families.get(id)
    }

    /// Relations in load order.
    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    /// Path of the node's portrait, if the store is backed by a data
    /// directory and the image exists.
    pub fn portrait(&self, id: &str) -> Option<PathBuf> {
        let path = self
            .data_dir
            .as_ref()?
            .join(PERSON_DIR)
            .join(id)
            .join(PORTRAIT_FILE);
        path.is_file().then_some(path)
    }

    /// Read the ordered view list and check every family it names.
    pub fn load_views(&self, path: impl AsRef<Path>) -> Result<Vec<ViewSpec>> {
        let views: Option<Vec<ViewSpec>> = read_yaml(path.as_ref())?;
        let views = views.unwrap_or_default();
        for view in &views {
            if let Some(unknown) = view.families.iter().find(|f| !self.families.contains_key(*f)) {
                return Err(Error::invalid_reference(
                    format!("family in view \"{}\"", view.name),
                    unknown.as_str(),
                ));
            }
        }
        Ok(views)
    }
}

fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    debug!("load: {}", path.display());
    let text = fs::read_to_string(path).map_err(|err| Error::io(path, err))?;
    serde_yaml::from_str(&text).map_err(|source| Error::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Entries of a record directory sorted by name; a missing directory has none.
fn kind_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        warn!("record directory {} does not exist", dir.display());
        return Ok(Vec::new());
    }
    let mut entries = fs::read_dir(dir)
        .map_err(|err| Error::io(dir, err))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(|err| Error::io(dir, err))?;
    entries.sort();
    Ok(entries)
}

fn entry_name(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| invalid_record(path, "file name is not valid UTF-8"))
}

fn invalid_record(path: &Path, message: impl Into<String>) -> Error {
    Error::InvalidRecord {
        path: path.to_path_buf(),
        message: message.into(),
    }
}

fn node_from_record(id: String, record: NodeRecord, is_company: bool, path: &Path) -> Result<Node> {
    let kind = if is_company {
        NodeKind::Company {
            full_name: record.full_name.filter(|name| !name.is_empty()),
        }
    } else {
        let sex = record
            .sex
            .ok_or_else(|| invalid_record(path, "person record has no \"sex\" field"))?;
        let other_names = record
            .other_names
            .unwrap_or_default()
            .iter()
            .filter_map(|(key, value)| Some((scalar_text(key)?, scalar_text(value)?)))
            .collect();
        NodeKind::Person { sex, other_names }
    };

    Ok(Node {
        id,
        name: record.name,
        kind,
        birth: record
            .birth
            .as_ref()
            .and_then(scalar_text)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        death: record
            .death
            .as_ref()
            .and_then(scalar_text)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        desc: record.desc.unwrap_or_default(),
        links: record.links.unwrap_or_default(),
    })
}

fn relation_from_triple(triple: &[Value], path: &Path) -> Result<Relation> {
    let fields = triple.iter().map(scalar_text).collect::<Option<Vec<_>>>();
    match fields.as_deref() {
        Some([from, to, desc]) => Ok(Relation {
            from: from.clone(),
            to: to.clone(),
            desc: desc.clone(),
        }),
        _ => Err(invalid_record(
            path,
            format!("relation must be a [from, to, description] triple, got {triple:?}"),
        )),
    }
}

/// Text of a YAML scalar; `None` for null and collections.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_text(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn person(root: &Path, id: &str, sex: &str, birth: &str) {
        write(
            root,
            &format!("person/{id}/brief.yaml"),
            &format!(
                "name: {id}\nsex: {sex}\nbirth: {birth}\ndeath: N/A\ndesc: \"\"\nlinks: []\n"
            ),
        );
    }

    fn company(root: &Path, id: &str) {
        write(
            root,
            &format!("company/{id}/brief.yaml"),
            &format!(
                "name: {id}\nfull_name: {id} Holdings\nbirth: N/A\ndeath: N/A\ndesc: \"\"\nlinks: []\n"
            ),
        );
    }

    #[test]
    fn test_load_nodes_relations_and_families() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        person(root, "alice", "F", "1920");
        person(root, "bob", "M", "N/A");
        company(root, "acme");
        write(
            root,
            "family/bob.yaml",
            "name: bob\ninner: [alice]\nouter: [acme]\nrelations:\n  - [bob, alice, 妻]\n  - [bob, acme, 创始人]\n",
        );

        let store = RecordStore::load(root).unwrap();

        assert_eq!(store.nodes.len(), 3);
        assert_eq!(store.families.len(), 1);
        assert_eq!(store.relations().len(), 2);
        assert_eq!(store.relations()[0].key(), "bob->alice");

        let family = store.family("bob").unwrap();
        assert_eq!(family.members().collect::<Vec<_>>(), vec!["bob", "alice", "acme"]);

        let alice = store.node("alice").unwrap();
        assert_eq!(alice.known_birth(), Some("1920"));
        assert!(store.node("acme").unwrap().is_company());
        assert!(store.node("bob").unwrap().known_birth().is_none());
    }

    #[test]
    fn test_duplicate_identity_across_kinds() {
        let dir = TempDir::new().unwrap();
        person(dir.path(), "acme", "M", "N/A");
        company(dir.path(), "acme");

        let err = RecordStore::load(dir.path()).unwrap_err();
        assert!(matches!(err, Error::DuplicateIdentity(id) if id == "acme"));
    }

    #[test]
    fn test_relation_to_unknown_node() {
        let dir = TempDir::new().unwrap();
        person(dir.path(), "bob", "M", "N/A");
        write(
            dir.path(),
            "family/bob.yaml",
            "name: bob\ninner: []\nouter: []\nrelations:\n  - [bob, ghost, 妻]\n",
        );

        let err = RecordStore::load(dir.path()).unwrap_err();
        assert!(matches!(err, Error::InvalidReference { id, .. } if id == "ghost"));
    }

    #[test]
    fn test_duplicate_relation_across_family_files() {
        let dir = TempDir::new().unwrap();
        person(dir.path(), "alice", "F", "N/A");
        person(dir.path(), "bob", "M", "N/A");
        write(
            dir.path(),
            "family/alice.yaml",
            "name: alice\ninner: [bob]\nouter: []\nrelations:\n  - [bob, alice, 妻]\n",
        );
        write(
            dir.path(),
            "family/bob.yaml",
            "name: bob\ninner: [alice]\nouter: []\nrelations:\n  - [bob, alice, 妻子]\n",
        );

        let err = RecordStore::load(dir.path()).unwrap_err();
        assert!(matches!(err, Error::DuplicateRelation(key) if key == "bob->alice"));
    }

    #[test]
    fn test_family_file_for_unknown_node() {
        let dir = TempDir::new().unwrap();
        person(dir.path(), "bob", "M", "N/A");
        write(dir.path(), "family/nobody.yaml", "name: nobody\n");

        let err = RecordStore::load(dir.path()).unwrap_err();
        assert!(matches!(err, Error::InvalidReference { id, .. } if id == "nobody"));
    }

    #[test]
    fn test_unknown_family_member() {
        let dir = TempDir::new().unwrap();
        person(dir.path(), "bob", "M", "N/A");
        write(dir.path(), "family/bob.yaml", "name: bob\ninner: []\nouter: [stranger]\n");

        let err = RecordStore::load(dir.path()).unwrap_err();
        assert!(matches!(err, Error::InvalidReference { id, .. } if id == "stranger"));
    }

    #[test]
    fn test_person_without_sex_is_rejected() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "person/eve/brief.yaml", "name: Eve\ndeath: N/A\n");

        let err = RecordStore::load(dir.path()).unwrap_err();
        assert!(matches!(err, Error::InvalidRecord { .. }));
    }

    #[test]
    fn test_malformed_relation_triple() {
        let dir = TempDir::new().unwrap();
        person(dir.path(), "bob", "M", "N/A");
        write(
            dir.path(),
            "family/bob.yaml",
            "name: bob\nrelations:\n  - [bob, bob]\n",
        );

        let err = RecordStore::load(dir.path()).unwrap_err();
        assert!(matches!(err, Error::InvalidRecord { .. }));
    }

    #[test]
    fn test_numeric_birth_and_other_names_order() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "person/du/brief.yaml",
            "name: 杜甫\nsex: M\nbirth: 712\nother_names:\n  字: 子美\n  号: 少陵野老\ndesc: \"诗人\\n唐代\"\nlinks: [https://example.org/du]\n",
        );

        let store = RecordStore::load(dir.path()).unwrap();
        let du = store.node("du").unwrap();
        assert_eq!(du.birth, "712");
        assert_eq!(du.death, NOT_AVAILABLE);
        assert_eq!(du.desc, "诗人\n唐代");
        assert_eq!(du.links, vec!["https://example.org/du"]);
        match &du.kind {
            NodeKind::Person { sex, other_names } => {
                assert_eq!(sex, "M");
                assert_eq!(
                    other_names,
                    &vec![
                        ("字".to_string(), "子美".to_string()),
                        ("号".to_string(), "少陵野老".to_string())
                    ]
                );
            }
            other => panic!("expected person, got {other:?}"),
        }
    }

    #[test]
    fn test_portrait_lookup() {
        let dir = TempDir::new().unwrap();
        person(dir.path(), "alice", "F", "N/A");
        person(dir.path(), "bob", "M", "N/A");
        write(dir.path(), "person/alice/portrait.png", "png");

        let store = RecordStore::load(dir.path()).unwrap();
        assert!(store.portrait("alice").is_some());
        assert!(store.portrait("bob").is_none());
        assert!(RecordStore::new().portrait("alice").is_none());
    }

    #[test]
    fn test_load_views_rejects_unknown_family() {
        let dir = TempDir::new().unwrap();
        person(dir.path(), "bob", "M", "N/A");
        write(dir.path(), "family/bob.yaml", "name: bob\n");
        write(
            dir.path(),
            "graph.yaml",
            "- name: Bob\n  families: [bob]\n- name: Broken\n  families: [bob, carol]\n",
        );

        let store = RecordStore::load(dir.path()).unwrap();
        let err = store.load_views(dir.path().join(VIEWS_FILE)).unwrap_err();
        assert!(matches!(err, Error::InvalidReference { id, .. } if id == "carol"));
    }

    #[test]
    fn test_empty_view_file() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "graph.yaml", "[]\n");

        let store = RecordStore::load(dir.path()).unwrap();
        assert!(store.load_views(dir.path().join(VIEWS_FILE)).unwrap().is_empty());
    }
}
