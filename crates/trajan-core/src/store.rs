//! Hierarchical dataset store abstraction.
//!
//! The on-disk container is an external collaborator; the core only needs
//! a path-addressed tree of array datasets with scalar/array attributes.
//! Datasets are write-once: re-running an analysis deletes the prior
//! category group before writing, so old and new shapes never mix.
//!
//! [`MemStore`] is the in-crate implementation used by tests and result
//! export; a whole store serializes through serde, so a snapshot is a file.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A scalar or small-array attribute value.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum AttrValue {
    /// Integer scalar.
    Int(i64),
    /// Float scalar.
    Float(f64),
    /// Text scalar.
    Text(String),
    /// Small float array (e.g. bin edges).
    FloatVec(Vec<f64>),
}

/// An n-dimensional float dataset with an explicit shape.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ArrayDataset {
    /// Dimension extents, outermost first.
    pub shape: Vec<usize>,
    /// Row-major payload (`len == shape.iter().product()`).
    pub data: Vec<f64>,
}

/// Path-addressed dataset store with attributes.
///
/// Paths are `/`-separated (`"analysis/xl_forces"`); intermediate groups
/// are created on demand. Implementations must release any underlying
/// resources on drop, error paths included.
pub trait DataStore {
    /// Create a group at `path` (idempotent).
    fn create_group(&mut self, path: &str) -> Result<()>;

    /// Delete the group at `path` and everything below it. Returns whether
    /// anything was removed.
    fn delete_group(&mut self, path: &str) -> bool;

    /// Store a fixed-shape float dataset. Fails if `path` already holds a
    /// dataset (write-once contract) or the shape does not match the data.
    fn put_array(&mut self, path: &str, shape: &[usize], data: Vec<f64>) -> Result<()>;

    /// Store a ragged dataset (variable-length rows).
    fn put_ragged(&mut self, path: &str, rows: Vec<Vec<f64>>) -> Result<()>;

    /// Attach an attribute to the group or dataset at `path`.
    fn set_attr(&mut self, path: &str, key: &str, value: AttrValue) -> Result<()>;

    /// Read back an attribute.
    fn attr(&self, path: &str, key: &str) -> Option<&AttrValue>;

    /// Read back a fixed-shape dataset.
    fn array(&self, path: &str) -> Option<&ArrayDataset>;

    /// Read back a ragged dataset.
    fn ragged(&self, path: &str) -> Option<&[Vec<f64>]>;
}

/* ---------------- in-memory implementation ---------------- */

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
enum Node {
    #[default]
    Group,
    Array(ArrayDataset),
    Ragged(Vec<Vec<f64>>),
}

/// In-memory [`DataStore`] backed by sorted maps (deterministic iteration
/// and serialization order).
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct MemStore {
    nodes: BTreeMap<String, Node>,
    attrs: BTreeMap<String, BTreeMap<String, AttrValue>>,
}

impl MemStore {
    /// Fresh empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All node paths currently present, in sorted order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    fn ensure_parents(&mut self, path: &str) {
        let mut prefix = String::new();
        for part in path.split('/').filter(|p| !p.is_empty()) {
            if !prefix.is_empty() {
                prefix.push('/');
            }
            prefix.push_str(part);
            self.nodes.entry(prefix.clone()).or_insert(Node::Group);
        }
    }
}

impl DataStore for MemStore {
    fn create_group(&mut self, path: &str) -> Result<()> {
        self.ensure_parents(path);
        Ok(())
    }

    fn delete_group(&mut self, path: &str) -> bool {
        let prefix = format!("{path}/");
        let doomed: Vec<String> = self
            .nodes
            .keys()
            .filter(|k| *k == path || k.starts_with(&prefix))
            .cloned()
            .collect();
        for k in &doomed {
            self.nodes.remove(k);
            self.attrs.remove(k);
        }
        !doomed.is_empty()
    }

    fn put_array(&mut self, path: &str, shape: &[usize], data: Vec<f64>) -> Result<()> {
        if self.nodes.get(path).is_some_and(|n| !matches!(n, Node::Group)) {
            bail!("dataset {path} already exists; delete its group before rewriting");
        }
        let expect: usize = shape.iter().product();
        if data.len() != expect {
            bail!("dataset {path}: shape {shape:?} wants {expect} elements, got {}", data.len());
        }
        self.ensure_parents(path);
        self.nodes
            .insert(path.to_owned(), Node::Array(ArrayDataset { shape: shape.to_vec(), data }));
        Ok(())
    }

    fn put_ragged(&mut self, path: &str, rows: Vec<Vec<f64>>) -> Result<()> {
        if self.nodes.get(path).is_some_and(|n| !matches!(n, Node::Group)) {
            bail!("dataset {path} already exists; delete its group before rewriting");
        }
        self.ensure_parents(path);
        self.nodes.insert(path.to_owned(), Node::Ragged(rows));
        Ok(())
    }

    fn set_attr(&mut self, path: &str, key: &str, value: AttrValue) -> Result<()> {
        self.ensure_parents(path);
        self.attrs.entry(path.to_owned()).or_default().insert(key.to_owned(), value);
        Ok(())
    }

    fn attr(&self, path: &str, key: &str) -> Option<&AttrValue> {
        self.attrs.get(path)?.get(key)
    }

    fn array(&self, path: &str) -> Option<&ArrayDataset> {
        match self.nodes.get(path)? {
            Node::Array(a) => Some(a),
            _ => None,
        }
    }

    fn ragged(&self, path: &str) -> Option<&[Vec<f64>]> {
        match self.nodes.get(path)? {
            Node::Ragged(r) => Some(r),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_are_created_on_demand() {
        let mut s = MemStore::new();
        s.put_array("analysis/xl_forces", &[2, 3], vec![0.0; 6]).unwrap();
        assert!(s.array("analysis/xl_forces").is_some());
        assert!(s.paths().any(|p| p == "analysis"));
    }

    #[test]
    fn datasets_are_write_once() {
        let mut s = MemStore::new();
        s.put_array("g/d", &[1], vec![1.0]).unwrap();
        assert!(s.put_array("g/d", &[1], vec![2.0]).is_err());
        assert!(s.delete_group("g"));
        s.put_array("g/d", &[1], vec![2.0]).unwrap();
    }

    #[test]
    fn delete_group_removes_subtree_and_attrs() {
        let mut s = MemStore::new();
        s.put_ragged("xl_data/doubly_bound", vec![vec![1.0], vec![]]).unwrap();
        s.set_attr("xl_data", "k_spring", AttrValue::Float(2.0)).unwrap();
        assert!(s.delete_group("xl_data"));
        assert!(s.ragged("xl_data/doubly_bound").is_none());
        assert!(s.attr("xl_data", "k_spring").is_none());
        assert!(!s.delete_group("xl_data"));
    }

    #[test]
    fn shape_mismatch_is_rejected() {
        let mut s = MemStore::new();
        assert!(s.put_array("d", &[2, 2], vec![0.0; 3]).is_err());
    }
}
