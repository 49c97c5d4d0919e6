use std::collections::HashMap;
use std::fmt;

use generational_arena::{Arena, Index};
use serde_json::{Map, Value};
use termtree::Tree;
use tracing::{instrument, warn};

/// A value stored under a key of a node.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    /// Plain value merged from a structured block
    Field(Value),
    /// Child node opened by a heading
    Child(Index),
}

/// Heading scope in the arena-based document tree.
#[derive(Debug)]
pub struct TreeNode {
    /// Heading title (empty for the root)
    pub title: String,
    /// Tag label of the opening heading (`h1`..`h6`)
    pub tag: String,
    /// Heading marker; its length is the node's depth
    pub markup: String,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<Index>,
    keys: Vec<String>,
    slots: HashMap<String, Slot>,
}

impl TreeNode {
    fn new(title: &str, tag: &str, markup: &str, parent: Option<Index>) -> Self {
        Self {
            title: title.to_string(),
            tag: tag.to_string(),
            markup: markup.to_string(),
            parent,
            keys: Vec::new(),
            slots: HashMap::new(),
        }
    }

    /// Depth encoded by the heading marker (0 for the root).
    pub fn depth(&self) -> usize {
        self.markup.chars().count()
    }

    pub fn get(&self, key: &str) -> Option<&Slot> {
        self.slots.get(key)
    }

    /// Child node registered under `key`, if any.
    pub fn child(&self, key: &str) -> Option<Index> {
        match self.slots.get(key) {
            Some(Slot::Child(idx)) => Some(*idx),
            _ => None,
        }
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Slot)> {
        self.keys
            .iter()
            .filter_map(|key| self.slots.get(key).map(|slot| (key.as_str(), slot)))
    }

    /// Child indices in insertion order.
    pub fn children(&self) -> impl Iterator<Item = Index> + '_ {
        self.entries().filter_map(|(_, slot)| match slot {
            Slot::Child(idx) => Some(*idx),
            Slot::Field(_) => None,
        })
    }

    fn set(&mut self, key: &str, slot: Slot) {
        if self.slots.insert(key.to_string(), slot).is_none() {
            self.keys.push(key.to_string());
        }
    }
}

impl fmt::Display for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// Arena-based document tree.
///
/// Nodes refer to each other through generational indices only, so a node
/// can never be reachable from two parents. The root always exists and
/// represents the document itself.
#[derive(Debug)]
pub struct TreeArena {
    arena: Arena<TreeNode>,
    root: Index,
}

impl Default for TreeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeArena {
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let root = arena.insert(TreeNode::new("", "", "", None));
        Self { arena, root }
    }

    pub fn root(&self) -> Index {
        self.root
    }

    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.get_node(self.root)
            .map(|root| root.keys.is_empty())
            .unwrap_or(true)
    }

    /// Depth of the node at `idx` (0 for the root or a stale index).
    pub fn depth_of(&self, idx: Index) -> usize {
        self.get_node(idx).map(TreeNode::depth).unwrap_or(0)
    }

    /// Insert a heading node under `parent`.
    ///
    /// An existing field of the same name is replaced. When that field holds
    /// an object, its entries become the new node's fields so that later
    /// blocks keep accumulating into them.
    #[instrument(level = "trace", skip(self))]
    pub fn insert_node(&mut self, parent: Index, title: &str, tag: &str, markup: &str) -> Index {
        let mut node = TreeNode::new(title, tag, markup, Some(parent));
        match self.get_node(parent).and_then(|p| p.get(title)) {
            Some(Slot::Field(Value::Object(fields))) => {
                for (key, value) in fields {
                    node.set(key, Slot::Field(value.clone()));
                }
            }
            Some(Slot::Field(other)) => {
                warn!(title, replaced = %other, "heading replaces a plain field");
            }
            Some(Slot::Child(_)) | None => {}
        }

        let idx = self.arena.insert(node);
        if let Some(parent_node) = self.arena.get_mut(parent) {
            parent_node.set(title, Slot::Child(idx));
        }
        idx
    }

    /// Shallow-merge `fields` into the node at `idx`; later keys win.
    #[instrument(level = "trace", skip(self, fields))]
    pub fn merge_fields(&mut self, idx: Index, fields: Map<String, Value>) {
        let mut replaced = Vec::new();
        if let Some(node) = self.arena.get_mut(idx) {
            for (key, value) in fields {
                if let Some(Slot::Child(child)) = node.get(&key) {
                    replaced.push(*child);
                }
                node.set(&key, Slot::Field(value));
            }
        }
        for child in replaced {
            self.remove_subtree(child);
        }
    }

    fn remove_subtree(&mut self, idx: Index) {
        if let Some(node) = self.arena.remove(idx) {
            for (_, slot) in node.slots {
                if let Slot::Child(child) = slot {
                    self.remove_subtree(child);
                }
            }
        }
    }

    /// Height of the tree: number of heading levels along the longest path.
    #[instrument(level = "debug", skip(self))]
    pub fn height(&self) -> usize {
        self.calculate_height(self.root).saturating_sub(1)
    }

    fn calculate_height(&self, idx: Index) -> usize {
        if let Some(node) = self.get_node(idx) {
            1 + node
                .children()
                .map(|child| self.calculate_height(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Convert the tree to a JSON value, bookkeeping fields included.
    ///
    /// Heading nodes start with their `tag` and `markup`; the root carries
    /// only its entries.
    pub fn to_value(&self) -> Value {
        self.node_value(self.root)
    }

    fn node_value(&self, idx: Index) -> Value {
        let mut object = Map::new();
        if let Some(node) = self.get_node(idx) {
            if node.parent.is_some() {
                object.insert("tag".to_string(), Value::String(node.tag.clone()));
                object.insert("markup".to_string(), Value::String(node.markup.clone()));
            }
            for (key, slot) in node.entries() {
                let value = match slot {
                    Slot::Field(value) => value.clone(),
                    Slot::Child(child) => self.node_value(*child),
                };
                object.insert(key.to_string(), value);
            }
        }
        Value::Object(object)
    }

    /// Heading titles as a displayable tree.
    pub fn to_tree_string(&self, root_label: &str) -> Tree<String> {
        fn build(arena: &TreeArena, idx: Index, parent_tree: &mut Tree<String>) {
            if let Some(node) = arena.get_node(idx) {
                for child_idx in node.children() {
                    if let Some(child) = arena.get_node(child_idx) {
                        let mut child_tree = Tree::new(child.to_string());
                        build(arena, child_idx, &mut child_tree);
                        parent_tree.push(child_tree);
                    }
                }
            }
        }

        let mut tree = Tree::new(root_label.to_string());
        build(self, self.root, &mut tree);
        tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn given_new_arena_when_created_then_only_root_exists() {
        let tree = TreeArena::new();
        assert_eq!(tree.len(), 1);
        assert!(tree.is_empty());
        assert_eq!(tree.depth_of(tree.root()), 0);
        assert_eq!(tree.to_value(), json!({}));
    }

    #[test]
    fn given_nested_nodes_when_converting_then_keeps_bookkeeping_and_order() {
        let mut tree = TreeArena::new();
        let a = tree.insert_node(tree.root(), "A", "h1", "#");
        tree.merge_fields(a, object(json!({"z": 1})));
        let b = tree.insert_node(a, "B", "h2", "##");
        tree.merge_fields(b, object(json!({"x": true})));
        tree.merge_fields(a, object(json!({"y": 2})));

        let value = tree.to_value();

        let keys: Vec<&String> = value["A"].as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["tag", "markup", "z", "B", "y"]);
        assert_eq!(value["A"]["B"], json!({"tag": "h2", "markup": "##", "x": true}));
        assert_eq!(tree.height(), 2);
    }

    #[test]
    fn given_object_field_when_heading_reuses_key_then_fields_are_promoted() {
        let mut tree = TreeArena::new();
        let a = tree.insert_node(tree.root(), "A", "h1", "#");
        tree.merge_fields(a, object(json!({"B": {"kept": 1}})));

        let b = tree.insert_node(a, "B", "h2", "##");
        tree.merge_fields(b, object(json!({"added": 2})));

        assert_eq!(tree.get_node(a).unwrap().child("B"), Some(b));
        assert_eq!(tree.to_value()["A"]["B"]["kept"], json!(1));
        assert_eq!(tree.to_value()["A"]["B"]["added"], json!(2));
    }

    #[test]
    fn given_child_when_block_overwrites_key_then_subtree_is_released() {
        let mut tree = TreeArena::new();
        let a = tree.insert_node(tree.root(), "A", "h1", "#");
        let b = tree.insert_node(a, "B", "h2", "##");
        tree.insert_node(b, "C", "h3", "###");
        assert_eq!(tree.len(), 4);

        tree.merge_fields(a, object(json!({"B": 5})));

        assert_eq!(tree.len(), 2);
        assert!(tree.get_node(b).is_none());
        assert_eq!(tree.to_value()["A"]["B"], json!(5));
    }

    #[test]
    fn given_tree_when_rendering_outline_then_lists_titles() {
        let mut tree = TreeArena::new();
        let a = tree.insert_node(tree.root(), "workbook", "h1", "#");
        tree.insert_node(a, "sheets", "h2", "##");

        let rendered = tree.to_tree_string("doc").to_string();

        assert!(rendered.starts_with("doc\n"));
        assert!(rendered.contains("workbook"));
        assert!(rendered.contains("sheets"));
    }
}
