//! Nested ordered lists
//!
//! A list is built from a sequence of entries where each entry is either a
//! text item or a nested sequence. Levels are resolved once, at construction:
//! the outermost list is level 1 and every nested list sits one level below
//! its parent. Leaves carry their level directly, so attaching a list never
//! needs to walk back up the tree.

use docweave_ooxml::Docx;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One entry of a list description: text, or a nested list.
///
/// Deserializes untagged, so `["a", ["b", "c"], "d"]` is a list with a
/// nested list between its second and third items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListEntry {
    Text(String),
    Nested(Vec<ListEntry>),
}

impl From<&str> for ListEntry {
    fn from(s: &str) -> Self {
        ListEntry::Text(s.to_string())
    }
}

impl From<String> for ListEntry {
    fn from(s: String) -> Self {
        ListEntry::Text(s)
    }
}

impl From<Vec<ListEntry>> for ListEntry {
    fn from(entries: Vec<ListEntry>) -> Self {
        ListEntry::Nested(entries)
    }
}

impl From<OrderedList> for ListEntry {
    fn from(list: OrderedList) -> Self {
        ListEntry::Nested(list.to_entries())
    }
}

/// A leaf of an ordered list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    /// Item text
    pub text: String,
    /// Level of the list that owns the item (1 = outermost)
    pub level: u32,
}

/// A child of an ordered list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListNode {
    Item(ListItem),
    List(OrderedList),
}

/// A numbered list whose items may contain further numbered lists
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedList {
    level: u32,
    nodes: Vec<ListNode>,
}

impl OrderedList {
    /// Build an outermost (level 1) list
    pub fn new<I>(entries: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<ListEntry>,
    {
        Self::at_level(entries.into_iter().map(Into::into), 1)
    }

    fn at_level(entries: impl IntoIterator<Item = ListEntry>, level: u32) -> Self {
        let nodes = entries
            .into_iter()
            .map(|entry| match entry {
                ListEntry::Text(text) => ListNode::Item(ListItem { text, level }),
                ListEntry::Nested(children) => ListNode::List(Self::at_level(children, level + 1)),
            })
            .collect();
        Self { level, nodes }
    }

    /// Append a prebuilt list as a nested child, moving it one level below this list
    pub fn nested(mut self, mut list: OrderedList) -> Self {
        list.relevel(self.level + 1);
        self.nodes.push(ListNode::List(list));
        self
    }

    fn relevel(&mut self, level: u32) {
        self.level = level;
        for node in &mut self.nodes {
            match node {
                ListNode::Item(item) => item.level = level,
                ListNode::List(list) => list.relevel(level + 1),
            }
        }
    }

    /// The list's level (1 = outermost)
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Direct children in order
    pub fn nodes(&self) -> &[ListNode] {
        &self.nodes
    }

    /// All leaf items, depth-first
    pub fn items(&self) -> Box<dyn Iterator<Item = &ListItem> + '_> {
        Box::new(self.nodes.iter().flat_map(
            |node| -> Box<dyn Iterator<Item = &ListItem> + '_> {
                match node {
                    ListNode::Item(item) => Box::new(std::iter::once(item)),
                    ListNode::List(list) => list.items(),
                }
            },
        ))
    }

    /// Number of leaf items at any depth
    pub fn len(&self) -> usize {
        self.items().count()
    }

    /// Whether the list has no leaf items at any depth
    pub fn is_empty(&self) -> bool {
        self.items().next().is_none()
    }

    /// Deepest level in the list
    pub fn depth(&self) -> u32 {
        self.nodes
            .iter()
            .filter_map(|node| match node {
                ListNode::List(list) => Some(list.depth()),
                ListNode::Item(_) => None,
            })
            .fold(self.level, u32::max)
    }

    /// Convert back into the entry form the list was built from
    pub fn to_entries(&self) -> Vec<ListEntry> {
        self.nodes
            .iter()
            .map(|node| match node {
                ListNode::Item(item) => ListEntry::Text(item.text.clone()),
                ListNode::List(list) => ListEntry::Nested(list.to_entries()),
            })
            .collect()
    }

    /// Append every item, depth-first, as a "List Number" paragraph
    pub fn attach(&self, docx: &mut Docx) -> Result<()> {
        for item in self.items() {
            docx.add_paragraph(&item.text, Some(&list_style(item.level)))?;
        }
        Ok(())
    }
}

/// Paragraph style for a list level: "List Number", "List Number 2", ...
pub fn list_style(level: u32) -> String {
    if level > 1 {
        format!("List Number {}", level)
    } else {
        "List Number".to_string()
    }
}
