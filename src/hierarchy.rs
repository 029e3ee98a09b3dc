//! In-memory folder tree built from a directory listing service.
//!
//! [`build`] walks the service depth-first, issuing exactly one listing per
//! folder, and [`sort`] reorders every level by natural name order. Both
//! operate on plain [`Node`] values that serialize straight to the output
//! document.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::natural::natural_cmp;

/// A non-folder item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    pub id: String,
    pub name: String,
}

/// A folder, or the root of the export.
///
/// `files` and `children` are always present, empty when the folder has no
/// items of that kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub name: String,
    pub files: Vec<FileRef>,
    pub children: Vec<Node>,
}

impl Node {
    /// Create an empty folder node.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            files: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Number of files in this folder and all descendants.
    pub fn file_count(&self) -> usize {
        self.files.len() + self.children.iter().map(Node::file_count).sum::<usize>()
    }

    /// Number of folders below this one.
    pub fn folder_count(&self) -> usize {
        self.children.len() + self.children.iter().map(Node::folder_count).sum::<usize>()
    }
}

/// One child reported by a folder listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildEntry {
    pub id: String,
    pub name: String,
    pub mime_type: String,
}

impl ChildEntry {
    /// Any MIME type mentioning "folder" counts, Drive's own
    /// [`FOLDER_MIME_TYPE`](crate::models::FOLDER_MIME_TYPE) included.
    pub fn is_folder(&self) -> bool {
        self.mime_type.contains("folder")
    }
}

/// A service that can list the immediate children of a folder.
#[allow(async_fn_in_trait)]
pub trait DirectoryService {
    /// Return every child whose parent is `folder_id`.
    async fn list_children(&self, folder_id: &str) -> Result<Vec<ChildEntry>>;
}

/// Build the full tree below `root_id`.
///
/// An empty `root_id` or `root_name` is accepted and passed through as is.
pub async fn build<S: DirectoryService>(
    service: &S,
    root_id: &str,
    root_name: &str,
) -> Result<Node> {
    let mut root = Node::new(root_id, root_name);
    expand(service, &mut root, root_id).await?;
    Ok(root)
}

/// Populate `node` with the contents of `folder_id`, recursing into each
/// subfolder before moving on to its next sibling.
///
/// Any listing error aborts the whole walk. There is no cycle detection: a
/// backend that reports a folder as its own descendant recurses forever.
pub async fn expand<S: DirectoryService>(
    service: &S,
    node: &mut Node,
    folder_id: &str,
) -> Result<()> {
    let children = service.list_children(folder_id).await?;
    debug!(folder_id, count = children.len(), "Listed folder");

    if children.is_empty() {
        return Ok(());
    }

    for child in children {
        if child.is_folder() {
            node.children.push(Node::new(child.id, child.name));
            if let Some(folder) = node.children.last_mut() {
                let folder_id = folder.id.clone();
                Box::pin(expand(service, folder, &folder_id)).await?;
            }
        } else {
            node.files.push(FileRef {
                id: child.id,
                name: child.name,
            });
        }
    }

    Ok(())
}

/// Reorder files and subfolders by natural name order at every level.
///
/// The sort is stable, so items with equal names keep their listing order
/// and sorting twice gives the same tree as sorting once.
pub fn sort(node: &mut Node) {
    if !node.files.is_empty() {
        node.files.sort_by(|a, b| natural_cmp(&a.name, &b.name));
    }

    if !node.children.is_empty() {
        node.children.sort_by(|a, b| natural_cmp(&a.name, &b.name));

        for child in &mut node.children {
            sort(child);
        }
    }
}
