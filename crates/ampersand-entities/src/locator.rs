//! Finding the entity table inside a parsed page.

use ampersand_dom::{DomTree, NodeId};

use crate::error::StructureDefect;

/// Id of the element that wraps the table on the WHATWG page.
pub const DEFAULT_MARKER_ID: &str = "named-character-references-table";

/// Finds the table element holding the entity definitions.
pub trait TableLocator {
    /// Return the table element.
    ///
    /// # Errors
    ///
    /// Returns a [`StructureDefect`] when the document does not contain
    /// exactly one usable table.
    fn locate(&self, tree: &DomTree) -> Result<NodeId, StructureDefect>;
}

/// Locates the table through an element id.
///
/// If the marker element is itself a `table` it is used; otherwise the first
/// `table` below it in document order.
#[derive(Debug, Clone)]
pub struct MarkerLocator {
    marker_id: String,
}

impl MarkerLocator {
    /// Locate through the element with id `marker_id`.
    #[must_use]
    pub fn new(marker_id: impl Into<String>) -> Self {
        Self {
            marker_id: marker_id.into(),
        }
    }

    /// The id this locator looks for.
    #[must_use]
    pub fn marker_id(&self) -> &str {
        &self.marker_id
    }
}

impl Default for MarkerLocator {
    fn default() -> Self {
        Self::new(DEFAULT_MARKER_ID)
    }
}

impl TableLocator for MarkerLocator {
    fn locate(&self, tree: &DomTree) -> Result<NodeId, StructureDefect> {
        let marker = match tree.elements_with_id(&self.marker_id).as_slice() {
            [] => return Err(StructureDefect::MarkerNotFound(self.marker_id.clone())),
            [marker] => *marker,
            many => return Err(StructureDefect::AmbiguousMarker(many.len())),
        };

        if tree.is_element_named(marker, "table") {
            return Ok(marker);
        }
        tree.first_descendant_element(marker, "table")
            .ok_or(StructureDefect::TableNotFound)
    }
}

/// The `tr` elements owned by `table`, in document order.
///
/// Rows of tables nested inside a cell belong to the nested table and are
/// left out.
#[must_use]
pub fn table_rows(tree: &DomTree, table: NodeId) -> Vec<NodeId> {
    tree.descendants(table)
        .filter(|&id| tree.is_element_named(id, "tr"))
        .filter(|&row| {
            tree.ancestors(row)
                .find(|&a| tree.is_element_named(a, "table"))
                == Some(table)
        })
        .collect()
}
