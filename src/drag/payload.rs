use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Which kind of entity a drag is carrying
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKind {
    Card,
    Column,
}

/// Identity payload attached to a drag source at drag start.
///
/// Payloads travel through the generic drag adapter as untyped JSON, so
/// anything received back is revalidated with [`parse_drag_data`] before
/// the engine trusts it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DragData {
    #[serde(rename = "card")]
    Card {
        card_id: String,
        column_id: String,
        index: usize,
    },
    #[serde(rename = "column")]
    Column { column_id: String, index: usize },
}

impl DragData {
    pub fn kind(&self) -> DragKind {
        match self {
            Self::Card { .. } => DragKind::Card,
            Self::Column { .. } => DragKind::Column,
        }
    }
}

/// Positional payload produced by a drop target under the pointer.
///
/// `CardPosition` and `ColumnPosition` mean "insert at `index`, derived
/// from which half of the element the pointer is in". `CardList` is the
/// empty tail of a column's card list and always carries the list length.
/// A `ColumnPosition` without a `column_id` is the tail of the column
/// strip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DropTargetData {
    #[serde(rename = "card-position")]
    CardPosition { column_id: String, index: usize },
    #[serde(rename = "card-list")]
    CardList { column_id: String, index: usize },
    #[serde(rename = "column-position")]
    ColumnPosition {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        column_id: Option<String>,
        index: usize,
    },
}

impl DropTargetData {
    /// The drag kind this target can receive
    pub fn kind(&self) -> DragKind {
        match self {
            Self::CardPosition { .. } | Self::CardList { .. } => DragKind::Card,
            Self::ColumnPosition { .. } => DragKind::Column,
        }
    }
}

/// Validates an untyped drag-source payload.
///
/// Wrong tag, missing fields, wrong primitive types, and negative indices
/// all yield `None`: a foreign payload is not a drag this engine
/// understands, never an error.
pub fn parse_drag_data(value: &Value) -> Option<DragData> {
    serde_json::from_value(value.clone()).ok()
}

/// Validates an untyped drop-target payload. Same policy as
/// [`parse_drag_data`].
pub fn parse_drop_target_data(value: &Value) -> Option<DropTargetData> {
    serde_json::from_value(value.clone()).ok()
}
