use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use uuid::Uuid;

/// The smallest orderable unit on a board.
///
/// Identity is `id`, which must be unique across the whole board. Any
/// further fields the host attaches (title, description, ...) round-trip
/// through `extra` untouched; the engine never looks at them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Card {
    /// Creates a card with a generated UUID v4 id
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            extra: Map::new(),
        }
    }

    /// Creates a card with a caller-supplied id
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            extra: Map::new(),
        }
    }

    /// Attaches an arbitrary caller-defined field
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

impl Default for Card {
    fn default() -> Self {
        Self::new()
    }
}

/// An ordered container of cards.
///
/// `cards` ordering is significant: visual top-to-bottom order equals the
/// vector order. Cards are shared via `Arc` so that reorder transforms can
/// reuse unmodified entries instead of cloning them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub cards: Vec<Arc<Card>>,
}

impl Column {
    /// Creates an empty column with a generated UUID v4 id
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: Some(name.into()),
            cards: Vec::new(),
        }
    }

    /// Creates an empty column with a caller-supplied id
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            cards: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_cards(mut self, cards: impl IntoIterator<Item = Card>) -> Self {
        self.cards = cards.into_iter().map(Arc::new).collect();
        self
    }
}

/// Where a card currently lives within a column list.
#[derive(Debug)]
pub struct CardLocation<'a> {
    pub column: &'a Arc<Column>,
    pub column_index: usize,
    pub card_index: usize,
}

/// Finds a column by id
pub fn find_column<'a>(columns: &'a [Arc<Column>], column_id: &str) -> Option<&'a Arc<Column>> {
    columns.iter().find(|column| column.id == column_id)
}

/// Finds a card by id, scanning all columns.
///
/// First match wins; card ids are assumed unique across the board.
pub fn find_card<'a>(columns: &'a [Arc<Column>], card_id: &str) -> Option<CardLocation<'a>> {
    columns.iter().enumerate().find_map(|(column_index, column)| {
        column
            .cards
            .iter()
            .position(|card| card.id == card_id)
            .map(|card_index| CardLocation {
                column,
                column_index,
                card_index,
            })
    })
}
