use crate::domain::board::{Card, Column};
use crate::engine::BoardEngine;
use std::sync::Arc;

/// One card as the rendering layer should draw it
#[derive(Debug, Clone)]
pub struct CardView {
    pub card: Arc<Card>,
    pub is_dragging: bool,
}

/// One column as the rendering layer should draw it: cards in order and
/// the card gap to highlight, if the live drag points into this column.
#[derive(Debug, Clone)]
pub struct ColumnView {
    pub column: Arc<Column>,
    pub cards: Vec<CardView>,
    pub is_dragging: bool,
    /// Highlighted gap index within this column's card list
    pub card_gap: Option<usize>,
}

/// Render-facing snapshot of the whole board.
///
/// Pure derivation from the engine: ordering, indicator placement, and
/// affordance visibility are all decided elsewhere. Rebuild it after any
/// engine callback or drag tick.
#[derive(Debug, Clone)]
pub struct BoardView {
    pub columns: Vec<ColumnView>,
    /// Highlighted gap index between columns
    pub column_gap: Option<usize>,
    /// Show the add-card affordance on each column
    pub can_add_cards: bool,
    /// Show the add-column affordance at the strip's end
    pub can_add_columns: bool,
    /// Attach cards as drag-disabled when false
    pub cards_movable: bool,
    /// Attach columns as drag-disabled when false
    pub columns_movable: bool,
}

impl BoardView {
    pub fn build(engine: &BoardEngine) -> Self {
        let dragged_card = engine.dragged_card_id();
        let dragged_column = engine.dragged_column_id();
        let indicator = engine.indicator();

        let columns = engine
            .columns()
            .iter()
            .map(|column| {
                let cards = column
                    .cards
                    .iter()
                    .map(|card| CardView {
                        card: Arc::clone(card),
                        is_dragging: dragged_card == Some(card.id.as_str()),
                    })
                    .collect();
                ColumnView {
                    cards,
                    is_dragging: dragged_column == Some(column.id.as_str()),
                    card_gap: indicator.card_gap_in(&column.id),
                    column: Arc::clone(column),
                }
            })
            .collect();

        Self {
            columns,
            column_gap: indicator.column_gap(),
            can_add_cards: engine.can_add_cards(),
            can_add_columns: engine.can_add_columns(),
            cards_movable: engine.cards_movable(),
            columns_movable: engine.columns_movable(),
        }
    }
}
