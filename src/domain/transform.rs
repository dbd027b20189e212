use crate::domain::board::{find_card, Card, Column};
use crate::error::{BoardError, Result};
use std::sync::Arc;

/// Result of a card move: the new column list plus everything the
/// fine-grained callbacks need to describe the move.
#[derive(Debug)]
pub struct CardMove {
    pub columns: Vec<Arc<Column>>,
    pub card: Arc<Card>,
    pub new_column: Arc<Column>,
    pub new_index: usize,
    pub old_column: Arc<Column>,
    pub old_index: usize,
}

/// Result of a column move.
#[derive(Debug)]
pub struct ColumnMove {
    pub columns: Vec<Arc<Column>>,
    pub column: Arc<Column>,
    pub new_index: usize,
    pub old_index: usize,
}

/// Result of appending a card to a column.
#[derive(Debug)]
pub struct CardAppend {
    pub columns: Vec<Arc<Column>>,
    pub card: Arc<Card>,
    pub column: Arc<Column>,
    pub index: usize,
}

/// Result of appending a column.
#[derive(Debug)]
pub struct ColumnAppend {
    pub columns: Vec<Arc<Column>>,
    pub column: Arc<Column>,
    pub index: usize,
}

fn rebuild(column: &Column, cards: Vec<Arc<Card>>) -> Arc<Column> {
    let mut column = column.clone();
    column.cards = cards;
    Arc::new(column)
}

/// Removes a card from its current column and inserts it into the
/// destination column at `destination_index`.
///
/// The destination index addresses the destination list *after* the card
/// has been removed, so same-column callers must pass an already corrected
/// index. Indices past the end insert at the end. Only the affected
/// column(s) are reallocated; every other column and every card keeps its
/// `Arc` identity.
pub fn move_card(
    columns: &[Arc<Column>],
    card_id: &str,
    destination_column_id: &str,
    destination_index: usize,
) -> Result<CardMove> {
    let location =
        find_card(columns, card_id).ok_or_else(|| BoardError::CardNotFound(card_id.to_string()))?;
    let old_column = Arc::clone(location.column);
    let old_index = location.card_index;
    let source = location.column_index;

    let destination = columns
        .iter()
        .position(|column| column.id == destination_column_id)
        .ok_or_else(|| BoardError::ColumnNotFound(destination_column_id.to_string()))?;

    let card = Arc::clone(&old_column.cards[old_index]);
    let mut new_columns = columns.to_vec();

    let new_column;
    let new_index;
    if source == destination {
        let mut cards = old_column.cards.clone();
        cards.remove(old_index);
        new_index = destination_index.min(cards.len());
        cards.insert(new_index, Arc::clone(&card));
        new_column = rebuild(&old_column, cards);
        new_columns[destination] = Arc::clone(&new_column);
    } else {
        let mut source_cards = old_column.cards.clone();
        source_cards.remove(old_index);
        new_columns[source] = rebuild(&old_column, source_cards);

        let mut destination_cards = columns[destination].cards.clone();
        new_index = destination_index.min(destination_cards.len());
        destination_cards.insert(new_index, Arc::clone(&card));
        new_column = rebuild(&columns[destination], destination_cards);
        new_columns[destination] = Arc::clone(&new_column);
    }

    Ok(CardMove {
        columns: new_columns,
        card,
        new_column,
        new_index,
        old_column,
        old_index,
    })
}

/// Removes a column and reinserts it at `destination_index`.
///
/// As with [`move_card`], the destination addresses the list after
/// removal, and indices past the end insert at the end.
pub fn move_column(
    columns: &[Arc<Column>],
    column_id: &str,
    destination_index: usize,
) -> Result<ColumnMove> {
    let old_index = columns
        .iter()
        .position(|column| column.id == column_id)
        .ok_or_else(|| BoardError::ColumnNotFound(column_id.to_string()))?;

    let mut new_columns = columns.to_vec();
    let column = new_columns.remove(old_index);
    let new_index = destination_index.min(new_columns.len());
    new_columns.insert(new_index, Arc::clone(&column));

    Ok(ColumnMove {
        columns: new_columns,
        column,
        new_index,
        old_index,
    })
}

/// Appends a card to the end of the identified column's list.
pub fn append_card(columns: &[Arc<Column>], column_id: &str, card: Card) -> Result<CardAppend> {
    let position = columns
        .iter()
        .position(|column| column.id == column_id)
        .ok_or_else(|| BoardError::ColumnNotFound(column_id.to_string()))?;

    let card = Arc::new(card);
    let mut cards = columns[position].cards.clone();
    cards.push(Arc::clone(&card));
    let index = cards.len() - 1;
    let column = rebuild(&columns[position], cards);

    let mut new_columns = columns.to_vec();
    new_columns[position] = Arc::clone(&column);

    Ok(CardAppend {
        columns: new_columns,
        card,
        column,
        index,
    })
}

/// Appends a column to the end of the board.
pub fn append_column(columns: &[Arc<Column>], column: Column) -> ColumnAppend {
    let column = Arc::new(column);
    let mut new_columns = columns.to_vec();
    new_columns.push(Arc::clone(&column));
    let index = new_columns.len() - 1;

    ColumnAppend {
        columns: new_columns,
        column,
        index,
    }
}
