use crate::drag::payload::DropTargetData;

/// Where a dragged card would land if dropped now.
///
/// `raw_index` is the gap the pointer is over in the unchanged list (what
/// the indicator renders); `index` is the insertion index after the
/// same-list correction (what the commit uses). Keeping both from one
/// resolution is what stops the indicator from lying about the landing
/// spot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardDestination {
    pub column_id: String,
    pub raw_index: usize,
    pub index: usize,
}

/// Where a dragged column would land if dropped now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDestination {
    pub raw_index: usize,
    pub index: usize,
}

/// Arguments handed to the host's column-move predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMoveRequest<'a> {
    pub column_id: &'a str,
    pub source_index: usize,
    pub destination_index: usize,
}

fn correct_for_removal(source_index: usize, raw_index: usize, same_list: bool) -> usize {
    // The dragged item leaves its slot before reinsertion, shifting every
    // later gap down by one.
    if same_list && raw_index > source_index {
        raw_index - 1
    } else {
        raw_index
    }
}

/// Resolves the drop targets under a dragged card into a destination.
///
/// A specific card-position target wins over a list-tail target. Returns
/// `None` when no target applies or the corrected destination equals the
/// card's current position.
pub fn resolve_card_destination(
    source_column_id: &str,
    source_index: usize,
    targets: &[DropTargetData],
) -> Option<CardDestination> {
    let position = targets
        .iter()
        .find(|target| matches!(target, DropTargetData::CardPosition { .. }));
    let list_tail = targets
        .iter()
        .find(|target| matches!(target, DropTargetData::CardList { .. }));

    let (column_id, raw_index) = match position.or(list_tail)? {
        DropTargetData::CardPosition { column_id, index }
        | DropTargetData::CardList { column_id, index } => (column_id.clone(), *index),
        DropTargetData::ColumnPosition { .. } => return None,
    };

    let same_list = column_id == source_column_id;
    let index = correct_for_removal(source_index, raw_index, same_list);
    if same_list && index == source_index {
        return None;
    }

    Some(CardDestination {
        column_id,
        raw_index,
        index,
    })
}

/// Resolves the drop targets under a dragged column into a destination.
///
/// `allow` is the host's move predicate; absent means every move is
/// allowed. Returns `None` when no column target applies, the corrected
/// destination equals the source, or the predicate rejects the move.
pub fn resolve_column_destination(
    source_column_id: &str,
    source_index: usize,
    targets: &[DropTargetData],
    allow: Option<&dyn Fn(&ColumnMoveRequest<'_>) -> bool>,
) -> Option<ColumnDestination> {
    let raw_index = targets.iter().find_map(|target| match target {
        DropTargetData::ColumnPosition { index, .. } => Some(*index),
        _ => None,
    })?;

    let index = correct_for_removal(source_index, raw_index, true);
    if index == source_index {
        return None;
    }

    let request = ColumnMoveRequest {
        column_id: source_column_id,
        source_index,
        destination_index: index,
    };
    if !allow.map_or(true, |allow| allow(&request)) {
        return None;
    }

    Some(ColumnDestination { raw_index, index })
}
