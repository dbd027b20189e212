/// Render-facing drop indicator state, recomputed on every drag tick.
///
/// A single value models both indicator kinds, which makes the "card and
/// column indicators are never lit simultaneously" rule structural. The
/// carried index is the raw gap index in the still-unchanged list: the
/// gap is drawn between the items as they are, while the commit uses the
/// corrected insertion index.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DropIndicator {
    #[default]
    None,
    /// Gap between columns (before the column at this index)
    ColumnGap(usize),
    /// Gap between cards within one column
    CardGap { column_id: String, index: usize },
}

impl DropIndicator {
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// The highlighted column gap, if any
    pub fn column_gap(&self) -> Option<usize> {
        match self {
            Self::ColumnGap(index) => Some(*index),
            _ => None,
        }
    }

    /// The highlighted card gap within the given column, if any
    pub fn card_gap_in(&self, column_id: &str) -> Option<usize> {
        match self {
            Self::CardGap {
                column_id: indicated,
                index,
            } if indicated == column_id => Some(*index),
            _ => None,
        }
    }
}
