use crate::domain::board::{find_column, Card, Column};
use crate::domain::transform;
use crate::drag::indicator::DropIndicator;
use crate::drag::payload::{parse_drag_data, parse_drop_target_data, DragData, DropTargetData};
use crate::drag::resolver::{
    resolve_card_destination, resolve_column_destination, ColumnMoveRequest,
};
use crate::drag::session::{DragPhase, DragSession, DragTick};
use crate::error::{BoardError, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// Bulk change sink: receives the complete new column list on every
/// committed operation, before the operation's fine-grained callback.
pub type ChangeFn = Box<dyn FnMut(&[Arc<Column>])>;
pub type ColumnAddedFn = Box<dyn FnMut(&Arc<Column>, usize)>;
/// `(column, new_index, old_index)`
pub type ColumnMovedFn = Box<dyn FnMut(&Arc<Column>, usize, usize)>;
pub type CardAddedFn = Box<dyn FnMut(&Arc<Card>, &Arc<Column>, usize)>;
/// `(card, new_column, new_index, old_column, old_index)`
pub type CardMovedFn = Box<dyn FnMut(&Arc<Card>, &Arc<Column>, usize, &Arc<Column>, usize)>;
pub type ColumnMoveAllowedFn = Box<dyn Fn(&ColumnMoveRequest<'_>) -> bool>;

/// Host factory for new columns. Returning `Ok(None)` means the caller
/// declined to create one (e.g. a creation dialog was dismissed).
#[async_trait]
pub trait ColumnFactory: Send + Sync {
    async fn create_column(&self) -> anyhow::Result<Option<Column>>;
}

/// Host factory for new cards in the given column
#[async_trait]
pub trait CardFactory: Send + Sync {
    async fn create_card(&self, column: &Column) -> anyhow::Result<Option<Card>>;
}

/// The board reconciliation engine.
///
/// The host owns the board data and remains its source of truth; the
/// engine mirrors the latest known column list, recomputes a new ordering
/// for every operation, and reports it back through the configured
/// callbacks (bulk `on_change` first, then the operation's fine-grained
/// callback). The host pushes external changes back in with
/// [`set_columns`](Self::set_columns).
///
/// Operations whose result nobody consumes are skipped outright: moving
/// a card with neither `on_change` nor `on_card_moved` registered is a
/// deliberate no-op.
#[derive(Default)]
pub struct BoardEngine {
    columns: Vec<Arc<Column>>,
    session: DragSession,
    indicator: DropIndicator,
    on_change: Option<ChangeFn>,
    on_column_added: Option<ColumnAddedFn>,
    on_column_moved: Option<ColumnMovedFn>,
    on_card_added: Option<CardAddedFn>,
    on_card_moved: Option<CardMovedFn>,
    column_factory: Option<Arc<dyn ColumnFactory>>,
    card_factory: Option<Arc<dyn CardFactory>>,
    is_column_move_allowed: Option<ColumnMoveAllowedFn>,
}

impl BoardEngine {
    pub fn new(columns: Vec<Arc<Column>>) -> Self {
        Self {
            columns,
            ..Self::default()
        }
    }

    /// Convenience constructor taking plain columns
    pub fn from_columns(columns: impl IntoIterator<Item = Column>) -> Self {
        Self::new(columns.into_iter().map(Arc::new).collect())
    }

    pub fn with_on_change(mut self, f: impl FnMut(&[Arc<Column>]) + 'static) -> Self {
        self.on_change = Some(Box::new(f));
        self
    }

    pub fn with_on_column_added(mut self, f: impl FnMut(&Arc<Column>, usize) + 'static) -> Self {
        self.on_column_added = Some(Box::new(f));
        self
    }

    pub fn with_on_column_moved(
        mut self,
        f: impl FnMut(&Arc<Column>, usize, usize) + 'static,
    ) -> Self {
        self.on_column_moved = Some(Box::new(f));
        self
    }

    pub fn with_on_card_added(
        mut self,
        f: impl FnMut(&Arc<Card>, &Arc<Column>, usize) + 'static,
    ) -> Self {
        self.on_card_added = Some(Box::new(f));
        self
    }

    pub fn with_on_card_moved(
        mut self,
        f: impl FnMut(&Arc<Card>, &Arc<Column>, usize, &Arc<Column>, usize) + 'static,
    ) -> Self {
        self.on_card_moved = Some(Box::new(f));
        self
    }

    pub fn with_column_factory(mut self, factory: impl ColumnFactory + 'static) -> Self {
        self.column_factory = Some(Arc::new(factory));
        self
    }

    pub fn with_card_factory(mut self, factory: impl CardFactory + 'static) -> Self {
        self.card_factory = Some(Arc::new(factory));
        self
    }

    /// Pure, fast predicate consulted for every prospective column move,
    /// on every drag tick as well as at drop time
    pub fn with_is_column_move_allowed(
        mut self,
        f: impl Fn(&ColumnMoveRequest<'_>) -> bool + 'static,
    ) -> Self {
        self.is_column_move_allowed = Some(Box::new(f));
        self
    }

    /// Replaces the engine's latest known column list. Call whenever the
    /// host changed the data outside the engine (re-render, external
    /// edit).
    pub fn set_columns(&mut self, columns: Vec<Arc<Column>>) {
        self.columns = columns;
    }

    /// The latest known column list
    pub fn columns(&self) -> &[Arc<Column>] {
        &self.columns
    }

    pub fn indicator(&self) -> &DropIndicator {
        &self.indicator
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_dragging()
    }

    pub fn dragged_card_id(&self) -> Option<&str> {
        match self.session.source() {
            Some(DragData::Card { card_id, .. }) => Some(card_id),
            _ => None,
        }
    }

    pub fn dragged_column_id(&self) -> Option<&str> {
        match self.session.source() {
            Some(DragData::Column { column_id, .. }) => Some(column_id),
            _ => None,
        }
    }

    /// Whether card dragging is live: someone consumes the result
    pub fn cards_movable(&self) -> bool {
        self.on_change.is_some() || self.on_card_moved.is_some()
    }

    /// Whether column dragging is live
    pub fn columns_movable(&self) -> bool {
        self.on_change.is_some() || self.on_column_moved.is_some()
    }

    /// Whether the add-card affordance should be shown
    pub fn can_add_cards(&self) -> bool {
        self.card_factory.is_some()
    }

    /// Whether the add-column affordance should be shown
    pub fn can_add_columns(&self) -> bool {
        self.column_factory.is_some()
    }

    fn handles_card_add(&self) -> bool {
        self.on_change.is_some() || self.on_card_added.is_some()
    }

    fn handles_column_add(&self) -> bool {
        self.on_change.is_some() || self.on_column_added.is_some()
    }

    /// Moves a card to `destination_index` within the destination column.
    ///
    /// The index addresses the destination list with the card already
    /// removed from its old position (the resolver's corrected index).
    /// Unknown card or column ids abort the move and report the error;
    /// with no move consumer registered this is a deliberate no-op.
    pub fn move_card(
        &mut self,
        card_id: &str,
        destination_column_id: &str,
        destination_index: usize,
    ) -> Result<()> {
        if !self.cards_movable() {
            // No point in working out the details
            return Ok(());
        }

        let moved = match transform::move_card(
            &self.columns,
            card_id,
            destination_column_id,
            destination_index,
        ) {
            Ok(moved) => moved,
            Err(error) => {
                tracing::error!("{error}");
                return Err(error);
            }
        };

        let transform::CardMove {
            columns,
            card,
            new_column,
            new_index,
            old_column,
            old_index,
        } = moved;
        self.columns = columns;

        if let Some(on_change) = self.on_change.as_mut() {
            on_change(&self.columns);
        }
        if let Some(on_card_moved) = self.on_card_moved.as_mut() {
            on_card_moved(&card, &new_column, new_index, &old_column, old_index);
        }
        Ok(())
    }

    /// Moves a column to `destination_index` (addressing the list with
    /// the column already removed)
    pub fn move_column(&mut self, column_id: &str, destination_index: usize) -> Result<()> {
        if !self.columns_movable() {
            return Ok(());
        }

        let moved = match transform::move_column(&self.columns, column_id, destination_index) {
            Ok(moved) => moved,
            Err(error) => {
                tracing::error!("{error}");
                return Err(error);
            }
        };

        let transform::ColumnMove {
            columns,
            column,
            new_index,
            old_index,
        } = moved;
        self.columns = columns;

        if let Some(on_change) = self.on_change.as_mut() {
            on_change(&self.columns);
        }
        if let Some(on_column_moved) = self.on_column_moved.as_mut() {
            on_column_moved(&column, new_index, old_index);
        }
        Ok(())
    }

    /// Adds a card to the end of the identified column.
    ///
    /// Two phases: first the host factory runs (its side effect happens
    /// even if nobody consumes the result); then, if a value came back
    /// and an add consumer is registered, the append is computed against
    /// the latest known state, so a prior add that landed while the
    /// factory was pending is not clobbered.
    pub async fn add_card(&mut self, column_id: &str) -> Result<()> {
        let Some(factory) = self.card_factory.clone() else {
            return Ok(());
        };
        let Some(column) = find_column(&self.columns, column_id).cloned() else {
            let error = BoardError::ColumnNotFound(column_id.to_string());
            tracing::debug!("{error}");
            return Err(error);
        };

        let card = match factory.create_card(&column).await {
            Ok(Some(card)) => card,
            // Caller declined to create
            Ok(None) => return Ok(()),
            Err(error) => {
                tracing::error!("create_card failed: {error:#}");
                return Ok(());
            }
        };

        if !self.handles_card_add() {
            return Ok(());
        }

        let appended = match transform::append_card(&self.columns, column_id, card) {
            Ok(appended) => appended,
            Err(error) => {
                // The column disappeared while the factory was pending.
                tracing::debug!("{error}");
                return Err(error);
            }
        };

        let transform::CardAppend {
            columns,
            card,
            column,
            index,
        } = appended;
        self.columns = columns;

        if let Some(on_change) = self.on_change.as_mut() {
            on_change(&self.columns);
        }
        if let Some(on_card_added) = self.on_card_added.as_mut() {
            on_card_added(&card, &column, index);
        }
        Ok(())
    }

    /// Adds a column to the end of the board. Same two-phase contract as
    /// [`add_card`](Self::add_card).
    pub async fn add_column(&mut self) -> Result<()> {
        let Some(factory) = self.column_factory.clone() else {
            return Ok(());
        };

        let column = match factory.create_column().await {
            Ok(Some(column)) => column,
            Ok(None) => return Ok(()),
            Err(error) => {
                tracing::error!("create_column failed: {error:#}");
                return Ok(());
            }
        };

        if !self.handles_column_add() {
            return Ok(());
        }

        let transform::ColumnAppend {
            columns,
            column,
            index,
        } = transform::append_column(&self.columns, column);
        self.columns = columns;

        if let Some(on_change) = self.on_change.as_mut() {
            on_change(&self.columns);
        }
        if let Some(on_column_added) = self.on_column_added.as_mut() {
            on_column_added(&column, index);
        }
        Ok(())
    }

    /// Routes one drag lifecycle event.
    ///
    /// Start pins the validated drag source for the session; move and
    /// target-change ticks recompute the drop indicator; drop commits
    /// through the same resolver the indicator used, then clears the
    /// session and indicator unconditionally. Ticks with an invalid
    /// source, or delivered while idle, are ignored.
    pub fn handle_drag(&mut self, phase: DragPhase, tick: &DragTick) {
        match phase {
            DragPhase::Start => {
                let Some(source) = parse_drag_data(&tick.source) else {
                    return;
                };
                self.session = DragSession::Dragging(source.clone());
                let targets = parse_targets(tick);
                self.update_indicator(&source, &targets);
            }
            DragPhase::Move | DragPhase::TargetChange => {
                let Some(source) = self.session.source().cloned() else {
                    return;
                };
                let targets = parse_targets(tick);
                self.update_indicator(&source, &targets);
            }
            DragPhase::Drop => {
                let Some(source) = self.session.source().cloned() else {
                    self.set_indicator(DropIndicator::None);
                    return;
                };
                let targets = parse_targets(tick);
                self.commit_drop(&source, &targets);
                self.session = DragSession::Idle;
                self.set_indicator(DropIndicator::None);
            }
        }
    }

    fn update_indicator(&mut self, source: &DragData, targets: &[DropTargetData]) {
        let next = match source {
            DragData::Card {
                column_id, index, ..
            } => match resolve_card_destination(column_id, *index, targets) {
                Some(destination) => DropIndicator::CardGap {
                    column_id: destination.column_id,
                    index: destination.raw_index,
                },
                None => DropIndicator::None,
            },
            DragData::Column { column_id, index } => {
                let allow = self.is_column_move_allowed.as_deref();
                match resolve_column_destination(column_id, *index, targets, allow) {
                    Some(destination) => DropIndicator::ColumnGap(destination.raw_index),
                    None => DropIndicator::None,
                }
            }
        };
        self.set_indicator(next);
    }

    fn set_indicator(&mut self, next: DropIndicator) {
        if self.indicator != next {
            self.indicator = next;
        }
    }

    fn commit_drop(&mut self, source: &DragData, targets: &[DropTargetData]) {
        match source {
            DragData::Card {
                card_id,
                column_id,
                index,
            } => {
                if let Some(destination) = resolve_card_destination(column_id, *index, targets) {
                    // Failures are already reported inside move_card.
                    let _ = self.move_card(card_id, &destination.column_id, destination.index);
                }
            }
            DragData::Column { column_id, index } => {
                let allow = self.is_column_move_allowed.as_deref();
                let destination = resolve_column_destination(column_id, *index, targets, allow);
                if let Some(destination) = destination {
                    let _ = self.move_column(column_id, destination.index);
                }
            }
        }
    }
}

fn parse_targets(tick: &DragTick) -> Vec<DropTargetData> {
    tick.targets
        .iter()
        .filter_map(parse_drop_target_data)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn column(id: &str, card_ids: &[&str]) -> Column {
        Column::with_id(id).with_cards(card_ids.iter().map(|id| Card::with_id(*id)))
    }

    fn card_ids(column: &Column) -> Vec<String> {
        column.cards.iter().map(|card| card.id.clone()).collect()
    }

    fn card_drag(card_id: &str, column_id: &str, index: usize) -> Value {
        json!({"type": "card", "card_id": card_id, "column_id": column_id, "index": index})
    }

    fn card_position(column_id: &str, index: usize) -> Value {
        json!({"type": "card-position", "column_id": column_id, "index": index})
    }

    fn column_drag(column_id: &str, index: usize) -> Value {
        json!({"type": "column", "column_id": column_id, "index": index})
    }

    fn column_position(index: usize) -> Value {
        json!({"type": "column-position", "index": index})
    }

    #[derive(Clone, Default)]
    struct EventLog(Rc<RefCell<Vec<String>>>);

    impl EventLog {
        fn push(&self, event: impl Into<String>) {
            self.0.borrow_mut().push(event.into());
        }

        fn events(&self) -> Vec<String> {
            self.0.borrow().clone()
        }
    }

    #[test]
    fn test_move_card_fires_on_change_before_on_card_moved() {
        let log = EventLog::default();
        let change_log = log.clone();
        let moved_log = log.clone();
        let mut engine = BoardEngine::from_columns([column("x", &["a", "b"]), column("y", &[])])
            .with_on_change(move |columns| {
                let order: Vec<String> = columns
                    .iter()
                    .flat_map(|c| c.cards.iter().map(|card| card.id.clone()))
                    .collect();
                change_log.push(format!("change:{}", order.join(",")));
            })
            .with_on_card_moved(move |card, new_column, new_index, old_column, old_index| {
                moved_log.push(format!(
                    "moved:{}:{}:{}:{}:{}",
                    card.id, new_column.id, new_index, old_column.id, old_index
                ));
            });

        engine.move_card("a", "y", 0).unwrap();

        assert_eq!(log.events(), ["change:b,a", "moved:a:y:0:x:0"]);
        assert_eq!(card_ids(&engine.columns()[0]), ["b"]);
        assert_eq!(card_ids(&engine.columns()[1]), ["a"]);
    }

    #[test]
    fn test_cross_column_move_reports_old_and_new_positions() {
        let log = EventLog::default();
        let moved_log = log.clone();
        let mut engine = BoardEngine::from_columns([column("x", &["x1"]), column("y", &[])])
            .with_on_card_moved(move |card, new_column, new_index, old_column, old_index| {
                moved_log.push(format!(
                    "{}:{}:{}:{}:{}",
                    card.id, new_column.id, new_index, old_column.id, old_index
                ));
            });

        engine.move_card("x1", "y", 0).unwrap();

        assert_eq!(log.events(), ["x1:y:0:x:0"]);
        assert!(engine.columns()[0].cards.is_empty());
    }

    #[test]
    fn test_move_without_consumer_is_a_no_op() {
        let mut engine = BoardEngine::from_columns([column("x", &["a", "b"])]);
        let before = engine.columns().to_vec();

        engine.move_card("a", "x", 1).unwrap();
        engine.move_column("x", 0).unwrap();

        // Nothing computed, nothing changed.
        assert!(Arc::ptr_eq(&engine.columns()[0], &before[0]));
    }

    #[test]
    fn test_move_card_unknown_id_is_reported_and_harmless() {
        let log = EventLog::default();
        let change_log = log.clone();
        let mut engine = BoardEngine::from_columns([column("x", &["a"])])
            .with_on_change(move |_| change_log.push("change"));

        assert!(matches!(
            engine.move_card("ghost", "x", 0),
            Err(BoardError::CardNotFound(_))
        ));
        assert!(matches!(
            engine.move_card("a", "ghost", 0),
            Err(BoardError::ColumnNotFound(_))
        ));
        assert!(log.events().is_empty());
    }

    #[test]
    fn test_move_column_callbacks() {
        let log = EventLog::default();
        let change_log = log.clone();
        let moved_log = log.clone();
        let mut engine =
            BoardEngine::from_columns([column("x", &[]), column("y", &[]), column("z", &[])])
                .with_on_change(move |columns| {
                    let order: Vec<&str> = columns.iter().map(|c| c.id.as_str()).collect();
                    change_log.push(format!("change:{}", order.join(",")));
                })
                .with_on_column_moved(move |column, new_index, old_index| {
                    moved_log.push(format!("moved:{}:{}:{}", column.id, new_index, old_index));
                });

        engine.move_column("z", 0).unwrap();

        assert_eq!(log.events(), ["change:z,x,y", "moved:z:0:2"]);
    }

    struct StaticCardFactory {
        cards: Mutex<Vec<Option<Card>>>,
        calls: Arc<AtomicUsize>,
    }

    impl StaticCardFactory {
        fn new(cards: Vec<Option<Card>>) -> Self {
            Self {
                cards: Mutex::new(cards),
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    #[async_trait]
    impl CardFactory for StaticCardFactory {
        async fn create_card(&self, _column: &Column) -> anyhow::Result<Option<Card>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut cards = self.cards.lock().unwrap();
            if cards.is_empty() {
                Ok(None)
            } else {
                Ok(cards.remove(0))
            }
        }
    }

    struct StaticColumnFactory(Mutex<Vec<Option<Column>>>);

    #[async_trait]
    impl ColumnFactory for StaticColumnFactory {
        async fn create_column(&self) -> anyhow::Result<Option<Column>> {
            let mut columns = self.0.lock().unwrap();
            if columns.is_empty() {
                Ok(None)
            } else {
                Ok(columns.remove(0))
            }
        }
    }

    #[tokio::test]
    async fn test_add_card_appends_and_reports() {
        let log = EventLog::default();
        let change_log = log.clone();
        let added_log = log.clone();
        let mut engine = BoardEngine::from_columns([column("x", &["a"])])
            .with_card_factory(StaticCardFactory::new(vec![Some(Card::with_id("b"))]))
            .with_on_change(move |_| change_log.push("change"))
            .with_on_card_added(move |card, column, index| {
                added_log.push(format!("added:{}:{}:{}", card.id, column.id, index));
            });

        engine.add_card("x").await.unwrap();

        assert_eq!(log.events(), ["change", "added:b:x:1"]);
        assert_eq!(card_ids(&engine.columns()[0]), ["a", "b"]);
    }

    #[tokio::test]
    async fn test_add_card_factory_declining_changes_nothing() {
        let log = EventLog::default();
        let change_log = log.clone();
        let mut engine = BoardEngine::from_columns([column("x", &[])])
            .with_card_factory(StaticCardFactory::new(vec![None]))
            .with_on_change(move |_| change_log.push("change"));

        engine.add_card("x").await.unwrap();

        assert!(log.events().is_empty());
        assert!(engine.columns()[0].cards.is_empty());
    }

    struct FailingCardFactory;

    #[async_trait]
    impl CardFactory for FailingCardFactory {
        async fn create_card(&self, _column: &Column) -> anyhow::Result<Option<Card>> {
            anyhow::bail!("backend unavailable")
        }
    }

    #[tokio::test]
    async fn test_add_card_factory_failure_is_a_decline() {
        let log = EventLog::default();
        let change_log = log.clone();
        let mut engine = BoardEngine::from_columns([column("x", &[])])
            .with_card_factory(FailingCardFactory)
            .with_on_change(move |_| change_log.push("change"));

        engine.add_card("x").await.unwrap();

        assert!(log.events().is_empty());
        assert!(engine.columns()[0].cards.is_empty());
    }

    #[tokio::test]
    async fn test_add_card_without_consumer_still_runs_factory() {
        let factory = StaticCardFactory::new(vec![Some(Card::with_id("b"))]);
        let calls = factory.calls.clone();
        let mut engine =
            BoardEngine::from_columns([column("x", &[])]).with_card_factory(factory);

        engine.add_card("x").await.unwrap();

        // The side effect ran, but with nobody consuming the result the
        // board was left alone.
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(engine.columns()[0].cards.is_empty());
    }

    #[tokio::test]
    async fn test_add_card_unknown_column() {
        let mut engine = BoardEngine::from_columns([column("x", &[])])
            .with_card_factory(StaticCardFactory::new(vec![Some(Card::with_id("b"))]));

        assert!(matches!(
            engine.add_card("ghost").await,
            Err(BoardError::ColumnNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_back_to_back_adds_compound_without_a_re_render() {
        let log = EventLog::default();
        let change_log = log.clone();
        let mut engine = BoardEngine::from_columns([column("x", &[])])
            .with_card_factory(StaticCardFactory::new(vec![
                Some(Card::with_id("a")),
                Some(Card::with_id("b")),
            ]))
            .with_on_change(move |_| change_log.push("change"));

        // No set_columns between these: the second add must see the
        // first one's result.
        engine.add_card("x").await.unwrap();
        engine.add_card("x").await.unwrap();

        assert_eq!(log.events(), ["change", "change"]);
        assert_eq!(card_ids(&engine.columns()[0]), ["a", "b"]);
    }

    #[tokio::test]
    async fn test_add_column_appends_and_reports() {
        let log = EventLog::default();
        let change_log = log.clone();
        let added_log = log.clone();
        let mut engine = BoardEngine::from_columns([column("x", &[])])
            .with_column_factory(StaticColumnFactory(Mutex::new(vec![Some(
                Column::with_id("y"),
            )])))
            .with_on_change(move |_| change_log.push("change"))
            .with_on_column_added(move |column, index| {
                added_log.push(format!("added:{}:{}", column.id, index));
            });

        engine.add_column().await.unwrap();

        assert_eq!(log.events(), ["change", "added:y:1"]);
        assert_eq!(engine.columns().len(), 2);
    }

    #[tokio::test]
    async fn test_add_column_without_factory_is_a_no_op() {
        let mut engine = BoardEngine::from_columns([column("x", &[])]);
        engine.add_column().await.unwrap();
        assert_eq!(engine.columns().len(), 1);
    }

    #[test]
    fn test_drag_lifecycle_moves_card_and_clears_state() {
        let log = EventLog::default();
        let change_log = log.clone();
        let mut engine = BoardEngine::from_columns([column("x", &["a", "b", "c"])])
            .with_on_change(move |columns| {
                let order: Vec<String> = columns
                    .iter()
                    .flat_map(|c| c.cards.iter().map(|card| card.id.clone()))
                    .collect();
                change_log.push(order.join(","));
            });

        // Pick up card "c" and hover the gap before "a".
        let start = DragTick::new(card_drag("c", "x", 2), vec![card_position("x", 0)]);
        engine.handle_drag(DragPhase::Start, &start);
        assert!(engine.is_dragging());
        assert_eq!(engine.dragged_card_id(), Some("c"));
        assert_eq!(
            *engine.indicator(),
            DropIndicator::CardGap {
                column_id: "x".into(),
                index: 0
            }
        );

        engine.handle_drag(DragPhase::Drop, &start);

        assert_eq!(log.events(), ["c,a,b"]);
        assert!(!engine.is_dragging());
        assert!(engine.indicator().is_none());
    }

    #[test]
    fn test_indicator_shows_raw_gap_while_commit_corrects() {
        let mut engine = BoardEngine::from_columns([column("x", &["a", "b", "c"])])
            .with_on_change(|_| {});

        // Card "a" over the gap below "b": raw gap 2, corrected index 1.
        let tick = DragTick::new(card_drag("a", "x", 0), vec![card_position("x", 2)]);
        engine.handle_drag(DragPhase::Start, &tick);
        assert_eq!(
            *engine.indicator(),
            DropIndicator::CardGap {
                column_id: "x".into(),
                index: 2
            }
        );

        engine.handle_drag(DragPhase::Drop, &tick);
        assert_eq!(card_ids(&engine.columns()[0]), ["b", "a", "c"]);
    }

    #[test]
    fn test_dropping_on_own_position_invokes_nothing() {
        let log = EventLog::default();
        let change_log = log.clone();
        let mut engine = BoardEngine::from_columns([column("x", &["a", "b"])])
            .with_on_change(move |_| change_log.push("change"));
        let before = engine.columns().to_vec();

        // Both adjacent gaps resolve back onto the card's own position.
        for raw in [0, 1] {
            let tick = DragTick::new(card_drag("a", "x", 0), vec![card_position("x", raw)]);
            engine.handle_drag(DragPhase::Start, &tick);
            assert!(engine.indicator().is_none());
            engine.handle_drag(DragPhase::Drop, &tick);
        }

        assert!(log.events().is_empty());
        assert!(Arc::ptr_eq(&engine.columns()[0], &before[0]));
    }

    #[test]
    fn test_unresolvable_drop_cancels_the_session() {
        let log = EventLog::default();
        let change_log = log.clone();
        let mut engine = BoardEngine::from_columns([column("x", &["a"])])
            .with_on_change(move |_| change_log.push("change"));

        let start = DragTick::new(card_drag("a", "x", 0), vec![card_position("x", 1)]);
        engine.handle_drag(DragPhase::Start, &start);
        assert!(engine.is_dragging());

        // Dragged out of every target, then released.
        let gone = DragTick::new(card_drag("a", "x", 0), vec![]);
        engine.handle_drag(DragPhase::Move, &gone);
        assert!(engine.indicator().is_none());
        engine.handle_drag(DragPhase::Drop, &gone);

        assert!(log.events().is_empty());
        assert!(!engine.is_dragging());
    }

    #[test]
    fn test_column_drag_updates_column_indicator_and_commits() {
        let log = EventLog::default();
        let change_log = log.clone();
        let mut engine =
            BoardEngine::from_columns([column("x", &[]), column("y", &[]), column("z", &[])])
                .with_on_change(move |columns| {
                    let order: Vec<&str> = columns.iter().map(|c| c.id.as_str()).collect();
                    change_log.push(order.join(","));
                });

        let tick = DragTick::new(column_drag("z", 2), vec![column_position(0)]);
        engine.handle_drag(DragPhase::Start, &tick);
        assert_eq!(engine.dragged_column_id(), Some("z"));
        assert_eq!(*engine.indicator(), DropIndicator::ColumnGap(0));

        engine.handle_drag(DragPhase::Drop, &tick);

        assert_eq!(log.events(), ["z,x,y"]);
        assert!(engine.indicator().is_none());
    }

    #[test]
    fn test_column_move_predicate_blocks_indicator_and_commit() {
        let log = EventLog::default();
        let change_log = log.clone();
        let mut engine = BoardEngine::from_columns([column("x", &[]), column("y", &[])])
            .with_on_change(move |_| change_log.push("change"))
            .with_is_column_move_allowed(|request| request.destination_index != 0);

        let blocked = DragTick::new(column_drag("y", 1), vec![column_position(0)]);
        engine.handle_drag(DragPhase::Start, &blocked);
        assert!(engine.indicator().is_none());
        engine.handle_drag(DragPhase::Drop, &blocked);

        assert!(log.events().is_empty());
        assert_eq!(engine.columns()[0].id, "x");
    }

    #[test]
    fn test_ticks_while_idle_are_ignored() {
        let mut engine =
            BoardEngine::from_columns([column("x", &["a"])]).with_on_change(|_| {});

        let tick = DragTick::new(card_drag("a", "x", 0), vec![card_position("x", 1)]);
        engine.handle_drag(DragPhase::Move, &tick);
        assert!(engine.indicator().is_none());
        engine.handle_drag(DragPhase::Drop, &tick);
        assert_eq!(card_ids(&engine.columns()[0]), ["a"]);
    }

    #[test]
    fn test_foreign_drag_source_is_ignored() {
        let mut engine =
            BoardEngine::from_columns([column("x", &["a"])]).with_on_change(|_| {});

        let tick = DragTick::new(
            json!({"type": "file", "path": "/tmp/x"}),
            vec![card_position("x", 1)],
        );
        engine.handle_drag(DragPhase::Start, &tick);
        assert!(!engine.is_dragging());
        assert!(engine.indicator().is_none());
    }

    #[test]
    fn test_set_columns_replaces_the_snapshot() {
        let mut engine = BoardEngine::from_columns([column("x", &[])]);
        engine.set_columns(vec![Arc::new(column("y", &["a"]))]);
        assert_eq!(engine.columns()[0].id, "y");
    }
}
