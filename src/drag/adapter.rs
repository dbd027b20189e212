use crate::drag::payload::{DragData, DragKind, DropTargetData};
use kurbo::{Point, Rect};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Opaque handle to a host element (a rendered card, column, or list)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(pub u64);

/// Layout axis of the list an element belongs to: card lists stack
/// vertically, the column strip runs horizontally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListAxis {
    Vertical,
    Horizontal,
}

impl ListAxis {
    fn is_after_midpoint(self, rect: Rect, pointer: Point) -> bool {
        match self {
            Self::Vertical => pointer.y >= rect.center().y,
            Self::Horizontal => pointer.x >= rect.center().x,
        }
    }
}

/// Converts a pointer position over an element into an insertion index:
/// the element's own index in the before half, `index + 1` in the after
/// half. The midpoint itself counts as after.
pub fn insertion_index(rect: Rect, pointer: Point, axis: ListAxis, index: usize) -> usize {
    if axis.is_after_midpoint(rect, pointer) {
        index + 1
    } else {
        index
    }
}

struct DraggableEntry {
    token: u64,
    data: DragData,
    dragging: bool,
}

struct DropTargetEntry {
    token: u64,
    rect: Rect,
    accepts: DragKind,
    data: Box<dyn Fn(Point) -> DropTargetData>,
}

#[derive(Default)]
struct RegistryInner {
    next_token: u64,
    draggables: HashMap<ElementId, DraggableEntry>,
    drop_targets: HashMap<ElementId, DropTargetEntry>,
}

impl RegistryInner {
    fn token(&mut self) -> u64 {
        self.next_token += 1;
        self.next_token
    }
}

/// Registry of drag sources and drop targets for one board.
///
/// Cloning yields another handle to the same registry; the view layer
/// registers elements, the drag driver queries them. Registrations are
/// scoped: dropping the returned guard removes the entry, and registering
/// the same element again replaces the previous entry (the stale guard
/// then becomes inert).
#[derive(Clone, Default)]
pub struct DragDropRegistry {
    inner: Rc<RefCell<RegistryInner>>,
}

impl DragDropRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_draggable(&self, element: ElementId, data: DragData) -> DraggableRegistration {
        let mut inner = self.inner.borrow_mut();
        let token = inner.token();
        inner.draggables.insert(
            element,
            DraggableEntry {
                token,
                data,
                dragging: false,
            },
        );
        DraggableRegistration {
            registry: self.clone(),
            element,
            token,
        }
    }

    pub fn register_drop_target(
        &self,
        element: ElementId,
        rect: Rect,
        accepts: DragKind,
        data: impl Fn(Point) -> DropTargetData + 'static,
    ) -> DropTargetRegistration {
        let mut inner = self.inner.borrow_mut();
        let token = inner.token();
        inner.drop_targets.insert(
            element,
            DropTargetEntry {
                token,
                rect,
                accepts,
                data: Box::new(data),
            },
        );
        DropTargetRegistration {
            registry: self.clone(),
            element,
            token,
        }
    }

    /// Marks the element's drag as live and returns its identity payload.
    /// Unregistered (absent or drag-disabled) elements return `None`.
    pub fn begin_drag(&self, element: ElementId) -> Option<DragData> {
        let mut inner = self.inner.borrow_mut();
        let entry = inner.draggables.get_mut(&element)?;
        entry.dragging = true;
        Some(entry.data.clone())
    }

    /// Clears every live drag flag (drop or cancel).
    pub fn end_drag(&self) {
        for entry in self.inner.borrow_mut().draggables.values_mut() {
            entry.dragging = false;
        }
    }

    /// Whether the element is the one currently being dragged
    pub fn is_dragging(&self, element: ElementId) -> bool {
        self.inner
            .borrow()
            .draggables
            .get(&element)
            .is_some_and(|entry| entry.dragging)
    }

    /// Positional payloads of every target that accepts `kind` and whose
    /// rect contains the pointer, innermost (smallest area) first.
    pub fn hit_targets(&self, pointer: Point, kind: DragKind) -> Vec<DropTargetData> {
        let inner = self.inner.borrow();
        let mut hits: Vec<(&DropTargetEntry, f64)> = inner
            .drop_targets
            .values()
            .filter(|entry| entry.accepts == kind && entry.rect.contains(pointer))
            .map(|entry| (entry, entry.rect.area()))
            .collect();
        hits.sort_by(|a, b| a.1.total_cmp(&b.1));
        hits.into_iter()
            .map(|(entry, _)| (entry.data)(pointer))
            .collect()
    }
}

/// Scoped drag-source registration; dropping it unregisters the element.
pub struct DraggableRegistration {
    registry: DragDropRegistry,
    element: ElementId,
    token: u64,
}

impl Drop for DraggableRegistration {
    fn drop(&mut self) {
        let mut inner = self.registry.inner.borrow_mut();
        // Only remove the entry this guard created; a replacement
        // registration must survive its predecessor's drop.
        if inner
            .draggables
            .get(&self.element)
            .is_some_and(|entry| entry.token == self.token)
        {
            inner.draggables.remove(&self.element);
        }
    }
}

/// Scoped drop-target registration; dropping it unregisters the element.
pub struct DropTargetRegistration {
    registry: DragDropRegistry,
    element: ElementId,
    token: u64,
}

impl Drop for DropTargetRegistration {
    fn drop(&mut self) {
        let mut inner = self.registry.inner.borrow_mut();
        if inner
            .drop_targets
            .get(&self.element)
            .is_some_and(|entry| entry.token == self.token)
        {
            inner.drop_targets.remove(&self.element);
        }
    }
}

/// Registrations backing one rendered card: always a drop target, and a
/// drag source unless dragging is disabled.
pub struct CardBinding {
    pub draggable: Option<DraggableRegistration>,
    pub drop_target: DropTargetRegistration,
}

/// Registrations backing one rendered column header/body.
pub struct ColumnBinding {
    pub draggable: Option<DraggableRegistration>,
    pub drop_target: DropTargetRegistration,
}

/// Binds a rendered card. `element: None` is the normal pre-mount state
/// and registers nothing.
pub fn attach_card(
    registry: &DragDropRegistry,
    element: Option<ElementId>,
    rect: Rect,
    card_id: &str,
    column_id: &str,
    index: usize,
    drag_disabled: bool,
) -> Option<CardBinding> {
    let element = element?;

    let target_column_id = column_id.to_string();
    let drop_target = registry.register_drop_target(element, rect, DragKind::Card, move |pointer| {
        DropTargetData::CardPosition {
            column_id: target_column_id.clone(),
            index: insertion_index(rect, pointer, ListAxis::Vertical, index),
        }
    });

    let draggable = (!drag_disabled).then(|| {
        registry.register_draggable(
            element,
            DragData::Card {
                card_id: card_id.to_string(),
                column_id: column_id.to_string(),
                index,
            },
        )
    });

    Some(CardBinding {
        draggable,
        drop_target,
    })
}

/// Binds a rendered column
pub fn attach_column(
    registry: &DragDropRegistry,
    element: Option<ElementId>,
    rect: Rect,
    column_id: &str,
    index: usize,
    drag_disabled: bool,
) -> Option<ColumnBinding> {
    let element = element?;

    let target_column_id = column_id.to_string();
    let drop_target =
        registry.register_drop_target(element, rect, DragKind::Column, move |pointer| {
            DropTargetData::ColumnPosition {
                column_id: Some(target_column_id.clone()),
                index: insertion_index(rect, pointer, ListAxis::Horizontal, index),
            }
        });

    let draggable = (!drag_disabled).then(|| {
        registry.register_draggable(
            element,
            DragData::Column {
                column_id: column_id.to_string(),
                index,
            },
        )
    });

    Some(ColumnBinding {
        draggable,
        drop_target,
    })
}

/// Binds a column's card list so drops past the last card land at the
/// tail. The reported index is always the current list length.
pub fn attach_card_list(
    registry: &DragDropRegistry,
    element: Option<ElementId>,
    rect: Rect,
    column_id: &str,
    card_count: usize,
) -> Option<DropTargetRegistration> {
    let element = element?;
    let column_id = column_id.to_string();
    Some(
        registry.register_drop_target(element, rect, DragKind::Card, move |_| {
            DropTargetData::CardList {
                column_id: column_id.clone(),
                index: card_count,
            }
        }),
    )
}

/// Binds the column strip so column drops past the last column land at
/// the tail.
pub fn attach_column_strip(
    registry: &DragDropRegistry,
    element: Option<ElementId>,
    rect: Rect,
    column_count: usize,
) -> Option<DropTargetRegistration> {
    let element = element?;
    Some(
        registry.register_drop_target(element, rect, DragKind::Column, move |_| {
            DropTargetData::ColumnPosition {
                column_id: None,
                index: column_count,
            }
        }),
    )
}
