use crate::drag::adapter::{DragDropRegistry, ElementId};
use crate::drag::payload::DragData;
use crate::engine::BoardEngine;
use kurbo::Point;
use serde_json::Value;

/// Lifecycle phase of a drag event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    Start,
    Move,
    TargetChange,
    Drop,
}

/// One drag lifecycle event as delivered to the engine: the drag source's
/// payload and the payloads of the drop targets currently under the
/// pointer, innermost first. Both are untyped JSON and are validated by
/// the engine, so synthetic and platform-produced ticks go through the
/// same path.
#[derive(Debug, Clone)]
pub struct DragTick {
    pub source: Value,
    pub targets: Vec<Value>,
}

impl DragTick {
    pub fn new(source: Value, targets: Vec<Value>) -> Self {
        Self { source, targets }
    }
}

/// Per-session drag state: idle, or dragging one validated entity.
///
/// A session begins at a valid drag-start and ends at the drop event,
/// whether or not the drop resolved to a destination. The dragged
/// identity is pinned at start; later ticks cannot reassign it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragSession {
    #[default]
    Idle,
    Dragging(DragData),
}

impl DragSession {
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging(_))
    }

    pub fn source(&self) -> Option<&DragData> {
        match self {
            Self::Dragging(data) => Some(data),
            Self::Idle => None,
        }
    }
}

/// Turns pointer gestures into engine drag events using the registry's
/// registered elements, mirroring what a platform drag monitor does:
/// start pins the source payload and flags the element as dragged, every
/// position update re-hit-tests the drop targets, and drop (or cancel)
/// ends the session and clears the flag.
pub struct DragDriver {
    registry: DragDropRegistry,
    active: Option<DragData>,
}

impl DragDriver {
    pub fn new(registry: DragDropRegistry) -> Self {
        Self {
            registry,
            active: None,
        }
    }

    fn tick(&self, data: &DragData, pointer: Point) -> DragTick {
        let targets = self
            .registry
            .hit_targets(pointer, data.kind())
            .into_iter()
            .filter_map(|target| serde_json::to_value(target).ok())
            .collect();
        let source = serde_json::to_value(data).unwrap_or(Value::Null);
        DragTick::new(source, targets)
    }

    /// Begins a drag from the given element. Returns `false` when the
    /// element is not a registered drag source (absent or disabled).
    pub fn start(&mut self, engine: &mut BoardEngine, element: ElementId, pointer: Point) -> bool {
        let Some(data) = self.registry.begin_drag(element) else {
            return false;
        };
        let tick = self.tick(&data, pointer);
        self.active = Some(data);
        engine.handle_drag(DragPhase::Start, &tick);
        true
    }

    /// Delivers a pointer move for the active drag
    pub fn drag_to(&mut self, engine: &mut BoardEngine, pointer: Point) {
        if let Some(data) = &self.active {
            let tick = self.tick(data, pointer);
            engine.handle_drag(DragPhase::Move, &tick);
        }
    }

    /// Drops the active drag at the given pointer position
    pub fn drop_at(&mut self, engine: &mut BoardEngine, pointer: Point) {
        if let Some(data) = self.active.take() {
            let tick = self.tick(&data, pointer);
            engine.handle_drag(DragPhase::Drop, &tick);
        }
        self.registry.end_drag();
    }

    /// Abandons the active drag with no destination
    pub fn cancel(&mut self, engine: &mut BoardEngine) {
        if let Some(data) = self.active.take() {
            let source = serde_json::to_value(&data).unwrap_or(Value::Null);
            engine.handle_drag(DragPhase::Drop, &DragTick::new(source, Vec::new()));
        }
        self.registry.end_drag();
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }
}
