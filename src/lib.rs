//! # Tavla Core
//!
//! Core drag-and-drop board logic for Tavla kanban UI components.
//!
//! This crate provides the reconciliation engine behind a kanban board:
//! it tracks live pointer-drag sessions over ordered columns of cards,
//! resolves which drop position the pointer targets on every tick, and
//! commits new orderings back to the host through callbacks, without any
//! dependency on a specific rendering layer or pointer event source.
//!
//! The host supplies the columns and stays their source of truth; every
//! operation derives a new column list (sharing untouched columns and
//! cards via `Arc`) and reports it through `on_change` followed by the
//! operation's fine-grained callback. Drag lifecycle events arrive as
//! untyped payload ticks — from a real pointer adapter or synthesized in
//! tests — and are validated before anything trusts them.

pub mod domain;
pub mod drag;
pub mod engine;
pub mod error;
pub mod view;

// Re-export commonly used types
pub use domain::{
    board::{find_card, find_column, Card, CardLocation, Column},
    transform,
};
pub use drag::{
    adapter::{
        attach_card, attach_card_list, attach_column, attach_column_strip, DragDropRegistry,
        ElementId, ListAxis,
    },
    indicator::DropIndicator,
    payload::{DragData, DragKind, DropTargetData},
    resolver::ColumnMoveRequest,
    session::{DragDriver, DragPhase, DragSession, DragTick},
};
pub use engine::{BoardEngine, CardFactory, ColumnFactory};
pub use error::{BoardError, Result};
