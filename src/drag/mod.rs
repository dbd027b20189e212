pub mod adapter;
pub mod indicator;
pub mod payload;
pub mod resolver;
pub mod session;

pub use adapter::{
    attach_card, attach_card_list, attach_column, attach_column_strip, insertion_index,
    CardBinding, ColumnBinding, DragDropRegistry, DraggableRegistration, DropTargetRegistration,
    ElementId, ListAxis,
};
pub use indicator::DropIndicator;
pub use payload::{parse_drag_data, parse_drop_target_data, DragData, DragKind, DropTargetData};
pub use resolver::{
    resolve_card_destination, resolve_column_destination, CardDestination, ColumnDestination,
    ColumnMoveRequest,
};
pub use session::{DragDriver, DragPhase, DragSession, DragTick};
