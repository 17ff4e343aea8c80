//! Selection event types.
//!
//! Listeners are called synchronously, in the same call as the mutation that
//! produced the event, in mutation order. A compound command produces one
//! event, never a batch of per-cell events.

use std::cell::RefCell;
use std::rc::Rc;

use gridsel_core::{PositionCoordinate, Range, Rectangle};

use crate::command::Modifiers;

/// Events emitted by SelectionLayer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEvent {
    /// A single cell was selected, extended to, or toggled.
    Cell {
        coordinate: PositionCoordinate,
        modifiers: Modifiers,
    },

    /// Whole rows were selected or toggled.
    Rows {
        row_positions: Vec<Range>,
        /// Cell the viewport should bring into view.
        reveal: Option<PositionCoordinate>,
    },

    /// Whole columns were selected or toggled.
    Columns {
        column_positions: Vec<Range>,
        reveal: Option<PositionCoordinate>,
    },

    /// A rectangular region was selected, extended, appended or deselected.
    Region { region: Rectangle },

    /// Every visible cell was selected. Never asks the viewport to move.
    All,

    /// The selection was emptied.
    Cleared,

    /// The selection was repaired after rows/columns changed underneath.
    Structural,
}

impl SelectionEvent {
    /// Cell the viewport should scroll to, if any.
    pub fn reveal(&self) -> Option<PositionCoordinate> {
        match self {
            SelectionEvent::Cell { coordinate, .. } => Some(*coordinate),
            SelectionEvent::Rows { reveal, .. } | SelectionEvent::Columns { reveal, .. } => *reveal,
            SelectionEvent::Region { region } => Some(region.origin()),
            SelectionEvent::All | SelectionEvent::Cleared | SelectionEvent::Structural => None,
        }
    }
}

/// Callback type for receiving selection events.
pub type SelectionListener = Box<dyn FnMut(&SelectionEvent)>;

/// Simple event collector for testing and for embedding code that polls.
#[derive(Debug, Default, Clone)]
pub struct EventCollector {
    events: Rc<RefCell<Vec<SelectionEvent>>>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// A listener that records into this collector.
    pub fn listener(&self) -> SelectionListener {
        let events = Rc::clone(&self.events);
        Box::new(move |event: &SelectionEvent| events.borrow_mut().push(event.clone()))
    }

    pub fn events(&self) -> Vec<SelectionEvent> {
        self.events.borrow().clone()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    /// Events that ask the viewport to scroll.
    pub fn revealing(&self) -> Vec<SelectionEvent> {
        self.events
            .borrow()
            .iter()
            .filter(|e| e.reveal().is_some())
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_collector() {
        let collector = EventCollector::new();
        let mut listener = collector.listener();

        listener(&SelectionEvent::All);
        listener(&SelectionEvent::Cell {
            coordinate: PositionCoordinate::new(1, 2),
            modifiers: Modifiers::NONE,
        });

        assert_eq!(collector.len(), 2);
        assert_eq!(collector.revealing().len(), 1);
        collector.clear();
        assert!(collector.is_empty());
    }
}
