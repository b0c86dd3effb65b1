//! Interaction state machine
//!
//! Transient, never persisted. `TextPrompt` suspends pointer handling until
//! the host answers the prompt; the surface stays redrawable meanwhile.

use crate::annotations::AnnotationStore;
use crate::domain::{AnnotationId, Point, ShapeKind};

use super::messages::{PromptKind, PromptRequest};

/// Gesture waiting on a prompt answer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PendingPrompt {
    /// Text annotation to be placed at `anchor`
    Text { anchor: Point },
    /// Measurement line waiting for its label
    MeasureLabel { start: Point, end: Point },
}

impl PendingPrompt {
    pub fn kind(&self) -> PromptKind {
        match self {
            PendingPrompt::Text { .. } => PromptKind::Text,
            PendingPrompt::MeasureLabel { .. } => PromptKind::MeasureLabel,
        }
    }

    pub fn request(&self) -> PromptRequest {
        PromptRequest::for_kind(self.kind())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    /// Drawing a new shape from `start`
    Drawing { kind: ShapeKind, start: Point },
    /// Dragging a stored annotation; `last` is the previous pointer position
    Dragging { id: AnnotationId, last: Point },
    TextPrompt(PendingPrompt),
}

impl InteractionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, InteractionState::Idle)
    }

    pub fn pending_prompt(&self) -> Option<PendingPrompt> {
        match self {
            InteractionState::TextPrompt(pending) => Some(*pending),
            _ => None,
        }
    }

    /// Whether this state still refers only to annotations present in `store`
    pub fn is_consistent_with(&self, store: &AnnotationStore) -> bool {
        match self {
            InteractionState::Dragging { id, .. } => store.selected() == Some(*id),
            _ => true,
        }
    }
}
