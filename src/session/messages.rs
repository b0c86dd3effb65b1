//! Message types for an editing session
//!
//! This module contains:
//! - Pointer input, in client or surface coordinates
//! - EditorMsg, the commands a host UI sends to the session
//! - Prompt request/response used for text and measurement labels
//! - Notification, the semantic events the session emits

use serde::{Deserialize, Serialize};

use crate::config::{AnnotationColor, Tool};
use crate::domain::{AnnotationKind, DisplayRect, Point};

// ============================================================================
// Pointer input
// ============================================================================

/// Phase of a mouse or touch gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerPhase {
    Down,
    Move,
    Up,
}

/// Pointer event already normalized into surface pixel space
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(Point),
    Move(Point),
    /// Release carries no position; the last move already placed the shape
    Up,
}

impl PointerEvent {
    pub fn new(phase: PointerPhase, position: Point) -> Self {
        match phase {
            PointerPhase::Down => PointerEvent::Down(position),
            PointerPhase::Move => PointerEvent::Move(position),
            PointerPhase::Up => PointerEvent::Up,
        }
    }
}

// ============================================================================
// Prompts
// ============================================================================

/// What a pending prompt will be used for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptKind {
    /// Free text annotation content
    Text,
    /// Label of the measurement line just drawn
    MeasureLabel,
}

/// Request for user text, answered with [`PromptResponse`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptRequest {
    pub kind: PromptKind,
    pub message: &'static str,
}

impl PromptRequest {
    pub fn for_kind(kind: PromptKind) -> Self {
        let message = match kind {
            PromptKind::Text => "Enter text:",
            PromptKind::MeasureLabel => "Enter the measurement (e.g. 2.80m):",
        };
        Self { kind, message }
    }
}

/// Answer to a [`PromptRequest`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptResponse {
    Submitted(String),
    Cancelled,
}

impl PromptResponse {
    /// Submitted text, or `None` if cancelled or blank
    pub fn into_text(self) -> Option<String> {
        match self {
            PromptResponse::Submitted(text) if !text.trim().is_empty() => Some(text),
            // blank counts as cancel
            _ => None,
        }
    }
}

impl From<Option<String>> for PromptResponse {
    fn from(answer: Option<String>) -> Self {
        match answer {
            Some(text) => PromptResponse::Submitted(text),
            None => PromptResponse::Cancelled,
        }
    }
}

/// Synchronous source of prompt answers
pub trait Prompter {
    fn ask(&mut self, request: &PromptRequest) -> PromptResponse;
}

impl<F> Prompter for F
where
    F: FnMut(&PromptRequest) -> PromptResponse,
{
    fn ask(&mut self, request: &PromptRequest) -> PromptResponse {
        self(request)
    }
}

// ============================================================================
// Commands
// ============================================================================

/// Commands sent by the host UI to an editing session
#[derive(Debug, Clone, PartialEq)]
pub enum EditorMsg {
    /// Switch tool; cancels any gesture and clears the selection
    SetTool(Tool),
    /// Color for annotations created from now on
    SetColor(AnnotationColor),
    /// Color at this index of the configured palette
    PaletteColor(usize),
    /// Mouse input in client coordinates
    Mouse {
        phase: PointerPhase,
        client: Point,
        display: DisplayRect,
    },
    /// Touch input in client coordinates; only the first touch is used
    Touch {
        phase: PointerPhase,
        touches: Vec<Point>,
        display: DisplayRect,
    },
    /// Pointer input already in surface pixels
    Pointer(PointerEvent),
    /// Answer to the pending prompt
    Prompt(PromptResponse),
    /// Select an annotation from the list view
    SelectFromList(usize),
    /// Delete an annotation from the list view
    DeleteAt(usize),
    DeleteSelected,
    Undo,
    /// Remove everything; `confirmed` is the host's confirmation result
    Clear { confirmed: bool },
}

// ============================================================================
// Notifications
// ============================================================================

/// Semantic events for the host to render as feedback
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Notification {
    ImageLoaded { width: u32, height: u32 },
    InvalidImage { reason: String },
    AnnotationAdded { kind: AnnotationKind, label: Option<String> },
    AnnotationDeleted { kind: AnnotationKind },
    AnnotationsCleared { count: usize },
    Undone { kind: AnnotationKind },
    NothingSelected,
    NothingToUndo,
    SaveRejectedEmpty,
    Saved { annotation_count: usize },
    /// Annotations settled after a gesture; the host may autosave
    Checkpoint,
}
