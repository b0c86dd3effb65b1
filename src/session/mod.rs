//! Editing session management module
//!
//! This module contains:
//! - Message types exchanged with the host UI
//! - The interaction state machine and its controller
//! - The per-image session and the host-facing editor

pub mod controller;
pub mod editor;
pub mod messages;
pub mod state;

pub use controller::InteractionController;
pub use editor::{Editor, EditorSession};
pub use messages::{
    EditorMsg, Notification, PointerEvent, PointerPhase, PromptKind, PromptRequest, PromptResponse,
    Prompter,
};
pub use state::{InteractionState, PendingPrompt};
