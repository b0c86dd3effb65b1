//! Interaction controller: pointer gestures to store mutations
//!
//! Transitions:
//! - select tool: press picks the topmost annotation and starts a drag,
//!   press on empty space clears the selection
//! - text tool: press opens a text prompt anchored at the press point
//! - shape tools: press starts drawing, moves update a transient preview,
//!   release commits it (measurements first ask for a label)
//!
//! Drags report a checkpoint only on release, never per move.

use crate::annotations::{AnnotationStore, HitParams, TextMeasure};
use crate::config::{AnnotationColor, Tool};
use crate::domain::{Annotation, MeasureAnnotation, Point, ShapeKind};

use super::messages::{Notification, PointerEvent, PromptRequest, PromptResponse};
use super::state::{InteractionState, PendingPrompt};

/// Shape drawn by a tool, if the tool draws shapes
fn shape_kind(tool: Tool) -> Option<ShapeKind> {
    match tool {
        Tool::Line => Some(ShapeKind::Line),
        Tool::Arrow => Some(ShapeKind::Arrow),
        Tool::Rect => Some(ShapeKind::Rect),
        Tool::Circle => Some(ShapeKind::Circle),
        Tool::Measure => Some(ShapeKind::Measure),
        Tool::Select | Tool::Text => None,
    }
}

/// Everything a transition may read or mutate besides the controller itself
pub struct Context<'a> {
    pub store: &'a mut AnnotationStore,
    pub hit: &'a HitParams,
    pub measure: &'a dyn TextMeasure,
    pub notifications: &'a mut Vec<Notification>,
}

#[derive(Debug, Clone)]
pub struct InteractionController {
    tool: Tool,
    color: AnnotationColor,
    state: InteractionState,
    /// In-progress shape, shown as a preview and never stored until commit
    transient: Option<Annotation>,
}

impl InteractionController {
    pub fn new(color: AnnotationColor) -> Self {
        Self {
            tool: Tool::Select,
            color,
            state: InteractionState::Idle,
            transient: None,
        }
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn color(&self) -> AnnotationColor {
        self.color
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn transient(&self) -> Option<&Annotation> {
        self.transient.as_ref()
    }

    pub fn pending_prompt(&self) -> Option<PromptRequest> {
        self.state.pending_prompt().map(|pending| pending.request())
    }

    /// Switch tool. Forces `Idle`, drops any transient shape or pending
    /// prompt, and clears the selection.
    pub fn set_tool(&mut self, tool: Tool, store: &mut AnnotationStore) {
        log::debug!("Tool changed to {}", tool.name());
        self.tool = tool;
        self.cancel_gesture();
        store.select(None);
    }

    /// Color for annotations created from now on
    pub fn set_color(&mut self, color: AnnotationColor) {
        self.color = color;
    }

    /// Abandon the current gesture without touching the store
    pub fn cancel_gesture(&mut self) {
        self.state = InteractionState::Idle;
        self.transient = None;
    }

    /// Feed one pointer event. Returns true if the surface needs a redraw.
    pub fn handle_pointer(&mut self, event: PointerEvent, cx: &mut Context<'_>) -> bool {
        if !self.state.is_consistent_with(cx.store) {
            log::debug!("Dragged annotation vanished, returning to idle");
            self.cancel_gesture();
        }
        match event {
            PointerEvent::Down(p) => self.pointer_down(p, cx),
            PointerEvent::Move(p) => self.pointer_move(p, cx),
            PointerEvent::Up => self.pointer_up(cx),
        }
    }

    fn pointer_down(&mut self, p: Point, cx: &mut Context<'_>) -> bool {
        if !self.state.is_idle() {
            // Suspended in a prompt, or a stray press mid-gesture
            return false;
        }
        match self.tool {
            Tool::Select => {
                let hit = cx.store.find_at(p, cx.hit, cx.measure);
                cx.store.select(hit);
                if let Some(id) = hit {
                    log::debug!("Selected {:?}, starting drag", id);
                    self.state = InteractionState::Dragging { id, last: p };
                }
                true
            }
            Tool::Text => {
                self.state = InteractionState::TextPrompt(PendingPrompt::Text { anchor: p });
                false
            }
            tool => {
                if let Some(kind) = shape_kind(tool) {
                    self.state = InteractionState::Drawing { kind, start: p };
                }
                false
            }
        }
    }

    fn pointer_move(&mut self, p: Point, cx: &mut Context<'_>) -> bool {
        match self.state {
            InteractionState::Dragging { id, last } => {
                if cx.store.move_selected(p.x - last.x, p.y - last.y).is_err() {
                    self.cancel_gesture();
                    return false;
                }
                self.state = InteractionState::Dragging { id, last: p };
                true
            }
            InteractionState::Drawing { kind, start } => {
                self.transient = Some(Annotation::shape(kind, start, p, self.color));
                true
            }
            _ => false,
        }
    }

    fn pointer_up(&mut self, cx: &mut Context<'_>) -> bool {
        match self.state {
            InteractionState::Dragging { .. } => {
                self.state = InteractionState::Idle;
                cx.notifications.push(Notification::Checkpoint);
                false
            }
            InteractionState::Drawing { kind, start } => {
                let Some(transient) = self.transient.take() else {
                    // Press and release without movement draws nothing
                    self.state = InteractionState::Idle;
                    return false;
                };
                if kind == ShapeKind::Measure {
                    let end = transient.endpoints().map_or(start, |(_, end)| end);
                    self.transient = Some(transient);
                    self.state =
                        InteractionState::TextPrompt(PendingPrompt::MeasureLabel { start, end });
                    return false;
                }
                self.commit(transient, cx);
                self.state = InteractionState::Idle;
                true
            }
            _ => false,
        }
    }

    /// Answer the pending prompt. Cancelled or blank answers abort the
    /// gesture: no text is placed and an unlabelled measurement is dropped.
    pub fn resolve_prompt(&mut self, response: PromptResponse, cx: &mut Context<'_>) -> bool {
        let Some(pending) = self.state.pending_prompt() else {
            log::debug!("Prompt answer with no pending prompt ignored");
            return false;
        };
        let answer = response.into_text();
        let transient = self.transient.take();
        self.state = InteractionState::Idle;

        match (pending, answer) {
            (PendingPrompt::Text { anchor }, Some(text)) => {
                self.commit(Annotation::text(anchor, text, self.color), cx);
                true
            }
            (PendingPrompt::MeasureLabel { start, end }, Some(label)) => {
                let color = transient.as_ref().map_or(self.color, Annotation::color);
                let measure = MeasureAnnotation {
                    start,
                    end,
                    color,
                    label: Some(label.trim().to_string()),
                };
                self.commit(Annotation::Measure(measure), cx);
                true
            }
            (pending, None) => {
                log::debug!("{:?} prompt cancelled", pending.kind());
                // A cancelled label removes the preview
                transient.is_some()
            }
        }
    }

    fn commit(&mut self, annotation: Annotation, cx: &mut Context<'_>) {
        let kind = annotation.kind();
        let label = annotation.label().map(str::to_string);
        let id = cx.store.append(annotation);
        log::info!("Added {} annotation {:?}", kind.name(), id);
        cx.notifications
            .push(Notification::AnnotationAdded { kind, label });
        cx.notifications.push(Notification::Checkpoint);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::hit_testing::tests::MonoMeasure;
    use crate::domain::AnnotationKind;

    struct Harness {
        controller: InteractionController,
        store: AnnotationStore,
        hit: HitParams,
        measure: MonoMeasure,
        notifications: Vec<Notification>,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                controller: InteractionController::new(AnnotationColor::GOLD),
                store: AnnotationStore::new(),
                hit: HitParams::default(),
                measure: MonoMeasure(10.0),
                notifications: Vec::new(),
            }
        }

        fn tool(&mut self, tool: Tool) {
            self.controller.set_tool(tool, &mut self.store);
        }

        fn pointer(&mut self, event: PointerEvent) -> bool {
            let mut cx = Context {
                store: &mut self.store,
                hit: &self.hit,
                measure: &self.measure,
                notifications: &mut self.notifications,
            };
            self.controller.handle_pointer(event, &mut cx)
        }

        fn answer(&mut self, response: PromptResponse) -> bool {
            let mut cx = Context {
                store: &mut self.store,
                hit: &self.hit,
                measure: &self.measure,
                notifications: &mut self.notifications,
            };
            self.controller.resolve_prompt(response, &mut cx)
        }

        fn drag(&mut self, from: (f32, f32), to: (f32, f32)) {
            self.pointer(PointerEvent::Down(Point::new(from.0, from.1)));
            self.pointer(PointerEvent::Move(Point::new(to.0, to.1)));
            self.pointer(PointerEvent::Up);
        }
    }

    #[test]
    fn test_only_drawing_tools_map_to_shapes() {
        assert_eq!(shape_kind(Tool::Measure), Some(ShapeKind::Measure));
        assert_eq!(shape_kind(Tool::Text), None);
        assert_eq!(shape_kind(Tool::Select), None);
    }

    #[test]
    fn test_draw_rect_commits_on_release() {
        let mut h = Harness::new();
        h.tool(Tool::Rect);
        h.pointer(PointerEvent::Down(Point::new(10.0, 10.0)));
        assert!(h.pointer(PointerEvent::Move(Point::new(5.0, 5.0))));
        assert!(h.controller.transient().is_some());
        assert!(h.store.is_empty());

        assert!(h.pointer(PointerEvent::Up));
        assert!(h.controller.transient().is_none());
        assert!(h.controller.state().is_idle());
        assert_eq!(h.store.len(), 1);
        let (start, end) = h.store.annotations().next().unwrap().endpoints().unwrap();
        assert_eq!((start, end), (Point::new(10.0, 10.0), Point::new(5.0, 5.0)));
        assert_eq!(
            h.notifications,
            vec![
                Notification::AnnotationAdded {
                    kind: AnnotationKind::Rect,
                    label: None
                },
                Notification::Checkpoint
            ]
        );
    }

    #[test]
    fn test_zero_length_shape_is_committed() {
        let mut h = Harness::new();
        h.tool(Tool::Line);
        h.drag((30.0, 30.0), (30.0, 30.0));
        assert_eq!(h.store.len(), 1);
    }

    #[test]
    fn test_click_without_move_draws_nothing() {
        let mut h = Harness::new();
        h.tool(Tool::Arrow);
        h.pointer(PointerEvent::Down(Point::new(30.0, 30.0)));
        h.pointer(PointerEvent::Up);
        assert!(h.store.is_empty());
        assert!(h.controller.state().is_idle());
    }

    #[test]
    fn test_measure_waits_for_label() {
        let mut h = Harness::new();
        h.tool(Tool::Measure);
        h.drag((100.0, 100.0), (300.0, 100.0));
        assert!(h.store.is_empty());
        let request = h.controller.pending_prompt().unwrap();
        assert_eq!(request.kind, super::super::messages::PromptKind::MeasureLabel);
        // Preview stays visible while the prompt is open
        assert!(h.controller.transient().is_some());

        // Pointer input is suspended during the prompt
        assert!(!h.pointer(PointerEvent::Down(Point::new(5.0, 5.0))));

        assert!(h.answer(PromptResponse::Submitted(" 2.00m ".into())));
        assert_eq!(h.store.len(), 1);
        assert_eq!(h.store.annotations().next().unwrap().label(), Some("2.00m"));
        assert!(h.controller.pending_prompt().is_none());
    }

    #[test]
    fn test_cancelled_measure_is_discarded() {
        let mut h = Harness::new();
        h.tool(Tool::Measure);
        h.drag((100.0, 100.0), (300.0, 100.0));
        assert!(h.answer(PromptResponse::Cancelled));
        assert!(h.store.is_empty());
        assert!(h.controller.transient().is_none());
        assert!(h.controller.state().is_idle());
        assert!(h.notifications.is_empty());
    }

    #[test]
    fn test_text_tool_places_text_at_click() {
        let mut h = Harness::new();
        h.tool(Tool::Text);
        h.pointer(PointerEvent::Down(Point::new(50.0, 50.0)));
        h.pointer(PointerEvent::Up);
        assert_eq!(
            h.controller.pending_prompt().map(|r| r.kind),
            Some(super::super::messages::PromptKind::Text)
        );
        h.answer(PromptResponse::Submitted("Window".into()));
        match h.store.annotations().next() {
            Some(Annotation::Text(t)) => {
                assert_eq!(t.anchor, Point::new(50.0, 50.0));
                assert_eq!(t.text, "Window");
            }
            other => panic!("expected text annotation, got {other:?}"),
        }
    }

    #[test]
    fn test_text_prompt_cancel_leaves_store_unchanged() {
        let mut h = Harness::new();
        h.tool(Tool::Text);
        h.pointer(PointerEvent::Down(Point::new(50.0, 50.0)));
        h.answer(PromptResponse::Cancelled);
        assert!(h.store.is_empty());

        h.pointer(PointerEvent::Down(Point::new(50.0, 50.0)));
        h.answer(PromptResponse::Submitted("   ".into()));
        assert!(h.store.is_empty());
    }

    #[test]
    fn test_select_and_drag_moves_by_deltas() {
        let mut h = Harness::new();
        h.tool(Tool::Circle);
        h.drag((100.0, 100.0), (130.0, 100.0));
        h.notifications.clear();

        h.tool(Tool::Select);
        h.pointer(PointerEvent::Down(Point::new(102.0, 101.0)));
        assert!(h.store.selected().is_some());
        h.pointer(PointerEvent::Move(Point::new(112.0, 111.0)));
        h.pointer(PointerEvent::Move(Point::new(122.0, 101.0)));
        assert!(h.notifications.is_empty());
        h.pointer(PointerEvent::Up);
        assert_eq!(h.notifications, vec![Notification::Checkpoint]);

        let (start, end) = h.store.annotations().next().unwrap().endpoints().unwrap();
        assert_eq!(start, Point::new(120.0, 100.0));
        assert_eq!(end, Point::new(150.0, 100.0));
        // Size is preserved exactly
        assert_eq!(start.distance_to(end), 30.0);
    }

    #[test]
    fn test_select_on_empty_space_clears_selection() {
        let mut h = Harness::new();
        h.tool(Tool::Line);
        h.drag((10.0, 10.0), (40.0, 40.0));
        h.tool(Tool::Select);
        h.pointer(PointerEvent::Down(Point::new(10.0, 10.0)));
        h.pointer(PointerEvent::Up);
        assert!(h.store.selected().is_some());

        h.pointer(PointerEvent::Down(Point::new(200.0, 200.0)));
        assert!(h.store.selected().is_none());
        assert!(h.controller.state().is_idle());
    }

    #[test]
    fn test_switching_tool_resets_gesture() {
        let mut h = Harness::new();
        h.tool(Tool::Arrow);
        h.pointer(PointerEvent::Down(Point::new(10.0, 10.0)));
        h.pointer(PointerEvent::Move(Point::new(50.0, 50.0)));
        h.tool(Tool::Rect);
        assert!(h.controller.transient().is_none());
        assert!(h.controller.state().is_idle());
        h.pointer(PointerEvent::Up);
        assert!(h.store.is_empty());
    }

    #[test]
    fn test_color_applies_to_new_annotations_only() {
        let mut h = Harness::new();
        h.tool(Tool::Line);
        h.drag((0.0, 0.0), (10.0, 0.0));
        h.controller.set_color(AnnotationColor::BLUE);
        h.drag((0.0, 50.0), (10.0, 50.0));
        let colors: Vec<_> = h.store.annotations().map(|a| a.color()).collect();
        assert_eq!(colors, vec![AnnotationColor::GOLD, AnnotationColor::BLUE]);
    }

    #[test]
    fn test_drag_stops_when_selection_deleted() {
        let mut h = Harness::new();
        h.tool(Tool::Line);
        h.drag((10.0, 10.0), (40.0, 40.0));
        h.tool(Tool::Select);
        h.pointer(PointerEvent::Down(Point::new(10.0, 10.0)));
        h.store.delete_selected().unwrap();
        assert!(!h.pointer(PointerEvent::Move(Point::new(20.0, 20.0))));
        assert!(h.controller.state().is_idle());
    }
}
