//! Editing session and the host-facing editor
//!
//! An [`EditorSession`] is built for exactly one loaded image and owns the
//! annotation store, the interaction controller and the drawing surface.
//! [`Editor`] swaps sessions on image load and ends them on a successful
//! flatten.

use chrono::Utc;
use image::RgbaImage;
use image::imageops::{self, FilterType};
use tiny_skia::Pixmap;

use crate::annotations::{AnnotationStore, AnnotationSummary, HitParams};
use crate::config::{AnnotationColor, EditorConfig, Tool};
use crate::domain::{Annotation, DisplayRect, Point, SurfaceSize};
use crate::error::EditorError;
use crate::export::{self, FlattenedCapture};
use crate::intake;
use crate::render::{RenderStyle, Renderer, TextEngine, pixmap_from_rgba, rgba_from_pixmap};

use super::controller::{Context, InteractionController};
use super::messages::{
    EditorMsg, Notification, PointerEvent, PointerPhase, PromptRequest, PromptResponse, Prompter,
};

/// Largest surface accepted, in pixels (256 MiB of RGBA)
const MAX_SURFACE_PIXELS: u64 = 1 << 26;

fn empty_surface(size: SurfaceSize) -> Result<Pixmap, EditorError> {
    Pixmap::new(size.width, size.height).ok_or_else(|| {
        EditorError::InvalidInput(format!(
            "cannot allocate a {}x{} surface",
            size.width, size.height
        ))
    })
}

/// State of one image being annotated
pub struct EditorSession {
    /// Dimensions of the decoded source image
    image_size: (u32, u32),
    size: SurfaceSize,
    /// Source image already resampled to the surface size
    base: Pixmap,
    surface: Pixmap,
    dirty: bool,
    store: AnnotationStore,
    controller: InteractionController,
    notifications: Vec<Notification>,
    style: RenderStyle,
    hit: HitParams,
    text: TextEngine,
    palette: Vec<AnnotationColor>,
}

impl EditorSession {
    /// Fit `image` to the configured width and start with an empty store
    pub fn new(
        image: &RgbaImage,
        config: &EditorConfig,
        text: TextEngine,
    ) -> Result<Self, EditorError> {
        let (width, height) = image.dimensions();
        let size = SurfaceSize::fit_to_width(width, height, config.max_display_width);
        log::debug!(
            "Fitting {}x{} image to {}x{} surface (scale {:.3})",
            width,
            height,
            size.width,
            size.height,
            size.scale_from(width)
        );

        if size.pixel_count() > MAX_SURFACE_PIXELS {
            return Err(EditorError::InvalidInput(format!(
                "image too large: {width}x{height} needs a {}x{} surface",
                size.width, size.height
            )));
        }

        let resized = if (width, height) == (size.width, size.height) {
            image.clone()
        } else {
            imageops::resize(image, size.width, size.height, FilterType::Triangle)
        };
        let base = pixmap_from_rgba(&resized).ok_or_else(|| {
            EditorError::InvalidInput(format!("image too large: {width}x{height}"))
        })?;

        Ok(Self {
            image_size: (width, height),
            size,
            base,
            surface: empty_surface(size)?,
            dirty: true,
            store: AnnotationStore::new(),
            controller: InteractionController::new(config.default_color),
            notifications: Vec::new(),
            style: RenderStyle::from(config),
            hit: HitParams {
                threshold: config.hit_threshold,
                text_font_size: config.text_font_size,
            },
            text,
            palette: config.palette.clone(),
        })
    }

    pub fn image_size(&self) -> (u32, u32) {
        self.image_size
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn tool(&self) -> Tool {
        self.controller.tool()
    }

    pub fn summaries(&self) -> Vec<AnnotationSummary> {
        self.store.summaries()
    }

    pub fn pending_prompt(&self) -> Option<PromptRequest> {
        self.controller.pending_prompt()
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// Apply one host command. Returns true if the surface changed.
    pub fn update(&mut self, msg: EditorMsg) -> bool {
        match msg {
            EditorMsg::SetTool(tool) => {
                self.set_tool(tool);
                true
            }
            EditorMsg::SetColor(color) => {
                self.select_color(color);
                false
            }
            EditorMsg::PaletteColor(index) => {
                self.select_palette_color(index);
                false
            }
            EditorMsg::Mouse {
                phase,
                client,
                display,
            } => self.mouse(phase, client, display),
            EditorMsg::Touch {
                phase,
                touches,
                display,
            } => self.touch(phase, &touches, display),
            EditorMsg::Pointer(event) => self.pointer(event),
            EditorMsg::Prompt(response) => self.answer_prompt(response),
            EditorMsg::SelectFromList(index) => self.select_from_list(index),
            EditorMsg::DeleteAt(index) => self.delete_at(index).is_some(),
            EditorMsg::DeleteSelected => self.delete_selected().is_ok(),
            EditorMsg::Undo => self.undo().is_ok(),
            EditorMsg::Clear { confirmed } => self.clear(|| confirmed) > 0,
        }
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.controller.set_tool(tool, &mut self.store);
        self.dirty = true;
    }

    /// Color for annotations created from now on
    pub fn select_color(&mut self, color: AnnotationColor) {
        self.controller.set_color(color);
    }

    /// Colors offered to the host, from the config
    pub fn palette(&self) -> &[AnnotationColor] {
        &self.palette
    }

    /// Pick the palette entry at `index`. Out of range leaves the color as is.
    pub fn select_palette_color(&mut self, index: usize) -> Option<AnnotationColor> {
        let Some(&color) = self.palette.get(index) else {
            log::warn!("No palette entry {} of {}", index, self.palette.len());
            return None;
        };
        self.select_color(color);
        Some(color)
    }

    /// Pointer input already in surface pixels
    pub fn pointer(&mut self, event: PointerEvent) -> bool {
        let mut cx = Context {
            store: &mut self.store,
            hit: &self.hit,
            measure: &self.text,
            notifications: &mut self.notifications,
        };
        let redraw = self.controller.handle_pointer(event, &mut cx);
        self.dirty |= redraw;
        redraw
    }

    /// Mouse input in client coordinates of the displayed surface
    pub fn mouse(&mut self, phase: PointerPhase, client: Point, display: DisplayRect) -> bool {
        let position = display.to_surface(client, self.size);
        self.pointer(PointerEvent::new(phase, position))
    }

    /// Touch input; only the first touch point drives the gesture
    pub fn touch(&mut self, phase: PointerPhase, touches: &[Point], display: DisplayRect) -> bool {
        match (phase, touches.first()) {
            (PointerPhase::Up, _) => self.pointer(PointerEvent::Up),
            (_, Some(&client)) => self.mouse(phase, client, display),
            (_, None) => false,
        }
    }

    pub fn answer_prompt(&mut self, response: PromptResponse) -> bool {
        let mut cx = Context {
            store: &mut self.store,
            hit: &self.hit,
            measure: &self.text,
            notifications: &mut self.notifications,
        };
        let redraw = self.controller.resolve_prompt(response, &mut cx);
        self.dirty |= redraw;
        redraw
    }

    /// Answer a pending prompt synchronously. Returns false if none is pending.
    pub fn drive_prompt(&mut self, prompter: &mut impl Prompter) -> bool {
        let Some(request) = self.controller.pending_prompt() else {
            return false;
        };
        let response = prompter.ask(&request);
        self.answer_prompt(response);
        true
    }

    /// Pick an annotation from the list view, switching to the select tool
    pub fn select_from_list(&mut self, index: usize) -> bool {
        self.set_tool(Tool::Select);
        if self.store.select_index(index).is_none() {
            log::debug!("No annotation at list position {}", index);
            self.notifications.push(Notification::NothingSelected);
            return false;
        }
        true
    }

    /// Delete by list position. Out-of-range positions are ignored.
    pub fn delete_at(&mut self, index: usize) -> Option<Annotation> {
        let removed = self.store.delete_at(index)?;
        self.deleted(&removed);
        Some(removed)
    }

    pub fn delete_selected(&mut self) -> Result<Annotation, EditorError> {
        match self.store.delete_selected() {
            Ok(removed) => {
                self.deleted(&removed);
                Ok(removed)
            }
            Err(err) => {
                self.notifications.push(Notification::NothingSelected);
                Err(err)
            }
        }
    }

    fn deleted(&mut self, removed: &Annotation) {
        log::info!("Deleted {} annotation", removed.kind().name());
        self.notifications.push(Notification::AnnotationDeleted {
            kind: removed.kind(),
        });
        self.notifications.push(Notification::Checkpoint);
        self.dirty = true;
    }

    /// Remove the most recent annotation
    pub fn undo(&mut self) -> Result<Annotation, EditorError> {
        match self.store.undo() {
            Ok(removed) => {
                log::info!("Undid {} annotation", removed.kind().name());
                self.notifications.push(Notification::Undone {
                    kind: removed.kind(),
                });
                self.notifications.push(Notification::Checkpoint);
                self.dirty = true;
                Ok(removed)
            }
            Err(err) => {
                self.notifications.push(Notification::NothingToUndo);
                Err(err)
            }
        }
    }

    /// Remove every annotation if `confirm` agrees.
    ///
    /// `confirm` is not consulted when there is nothing to clear. Returns
    /// the number of annotations removed.
    pub fn clear(&mut self, confirm: impl FnOnce() -> bool) -> usize {
        if self.store.is_empty() || !confirm() {
            return 0;
        }
        let count = self.store.clear();
        log::info!("Cleared {} annotation(s)", count);
        self.notifications
            .push(Notification::AnnotationsCleared { count });
        self.notifications.push(Notification::Checkpoint);
        self.dirty = true;
        count
    }

    /// Live surface with selection highlight and any in-progress shape
    pub fn surface(&mut self) -> &Pixmap {
        if self.dirty {
            let renderer = Renderer::new(&self.style, &self.text);
            renderer.redraw(
                &mut self.surface,
                Some(&self.base),
                self.store.iter(),
                self.store.selected(),
                self.controller.transient(),
            );
            self.dirty = false;
        }
        &self.surface
    }

    /// Composite the base image and stored annotations, without selection
    /// highlight or in-progress shape
    pub fn flatten_image(&self) -> Result<RgbaImage, EditorError> {
        let mut pixmap = empty_surface(self.size)?;
        let renderer = Renderer::new(&self.style, &self.text);
        renderer.redraw(&mut pixmap, Some(&self.base), self.store.iter(), None, None);
        Ok(rgba_from_pixmap(&pixmap))
    }
}

/// Host-facing editor: image intake, session lifecycle and flatten
pub struct Editor {
    config: EditorConfig,
    text: TextEngine,
    session: Option<EditorSession>,
    notifications: Vec<Notification>,
}

impl Editor {
    pub fn new(config: EditorConfig) -> Self {
        let text = TextEngine::from_config(&config);
        Self::with_text_engine(config, text)
    }

    pub fn with_text_engine(config: EditorConfig, text: TextEngine) -> Self {
        Self {
            config,
            text,
            session: None,
            notifications: Vec::new(),
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// True once an image is loaded and until it is flattened
    pub fn is_ready(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&EditorSession> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut EditorSession> {
        self.session.as_mut()
    }

    /// Decode and load an image, replacing any current session
    pub fn load_image(&mut self, bytes: &[u8], mime: &str) -> Result<SurfaceSize, EditorError> {
        match intake::decode(bytes, mime) {
            Ok(image) => self.load_decoded(&image),
            Err(err) => Err(self.rejected(err)),
        }
    }

    /// Like [`Editor::load_image`], decoding off the event loop
    pub async fn load_image_async(
        &mut self,
        bytes: Vec<u8>,
        mime: String,
    ) -> Result<SurfaceSize, EditorError> {
        match intake::decode_async(bytes, mime).await {
            Ok(image) => self.load_decoded(&image),
            Err(err) => Err(self.rejected(err)),
        }
    }

    fn rejected(&mut self, err: EditorError) -> EditorError {
        self.collect();
        log::warn!("Rejected image: {}", err);
        self.notifications.push(Notification::InvalidImage {
            reason: err.to_string(),
        });
        err
    }

    /// Start a fresh session on an already decoded image
    pub fn load_decoded(&mut self, image: &RgbaImage) -> Result<SurfaceSize, EditorError> {
        self.collect();
        let session = match EditorSession::new(image, &self.config, self.text.clone()) {
            Ok(session) => session,
            Err(err) => return Err(self.rejected(err)),
        };
        let size = session.size();
        log::info!(
            "Loaded {}x{} image onto {}x{} surface",
            image.width(),
            image.height(),
            size.width,
            size.height
        );
        self.session = Some(session);
        self.notifications.push(Notification::ImageLoaded {
            width: size.width,
            height: size.height,
        });
        Ok(size)
    }

    /// Route a command to the current session
    pub fn update(&mut self, msg: EditorMsg) -> bool {
        match self.session.as_mut() {
            Some(session) => session.update(msg),
            None => {
                log::debug!("No image loaded, ignoring {:?}", msg);
                false
            }
        }
    }

    /// Drain notifications from the editor and the current session in order
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        self.collect();
        std::mem::take(&mut self.notifications)
    }

    fn collect(&mut self) {
        if let Some(session) = self.session.as_mut() {
            self.notifications.append(&mut session.notifications);
        }
    }

    /// Flatten the annotated image and end the session.
    ///
    /// With no annotations the save is rejected and nothing changes.
    pub fn flatten(&mut self) -> Result<FlattenedCapture, EditorError> {
        self.collect();
        let Some(session) = self.session.as_ref() else {
            return Err(EditorError::NoImageLoaded);
        };
        let annotation_count = session.store().len();
        if annotation_count == 0 {
            log::info!("Nothing to save, no annotations");
            self.notifications.push(Notification::SaveRejectedEmpty);
            return Err(EditorError::EmptyStore);
        }

        let flat = session.flatten_image()?;
        let image = export::encode(&flat, &self.config.export)?;
        let capture = FlattenedCapture {
            image,
            format: self.config.export.format,
            width: flat.width(),
            height: flat.height(),
            annotation_count,
            created_at: Utc::now(),
        };

        self.session = None;
        log::info!("Flattened capture with {} annotation(s)", annotation_count);
        self.notifications
            .push(Notification::Saved { annotation_count });
        Ok(capture)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ExportFormat, ExportOptions};
    use crate::domain::AnnotationKind;
    use crate::intake::tests::png_bytes;

    fn editor() -> Editor {
        let config = EditorConfig {
            export: ExportOptions {
                format: ExportFormat::Png,
                quality: 1.0,
            },
            ..EditorConfig::default()
        };
        Editor::with_text_engine(config, TextEngine::fallback())
    }

    fn loaded(width: u32, height: u32) -> Editor {
        let mut editor = editor();
        editor
            .load_image(&png_bytes(width, height, [40, 40, 40, 255]), "image/png")
            .unwrap();
        editor.take_notifications();
        editor
    }

    fn session(editor: &mut Editor) -> &mut EditorSession {
        editor.session_mut().unwrap()
    }

    fn gesture(s: &mut EditorSession, from: (f32, f32), to: (f32, f32)) {
        s.pointer(PointerEvent::Down(Point::new(from.0, from.1)));
        s.pointer(PointerEvent::Move(Point::new(to.0, to.1)));
        s.pointer(PointerEvent::Up);
    }

    #[test]
    fn test_load_fits_to_max_width() {
        let mut editor = editor();
        let size = editor
            .load_image(&png_bytes(1000, 500, [0, 0, 0, 255]), "image/png")
            .unwrap();
        assert_eq!(size, SurfaceSize::new(550, 275));
        assert_eq!(
            editor.take_notifications(),
            vec![Notification::ImageLoaded {
                width: 550,
                height: 275
            }]
        );

        // Small images are scaled up to the same width
        let size = editor
            .load_image(&png_bytes(110, 20, [0, 0, 0, 255]), "image/png")
            .unwrap();
        assert_eq!(size, SurfaceSize::new(550, 100));
    }

    #[test]
    fn test_load_rejects_non_image() {
        let mut editor = loaded(100, 50);
        session(&mut editor).set_tool(Tool::Line);
        gesture(session(&mut editor), (1.0, 1.0), (20.0, 20.0));

        let err = editor.load_image(b"hello", "text/plain").unwrap_err();
        assert!(matches!(err, EditorError::InvalidInput(_)));
        // The current session survives a rejected load
        assert_eq!(editor.session().unwrap().store().len(), 1);
        let events = editor.take_notifications();
        assert_eq!(
            events[..2],
            [
                Notification::AnnotationAdded {
                    kind: AnnotationKind::Line,
                    label: None
                },
                Notification::Checkpoint
            ]
        );
        assert!(matches!(events[2], Notification::InvalidImage { .. }));
        assert_eq!(events.len(), 3);
    }

    #[test]
    fn test_oversized_surface_is_rejected_before_resizing() {
        let mut editor = editor();
        let tall = RgbaImage::new(1, 20_000);
        let err = editor.load_decoded(&tall).unwrap_err();
        assert!(matches!(err, EditorError::InvalidInput(_)));
        assert!(!editor.is_ready());
        assert!(matches!(
            editor.take_notifications()[..],
            [Notification::InvalidImage { .. }]
        ));
    }

    #[test]
    fn test_new_image_resets_store() {
        let mut editor = loaded(100, 50);
        session(&mut editor).set_tool(Tool::Circle);
        gesture(session(&mut editor), (10.0, 10.0), (20.0, 20.0));
        editor
            .load_image(&png_bytes(100, 50, [0, 0, 0, 255]), "image/png")
            .unwrap();
        let s = editor.session().unwrap();
        assert!(s.store().is_empty());
        assert_eq!(s.tool(), Tool::Select);
    }

    #[test]
    fn test_measure_scenario_flattens_one_annotation() {
        let mut editor = loaded(1000, 500);
        let s = session(&mut editor);
        s.set_tool(Tool::Measure);
        gesture(s, (100.0, 100.0), (300.0, 100.0));
        let mut prompter = |request: &PromptRequest| {
            assert_eq!(request.message, "Enter the measurement (e.g. 2.80m):");
            PromptResponse::Submitted("2.00m".into())
        };
        assert!(s.drive_prompt(&mut prompter));

        let summaries = s.summaries();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].kind, AnnotationKind::Measure);
        assert_eq!(summaries[0].label, "2.00m");

        let capture = editor.flatten().unwrap();
        assert_eq!(capture.annotation_count, 1);
        assert_eq!((capture.width, capture.height), (550, 275));
        let decoded = image::load_from_memory(&capture.image).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (550, 275));

        // Session ends after a successful save
        assert!(!editor.is_ready());
        let events = editor.take_notifications();
        assert!(events.contains(&Notification::Saved {
            annotation_count: 1
        }));
    }

    #[test]
    fn test_text_prompt_cancel_adds_nothing() {
        let mut editor = loaded(200, 100);
        let s = session(&mut editor);
        s.set_tool(Tool::Text);
        s.mouse(
            PointerPhase::Down,
            Point::new(50.0, 50.0),
            DisplayRect::identity(s.size()),
        );
        assert!(s.drive_prompt(&mut |_: &PromptRequest| PromptResponse::Cancelled));
        assert!(s.store().is_empty());
        assert!(!s.drive_prompt(&mut |_: &PromptRequest| PromptResponse::Cancelled));
    }

    #[test]
    fn test_flatten_empty_is_rejected_without_change() {
        let mut editor = loaded(200, 100);
        assert_eq!(editor.flatten(), Err(EditorError::EmptyStore));
        assert!(editor.is_ready());
        assert_eq!(
            editor.take_notifications(),
            vec![Notification::SaveRejectedEmpty]
        );

        let mut empty = super::Editor::with_text_engine(EditorConfig::default(), TextEngine::fallback());
        assert_eq!(empty.flatten(), Err(EditorError::NoImageLoaded));
    }

    #[test]
    fn test_flatten_omits_selection_highlight() {
        let mut editor = loaded(550, 275);
        let s = session(&mut editor);
        s.set_tool(Tool::Line);
        gesture(s, (100.0, 100.0), (200.0, 100.0));
        let plain = s.flatten_image().unwrap();

        s.set_tool(Tool::Select);
        s.pointer(PointerEvent::Down(Point::new(100.0, 100.0)));
        s.pointer(PointerEvent::Up);
        assert!(s.store().selected().is_some());
        assert_eq!(s.flatten_image().unwrap(), plain);
    }

    #[test]
    fn test_mouse_coordinates_are_normalized() {
        let mut editor = loaded(550, 275);
        let s = session(&mut editor);
        s.set_tool(Tool::Rect);
        // Surface shown at half size, offset by (10, 20)
        let display = DisplayRect::new(10.0, 20.0, 275.0, 137.5);
        s.mouse(PointerPhase::Down, Point::new(20.0, 30.0), display);
        s.mouse(PointerPhase::Move, Point::new(60.0, 70.0), display);
        s.mouse(PointerPhase::Up, Point::new(60.0, 70.0), display);

        let (start, end) = s.store().annotations().next().unwrap().endpoints().unwrap();
        assert_eq!(start, Point::new(20.0, 20.0));
        assert_eq!(end, Point::new(100.0, 100.0));
    }

    #[test]
    fn test_touch_uses_first_point() {
        let mut editor = loaded(550, 275);
        let s = session(&mut editor);
        s.set_tool(Tool::Line);
        let display = DisplayRect::identity(s.size());
        let second = Point::new(500.0, 200.0);
        s.touch(PointerPhase::Down, &[Point::new(5.0, 5.0), second], display);
        s.touch(PointerPhase::Move, &[Point::new(50.0, 5.0), second], display);
        s.touch(PointerPhase::Up, &[], display);

        let (start, end) = s.store().annotations().next().unwrap().endpoints().unwrap();
        assert_eq!((start, end), (Point::new(5.0, 5.0), Point::new(50.0, 5.0)));
    }

    #[test]
    fn test_inverted_rect_renders() {
        let mut editor = loaded(100, 50);
        let s = session(&mut editor);
        s.set_tool(Tool::Rect);
        gesture(s, (10.0, 10.0), (5.0, 5.0));
        let surface = s.surface();
        assert_eq!(surface.width(), 550);
    }

    #[test]
    fn test_delete_and_undo_report_empty_conditions() {
        let mut editor = loaded(200, 100);
        let s = session(&mut editor);
        assert_eq!(s.delete_selected(), Err(EditorError::EmptySelection));
        assert_eq!(s.undo(), Err(EditorError::EmptyStore));
        assert_eq!(
            s.take_notifications(),
            vec![Notification::NothingSelected, Notification::NothingToUndo]
        );
    }

    #[test]
    fn test_list_select_then_delete() {
        let mut editor = loaded(200, 100);
        let s = session(&mut editor);
        s.set_tool(Tool::Arrow);
        gesture(s, (10.0, 10.0), (50.0, 10.0));
        s.set_tool(Tool::Circle);
        gesture(s, (100.0, 50.0), (120.0, 50.0));
        s.take_notifications();

        assert!(s.update(EditorMsg::SelectFromList(0)));
        assert_eq!(s.tool(), Tool::Select);
        assert!(s.summaries()[0].selected);

        assert!(s.update(EditorMsg::DeleteSelected));
        assert_eq!(s.store().len(), 1);
        assert_eq!(
            s.take_notifications(),
            vec![
                Notification::AnnotationDeleted {
                    kind: AnnotationKind::Arrow
                },
                Notification::Checkpoint
            ]
        );

        assert!(!s.update(EditorMsg::SelectFromList(7)));
        assert_eq!(s.take_notifications(), vec![Notification::NothingSelected]);

        assert!(s.update(EditorMsg::DeleteAt(0)));
        assert!(s.store().is_empty());
    }

    #[test]
    fn test_palette_index_sets_color() {
        let mut editor = loaded(550, 275);
        let s = session(&mut editor);
        assert_eq!(s.palette(), EditorConfig::default().palette.as_slice());

        assert!(!s.update(EditorMsg::PaletteColor(2)));
        assert_eq!(s.controller().color(), AnnotationColor::BLUE);

        assert_eq!(s.select_palette_color(99), None);
        assert_eq!(s.controller().color(), AnnotationColor::BLUE);

        s.set_tool(Tool::Line);
        gesture(s, (10.0, 10.0), (60.0, 60.0));
        assert_eq!(s.store().annotations().next().unwrap().color(), AnnotationColor::BLUE);
    }

    #[test]
    fn test_clear_needs_confirmation() {
        let mut editor = loaded(200, 100);
        let s = session(&mut editor);
        let mut asked = false;
        assert_eq!(
            s.clear(|| {
                asked = true;
                true
            }),
            0
        );
        assert!(!asked, "empty store must not prompt");

        s.set_tool(Tool::Line);
        gesture(s, (10.0, 10.0), (50.0, 10.0));
        gesture(s, (10.0, 40.0), (50.0, 40.0));
        assert!(!s.update(EditorMsg::Clear { confirmed: false }));
        assert_eq!(s.store().len(), 2);
        assert!(s.update(EditorMsg::Clear { confirmed: true }));
        assert!(s.store().is_empty());
    }

    #[test]
    fn test_commands_without_image_are_ignored() {
        let mut editor = editor();
        assert!(!editor.update(EditorMsg::Undo));
        assert!(editor.take_notifications().is_empty());
    }

    #[tokio::test]
    async fn test_load_image_async() {
        let mut editor = editor();
        let size = editor
            .load_image_async(png_bytes(1100, 200, [9, 9, 9, 255]), "image/png".into())
            .await
            .unwrap();
        assert_eq!(size, SurfaceSize::new(550, 100));
        assert!(editor.is_ready());
    }
}
