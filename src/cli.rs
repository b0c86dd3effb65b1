// ============================================================================
// photomeasure CLI: headless annotation replay
// ============================================================================
//
// Usage examples:
//   photomeasure --input room.jpg --script gestures.json --output room-annotated.jpg
//   photomeasure -i room.jpg -s gestures.json --store ~/measures --format png
//
// The script is a JSON array of editor commands, replayed in order against a
// single editing session. Prompt answers are taken from the `answer` entries
// in the order they appear.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;

use crate::config::{AnnotationColor, EditorConfig, ExportFormat, Tool};
use crate::domain::{DisplayRect, Point};
use crate::export::{DirectorySink, FlattenedCapture, PersistenceSink};
use crate::intake;
use crate::session::{
    Editor, EditorMsg, PointerEvent, PointerPhase, PromptRequest, PromptResponse, Prompter,
};

// ============================================================================
// CLI argument definition (clap Derive)
// ============================================================================

/// Annotate a photo from a gesture script and save the flattened result.
#[derive(Parser, Debug)]
#[command(name = "photomeasure", version, about)]
pub struct CliArgs {
    /// Photo to annotate
    #[arg(short, long, value_name = "IMAGE")]
    pub input: PathBuf,

    /// JSON gesture script to replay
    #[arg(short, long, value_name = "SCRIPT.json")]
    pub script: Option<PathBuf>,

    /// Where to write the flattened image.
    /// Defaults to `<input>-annotated.<ext>` unless --store is given.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Also record the capture in this measurement store directory
    #[arg(long, value_name = "DIR")]
    pub store: Option<PathBuf>,

    /// Output encoding: jpeg or png (default from config)
    #[arg(short, long, value_name = "FORMAT")]
    pub format: Option<ExportFormat>,

    /// JPEG quality, 0.0-1.0 (default from config)
    #[arg(short, long, value_name = "0.0-1.0")]
    pub quality: Option<f32>,

    /// Surface width the photo is fitted to
    #[arg(long, value_name = "PIXELS")]
    pub max_width: Option<u32>,

    /// Config file to use instead of the user config
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Font for text and measurement labels
    #[arg(long, value_name = "FONT")]
    pub font: Option<PathBuf>,
}

impl CliArgs {
    /// User config with command line overrides applied
    pub fn editor_config(&self) -> Result<EditorConfig> {
        let mut config = match &self.config {
            Some(path) => EditorConfig::load_from(path)?,
            None => EditorConfig::load(),
        };
        if let Some(format) = self.format {
            config.export.format = format;
        }
        if let Some(quality) = self.quality {
            config.export.quality = quality;
        }
        if let Some(width) = self.max_width {
            config.max_display_width = width;
        }
        if let Some(font) = &self.font {
            config.font_path = Some(font.clone());
        }
        Ok(config)
    }
}

// ============================================================================
// Script format
// ============================================================================

/// One step of a gesture script
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum ScriptCommand {
    Tool {
        tool: Tool,
    },
    Color {
        color: AnnotationColor,
    },
    /// Entry of the configured palette
    Palette {
        index: usize,
    },
    /// Mouse input; without `display` coordinates are surface pixels
    Down {
        x: f32,
        y: f32,
        #[serde(default)]
        display: Option<DisplayRect>,
    },
    Move {
        x: f32,
        y: f32,
        #[serde(default)]
        display: Option<DisplayRect>,
    },
    Up,
    Touch {
        phase: PointerPhase,
        #[serde(default)]
        touches: Vec<Point>,
        #[serde(default)]
        display: Option<DisplayRect>,
    },
    /// Queued prompt answer; `null` cancels the prompt
    Answer {
        text: Option<String>,
    },
    SelectFromList {
        index: usize,
    },
    DeleteAt {
        index: usize,
    },
    DeleteSelected,
    Undo,
    Clear {
        #[serde(default = "confirmed_by_default")]
        confirmed: bool,
    },
    Save,
}

fn confirmed_by_default() -> bool {
    true
}

pub fn parse_script(json: &str) -> Result<Vec<ScriptCommand>> {
    serde_json::from_str(json).context("Malformed gesture script")
}

/// Answers prompts from the script's `answer` entries in order
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<PromptResponse>,
}

impl ScriptedPrompter {
    pub fn from_script(commands: &[ScriptCommand]) -> Self {
        let answers = commands
            .iter()
            .filter_map(|command| match command {
                ScriptCommand::Answer { text } => Some(PromptResponse::from(text.clone())),
                _ => None,
            })
            .collect();
        Self { answers }
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&mut self, request: &PromptRequest) -> PromptResponse {
        self.answers.pop_front().unwrap_or_else(|| {
            log::warn!("Script has no answer for {:?}, cancelling", request.message);
            PromptResponse::Cancelled
        })
    }
}

/// Editor command for a script step. `Answer` and `Save` are handled by the
/// replay loop and map to nothing.
fn to_msg(command: &ScriptCommand) -> Option<EditorMsg> {
    let pointer = |phase: PointerPhase, x: f32, y: f32, display: &Option<DisplayRect>| match display {
        Some(display) => EditorMsg::Mouse {
            phase,
            client: Point::new(x, y),
            display: *display,
        },
        None => EditorMsg::Pointer(PointerEvent::new(phase, Point::new(x, y))),
    };
    let msg = match command {
        ScriptCommand::Tool { tool } => EditorMsg::SetTool(*tool),
        ScriptCommand::Color { color } => EditorMsg::SetColor(*color),
        ScriptCommand::Palette { index } => EditorMsg::PaletteColor(*index),
        ScriptCommand::Down { x, y, display } => pointer(PointerPhase::Down, *x, *y, display),
        ScriptCommand::Move { x, y, display } => pointer(PointerPhase::Move, *x, *y, display),
        ScriptCommand::Up => EditorMsg::Pointer(PointerEvent::Up),
        ScriptCommand::Touch {
            phase,
            touches,
            display,
        } => match display {
            Some(display) => EditorMsg::Touch {
                phase: *phase,
                touches: touches.clone(),
                display: *display,
            },
            None => {
                let position = touches.first().copied().unwrap_or_default();
                EditorMsg::Pointer(PointerEvent::new(*phase, position))
            }
        },
        ScriptCommand::SelectFromList { index } => EditorMsg::SelectFromList(*index),
        ScriptCommand::DeleteAt { index } => EditorMsg::DeleteAt(*index),
        ScriptCommand::DeleteSelected => EditorMsg::DeleteSelected,
        ScriptCommand::Undo => EditorMsg::Undo,
        ScriptCommand::Clear { confirmed } => EditorMsg::Clear {
            confirmed: *confirmed,
        },
        ScriptCommand::Answer { .. } | ScriptCommand::Save => return None,
    };
    Some(msg)
}

// ============================================================================
// Public entry point
// ============================================================================

/// Replay the script against the input photo and save the result
pub async fn run(args: CliArgs) -> Result<()> {
    let config = args.editor_config()?;
    let mut editor = Editor::new(config);

    let bytes = std::fs::read(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let mime = intake::mime_from_path(&args.input).to_string();
    editor
        .load_image_async(bytes, mime)
        .await
        .with_context(|| format!("Could not load {}", args.input.display()))?;
    report(&mut editor);

    let commands = match &args.script {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read script {}", path.display()))?;
            parse_script(&json)?
        }
        None => Vec::new(),
    };
    let mut prompter = ScriptedPrompter::from_script(&commands);

    let mut saved = false;
    for command in &commands {
        if *command == ScriptCommand::Save {
            if let Some(capture) = save(&mut editor, &args)? {
                saved = true;
                log::debug!("Session ended by save, {} byte image", capture.image.len());
            }
            continue;
        }
        let Some(msg) = to_msg(command) else {
            continue;
        };
        editor.update(msg);
        if let Some(session) = editor.session_mut() {
            session.drive_prompt(&mut prompter);
        }
        report(&mut editor);
    }

    if !saved && editor.is_ready() {
        save(&mut editor, &args)?;
    }
    Ok(())
}

/// Flatten and write the capture. `None` if there was nothing to save.
fn save(editor: &mut Editor, args: &CliArgs) -> Result<Option<FlattenedCapture>> {
    let capture = match editor.flatten() {
        Ok(capture) => capture,
        Err(err) => {
            report(editor);
            log::warn!("Nothing saved: {}", err);
            return Ok(None);
        }
    };
    report(editor);

    if let Some(root) = &args.store {
        let record = DirectorySink::new(root).persist(&capture)?;
        log::info!("Recorded capture {} in {}", record.id, root.display());
    }
    if let Some(path) = output_path(args, capture.format) {
        std::fs::write(&path, &capture.image)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        log::info!(
            "Wrote {}x{} capture with {} annotation(s) to {}",
            capture.width,
            capture.height,
            capture.annotation_count,
            path.display()
        );
    }
    Ok(Some(capture))
}

fn output_path(args: &CliArgs, format: ExportFormat) -> Option<PathBuf> {
    match (&args.output, &args.store) {
        (Some(path), _) => Some(path.clone()),
        (None, Some(_)) => None,
        (None, None) => Some(default_output(&args.input, format)),
    }
}

fn default_output(input: &Path, format: ExportFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "capture".to_string());
    input.with_file_name(format!("{stem}-annotated.{}", format.extension()))
}

/// Log pending notifications as JSON lines
fn report(editor: &mut Editor) {
    for notification in editor.take_notifications() {
        match serde_json::to_string(&notification) {
            Ok(json) => log::info!("{}", json),
            Err(err) => log::warn!("Unprintable notification {:?}: {}", notification, err),
        }
    }
}
