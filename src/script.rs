//! Line-oriented edit scripts for driving a [`MaskEditor`] without a UI.
//!
//! ```text
//! # comments start with '#'
//! tool brush
//! size 12
//! color 0 255 0
//! stroke 10 10 40 40 80 40
//! rect 0 0 100 50
//! fill 250 300
//! undo
//! ```

use image::Rgb;
use thiserror::Error;

use crate::session::MaskEditor;
use crate::tools::{CanvasPoint, PointerEvent, Tool};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct ScriptError {
    pub line: usize,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScriptCommand {
    Tool(Tool),
    Size(u32),
    Color(Rgb<u8>),
    Opacity(f32),
    Down(CanvasPoint),
    Move(CanvasPoint),
    Up(CanvasPoint),
    Leave,
    /// Press at the first point, drag through the rest, release at the last
    Stroke(Vec<CanvasPoint>),
    /// Rectangle gesture between two corners
    Rect(CanvasPoint, CanvasPoint),
    /// Flood fill click
    Fill(CanvasPoint),
    Clear,
    Undo,
    Redo,
}

impl ScriptCommand {
    pub fn apply(&self, editor: &mut MaskEditor) {
        match self {
            ScriptCommand::Tool(tool) => editor.set_tool(*tool),
            ScriptCommand::Size(size) => editor.set_brush_size(*size),
            ScriptCommand::Color(color) => editor.set_brush_color(*color),
            ScriptCommand::Opacity(opacity) => editor.set_mask_opacity(*opacity),
            ScriptCommand::Down(p) => editor.handle(PointerEvent::Down(*p)),
            ScriptCommand::Move(p) => editor.handle(PointerEvent::Move(*p)),
            ScriptCommand::Up(p) => editor.handle(PointerEvent::Up(*p)),
            ScriptCommand::Leave => editor.handle(PointerEvent::Leave),
            ScriptCommand::Stroke(points) => {
                if let Some((first, rest)) = points.split_first() {
                    editor.handle(PointerEvent::Down(*first));
                    for p in rest {
                        editor.handle(PointerEvent::Move(*p));
                    }
                    let last = rest.last().unwrap_or(first);
                    editor.handle(PointerEvent::Up(*last));
                }
            }
            ScriptCommand::Rect(a, b) => {
                with_tool(editor, Tool::Rectangle, |editor| {
                    editor.handle(PointerEvent::Down(*a));
                    editor.handle(PointerEvent::Move(*b));
                    editor.handle(PointerEvent::Up(*b));
                });
            }
            ScriptCommand::Fill(p) => {
                with_tool(editor, Tool::Fill, |editor| {
                    editor.handle(PointerEvent::Down(*p));
                    editor.handle(PointerEvent::Up(*p));
                });
            }
            ScriptCommand::Clear => editor.clear(),
            ScriptCommand::Undo => {
                editor.undo();
            }
            ScriptCommand::Redo => {
                editor.redo();
            }
        }
    }
}

/// Run `f` with `tool` active, then switch back to the previous tool
fn with_tool(editor: &mut MaskEditor, tool: Tool, f: impl FnOnce(&mut MaskEditor)) {
    let previous = editor.tool_state().active_tool;
    editor.set_tool(tool);
    f(editor);
    editor.set_tool(previous);
}

/// Apply every command in order
pub fn run_script(editor: &mut MaskEditor, commands: &[ScriptCommand]) {
    for command in commands {
        command.apply(editor);
    }
}

/// Parse a whole script
pub fn parse_script(source: &str) -> Result<Vec<ScriptCommand>, ScriptError> {
    let mut commands = Vec::new();

    for (idx, raw) in source.lines().enumerate() {
        let line = match raw.split_once('#') {
            Some((code, _)) => code,
            None => raw,
        }
        .trim();
        if line.is_empty() {
            continue;
        }

        let command = parse_line(line).map_err(|message| ScriptError {
            line: idx + 1,
            message,
        })?;
        commands.push(command);
    }

    Ok(commands)
}

fn parse_line(line: &str) -> Result<ScriptCommand, String> {
    let mut parts = line.split_whitespace();
    let Some(keyword) = parts.next() else {
        return Err("empty command".to_string());
    };
    let args: Vec<&str> = parts.collect();

    let command = match keyword.to_ascii_lowercase().as_str() {
        "tool" => {
            let [name] = expect_args::<1>(&args, keyword)?;
            let tool = Tool::from_name(name).ok_or_else(|| format!("unknown tool '{}'", name))?;
            ScriptCommand::Tool(tool)
        }
        "size" => {
            let [size] = expect_args::<1>(&args, keyword)?;
            let size = size
                .parse::<u32>()
                .map_err(|e| format!("invalid size '{}': {}", size, e))?;
            ScriptCommand::Size(size)
        }
        "color" => {
            let [r, g, b] = expect_args::<3>(&args, keyword)?;
            ScriptCommand::Color(Rgb([
                parse_channel(r)?,
                parse_channel(g)?,
                parse_channel(b)?,
            ]))
        }
        "opacity" => {
            let [value] = expect_args::<1>(&args, keyword)?;
            let value = value
                .parse::<f32>()
                .map_err(|e| format!("invalid opacity '{}': {}", value, e))?;
            ScriptCommand::Opacity(value)
        }
        "down" => ScriptCommand::Down(parse_point(&args, keyword)?),
        "move" => ScriptCommand::Move(parse_point(&args, keyword)?),
        "up" => ScriptCommand::Up(parse_point(&args, keyword)?),
        "leave" => {
            expect_args::<0>(&args, keyword)?;
            ScriptCommand::Leave
        }
        "stroke" => {
            if args.is_empty() || args.len() % 2 != 0 {
                return Err("stroke expects one or more X Y pairs".to_string());
            }
            let points = args
                .chunks(2)
                .map(|pair| parse_point(pair, keyword))
                .collect::<Result<Vec<_>, _>>()?;
            ScriptCommand::Stroke(points)
        }
        "rect" => {
            let coords = expect_args::<4>(&args, keyword)?;
            ScriptCommand::Rect(
                parse_point(&coords[..2], keyword)?,
                parse_point(&coords[2..], keyword)?,
            )
        }
        "fill" => ScriptCommand::Fill(parse_point(&args, keyword)?),
        "clear" => {
            expect_args::<0>(&args, keyword)?;
            ScriptCommand::Clear
        }
        "undo" => {
            expect_args::<0>(&args, keyword)?;
            ScriptCommand::Undo
        }
        "redo" => {
            expect_args::<0>(&args, keyword)?;
            ScriptCommand::Redo
        }
        other => return Err(format!("unknown command '{}'", other)),
    };

    Ok(command)
}

fn expect_args<'a, const N: usize>(args: &[&'a str], keyword: &str) -> Result<[&'a str; N], String> {
    <[&str; N]>::try_from(args)
        .map_err(|_| format!("{} expects {} argument(s), got {}", keyword, N, args.len()))
}

fn parse_point(args: &[&str], keyword: &str) -> Result<CanvasPoint, String> {
    let [x, y] = expect_args::<2>(args, keyword)?;
    let parse = |v: &str| {
        v.parse::<f64>()
            .map_err(|e| format!("invalid coordinate '{}': {}", v, e))
    };
    Ok(CanvasPoint::new(parse(x)?, parse(y)?))
}

fn parse_channel(value: &str) -> Result<u8, String> {
    value
        .parse::<u8>()
        .map_err(|e| format!("invalid color channel '{}': {}", value, e))
}
