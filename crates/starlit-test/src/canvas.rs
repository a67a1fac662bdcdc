//! Canvas that records paint output for assertions.

use starlit_core::{Canvas, Color, Point, Rect, TextStyle};

/// A recorded paint operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Filled rectangle
    FillRect {
        /// Rectangle
        rect: Rect,
        /// Fill color
        color: Color,
    },
    /// Stroked rectangle
    StrokeRect {
        /// Rectangle
        rect: Rect,
        /// Stroke color
        color: Color,
        /// Stroke width
        width: f32,
    },
    /// Text
    Text {
        /// Text content
        content: String,
        /// Baseline origin
        position: Point,
        /// Text style
        style: TextStyle,
    },
}

/// A Canvas implementation that records draw operations.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    /// Create a new empty recording canvas.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the recorded draw commands.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Get the number of recorded commands.
    #[must_use]
    pub fn command_count(&self) -> usize {
        self.commands.len()
    }

    /// Filled rectangles painted with `color`.
    #[must_use]
    pub fn fills_with(&self, color: Color) -> Vec<Rect> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::FillRect { rect, color: c } if *c == color => Some(*rect),
                _ => None,
            })
            .collect()
    }

    /// Text drawn, in paint order.
    #[must_use]
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Text { content, .. } => Some(content.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Clear all recorded commands.
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl Canvas for RecordingCanvas {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f32) {
        self.commands
            .push(DrawCommand::StrokeRect { rect, color, width });
    }

    fn draw_text(&mut self, text: &str, position: Point, style: &TextStyle) {
        self.commands.push(DrawCommand::Text {
            content: text.to_string(),
            position,
            style: style.clone(),
        });
    }
}
