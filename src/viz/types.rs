//! Public types and constants for the drawing helpers.

/// Which side of the plot an axis sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisOrient {
    /// Horizontal axis below the plot, ticks pointing down.
    Bottom,
    /// Vertical axis left of the plot, ticks pointing left.
    Left,
}

/// How tick values turn into label text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickFormat {
    /// Shortest decimal representation fitting the tick step.
    Identity,
    /// Truncated to a whole number (years).
    Integer,
    /// Thousands separators of the configured locale.
    Grouped,
    /// Ticks without text.
    Silent,
}

/// Length of a tick mark in pixels.
pub const TICK_SIZE: f64 = 6.0;

/// Gap between a tick mark and its label.
pub const TICK_PADDING: f64 = 3.0;

/// Font size of tick labels.
pub const TICK_FONT_PX: f64 = 10.0;

/// Font size of axis titles.
pub const TITLE_FONT_PX: f64 = 12.0;
