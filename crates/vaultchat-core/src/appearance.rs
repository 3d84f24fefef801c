//! Floating button appearance and placement
//!
//! Pure geometry: a front-end hands in the host size and gets back the
//! rectangle to draw the button in. Units are whatever the front-end uses
//! (points on a phone, cells in a terminal).

use serde::{Deserialize, Serialize};

pub const DEFAULT_BUTTON_CONTENT: &str = "💬";

/// Corner radius used by square buttons
pub const SQUARE_CORNER_RADIUS: u16 = 12;

/// Opacity of an auto-hiding button while content scrolls up
pub const SCROLL_HIDDEN_OPACITY: f32 = 0.2;

/// What the button content string means
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonType {
    /// Content is drawn as a label (usually an emoji)
    #[default]
    Text,
    /// Content names an icon
    Image,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonShape {
    #[default]
    Circle,
    Square,
}

impl ButtonShape {
    pub fn corner_radius(&self, size: u16) -> u16 {
        match self {
            ButtonShape::Circle => size / 2,
            ButtonShape::Square => SQUARE_CORNER_RADIUS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FloatingButtonPlacement {
    #[default]
    BottomTrailing,
    BottomLeading,
    TopTrailing,
    TopLeading,
}

impl FloatingButtonPlacement {
    pub fn is_bottom(&self) -> bool {
        matches!(self, Self::BottomTrailing | Self::BottomLeading)
    }

    pub fn is_trailing(&self) -> bool {
        matches!(self, Self::BottomTrailing | Self::TopTrailing)
    }
}

/// Per-host placement options for the floating button
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatingButtonOptions {
    pub placement: FloatingButtonPlacement,
    /// Falls back to the configuration's trailing padding
    pub horizontal_padding: Option<u16>,
    /// Falls back to the configuration's bottom padding
    pub vertical_padding: Option<u16>,
    pub avoid_keyboard: bool,
    pub auto_hide_on_scroll: bool,
    pub enable_drag_to_reposition: bool,
}

impl Default for FloatingButtonOptions {
    fn default() -> Self {
        Self {
            placement: FloatingButtonPlacement::default(),
            horizontal_padding: None,
            vertical_padding: None,
            avoid_keyboard: true,
            auto_hide_on_scroll: false,
            enable_drag_to_reposition: false,
        }
    }
}

impl FloatingButtonOptions {
    /// Button opacity while the host content is being scrolled.
    pub fn scroll_opacity(&self, scrolling_down: bool) -> f32 {
        if !self.auto_hide_on_scroll || scrolling_down {
            1.0
        } else {
            SCROLL_HIDDEN_OPACITY
        }
    }
}

/// Size and default paddings of the button, in host units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonMetrics {
    pub width: u16,
    pub height: u16,
    pub horizontal_padding: u16,
    pub vertical_padding: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonFrame {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl ButtonFrame {
    /// Move the frame by a drag translation, keeping it fully inside the host.
    pub fn dragged_by(&self, dx: i32, dy: i32, host_width: u16, host_height: u16) -> ButtonFrame {
        let max_x = i32::from(host_width.saturating_sub(self.width));
        let max_y = i32::from(host_height.saturating_sub(self.height));
        let x = (i32::from(self.x) + dx).clamp(0, max_x);
        let y = (i32::from(self.y) + dy).clamp(0, max_y);

        ButtonFrame {
            x: x as u16,
            y: y as u16,
            ..*self
        }
    }
}

/// Compute where the floating button sits inside a host of the given size.
///
/// Bottom placements are lifted by `keyboard_height` when the options ask to
/// avoid the keyboard. Coordinates saturate at zero when the host is too
/// small.
pub fn button_frame(
    metrics: &ButtonMetrics,
    options: &FloatingButtonOptions,
    host_width: u16,
    host_height: u16,
    keyboard_height: u16,
) -> ButtonFrame {
    let h_pad = options.horizontal_padding.unwrap_or(metrics.horizontal_padding);
    let v_pad = options.vertical_padding.unwrap_or(metrics.vertical_padding);

    let x = if options.placement.is_trailing() {
        host_width.saturating_sub(metrics.width).saturating_sub(h_pad)
    } else {
        h_pad
    };

    let y = if options.placement.is_bottom() {
        let lift = if options.avoid_keyboard { keyboard_height } else { 0 };
        host_height
            .saturating_sub(metrics.height)
            .saturating_sub(v_pad)
            .saturating_sub(lift)
    } else {
        v_pad
    };

    ButtonFrame {
        x,
        y,
        width: metrics.width,
        height: metrics.height,
    }
}
