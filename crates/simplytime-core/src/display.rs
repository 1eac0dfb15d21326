//! Tab title and icon selection. Pure functions over timer state; the
//! host applies them however its platform shows titles and icons.

use serde::{Deserialize, Serialize};

use crate::timer::Mode;

/// Icon fill color keyed by timer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconColor {
    WorkBlue,
    BreakGreen,
    IdleGray,
}

impl IconColor {
    pub fn hex(self) -> &'static str {
        match self {
            IconColor::WorkBlue => "#2563eb",
            IconColor::BreakGreen => "#16a34a",
            IconColor::IdleGray => "#64748b",
        }
    }
}

/// Zero-padded `MM:SS`.
pub fn format_time(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Title string for the host window or tab.
pub fn tab_title(time_left_secs: u32, mode: Mode, running: bool) -> String {
    if running {
        let glyph = match mode {
            Mode::Work => "\u{23f1}\u{fe0f}",
            Mode::Break => "\u{2615}",
        };
        format!("{} - {} Simply Time", format_time(time_left_secs), glyph)
    } else {
        "Simply Time - Focus Timer".to_string()
    }
}

/// Icon color for the current state.
pub fn icon_color(mode: Mode, running: bool) -> IconColor {
    if !running {
        return IconColor::IdleGray;
    }
    match mode {
        Mode::Work => IconColor::WorkBlue,
        Mode::Break => IconColor::BreakGreen,
    }
}
