//! Default values and bounds of every render option.
//!
//! Both tables are immutable constants. The validator reads each field's
//! default from [`DEFAULTS`] and its bound from [`LIMITS`]; nothing else in
//! the crate repeats these numbers.

use std::fmt;

/// An integer range with an inclusive upper bound and an optionally
/// exclusive lower bound, displayed in interval notation (`(0, 60]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bound {
    pub lower: i64,
    pub upper: i64,
    pub lower_exclusive: bool,
}

impl Bound {
    /// `[lower, upper]`
    pub const fn inclusive(lower: i64, upper: i64) -> Self {
        Self {
            lower,
            upper,
            lower_exclusive: false,
        }
    }

    /// `(lower, upper]`
    pub const fn above(lower: i64, upper: i64) -> Self {
        Self {
            lower,
            upper,
            lower_exclusive: true,
        }
    }

    /// Smallest accepted value.
    pub const fn min(&self) -> i64 {
        if self.lower_exclusive {
            self.lower + 1
        } else {
            self.lower
        }
    }

    /// Largest accepted value.
    pub const fn max(&self) -> i64 {
        self.upper
    }

    pub const fn contains(&self, value: i64) -> bool {
        value >= self.min() && value <= self.max()
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let open = if self.lower_exclusive { '(' } else { '[' };
        write!(f, "{open}{}, {}]", self.lower, self.upper)
    }
}

/// Default value of every optional render option.
#[derive(Debug, Clone, Copy)]
pub struct Defaults {
    pub width: i64,
    pub height: i64,
    pub bg_color: &'static str,
    pub bar_height: i64,
    pub bar_color: &'static str,
    pub tab_color: &'static str,
    pub tab_text_color: &'static str,
    pub tab_font: &'static str,
    pub tab_font_size: i64,
    pub show_blur: bool,
    pub blur_color: &'static str,
    pub blur_radius: i64,
    pub show_tab_line: bool,
    pub tab_line_color: &'static str,
    pub tab_line_width: i64,
    /// `{language}` is replaced by the requested language identifier.
    pub language_icon: &'static str,
    /// Used instead of [`Defaults::language_icon`] when the language is auto-detected.
    pub unknown_language_icon: &'static str,
    pub close_icon: &'static str,
    pub icon_size: (i64, i64),
    pub spacing: i64,
    pub margins: i64,
    pub code_font: &'static str,
    pub code_font_size: i64,
    pub code_line_padding: i64,
    pub code_style: &'static str,
}

pub const DEFAULTS: Defaults = Defaults {
    width: 800,
    height: 480,
    bg_color: "white",
    bar_height: 40,
    bar_color: "black",
    tab_color: "white",
    tab_text_color: "black",
    tab_font: "fonts/DejaVuSansMono-Oblique.ttf",
    tab_font_size: 14,
    show_blur: false,
    blur_color: "black",
    blur_radius: 10,
    show_tab_line: false,
    tab_line_color: "black",
    tab_line_width: 3,
    language_icon: "icons/{language}.png",
    unknown_language_icon: "icons/default.png",
    close_icon: "icons/close.png",
    icon_size: (25, 25),
    spacing: 10,
    margins: 20,
    code_font: "fonts/DejaVuSansMono.ttf",
    code_font_size: 14,
    code_line_padding: 10,
    code_style: "default",
};

/// Accepted range of every bounded render option.
#[derive(Debug, Clone, Copy)]
pub struct Limits {
    pub width: Bound,
    pub height: Bound,
    pub bar_height: Bound,
    pub blur_radius: Bound,
    /// Applies to the sum of both icon dimensions.
    pub icon_size: Bound,
    pub spacing: Bound,
    pub margins: Bound,
    pub tab_line_width: Bound,
    pub tab_font_size: Bound,
    pub code_font_size: Bound,
    pub code_line_padding: Bound,
    /// Length in characters.
    pub tab_name: Bound,
    /// Length in characters.
    pub code: Bound,
    /// Largest resource body, in bytes, the resolver will download.
    pub content_length: u64,
}

pub const LIMITS: Limits = Limits {
    width: Bound::inclusive(400, 1920),
    height: Bound::inclusive(240, 1080),
    bar_height: Bound::above(0, 60),
    blur_radius: Bound::above(0, 15),
    icon_size: Bound::above(0, 128),
    spacing: Bound::above(0, 30),
    margins: Bound::above(0, 40),
    tab_line_width: Bound::above(0, 10),
    tab_font_size: Bound::above(6, 60),
    code_font_size: Bound::above(6, 60),
    code_line_padding: Bound::above(5, 40),
    tab_name: Bound::inclusive(1, 30),
    code: Bound::inclusive(1, 1000),
    content_length: 5 * 1024 * 1024,
};
