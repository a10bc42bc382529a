//! Syntax highlighting.
//!
//! The [`Highlighter`] trait is the seam between the renderer and whatever
//! tokenizes source code. It only produces colored spans; turning them into
//! pixels is [`code_block`](crate::code_block)'s job.

use log::debug;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use crate::color::Color;
use crate::error::{Error, Result};

/// Tab characters are expanded to this many spaces.
const TAB_WIDTH: usize = 4;

/// Short style names mapped to bundled theme names.
const STYLE_ALIASES: &[(&str, &str)] = &[
    ("default", "InspiredGitHub"),
    ("github", "InspiredGitHub"),
    ("ocean-dark", "base16-ocean.dark"),
    ("ocean-light", "base16-ocean.light"),
    ("eighties", "base16-eighties.dark"),
    ("mocha", "base16-mocha.dark"),
    ("solarized-dark", "Solarized (dark)"),
    ("solarized-light", "Solarized (light)"),
];

/// A run of text drawn in a single color.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub color: Color,
    pub text: String,
}

/// Source code split into lines of colored spans, without line endings.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HighlightedCode {
    pub lines: Vec<Vec<Span>>,
}

impl HighlightedCode {
    /// Number of characters in the longest line.
    pub fn max_line_chars(&self) -> usize {
        self.lines
            .iter()
            .map(|line| line.iter().map(|span| span.text.chars().count()).sum())
            .max()
            .unwrap_or(0)
    }
}

/// Tokenizes and colors source code.
pub trait Highlighter: Send + Sync {
    /// Returns true if `style` names a style this highlighter can apply.
    fn has_style(&self, style: &str) -> bool;

    /// Highlights `code` in `language`, or in a detected language when
    /// `language` is `None`.
    ///
    /// Detection is best-effort and may differ between highlighters.
    fn highlight(&self, code: &str, language: Option<&str>, style: &str) -> Result<HighlightedCode>;
}

// ============================================================================
// SyntectHighlighter
// ============================================================================

/// [`Highlighter`] backed by syntect's bundled syntaxes and themes.
pub struct SyntectHighlighter {
    syntaxes: SyntaxSet,
    themes: ThemeSet,
}

impl Default for SyntectHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntectHighlighter {
    pub fn new() -> Self {
        Self {
            syntaxes: SyntaxSet::load_defaults_newlines(),
            themes: ThemeSet::load_defaults(),
        }
    }

    fn theme(&self, style: &str) -> Option<&Theme> {
        let name = STYLE_ALIASES
            .iter()
            .find(|(alias, _)| alias.eq_ignore_ascii_case(style))
            .map(|(_, name)| *name)
            .unwrap_or(style);
        self.themes.themes.get(name)
    }

    fn syntax(&self, code: &str, language: Option<&str>) -> Result<&SyntaxReference> {
        match language {
            Some(language) => self
                .syntaxes
                .find_syntax_by_token(language)
                .ok_or_else(|| Error::Highlight(format!("unknown language `{language}`"))),
            None => Ok(self
                .syntaxes
                .find_syntax_by_first_line(code)
                .unwrap_or_else(|| self.syntaxes.find_syntax_plain_text())),
        }
    }

    /// Names of every style accepted by [`Highlighter::has_style`].
    pub fn style_names(&self) -> Vec<String> {
        let mut names: Vec<String> = STYLE_ALIASES
            .iter()
            .map(|(alias, _)| alias.to_string())
            .chain(self.themes.themes.keys().cloned())
            .collect();
        names.sort();
        names
    }
}

impl Highlighter for SyntectHighlighter {
    fn has_style(&self, style: &str) -> bool {
        self.theme(style).is_some()
    }

    fn highlight(&self, code: &str, language: Option<&str>, style: &str) -> Result<HighlightedCode> {
        let theme = self
            .theme(style)
            .ok_or_else(|| Error::Highlight(format!("unknown style `{style}`")))?;
        let syntax = self.syntax(code, language)?;
        debug!("Highlighting {} bytes as {}", code.len(), syntax.name);

        let expanded = code.replace('\t', &" ".repeat(TAB_WIDTH));
        let mut lines = HighlightLines::new(syntax, theme);
        let mut highlighted = HighlightedCode::default();

        for line in LinesWithEndings::from(&expanded) {
            let ranges = lines
                .highlight_line(line, &self.syntaxes)
                .map_err(|e| Error::Highlight(e.to_string()))?;
            let spans = ranges
                .into_iter()
                .filter_map(|(style, text)| {
                    let text = text.trim_end_matches(['\n', '\r']);
                    (!text.is_empty()).then(|| Span {
                        color: theme_color(style.foreground),
                        text: text.to_string(),
                    })
                })
                .collect();
            highlighted.lines.push(spans);
        }

        Ok(highlighted)
    }
}

fn theme_color(color: syntect::highlighting::Color) -> Color {
    Color::new(
        color.r as f32 / 255.0,
        color.g as f32 / 255.0,
        color.b as f32 / 255.0,
        color.a as f32 / 255.0,
    )
}
