//! Validated render configuration.
//!
//! [`RenderConfig::from_options`] turns a loosely typed JSON object into a
//! strict configuration. Each option is read exactly once with its default
//! from [`DEFAULTS`] and its bound from [`LIMITS`]; the first violation is
//! returned as [`Error::Validation`] and nothing is partially applied.
//!
//! Resource references (fonts and icons) are recorded verbatim. Opening them
//! is the [`Resolver`](crate::resource::Resolver)'s job.

use log::debug;
use serde_json::{Map, Value};

use crate::color::Color;
use crate::error::{Error, Result};
use crate::geometry::SizePx;
use crate::highlight::Highlighter;
use crate::limits::{Bound, DEFAULTS, LIMITS};

/// Options that are read by the validator, with their accepted aliases.
const OPTIONS: &[(&str, Option<&str>)] = &[
    ("width", Some("w")),
    ("height", Some("h")),
    ("bg_color", None),
    ("bar_height", Some("bar_h")),
    ("bar_color", None),
    ("blur_color", None),
    ("blur_radius", None),
    ("show_blur", None),
    ("icon_size", None),
    ("close_icon", None),
    ("language_icon", None),
    ("spacing", None),
    ("margins", None),
    ("tab_color", None),
    ("tab_text_color", None),
    ("tab_line_color", None),
    ("tab_line_width", None),
    ("show_tab_line", None),
    ("tab_font", None),
    ("tab_font_size", None),
    ("tab_name", None),
    ("code", None),
    ("language", None),
    ("code_font", None),
    ("code_font_size", None),
    ("code_line_padding", None),
    ("code_style", None),
];

// ============================================================================
// RenderConfig
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
    pub bg_color: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarConfig {
    pub height: u32,
    pub color: Color,
}

/// Blurred drop-shadow behind the bar.
#[derive(Debug, Clone, PartialEq)]
pub struct ShadowConfig {
    pub enabled: bool,
    pub color: Color,
    /// Gaussian blur radius. Also reserves `2 * radius` pixels between the
    /// bar and the code block, whether or not the shadow is enabled.
    pub radius: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TabConfig {
    pub name: String,
    pub color: Color,
    pub text_color: Color,
    pub font: String,
    pub font_size: u32,
    pub show_line: bool,
    pub line_color: Color,
    pub line_width: u32,
    /// Shared by the close icon and the language icon.
    pub icon_size: SizePx,
    pub close_icon: String,
    pub language_icon: String,
    /// Gap between the label and each icon.
    pub spacing: u32,
    /// Extra width added to the tab around its content.
    pub margins: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CodeConfig {
    pub text: String,
    /// Lexer identifier; `None` asks the highlighter to detect the language.
    pub language: Option<String>,
    pub font: String,
    pub font_size: u32,
    pub line_padding: u32,
    pub style: String,
}

/// Fully validated description of one image.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub canvas: CanvasConfig,
    pub bar: BarConfig,
    pub shadow: ShadowConfig,
    pub tab: TabConfig,
    pub code: CodeConfig,
}

impl RenderConfig {
    /// Validates an options object.
    ///
    /// `highlighter` is consulted for the set of known code styles.
    pub fn from_options(options: &Map<String, Value>, highlighter: &dyn Highlighter) -> Result<Self> {
        let v = Options::new(options);

        let canvas = CanvasConfig {
            width: v.int("width", DEFAULTS.width, LIMITS.width)?,
            height: v.int("height", DEFAULTS.height, LIMITS.height)?,
            bg_color: v.color("bg_color", DEFAULTS.bg_color)?,
        };

        let shadow = ShadowConfig {
            color: v.color("blur_color", DEFAULTS.blur_color)?,
            radius: v.int("blur_radius", DEFAULTS.blur_radius, LIMITS.blur_radius)?,
            enabled: v.flag("show_blur", DEFAULTS.show_blur)?,
        };

        let bar = BarConfig {
            height: v.int("bar_height", DEFAULTS.bar_height, LIMITS.bar_height)?,
            color: v.color("bar_color", DEFAULTS.bar_color)?,
        };

        let language = v.language()?;
        let default_language_icon = match &language {
            Some(language) => DEFAULTS.language_icon.replace("{language}", language),
            None => DEFAULTS.unknown_language_icon.to_string(),
        };

        let tab = TabConfig {
            icon_size: v.icon_size()?,
            close_icon: v.reference("close_icon", DEFAULTS.close_icon)?,
            language_icon: v.reference("language_icon", &default_language_icon)?,
            spacing: v.int("spacing", DEFAULTS.spacing, LIMITS.spacing)?,
            margins: v.int("margins", DEFAULTS.margins, LIMITS.margins)?,
            color: v.color("tab_color", DEFAULTS.tab_color)?,
            text_color: v.color("tab_text_color", DEFAULTS.tab_text_color)?,
            line_color: v.color("tab_line_color", DEFAULTS.tab_line_color)?,
            line_width: v.int("tab_line_width", DEFAULTS.tab_line_width, LIMITS.tab_line_width)?,
            show_line: v.flag("show_tab_line", DEFAULTS.show_tab_line)?,
            font: v.reference("tab_font", DEFAULTS.tab_font)?,
            font_size: v.int("tab_font_size", DEFAULTS.tab_font_size, LIMITS.tab_font_size)?,
            name: v.text("tab_name", LIMITS.tab_name)?,
        };

        let code = CodeConfig {
            text: v.text("code", LIMITS.code)?,
            font: v.reference("code_font", DEFAULTS.code_font)?,
            font_size: v.int("code_font_size", DEFAULTS.code_font_size, LIMITS.code_font_size)?,
            line_padding: v.int(
                "code_line_padding",
                DEFAULTS.code_line_padding,
                LIMITS.code_line_padding,
            )?,
            style: v.style(highlighter)?,
            language,
        };

        v.log_ignored();

        Ok(Self {
            canvas,
            bar,
            shadow,
            tab,
            code,
        })
    }
}

// ============================================================================
// Option access
// ============================================================================

/// Typed, bound-checked access to the raw options object.
struct Options<'a> {
    raw: &'a Map<String, Value>,
}

impl<'a> Options<'a> {
    fn new(raw: &'a Map<String, Value>) -> Self {
        Self { raw }
    }

    /// Looks up an option by name or alias. `null` counts as absent.
    fn get(&self, name: &str) -> Option<&'a Value> {
        let alias = OPTIONS
            .iter()
            .find(|(option, _)| *option == name)
            .and_then(|(_, alias)| *alias);

        self.raw
            .get(name)
            .or_else(|| alias.and_then(|alias| self.raw.get(alias)))
            .filter(|value| !value.is_null())
    }

    fn int(&self, name: &str, default: i64, bound: Bound) -> Result<u32> {
        let value = match self.get(name) {
            None => default,
            Some(value) => value
                .as_i64()
                .ok_or_else(|| Error::validation(name, format!("must be an integer, got {value}")))?,
        };
        if !bound.contains(value) {
            return Err(Error::validation(
                name,
                format!("must be in {bound}, got {value}"),
            ));
        }
        // Every bound lies within 0..=u32::MAX.
        Ok(value as u32)
    }

    fn color(&self, name: &str, default: &str) -> Result<Color> {
        match self.get(name) {
            None => Color::parse(default)
                .ok_or_else(|| Error::validation(name, format!("default `{default}` is not a color"))),
            Some(value) => Color::from_value(value)
                .ok_or_else(|| Error::validation(name, format!("{value} is not a valid color"))),
        }
    }

    fn flag(&self, name: &str, default: bool) -> Result<bool> {
        match self.get(name) {
            None => Ok(default),
            Some(value) => value
                .as_bool()
                .ok_or_else(|| Error::validation(name, format!("must be a boolean, got {value}"))),
        }
    }

    /// A required string whose length in characters lies within `bound`.
    fn text(&self, name: &str, bound: Bound) -> Result<String> {
        let text = match self.get(name) {
            None => "",
            Some(Value::String(text)) => text.as_str(),
            Some(value) => {
                return Err(Error::validation(name, format!("must be a string, got {value}")));
            }
        };
        let len = text.chars().count() as i64;
        if !bound.contains(len) {
            return Err(Error::validation(
                name,
                format!("length must be in {bound}, got {len}"),
            ));
        }
        Ok(text.to_string())
    }

    fn reference(&self, name: &str, default: &str) -> Result<String> {
        match self.get(name) {
            None => Ok(default.to_string()),
            Some(Value::String(reference)) if !reference.trim().is_empty() => Ok(reference.clone()),
            Some(value) => Err(Error::validation(
                name,
                format!("must be a non-empty path, URL or name, got {value}"),
            )),
        }
    }

    /// An empty or missing language means auto-detection.
    fn language(&self) -> Result<Option<String>> {
        match self.get("language") {
            None => Ok(None),
            Some(Value::String(language)) if language.trim().is_empty() => Ok(None),
            Some(Value::String(language)) => Ok(Some(language.trim().to_string())),
            Some(value) => Err(Error::validation(
                "language",
                format!("must be a lexer identifier, got {value}"),
            )),
        }
    }

    /// `[width, height]`, both positive, whose sum lies within the limit.
    fn icon_size(&self) -> Result<SizePx> {
        let (width, height) = match self.get("icon_size") {
            None => DEFAULTS.icon_size,
            Some(Value::Array(pair)) if pair.len() == 2 => match (pair[0].as_i64(), pair[1].as_i64()) {
                (Some(w), Some(h)) => (w, h),
                _ => return Err(icon_size_error(&Value::Array(pair.clone()))),
            },
            Some(value) => return Err(icon_size_error(value)),
        };
        let sum = width + height;
        if width <= 0 || height <= 0 || !LIMITS.icon_size.contains(sum) {
            return Err(Error::validation(
                "icon_size",
                format!(
                    "both sides must be positive and their sum in {}, got [{width}, {height}]",
                    LIMITS.icon_size
                ),
            ));
        }
        Ok(SizePx::new(width as u32, height as u32))
    }

    fn style(&self, highlighter: &dyn Highlighter) -> Result<String> {
        let style = match self.get("code_style") {
            None => DEFAULTS.code_style,
            Some(Value::String(style)) => style.as_str(),
            Some(value) => {
                return Err(Error::validation(
                    "code_style",
                    format!("must be a style name, got {value}"),
                ));
            }
        };
        if !highlighter.has_style(style) {
            return Err(Error::validation(
                "code_style",
                format!("unknown style `{style}`"),
            ));
        }
        Ok(style.to_string())
    }

    fn log_ignored(&self) {
        for key in self.raw.keys() {
            let known = OPTIONS
                .iter()
                .any(|(name, alias)| *name == key.as_str() || *alias == Some(key.as_str()));
            if !known {
                debug!("Ignoring unknown render option `{key}`");
            }
        }
    }
}

fn icon_size_error(value: &Value) -> Error {
    Error::validation(
        "icon_size",
        format!("must be a pair of integers [width, height], got {value}"),
    )
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::highlight::HighlightedCode;
    use rstest::rstest;
    use serde_json::json;

    /// Accepts only the `default` and `dark` styles.
    pub(crate) struct FixedStyles;

    impl Highlighter for FixedStyles {
        fn has_style(&self, style: &str) -> bool {
            matches!(style, "default" | "dark")
        }

        fn highlight(&self, _code: &str, _language: Option<&str>, _style: &str) -> Result<HighlightedCode> {
            unreachable!("validation never highlights")
        }
    }

    fn options(extra: Value) -> Map<String, Value> {
        let mut base = json!({"tab_name": "main.py", "code": "print(1)"});
        if let (Some(base), Value::Object(extra)) = (base.as_object_mut(), extra) {
            base.extend(extra);
        }
        match base {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    pub(crate) fn try_config(extra: Value) -> Result<RenderConfig> {
        RenderConfig::from_options(&options(extra), &FixedStyles)
    }

    /// A valid config with the given overrides on top of a tab name and code.
    pub(crate) fn config_with(extra: Value) -> RenderConfig {
        try_config(extra).unwrap()
    }

    fn rejected_field(extra: Value) -> String {
        match try_config(extra) {
            Err(Error::Validation { field, .. }) => field,
            other => panic!("expected a validation error, got {other:?}"),
        }
    }

    #[test]
    fn defaults_apply() {
        let config = config_with(json!({}));
        assert_eq!(config.canvas.width, 800);
        assert_eq!(config.canvas.height, 480);
        assert_eq!(config.bar.height, 40);
        assert_eq!(config.shadow.radius, 10);
        assert!(!config.shadow.enabled);
        assert!(!config.tab.show_line);
        assert_eq!(config.tab.icon_size, SizePx::new(25, 25));
        assert_eq!(config.tab.close_icon, "icons/close.png");
        assert_eq!(config.tab.language_icon, "icons/default.png");
        assert_eq!(config.code.language, None);
        assert_eq!(config.code.style, "default");
        assert_eq!(config.canvas.bg_color, Color::parse("white").unwrap());
    }

    #[test]
    fn language_selects_default_icon() {
        let config = config_with(json!({"language": "python"}));
        assert_eq!(config.code.language.as_deref(), Some("python"));
        assert_eq!(config.tab.language_icon, "icons/python.png");

        let explicit = config_with(json!({"language": "python", "language_icon": "icons/rust.png"}));
        assert_eq!(explicit.tab.language_icon, "icons/rust.png");
    }

    #[test]
    fn short_aliases_are_accepted() {
        let config = config_with(json!({"w": 1024, "h": 600, "bar_h": 30}));
        assert_eq!(config.canvas.width, 1024);
        assert_eq!(config.canvas.height, 600);
        assert_eq!(config.bar.height, 30);

        let canonical_wins = config_with(json!({"width": 900, "w": 1000}));
        assert_eq!(canonical_wins.canvas.width, 900);
    }

    #[rstest]
    #[case("width", 400, 1920)]
    #[case("height", 240, 1080)]
    #[case("bar_height", 1, 60)]
    #[case("blur_radius", 1, 15)]
    #[case("spacing", 1, 30)]
    #[case("margins", 1, 40)]
    #[case("tab_line_width", 1, 10)]
    #[case("tab_font_size", 7, 60)]
    #[case("code_font_size", 7, 60)]
    #[case("code_line_padding", 6, 40)]
    fn integer_bounds_are_inclusive(#[case] field: &str, #[case] min: i64, #[case] max: i64) {
        assert!(try_config(json!({ field: min })).is_ok(), "{field}={min}");
        assert!(try_config(json!({ field: max })).is_ok(), "{field}={max}");
        assert_eq!(rejected_field(json!({ field: min - 1 })), field);
        assert_eq!(rejected_field(json!({ field: max + 1 })), field);
    }

    #[rstest]
    #[case(json!({"width": "800"}), "width")]
    #[case(json!({"width": 800.5}), "width")]
    #[case(json!({"show_blur": "yes"}), "show_blur")]
    #[case(json!({"tab_name": 7}), "tab_name")]
    #[case(json!({"language": ["python"]}), "language")]
    #[case(json!({"tab_font": ""}), "tab_font")]
    #[case(json!({"code_style": "neon"}), "code_style")]
    fn wrong_domain_is_rejected(#[case] extra: Value, #[case] field: &str) {
        assert_eq!(rejected_field(extra), field);
    }

    #[test]
    fn text_lengths() {
        assert!(try_config(json!({"tab_name": "x".repeat(30)})).is_ok());
        assert_eq!(rejected_field(json!({"tab_name": "x".repeat(31)})), "tab_name");
        assert_eq!(rejected_field(json!({"tab_name": ""})), "tab_name");

        assert!(try_config(json!({"code": "é".repeat(1000)})).is_ok());
        assert_eq!(rejected_field(json!({"code": "x".repeat(1001)})), "code");
    }

    #[test]
    fn missing_required_text() {
        let mut map = options(json!({}));
        map.remove("code");
        match RenderConfig::from_options(&map, &FixedStyles) {
            Err(Error::Validation { field, .. }) => assert_eq!(field, "code"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn icon_size_sum_bound() {
        assert_eq!(config_with(json!({"icon_size": [64, 64]})).tab.icon_size, SizePx::new(64, 64));
        assert_eq!(config_with(json!({"icon_size": [1, 1]})).tab.icon_size, SizePx::new(1, 1));
        assert_eq!(rejected_field(json!({"icon_size": [64, 65]})), "icon_size");
        assert_eq!(rejected_field(json!({"icon_size": [0, 20]})), "icon_size");
        assert_eq!(rejected_field(json!({"icon_size": [20]})), "icon_size");
        assert_eq!(rejected_field(json!({"icon_size": 20})), "icon_size");
    }

    #[test]
    fn colors_are_normalized_at_validation() {
        let config = config_with(json!({
            "bg_color": [0, 0, 0],
            "bar_color": "#336699",
            "blur_color": [0, 0, 0, 128],
            "tab_color": "rebeccapurple",
        }));
        assert_eq!(config.canvas.bg_color, Color::new(0.0, 0.0, 0.0, 1.0));
        assert_eq!(config.bar.color.to_rgb8().0, [0x33, 0x66, 0x99]);
        assert_eq!(config.shadow.color.to_rgba8().0, [0, 0, 0, 128]);

        assert_eq!(rejected_field(json!({"bg_color": [256, 0, 0]})), "bg_color");
        assert_eq!(rejected_field(json!({"tab_line_color": "blurple"})), "tab_line_color");
    }

    #[test]
    fn null_means_default() {
        let config = config_with(json!({"width": null, "language": null}));
        assert_eq!(config.canvas.width, 800);
        assert_eq!(config.code.language, None);
    }

    #[test]
    fn unknown_options_are_ignored() {
        assert!(try_config(json!({"theme": "retro"})).is_ok());
    }
}
