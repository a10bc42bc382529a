//! Pixel geometry of the fixed bar + tab + code layout.
//!
//! Everything here is a pure function of the validated [`RenderConfig`] and
//! the measured extents of the label and icons. Positions are signed because
//! an oversized label font can push the label (and the icons aligned with it)
//! above the canvas; the compositor clips.

use crate::config::RenderConfig;

/// A point in canvas pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PointPx {
    pub x: i32,
    pub y: i32,
}

impl PointPx {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A 2D size in pixel units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SizePx {
    pub width: u32,
    pub height: u32,
}

impl SizePx {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// A rectangle defined in pixel coordinates, spanning `x..x + width` and
/// `y..y + height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RectPx {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl RectPx {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Creates a rectangle starting at origin (0, 0) with the given dimensions.
    pub fn from_size(size: SizePx) -> Self {
        Self::new(0, 0, size.width, size.height)
    }

    /// Returns the right edge coordinate (x + width).
    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    /// Returns the bottom edge coordinate (y + height).
    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    pub fn origin(&self) -> PointPx {
        PointPx::new(self.x, self.y)
    }
}

/// Measured extents the layout depends on.
#[derive(Debug, Clone, Copy)]
pub struct Measurements {
    /// Extent of the tab label in the tab font.
    pub label: SizePx,
    pub close_icon: SizePx,
    pub language_icon: SizePx,
}

/// Computed positions of every element of the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub canvas: SizePx,
    pub bar: RectPx,
    /// Area filled before blurring; identical to the bar.
    pub shadow: RectPx,
    pub tab: RectPx,
    pub label: RectPx,
    /// Band covered by the tab underline when it is enabled.
    pub underline: RectPx,
    pub close_icon: PointPx,
    pub language_icon: PointPx,
    pub code_origin: PointPx,
}

impl Geometry {
    /// Lays out the image.
    ///
    /// The tab is exactly as wide as its content: label, both icons, a
    /// spacing gap on each side of the label, and the margins. Labels are
    /// never wrapped or truncated.
    ///
    /// The language icon is raised by half of the label's vertical offset
    /// instead of sharing the label's top edge like the close icon does.
    /// This asymmetric placement is part of the look.
    ///
    /// The code block starts `2 * blur_radius` below the bar even when the
    /// drop-shadow is disabled, reserving the shadow's footprint.
    pub fn compute(config: &RenderConfig, measured: &Measurements) -> Self {
        let canvas = SizePx::new(config.canvas.width, config.canvas.height);
        let bar = RectPx::new(0, 0, canvas.width, config.bar.height);
        let spacing = config.tab.spacing as i32;
        let label = measured.label;

        let tab = RectPx::new(
            0,
            0,
            label.width
                + measured.close_icon.width
                + measured.language_icon.width
                + config.tab.spacing * 2
                + config.tab.margins,
            bar.height,
        );

        let text_x = (tab.width as i32 - label.width as i32).div_euclid(2);
        let text_y = (tab.height as i32 - label.height as i32).div_euclid(2);

        let close_icon = PointPx::new(text_x + label.width as i32 + spacing, text_y);
        let language_icon = PointPx::new(
            text_x - measured.language_icon.width as i32 - spacing,
            text_y - text_y.div_euclid(2),
        );

        let line_width = config.tab.line_width;
        let underline = RectPx::new(
            0,
            tab.bottom() - (line_width / 2) as i32,
            tab.width,
            line_width,
        );

        let code_origin = PointPx::new(0, (config.bar.height + config.shadow.radius * 2) as i32);

        Self {
            canvas,
            bar,
            shadow: bar,
            tab,
            label: RectPx::new(text_x, text_y, label.width, label.height),
            underline,
            close_icon,
            language_icon,
            code_origin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::config_with;
    use serde_json::json;

    fn measure(label: (u32, u32), icon: u32) -> Measurements {
        Measurements {
            label: SizePx::new(label.0, label.1),
            close_icon: SizePx::new(icon, icon),
            language_icon: SizePx::new(icon, icon),
        }
    }

    #[test]
    fn rect_px_edges() {
        let rect = RectPx::new(-10, 20, 100, 200);
        assert_eq!(rect.right(), 90);
        assert_eq!(rect.bottom(), 220);
        assert_eq!(rect.origin(), PointPx::new(-10, 20));
    }

    #[test]
    fn default_layout() {
        let config = config_with(json!({}));
        let geometry = Geometry::compute(&config, &measure((70, 16), 25));

        assert_eq!(geometry.bar, RectPx::new(0, 0, 800, 40));
        assert_eq!(geometry.shadow, geometry.bar);
        // 70 + 25 + 25 + 2 * 10 + 20
        assert_eq!(geometry.tab, RectPx::new(0, 0, 160, 40));
        assert_eq!(geometry.label, RectPx::new(45, 12, 70, 16));
        assert_eq!(geometry.close_icon, PointPx::new(125, 12));
        assert_eq!(geometry.language_icon, PointPx::new(10, 6));
        assert_eq!(geometry.code_origin, PointPx::new(0, 60));
    }

    #[test]
    fn code_offset_ignores_shadow_toggle() {
        let shown = config_with(json!({"show_blur": true, "blur_radius": 4}));
        let hidden = config_with(json!({"show_blur": false, "blur_radius": 4}));
        let m = measure((50, 10), 20);
        assert_eq!(
            Geometry::compute(&shown, &m).code_origin,
            Geometry::compute(&hidden, &m).code_origin
        );
        assert_eq!(Geometry::compute(&shown, &m).code_origin.y, 48);
    }

    #[test]
    fn oversized_label_widens_tab_past_canvas() {
        let config = config_with(json!({"width": 400}));
        let geometry = Geometry::compute(&config, &measure((500, 16), 25));
        assert!(geometry.tab.width > geometry.canvas.width);
        assert_eq!(geometry.tab.width, 590);
    }

    #[test]
    fn tall_label_floors_negative_offsets() {
        let config = config_with(json!({"bar_height": 10}));
        let geometry = Geometry::compute(&config, &measure((40, 15), 8));
        // (10 - 15) floored is -3; the language icon is raised by -3 // 2 = -2.
        assert_eq!(geometry.label.y, -3);
        assert_eq!(geometry.close_icon.y, -3);
        assert_eq!(geometry.language_icon.y, -1);
    }

    #[test]
    fn underline_straddles_tab_bottom() {
        let config = config_with(json!({"tab_line_width": 4}));
        let geometry = Geometry::compute(&config, &measure((60, 16), 25));
        assert_eq!(geometry.underline, RectPx::new(0, 38, geometry.tab.width, 4));
    }
}
