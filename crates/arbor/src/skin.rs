//! Skins resolve the default render style for a subtree and paint the
//! adornments the canvas owns: focus rings and resource placeholders.

use geom::Rect;

use crate::render::{Color, Render};

/// The color set a skin resolves for widgets and adornments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkinColors {
    /// Default widget background.
    pub background: Color,
    /// Default widget border.
    pub border: Color,
    /// Keyboard focus indicator.
    pub focus: Color,
    /// Stand-in fill for nodes whose resources failed to load.
    pub placeholder: Color,
}

impl Default for SkinColors {
    fn default() -> Self {
        Self {
            background: Color::rgb(240, 240, 240),
            border: Color::rgb(80, 80, 80),
            focus: Color::BLACK,
            placeholder: Color::rgb(255, 0, 255),
        }
    }
}

/// Visual defaults for a subtree.
///
/// Nodes without an explicit override inherit the nearest ancestor's skin;
/// the canvas holds the default. All drawing goes through the node-local
/// coordinates of the [`Render`] wrapper.
pub trait Skin: Send + Sync {
    /// The skin's color set.
    fn colors(&self) -> SkinColors;

    /// Paint a widget's default background.
    fn draw_background(&self, r: &mut Render<'_>, bounds: Rect) {
        let colors = self.colors();
        r.fill(colors.background, bounds);
        r.outline(colors.border, bounds);
    }

    /// Paint the keyboard focus indicator.
    fn draw_focus_ring(&self, r: &mut Render<'_>, bounds: Rect) {
        r.outline(self.colors().focus, bounds);
    }

    /// Paint the stand-in visual for a node whose resources failed.
    fn draw_placeholder(&self, r: &mut Render<'_>, bounds: Rect) {
        let colors = self.colors();
        r.fill(colors.placeholder, bounds);
        r.outline(colors.border, bounds);
    }
}

/// Flat-color reference skin.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleSkin;

impl Skin for SimpleSkin {
    fn colors(&self) -> SkinColors {
        SkinColors::default()
    }
}
