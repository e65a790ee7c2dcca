use super::*;

/// An RGBA color, `alpha` in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub alpha: Float,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const RED: Self = Self::rgb(220, 40, 40);
    pub const BLUE: Self = Self::rgb(40, 80, 220);
    pub const GREY: Self = Self::rgb(128, 128, 128);

    #[inline]
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, alpha: 1. }
    }

    #[inline]
    #[must_use]
    pub fn with_alpha(self, alpha: Float) -> Self {
        Self {
            alpha: alpha.clamp(0., 1.),
            ..self
        }
    }

    /// `rgb(r,g,b)`, without the alpha channel.
    #[must_use]
    pub fn to_css(&self) -> String {
        format!("rgb({},{},{})", self.r, self.g, self.b)
    }

    #[inline]
    #[must_use]
    pub fn is_opaque(&self) -> bool {
        self.alpha >= 1.
    }
}

/// How things are drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Style {
    /// `None` draws no outline.
    pub stroke: Option<Color>,
    /// `None` leaves shapes empty.
    pub fill: Option<Color>,
    pub stroke_width: Float,
}

impl Style {
    #[inline]
    #[must_use]
    pub fn stroked(color: Color, width: Float) -> Self {
        Self {
            stroke: Some(color),
            fill: None,
            stroke_width: width,
        }
    }

    #[inline]
    #[must_use]
    pub fn filled(color: Color) -> Self {
        Self {
            stroke: None,
            fill: Some(color),
            stroke_width: 0.,
        }
    }
}

impl Default for Style {
    fn default() -> Self {
        Self::stroked(Color::BLACK, 1.)
    }
}
