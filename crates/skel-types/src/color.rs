//! Display color.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// RGB color with 8-bit components, used for structure display.
///
/// # Example
///
/// ```
/// use skel_types::Color;
///
/// let teal = Color::new(0, 128, 128);
/// assert_eq!(teal.g, 128);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Color {
    /// Red component (0-255).
    pub r: u8,
    /// Green component (0-255).
    pub g: u8,
    /// Blue component (0-255).
    pub b: u8,
}

impl Color {
    /// Create a color from RGB components.
    #[inline]
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl Default for Color {
    /// Neutral gray.
    fn default() -> Self {
        Self::new(192, 192, 192)
    }
}
