//! Depth tinting for the water surface.
//!
//! Water that sits close to (or under) the seabed fades toward a pale foam
//! tone; deep water takes the palette of the active [`ColorStyle`].

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Highest value of a 5-bit channel.
pub const CHANNEL_MAX: i32 = 31;

/// Below this scaled height difference the water blends toward foam.
const SHALLOW_THRESHOLD: i32 = 20;
/// Steepness of the water-over-sand difference.
const DEPTH_SCALE: f32 = 200.0;
/// Brightness gained per unit of water height.
const INTENSITY_SCALE: f32 = 11.0;
/// Foam tone for the red and green channels (and blue in clear style).
const FOAM_TONE: i32 = 20;

/// Water palette.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorStyle {
    /// Transparent water; brighter where the surface is higher.
    #[default]
    Clear,
    /// Murky tinted water; darker where the surface is higher.
    Opaque,
}

impl ColorStyle {
    pub fn toggled(self) -> Self {
        match self {
            ColorStyle::Clear => ColorStyle::Opaque,
            ColorStyle::Opaque => ColorStyle::Clear,
        }
    }

    /// Surface opacity used by the renderer, on the 0-31 polygon alpha scale.
    pub fn alpha(self) -> u8 {
        match self {
            ColorStyle::Clear => 15,
            ColorStyle::Opaque => 25,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ColorStyle::Clear => "Clear",
            ColorStyle::Opaque => "Opaque",
        }
    }
}

/// RGB packed at 5 bits per channel, red in the low bits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PackedColor(pub u16);

impl PackedColor {
    /// Packs three channels, clamping each to 0..=31.
    pub fn new(r: i32, g: i32, b: i32) -> Self {
        let r = r.clamp(0, CHANNEL_MAX) as u16;
        let g = g.clamp(0, CHANNEL_MAX) as u16;
        let b = b.clamp(0, CHANNEL_MAX) as u16;
        Self(r | (g << 5) | (b << 10))
    }

    pub fn r(self) -> u8 {
        (self.0 & 0x1f) as u8
    }

    pub fn g(self) -> u8 {
        ((self.0 >> 5) & 0x1f) as u8
    }

    pub fn b(self) -> u8 {
        ((self.0 >> 10) & 0x1f) as u8
    }

    pub fn channels(self) -> [u8; 3] {
        [self.r(), self.g(), self.b()]
    }

    /// Linear RGBA vertex color with the given 0-31 alpha.
    pub fn to_linear(self, alpha: u8) -> LinearRgba {
        let scale = CHANNEL_MAX as f32;
        LinearRgba::new(
            self.r() as f32 / scale,
            self.g() as f32 / scale,
            self.b() as f32 / scale,
            alpha.min(CHANNEL_MAX as u8) as f32 / scale,
        )
    }
}

/// Scaled water-over-sand difference; positive when the surface is well above the seabed.
pub fn height_difference(water: f32, sand: f32) -> i32 {
    ((water * 2.0 - sand) * DEPTH_SCALE) as i32
}

/// Palette offset driven by the water height.
pub fn color_intensity(water: f32) -> i32 {
    (water * INTENSITY_SCALE) as i32
}

fn deep_tone(style: ColorStyle, intensity: i32) -> [i32; 3] {
    match style {
        ColorStyle::Clear => [intensity, intensity, 7 + intensity],
        ColorStyle::Opaque => [5 - intensity / 2, 11 - intensity, 31 - intensity],
    }
}

fn foam_tone(style: ColorStyle) -> [i32; 3] {
    match style {
        ColorStyle::Clear => [FOAM_TONE, FOAM_TONE, FOAM_TONE],
        ColorStyle::Opaque => [FOAM_TONE, FOAM_TONE, CHANNEL_MAX],
    }
}

fn lerp_channel(a: i32, b: i32, f: f32) -> i32 {
    (a as f32 * (1.0 - f) + b as f32 * f) as i32
}

/// Shades one vertex from its water and sand heights (both on the [-1, 1] scale).
pub fn shade(water: f32, sand: f32, style: ColorStyle) -> PackedColor {
    let diff = height_difference(water, sand);
    let deep = deep_tone(style, color_intensity(water));

    if diff > SHALLOW_THRESHOLD {
        return PackedColor::new(deep[0], deep[1], deep[2]);
    }

    let ratio = diff.max(0) as f32 / SHALLOW_THRESHOLD as f32;
    let foam = foam_tone(style);
    PackedColor::new(
        lerp_channel(foam[0], deep[0], ratio),
        lerp_channel(foam[1], deep[1], ratio),
        lerp_channel(foam[2], deep[2], ratio),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deep_clear_scenario() {
        // (1.0 - 0.5) * 200 = 100 > 20 -> deep branch, intensity 5.
        assert_eq!(height_difference(0.5, 0.5), 100);
        assert_eq!(shade(0.5, 0.5, ColorStyle::Clear).channels(), [5, 5, 12]);
    }

    #[test]
    fn test_deep_opaque_palette() {
        // intensity 5 -> (5 - 2, 11 - 5, 31 - 5)
        assert_eq!(shade(0.5, 0.5, ColorStyle::Opaque).channels(), [3, 6, 26]);
    }

    #[test]
    fn test_water_under_sand_is_foam() {
        let color = shade(0.0, 0.8, ColorStyle::Clear);
        assert_eq!(color.channels(), [20, 20, 20]);

        let color = shade(0.0, 0.8, ColorStyle::Opaque);
        assert_eq!(color.channels(), [20, 20, 31]);
    }

    #[test]
    fn test_shallow_blend_is_between_tones() {
        // diff = (0.4 - 0.35) * 200 = 10 -> halfway between foam and deep.
        let water = 0.2;
        let diff = height_difference(water, 0.35);
        assert!(diff > 0 && diff <= SHALLOW_THRESHOLD);
        let color = shade(water, 0.35, ColorStyle::Clear);
        // deep tone is (2, 2, 9)
        assert!(color.r() > 2 && color.r() < 20);
        assert!(color.b() > 9 && color.b() < 20);
    }

    #[test]
    fn test_intensity_is_monotonic() {
        let mut last = i32::MIN;
        for step in -100..=100 {
            let intensity = color_intensity(step as f32 / 100.0);
            assert!(intensity >= last);
            last = intensity;
        }
    }

    #[test]
    fn test_deep_branch_ignores_sand() {
        let water = 0.7;
        let a = shade(water, -0.9, ColorStyle::Clear);
        let b = shade(water, 0.2, ColorStyle::Clear);
        assert!(height_difference(water, 0.2) >= SHALLOW_THRESHOLD);
        assert_eq!(a, b);
    }

    #[test]
    fn test_extreme_heights_are_clamped() {
        let color = shade(5.0, -1.0, ColorStyle::Clear);
        assert_eq!(color.channels(), [31, 31, 31]);

        let color = shade(5.0, -1.0, ColorStyle::Opaque);
        assert_eq!(color.channels(), [0, 0, 0]);
    }

    #[test]
    fn test_packing_layout() {
        let color = PackedColor::new(1, 2, 3);
        assert_eq!(color.0, 1 | (2 << 5) | (3 << 10));
        assert_eq!(color.to_linear(31).alpha, 1.0);
    }

    #[test]
    fn test_style_toggle() {
        assert_eq!(ColorStyle::Clear.toggled(), ColorStyle::Opaque);
        assert_eq!(ColorStyle::Opaque.toggled().toggled(), ColorStyle::Opaque);
    }
}
