//! Color constants and pixel output

pub use glam::Vec3A as Color;

pub mod colors {
    pub const WHITE: super::Color = super::Color::ONE;
    pub const BLACK: super::Color = super::Color::ZERO;
    pub const SKY_BLUE: super::Color = super::Color::from_array([0.5, 0.7, 1.0]);
}

/// Gamma-corrects a linear channel value with a square-root transform.
///
/// Negative inputs map to zero.
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Converts a linear channel value to a display byte.
///
/// Applies gamma correction, clamps to `[0, 0.999]` and scales by 256.
#[inline]
pub fn transform_color(linear: f32) -> u8 {
    (256.0 * linear_to_gamma(linear).clamp(0.0, 0.999)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_range() {
        assert_eq!(transform_color(0.0), 0);
        assert_eq!(transform_color(-1.0), 0);
        assert_eq!(transform_color(1.0), 255);
        assert_eq!(transform_color(100.0), 255);
    }

    #[test]
    fn gamma_is_sqrt() {
        assert_eq!(transform_color(0.25), (256.0 * 0.5) as u8);
    }
}
