//! Implementation of a 3-dimensional Ray.

use glam::Vec3A;
use rand::Rng;

use crate::{
    color::{colors, Color},
    hittables::Hittable,
    material::ScatterRecord,
};

/// A 3-dimensional Ray
///
/// The crucial parts of the Ray are its origin and direction;
/// these two members are the primary way to determine an intersection with a [`Hittable`]
#[derive(Debug, Clone, Copy, Default)]
pub struct Ray {
    pub origin: Vec3A,
    pub direction: Vec3A,
}

impl std::fmt::Display for Ray {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("({} -> {})", self.origin, self.direction))
    }
}

impl Ray {
    /// Creates a new Ray.
    pub fn new(origin: Vec3A, direction: Vec3A) -> Self {
        Self { origin, direction }
    }

    /// Returns a position in 3D space along the ray.
    ///
    /// Performs the following calculation: `position = origin + t * direction`
    pub fn at(&self, t: f32) -> Vec3A {
        self.origin + t * self.direction
    }

    /// Returns a [`Color`] value based on the accumulated light and color at the initial intersection point.
    ///
    /// Uses `bounce_depth` to limit the amount of recursion when gathering contributions.
    /// A miss shades as a vertical white-to-blue sky gradient.
    pub fn shade(
        &self,
        hittable: &(impl Hittable + ?Sized),
        bounce_depth: u16,
        rng: &mut impl Rng,
    ) -> Color {
        // Limit recursion depth
        if bounce_depth == 0 {
            return colors::BLACK;
        }

        // Check for a hit against the `hittable` parameter
        if let Some(hit_rec) = hittable.hit(self, 0.001, f32::INFINITY) {
            // A primitive without a material absorbs everything
            let Some(material) = &hit_rec.material else {
                return colors::BLACK;
            };

            match material.scatter(self, &hit_rec, rng) {
                // A successful ray scatter leads to more contributions.
                Some(ScatterRecord { ray, attenuation }) => {
                    attenuation * ray.shade(hittable, bounce_depth - 1, rng)
                }
                // Otherwise, the ray was absorbed
                None => colors::BLACK,
            }
        } else {
            // without a hit, functions like a miss shader
            let unit_direction = self.direction.normalize();
            let a = 0.5 * (unit_direction.y + 1.0);
            (1.0 - a) * colors::WHITE + a * colors::SKY_BLUE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::SmallRng, SeedableRng};

    #[test]
    fn no_distance() {
        let r = Ray::new(Vec3A::ZERO, Vec3A::Z);
        let result = r.at(0.0);
        assert_eq!(
            r.origin, result,
            "Ray starting at {} did not return {} when computing .at(0.0), position was {}",
            r.origin, r.origin, result
        )
    }

    #[test]
    fn depth_zero_is_black() {
        let world: crate::hittables::HittableList = Vec::new();
        let mut rng = SmallRng::seed_from_u64(0);
        let r = Ray::new(Vec3A::ZERO, Vec3A::Y);
        assert_eq!(r.shade(&world, 0, &mut rng), colors::BLACK);
    }

    #[test]
    fn miss_shades_sky_gradient() {
        let world: crate::hittables::HittableList = Vec::new();
        let mut rng = SmallRng::seed_from_u64(0);

        // straight up blends fully into blue, straight down fully into white
        let up = Ray::new(Vec3A::ZERO, Vec3A::Y);
        assert_eq!(up.shade(&world, 4, &mut rng), colors::SKY_BLUE);
        let down = Ray::new(Vec3A::ZERO, -Vec3A::Y);
        assert_eq!(down.shade(&world, 4, &mut rng), colors::WHITE);
    }
}
