//! A sphere primitive

use std::sync::Arc;

use glam::Vec3A;

use crate::{
    bounds::BoundingBox,
    hittables::{HitRecord, Hittable},
    material::Material,
    ray::Ray,
};

/// A sphere defined by a center point and a radius.
#[derive(Debug, Clone)]
pub struct Sphere {
    center: Vec3A,
    radius: f32,
    material: Option<Arc<Material>>,
}

impl Sphere {
    /// Creates a new Sphere with the given material.
    pub fn new(center: Vec3A, radius: f32, material: &Arc<Material>) -> Self {
        Self {
            center,
            radius,
            material: Some(Arc::clone(material)),
        }
    }

    /// Creates a new Sphere without a material; it absorbs every ray that
    /// hits it.
    pub fn bare(center: Vec3A, radius: f32) -> Self {
        Self {
            center,
            radius,
            material: None,
        }
    }
}

impl Hittable for Sphere {
    fn hit(&self, ray: &Ray, t_min: f32, t_max: f32) -> Option<HitRecord> {
        let origin_to_center = self.center - ray.origin;
        let a = ray.direction.length_squared();
        let h = ray.direction.dot(origin_to_center);
        let c = origin_to_center.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }
        let discriminant_sqrt = discriminant.sqrt();

        // prefer the near root, fall back to the far one
        let mut root = (h - discriminant_sqrt) / a;
        if root <= t_min || root >= t_max {
            root = (h + discriminant_sqrt) / a;
            if root <= t_min || root >= t_max {
                return None;
            }
        }

        let point = ray.at(root);
        let outward_normal = (point - self.center) / self.radius;
        Some(HitRecord::new(
            ray,
            root,
            point,
            outward_normal,
            self.material.clone(),
        ))
    }

    fn bounding_box(&self) -> BoundingBox {
        let half_extent = Vec3A::splat(self.radius);
        BoundingBox::new(self.center - half_extent, self.center + half_extent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_through_center() {
        let sphere = Sphere::bare(Vec3A::ZERO, 2.0);
        let ray = Ray::new(Vec3A::new(0.0, 0.0, 5.0), -Vec3A::Z);

        let hit = sphere.hit(&ray, 0.001, f32::INFINITY).unwrap();
        // distance to the surface along the center line
        assert!((hit.t - 3.0).abs() < 1e-5);
        assert!(hit.front_face);
        assert_eq!(hit.normal, Vec3A::Z);
    }

    #[test]
    fn miss_with_perpendicular_offset() {
        let sphere = Sphere::bare(Vec3A::ZERO, 2.0);
        let ray = Ray::new(Vec3A::new(2.5, 0.0, 5.0), -Vec3A::Z);
        assert!(sphere.hit(&ray, 0.001, f32::INFINITY).is_none());
    }

    #[test]
    fn inside_hit_flips_normal() {
        let sphere = Sphere::bare(Vec3A::ZERO, 2.0);
        let ray = Ray::new(Vec3A::ZERO, Vec3A::Z);

        let hit = sphere.hit(&ray, 0.001, f32::INFINITY).unwrap();
        assert!((hit.t - 2.0).abs() < 1e-5);
        assert!(!hit.front_face);
        // flipped to oppose the ray
        assert_eq!(hit.normal, -Vec3A::Z);
    }

    #[test]
    fn far_root_out_of_range() {
        let sphere = Sphere::bare(Vec3A::ZERO, 2.0);
        let ray = Ray::new(Vec3A::new(0.0, 0.0, 5.0), -Vec3A::Z);
        // both roots (t=3, t=7) outside (0, 2.5)
        assert!(sphere.hit(&ray, 0.001, 2.5).is_none());
    }

    #[test]
    fn bounding_box_spans_radius() {
        let sphere = Sphere::bare(Vec3A::new(1.0, 2.0, 3.0), 0.5);
        let bbox = sphere.bounding_box();
        assert_eq!(bbox.min, Vec3A::new(0.5, 1.5, 2.5));
        assert_eq!(bbox.max, Vec3A::new(1.5, 2.5, 3.5));
    }
}
