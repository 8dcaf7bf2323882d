//! Intersections of rays with geometric primitives

use std::sync::Arc;

use glam::Vec3A;

use crate::{bounds::BoundingBox, material::Material, ray::Ray};

mod sphere;

pub use sphere::Sphere;

/// Data of a ray-primitive intersection.
#[derive(Debug, Clone)]
pub struct HitRecord {
    /// Distance along the ray where the intersection happened
    pub t: f32,
    /// Point of intersection
    pub point: Vec3A,
    /// Surface normal at the point, always opposing the ray direction
    pub normal: Vec3A,
    /// Whether the ray hit the outside of the surface
    pub front_face: bool,
    /// Material of the intersected primitive, if it has one
    pub material: Option<Arc<Material>>,
}

impl HitRecord {
    /// Creates a new HitRecord, flipping the outward normal against the ray
    /// direction if needed.
    pub fn new(
        ray: &Ray,
        t: f32,
        point: Vec3A,
        outward_normal: Vec3A,
        material: Option<Arc<Material>>,
    ) -> Self {
        let front_face = ray.direction.dot(outward_normal) < 0.0;
        let normal = if front_face {
            outward_normal
        } else {
            -outward_normal
        };

        Self {
            t,
            point,
            normal,
            front_face,
            material,
        }
    }
}

/// Anything a [Ray] can intersect, reporting a bounding box for hierarchy
/// construction.
pub trait Hittable: Send + Sync {
    /// Returns the nearest intersection in `(t_min, t_max)`, if any.
    fn hit(&self, ray: &Ray, t_min: f32, t_max: f32) -> Option<HitRecord>;

    /// Returns the axis aligned box enclosing this primitive.
    fn bounding_box(&self) -> BoundingBox;

    /// Wraps self in an [Arc], upcasting to `dyn Hittable`.
    fn wrap(self) -> Arc<dyn Hittable>
    where
        Self: Sized + 'static,
    {
        Arc::new(self)
    }
}

/// An unordered collection of hittables, intersected by linear scan.
pub type HittableList = Vec<Arc<dyn Hittable>>;

impl Hittable for HittableList {
    fn hit(&self, ray: &Ray, t_min: f32, t_max: f32) -> Option<HitRecord> {
        let mut closest_so_far = t_max;
        let mut closest_hit = None;

        // narrow t_max to the closest hit found so far; a later object must
        // beat it strictly
        for object in self {
            if let Some(hit_rec) = object.hit(ray, t_min, closest_so_far) {
                closest_so_far = hit_rec.t;
                closest_hit = Some(hit_rec);
            }
        }

        closest_hit
    }

    fn bounding_box(&self) -> BoundingBox {
        self.iter()
            .map(|object| object.bounding_box())
            .fold(BoundingBox::default(), |acc, bbox| acc.union(bbox))
    }
}
