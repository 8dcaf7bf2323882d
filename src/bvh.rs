//! Bounding Volume Hierarchy

use std::{cmp::Ordering, fmt::Debug, sync::Arc};

use rand::Rng;

use crate::{
    bounds::BoundingBox,
    hittables::{HitRecord, Hittable, HittableList},
    ray::Ray,
    utils::match_opts::match_opts,
};

/// A node in the BVH.
///
/// Holds the bounding box that contains the two [Hittable] children
pub struct BvhNode {
    /// left portion of the subhierarchy
    left: Arc<dyn Hittable>,
    /// right portion of the subhierarchy
    right: Arc<dyn Hittable>,
    /// AABB of the current hierarchy
    bbox: BoundingBox,
}

/// Compares two bounding boxes by their minimum along the given axis
pub fn box_cmp(a: &BoundingBox, b: &BoundingBox, axis_idx: usize) -> Ordering {
    a.min[axis_idx]
        .partial_cmp(&b.min[axis_idx])
        .expect("boxes contained extreme FP values")
}

impl BvhNode {
    /// Creates a new BvhNode from the given list of primitives.
    ///
    /// # Panics
    ///
    /// Panics when given an empty list.
    pub fn new(mut hitlist: HittableList, rng: &mut impl Rng) -> Self {
        assert!(!hitlist.is_empty(), "Given empty scene!");

        let span = hitlist.len();

        let (left, right) = match span {
            // a lone primitive sits on both sides
            1 => (hitlist[0].clone(), hitlist[0].clone()),
            2 => (hitlist[0].clone(), hitlist[1].clone()),
            _ => {
                let axis_idx = rng.gen_range(0..3);

                hitlist.sort_by(|a, b| box_cmp(&a.bounding_box(), &b.bounding_box(), axis_idx));

                let (half0, half1) = hitlist.split_at_mut(span / 2);

                let left: Arc<dyn Hittable> = BvhNode::new(half0.to_owned(), rng).wrap();
                let right: Arc<dyn Hittable> = BvhNode::new(half1.to_owned(), rng).wrap();
                (left, right)
            }
        };

        let bbox = left.bounding_box().union(right.bounding_box());

        Self { left, right, bbox }
    }
}

impl Debug for BvhNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BvhNode {{{:?}}}", self.bbox)
    }
}

impl Hittable for BvhNode {
    fn hit(&self, ray: &Ray, t_min: f32, t_max: f32) -> Option<HitRecord> {
        if self.bbox.hit(ray, t_min, t_max) {
            let left_hit = self.left.hit(ray, t_min, t_max);

            // the right subtree only has to beat the left hit
            let t_max = match &left_hit {
                Some(rec) => rec.t,
                None => t_max,
            };

            let right_hit = self.right.hit(ray, t_min, t_max);
            match_opts(left_hit, right_hit, |a, b| if a.t < b.t { a } else { b })
        } else {
            None
        }
    }

    fn bounding_box(&self) -> BoundingBox {
        self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hittables::Sphere;
    use glam::Vec3A;
    use rand::{rngs::SmallRng, SeedableRng};

    fn random_spheres(count: usize, rng: &mut impl Rng) -> HittableList {
        (0..count)
            .map(|_| {
                let center = Vec3A::new(
                    rng.gen_range(-10.0..10.0),
                    rng.gen_range(-10.0..10.0),
                    rng.gen_range(-10.0..10.0),
                );
                Sphere::bare(center, rng.gen_range(0.1..1.5)).wrap()
            })
            .collect()
    }

    #[test]
    fn matches_linear_scan() {
        let mut rng = SmallRng::seed_from_u64(42);
        let world = random_spheres(64, &mut rng);
        let tree = BvhNode::new(world.clone(), &mut rng);

        for _ in 0..500 {
            let origin = Vec3A::new(
                rng.gen_range(-20.0..20.0),
                rng.gen_range(-20.0..20.0),
                rng.gen_range(-20.0..20.0),
            );
            let direction = Vec3A::new(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
            );
            let ray = Ray::new(origin, direction);

            let linear = world.hit(&ray, 0.001, f32::INFINITY);
            let hierarchical = tree.hit(&ray, 0.001, f32::INFINITY);

            match (&linear, &hierarchical) {
                (None, None) => {}
                (Some(a), Some(b)) => {
                    assert!(
                        (a.t - b.t).abs() < 1e-4,
                        "t mismatch for ray {ray}: {} vs {}",
                        a.t,
                        b.t
                    );
                }
                _ => panic!(
                    "hit disagreement for ray {ray}: linear {} vs bvh {}",
                    linear.is_some(),
                    hierarchical.is_some()
                ),
            }
        }
    }

    #[test]
    fn narrowed_range_respected() {
        let mut rng = SmallRng::seed_from_u64(9);
        let world = random_spheres(16, &mut rng);
        let tree = BvhNode::new(world.clone(), &mut rng);

        let ray = Ray::new(Vec3A::splat(-15.0), Vec3A::ONE);
        for t_max in [0.5, 5.0, 50.0] {
            let linear = world.hit(&ray, 0.001, t_max).map(|rec| rec.t);
            let hierarchical = tree.hit(&ray, 0.001, t_max).map(|rec| rec.t);
            match (linear, hierarchical) {
                (Some(a), Some(b)) => assert!((a - b).abs() < 1e-4),
                (a, b) => assert_eq!(a.is_some(), b.is_some()),
            }
        }
    }

    #[test]
    fn single_primitive_tree() {
        let mut rng = SmallRng::seed_from_u64(1);
        let world: HittableList = vec![Sphere::bare(Vec3A::new(0.0, 0.0, -3.0), 1.0).wrap()];
        let tree = BvhNode::new(world, &mut rng);

        let ray = Ray::new(Vec3A::ZERO, -Vec3A::Z);
        let hit = tree.hit(&ray, 0.001, f32::INFINITY).unwrap();
        assert!((hit.t - 2.0).abs() < 1e-5);
    }

    #[test]
    fn node_box_is_union_of_children() {
        let mut rng = SmallRng::seed_from_u64(5);
        let world = random_spheres(10, &mut rng);
        let list_box = world.bounding_box();
        let tree = BvhNode::new(world, &mut rng);
        let tree_box = tree.bounding_box();
        assert_eq!(tree_box.min, list_box.min);
        assert_eq!(tree_box.max, list_box.max);
    }
}
