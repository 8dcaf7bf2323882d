//! Implementation of material types

use glam::Vec3A;
use rand::Rng;

use crate::{
    color::{colors, Color},
    hittables::HitRecord,
    ray::Ray,
};

/// Returns a reflected ray direction based on the given normal
///
/// Performs the following computation: `v - 2 * v.dot(n) * n`
#[inline]
fn reflect(v: Vec3A, n: Vec3A) -> Vec3A {
    v - n * v.dot(n) * 2.0
}

/// Returns a refracted ray direction using the given normal
/// and the ratio between two refractive indices (Snell's law).
#[inline]
fn refract(uv: Vec3A, n: Vec3A, eta_ratio: f32) -> Vec3A {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_perp = eta_ratio * (uv + cos_theta * n);
    let r_para = (1.0 - r_perp.length_squared()).abs().sqrt() * -1.0 * n;
    r_perp + r_para
}

/// Enumeration of possible material types.
#[derive(Debug, Clone)]
pub enum Material {
    /// An approximation of a diffuse, or matte, material.
    Lambertian { albedo: Color },
    /// A metallic material that reflects rays, perturbed by the given fuzz.
    Metal { albedo: Color, fuzz: f32 },
    /// A glass material that scatters rays based on the given refractive index.
    Dielectric { refract_index: f32 },
}

/// Set of data returned on a [Material]'s scattering
#[derive(Debug)]
pub struct ScatterRecord {
    /// The resultant ray for subsequent intersections
    pub ray: Ray,
    /// The attenuation at the point of intersection
    pub attenuation: Color,
}

impl Material {
    /// Computes reflectance using Schlick's approximation
    fn reflectance(cosine: f32, refract_idx: f32) -> f32 {
        let r0 = (1.0 - refract_idx) / (1.0 + refract_idx);
        let r0_doubled = r0 * r0;
        r0_doubled + (1.0 - r0_doubled) * (1.0 - cosine).powi(5)
    }

    /// Returns a scattered ray and its attenuation based on the specific material type.
    ///
    /// Returns `None` if the material type computes a lack of scattering
    pub fn scatter(&self, ray: &Ray, rec: &HitRecord, rng: &mut impl Rng) -> Option<ScatterRecord> {
        // common calcs
        let normed_dir = ray.direction.normalize();
        let rand_unit_v = crate::utils::random::rand_vec3_on_unit_sphere(rng);
        match self {
            Material::Lambertian { albedo } => {
                let mut scatter_dir = rec.normal + rand_unit_v;

                // If the scatter direction is close to zero in all dimensions
                if scatter_dir.abs().cmplt(Vec3A::splat(1e-8)).all() {
                    scatter_dir = rec.normal;
                }

                Some(ScatterRecord {
                    ray: Ray::new(rec.point, scatter_dir),
                    attenuation: *albedo,
                })
            }
            Material::Metal { albedo, fuzz } => {
                let reflected = reflect(normed_dir, rec.normal).normalize();

                let scattered = Ray::new(
                    rec.point,
                    reflected + fuzz.clamp(0.0, 1.0) * rand_unit_v,
                );

                // a fuzzed direction below the surface is absorbed
                (scattered.direction.dot(rec.normal) > 0.0).then_some(ScatterRecord {
                    ray: scattered,
                    attenuation: *albedo,
                })
            }
            Material::Dielectric { refract_index } => {
                let refract_ratio = if rec.front_face {
                    1.0 / refract_index
                } else {
                    *refract_index
                };

                let cos_theta = (-normed_dir).dot(rec.normal).min(1.0);
                let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

                let no_refract = refract_ratio * sin_theta > 1.0;
                let reflect_chance = Self::reflectance(cos_theta, refract_ratio);
                let do_reflect = reflect_chance > rng.gen();
                let direction = if no_refract || do_reflect {
                    // must reflect
                    reflect(normed_dir, rec.normal)
                } else {
                    // can refract
                    refract(normed_dir, rec.normal, refract_ratio)
                };

                Some(ScatterRecord {
                    ray: Ray::new(rec.point, direction),
                    attenuation: colors::WHITE,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::SmallRng, SeedableRng};

    fn front_face_record() -> HitRecord {
        let ray = Ray::new(Vec3A::new(0.0, 1.0, 0.0), -Vec3A::Y);
        HitRecord::new(&ray, 1.0, Vec3A::ZERO, Vec3A::Y, None)
    }

    fn in_range(color: Color) -> bool {
        color.cmpge(Vec3A::ZERO).all() && color.cmple(Vec3A::ONE).all()
    }

    #[test]
    fn lambertian_attenuation_is_albedo() {
        let albedo = Vec3A::new(0.3, 0.6, 0.9);
        let mat = Material::Lambertian { albedo };
        let rec = front_face_record();
        let ray = Ray::new(Vec3A::new(0.0, 1.0, 0.0), -Vec3A::Y);
        let mut rng = SmallRng::seed_from_u64(3);

        for _ in 0..100 {
            let scatter = mat.scatter(&ray, &rec, &mut rng).unwrap();
            assert_eq!(scatter.attenuation, albedo);
            assert!(in_range(scatter.attenuation));
            // a lambertian bounce stays on the normal's side
            assert!(scatter.ray.direction.dot(rec.normal) > 0.0);
        }
    }

    #[test]
    fn metal_never_scatters_into_surface() {
        let mat = Material::Metal {
            albedo: Vec3A::splat(0.8),
            fuzz: 1.0,
        };
        // grazing incidence maximizes the chance of fuzzing below the surface
        let ray = Ray::new(Vec3A::new(-1.0, 0.01, 0.0), Vec3A::new(1.0, -0.01, 0.0));
        let rec = HitRecord::new(&ray, 1.0, Vec3A::ZERO, Vec3A::Y, None);
        let mut rng = SmallRng::seed_from_u64(11);

        let mut absorbed = 0;
        for _ in 0..200 {
            match mat.scatter(&ray, &rec, &mut rng) {
                Some(scatter) => {
                    assert!(scatter.ray.direction.dot(rec.normal) > 0.0);
                    assert!(in_range(scatter.attenuation));
                }
                None => absorbed += 1,
            }
        }
        assert!(absorbed > 0, "grazing fuzzed metal should absorb some rays");
    }

    #[test]
    fn dielectric_attenuates_nothing() {
        let mat = Material::Dielectric { refract_index: 1.5 };
        let rec = front_face_record();
        let ray = Ray::new(Vec3A::new(0.0, 1.0, 0.0), Vec3A::new(0.2, -1.0, 0.0));
        let mut rng = SmallRng::seed_from_u64(17);

        for _ in 0..100 {
            let scatter = mat.scatter(&ray, &rec, &mut rng).unwrap();
            assert_eq!(scatter.attenuation, colors::WHITE);
        }
    }

    #[test]
    fn dielectric_total_internal_reflection() {
        let mat = Material::Dielectric { refract_index: 1.5 };
        // back face hit (inside the glass) at a shallow angle
        let ray = Ray::new(Vec3A::new(0.0, -1.0, -0.1), Vec3A::new(0.0, 1.0, 0.1));
        let rec = HitRecord::new(&ray, 1.0, Vec3A::ZERO, Vec3A::Z, None);
        assert!(!rec.front_face);
        let mut rng = SmallRng::seed_from_u64(23);

        // sin(theta) * 1.5 > 1 here, so every sample must reflect back inside
        let incoming = ray.direction.normalize();
        let expected = reflect(incoming, rec.normal);
        for _ in 0..50 {
            let scatter = mat.scatter(&ray, &rec, &mut rng).unwrap();
            assert!((scatter.ray.direction - expected).length() < 1e-6);
        }
    }
}
