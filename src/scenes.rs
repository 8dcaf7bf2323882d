//! Scene generation functionality

use std::sync::Arc;

use glam::Vec3A;
use rand::Rng;

use crate::{
    camera::CameraSettings,
    hittables::{Hittable, HittableList, Sphere},
    material::Material,
};

/// Possible hard-coded scenes to choose from.
#[derive(Debug, Clone, Copy, clap::clap_derive::ValueEnum)]
pub enum SceneType {
    /// Test scene for materials development
    MaterialDev,
    /// Scene like the cover of "Ray Tracing in One Weekend".
    CoverPhoto,
}

/// Returns the [CameraSettings] and the list of objects for the chosen
/// scene.
///
/// The caller overrides the image dimensions and sample budget on the
/// returned settings; the scene only decides placement, field of view and
/// depth of field.
pub fn get_scene(
    image_width: u32,
    scene_type: SceneType,
    rng: &mut impl Rng,
) -> (CameraSettings, HittableList) {
    // Setup default camera properties
    let aspect_ratio = 16.0 / 9.0;
    let mut look_from = Vec3A::new(13.0, 2.0, 3.0);
    let mut look_at = Vec3A::ZERO;
    let view_up = Vec3A::Y;
    let mut vert_fov = 20.0;
    let mut defocus_angle = 0.0;
    let mut focus_dist = 10.0;

    // Grabs the scene and changes any cam params
    let scene = match scene_type {
        SceneType::MaterialDev => {
            look_from = Vec3A::ZERO;
            look_at = -Vec3A::Z;
            focus_dist = 1.0;
            vert_fov = 90.0;
            get_mat_dev_scene()
        }
        SceneType::CoverPhoto => {
            defocus_angle = 0.6;
            gen_random_scene(rng)
        }
    };

    let image_height = (image_width as f32 / aspect_ratio) as u32;

    let settings = CameraSettings {
        image_width,
        image_height,
        fov: vert_fov,
        look_from,
        look_at,
        view_up,
        defocus_angle,
        focus_distance: focus_dist,
        ..CameraSettings::default()
    };

    (settings, scene)
}

/// Returns a [HittableList] containing a few spheres with unique materials
fn get_mat_dev_scene() -> HittableList {
    //  Create ground sphere
    let ground_material = Arc::new(Material::Lambertian {
        albedo: Vec3A::new(0.8, 0.8, 0.0),
    });
    let ground_sph = Sphere::new(Vec3A::new(0.0, -100.5, -1.0), 100.0, &ground_material);

    let mat_left = Arc::new(Material::Dielectric { refract_index: 1.5 });
    let mat_right = Arc::new(Material::Metal {
        albedo: Vec3A::new(0.8, 0.6, 0.2),
        fuzz: 0.1,
    });
    let mat_center = Arc::new(Material::Lambertian {
        albedo: Vec3A::new(0.1, 0.2, 0.5),
    });

    let left_sph = Sphere::new(Vec3A::new(-1.0, 0.0, -1.0), 0.5, &mat_left);
    let right_sph = Sphere::new(Vec3A::new(1.0, 0.0, -1.0), 0.5, &mat_right);
    let center_sph = Sphere::new(Vec3A::new(0.0, 0.0, -1.0), 0.5, &mat_center);

    vec![
        ground_sph.wrap(),
        left_sph.wrap(),
        right_sph.wrap(),
        center_sph.wrap(),
    ]
}

/// Returns a [HittableList] containing randomly-generated spheres
fn gen_random_scene(rng: &mut impl Rng) -> HittableList {
    //  Create ground sphere
    let ground_material = Arc::new(Material::Lambertian {
        albedo: Vec3A::splat(0.5),
    });
    let mut world: HittableList =
        vec![Sphere::new(Vec3A::new(0.0, -1000.0, 0.0), 1000.0, &ground_material).wrap()];

    // The random generation part
    const ORIGIN: Vec3A = Vec3A::from_array([4.0, 0.2, 0.0]);
    for a in -11..11 {
        for b in -11..11 {
            let center = Vec3A::new(
                a as f32 + 0.9 * rng.gen::<f32>(),
                0.2,
                b as f32 + 0.9 * rng.gen::<f32>(),
            );

            if (center - ORIGIN).length() > 0.9 {
                let decide_mat = rng.gen::<f32>();
                // pick a material by "rarity"
                let mat = if (0.0..0.8).contains(&decide_mat) {
                    // diffuse
                    Arc::new(Material::Lambertian {
                        albedo: rng.gen::<Vec3A>() * rng.gen::<Vec3A>(),
                    })
                } else if (0.0..0.95).contains(&decide_mat) {
                    // metal
                    Arc::new(Material::Metal {
                        albedo: Vec3A::splat(0.5) + rng.gen::<Vec3A>() / 2.0,
                        fuzz: rng.gen_range(0.0..0.5),
                    })
                } else {
                    // glass
                    Arc::new(Material::Dielectric { refract_index: 1.5 })
                };

                world.push(Sphere::new(center, 0.2, &mat).wrap());
            }
        }
    }

    // The signature central spheres
    let mat_1 = Arc::new(Material::Dielectric { refract_index: 1.5 });
    let mat_2 = Arc::new(Material::Lambertian {
        albedo: Vec3A::new(0.4, 0.2, 0.1),
    });
    let mat_3 = Arc::new(Material::Metal {
        albedo: Vec3A::new(0.7, 0.6, 0.5),
        fuzz: 0.0,
    });

    world.push(Sphere::new(Vec3A::new(0.0, 1.0, 0.0), 1.0, &mat_1).wrap());
    world.push(Sphere::new(Vec3A::new(-4.0, 1.0, 0.0), 1.0, &mat_2).wrap());
    world.push(Sphere::new(Vec3A::new(4.0, 1.0, 0.0), 1.0, &mat_3).wrap());

    world
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::SmallRng, SeedableRng};

    #[test]
    fn cover_photo_has_feature_spheres() {
        let mut rng = SmallRng::seed_from_u64(0);
        let (settings, world) = get_scene(640, SceneType::CoverPhoto, &mut rng);
        // ground + feature spheres + a few hundred random ones
        assert!(world.len() > 100);
        assert_eq!(settings.image_width, 640);
        assert_eq!(settings.image_height, 360);
    }

    #[test]
    fn mat_dev_is_deterministic() {
        let mut rng = SmallRng::seed_from_u64(0);
        let (settings, world) = get_scene(400, SceneType::MaterialDev, &mut rng);
        assert_eq!(world.len(), 4);
        assert_eq!(settings.fov, 90.0);
    }
}
