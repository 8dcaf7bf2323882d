//! Camera state and the progressive, phased render loop.
//!
//! A render session walks through sample "phases": phase 1 contributes a
//! single sample per pixel, every later phase doubles the accumulated total
//! (1 + 1 + 2 + 4 + ...). Each phase adds its samples into a float
//! accumulation buffer and, once complete, tone-maps the running average
//! into a byte buffer that a display thread can snapshot at any time.

use std::io;
use std::sync::{
    atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering},
    Mutex,
};
use std::time::Instant;

use glam::Vec3A;
use rand::{rngs::SmallRng, Rng, SeedableRng};
use rayon::prelude::*;

use crate::{
    color::transform_color,
    hittables::Hittable,
    ray::Ray,
    render::CancelToken,
    utils::random::rand_vec3_in_unit_disk,
};

/// Channels per pixel in the accumulation and display buffers.
pub const COLOR_COMPONENTS: usize = 3;

/// Full configuration of a render session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSettings {
    pub image_width: u32,
    pub image_height: u32,
    /// Total sample budget as a power of two: the session accumulates
    /// `2^samples_per_pixel_log2` samples per pixel.
    pub samples_per_pixel_log2: u32,
    pub max_depth: u16,
    /// Vertical field of view, in degrees
    pub fov: f32,
    pub look_from: Vec3A,
    pub look_at: Vec3A,
    pub view_up: Vec3A,
    /// Aperture angle of the defocus disk, in degrees; zero disables
    /// depth of field
    pub defocus_angle: f32,
    pub focus_distance: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            image_width: 640,
            image_height: 360,
            samples_per_pixel_log2: 5,
            max_depth: 8,
            fov: 20.0,
            look_from: Vec3A::new(13.0, 2.0, 3.0),
            look_at: Vec3A::ZERO,
            view_up: Vec3A::Y,
            defocus_angle: 0.6,
            focus_distance: 10.0,
        }
    }
}

/// Viewport basis derived from [CameraSettings]; recomputed on
/// initialization and copied by the render worker once per phase.
#[derive(Debug, Clone, Copy)]
struct Viewport {
    settings: CameraSettings,
    center: Vec3A,
    pixel_delta_u: Vec3A,
    pixel_delta_v: Vec3A,
    upper_left_pixel: Vec3A,
    defocus_disk_u: Vec3A,
    defocus_disk_v: Vec3A,
}

impl Viewport {
    fn new(settings: CameraSettings) -> Self {
        let center = settings.look_from;

        let theta = settings.fov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h * settings.focus_distance;
        let viewport_width =
            viewport_height * (settings.image_width as f32 / settings.image_height as f32);

        let w = (settings.look_from - settings.look_at).normalize();
        let u = settings.view_up.cross(w).normalize();
        let v = w.cross(u);

        let viewport_u = viewport_width * u;
        let viewport_v = viewport_height * -v;

        let pixel_delta_u = viewport_u / settings.image_width as f32;
        let pixel_delta_v = viewport_v / settings.image_height as f32;

        let viewport_upper_left =
            center - (settings.focus_distance * w) - viewport_u / 2.0 - viewport_v / 2.0;
        let upper_left_pixel = viewport_upper_left + 0.5 * (pixel_delta_u + pixel_delta_v);

        let defocus_radius =
            settings.focus_distance * (settings.defocus_angle / 2.0).to_radians().tan();
        let defocus_disk_u = u * defocus_radius;
        let defocus_disk_v = v * defocus_radius;

        Self {
            settings,
            center,
            pixel_delta_u,
            pixel_delta_v,
            upper_left_pixel,
            defocus_disk_u,
            defocus_disk_v,
        }
    }

    /// Returns a ray through pixel `(i, j)`, jittered within the pixel's
    /// footprint, originating on the defocus disk when one is configured.
    fn get_ray(&self, i: u32, j: u32, rng: &mut impl Rng) -> Ray {
        let offset_x: f32 = rng.gen::<f32>() - 0.5;
        let offset_y: f32 = rng.gen::<f32>() - 0.5;
        let pixel_sample = self.upper_left_pixel
            + (i as f32 + offset_x) * self.pixel_delta_u
            + (j as f32 + offset_y) * self.pixel_delta_v;

        let ray_origin = if self.settings.defocus_angle <= 0.0 {
            self.center
        } else {
            self.sample_defocus_disk(rng)
        };

        Ray::new(ray_origin, pixel_sample - ray_origin)
    }

    fn sample_defocus_disk(&self, rng: &mut impl Rng) -> Vec3A {
        let p = rand_vec3_in_unit_disk(rng);
        self.center + p.x * self.defocus_disk_u + p.y * self.defocus_disk_v
    }
}

/// A camera plus the state of its progressive render session.
///
/// Shared behind an [`Arc`](std::sync::Arc) between the render worker and
/// the controlling thread. The accumulation buffer is written only by the
/// active render worker; the display byte buffer is published at the end of
/// each completed phase and snapshotted by the controller via [Camera::copy_to].
pub struct Camera {
    viewport: Mutex<Viewport>,

    /// Per-pixel float accumulation, `width * height * 3` channels.
    /// Written by the single active render worker, never read by the
    /// controller.
    pixel_data: Mutex<Vec<f32>>,
    /// Tone-mapped display image, published per completed phase.
    image_data: Mutex<Vec<u8>>,

    is_rendering: AtomicBool,
    done_rendering: AtomicBool,

    current_phase: AtomicU32,
    last_phase: AtomicU32,
    phase_samples: AtomicU32,
    accumulated_samples: AtomicU32,
    scanlines_rendered: AtomicU32,

    phase_render_time: AtomicU64,
    global_render_time: AtomicU64,
}

impl Camera {
    /// Creates a camera ready to start phase 1 with the given settings.
    pub fn new(settings: CameraSettings) -> Self {
        let camera = Self {
            viewport: Mutex::new(Viewport::new(settings)),
            pixel_data: Mutex::new(Vec::new()),
            image_data: Mutex::new(Vec::new()),
            is_rendering: AtomicBool::new(false),
            done_rendering: AtomicBool::new(false),
            current_phase: AtomicU32::new(0),
            last_phase: AtomicU32::new(0),
            phase_samples: AtomicU32::new(0),
            accumulated_samples: AtomicU32::new(0),
            scanlines_rendered: AtomicU32::new(0),
            phase_render_time: AtomicU64::new(0),
            global_render_time: AtomicU64::new(0),
        };
        camera.initialize(settings, true);
        camera
    }

    /// Resets all session state for a fresh phase-1 render.
    ///
    /// The accumulation buffer is always reallocated. The display buffer is
    /// reallocated only when `resize_image` is set (i.e. the image
    /// dimensions changed); otherwise the previously published image stays
    /// available to [Camera::copy_to] until phase 1 republishes.
    pub fn initialize(&self, settings: CameraSettings, resize_image: bool) {
        let data_size =
            settings.image_width as usize * settings.image_height as usize * COLOR_COMPONENTS;
        *self.pixel_data.lock().unwrap() = vec![0.0; data_size];
        if resize_image {
            *self.image_data.lock().unwrap() = vec![0; data_size];
        }

        self.is_rendering.store(false, Ordering::Release);
        self.done_rendering.store(false, Ordering::Release);

        self.current_phase.store(0, Ordering::Relaxed);
        self.last_phase
            .store(settings.samples_per_pixel_log2 + 1, Ordering::Relaxed);
        self.phase_samples.store(0, Ordering::Relaxed);
        self.accumulated_samples.store(0, Ordering::Relaxed);
        self.scanlines_rendered.store(0, Ordering::Relaxed);

        self.phase_render_time.store(0, Ordering::Relaxed);
        self.global_render_time.store(0, Ordering::Relaxed);

        *self.viewport.lock().unwrap() = Viewport::new(settings);
    }

    /// Advances to the next phase, computing its sample count.
    ///
    /// Accumulated samples per pixel double with each phase:
    /// 1 + 1 + 2 + 4 + ...
    pub fn initialize_phase(&self) {
        self.is_rendering.store(true, Ordering::Release);

        let phase = self.current_phase.fetch_add(1, Ordering::Relaxed) + 1;
        let samples = if phase == 1 { 1 } else { 1 << (phase - 2) };
        self.phase_samples.store(samples, Ordering::Relaxed);
        self.accumulated_samples.fetch_add(samples, Ordering::Relaxed);

        self.scanlines_rendered.store(0, Ordering::Relaxed);
    }

    /// Renders the current phase of the scene into the accumulation buffer,
    /// publishing the display image if the phase completes without
    /// invalidation.
    ///
    /// Scanlines are distributed across the rayon worker pool; each worker
    /// writes only to scanlines it owns. Cancellation is cooperative at
    /// scanline granularity and ignored during phase 1 so a fresh session
    /// always publishes an image quickly.
    pub fn render(&self, token: &CancelToken, world: &dyn Hittable) {
        let phase_start = Instant::now();

        let viewport = *self.viewport.lock().unwrap();
        let CameraSettings {
            image_width,
            max_depth,
            ..
        } = viewport.settings;
        let phase = self.current_phase.load(Ordering::Relaxed);
        let samples = self.phase_samples.load(Ordering::Relaxed);

        {
            let mut pixel_data = self.pixel_data.lock().unwrap();
            pixel_data
                .par_chunks_mut(image_width as usize * COLOR_COMPONENTS)
                .enumerate()
                .for_each(|(j, scanline)| {
                    // Phase 1 always runs to completion, guaranteeing fast
                    // visual feedback after a settings change.
                    if token.is_cancelled() && phase > 1 {
                        return;
                    }

                    self.scanlines_rendered.fetch_add(1, Ordering::Relaxed);

                    // from_rng(...) gives Result, can assume it won't fail
                    let mut rng = SmallRng::from_rng(&mut rand::thread_rng()).unwrap();

                    for i in 0..image_width {
                        let mut color_v = Vec3A::ZERO;
                        for _ in 0..samples {
                            let ray = viewport.get_ray(i, j as u32, &mut rng);
                            color_v += ray.shade(world, max_depth, &mut rng);
                        }

                        let index = i as usize * COLOR_COMPONENTS;
                        scanline[index] += color_v.x;
                        scanline[index + 1] += color_v.y;
                        scanline[index + 2] += color_v.z;
                    }
                });
        }

        let invalidated = token.is_cancelled() && phase > 1;
        if !invalidated {
            self.store_image();
        }

        let elapsed_ms = phase_start.elapsed().as_millis() as u64;
        self.phase_render_time.store(elapsed_ms, Ordering::Relaxed);
        self.global_render_time
            .fetch_add(elapsed_ms, Ordering::Relaxed);

        if phase >= self.last_phase.load(Ordering::Relaxed) {
            self.done_rendering.store(true, Ordering::Release);
        }

        // Cleared last so a controller polling the flags never observes
        // a finished session before `done_rendering` is set.
        self.is_rendering.store(false, Ordering::Release);
    }

    /// Tone-maps the accumulated averages into the display byte buffer.
    fn store_image(&self) {
        let pixel_data = self.pixel_data.lock().unwrap();
        let mut image_data = self.image_data.lock().unwrap();

        let scale = (self.accumulated_samples.load(Ordering::Relaxed).max(1) as f32).recip();
        for (byte, &channel) in image_data.iter_mut().zip(pixel_data.iter()) {
            *byte = transform_color(channel * scale);
        }
    }

    /// Snapshots the published image into a caller-owned buffer of packed
    /// `0xRRGGBB` values, row-major, sized `width * height`.
    pub fn copy_to(&self, buffer: &mut [u32]) {
        let image_data = self.image_data.lock().unwrap();
        for (packed, rgb) in buffer
            .iter_mut()
            .zip(image_data.chunks_exact(COLOR_COMPONENTS))
        {
            *packed = (u32::from(rgb[0]) << 16) | (u32::from(rgb[1]) << 8) | u32::from(rgb[2]);
        }
    }

    /// Writes the published image as plain-text PPM (P3).
    pub fn write_ppm<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        let settings = self.settings();
        let image_data = self.image_data.lock().unwrap();

        writeln!(out, "P3")?;
        writeln!(out, "{} {}", settings.image_width, settings.image_height)?;
        writeln!(out, "255")?;
        for rgb in image_data.chunks_exact(COLOR_COMPONENTS) {
            writeln!(out, "{} {} {}", rgb[0], rgb[1], rgb[2])?;
        }

        Ok(())
    }

    /// Fraction of scanlines completed in the current phase, in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        let height = self.settings().image_height;
        (self.scanlines_rendered.load(Ordering::Relaxed) as f32 / height as f32).min(1.0)
    }

    pub fn settings(&self) -> CameraSettings {
        self.viewport.lock().unwrap().settings
    }

    pub fn is_rendering(&self) -> bool {
        self.is_rendering.load(Ordering::Acquire)
    }

    pub fn done_rendering(&self) -> bool {
        self.done_rendering.load(Ordering::Acquire)
    }

    pub fn current_phase(&self) -> u32 {
        self.current_phase.load(Ordering::Relaxed)
    }

    pub fn last_phase(&self) -> u32 {
        self.last_phase.load(Ordering::Relaxed)
    }

    pub fn phase_samples(&self) -> u32 {
        self.phase_samples.load(Ordering::Relaxed)
    }

    pub fn accumulated_samples(&self) -> u32 {
        self.accumulated_samples.load(Ordering::Relaxed)
    }

    /// Wall-clock duration of the last completed phase, in milliseconds.
    pub fn phase_render_time_ms(&self) -> u64 {
        self.phase_render_time.load(Ordering::Relaxed)
    }

    /// Cumulative wall-clock render time of the session, in milliseconds.
    pub fn global_render_time_ms(&self) -> u64 {
        self.global_render_time.load(Ordering::Relaxed)
    }
}
