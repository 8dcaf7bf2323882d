use std::{fs::File, io::BufWriter, sync::Arc, time::Duration};

use rand::SeedableRng;

use glint::{
    bvh::BvhNode, camera::Camera, cli, hittables::Hittable, render::RenderSession, scenes,
    utils::progress::get_progressbar,
};

fn main() {
    // Parsing cli args
    let cli_args = cli::parse_args();

    env_logger::Builder::new()
        .filter_level(cli_args.verbosity.log_level_filter())
        .init();

    // set up enviroment
    let mut rng = if let Some(seed) = cli_args.seed {
        // use user-provided seed if available
        rand::rngs::SmallRng::seed_from_u64(seed)
    } else if cfg!(debug_assertions) {
        // if debugging, use deterministic seed
        rand::rngs::SmallRng::seed_from_u64(0)
    } else {
        // otherwise real psuedo-randomness
        rand::rngs::SmallRng::from_entropy()
    };

    // Get scene
    let (mut settings, world) = scenes::get_scene(cli_args.image_width, cli_args.scene, &mut rng);
    settings.samples_per_pixel_log2 = cli_args.samples_per_pixel_log2();
    settings.max_depth = cli_args.bounce_depth;

    let world: Arc<dyn Hittable> = Arc::new(BvhNode::new(world, &mut rng));

    let camera = Arc::new(Camera::new(settings));
    let mut session = RenderSession::new(Arc::clone(&camera), world);

    let progress_bar = get_progressbar(settings.image_height as u64);
    session.start();

    // poll the worker's atomic state until the budget is reached
    while !camera.done_rendering() {
        progress_bar.set_prefix(format!(
            "Phase {}/{}",
            camera.current_phase(),
            camera.last_phase()
        ));
        progress_bar.set_position((camera.progress() * settings.image_height as f32) as u64);
        std::thread::sleep(Duration::from_millis(50));
    }
    session.wait();
    progress_bar.finish_and_clear();

    log::info!(
        "rendered {} phases ({} samples/pixel) in {} ms",
        camera.last_phase(),
        camera.accumulated_samples(),
        camera.global_render_time_ms()
    );

    // write image to file
    let result = if cli_args
        .output
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("ppm"))
    {
        File::create(&cli_args.output)
            .and_then(|file| camera.write_ppm(&mut BufWriter::new(file)))
    } else {
        save_image(&camera, &cli_args.output)
    };

    match result {
        Ok(()) => println!("Image written to {:?}", &cli_args.output),
        Err(why) => {
            eprintln!("Failed to write: {}", why);
        }
    }
}

/// Unpacks the camera's 0xRRGGBB snapshot into an [image::RgbImage] and
/// saves it at the given path.
fn save_image(camera: &Camera, path: &std::path::Path) -> std::io::Result<()> {
    let settings = camera.settings();
    let (width, height) = (settings.image_width, settings.image_height);

    let mut packed = vec![0u32; width as usize * height as usize];
    camera.copy_to(&mut packed);

    let bytes: Vec<u8> = packed
        .iter()
        .flat_map(|&pixel| {
            [
                ((pixel >> 16) & 0xFF) as u8,
                ((pixel >> 8) & 0xFF) as u8,
                (pixel & 0xFF) as u8,
            ]
        })
        .collect();

    let img_buf = image::RgbImage::from_raw(width, height, bytes)
        .expect("pixel buffer matches image dimensions");
    img_buf
        .save(path)
        .map_err(|why| std::io::Error::new(std::io::ErrorKind::Other, why))
}
