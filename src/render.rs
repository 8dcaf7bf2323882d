//! Progressive render sessions: a dedicated worker thread drives a
//! [Camera] through its sample phases until the budget is reached or the
//! session is cancelled.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::thread::JoinHandle;

use crate::{
    camera::{Camera, CameraSettings},
    hittables::Hittable,
};

/// Cooperative cancellation flag shared between a controller and the
/// render worker it spawned.
///
/// The flag is checked at scanline granularity; setting it never aborts
/// work mid-scanline.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Release store pairs with the acquire load in
    /// [CancelToken::is_cancelled] so buffer writes before the request are
    /// visible to the worker observing it.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Owns the render worker for one camera/scene pairing.
///
/// Exposes the three commands of the control surface: start a session,
/// request a stop, and apply updated settings (which begins a fresh
/// phase-1 session).
pub struct RenderSession {
    camera: Arc<Camera>,
    world: Arc<dyn Hittable>,
    worker: Option<JoinHandle<()>>,
    token: CancelToken,
}

impl RenderSession {
    pub fn new(camera: Arc<Camera>, world: Arc<dyn Hittable>) -> Self {
        Self {
            camera,
            world,
            worker: None,
            token: CancelToken::new(),
        }
    }

    pub fn camera(&self) -> &Arc<Camera> {
        &self.camera
    }

    /// Starts a fresh session on a dedicated worker thread.
    ///
    /// Any previous worker is joined first so two workers never write the
    /// accumulation buffer concurrently. Session state is re-initialized,
    /// discarding uncommitted contributions a cancelled phase may have left
    /// in the accumulation buffer; the published image stays untouched
    /// until phase 1 completes.
    pub fn start(&mut self) {
        self.join_worker();
        self.camera.initialize(self.camera.settings(), false);

        self.token = CancelToken::new();
        let camera = Arc::clone(&self.camera);
        let world = Arc::clone(&self.world);
        let token = self.token.clone();

        log::debug!("render session: starting worker");
        let handle = std::thread::Builder::new()
            .name("render-worker".into())
            .spawn(move || {
                while !camera.done_rendering() && !token.is_cancelled() {
                    camera.initialize_phase();
                    camera.render(&token, world.as_ref());
                    log::trace!(
                        "phase {} done in {} ms",
                        camera.current_phase(),
                        camera.phase_render_time_ms()
                    );
                }
                log::debug!("render session: worker exiting");
            })
            .expect("failed to spawn render worker");
        self.worker = Some(handle);
    }

    /// Requests a cooperative stop of the running session.
    pub fn request_stop(&self) {
        self.token.cancel();
    }

    /// Stops the running session, applies the new settings and starts a
    /// fresh phase-1 session. Buffers are reallocated when the image
    /// dimensions changed.
    pub fn apply_settings(&mut self, settings: CameraSettings) {
        self.request_stop();
        self.join_worker();

        let old = self.camera.settings();
        let resize_image = old.image_width != settings.image_width
            || old.image_height != settings.image_height;
        self.camera.initialize(settings, resize_image);

        self.start();
    }

    /// Blocks until the current worker exits (budget reached or stop
    /// honored).
    pub fn wait(&mut self) {
        self.join_worker();
    }

    fn join_worker(&mut self) {
        if let Some(handle) = self.worker.take() {
            if handle.join().is_err() {
                log::error!("render worker panicked");
            }
        }
    }
}

impl Drop for RenderSession {
    fn drop(&mut self) {
        self.request_stop();
        self.join_worker();
    }
}
