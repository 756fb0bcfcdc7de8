//! The winit application loop.
//!
//! [`run`] opens a window, builds the wgpu [`Context`] and the [`Scene`] on
//! `resumed`, then updates and draws the scene on every redraw until the
//! window is closed. The scene is always dropped before the context.

use std::sync::Arc;

use instant::Instant;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::Window,
};

use crate::{config::SceneConfig, context::Context, scene::Scene};

pub(crate) struct AppState {
    // declared first so it is dropped first
    scene: Scene<Context>,
    ctx: Context,
    frames_rendered: u64,
}

impl AppState {
    fn new(
        async_runtime: &tokio::runtime::Runtime,
        window: Arc<Window>,
        config: &SceneConfig,
    ) -> anyhow::Result<Self> {
        let mut ctx = async_runtime.block_on(Context::new(window))?;
        let scene = Scene::new(&mut ctx, config)?;
        Ok(Self {
            scene,
            ctx,
            frames_rendered: 0,
        })
    }

    fn render(&mut self, config: &SceneConfig) -> Result<(), wgpu::SurfaceError> {
        let AppState { scene, ctx, .. } = &*self;
        ctx.render(config.clear_colour, |frame| scene.draw(frame))?;
        self.frames_rendered += 1;
        Ok(())
    }
}

pub struct App {
    async_runtime: tokio::runtime::Runtime,
    config: SceneConfig,
    state: Option<AppState>,
    last_time: Instant,
    // first fatal error, returned from `run` once the loop has exited
    error: Option<anyhow::Error>,
}

impl App {
    fn new(config: SceneConfig) -> anyhow::Result<Self> {
        let async_runtime = tokio::runtime::Runtime::new()?;
        Ok(Self {
            async_runtime,
            config,
            state: None,
            last_time: Instant::now(),
            error: None,
        })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{error:#}");
        self.state = None;
        self.error.get_or_insert(error);
        event_loop.exit();
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(state) = self.state.take() {
            log::info!("Shutting down after {} frames", state.frames_rendered);
        }
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        let window_attributes = Window::default_attributes().with_title(&self.config.window_title);
        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, e.into()),
        };

        match AppState::new(&self.async_runtime, window, &self.config) {
            Ok(state) => {
                state.ctx.window().request_redraw();
                self.state = Some(state);
                self.last_time = Instant::now();
            }
            Err(e) => self.fail(event_loop, e.context("cannot start the scene")),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),
            WindowEvent::Resized(size) => state.ctx.resize(size),
            WindowEvent::RedrawRequested => {
                let dt = self.last_time.elapsed();
                self.last_time = Instant::now();

                state.scene.update(&mut state.ctx, dt);
                match state.render(&self.config) {
                    Ok(_) => {}
                    // Reconfigure the surface if it's lost or outdated
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = state.ctx.window().inner_size();
                        state.ctx.resize(size);
                    }
                    Err(e) => {
                        log::error!("Unable to render {}", e);
                    }
                }

                if self
                    .config
                    .frame_limit
                    .is_some_and(|limit| state.frames_rendered >= limit)
                {
                    return self.shutdown(event_loop);
                }
                state.ctx.window().request_redraw();
            }
            _ => {}
        }
    }
}

/// Run the scene in a new window until it is closed.
///
/// Errors while creating the window, the GPU context or the scene (a missing
/// asset, for instance) end the loop and are returned.
pub fn run(config: SceneConfig) -> anyhow::Result<()> {
    if let Err(e) = env_logger::try_init() {
        println!("Warning: Could not initialize logger: {}", e);
    };

    #[cfg(all(feature = "integration-tests", target_os = "linux"))]
    let event_loop: EventLoop<()> = {
        use winit::platform::wayland::EventLoopBuilderExtWayland;

        EventLoop::builder().with_any_thread(true).build()?
    };

    #[cfg(all(feature = "integration-tests", target_os = "windows"))]
    let event_loop: EventLoop<()> = {
        use winit::platform::windows::EventLoopBuilderExtWindows;

        EventLoop::builder().with_any_thread(true).build()?
    };

    #[cfg(not(all(
        feature = "integration-tests",
        any(target_os = "linux", target_os = "windows")
    )))]
    let event_loop: EventLoop<()> = EventLoop::new()?;

    let mut app = App::new(config)?;
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
