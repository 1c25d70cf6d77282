//! Application main loop

use anyhow::Result;
use app_core::{
    AppConfig, Command, CommandId, Dispatch, FileSettingsStore, GalleryState, ListingOutcome,
    ListingRequest,
};
use app_fs::LocalGateway;
use app_ui::{
    components::{FileGrid, Header, ImageViewer, StatusBar, StatusInfo, Welcome},
    textures::{DecodeJob, Decoded},
    InputHandler, Renderer, TextureCache, Theme,
};
use crossbeam_channel::{Receiver, Sender};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

/// Results of background work, delivered back to the UI thread
enum Reply {
    Listing(ListingRequest, ListingOutcome),
    PickedRoot(Option<PathBuf>),
    Thumbnail(Decoded),
    FullImage(Decoded),
}

/// Main application state for the event loop
struct App {
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    egui_ctx: egui::Context,
    egui_state: Option<egui_winit::State>,

    // UI Components
    file_grid: FileGrid,
    image_viewer: ImageViewer,
    input_handler: InputHandler,
    theme: Theme,
    thumbnails: TextureCache,
    full_image: TextureCache,

    gallery: GalleryState,

    // Background work
    runtime: Runtime,
    reply_tx: Sender<Reply>,
    reply_rx: Receiver<Reply>,
    picking: bool,
    exit_requested: bool,
}

impl App {
    fn new(config: AppConfig) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("gallery-io")
            .enable_all()
            .build()?;
        let (reply_tx, reply_rx) = crossbeam_channel::unbounded();

        let settings = Arc::new(FileSettingsStore::open_default());
        tracing::info!("Settings stored in {:?}", settings.path());
        let gallery = GalleryState::new(Arc::new(LocalGateway), settings);

        let theme = Theme::by_name(&config.general.theme)
            .with_viewer_background(&config.viewer.background_color);

        let mut app = Self {
            window: None,
            renderer: None,
            egui_ctx: egui::Context::default(),
            egui_state: None,

            file_grid: FileGrid::new(config.grid.tile_size),
            image_viewer: ImageViewer::new(),
            input_handler: InputHandler::new(config.keybindings.clone()),
            theme,
            thumbnails: TextureCache::thumbnails(config.grid.thumbnails_per_frame),
            full_image: TextureCache::full_size(),

            gallery,

            runtime,
            reply_tx,
            reply_rx,
            picking: false,
            exit_requested: false,
        };

        if config.general.restore_last_root {
            if let Some(request) = app.gallery.restore() {
                app.spawn_listing(request);
            }
        }

        Ok(app)
    }

    fn init_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window_attrs = Window::default_attributes()
            .with_title("Photo Gallery")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 800));

        let window = Arc::new(event_loop.create_window(window_attrs)?);

        let renderer = pollster::block_on(Renderer::new(window.clone()))?;

        let egui_state = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            Some(renderer.device.limits().max_texture_dimension_2d as usize),
        );

        self.theme.apply(&self.egui_ctx);

        self.window = Some(window);
        self.renderer = Some(renderer);
        self.egui_state = Some(egui_state);

        Ok(())
    }

    /// Run a command and start whatever background work it asks for
    fn execute(&mut self, cmd: &Command) {
        match self.gallery.execute(cmd) {
            Dispatch::Idle => {}
            Dispatch::Load(request) => self.spawn_listing(request),
            Dispatch::PickRoot => self.spawn_pick(),
            Dispatch::Exit => self.exit_requested = true,
        }
    }

    fn spawn_listing(&self, request: ListingRequest) {
        tracing::debug!("Listing {} (generation {})", request.path, request.generation);

        let task = self.gallery.listing_task(request);
        let tx = self.reply_tx.clone();
        self.runtime.spawn(async move {
            let (request, outcome) = task.await;
            // The receiver only goes away on shutdown
            let _ = tx.send(Reply::Listing(request, outcome));
        });
    }

    fn spawn_pick(&mut self) {
        if self.picking {
            return;
        }
        self.picking = true;

        let task = self.gallery.pick_task();
        let tx = self.reply_tx.clone();
        self.runtime.spawn(async move {
            let picked = task.await;
            let _ = tx.send(Reply::PickedRoot(picked));
        });
    }

    fn spawn_decodes(&self, jobs: Vec<DecodeJob>, wrap: fn(Decoded) -> Reply) {
        for job in jobs {
            let tx = self.reply_tx.clone();
            self.runtime.spawn_blocking(move || {
                let _ = tx.send(wrap(job.run()));
            });
        }
    }

    /// Apply finished background work
    fn poll_replies(&mut self) {
        while let Ok(reply) = self.reply_rx.try_recv() {
            match reply {
                Reply::Listing(request, outcome) => {
                    if self.gallery.apply_listing(&request, outcome) {
                        let nav = self.gallery.navigation();
                        self.thumbnails.retain(nav.images().map(|e| e.path.as_str()));
                    }
                }
                Reply::PickedRoot(picked) => {
                    self.picking = false;
                    if let Some(request) = self.gallery.set_root(picked.as_deref()) {
                        self.spawn_listing(request);
                    }
                }
                Reply::Thumbnail(decoded) => {
                    self.thumbnails.finish(&self.egui_ctx, decoded);
                }
                Reply::FullImage(decoded) => {
                    self.full_image.finish(&self.egui_ctx, decoded);
                }
            }
            self.egui_ctx.request_repaint();
        }
    }

    fn render(&mut self) {
        let Some(window) = self.window.clone() else {
            return;
        };
        let Some(egui_state) = self.egui_state.as_mut() else {
            return;
        };

        let raw_input = egui_state.take_egui_input(&window);
        let ctx = self.egui_ctx.clone();
        let mut commands = Vec::new();
        let mut full_output = ctx.run(raw_input, |ctx| self.ui(ctx, &mut commands));

        if let Some(egui_state) = self.egui_state.as_mut() {
            let platform_output = std::mem::take(&mut full_output.platform_output);
            egui_state.handle_platform_output(&window, platform_output);
        }

        for cmd in &commands {
            self.execute(cmd);
        }

        let jobs = self.thumbnails.start_jobs();
        self.spawn_decodes(jobs, Reply::Thumbnail);
        let jobs = self.full_image.start_jobs();
        self.spawn_decodes(jobs, Reply::FullImage);

        if let Some(renderer) = self.renderer.as_mut() {
            if let Err(e) = renderer.paint(&ctx, full_output, self.theme.background) {
                tracing::error!("Render failed: {}", e);
            }
        }
    }

    fn ui(&mut self, ctx: &egui::Context, commands: &mut Vec<Command>) {
        if let Some(state) = self.gallery.viewer().state().cloned() {
            let image = &state.current_image;
            let slot = match image.display_source().and_then(app_core::resolve_display_source) {
                Some(file) => self.full_image.request(&image.path, &file),
                None => None,
            };

            if slot.is_some_and(|s| s.is_failed()) && !state.load_failed {
                commands.push(Command::new(CommandId::VIEW_LOAD_FAILED));
            }

            let nav = self.gallery.navigation();
            let total = nav.images().count();
            let position = nav
                .images()
                .position(|e| e.path == image.path)
                .map(|index| (index, total));
            let is_favorite = self.gallery.is_favorite(&image.path);

            let frame = egui::Frame::none().fill(self.theme.viewer_background).inner_margin(8.0);
            egui::CentralPanel::default().frame(frame).show(ctx, |ui| {
                let slot = self.full_image.get(&image.path);
                if let Some(cmd) =
                    self.image_viewer
                        .ui(ui, &state, slot, is_favorite, position, &self.theme)
                {
                    commands.push(cmd);
                }
            });

            self.full_image.retain([image.path.as_str()]);
            return;
        }

        let nav = self.gallery.navigation();

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            if let Some(cmd) = Header::ui(ui, nav, &self.theme) {
                commands.push(cmd);
            }
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            let info = StatusInfo::from_navigation(nav, self.gallery.favorites().len());
            StatusBar::ui(ui, &info, &self.theme);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let action = if nav.is_configured() {
                self.file_grid.ui(
                    ui,
                    nav.entries(),
                    &mut self.thumbnails,
                    self.gallery.favorites(),
                    &self.theme,
                )
            } else {
                Welcome::ui(ui, &self.theme)
            };
            if let Some(cmd) = action {
                commands.push(cmd);
            }
        });
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init_window(event_loop) {
                tracing::error!("Failed to initialize window: {}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // Mouse shortcuts run before egui, whose panels consume every click
        if let WindowEvent::MouseInput { button, state, .. } = &event {
            if let Some(cmd) = self.input_handler.handle_mouse_button(*button, *state) {
                self.execute(&cmd);
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
                return;
            }
        }

        // Then let egui handle the event
        if let (Some(egui_state), Some(window)) = (&mut self.egui_state, &self.window) {
            let response = egui_state.on_window_event(window, &event);
            if response.consumed {
                window.request_redraw();
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("Close requested");
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize((size.width, size.height));
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let Some(cmd) = self.input_handler.handle_key(&event) {
                    self.execute(&cmd);
                }
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                self.input_handler.update_modifiers(modifiers.state());
            }

            WindowEvent::RedrawRequested => {
                self.render();
            }

            _ => {}
        }

        if self.exit_requested {
            tracing::info!("Exit requested");
            event_loop.exit();
            return;
        }

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        self.poll_replies();

        if self.exit_requested {
            event_loop.exit();
            return;
        }

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

/// Run the application
pub fn run(config: AppConfig) -> Result<()> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config)?;
    let result = event_loop.run_app(&mut app);

    tracing::info!("Photo Gallery exiting");
    shutdown(app.runtime);
    result?;
    Ok(())
}

/// Stop background work without waiting for it; a listing stuck on a dead
/// mount must not hold up exit
fn shutdown(runtime: Runtime) {
    runtime.shutdown_background();
}
