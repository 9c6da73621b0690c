// SPDX-License-Identifier: MIT OR Apache-2.0
//! Main editor application setup and event loop.

use crate::commands::{rebuild_layer_box, CommandHandler, Refresh};
use crate::config::{EditorConfig, CONFIG_FILE_NAME};
use crate::dispatcher::Dispatcher;
use crate::panel_types::PanelType;
use crate::panels::console::TracingEvent;
use crate::panels::{ConsolePanel, PropertiesPanel};
use crate::state::EditorState;
use egui_dock::{DockArea, DockState, NodeIndex, Style, TabViewer};
use egui_wgpu::wgpu;
use scenery_editor_layers::LayerBox;
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

/// Editor application errors
#[derive(Debug, Error)]
pub enum EditorError {
    /// Window creation failed
    #[error("Failed to create window: {0}")]
    WindowCreation(#[from] winit::error::OsError),

    /// Renderer initialization failed
    #[error("Failed to initialize renderer: {0}")]
    RendererInit(String),

    /// Event loop error
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}

/// Result type for editor operations
pub type Result<T> = std::result::Result<T, EditorError>;

/// Tab viewer implementation for `egui_dock`
struct EditorTabViewer<'a> {
    state: &'a mut EditorState,
    layer_box: &'a mut LayerBox<Dispatcher>,
    properties: &'a mut PropertiesPanel,
    console: &'a mut ConsolePanel,
}

impl TabViewer for EditorTabViewer<'_> {
    type Tab = PanelType;

    fn title(&mut self, tab: &mut Self::Tab) -> egui::WidgetText {
        format!("{} {}", tab.icon(), tab.name()).into()
    }

    fn ui(&mut self, ui: &mut egui::Ui, tab: &mut Self::Tab) {
        match tab {
            PanelType::Layers => self.layer_box.ui(ui),
            PanelType::Properties => self.properties.ui(ui, self.state),
            PanelType::Console => self.console.ui(ui),
        }
    }

    fn closeable(&mut self, _tab: &mut Self::Tab) -> bool {
        false
    }
}

/// Graphics state for wgpu rendering
struct GraphicsState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    egui_renderer: egui_wgpu::Renderer,
}

impl GraphicsState {
    fn new(window: Arc<Window>) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .map_err(|e| EditorError::RendererInit(e.to_string()))?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::LowPower,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| EditorError::RendererInit("No suitable GPU adapter".to_string()))?;
        tracing::info!("Using GPU: {}", adapter.get_info().name);

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("Scenery Editor Device"),
                ..Default::default()
            },
            None,
        ))
        .map_err(|e| EditorError::RendererInit(e.to_string()))?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(wgpu::TextureFormat::is_srgb)
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| EditorError::RendererInit("Surface has no formats".to_string()))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            egui_renderer,
        })
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    fn render(
        &mut self,
        egui_ctx: &egui::Context,
        full_output: egui::FullOutput,
        window: &Window,
    ) -> std::result::Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Editor Encoder"),
        });

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: window.scale_factor() as f32,
        };
        let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer.update_texture(&self.device, &self.queue, *id, image_delta);
        }
        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );

        {
            let mut render_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Editor Render Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(wgpu::Color {
                                r: 0.1,
                                g: 0.1,
                                b: 0.1,
                                a: 1.0,
                            }),
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                })
                .forget_lifetime();
            self.egui_renderer.render(&mut render_pass, &paint_jobs, &screen_descriptor);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
        Ok(())
    }
}

/// When the next frame should be drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RepaintSchedule {
    /// As soon as the event loop is idle
    Now,
    /// At a deadline requested by an animation or tooltip
    At(Instant),
    /// Only on the next input event
    Idle,
}

/// Turn egui's requested repaint delay into a schedule
fn schedule_repaint(delay: Option<Duration>, now: Instant) -> RepaintSchedule {
    match delay {
        Some(delay) if delay.is_zero() => RepaintSchedule::Now,
        // egui reports `Duration::MAX` when nothing is pending
        Some(delay) => now.checked_add(delay).map_or(RepaintSchedule::Idle, RepaintSchedule::At),
        None => RepaintSchedule::Idle,
    }
}

/// Running state of the editor
struct EditorRunning {
    window: Arc<Window>,
    graphics: GraphicsState,
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    editor: EditorInner,
    repaint: RepaintSchedule,
}

/// Inner editor state and panels
struct EditorInner {
    state: EditorState,
    config: EditorConfig,
    dispatcher: Dispatcher,
    commands: CommandHandler,
    dock_state: DockState<PanelType>,
    layer_box: LayerBox<Dispatcher>,
    properties: PropertiesPanel,
    console: ConsolePanel,
    request_exit: bool,
}

impl EditorInner {
    fn new(config: EditorConfig, tracing_rx: Option<Receiver<TracingEvent>>) -> Self {
        let mut state = EditorState::new();
        if let Some(path) = config.startup_scene.clone() {
            if let Err(e) = state.load_scene(&path) {
                tracing::error!("Failed to open startup scene {:?}: {}", path, e);
            }
        }

        let dispatcher = Dispatcher::new();
        let mut editor = Self {
            commands: CommandHandler::new(config.new_layer_prefix.clone()),
            dock_state: Self::create_default_layout(config.side_panel_fraction),
            layer_box: LayerBox::new(dispatcher.clone()),
            properties: PropertiesPanel::new(dispatcher.clone()),
            console: ConsolePanel::with_tracing_receiver(tracing_rx),
            dispatcher,
            state,
            config,
            request_exit: false,
        };
        editor.refresh(Refresh::LAYERS.union(Refresh::PROPERTIES));
        editor
    }

    fn create_default_layout(side_fraction: f32) -> DockState<PanelType> {
        let mut dock_state = DockState::new(vec![PanelType::Console]);
        let surface = dock_state.main_surface_mut();

        let [_console, side] =
            surface.split_left(NodeIndex::root(), side_fraction, vec![PanelType::Layers]);
        let [_layers, _properties] = surface.split_below(side, 0.4, vec![PanelType::Properties]);

        dock_state
    }

    fn update(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| self.file_menu(ui));
        });

        let mut tab_viewer = EditorTabViewer {
            state: &mut self.state,
            layer_box: &mut self.layer_box,
            properties: &mut self.properties,
            console: &mut self.console,
        };
        DockArea::new(&mut self.dock_state)
            .style(Style::from_egui(ctx.style().as_ref()))
            .show(ctx, &mut tab_viewer);

        if self.process_notifications() {
            // Panels were rebuilt after they were drawn
            ctx.request_repaint();
        }
    }

    /// Apply everything the panels posted this frame.
    ///
    /// Returns whether anything was posted.
    fn process_notifications(&mut self) -> bool {
        if self.dispatcher.pending() == 0 {
            return false;
        }
        let mut refresh = Refresh::NONE;
        for notification in self.dispatcher.drain() {
            match self.commands.handle(&mut self.state, notification) {
                Ok(needed) => refresh = refresh.union(needed),
                Err(e) => {
                    tracing::warn!("Command rejected: {}", e);
                    // The panel may show a provisional swap or toggle; reset it.
                    refresh = refresh.union(Refresh::LAYERS);
                }
            }
        }
        self.refresh(refresh);
        true
    }

    fn refresh(&mut self, refresh: Refresh) {
        if refresh.layers {
            rebuild_layer_box(&mut self.layer_box, &self.state);
        }
        if refresh.properties {
            self.properties.refresh(&self.state);
        }
    }

    fn file_menu(&mut self, ui: &mut egui::Ui) {
        ui.menu_button("File", |ui| {
            if ui.button("New Scene").clicked() {
                self.state = EditorState::with_scene(crate::state::SceneData::new());
                self.refresh(Refresh::LAYERS.union(Refresh::PROPERTIES));
                ui.close_menu();
            }
            if ui.button("Save").clicked() {
                let path = self
                    .state
                    .scene_path
                    .clone()
                    .unwrap_or_else(|| self.config.default_scene_path.clone());
                if let Err(e) = self.state.save_scene_to_path(&path) {
                    tracing::error!("Failed to save scene: {}", e);
                }
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                if let Some(path) = self.state.scene_path.clone() {
                    if let Err(e) = self.state.load_scene(&path) {
                        tracing::error!("Failed to reload scene: {}", e);
                    }
                    self.refresh(Refresh::LAYERS.union(Refresh::PROPERTIES));
                }
                ui.close_menu();
            }
            ui.separator();
            if ui.button("Save Settings").clicked() {
                if let Err(e) = self.config.save(std::path::Path::new(CONFIG_FILE_NAME)) {
                    tracing::error!("Failed to save settings: {}", e);
                }
                ui.close_menu();
            }
            if ui.button("Quit").clicked() {
                self.request_exit = true;
                ui.close_menu();
            }
        });
        if self.state.dirty {
            ui.weak("(modified)");
        }
    }
}

/// Main editor application
pub struct EditorApp {
    running: Option<EditorRunning>,
    config: EditorConfig,
    /// Tracing receiver passed to the console panel on first resume.
    tracing_rx: Option<Receiver<TracingEvent>>,
}

impl EditorApp {
    /// Run the editor until the window closes
    pub fn run(config: EditorConfig, tracing_rx: Option<Receiver<TracingEvent>>) -> Result<()> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Wait);

        let mut app = Self {
            running: None,
            config,
            tracing_rx,
        };
        event_loop.run_app(&mut app)?;
        Ok(())
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<EditorRunning> {
        let (width, height) = self.config.window_size;
        let window_attrs = Window::default_attributes()
            .with_title(self.config.window_title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(width, height))
            .with_min_inner_size(winit::dpi::LogicalSize::new(640, 400));
        let window = Arc::new(event_loop.create_window(window_attrs)?);

        let graphics = GraphicsState::new(window.clone())?;
        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            &window,
            Some(window.scale_factor() as f32),
            None,
            Some(2 * 1024),
        );
        let editor = EditorInner::new(self.config.clone(), self.tracing_rx.take());

        Ok(EditorRunning {
            window,
            graphics,
            egui_ctx,
            egui_state,
            editor,
            repaint: RepaintSchedule::Now,
        })
    }
}

impl ApplicationHandler for EditorApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() {
            return;
        }

        match self.start(event_loop) {
            Ok(running) => {
                tracing::info!("Editor initialized, window size {:?}", running.window.inner_size());
                self.running = Some(running);
            }
            Err(e) => {
                tracing::error!("{}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(running) = &mut self.running else {
            return;
        };

        let response = running.egui_state.on_window_event(&running.window, &event);
        if response.repaint {
            running.window.request_redraw();
        }
        if response.consumed {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                if running.editor.state.dirty {
                    tracing::warn!("Closing with unsaved scene changes");
                }
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                running.graphics.resize(new_size);
                running.window.request_redraw();
            }
            WindowEvent::RedrawRequested => {
                let raw_input = running.egui_state.take_egui_input(&running.window);
                let full_output = running.egui_ctx.run(raw_input, |ctx| {
                    running.editor.update(ctx);
                });

                if running.editor.request_exit {
                    event_loop.exit();
                    return;
                }

                running
                    .egui_state
                    .handle_platform_output(&running.window, full_output.platform_output.clone());

                let delay = full_output
                    .viewport_output
                    .get(&egui::ViewportId::ROOT)
                    .map(|viewport| viewport.repaint_delay);
                running.repaint = schedule_repaint(delay, Instant::now());

                match running.graphics.render(&running.egui_ctx, full_output, &running.window) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = running.window.inner_size();
                        running.graphics.resize(size);
                        running.repaint = RepaintSchedule::Now;
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        tracing::error!("Out of GPU memory!");
                        event_loop.exit();
                    }
                    Err(wgpu::SurfaceError::Timeout) => {
                        tracing::warn!("Surface timeout");
                    }
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(running) = &mut self.running else {
            return;
        };

        match running.repaint {
            RepaintSchedule::At(deadline) if deadline > Instant::now() => {
                event_loop.set_control_flow(ControlFlow::WaitUntil(deadline));
            }
            RepaintSchedule::Now | RepaintSchedule::At(_) => {
                running.repaint = RepaintSchedule::Idle;
                running.window.request_redraw();
                event_loop.set_control_flow(ControlFlow::Wait);
            }
            RepaintSchedule::Idle => event_loop.set_control_flow(ControlFlow::Wait),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_delay_repaints_now() {
        let now = Instant::now();
        assert_eq!(schedule_repaint(Some(Duration::ZERO), now), RepaintSchedule::Now);
    }

    #[test]
    fn test_delay_sets_deadline() {
        let now = Instant::now();
        let delay = Duration::from_millis(250);
        assert_eq!(
            schedule_repaint(Some(delay), now),
            RepaintSchedule::At(now + delay)
        );
    }

    #[test]
    fn test_no_pending_repaint_waits_for_input() {
        let now = Instant::now();
        assert_eq!(schedule_repaint(Some(Duration::MAX), now), RepaintSchedule::Idle);
        assert_eq!(schedule_repaint(None, now), RepaintSchedule::Idle);
    }
}
