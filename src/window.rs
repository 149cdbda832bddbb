//! Interactive viewer: a winit window driving the engine.
//!
//! Controls: left mouse paints cells, space toggles play/pause, keys
//! 1-6 switch rules, `c` clears, `g` toggles grid lines, `e` exports a
//! PNG of the current state.

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, MouseButton, WindowEvent},
    event_loop::ActiveEventLoop,
    keyboard::{Key, NamedKey},
    window::{Window, WindowId},
};

use crate::engine::{Engine, EngineConfig, Phase};
use crate::error::EngineError;
use crate::gpu::GpuContext;
use crate::rules::Rule;

pub struct Viewer {
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    pub engine: Engine,
}

impl Viewer {
    pub async fn new(window: Arc<Window>, settings: EngineConfig) -> Result<Self, EngineError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .map_err(crate::error::GpuError::from)?;
        let gpu = GpuContext::for_surface(&instance, &surface).await?;

        let surface_caps = surface.get_capabilities(gpu.adapter());
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&gpu.device, &config);

        let engine = Engine::new(
            gpu,
            surface_format,
            settings.with_surface(size.width, size.height),
        )?;

        Ok(Self {
            surface,
            config,
            engine,
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(self.engine.device(), &self.config);
            if let Err(e) = self.engine.resize_surface(new_size.width, new_size.height) {
                log::warn!("resize failed: {}", e);
            }
        }
    }

    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        self.engine.render_frame(&view);
        output.present();
        Ok(())
    }
}

pub struct App {
    window: Option<Arc<Window>>,
    viewer: Option<Viewer>,
    settings: EngineConfig,
    mouse_pressed: bool,
}

impl App {
    pub fn new(settings: EngineConfig) -> Self {
        Self {
            window: None,
            viewer: None,
            settings,
            mouse_pressed: false,
        }
    }

    fn handle_key(&mut self, event: &KeyEvent, event_loop: &ActiveEventLoop) {
        if event.state != ElementState::Pressed {
            return;
        }
        let Some(viewer) = &mut self.viewer else {
            return;
        };
        match &event.logical_key {
            Key::Named(NamedKey::Space) => {
                if viewer.engine.phase() == Phase::Playing {
                    viewer.engine.stop();
                } else {
                    viewer.engine.start();
                }
            }
            Key::Named(NamedKey::Escape) => event_loop.exit(),
            Key::Character(c) => match c.as_str() {
                "c" => viewer.engine.clear(),
                "g" => {
                    let visible = viewer.engine.grid_visible();
                    viewer.engine.set_grid_visible(!visible);
                }
                "e" => {
                    if let Err(e) = viewer.engine.export_png(std::path::Path::new("automata.png")) {
                        log::error!("export failed: {}", e);
                    }
                }
                digit @ ("1" | "2" | "3" | "4" | "5" | "6") => {
                    let index = digit.parse::<usize>().unwrap_or(1) - 1;
                    viewer.engine.set_rule(Rule::ALL[index], true);
                }
                _ => {}
            },
            _ => {}
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            let window_attrs = Window::default_attributes()
                .with_title("Automata")
                .with_inner_size(winit::dpi::LogicalSize::new(
                    self.settings.surface_width,
                    self.settings.surface_height,
                ));

            let window = Arc::new(
                event_loop
                    .create_window(window_attrs)
                    .expect("failed to create window"),
            );
            self.window = Some(window.clone());
            match pollster::block_on(Viewer::new(window, self.settings.clone())) {
                Ok(viewer) => self.viewer = Some(viewer),
                Err(e) => {
                    log::error!("failed to initialize: {}", e);
                    event_loop.exit();
                }
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(viewer) = &mut self.viewer {
                    viewer.resize(physical_size);
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                self.handle_key(&event, event_loop);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if button == MouseButton::Left {
                    let Some(viewer) = &mut self.viewer else {
                        return;
                    };
                    match state {
                        ElementState::Pressed => {
                            self.mouse_pressed = true;
                            if viewer.engine.phase() == Phase::Idle {
                                viewer.engine.begin_drawing();
                            }
                        }
                        ElementState::Released => {
                            self.mouse_pressed = false;
                            if viewer.engine.phase() == Phase::Drawing {
                                viewer.engine.end_drawing();
                            }
                        }
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if self.mouse_pressed {
                    if let Some(viewer) = &mut self.viewer {
                        viewer.engine.paint_cell(position.x, position.y);
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                if let Some(viewer) = &mut self.viewer {
                    match viewer.render() {
                        Ok(_) => {}
                        Err(wgpu::SurfaceError::Lost) => viewer.resize(winit::dpi::PhysicalSize {
                            width: viewer.config.width,
                            height: viewer.config.height,
                        }),
                        Err(wgpu::SurfaceError::OutOfMemory) => event_loop.exit(),
                        Err(e) => log::error!("render error: {:?}", e),
                    }

                    let engine = &viewer.engine;
                    if let Some(window) = &self.window {
                        window.set_title(&format!(
                            "Automata - {} - step {} - {:.0} fps",
                            engine.rule().label(),
                            engine.current_step(),
                            engine.fps()
                        ));
                    }
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}
