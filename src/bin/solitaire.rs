//! 纸牌游戏窗口 - winit 事件循环，softbuffer 呈现
//!
//! 键盘：Esc 退出，R 重开，P 暂停/继续，D 调试绘制，S 截图。

mod app_window;

use app_window::*;

use mini_solitaire::engine::{CanvasContext, Cursor, Game, GameSettings, ImageStore, PointerKind, Scene};
use mini_solitaire::solitaire::{SolitaireGame, SCENE_ID};
use mini_solitaire::text::TextRenderer;
use mini_solitaire::{Canvas, Size};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorIcon, Window, WindowAttributes, WindowId};

/// 约 60 帧
const FRAME_INTERVAL: Duration = Duration::from_millis(16);
const SCREENSHOT_PATH: &str = "solitaire.png";

struct SolitaireWindow {
    window: Option<Arc<Window>>,
    surface: Option<softbuffer::Surface<Arc<Window>, Arc<Window>>>,
    game: Game,
    /// 游戏区域大小的画布，呈现时再缩放
    canvas: Canvas,
    images: ImageStore,
    text: Option<TextRenderer>,
    mouse_pos: (f32, f32),
    cursor: Cursor,
    next_frame: Instant,
}

impl SolitaireWindow {
    fn new() -> Self {
        let config = load_config();
        let settings = GameSettings::from_config(&config);

        let text = match TextRenderer::load_system_font() {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::warn!(error = %e, "text rendering disabled");
                None
            }
        };
        let images = load_assets(&config.assets_dir, text.as_ref());

        let play_area = settings.play_area;
        let canvas = Canvas::new(play_area.width.max(1.0) as u32, play_area.height.max(1.0) as u32);
        let scenes: Vec<Box<dyn Scene>> = vec![Box::new(SolitaireGame::new(deck_source(&config)))];

        Self {
            window: None,
            surface: None,
            game: Game::new(settings, scenes, SCENE_ID),
            canvas,
            images,
            text,
            mouse_pos: (0.0, 0.0),
            cursor: Cursor::Auto,
            next_frame: Instant::now(),
        }
    }

    fn render(&mut self) {
        let mut ctx = CanvasContext::new(&mut self.canvas, &self.images, self.text.as_ref());
        // 暂停时保留上一帧
        self.game.frame(&mut ctx, Instant::now());
    }

    fn present(&mut self) {
        let (Some(window), Some(surface)) = (&self.window, &mut self.surface) else {
            return;
        };
        let size = window.inner_size();
        let (Some(width), Some(height)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height)) else {
            return;
        };
        if let Err(e) = surface.resize(width, height) {
            tracing::warn!(error = %e, "surface resize failed");
            return;
        }

        match surface.buffer_mut() {
            Ok(mut buffer) => {
                present_to_buffer(&mut buffer, size.width, size.height, &self.canvas, self.game.settings());
                if let Err(e) = buffer.present() {
                    tracing::warn!(error = %e, "present failed");
                }
            }
            Err(e) => tracing::warn!(error = %e, "no surface buffer"),
        }
    }

    fn pointer(&mut self, kind: PointerKind) {
        let (x, y) = self.mouse_pos;
        self.game.on_window_pointer(x, y, kind, Instant::now());
        self.sync_cursor();
    }

    fn sync_cursor(&mut self) {
        let cursor = self.game.cursor();
        if cursor == self.cursor {
            return;
        }
        self.cursor = cursor;
        if let Some(window) = &self.window {
            window.set_cursor(cursor_icon(cursor));
        }
    }

    fn viewport(window: &Window) -> Size {
        let size = window.inner_size();
        Size::new(size.width as f32, size.height as f32)
    }
}

fn cursor_icon(cursor: Cursor) -> CursorIcon {
    match cursor {
        Cursor::Auto => CursorIcon::Default,
        Cursor::Pointer => CursorIcon::Pointer,
        Cursor::Grab => CursorIcon::Grab,
        Cursor::Grabbing => CursorIcon::Grabbing,
    }
}

impl ApplicationHandler for SolitaireWindow {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let settings = self.game.settings();
        let window_attrs = WindowAttributes::default()
            .with_title(WINDOW_TITLE)
            .with_inner_size(winit::dpi::LogicalSize::new(settings.play_area.width, settings.play_area.height))
            .with_maximized(settings.maximized);

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                tracing::error!(error = %e, "failed to create window");
                event_loop.exit();
                return;
            }
        };

        let surface = softbuffer::Context::new(window.clone())
            .and_then(|context| softbuffer::Surface::new(&context, window.clone()));
        match surface {
            Ok(surface) => self.surface = Some(surface),
            Err(e) => {
                tracing::error!(error = %e, "failed to create surface");
                event_loop.exit();
                return;
            }
        }

        self.game.apply_viewport(Self::viewport(&window));
        self.window = Some(window);

        let now = Instant::now();
        self.game.start(now);
        self.next_frame = now;
        self.render();
        self.present();

        tracing::info!("ready");
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                self.game.stop();
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                let viewport = Size::new(size.width as f32, size.height as f32);
                self.game.request_resize(viewport, Instant::now());
                if let Some(w) = &self.window { w.request_redraw(); }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed || event.repeat {
                    return;
                }
                let now = Instant::now();
                match event.physical_key {
                    PhysicalKey::Code(KeyCode::Escape) => {
                        self.game.stop();
                        event_loop.exit();
                    }
                    PhysicalKey::Code(KeyCode::KeyR) => self.game.restart(now),
                    PhysicalKey::Code(KeyCode::KeyP) => self.game.pause(now),
                    PhysicalKey::Code(KeyCode::KeyD) => self.game.toggle_debug(),
                    PhysicalKey::Code(KeyCode::KeyS) => match self.canvas.save_png(SCREENSHOT_PATH) {
                        Ok(()) => tracing::info!(path = SCREENSHOT_PATH, "screenshot saved"),
                        Err(e) => tracing::warn!(error = %e, "screenshot failed"),
                    },
                    _ => {}
                }
                self.sync_cursor();
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.mouse_pos = (position.x as f32, position.y as f32);
                self.pointer(PointerKind::Move);
            }

            WindowEvent::MouseInput { state, button: MouseButton::Left, .. } => match state {
                ElementState::Pressed => self.pointer(PointerKind::Down),
                ElementState::Released => {
                    self.pointer(PointerKind::Up);
                    self.pointer(PointerKind::Click);
                }
            },

            WindowEvent::RedrawRequested => {
                self.render();
                self.present();
                self.sync_cursor();
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        if now >= self.next_frame {
            self.next_frame = now + FRAME_INTERVAL;
            if let Some(w) = &self.window { w.request_redraw(); }
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_frame));
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    tracing::info!("starting solitaire");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);
    let mut app = SolitaireWindow::new();
    event_loop.run_app(&mut app)?;
    Ok(())
}
