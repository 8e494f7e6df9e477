//! 游戏主循环 - 场景管理、暂停/重启、防抖的视口调整

use super::input::{Cursor, PointerEvent, PointerKind};
use super::render::RenderContext;
use super::scene::{Scene, SceneRequest};
use super::settings::GameSettings;
use super::timer::{TimerId, Timers};
use crate::error::{EngineError, Result};
use crate::{Color, Paint, Point, Size};
use std::time::{Duration, Instant};

/// 视口变化后等待的静默时间
pub const RESIZE_DEBOUNCE: Duration = Duration::from_millis(250);

/// 调试网格间距
const GRID_SPACING: f32 = 25.0;

/// 游戏
pub struct Game {
    settings: GameSettings,
    scenes: Vec<Box<dyn Scene>>,
    active: String,
    running: bool,
    timers: Timers,
    resize_timer: Option<TimerId>,
    pending_viewport: Option<Size>,
}

impl Game {
    pub fn new(settings: GameSettings, scenes: Vec<Box<dyn Scene>>, active: impl Into<String>) -> Self {
        Self {
            settings,
            scenes,
            active: active.into(),
            running: false,
            timers: Timers::new(),
            resize_timer: None,
            pending_viewport: None,
        }
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn active_scene_id(&self) -> &str {
        &self.active
    }

    fn active_index(&self) -> Option<usize> {
        self.scenes.iter().position(|s| s.id() == self.active)
    }

    pub fn scene(&self) -> Option<&dyn Scene> {
        self.active_index().map(|i| self.scenes[i].as_ref())
    }

    pub fn cursor(&self) -> Cursor {
        self.scene().map(|s| s.cursor()).unwrap_or_default()
    }

    pub fn toggle_debug(&mut self) {
        self.settings.debug = !self.settings.debug;
        tracing::info!(debug = self.settings.debug, "debug overlay toggled");
    }

    /// 启动当前场景
    pub fn start(&mut self, now: Instant) {
        let Some(index) = self.active_index() else {
            tracing::warn!(scene = %self.active, "no scene to start");
            return;
        };
        self.running = true;
        self.scenes[index].start(&self.settings, now);
        tracing::info!(scene = %self.active, "scene started");
    }

    pub fn stop(&mut self) {
        self.running = false;
        if let Some(index) = self.active_index() {
            self.scenes[index].stop();
            tracing::info!(scene = %self.active, "scene stopped");
        }
    }

    /// 暂停/继续（切换）
    pub fn pause(&mut self, now: Instant) {
        self.running = !self.running;
        if let Some(index) = self.active_index() {
            self.scenes[index].pause(!self.running, now);
        }
        tracing::info!(paused = !self.running, "pause toggled");
    }

    /// 停止后重新开始（重新发牌）
    pub fn restart(&mut self, now: Instant) {
        self.stop();
        self.start(now);
    }

    /// 停止当前场景并启动指定场景
    pub fn change_scene(&mut self, id: &str, now: Instant) -> Result<()> {
        if !self.scenes.iter().any(|s| s.id() == id) {
            tracing::warn!(scene = %id, "unknown scene");
            return Err(EngineError::UnknownScene(id.to_string()));
        }
        self.stop();
        self.active = id.to_string();
        self.start(now);
        Ok(())
    }

    /// 游戏区域坐标的指针事件，暂停时忽略
    pub fn on_pointer(&mut self, event: PointerEvent, now: Instant) {
        if !self.running {
            return;
        }
        if let Some(index) = self.active_index() {
            self.scenes[index].on_pointer(event, now);
        }
    }

    /// 窗口像素坐标的指针事件
    pub fn on_window_pointer(&mut self, x: f32, y: f32, kind: PointerKind, now: Instant) {
        let Point { x, y } = self.settings.to_play_area(x, y);
        self.on_pointer(PointerEvent::new(x, y, kind), now);
    }

    /// 视口变化：取消上一次的等待，重新计时
    pub fn request_resize(&mut self, viewport: Size, now: Instant) {
        if let Some(id) = self.resize_timer.take() {
            self.timers.cancel(id);
        }
        self.pending_viewport = Some(viewport);
        self.resize_timer = Some(self.timers.once(now, RESIZE_DEBOUNCE));
    }

    /// 立即应用视口（启动时使用）
    pub fn apply_viewport(&mut self, viewport: Size) {
        match self.settings.reload(Some(viewport)) {
            Ok(()) => tracing::debug!(
                scale_x = self.settings.scale_x,
                scale_y = self.settings.scale_y,
                left = self.settings.left_offset,
                top = self.settings.top_offset,
                "viewport applied"
            ),
            Err(e) => tracing::warn!(error = %e, "keeping previous scale"),
        }
    }

    /// 一帧：处理定时器，绘制背景和调试网格，更新场景，处理场景请求
    ///
    /// 暂停时不绘制，返回 false。
    pub fn frame(&mut self, ctx: &mut dyn RenderContext, now: Instant) -> bool {
        for id in self.timers.poll(now) {
            if Some(id) == self.resize_timer {
                self.resize_timer = None;
                if let Some(viewport) = self.pending_viewport.take() {
                    self.apply_viewport(viewport);
                }
            }
        }

        if !self.running {
            return false;
        }

        ctx.save();
        ctx.clear(self.settings.background);
        if self.settings.debug {
            self.draw_grid(ctx);
        }

        let requests = match self.active_index() {
            Some(index) => {
                let scene = &mut self.scenes[index];
                scene.update(ctx, &self.settings, now);
                scene.take_requests()
            }
            None => Vec::new(),
        };
        ctx.restore();

        for request in requests {
            match request {
                SceneRequest::Pause => self.pause(now),
                SceneRequest::Restart => self.restart(now),
                SceneRequest::ChangeScene(id) => {
                    if let Err(e) = self.change_scene(&id, now) {
                        tracing::warn!(error = %e, "scene change request dropped");
                    }
                }
            }
        }
        true
    }

    fn draw_grid(&self, ctx: &mut dyn RenderContext) {
        let Size { width, height } = self.settings.play_area;
        ctx.save();
        ctx.set_alpha(0.2);

        let red = Paint::stroke(Color::RED, 1.0);
        let rows = (height / GRID_SPACING).ceil() as i32;
        for i in 1..rows {
            let y = i as f32 * GRID_SPACING;
            ctx.draw_line(Point::new(0.0, y), Point::new(width, y), &red);
        }

        let blue = Paint::stroke(Color::BLUE, 1.0);
        let cols = (width / GRID_SPACING).ceil() as i32;
        for j in 1..cols {
            let x = j as f32 * GRID_SPACING;
            ctx.draw_line(Point::new(x, 0.0), Point::new(x, height), &blue);
        }
        ctx.restore();
    }
}
