//! 单元测试模块
//! 覆盖碰撞、实体、World、牌堆规则、发牌、游戏循环、配置与定时器

pub mod settings_tests;
pub mod stack_tests;
pub mod world_tests;

use crate::engine::RenderContext;
use crate::{Color, Paint, Point, Rect};

/// 记录下来的绘制操作
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Save,
    Restore,
    Alpha(f32),
    Clear(Color),
    Rect(Rect, Paint),
    RoundRect(Rect, f32, Paint),
    Line(Point, Point, Paint),
    Image(String, Rect),
    Text(String, f32, f32, f32),
}

/// 只记录不绘制的渲染上下文
#[derive(Debug, Default)]
pub struct RecordingContext {
    pub ops: Vec<DrawOp>,
}

impl RecordingContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn images_drawn(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Image(id, _) => Some(id.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text(text, ..) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl RenderContext for RecordingContext {
    fn save(&mut self) { self.ops.push(DrawOp::Save); }
    fn restore(&mut self) { self.ops.push(DrawOp::Restore); }
    fn set_alpha(&mut self, alpha: f32) { self.ops.push(DrawOp::Alpha(alpha)); }
    fn clear(&mut self, color: Color) { self.ops.push(DrawOp::Clear(color)); }

    fn draw_rect(&mut self, rect: Rect, paint: &Paint) {
        self.ops.push(DrawOp::Rect(rect, paint.clone()));
    }

    fn draw_round_rect(&mut self, rect: Rect, radius: f32, paint: &Paint) {
        self.ops.push(DrawOp::RoundRect(rect, radius, paint.clone()));
    }

    fn draw_line(&mut self, from: Point, to: Point, paint: &Paint) {
        self.ops.push(DrawOp::Line(from, to, paint.clone()));
    }

    /// 所有图片都视为存在
    fn draw_image(&mut self, id: &str, rect: Rect) -> bool {
        self.ops.push(DrawOp::Image(id.to_string(), rect));
        true
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, size: f32, _color: Color) {
        self.ops.push(DrawOp::Text(text.to_string(), x, y, size));
    }
}
