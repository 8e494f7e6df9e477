//! Mini Solitaire - 软件渲染的 2D 画布游戏引擎 + 纸牌（Klondike）规则
//! 支持实体拖拽、碰撞检测、场景切换、移动动画

mod canvas;
mod color;
mod geometry;
mod paint;
mod path;
pub mod error;
pub mod text;

pub use canvas::{Canvas, ImageFit};
pub use color::Color;
pub use error::EngineError;
pub use geometry::{Point, Rect, Size};
pub use paint::{Paint, PaintStyle};
pub use path::Path;
pub use text::TextRenderer;

// 引擎：实体、碰撞、场景、主循环
pub mod engine;

// 纸牌游戏
pub mod solitaire;

// 单元测试
#[cfg(test)]
mod tests;
