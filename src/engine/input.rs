//! 指针输入与光标

use crate::Point;

/// 指针事件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Move,
    Down,
    Up,
    Click,
}

/// 指针事件，坐标为游戏区域坐标
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub x: f32,
    pub y: f32,
    pub kind: PointerKind,
}

impl PointerEvent {
    pub fn new(x: f32, y: f32, kind: PointerKind) -> Self {
        Self { x, y, kind }
    }

    pub fn moved(x: f32, y: f32) -> Self { Self::new(x, y, PointerKind::Move) }
    pub fn down(x: f32, y: f32) -> Self { Self::new(x, y, PointerKind::Down) }
    pub fn up(x: f32, y: f32) -> Self { Self::new(x, y, PointerKind::Up) }
    pub fn click(x: f32, y: f32) -> Self { Self::new(x, y, PointerKind::Click) }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// 光标样式，由宿主映射为系统光标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Auto,
    Pointer,
    Grab,
    Grabbing,
}
