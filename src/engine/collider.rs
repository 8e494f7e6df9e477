//! 轴对齐碰撞盒

use crate::{Point, Rect, Size};

/// 碰撞盒 - 随实体移动，可单独启用/禁用
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxCollider {
    pub enabled: bool,
    pub rect: Rect,
}

impl BoxCollider {
    pub fn new(rect: Rect) -> Self {
        Self { enabled: true, rect }
    }

    pub fn disabled(rect: Rect) -> Self {
        Self { enabled: false, rect }
    }

    pub fn left(&self) -> f32 { self.rect.x }
    pub fn top(&self) -> f32 { self.rect.y }
    pub fn width(&self) -> f32 { self.rect.width }
    pub fn height(&self) -> f32 { self.rect.height }

    pub fn set_origin(&mut self, origin: Point) {
        self.rect.x = origin.x;
        self.rect.y = origin.y;
    }

    pub fn set_size(&mut self, size: Size) {
        self.rect.width = size.width;
        self.rect.height = size.height;
    }

    /// 角点包含检测：任一方的某个角落在另一方内部（含边界）即视为碰撞。
    ///
    /// 十字交叉但没有角点互相包含的两个盒子不算碰撞。
    /// `enabled` 由调用方检查。
    pub fn has_collided(&self, other: &BoxCollider) -> bool {
        other.rect.corners().iter().any(|c| self.rect.contains(c))
            || self.rect.corners().iter().any(|c| other.rect.contains(c))
    }
}
