//! 实体 - 位置、尺寸、可见性、拖拽与移动动画

use super::collider::BoxCollider;
use super::input::{Cursor, PointerEvent, PointerKind};
use crate::{Point, Rect, Size};

/// 实体在 World 中的索引
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub(crate) usize);

impl EntityId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// 实体事件，由 World 派发给 [`EntityHooks`](super::EntityHooks)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EntityEvent {
    Enter,
    Leave,
    Click(PointerEvent),
    DragStart,
    Drag(PointerEvent),
    /// 拖拽中的新位置（已限制在游戏区域内）
    Dragging(Point),
    DragStop,
    Drop(PointerEvent),
    /// 移动动画中的当前位置
    Moving(Point),
    Moved,
    CollisionEnter(EntityId),
    CollisionLeave(EntityId),
    CursorChange(Cursor),
}

/// 移动动画目标
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    pub target: Point,
    pub speed: f32,
}

/// 实体
///
/// `data` 承载具体游戏对象（牌、牌堆、按钮……），引擎本身不关心它。
#[derive(Debug, Clone)]
pub struct Entity<D> {
    pub name: String,
    frame: Rect,
    pub visible: bool,
    pub clickable: bool,
    pub draggable: bool,
    collider: Option<BoxCollider>,
    pub(crate) group: Option<EntityId>,
    pub(crate) children: Vec<EntityId>,
    drag_offset: Point,
    dragging: bool,
    mouse_in_area: bool,
    motion: Option<Motion>,
    pub data: D,
}

impl<D> Entity<D> {
    pub fn new(name: impl Into<String>, frame: Rect, data: D) -> Self {
        Self {
            name: name.into(),
            frame,
            visible: true,
            clickable: false,
            draggable: false,
            collider: None,
            group: None,
            children: Vec::new(),
            drag_offset: Point::default(),
            dragging: false,
            mouse_in_area: false,
            motion: None,
            data,
        }
    }

    /// 附加一个与实体外框一致的碰撞盒
    pub fn with_collider(mut self, enabled: bool) -> Self {
        self.collider = Some(BoxCollider { enabled, rect: self.frame });
        self
    }

    pub fn with_clickable(mut self, clickable: bool) -> Self {
        self.clickable = clickable;
        self
    }

    pub fn with_draggable(mut self, draggable: bool) -> Self {
        self.draggable = draggable;
        self
    }

    pub fn frame(&self) -> Rect { self.frame }
    pub fn position(&self) -> Point { self.frame.origin() }
    pub fn size(&self) -> Size { self.frame.size() }
    pub fn left(&self) -> f32 { self.frame.x }
    pub fn top(&self) -> f32 { self.frame.y }
    pub fn width(&self) -> f32 { self.frame.width }
    pub fn height(&self) -> f32 { self.frame.height }

    /// 设置位置，碰撞盒同步移动
    pub fn set_position(&mut self, x: f32, y: f32) {
        self.frame.x = x;
        self.frame.y = y;
        if let Some(collider) = &mut self.collider {
            collider.set_origin(Point::new(x, y));
        }
    }

    /// 设置尺寸，碰撞盒同步缩放
    pub fn set_size(&mut self, width: f32, height: f32) {
        self.frame.width = width;
        self.frame.height = height;
        if let Some(collider) = &mut self.collider {
            collider.set_size(Size::new(width, height));
        }
    }

    pub fn collider(&self) -> Option<&BoxCollider> {
        self.collider.as_ref()
    }

    pub fn collider_mut(&mut self) -> Option<&mut BoxCollider> {
        self.collider.as_mut()
    }

    pub fn set_collider_enabled(&mut self, enabled: bool) {
        if let Some(collider) = &mut self.collider {
            collider.enabled = enabled;
        }
    }

    pub fn group(&self) -> Option<EntityId> { self.group }
    pub fn children(&self) -> &[EntityId] { &self.children }

    pub fn is_dragging(&self) -> bool { self.dragging }
    pub fn is_moving(&self) -> bool { self.motion.is_some() }
    pub fn mouse_in_area(&self) -> bool { self.mouse_in_area }
    pub fn motion(&self) -> Option<Motion> { self.motion }

    /// 开始向目标位置移动，每次更新前进 `speed`
    pub fn move_to(&mut self, target: Point, speed: f32) {
        self.motion = Some(Motion { target, speed });
    }

    pub fn cancel_motion(&mut self) {
        self.motion = None;
    }

    /// 清除拖拽、悬停和动画状态
    pub fn reset_transient(&mut self) {
        self.dragging = false;
        self.mouse_in_area = false;
        self.drag_offset = Point::default();
        self.motion = None;
    }

    /// 推进一步移动动画
    ///
    /// 距离较大的轴按 `speed` 前进，另一轴按比例前进；
    /// 两轴都进入一步之内时吸附到目标并产生 `Moved`，否则产生 `Moving`。
    pub fn step_motion(&mut self, out: &mut Vec<EntityEvent>) {
        let Some(Motion { target, speed }) = self.motion else {
            return;
        };

        let dx = (target.x - self.frame.x).abs();
        let dy = (target.y - self.frame.y).abs();

        let (speed_x, speed_y) = if dx > dy {
            (speed, speed * dy / dx)
        } else if dy > 0.0 {
            (speed * dx / dy, speed)
        } else {
            (speed, speed)
        };

        let (x, at_x) = if dx > speed_x {
            let dir = if self.frame.x < target.x { 1.0 } else { -1.0 };
            (self.frame.x + speed_x * dir, false)
        } else {
            (target.x, true)
        };

        let (y, at_y) = if dy > speed_y {
            let dir = if self.frame.y < target.y { 1.0 } else { -1.0 };
            (self.frame.y + speed_y * dir, false)
        } else {
            (target.y, true)
        };

        self.set_position(x, y);

        if at_x && at_y {
            self.cancel_motion();
            out.push(EntityEvent::Moved);
        } else {
            out.push(EntityEvent::Moving(Point::new(x, y)));
        }
    }

    /// 处理一次指针事件，产生的实体事件按顺序写入 `out`
    pub fn on_mouse(&mut self, event: &PointerEvent, play_area: Size, out: &mut Vec<EntityEvent>) {
        if event.kind == PointerKind::Up && self.dragging {
            self.dragging = false;
            out.push(EntityEvent::DragStop);
            out.push(EntityEvent::Drop(*event));
        }

        if self.dragging {
            out.push(EntityEvent::CursorChange(Cursor::Grabbing));

            let max_x = (play_area.width - self.frame.width).max(0.0);
            let max_y = (play_area.height - self.frame.height).max(0.0);
            let x = (event.x - self.drag_offset.x).clamp(0.0, max_x);
            let y = (event.y - self.drag_offset.y).clamp(0.0, max_y);
            self.set_position(x, y);

            out.push(EntityEvent::Dragging(Point::new(x, y)));
        }

        if self.visible {
            if self.clickable {
                out.push(EntityEvent::CursorChange(Cursor::Pointer));
            }

            if self.draggable && !self.dragging {
                out.push(EntityEvent::CursorChange(Cursor::Grab));

                if event.kind == PointerKind::Down {
                    out.push(EntityEvent::CursorChange(Cursor::Grabbing));
                    self.drag_offset = Point::new(event.x - self.frame.x, event.y - self.frame.y);
                    self.dragging = true;
                    self.cancel_motion();
                    out.push(EntityEvent::DragStart);
                    out.push(EntityEvent::Drag(*event));
                }
            }

            if self.clickable && event.kind == PointerKind::Down {
                out.push(EntityEvent::Click(PointerEvent::new(event.x, event.y, PointerKind::Click)));
            }

            self.mouse_in_area = true;
        } else if self.mouse_in_area {
            self.mouse_in_area = false;
            out.push(EntityEvent::CursorChange(Cursor::Auto));
        }
    }
}
