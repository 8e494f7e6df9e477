//! World - 实体仓库、逐帧更新、碰撞差分与指针路由

use super::entity::{Entity, EntityEvent, EntityId};
use super::input::{Cursor, PointerEvent};
use super::render::RenderContext;
use crate::{Point, Size};
use std::collections::HashMap;
use std::ops::{Index, IndexMut};

/// 实体钩子：绘制与事件处理
///
/// World 在事件发生时同步调用 `on_event`，钩子可以在其中任意修改 World。
pub trait EntityHooks<D> {
    fn draw(&mut self, _world: &World<D>, _id: EntityId, _ctx: &mut dyn RenderContext) {}
    fn on_event(&mut self, _world: &mut World<D>, _id: EntityId, _event: EntityEvent) {}
}

/// 不做任何事的钩子
impl<D> EntityHooks<D> for () {}

/// 实体仓库
///
/// 所有实体存放在一个 Vec 中，用 [`EntityId`] 索引；`roots` 是注册到场景的顶层实体，
/// 子实体通过分组关系挂在它们下面。
pub struct World<D> {
    entities: Vec<Entity<D>>,
    roots: Vec<EntityId>,
    collisions: HashMap<EntityId, Vec<EntityId>>,
    dragging: Option<EntityId>,
    in_area: Option<EntityId>,
    cursor: Cursor,
    play_area: Size,
}

impl<D> World<D> {
    pub fn new(play_area: Size) -> Self {
        Self {
            entities: Vec::new(),
            roots: Vec::new(),
            collisions: HashMap::new(),
            dragging: None,
            in_area: None,
            cursor: Cursor::Auto,
            play_area,
        }
    }

    /// 放入仓库但不注册为顶层实体
    pub fn spawn(&mut self, entity: Entity<D>) -> EntityId {
        let id = EntityId(self.entities.len());
        self.entities.push(entity);
        id
    }

    /// 注册为顶层实体
    pub fn register(&mut self, id: EntityId) {
        if !self.roots.contains(&id) {
            self.roots.push(id);
        }
    }

    /// spawn + register
    pub fn add(&mut self, entity: Entity<D>) -> EntityId {
        let id = self.spawn(entity);
        self.register(id);
        id
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity<D>> {
        self.entities.get(id.0)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity<D>> {
        self.entities.get_mut(id.0)
    }

    pub fn find(&self, name: &str) -> Option<EntityId> {
        self.entities.iter().position(|e| e.name == name).map(EntityId)
    }

    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        (0..self.entities.len()).map(EntityId)
    }

    pub fn roots(&self) -> &[EntityId] { &self.roots }
    pub fn len(&self) -> usize { self.entities.len() }
    pub fn is_empty(&self) -> bool { self.entities.is_empty() }

    pub fn play_area(&self) -> Size { self.play_area }

    pub fn set_play_area(&mut self, play_area: Size) {
        self.play_area = play_area;
    }

    pub fn cursor(&self) -> Cursor { self.cursor }
    pub fn dragging(&self) -> Option<EntityId> { self.dragging }
    pub fn in_area(&self) -> Option<EntityId> { self.in_area }

    /// 上一帧记录的碰撞对象
    pub fn collisions_of(&self, id: EntityId) -> &[EntityId] {
        self.collisions.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    // ---- 分组 ----

    /// 加入分组：先脱离原分组，再移到分组原点并追加到末尾
    pub fn add_child(&mut self, group: EntityId, child: EntityId) {
        if group == child {
            return;
        }
        if let Some(old) = self.entities[child.0].group {
            self.remove_child(old, child);
        }

        let origin = self.entities[group.0].position();
        let entity = &mut self.entities[child.0];
        entity.set_position(origin.x, origin.y);
        entity.group = Some(group);
        self.entities[group.0].children.push(child);
    }

    /// 从分组移除，返回是否确实在分组中
    pub fn remove_child(&mut self, group: EntityId, child: EntityId) -> bool {
        let children = &mut self.entities[group.0].children;
        match children.iter().position(|&c| c == child) {
            Some(index) => {
                children.remove(index);
                self.entities[child.0].group = None;
                true
            }
            None => false,
        }
    }

    /// 清空分组，返回原来的子实体（顺序不变）
    pub fn reset_children(&mut self, group: EntityId) -> Vec<EntityId> {
        let children = std::mem::take(&mut self.entities[group.0].children);
        for &child in &children {
            self.entities[child.0].group = None;
        }
        children
    }

    pub fn children(&self, group: EntityId) -> &[EntityId] {
        &self.entities[group.0].children
    }

    /// 最上层（最后加入）的子实体
    pub fn last_child(&self, group: EntityId) -> Option<EntityId> {
        self.entities[group.0].children.last().copied()
    }

    pub fn contains_child(&self, group: EntityId, child: EntityId) -> bool {
        self.entities[group.0].children.contains(&child)
    }

    pub fn move_to(&mut self, id: EntityId, target: Point, speed: f32) {
        self.entities[id.0].move_to(target, speed);
    }

    // ---- 帧更新 ----

    /// 绘制顺序：顶层实体及其子实体（递归），正在拖拽的实体及其子实体放在最后
    pub fn draw_order(&self) -> Vec<EntityId> {
        let mut order = Vec::with_capacity(self.entities.len());
        for &root in &self.roots {
            self.collect(root, self.dragging, &mut order);
        }
        if let Some(dragged) = self.dragging {
            self.collect(dragged, None, &mut order);
        }
        order
    }

    fn collect(&self, id: EntityId, skip: Option<EntityId>, out: &mut Vec<EntityId>) {
        if Some(id) == skip {
            return;
        }
        out.push(id);
        for &child in &self.entities[id.0].children {
            self.collect(child, skip, out);
        }
    }

    /// 每帧调用：绘制、推进动画、计算碰撞差分
    pub fn update<H>(&mut self, hooks: &mut H, ctx: &mut dyn RenderContext)
    where
        H: EntityHooks<D> + ?Sized,
    {
        for id in self.draw_order() {
            self.update_entity(hooks, id, ctx);
        }
    }

    fn update_entity<H>(&mut self, hooks: &mut H, id: EntityId, ctx: &mut dyn RenderContext)
    where
        H: EntityHooks<D> + ?Sized,
    {
        if !self.entities[id.0].visible {
            return;
        }

        ctx.save();
        hooks.draw(self, id, ctx);

        let mut events = Vec::new();
        self.entities[id.0].step_motion(&mut events);
        for event in events {
            self.dispatch(hooks, id, event);
        }

        self.emit_collisions(hooks, id);
        ctx.restore();
    }

    /// 碰撞差分：新出现的重叠双方都收到 enter，消失的重叠双方都收到 leave
    fn emit_collisions<H>(&mut self, hooks: &mut H, id: EntityId)
    where
        H: EntityHooks<D> + ?Sized,
    {
        let Some(collider) = self.entities[id.0].collider().copied() else {
            return;
        };

        let mut current = Vec::new();
        if collider.enabled {
            for &other in &self.roots {
                if other == id {
                    continue;
                }
                let entity = &self.entities[other.0];
                if !entity.visible {
                    continue;
                }
                if let Some(other_collider) = entity.collider() {
                    if other_collider.enabled && collider.has_collided(other_collider) {
                        current.push(other);
                    }
                }
            }
        }

        let previous = self.collisions.remove(&id).unwrap_or_default();
        let entered: Vec<EntityId> = current.iter().filter(|c| !previous.contains(c)).copied().collect();
        let left: Vec<EntityId> = previous.iter().filter(|p| !current.contains(p)).copied().collect();
        self.collisions.insert(id, current);

        for other in entered {
            self.dispatch(hooks, id, EntityEvent::CollisionEnter(other));
            self.dispatch(hooks, other, EntityEvent::CollisionEnter(id));
        }
        for other in left {
            self.dispatch(hooks, id, EntityEvent::CollisionLeave(other));
            self.dispatch(hooks, other, EntityEvent::CollisionLeave(id));
        }
    }

    // ---- 指针 ----

    /// 命中测试：按绘制登记顺序，最后一个包含该点的可见实体
    pub fn hit_test(&self, point: Point) -> Option<EntityId> {
        let mut order = Vec::with_capacity(self.entities.len());
        for &root in &self.roots {
            self.collect(root, None, &mut order);
        }
        order
            .into_iter()
            .filter(|id| {
                let entity = &self.entities[id.0];
                entity.visible && entity.frame().contains(&point)
            })
            .last()
    }

    /// 路由指针事件：先发给正在拖拽的实体，再发给指针下的实体（同一实体只发一次）
    pub fn on_pointer<H>(&mut self, hooks: &mut H, event: PointerEvent)
    where
        H: EntityHooks<D> + ?Sized,
    {
        let dragged = self.dragging;
        if let Some(id) = dragged {
            if self.entities[id.0].is_dragging() {
                self.send_pointer(hooks, id, &event);
            }
        }

        match self.hit_test(event.position()) {
            Some(hit) => {
                if Some(hit) != dragged {
                    self.send_pointer(hooks, hit, &event);
                }

                if Some(hit) != self.in_area {
                    if let Some(previous) = self.in_area {
                        if !self.entities[previous.0].is_dragging() {
                            self.dispatch(hooks, previous, EntityEvent::Leave);
                            self.cursor = Cursor::Auto;
                        }
                    }
                    self.in_area = Some(hit);
                    self.dispatch(hooks, hit, EntityEvent::Enter);
                }
            }
            None => {
                if let Some(previous) = self.in_area {
                    if !self.entities[previous.0].is_dragging() {
                        self.dispatch(hooks, previous, EntityEvent::Leave);
                        self.cursor = Cursor::Auto;
                        self.in_area = None;
                    }
                }
            }
        }
    }

    fn send_pointer<H>(&mut self, hooks: &mut H, id: EntityId, event: &PointerEvent)
    where
        H: EntityHooks<D> + ?Sized,
    {
        let mut events = Vec::new();
        let play_area = self.play_area;
        self.entities[id.0].on_mouse(event, play_area, &mut events);
        for e in events {
            self.dispatch(hooks, id, e);
        }
    }

    /// 派发实体事件：World 先处理拖拽与光标状态，再交给钩子
    pub fn dispatch<H>(&mut self, hooks: &mut H, id: EntityId, event: EntityEvent)
    where
        H: EntityHooks<D> + ?Sized,
    {
        match event {
            EntityEvent::DragStart => self.dragging = Some(id),
            EntityEvent::DragStop => {
                if self.dragging == Some(id) {
                    self.dragging = None;
                }
            }
            // 拖拽期间只有被拖拽的实体能改光标
            EntityEvent::CursorChange(cursor) => {
                if self.dragging.is_none() || self.dragging == Some(id) {
                    self.cursor = cursor;
                }
            }
            _ => {}
        }
        hooks.on_event(self, id, event);
    }

    /// 清除所有临时状态（拖拽、悬停、动画、碰撞记录、光标）
    pub fn stop(&mut self) {
        for entity in &mut self.entities {
            entity.reset_transient();
        }
        self.collisions.clear();
        self.dragging = None;
        self.in_area = None;
        self.cursor = Cursor::Auto;
    }

    /// 清空所有实体
    pub fn clear(&mut self) {
        self.stop();
        self.entities.clear();
        self.roots.clear();
    }
}

impl<D> Index<EntityId> for World<D> {
    type Output = Entity<D>;

    fn index(&self, id: EntityId) -> &Entity<D> {
        &self.entities[id.0]
    }
}

impl<D> IndexMut<EntityId> for World<D> {
    fn index_mut(&mut self, id: EntityId) -> &mut Entity<D> {
        &mut self.entities[id.0]
    }
}
