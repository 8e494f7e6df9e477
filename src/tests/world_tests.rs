//! World 单元测试：分组、绘制顺序、碰撞差分、指针路由

use super::RecordingContext;
use crate::engine::{
    Cursor, Entity, EntityEvent, EntityHooks, EntityId, PointerEvent, RenderContext, World,
};
use crate::{Point, Rect, Size};

/// 记录绘制顺序和收到的事件
#[derive(Default)]
struct Recorder {
    drawn: Vec<EntityId>,
    events: Vec<(EntityId, EntityEvent)>,
}

impl Recorder {
    fn events_of(&self, id: EntityId) -> Vec<EntityEvent> {
        self.events.iter().filter(|(i, _)| *i == id).map(|(_, e)| *e).collect()
    }

    fn count(&self, id: EntityId, event: EntityEvent) -> usize {
        self.events.iter().filter(|(i, e)| *i == id && *e == event).count()
    }
}

impl EntityHooks<()> for Recorder {
    fn draw(&mut self, _world: &World<()>, id: EntityId, _ctx: &mut dyn RenderContext) {
        self.drawn.push(id);
    }

    fn on_event(&mut self, _world: &mut World<()>, id: EntityId, event: EntityEvent) {
        self.events.push((id, event));
    }
}

fn world() -> World<()> {
    World::new(Size::new(1000.0, 800.0))
}

fn boxed(name: &str, x: f32, y: f32) -> Entity<()> {
    Entity::new(name, Rect::new(x, y, 100.0, 100.0), ())
}

/// 加入分组：移到分组原点，设置反向引用，追加到末尾
#[test]
fn test_add_child_moves_to_group_origin() {
    let mut w = world();
    let group = w.add(boxed("group", 300.0, 200.0));
    let child = w.spawn(boxed("child", 0.0, 0.0));

    w.add_child(group, child);

    assert_eq!(w[child].position(), Point::new(300.0, 200.0));
    assert_eq!(w[child].group(), Some(group));
    assert_eq!(w.children(group), &[child]);
    assert_eq!(w.last_child(group), Some(child));
    assert!(w.contains_child(group, child));
    assert!(!w.contains_child(child, group));
}

/// 加入新分组前先脱离原分组
#[test]
fn test_add_child_leaves_previous_group() {
    let mut w = world();
    let a = w.add(boxed("a", 0.0, 0.0));
    let b = w.add(boxed("b", 500.0, 0.0));
    let child = w.spawn(boxed("child", 0.0, 0.0));

    w.add_child(a, child);
    w.add_child(b, child);

    assert!(w.children(a).is_empty());
    assert_eq!(w.children(b), &[child]);
    assert_eq!(w[child].group(), Some(b));
}

#[test]
fn test_remove_and_reset_children() {
    let mut w = world();
    let group = w.add(boxed("group", 0.0, 0.0));
    let c1 = w.spawn(boxed("c1", 0.0, 0.0));
    let c2 = w.spawn(boxed("c2", 0.0, 0.0));
    let c3 = w.spawn(boxed("c3", 0.0, 0.0));
    for c in [c1, c2, c3] {
        w.add_child(group, c);
    }

    assert!(w.remove_child(group, c2));
    assert!(!w.remove_child(group, c2));
    assert_eq!(w[c2].group(), None);

    let previous = w.reset_children(group);
    assert_eq!(previous, vec![c1, c3]);
    assert!(w.children(group).is_empty());
    assert_eq!(w[c1].group(), None);
}

/// 子实体跟在父实体后绘制，不可见实体跳过
#[test]
fn test_update_draw_order() {
    let mut w = world();
    let a = w.add(boxed("a", 0.0, 0.0));
    let child = w.spawn(boxed("child", 0.0, 0.0));
    w.add_child(a, child);
    let b = w.add(boxed("b", 500.0, 0.0));
    let hidden = w.add(boxed("hidden", 700.0, 0.0));
    w[hidden].visible = false;

    let mut hooks = Recorder::default();
    let mut ctx = RecordingContext::new();
    w.update(&mut hooks, &mut ctx);

    assert_eq!(hooks.drawn, vec![a, child, b]);
}

/// 正在拖拽的实体及其子实体最后绘制
#[test]
fn test_dragged_entity_is_drawn_last() {
    let mut w = world();
    let a = w.add(boxed("a", 0.0, 0.0).with_draggable(true));
    let follower = w.spawn(boxed("follower", 0.0, 0.0));
    w.add_child(a, follower);
    w[follower].set_position(0.0, 300.0);
    let b = w.add(boxed("b", 500.0, 0.0));

    let mut hooks = Recorder::default();
    w.on_pointer(&mut hooks, PointerEvent::down(10.0, 10.0));
    assert_eq!(w.dragging(), Some(a));

    let mut ctx = RecordingContext::new();
    w.update(&mut hooks, &mut ctx);
    assert_eq!(hooks.drawn, vec![b, a, follower]);
}

/// 挂在无碰撞盒分组下的 mover 与顶层 target（与牌和牌堆的关系相同）
fn mover_and_target(w: &mut World<()>) -> (EntityId, EntityId) {
    let group = w.add(boxed("group", 0.0, 0.0));
    let mover = w.spawn(boxed("mover", 0.0, 0.0).with_collider(true));
    w.add_child(group, mover);
    w[mover].set_position(600.0, 600.0);
    let target = w.add(boxed("target", 300.0, 300.0).with_collider(true));
    (mover, target)
}

/// 碰撞开始和结束都通知双方
#[test]
fn test_collision_enter_and_leave_notify_both() {
    let mut w = world();
    let (mover, target) = mover_and_target(&mut w);

    let mut hooks = Recorder::default();
    let mut ctx = RecordingContext::new();
    w.update(&mut hooks, &mut ctx);
    assert!(hooks.events.is_empty());

    w[mover].set_position(350.0, 350.0);
    w.update(&mut hooks, &mut ctx);
    assert_eq!(hooks.count(mover, EntityEvent::CollisionEnter(target)), 1);
    assert_eq!(hooks.count(target, EntityEvent::CollisionEnter(mover)), 1);
    assert_eq!(w.collisions_of(mover), &[target]);

    // 没有变化时不重复通知
    hooks.events.clear();
    w.update(&mut hooks, &mut ctx);
    assert!(hooks.events.is_empty());

    w[mover].set_position(600.0, 600.0);
    w.update(&mut hooks, &mut ctx);
    assert_eq!(hooks.count(mover, EntityEvent::CollisionLeave(target)), 1);
    assert_eq!(hooks.count(target, EntityEvent::CollisionLeave(mover)), 1);
    assert!(w.collisions_of(mover).is_empty());
}

/// 禁用碰撞盒后上一帧的碰撞全部结束
#[test]
fn test_disabled_collider_leaves_all() {
    let mut w = world();
    let (mover, target) = mover_and_target(&mut w);
    w[mover].set_position(350.0, 350.0);

    let mut hooks = Recorder::default();
    let mut ctx = RecordingContext::new();
    w.update(&mut hooks, &mut ctx);
    assert_eq!(hooks.count(mover, EntityEvent::CollisionEnter(target)), 1);

    w[mover].set_collider_enabled(false);
    hooks.events.clear();
    w.update(&mut hooks, &mut ctx);

    assert_eq!(hooks.count(mover, EntityEvent::CollisionLeave(target)), 1);
    assert_eq!(hooks.count(target, EntityEvent::CollisionLeave(mover)), 1);
}

/// 不可见的实体不是碰撞候选
#[test]
fn test_invisible_target_is_not_a_candidate() {
    let mut w = world();
    let (mover, target) = mover_and_target(&mut w);
    w[mover].set_position(350.0, 350.0);
    w[target].visible = false;

    let mut hooks = Recorder::default();
    let mut ctx = RecordingContext::new();
    w.update(&mut hooks, &mut ctx);

    assert!(w.collisions_of(mover).is_empty());
    assert_eq!(hooks.count(mover, EntityEvent::CollisionEnter(target)), 0);
}

/// 碰撞候选只有顶层实体，子实体不参与
#[test]
fn test_collision_candidates_are_top_level_only() {
    let mut w = world();
    let group = w.add(boxed("group", 500.0, 500.0));
    let child = w.spawn(boxed("child", 0.0, 0.0).with_collider(true));
    w.add_child(group, child);
    let probe = w.add(boxed("probe", 520.0, 520.0).with_collider(true));

    let mut hooks = Recorder::default();
    let mut ctx = RecordingContext::new();
    w.update(&mut hooks, &mut ctx);

    // child 能看到 probe（顶层），probe 看不到 child
    assert_eq!(w.collisions_of(child), &[probe]);
    assert!(w.collisions_of(probe).is_empty());
    assert_eq!(hooks.count(probe, EntityEvent::CollisionEnter(child)), 1);
}

/// 命中测试取最后一个包含该点的可见实体
#[test]
fn test_hit_test_picks_topmost_visible() {
    let mut w = world();
    let a = w.add(boxed("a", 0.0, 0.0));
    let child = w.spawn(boxed("child", 0.0, 0.0));
    w.add_child(a, child);
    let b = w.add(boxed("b", 50.0, 50.0));

    assert_eq!(w.hit_test(Point::new(10.0, 10.0)), Some(child));
    assert_eq!(w.hit_test(Point::new(60.0, 60.0)), Some(b));

    w[b].visible = false;
    assert_eq!(w.hit_test(Point::new(60.0, 60.0)), Some(child));
    assert_eq!(w.hit_test(Point::new(900.0, 900.0)), None);
}

/// 指针进入/离开
#[test]
fn test_pointer_enter_and_leave() {
    let mut w = world();
    let a = w.add(boxed("a", 0.0, 0.0).with_clickable(true));
    let b = w.add(boxed("b", 200.0, 0.0));

    let mut hooks = Recorder::default();
    w.on_pointer(&mut hooks, PointerEvent::moved(10.0, 10.0));
    assert_eq!(w.in_area(), Some(a));
    assert_eq!(hooks.count(a, EntityEvent::Enter), 1);
    assert_eq!(w.cursor(), Cursor::Pointer);

    w.on_pointer(&mut hooks, PointerEvent::moved(210.0, 10.0));
    assert_eq!(hooks.count(a, EntityEvent::Leave), 1);
    assert_eq!(hooks.count(b, EntityEvent::Enter), 1);
    assert_eq!(w.cursor(), Cursor::Auto);

    w.on_pointer(&mut hooks, PointerEvent::moved(600.0, 600.0));
    assert_eq!(hooks.count(b, EntityEvent::Leave), 1);
    assert_eq!(w.in_area(), None);
}

/// 拖拽实体同时也在指针下时只收到一次事件
#[test]
fn test_dragged_entity_receives_event_once() {
    let mut w = world();
    let a = w.add(boxed("a", 0.0, 0.0).with_draggable(true));

    let mut hooks = Recorder::default();
    w.on_pointer(&mut hooks, PointerEvent::down(10.0, 10.0));
    hooks.events.clear();

    w.on_pointer(&mut hooks, PointerEvent::moved(20.0, 20.0));
    let dragging: Vec<_> = hooks
        .events_of(a)
        .into_iter()
        .filter(|e| matches!(e, EntityEvent::Dragging(_)))
        .collect();
    assert_eq!(dragging, vec![EntityEvent::Dragging(Point::new(10.0, 10.0))]);

    hooks.events.clear();
    w.on_pointer(&mut hooks, PointerEvent::up(20.0, 20.0));
    assert_eq!(hooks.count(a, EntityEvent::DragStop), 1);
    assert_eq!(w.dragging(), None);
}

/// 拖拽实体离开指针区域后仍然收到事件，且不会收到 Leave
#[test]
fn test_dragged_entity_keeps_receiving_events() {
    let mut w = world();
    let a = w.add(boxed("a", 0.0, 0.0).with_draggable(true));
    let b = w.add(boxed("b", 400.0, 0.0));

    let mut hooks = Recorder::default();
    w.on_pointer(&mut hooks, PointerEvent::down(10.0, 10.0));
    // 指针瞬间跳到 b 上，a 跟随后仍在 b 之下
    w.on_pointer(&mut hooks, PointerEvent::moved(450.0, 50.0));

    assert_eq!(w[a].position(), Point::new(440.0, 40.0));
    assert_eq!(hooks.count(a, EntityEvent::Leave), 0);
    assert_eq!(w.in_area(), Some(b));
    assert_eq!(w.cursor(), Cursor::Grabbing);
}

/// stop 清除所有临时状态
#[test]
fn test_stop_clears_transient_state() {
    let mut w = world();
    let a = w.add(boxed("a", 0.0, 0.0).with_draggable(true).with_collider(true));
    let b = w.add(boxed("b", 50.0, 50.0).with_collider(true));

    let mut hooks = Recorder::default();
    let mut ctx = RecordingContext::new();
    w.on_pointer(&mut hooks, PointerEvent::down(10.0, 10.0));
    w.update(&mut hooks, &mut ctx);
    w[b].move_to(Point::new(300.0, 300.0), 5.0);

    w.stop();

    assert_eq!(w.dragging(), None);
    assert_eq!(w.in_area(), None);
    assert_eq!(w.cursor(), Cursor::Auto);
    assert!(!w[a].is_dragging());
    assert!(!w[b].is_moving());
    assert!(w.collisions_of(a).is_empty());
}

/// update 推进移动动画并派发 Moving/Moved
#[test]
fn test_update_steps_motion() {
    let mut w = world();
    let a = w.add(boxed("a", 0.0, 0.0));
    w.move_to(a, Point::new(20.0, 0.0), 10.0);

    let mut hooks = Recorder::default();
    let mut ctx = RecordingContext::new();
    w.update(&mut hooks, &mut ctx);
    w.update(&mut hooks, &mut ctx);

    assert_eq!(
        hooks.events_of(a),
        vec![EntityEvent::Moving(Point::new(10.0, 0.0)), EntityEvent::Moved]
    );
    assert_eq!(w[a].position(), Point::new(20.0, 0.0));
}
