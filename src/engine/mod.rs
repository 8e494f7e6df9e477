//! 引擎层 - 实体、碰撞、场景与主循环
//!
//! 游戏对象都放在 [`World`] 里，用 [`EntityId`] 引用；分组关系（牌堆里的牌、
//! 拖拽中跟随的一串牌）通过 children / group 双向记录。事件以 [`EntityEvent`]
//! 的形式同步派发给 [`EntityHooks`] 实现者。

mod collider;
mod entity;
mod game;
mod input;
mod render;
mod scene;
mod settings;
mod timer;
mod world;

pub use collider::BoxCollider;
pub use entity::{Entity, EntityEvent, EntityId, Motion};
pub use game::{Game, RESIZE_DEBOUNCE};
pub use input::{Cursor, PointerEvent, PointerKind};
pub use render::{CanvasContext, ImageData, ImageStore, RenderContext};
pub use scene::{Scene, SceneRequest};
pub use settings::{GameConfig, GameSettings};
pub use timer::{TimerId, Timers};
pub use world::{EntityHooks, World};
