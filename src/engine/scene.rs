//! 场景接口

use super::input::{Cursor, PointerEvent};
use super::render::RenderContext;
use super::settings::GameSettings;
use std::time::Instant;

/// 场景向引擎发出的请求，在当前帧结束时处理
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneRequest {
    ChangeScene(String),
    Pause,
    Restart,
}

/// 场景
pub trait Scene {
    fn id(&self) -> &str;

    /// 构建实体并开始运行
    fn start(&mut self, settings: &GameSettings, now: Instant);

    /// 停止运行：取消定时器、清除临时状态
    fn stop(&mut self);

    /// 暂停或恢复
    fn pause(&mut self, paused: bool, now: Instant);

    /// 每帧调用
    fn update(&mut self, ctx: &mut dyn RenderContext, settings: &GameSettings, now: Instant);

    fn on_pointer(&mut self, event: PointerEvent, now: Instant);

    fn cursor(&self) -> Cursor {
        Cursor::Auto
    }

    /// 取出积压的请求
    fn take_requests(&mut self) -> Vec<SceneRequest> {
        Vec::new()
    }
}
