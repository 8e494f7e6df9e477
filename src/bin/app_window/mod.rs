//! 窗口模块 - 配置加载、素材准备、画面呈现

pub mod assets;
pub mod config;
pub mod render;

pub use assets::*;
pub use config::*;
pub use render::*;

pub const WINDOW_TITLE: &str = "Solitaire";
