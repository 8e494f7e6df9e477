//! 错误类型

use thiserror::Error;

/// 引擎统一错误
#[derive(Debug, Error)]
pub enum EngineError {
    /// 切换到未注册的场景
    #[error("unknown scene: {0}")]
    UnknownScene(String),

    /// 视口尺寸不可用（宽或高不是正数）
    #[error("invalid viewport {width}x{height}")]
    InvalidViewport { width: f32, height: f32 },

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("font error: {0}")]
    Font(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
