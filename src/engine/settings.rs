//! 游戏配置与视口缩放

use crate::error::{EngineError, Result};
use crate::{Color, Point, Size};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// solitaire.json 配置结构，所有字段都有默认值
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameConfig {
    #[serde(default = "default_play_width")]
    pub play_area_width: f32,
    #[serde(default = "default_play_height")]
    pub play_area_height: f32,
    #[serde(default = "default_true")]
    pub maximized: bool,
    #[serde(default = "default_bg")]
    pub background_color: String,
    #[serde(default)]
    pub debug: bool,
    #[serde(default = "default_assets")]
    pub assets_dir: PathBuf,
    /// 固定随机种子，便于复现牌局
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_play_width() -> f32 { 1000.0 }
fn default_play_height() -> f32 { 800.0 }
fn default_true() -> bool { true }
fn default_bg() -> String { "#59C551".to_string() }
fn default_assets() -> PathBuf { PathBuf::from("assets") }

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            play_area_width: default_play_width(),
            play_area_height: default_play_height(),
            maximized: true,
            background_color: default_bg(),
            debug: false,
            assets_dir: default_assets(),
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// 解析背景色，格式不对时退回牌桌绿
    pub fn background(&self) -> Color {
        Color::parse_hex(&self.background_color).unwrap_or_else(|| {
            tracing::warn!(value = %self.background_color, "invalid background color");
            Color::TABLE_GREEN
        })
    }
}

/// 运行时设置：逻辑游戏区域 + 当前视口的缩放和偏移
#[derive(Debug, Clone)]
pub struct GameSettings {
    pub play_area: Size,
    pub maximized: bool,
    pub background: Color,
    pub debug: bool,
    pub scale_x: f32,
    pub scale_y: f32,
    /// 偏移以游戏区域单位表示（已除以缩放）
    pub left_offset: f32,
    pub top_offset: f32,
    /// 游戏区域缩放后在窗口中的像素尺寸
    pub width: f32,
    pub height: f32,
}

impl GameSettings {
    pub fn new(play_area: Size, maximized: bool, background: Color) -> Self {
        Self {
            play_area,
            maximized,
            background,
            debug: false,
            scale_x: 1.0,
            scale_y: 1.0,
            left_offset: 0.0,
            top_offset: 0.0,
            width: play_area.width,
            height: play_area.height,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        let mut settings = Self::new(
            Size::new(config.play_area_width, config.play_area_height),
            config.maximized,
            config.background(),
        );
        settings.debug = config.debug;
        settings
    }

    /// 按视口重新计算缩放和偏移
    ///
    /// 最大化时等比缩放到视口内，多余方向居中留边；非最大化时 1:1。
    /// 视口不可用时保留上一次的结果并返回错误。
    pub fn reload(&mut self, viewport: Option<Size>) -> Result<()> {
        if !self.maximized {
            self.scale_x = 1.0;
            self.scale_y = 1.0;
            self.left_offset = 0.0;
            self.top_offset = 0.0;
            self.width = self.play_area.width;
            self.height = self.play_area.height;
            return Ok(());
        }

        let viewport = match viewport {
            Some(v) if v.is_positive() && self.play_area.is_positive() => v,
            other => {
                let v = other.unwrap_or_default();
                return Err(EngineError::InvalidViewport { width: v.width, height: v.height });
            }
        };

        let (pw, ph) = (self.play_area.width, self.play_area.height);
        let mut scaled_w = viewport.width;
        let mut scaled_h = viewport.height;
        let mut left = 0.0;
        let mut top = 0.0;

        // 视口比游戏区域更宽：左右留边，否则上下留边
        if viewport.width * ph > viewport.height * pw {
            scaled_w = viewport.height * pw / ph;
            left = (viewport.width - scaled_w) / 2.0;
        } else {
            scaled_h = viewport.width * ph / pw;
            top = (viewport.height - scaled_h) / 2.0;
        }

        self.width = scaled_w;
        self.height = scaled_h;
        self.scale_x = scaled_w / pw;
        self.scale_y = scaled_h / ph;
        self.left_offset = left / self.scale_x;
        self.top_offset = top / self.scale_y;
        Ok(())
    }

    /// 窗口像素坐标 -> 游戏区域坐标
    pub fn to_play_area(&self, x: f32, y: f32) -> Point {
        Point::new(x / self.scale_x - self.left_offset, y / self.scale_y - self.top_offset)
    }
}
