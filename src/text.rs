//! 文本渲染模块 - 系统字体加载与字形缓存

use crate::error::{EngineError, Result};
use crate::{Canvas, Color};
use fontdue::{Font, FontSettings, Metrics};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// 常见系统字体位置（macOS / Linux / Windows）
const SYSTEM_FONT_PATHS: &[&str] = &[
    "/System/Library/Fonts/Helvetica.ttc",
    "/System/Library/Fonts/PingFang.ttc",
    "/Library/Fonts/Arial Unicode.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
    "C:\\Windows\\Fonts\\segoeui.ttf",
];

type GlyphCache = HashMap<(char, u32), (Metrics, Vec<u8>)>;

/// 文本渲染器
pub struct TextRenderer {
    font: Font,
    /// 字形缓存 (char, size*10) -> (Metrics, Bitmap)
    cache: Arc<Mutex<GlyphCache>>,
}

impl TextRenderer {
    /// 从字体数据创建
    pub fn from_bytes(font_data: &[u8]) -> Result<Self> {
        let settings = FontSettings {
            scale: 40.0,
            ..Default::default()
        };
        let font = Font::from_bytes(font_data, settings).map_err(|e| EngineError::Font(e.to_string()))?;
        Ok(Self {
            font,
            cache: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    /// 从文件路径加载字体
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let font_data = std::fs::read(path)?;
        Self::from_bytes(&font_data)
    }

    /// 依次尝试系统字体，取第一个能加载的
    pub fn load_system_font() -> Result<Self> {
        for path in SYSTEM_FONT_PATHS {
            if !Path::new(path).exists() {
                continue;
            }
            match Self::from_file(path) {
                Ok(renderer) => {
                    tracing::info!(font = %path, "loaded system font");
                    return Ok(renderer);
                }
                Err(e) => tracing::debug!(font = %path, error = %e, "skipping font"),
            }
        }
        Err(EngineError::Font("no system font found".into()))
    }

    fn glyph(&self, ch: char, size: f32) -> (Metrics, Vec<u8>) {
        let key = (ch, (size * 10.0) as u32);
        if let Ok(cache) = self.cache.lock() {
            if let Some(hit) = cache.get(&key) {
                return hit.clone();
            }
        }

        // 光栅化放在锁外
        let glyph = self.font.rasterize(ch, size);
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(key, glyph.clone());
        }
        glyph
    }

    /// 渲染文本到画布，y 为基线位置
    pub fn draw_text(&self, canvas: &mut Canvas, text: &str, x: f32, y: f32, size: f32, color: Color) {
        let mut cursor_x = x;

        for ch in text.chars() {
            let (metrics, bitmap) = self.glyph(ch, size);

            if metrics.width == 0 || metrics.height == 0 {
                cursor_x += metrics.advance_width;
                continue;
            }

            let glyph_x = cursor_x + metrics.xmin as f32;
            let glyph_y = y - metrics.height as f32 - metrics.ymin as f32;

            for gy in 0..metrics.height {
                for gx in 0..metrics.width {
                    let coverage = bitmap[gy * metrics.width + gx] as f32 / 255.0;
                    if coverage <= 0.001 {
                        continue;
                    }

                    let px = (glyph_x + gx as f32).round() as i32;
                    let py = (glyph_y + gy as f32).round() as i32;
                    let alpha = (color.a as f32 * coverage) as u8;
                    if alpha > 0 {
                        canvas.set_pixel(px, py, Color::new(color.r, color.g, color.b, alpha));
                    }
                }
            }

            cursor_x += metrics.advance_width;
        }
    }

    /// 测量文本宽度
    pub fn measure_text(&self, text: &str, size: f32) -> f32 {
        text.chars().map(|ch| self.font.metrics(ch, size).advance_width).sum()
    }
}
