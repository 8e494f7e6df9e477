//! 渲染上下文 - 场景与实体只面向这个抽象绘图接口

use crate::canvas::ImageFit;
use crate::error::Result;
use crate::{Canvas, Color, Paint, Path, Point, Rect, TextRenderer};
use std::collections::HashMap;
use std::path::Path as FsPath;

/// 抽象 2D 绘图接口
pub trait RenderContext {
    fn save(&mut self);
    fn restore(&mut self);
    fn set_alpha(&mut self, alpha: f32);
    fn clear(&mut self, color: Color);
    fn draw_rect(&mut self, rect: Rect, paint: &Paint);
    fn draw_round_rect(&mut self, rect: Rect, radius: f32, paint: &Paint);
    fn draw_line(&mut self, from: Point, to: Point, paint: &Paint);
    /// 按 id 绘制图片，图片不存在时什么也不画并返回 false
    fn draw_image(&mut self, id: &str, rect: Rect) -> bool;
    /// 绘制文本，y 为基线
    fn draw_text(&mut self, text: &str, x: f32, y: f32, size: f32, color: Color);
}

/// 解码后的 RGBA 图片
#[derive(Debug, Clone)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl ImageData {
    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> Self {
        Self { width, height, rgba }
    }

    /// 把画布内容截取为图片（用于合成缺失的素材）
    pub fn from_canvas(canvas: &Canvas) -> Self {
        Self::from_rgba(canvas.width(), canvas.height(), canvas.to_rgba())
    }

    pub fn load_file(path: impl AsRef<FsPath>) -> Result<Self> {
        let img = image::open(path)?.to_rgba8();
        let (width, height) = img.dimensions();
        Ok(Self::from_rgba(width, height, img.into_raw()))
    }
}

/// 图片仓库 id -> 图片
#[derive(Debug, Default)]
pub struct ImageStore {
    images: HashMap<String, ImageData>,
}

impl ImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, image: ImageData) {
        self.images.insert(id.into(), image);
    }

    pub fn get(&self, id: &str) -> Option<&ImageData> {
        self.images.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.images.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn load_file(&mut self, id: impl Into<String>, path: impl AsRef<FsPath>) -> Result<()> {
        let image = ImageData::load_file(path)?;
        self.insert(id, image);
        Ok(())
    }

    /// 加载目录下所有 png，文件名（不含扩展名）作为 id
    pub fn load_dir(&mut self, dir: impl AsRef<FsPath>) -> Result<usize> {
        let mut loaded = 0;
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            let is_png = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("png"));
            let Some(id) = path.file_stem().and_then(|s| s.to_str()).map(str::to_owned) else {
                continue;
            };
            if !is_png {
                continue;
            }

            match self.load_file(id.as_str(), &path) {
                Ok(()) => loaded += 1,
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "failed to load image"),
            }
        }
        Ok(loaded)
    }
}

/// 基于软件画布的渲染上下文
pub struct CanvasContext<'a> {
    canvas: &'a mut Canvas,
    images: &'a ImageStore,
    text: Option<&'a TextRenderer>,
}

impl<'a> CanvasContext<'a> {
    pub fn new(canvas: &'a mut Canvas, images: &'a ImageStore, text: Option<&'a TextRenderer>) -> Self {
        Self { canvas, images, text }
    }
}

impl RenderContext for CanvasContext<'_> {
    fn save(&mut self) {
        self.canvas.save();
    }

    fn restore(&mut self) {
        self.canvas.restore();
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.canvas.set_global_alpha(alpha);
    }

    fn clear(&mut self, color: Color) {
        self.canvas.clear(color);
    }

    fn draw_rect(&mut self, rect: Rect, paint: &Paint) {
        self.canvas.draw_rect(&rect, paint);
    }

    fn draw_round_rect(&mut self, rect: Rect, radius: f32, paint: &Paint) {
        let mut path = Path::new();
        path.add_round_rect(&rect, radius);
        self.canvas.draw_path(&path, paint);
    }

    fn draw_line(&mut self, from: Point, to: Point, paint: &Paint) {
        self.canvas.draw_line(from.x, from.y, to.x, to.y, paint);
    }

    fn draw_image(&mut self, id: &str, rect: Rect) -> bool {
        match self.images.get(id) {
            Some(img) => {
                self.canvas.draw_image(&img.rgba, img.width, img.height, &rect, ImageFit::Fill);
                true
            }
            None => false,
        }
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, size: f32, color: Color) {
        if let Some(renderer) = self.text {
            renderer.draw_text(self.canvas, text, x, y, size, color);
        }
    }
}
