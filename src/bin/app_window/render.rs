//! 渲染相关逻辑

use mini_solitaire::engine::GameSettings;
use mini_solitaire::Canvas;

/// 将游戏区域画布按当前缩放贴到窗口缓冲区，留边处填背景色
pub fn present_to_buffer(
    buffer: &mut [u32],
    buffer_width: u32,
    buffer_height: u32,
    canvas: &Canvas,
    settings: &GameSettings,
) {
    let canvas_width = canvas.width() as f32;
    let canvas_height = canvas.height() as f32;
    let bg = settings.background;
    let bg = ((bg.r as u32) << 16) | ((bg.g as u32) << 8) | bg.b as u32;

    for y in 0..buffer_height {
        let row = (y * buffer_width) as usize;
        for x in 0..buffer_width {
            let dst_idx = row + x as usize;
            if dst_idx >= buffer.len() {
                return;
            }

            // 取像素中心对应的游戏区域坐标（最近邻采样）
            let p = settings.to_play_area(x as f32 + 0.5, y as f32 + 0.5);
            buffer[dst_idx] = if p.x >= 0.0 && p.y >= 0.0 && p.x < canvas_width && p.y < canvas_height {
                let c = canvas.get_pixel(p.x as u32, p.y as u32);
                ((c.r as u32) << 16) | ((c.g as u32) << 8) | c.b as u32
            } else {
                bg
            };
        }
    }
}
