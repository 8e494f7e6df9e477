//! 素材加载：优先读取素材目录下的 png，缺失的图片用画布临时绘制

use mini_solitaire::engine::{ImageData, ImageStore};
use mini_solitaire::solitaire::{CardFace, Rank, Suit, CARD_HEIGHT, CARD_WIDTH};
use mini_solitaire::text::TextRenderer;
use mini_solitaire::{Canvas, Color, Paint, Path, Rect};
use std::path::Path as FsPath;

const ICON_SIZE: u32 = 64;
const CARD_RADIUS: f32 = 10.0;
const CARD_BLUE: Color = Color::rgb(38, 70, 160);

/// 加载素材目录，再补齐缺失的牌面、牌背和图标
pub fn load_assets(dir: &FsPath, text: Option<&TextRenderer>) -> ImageStore {
    let mut store = ImageStore::new();
    match store.load_dir(dir) {
        Ok(count) => tracing::info!(dir = %dir.display(), count, "assets loaded"),
        Err(e) => tracing::warn!(dir = %dir.display(), error = %e, "assets directory unavailable"),
    }

    let mut generated = 0usize;
    let mut ensure = |store: &mut ImageStore, id: String, make: &dyn Fn() -> ImageData| {
        if !store.contains(&id) {
            store.insert(id, make());
            generated += 1;
        }
    };

    for face in CardFace::standard_deck() {
        ensure(&mut store, face.image_id(), &|| card_face(face, text));
    }
    ensure(&mut store, "card-back".into(), &card_back);
    for suit in Suit::ALL {
        ensure(&mut store, format!("{}-14-stack", suit.index()), &|| stack_marker(suit));
    }
    ensure(&mut store, "clock".into(), &clock_icon);
    ensure(&mut store, "moves".into(), &moves_icon);
    ensure(&mut store, "play".into(), &play_icon);

    if generated > 0 {
        tracing::debug!(generated, "generated placeholder images");
    }
    store
}

fn card_canvas() -> Canvas {
    Canvas::new(CARD_WIDTH as u32, CARD_HEIGHT as u32)
}

fn card_outline(canvas: &mut Canvas, fill: Color) {
    let rect = Rect::new(0.5, 0.5, CARD_WIDTH - 1.0, CARD_HEIGHT - 1.0);
    let mut path = Path::new();
    path.add_round_rect(&rect, CARD_RADIUS);
    canvas.draw_path(&path, &Paint::fill(fill));
    canvas.draw_path(&path, &Paint::stroke(Color::GRAY, 1.0));
}

fn suit_color(suit: Suit) -> Color {
    if suit.is_red() {
        Color::rgb(200, 30, 40)
    } else {
        Color::BLACK
    }
}

fn rank_label(rank: Rank) -> String {
    match rank.value() {
        11 => "J".into(),
        12 => "Q".into(),
        13 => "K".into(),
        14 => "A".into(),
        n => n.to_string(),
    }
}

fn fill(canvas: &mut Canvas, path: &Path, color: Color) {
    canvas.draw_path(path, &Paint::fill(color));
}

/// 花色图案，中心 (cx, cy)，外接正方形边长 size
///
/// 各部分分开填充，避免重叠处按奇偶规则镂空。
fn draw_pip(canvas: &mut Canvas, suit: Suit, cx: f32, cy: f32, size: f32, color: Color) {
    let h = size / 2.0;
    match suit {
        Suit::Diamonds => {
            let mut p = Path::new();
            p.move_to(cx, cy - h).line_to(cx + h * 0.75, cy).line_to(cx, cy + h).line_to(cx - h * 0.75, cy).close();
            fill(canvas, &p, color);
        }
        Suit::Hearts => {
            let r = size * 0.27;
            let mut left = Path::new();
            left.add_circle(cx - r * 0.85, cy - h + r, r);
            fill(canvas, &left, color);
            let mut right = Path::new();
            right.add_circle(cx + r * 0.85, cy - h + r, r);
            fill(canvas, &right, color);
            let mut tip = Path::new();
            tip.move_to(cx - r * 1.8, cy - h + r * 1.3).line_to(cx + r * 1.8, cy - h + r * 1.3).line_to(cx, cy + h).close();
            fill(canvas, &tip, color);
        }
        Suit::Spades => {
            let r = size * 0.24;
            let mut tip = Path::new();
            tip.move_to(cx, cy - h).line_to(cx + r * 1.9, cy + r * 0.2).line_to(cx - r * 1.9, cy + r * 0.2).close();
            fill(canvas, &tip, color);
            let mut left = Path::new();
            left.add_circle(cx - r * 0.95, cy + r * 0.35, r);
            fill(canvas, &left, color);
            let mut right = Path::new();
            right.add_circle(cx + r * 0.95, cy + r * 0.35, r);
            fill(canvas, &right, color);
            let mut stem = Path::new();
            stem.move_to(cx, cy + r * 0.3).line_to(cx + r * 0.7, cy + h).line_to(cx - r * 0.7, cy + h).close();
            fill(canvas, &stem, color);
        }
        Suit::Clubs => {
            let r = size * 0.22;
            for (dx, dy) in [(0.0, -h + r), (-r * 1.1, -h + r * 2.6), (r * 1.1, -h + r * 2.6)] {
                let mut leaf = Path::new();
                leaf.add_circle(cx + dx, cy + dy, r);
                fill(canvas, &leaf, color);
            }
            let mut stem = Path::new();
            stem.move_to(cx, cy).line_to(cx + r * 0.7, cy + h).line_to(cx - r * 0.7, cy + h).close();
            fill(canvas, &stem, color);
        }
    }
}

fn card_face(face: CardFace, text: Option<&TextRenderer>) -> ImageData {
    let mut canvas = card_canvas();
    card_outline(&mut canvas, Color::WHITE);

    let color = suit_color(face.suit);
    draw_pip(&mut canvas, face.suit, 20.0, 42.0, 18.0, color);
    draw_pip(&mut canvas, face.suit, CARD_WIDTH / 2.0, CARD_HEIGHT / 2.0 + 10.0, 54.0, color);

    if let Some(text) = text {
        let label = rank_label(face.rank);
        text.draw_text(&mut canvas, &label, 10.0, 24.0, 20.0, color);
        // 右下角再写一次
        let w = text.measure_text(&label, 20.0);
        text.draw_text(&mut canvas, &label, CARD_WIDTH - 10.0 - w, CARD_HEIGHT - 10.0, 20.0, color);
    }

    ImageData::from_canvas(&canvas)
}

fn card_back() -> ImageData {
    let mut canvas = card_canvas();
    card_outline(&mut canvas, CARD_BLUE);

    let inner = Rect::new(0.0, 0.0, CARD_WIDTH, CARD_HEIGHT).inset(8.0, 8.0);
    let mut border = Path::new();
    border.add_round_rect(&inner, CARD_RADIUS / 2.0);
    canvas.draw_path(&border, &Paint::stroke(Color::WHITE, 2.0));

    // 斜纹
    canvas.save();
    canvas.clip_rect(inner);
    canvas.set_global_alpha(0.35);
    let stripe = Paint::stroke(Color::WHITE, 1.0);
    let mut offset = -CARD_HEIGHT;
    while offset < CARD_WIDTH {
        canvas.draw_line(offset, 0.0, offset + CARD_HEIGHT, CARD_HEIGHT, &stripe);
        offset += 12.0;
    }
    canvas.restore();

    ImageData::from_canvas(&canvas)
}

/// 空收牌区的花色提示，绘制时再降低透明度
fn stack_marker(suit: Suit) -> ImageData {
    let mut canvas = card_canvas();
    draw_pip(&mut canvas, suit, CARD_WIDTH / 2.0, CARD_HEIGHT / 2.0, 70.0, Color::BLACK);
    ImageData::from_canvas(&canvas)
}

fn icon_canvas() -> Canvas {
    Canvas::new(ICON_SIZE, ICON_SIZE)
}

fn clock_icon() -> ImageData {
    let mut canvas = icon_canvas();
    let c = ICON_SIZE as f32 / 2.0;
    let mut face = Path::new();
    face.add_circle(c, c, c - 5.0);
    canvas.draw_path(&face, &Paint::stroke(Color::BLACK, 5.0));

    let hand = Paint::stroke(Color::BLACK, 4.0);
    canvas.draw_line(c, c, c, c - 18.0, &hand);
    canvas.draw_line(c, c, c + 13.0, c, &hand);
    ImageData::from_canvas(&canvas)
}

fn moves_icon() -> ImageData {
    let mut canvas = icon_canvas();
    let back = Rect::new(8.0, 6.0, 30.0, 42.0);
    let front = Rect::new(26.0, 16.0, 30.0, 42.0);

    for (rect, color) in [(back, Color::GRAY), (front, Color::WHITE)] {
        let mut path = Path::new();
        path.add_round_rect(&rect, 5.0);
        canvas.draw_path(&path, &Paint::fill(color));
        canvas.draw_path(&path, &Paint::stroke(Color::BLACK, 3.0));
    }
    ImageData::from_canvas(&canvas)
}

fn play_icon() -> ImageData {
    let mut canvas = icon_canvas();
    let c = ICON_SIZE as f32 / 2.0;
    let mut circle = Path::new();
    circle.add_circle(c, c, c - 2.0);
    canvas.draw_path(&circle, &Paint::fill(Color::WHITE));
    canvas.draw_path(&circle, &Paint::stroke(Color::BLACK, 3.0));

    let mut triangle = Path::new();
    triangle.move_to(c - 9.0, c - 14.0).line_to(c + 15.0, c).line_to(c - 9.0, c + 14.0).close();
    canvas.draw_path(&triangle, &Paint::fill(Color::BLACK));
    ImageData::from_canvas(&canvas)
}
