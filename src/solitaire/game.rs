//! 纸牌场景 - 牌桌布局、洗牌发牌、计时计步、胜利判定

use super::card::{Card, CardFace, Suit};
use super::stack::{self, CardStack};
use super::table::{self, TableHooks};
use super::{Button, Piece, Table, CARD_HEIGHT, CARD_WIDTH};
use crate::engine::{
    Cursor, Entity, EntityId, GameSettings, PointerEvent, RenderContext, Scene, SceneRequest, TimerId, Timers,
};
use crate::{Color, Paint, Rect, Size};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::time::{Duration, Instant};

pub const SCENE_ID: &str = "game";

const LEFT_MARGIN: f32 = 25.0;
const TOP_MARGIN: f32 = 50.0;
const COLUMN_MARGIN: f32 = 10.0;
const ROW_MARGIN: f32 = 25.0;

const PLAY_STACKS: usize = 7;

/// 第 n 列（从 1 开始）的 x
fn column(position: usize) -> f32 {
    LEFT_MARGIN + (position as f32 - 1.0) * (CARD_WIDTH + COLUMN_MARGIN)
}

/// 第 n 行（从 1 开始）的 y
fn row(position: usize) -> f32 {
    TOP_MARGIN + (position as f32 - 1.0) * (CARD_HEIGHT + ROW_MARGIN)
}

/// 秒数格式化为 MM:SS
pub fn format_clock(total_seconds: u32) -> String {
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

/// 牌的来源
#[derive(Debug, Clone)]
pub enum DeckSource {
    /// 每局随机洗牌
    Random,
    /// 固定种子，重开后的牌局序列可复现
    Seeded(u64),
    /// 按给定顺序发牌（从末尾开始取），不洗牌
    Fixed(Vec<CardFace>),
}

/// 纸牌场景
pub struct SolitaireGame {
    table: Table,
    hooks: TableHooks,
    deck: DeckSource,
    rng: StdRng,
    timers: Timers,
    ticker: Option<TimerId>,
    seconds: u32,
    won: bool,
    ace_stacks: Vec<EntityId>,
    play_stacks: Vec<EntityId>,
}

impl SolitaireGame {
    pub fn new(deck: DeckSource) -> Self {
        let rng = match &deck {
            DeckSource::Seeded(seed) => StdRng::seed_from_u64(*seed),
            _ => StdRng::from_os_rng(),
        };
        Self {
            table: Table::new(Size::new(1000.0, 800.0)),
            hooks: TableHooks::new(),
            deck,
            rng,
            timers: Timers::new(),
            ticker: None,
            seconds: 0,
            won: false,
            ace_stacks: Vec::new(),
            play_stacks: Vec::new(),
        }
    }

    pub fn table(&self) -> &Table { &self.table }
    pub fn table_mut(&mut self) -> &mut Table { &mut self.table }
    pub fn moves(&self) -> u32 { self.hooks.moves }
    pub fn seconds(&self) -> u32 { self.seconds }
    pub fn is_won(&self) -> bool { self.won }
    pub fn ace_stacks(&self) -> &[EntityId] { &self.ace_stacks }
    pub fn play_stacks(&self) -> &[EntityId] { &self.play_stacks }
    pub fn draw_stack(&self) -> Option<EntityId> { self.hooks.draw_stack }
    pub fn pick_stack(&self) -> Option<EntityId> { self.hooks.pick_stack }

    /// 所有牌的 id
    pub fn cards(&self) -> Vec<EntityId> {
        self.table.ids().filter(|&id| self.table[id].data.is_card()).collect()
    }

    /// 从牌库翻牌（与点击牌库顶牌效果相同）
    pub fn draw(&mut self) -> usize {
        self.hooks.draw(&mut self.table)
    }

    pub fn restock(&mut self) -> usize {
        self.hooks.restock(&mut self.table)
    }

    /// 四个收牌区都完成
    pub fn all_aces_complete(&self) -> bool {
        !self.ace_stacks.is_empty() && self.ace_stacks.iter().all(|&s| stack::is_complete(&self.table, s))
    }

    /// 搭建牌桌：收牌区、牌列、牌库、翻牌区、重开按钮
    fn build(&mut self, play_area: Size) {
        self.table.clear();
        self.table.set_play_area(play_area);
        self.ace_stacks.clear();
        self.play_stacks.clear();

        for (i, suit) in Suit::ALL.iter().enumerate() {
            let entity = CardStack::entity(format!("ace-stack-{}", i + 1), column(i + 4), row(1), CardStack::ace(Some(*suit)));
            self.ace_stacks.push(self.table.add(entity));
        }

        for i in 0..PLAY_STACKS {
            let entity = CardStack::entity(format!("stack-{}", i + 1), column(i + 1), row(2), CardStack::play());
            self.play_stacks.push(self.table.add(entity));
        }

        let draw = CardStack::entity("draw-stack", column(1), row(1), CardStack::draw()).with_clickable(true);
        self.hooks.draw_stack = Some(self.table.add(draw));

        let pick = CardStack::entity("pick-stack", column(2), row(1), CardStack::pick());
        self.hooks.pick_stack = Some(self.table.add(pick));

        let restart = Entity::new(
            "restart-button",
            Rect::new(play_area.width - 75.0, 8.0, 35.0, 35.0),
            Piece::Button(Button::Restart),
        )
        .with_clickable(true);
        self.table.add(restart);
    }

    fn shuffled_deck(&mut self) -> Vec<CardFace> {
        match &self.deck {
            DeckSource::Fixed(faces) => faces.clone(),
            DeckSource::Random | DeckSource::Seeded(_) => {
                let mut faces = CardFace::standard_deck();
                faces.shuffle(&mut self.rng);
                faces
            }
        }
    }

    /// 洗牌发牌：第 k 轮发到第 k..7 列，剩下的进牌库并翻一次牌，然后清零计数
    fn deal(&mut self, now: Instant) {
        let faces = self.shuffled_deck();
        let mut cards: Vec<EntityId> = faces.into_iter().map(|f| self.table.spawn(Card::entity(f))).collect();

        for start in 0..PLAY_STACKS {
            for i in start..PLAY_STACKS {
                let Some(card) = cards.pop() else {
                    break;
                };
                if let Some(c) = self.table[card].data.as_card_mut() {
                    c.face_up = false;
                }
                self.table[card].visible = true;
                stack::add_card(&mut self.table, self.play_stacks[i], card);
            }
        }

        for &s in &self.play_stacks {
            if let Some(play) = self.table[s].data.as_stack_mut() {
                play.ready = true;
            }
            stack::update_stack(&mut self.table, s);
        }

        if let Some(draw) = self.hooks.draw_stack {
            stack::add_cards(&mut self.table, draw, &cards);
        }
        self.hooks.draw(&mut self.table);

        self.hooks.moves = 0;
        self.seconds = 0;
        self.won = false;
        if let Some(old) = self.ticker.take() {
            self.timers.cancel(old);
        }
        self.ticker = Some(self.timers.every(now, Duration::from_secs(1)));

        tracing::info!(draw_pile = cards.len(), "cards dealt");
    }

    fn draw_hud(&self, ctx: &mut dyn RenderContext) {
        ctx.draw_image("clock", Rect::new(25.0, 10.0, 25.0, 25.0));
        ctx.draw_text(&format_clock(self.seconds), 55.0, 30.0, 20.0, Color::BLACK);
        ctx.draw_image("moves", Rect::new(115.0, 10.0, 25.0, 25.0));
        ctx.draw_text(&self.hooks.moves.to_string(), 145.0, 30.0, 20.0, Color::BLACK);
    }

    fn draw_win_dialog(&self, ctx: &mut dyn RenderContext) {
        let play_area = self.table.play_area();
        let (w, h) = (300.0, 200.0);
        let left = (play_area.width - w) / 2.0;
        let top = (play_area.height - h) / 2.0;
        let dialog = Rect::new(left, top, w, h);

        ctx.draw_rect(dialog, &Paint::fill(Color::GRAY));
        ctx.draw_rect(dialog, &Paint::stroke(Color::BLACK, 2.0));

        ctx.draw_image("clock", Rect::new(left + 50.0, top + 25.0, 50.0, 50.0));
        ctx.draw_text(&format_clock(self.seconds), left + 110.0, top + 63.0, 40.0, Color::BLACK);
        ctx.draw_image("moves", Rect::new(left + 50.0, top + 100.0, 50.0, 50.0));
        ctx.draw_text(&self.hooks.moves.to_string(), left + 110.0, top + 140.0, 40.0, Color::BLACK);
    }
}

impl Default for SolitaireGame {
    fn default() -> Self {
        Self::new(DeckSource::Random)
    }
}

impl Scene for SolitaireGame {
    fn id(&self) -> &str {
        SCENE_ID
    }

    fn start(&mut self, settings: &GameSettings, now: Instant) {
        self.hooks.debug = settings.debug;
        self.hooks.requests.clear();
        self.build(settings.play_area);
        self.deal(now);
    }

    fn stop(&mut self) {
        self.timers.clear();
        self.ticker = None;
        self.table.stop();
    }

    fn pause(&mut self, paused: bool, now: Instant) {
        if paused {
            self.timers.suspend(now);
        } else {
            self.timers.resume(now);
        }
    }

    fn update(&mut self, ctx: &mut dyn RenderContext, settings: &GameSettings, now: Instant) {
        self.hooks.debug = settings.debug;

        for id in self.timers.poll(now) {
            if Some(id) == self.ticker {
                self.seconds += 1;
            }
        }

        self.table.update(&mut self.hooks, ctx);

        if self.all_aces_complete() {
            if !self.won {
                self.won = true;
                if let Some(ticker) = self.ticker.take() {
                    self.timers.cancel(ticker);
                }
                tracing::info!(moves = self.hooks.moves, seconds = self.seconds, "game won");
            }
            self.draw_win_dialog(ctx);
            return;
        }

        self.draw_hud(ctx);
    }

    fn on_pointer(&mut self, event: PointerEvent, _now: Instant) {
        self.table.on_pointer(&mut self.hooks, event);
    }

    fn cursor(&self) -> Cursor {
        self.table.cursor()
    }

    fn take_requests(&mut self) -> Vec<SceneRequest> {
        std::mem::take(&mut self.hooks.requests)
    }
}
