//! 纸牌游戏 (Klondike)
//!
//! 牌、牌堆和按钮都是 [`World`](crate::engine::World) 中的实体，
//! 具体类型由 [`Piece`] 区分；规则在 [`table`] 的钩子中实现。

mod card;
mod game;
pub mod stack;
pub mod table;

pub use card::{Card, CardFace, Rank, Suit};
pub use game::{format_clock, DeckSource, SolitaireGame, SCENE_ID};
pub use stack::{CardStack, StackKind};
pub use table::TableHooks;

use crate::engine::World;

pub const CARD_WIDTH: f32 = 125.0;
pub const CARD_HEIGHT: f32 = 175.0;

/// 翻开的牌在牌列中的间距
pub const FACE_UP_OFFSET: f32 = 40.0;
/// 扣着的牌在牌列中的间距
pub const FACE_DOWN_OFFSET: f32 = 15.0;
/// 翻牌区扇形展开的间距
pub const PICK_FAN_OFFSET: f32 = 23.0;
/// 放置失败时回到原位的速度
pub const SNAP_BACK_SPEED: f32 = 60.0;
/// 每次从牌库翻出的张数
pub const DRAW_COUNT: usize = 3;

/// 按钮
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Restart,
}

/// 牌桌上的对象
#[derive(Debug, Clone)]
pub enum Piece {
    Card(Card),
    Stack(CardStack),
    Button(Button),
}

impl Piece {
    pub fn as_card(&self) -> Option<&Card> {
        match self {
            Piece::Card(card) => Some(card),
            _ => None,
        }
    }

    pub fn as_card_mut(&mut self) -> Option<&mut Card> {
        match self {
            Piece::Card(card) => Some(card),
            _ => None,
        }
    }

    pub fn as_stack(&self) -> Option<&CardStack> {
        match self {
            Piece::Stack(stack) => Some(stack),
            _ => None,
        }
    }

    pub fn as_stack_mut(&mut self) -> Option<&mut CardStack> {
        match self {
            Piece::Stack(stack) => Some(stack),
            _ => None,
        }
    }

    pub fn as_button(&self) -> Option<Button> {
        match self {
            Piece::Button(button) => Some(*button),
            _ => None,
        }
    }

    pub fn is_card(&self) -> bool { self.as_card().is_some() }
    pub fn is_stack(&self) -> bool { self.as_stack().is_some() }
}

/// 牌桌
pub type Table = World<Piece>;
