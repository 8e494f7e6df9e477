//! 扑克牌

use super::{Piece, CARD_HEIGHT, CARD_WIDTH};
use crate::engine::{Entity, EntityId};
use crate::{Point, Rect};
use std::fmt;

/// 花色，数值与图片 id 中的编号一致
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Suit {
    Clubs = 1,
    Diamonds = 2,
    Hearts = 3,
    Spades = 4,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];

    pub fn from_index(index: u8) -> Option<Suit> {
        match index {
            1 => Some(Suit::Clubs),
            2 => Some(Suit::Diamonds),
            3 => Some(Suit::Hearts),
            4 => Some(Suit::Spades),
            _ => None,
        }
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn is_red(self) -> bool {
        matches!(self, Suit::Diamonds | Suit::Hearts)
    }

    pub fn name(self) -> &'static str {
        match self {
            Suit::Clubs => "Clubs",
            Suit::Diamonds => "Diamonds",
            Suit::Hearts => "Hearts",
            Suit::Spades => "Spades",
        }
    }
}

/// 点数 2..=14，14 为 A，11/12/13 为 J/Q/K
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rank(u8);

impl Rank {
    pub const TWO: Rank = Rank(2);
    pub const TEN: Rank = Rank(10);
    pub const JACK: Rank = Rank(11);
    pub const QUEEN: Rank = Rank(12);
    pub const KING: Rank = Rank(13);
    pub const ACE: Rank = Rank(14);

    pub fn new(value: u8) -> Option<Rank> {
        (2..=14).contains(&value).then_some(Rank(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// 接龙顺序中的位置：A 最小 (1)，K 最大 (13)
    pub fn sequence(self) -> u8 {
        if self.is_ace() { 1 } else { self.0 }
    }

    pub fn is_ace(self) -> bool {
        self.0 == 14
    }

    pub fn name(self) -> String {
        match self.0 {
            11 => "Jack".into(),
            12 => "Queen".into(),
            13 => "King".into(),
            14 => "Ace".into(),
            n => n.to_string(),
        }
    }

    /// 从 A 到 2 降序排列
    pub fn descending() -> impl Iterator<Item = Rank> {
        (2..=14u8).rev().map(Rank)
    }
}

/// 牌面（花色 + 点数）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CardFace {
    pub suit: Suit,
    pub rank: Rank,
}

impl CardFace {
    pub fn new(suit: Suit, rank: Rank) -> Self {
        Self { suit, rank }
    }

    /// 图片 id：`card-{suit}-{rank}`
    pub fn image_id(&self) -> String {
        format!("card-{}-{}", self.suit.index(), self.rank.value())
    }

    pub fn is_red(&self) -> bool {
        self.suit.is_red()
    }

    /// 一副 52 张牌，花色 4→1、点数 A→2 的顺序
    pub fn standard_deck() -> Vec<CardFace> {
        let mut deck = Vec::with_capacity(52);
        for suit in Suit::ALL.iter().rev() {
            for rank in Rank::descending() {
                deck.push(CardFace::new(*suit, rank));
            }
        }
        deck
    }
}

impl fmt::Display for CardFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {}", self.rank.name(), self.suit.name())
    }
}

/// 牌
#[derive(Debug, Clone)]
pub struct Card {
    pub face: CardFace,
    pub face_up: bool,
    /// 当前重叠的对象，最近进入的在最后
    pub collisions: Vec<EntityId>,
    /// 拖拽前的位置，放置失败时回到这里
    pub origin: Option<Point>,
}

impl Card {
    pub fn new(face: CardFace) -> Self {
        Self {
            face,
            face_up: false,
            collisions: Vec::new(),
            origin: None,
        }
    }

    pub fn suit(&self) -> Suit { self.face.suit }
    pub fn rank(&self) -> Rank { self.face.rank }
    pub fn is_ace(&self) -> bool { self.face.rank.is_ace() }
    pub fn is_red(&self) -> bool { self.face.is_red() }
    pub fn is_black(&self) -> bool { !self.face.is_red() }

    pub fn flip(&mut self) {
        self.face_up = !self.face_up;
    }

    /// 如 "Queen of Hearts"
    pub fn description(&self) -> String {
        self.face.to_string()
    }

    pub fn image_id(&self) -> String {
        self.face.image_id()
    }

    /// 牌实体：默认隐藏，碰撞盒仅在拖拽时启用
    pub fn entity(face: CardFace) -> Entity<Piece> {
        let mut entity = Entity::new(
            face.image_id(),
            Rect::new(0.0, 0.0, CARD_WIDTH, CARD_HEIGHT),
            Piece::Card(Card::new(face)),
        )
        .with_collider(false);
        entity.visible = false;
        entity
    }
}
