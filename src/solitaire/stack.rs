//! 牌堆 - 四种牌堆的放置规则与布局

use super::card::{Card, Rank, Suit};
use super::{Piece, Table, CARD_HEIGHT, CARD_WIDTH, FACE_DOWN_OFFSET, FACE_UP_OFFSET, PICK_FAN_OFFSET};
use crate::engine::{Entity, EntityId};
use crate::{Rect, Size};

/// 牌堆种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackKind {
    /// 牌列：空列只收 K，否则收小一点且颜色相反的牌
    Play,
    /// 收牌区：绑定一个花色，从 A 依次到 K
    Ace { suit: Option<Suit> },
    /// 牌库：不接受拖放，点击翻牌
    Draw,
    /// 翻牌区：不接受拖放，展开最上面三张
    Pick,
}

/// 牌堆
#[derive(Debug, Clone)]
pub struct CardStack {
    pub kind: StackKind,
    /// 拖拽中的牌可以放在这里
    pub highlighted: bool,
    /// 牌列发完牌后才开始排版
    pub ready: bool,
}

impl CardStack {
    pub fn new(kind: StackKind) -> Self {
        Self { kind, highlighted: false, ready: false }
    }

    pub fn play() -> Self { Self::new(StackKind::Play) }
    pub fn ace(suit: Option<Suit>) -> Self { Self::new(StackKind::Ace { suit }) }
    pub fn draw() -> Self { Self::new(StackKind::Draw) }
    pub fn pick() -> Self { Self::new(StackKind::Pick) }

    /// 放置规则（不考虑牌当前所在的牌堆）
    pub fn accepts(&self, top: Option<&Card>, card: &Card) -> bool {
        match self.kind {
            StackKind::Play => match top {
                None => card.rank().value() == 13,
                Some(top) => {
                    card.rank().value() + 1 == top.rank().value() && top.is_red() != card.is_red()
                }
            },
            StackKind::Ace { suit } => {
                if suit.is_some_and(|s| s != card.suit()) {
                    return false;
                }
                match top {
                    None => card.is_ace(),
                    Some(top) => {
                        top.suit() == card.suit() && top.rank().sequence() + 1 == card.rank().sequence()
                    }
                }
            }
            StackKind::Draw | StackKind::Pick => false,
        }
    }

    /// 牌堆实体，碰撞盒与外框一致
    pub fn entity(name: impl Into<String>, x: f32, y: f32, stack: CardStack) -> Entity<Piece> {
        Entity::new(name, Rect::new(x, y, CARD_WIDTH, CARD_HEIGHT), Piece::Stack(stack)).with_collider(true)
    }
}

fn stack_of(table: &Table, id: EntityId) -> Option<&CardStack> {
    table.get(id).and_then(|e| e.data.as_stack())
}

fn card_of(table: &Table, id: EntityId) -> Option<&Card> {
    table.get(id).and_then(|e| e.data.as_card())
}

pub fn kind(table: &Table, stack: EntityId) -> Option<StackKind> {
    stack_of(table, stack).map(|s| s.kind)
}

pub fn top_card(table: &Table, stack: EntityId) -> Option<EntityId> {
    table.last_child(stack)
}

pub fn card_count(table: &Table, stack: EntityId) -> usize {
    table.children(stack).len()
}

/// 这张牌（连同它带着的一串牌）能否放到牌堆上
pub fn can_add_card(table: &Table, stack: EntityId, card: EntityId) -> bool {
    let (Some(target), Some(c)) = (stack_of(table, stack), card_of(table, card)) else {
        return false;
    };

    match target.kind {
        // 不能放回自己所在的牌列
        StackKind::Play if table[card].group() == Some(stack) => return false,
        // 收牌区一次只收一张
        StackKind::Ace { .. } if !table[card].children().is_empty() => return false,
        _ => {}
    }

    let top = top_card(table, stack).and_then(|t| card_of(table, t));
    target.accepts(top, c)
}

pub fn add_card(table: &mut Table, stack: EntityId, card: EntityId) {
    // 未绑定花色的收牌区在收到第一张牌时绑定
    let suit = card_of(table, card).map(Card::suit);
    if let Some(StackKind::Ace { suit: bound }) = table[stack].data.as_stack_mut().map(|s| &mut s.kind) {
        if bound.is_none() {
            *bound = suit;
        }
    }

    table.add_child(stack, card);
    update_stack(table, stack);
}

pub fn add_cards(table: &mut Table, stack: EntityId, cards: &[EntityId]) {
    for &card in cards {
        add_card(table, stack, card);
    }
}

pub fn remove_card(table: &mut Table, stack: EntityId, card: EntityId) {
    table.remove_child(stack, card);
    update_stack(table, stack);
}

pub fn remove_cards(table: &mut Table, stack: EntityId, cards: &[EntityId]) {
    for &card in cards {
        remove_card(table, stack, card);
    }
}

/// 从顶部取出最多 `count` 张牌，先取出的在前
pub fn draw_cards(table: &mut Table, stack: EntityId, count: usize) -> Vec<EntityId> {
    let mut drawn = Vec::with_capacity(count);
    for _ in 0..count {
        let Some(top) = top_card(table, stack) else {
            break;
        };
        table.remove_child(stack, top);
        drawn.push(top);
    }
    update_stack(table, stack);
    drawn
}

/// 收牌区顶牌为 K 即完成
pub fn is_complete(table: &Table, stack: EntityId) -> bool {
    top_card(table, stack)
        .and_then(|t| card_of(table, t))
        .is_some_and(|c| c.rank() == Rank::KING)
}

fn set_face_up(table: &mut Table, card: EntityId, face_up: bool) {
    if let Some(c) = table[card].data.as_card_mut() {
        c.face_up = face_up;
    }
}

fn is_face_up(table: &Table, card: EntityId) -> bool {
    card_of(table, card).is_some_and(|c| c.face_up)
}

/// 按牌堆种类重新排版
pub fn update_stack(table: &mut Table, stack: EntityId) {
    let Some((kind, ready)) = stack_of(table, stack).map(|s| (s.kind, s.ready)) else {
        return;
    };
    match kind {
        StackKind::Play => {
            if ready {
                layout_play(table, stack);
            }
        }
        StackKind::Ace { .. } => layout_ace(table, stack),
        StackKind::Draw => layout_draw(table, stack),
        StackKind::Pick => layout_pick(table, stack),
    }
}

fn layout_play(table: &mut Table, stack: EntityId) {
    let cards = table.children(stack).to_vec();
    let frame = table[stack].frame();

    if let Some(&top) = cards.last() {
        set_face_up(table, top, true);
    }

    let mut collider_height = frame.height;
    let mut previous: Option<(f32, bool)> = None;

    for &card in &cards {
        let face_up = is_face_up(table, card);
        let top = match previous {
            None => frame.y,
            Some((prev_top, prev_up)) => prev_top + if prev_up { FACE_UP_OFFSET } else { FACE_DOWN_OFFSET },
        };

        let entity = &mut table[card];
        entity.set_position(frame.x, top);
        entity.visible = true;
        entity.clickable = false;
        entity.draggable = face_up;

        collider_height = collider_height.max(top - frame.y + frame.height);
        previous = Some((top, face_up));
    }

    // 碰撞盒覆盖整列
    if let Some(collider) = table[stack].collider_mut() {
        collider.set_size(Size::new(frame.width, collider_height));
    }
}

fn layout_ace(table: &mut Table, stack: EntityId) {
    let cards = table.children(stack).to_vec();
    for &card in &cards {
        let entity = &mut table[card];
        entity.visible = false;
        entity.draggable = false;
        entity.clickable = false;
    }
    if let Some(&top) = cards.last() {
        table[top].visible = true;
        set_face_up(table, top, true);
    }
}

fn layout_draw(table: &mut Table, stack: EntityId) {
    let cards = table.children(stack).to_vec();
    let origin = table[stack].position();
    for &card in &cards {
        set_face_up(table, card, false);
        let entity = &mut table[card];
        entity.set_position(origin.x, origin.y);
        entity.visible = false;
        entity.draggable = false;
        entity.clickable = false;
    }
    if let Some(&top) = cards.last() {
        table[top].visible = true;
        table[top].clickable = true;
    }
}

fn layout_pick(table: &mut Table, stack: EntityId) {
    let cards = table.children(stack).to_vec();
    let origin = table[stack].position();
    for &card in &cards {
        set_face_up(table, card, false);
        let entity = &mut table[card];
        entity.set_position(origin.x, origin.y);
        entity.visible = false;
        entity.draggable = false;
        entity.clickable = false;
    }

    // 最上面三张扇形展开，只有最上面一张能拖
    let start = cards.len().saturating_sub(3);
    for (i, &card) in cards.iter().enumerate().skip(start) {
        set_face_up(table, card, true);
        let entity = &mut table[card];
        entity.visible = true;
        entity.draggable = i == cards.len() - 1;
        entity.set_position(origin.x + PICK_FAN_OFFSET * (i - start) as f32, origin.y);
    }
}
