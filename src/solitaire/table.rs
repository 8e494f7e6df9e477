//! 牌桌规则 - 牌、牌堆、按钮对实体事件的响应以及它们的绘制

use super::stack::{self, StackKind};
use super::{Button, Piece, Table, DRAW_COUNT, FACE_UP_OFFSET, SNAP_BACK_SPEED};
use crate::engine::{EntityEvent, EntityHooks, EntityId, RenderContext, SceneRequest};
use crate::{Color, Paint, Point, Rect};

/// 牌桌钩子，持有计步和场景请求
#[derive(Debug, Default)]
pub struct TableHooks {
    pub moves: u32,
    pub debug: bool,
    pub draw_stack: Option<EntityId>,
    pub pick_stack: Option<EntityId>,
    pub requests: Vec<SceneRequest>,
}

impl TableHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从牌库翻最多三张到翻牌区，计一步
    pub fn draw(&mut self, table: &mut Table) -> usize {
        let (Some(draw), Some(pick)) = (self.draw_stack, self.pick_stack) else {
            return 0;
        };
        let drawn = draw_to_pick(table, draw, pick);
        self.moves += 1;
        tracing::debug!(drawn, moves = self.moves, "draw");
        drawn
    }

    /// 把翻牌区的牌全部扣回牌库，不计步
    pub fn restock(&mut self, table: &mut Table) -> usize {
        let (Some(draw), Some(pick)) = (self.draw_stack, self.pick_stack) else {
            return 0;
        };
        let count = restock(table, draw, pick);
        tracing::debug!(count, "restock");
        count
    }

    fn on_card_event(&mut self, table: &mut Table, id: EntityId, event: EntityEvent) {
        match event {
            EntityEvent::CollisionEnter(other) => {
                if let Some(card) = table[id].data.as_card_mut() {
                    card.collisions.retain(|&c| c != other);
                    card.collisions.push(other);
                }
            }
            EntityEvent::CollisionLeave(other) => {
                if let Some(card) = table[id].data.as_card_mut() {
                    card.collisions.retain(|&c| c != other);
                }
            }
            EntityEvent::Drag(_) => self.pick_up(table, id),
            EntityEvent::Dragging(p) | EntityEvent::Moving(p) => follow(table, id, p),
            EntityEvent::Moved => settle(table, id),
            EntityEvent::Drop(_) => self.drop_card(table, id),
            EntityEvent::Click(_) => {
                let Some(group) = table[id].group() else {
                    return;
                };
                if stack::kind(table, group) == Some(StackKind::Draw)
                    && stack::top_card(table, group) == Some(id)
                {
                    self.draw(table);
                }
            }
            _ => {}
        }
    }

    /// 开始拖拽：记录原位置，启用碰撞盒，牌列中压在上面的牌一起拿起
    fn pick_up(&mut self, table: &mut Table, id: EntityId) {
        let origin = table[id].position();
        if let Some(card) = table[id].data.as_card_mut() {
            card.origin = Some(origin);
        }
        table[id].set_collider_enabled(true);

        let Some(group) = table[id].group() else {
            return;
        };
        if stack::kind(table, group) != Some(StackKind::Play) {
            return;
        }

        let siblings = table.children(group);
        let Some(index) = siblings.iter().position(|&c| c == id) else {
            return;
        };
        let run = siblings[index + 1..].to_vec();
        for &card in &run {
            table.add_child(id, card);
        }
        follow(table, id, origin);
    }

    /// 放下：找到最后一个接受这张牌的重叠牌堆，否则回到原位
    fn drop_card(&mut self, table: &mut Table, id: EntityId) {
        table[id].set_collider_enabled(false);

        let (collisions, origin) = match table[id].data.as_card_mut() {
            Some(card) => (std::mem::take(&mut card.collisions), card.origin.take()),
            None => return,
        };

        for &other in &collisions {
            if let Some(s) = table[other].data.as_stack_mut() {
                s.highlighted = false;
            }
        }

        let target = collisions
            .iter()
            .rev()
            .copied()
            .find(|&other| table[other].data.is_stack() && stack::can_add_card(table, other, id));

        match target {
            Some(destination) => {
                let source = table[id].group();
                let mut cards = vec![id];
                cards.extend(table.reset_children(id));
                if let Some(source) = source {
                    stack::remove_cards(table, source, &cards);
                }
                stack::add_cards(table, destination, &cards);
                self.moves += 1;
                tracing::debug!(
                    card = %table[id].name,
                    to = %table[destination].name,
                    count = cards.len(),
                    moves = self.moves,
                    "card moved"
                );
            }
            None => match origin {
                Some(origin) => table.move_to(id, origin, SNAP_BACK_SPEED),
                None => settle(table, id),
            },
        }
    }

    fn on_stack_event(&mut self, table: &mut Table, id: EntityId, event: EntityEvent) {
        let Some(kind) = stack::kind(table, id) else {
            return;
        };
        let highlights = matches!(kind, StackKind::Play | StackKind::Ace { .. });

        match event {
            EntityEvent::Click(_) if kind == StackKind::Draw && stack::card_count(table, id) == 0 => {
                self.restock(table);
            }
            EntityEvent::CollisionEnter(other) if highlights && table[other].data.is_card() => {
                let accepts = stack::can_add_card(table, id, other);
                if let Some(s) = table[id].data.as_stack_mut() {
                    s.highlighted = accepts;
                }
            }
            EntityEvent::CollisionLeave(_) if highlights => {
                if let Some(s) = table[id].data.as_stack_mut() {
                    s.highlighted = false;
                }
            }
            _ => {}
        }
    }

    fn draw_card(&self, table: &Table, id: EntityId, ctx: &mut dyn RenderContext) {
        let entity = &table[id];
        let Some(card) = entity.data.as_card() else {
            return;
        };
        let frame = entity.frame();

        if card.face_up {
            ctx.draw_image(&card.image_id(), frame);
        } else {
            ctx.draw_image("card-back", frame);
        }

        if !self.debug {
            return;
        }
        if let Some(collider) = entity.collider().filter(|c| c.enabled) {
            ctx.set_alpha(0.3);
            ctx.draw_rect(collider.rect, &Paint::fill(Color::RED));
            ctx.set_alpha(1.0);
            let label = format!(
                "({}, {}, {}, {})",
                collider.left().round(),
                collider.top().round(),
                collider.width(),
                collider.height()
            );
            ctx.draw_text(&label, frame.x, frame.bottom() + 10.0, 8.0, Color::BLACK);
        }
        ctx.draw_text(&card.description(), frame.x + 20.0, frame.y + 10.0, 10.0, Color::BLACK);
    }

    fn draw_stack(&self, table: &Table, id: EntityId, ctx: &mut dyn RenderContext) {
        let entity = &table[id];
        let Some(s) = entity.data.as_stack() else {
            return;
        };
        let frame = entity.frame();

        ctx.draw_round_rect(frame, 10.0, &Paint::stroke(Color::GRAY, 1.2));

        if s.highlighted {
            if let Some(collider) = entity.collider() {
                let paint = Paint::stroke(Color::HIGHLIGHT, 3.0).with_dash(5.0, 3.0);
                ctx.draw_round_rect(collider.rect.outset(4.0), 10.0, &paint);
            }
        }

        if self.debug {
            if let Some(collider) = entity.collider().filter(|c| c.enabled) {
                ctx.set_alpha(0.3);
                ctx.draw_rect(collider.rect, &Paint::fill(Color::RED));
                ctx.set_alpha(1.0);
                let label = format!(
                    "Collider ({}, {}, {}, {})",
                    collider.left().round(),
                    collider.top().round(),
                    collider.width(),
                    collider.height()
                );
                ctx.draw_text(&label, frame.x, frame.y - 1.0, 8.0, Color::BLACK);
            }
            let count = format!("Cards {}", table.children(id).len());
            ctx.draw_text(&count, frame.x, frame.y - 10.0, 12.0, Color::BLACK);
        }

        match s.kind {
            StackKind::Ace { suit: Some(suit) } if table.children(id).is_empty() => {
                ctx.set_alpha(0.1);
                ctx.draw_image(&format!("{}-14-stack", suit.index()), frame);
                ctx.set_alpha(1.0);
            }
            StackKind::Draw => {
                let side = frame.width - 40.0;
                let ring = Rect::new(
                    frame.x + (frame.width - side) / 2.0,
                    frame.y + (frame.height - side) / 2.0,
                    side,
                    side,
                );
                ctx.set_alpha(0.2);
                ctx.draw_round_rect(ring, side / 2.0, &Paint::stroke(Color::WHITE, 9.0));
                ctx.set_alpha(1.0);
            }
            _ => {}
        }
    }
}

impl EntityHooks<Piece> for TableHooks {
    fn draw(&mut self, table: &Table, id: EntityId, ctx: &mut dyn RenderContext) {
        match &table[id].data {
            Piece::Card(_) => self.draw_card(table, id, ctx),
            Piece::Stack(_) => self.draw_stack(table, id, ctx),
            Piece::Button(Button::Restart) => {
                ctx.draw_image("play", table[id].frame());
            }
        }
    }

    fn on_event(&mut self, table: &mut Table, id: EntityId, event: EntityEvent) {
        if table[id].data.is_card() {
            self.on_card_event(table, id, event);
        } else if table[id].data.is_stack() {
            self.on_stack_event(table, id, event);
        } else if let (Some(Button::Restart), EntityEvent::Click(_)) = (table[id].data.as_button(), event) {
            tracing::info!("restart requested");
            self.requests.push(SceneRequest::Restart);
        }
    }
}

/// 跟随的牌排在领头牌下方
fn follow(table: &mut Table, id: EntityId, lead: Point) {
    let run = table.children(id).to_vec();
    for (k, &card) in run.iter().enumerate() {
        table[card].set_position(lead.x, lead.y + FACE_UP_OFFSET * (k + 1) as f32);
    }
}

/// 回到原位后把跟随的牌还给原牌堆并重新排版
fn settle(table: &mut Table, id: EntityId) {
    let run = table.reset_children(id);
    let Some(source) = table[id].group() else {
        return;
    };
    for &card in &run {
        table.add_child(source, card);
    }
    stack::update_stack(table, source);
}

/// 从牌库顶部取最多三张放到翻牌区
pub fn draw_to_pick(table: &mut Table, draw: EntityId, pick: EntityId) -> usize {
    let cards = stack::draw_cards(table, draw, DRAW_COUNT);
    stack::add_cards(table, pick, &cards);
    cards.len()
}

/// 翻牌区全部扣回牌库，顺序反转后与原牌库一致
pub fn restock(table: &mut Table, draw: EntityId, pick: EntityId) -> usize {
    let count = stack::card_count(table, pick);
    let cards = stack::draw_cards(table, pick, count);
    for &card in &cards {
        if let Some(c) = table[card].data.as_card_mut() {
            c.face_up = false;
        }
        table[card].draggable = false;
    }
    stack::add_cards(table, draw, &cards);
    cards.len()
}
