//! 牌与牌堆单元测试：放置规则、收牌区完成判定、各牌堆排版

use crate::engine::EntityId;
use crate::solitaire::stack;
use crate::solitaire::{Card, CardFace, CardStack, Rank, StackKind, Suit, Table};
use crate::Size;
use std::collections::HashSet;

fn table() -> Table {
    Table::new(Size::new(1000.0, 800.0))
}

fn rank(value: u8) -> Rank {
    Rank::new(value).unwrap()
}

fn card(table: &mut Table, suit: Suit, value: u8) -> EntityId {
    let id = table.spawn(Card::entity(CardFace::new(suit, rank(value))));
    table[id].data.as_card_mut().unwrap().face_up = true;
    id
}

fn play_stack(table: &mut Table) -> EntityId {
    let mut s = CardStack::play();
    s.ready = true;
    table.add(CardStack::entity("stack-1", 25.0, 250.0, s))
}

/// 和发牌一样：先放牌，再标记就绪并排版
fn dealt_play_stack(table: &mut Table, cards: &[EntityId]) -> EntityId {
    let s = table.add(CardStack::entity("stack-1", 25.0, 250.0, CardStack::play()));
    stack::add_cards(table, s, cards);
    if let Some(stack) = table[s].data.as_stack_mut() {
        stack.ready = true;
    }
    stack::update_stack(table, s);
    s
}

fn face_up(table: &Table, id: EntityId) -> bool {
    table[id].data.as_card().unwrap().face_up
}

#[test]
fn test_standard_deck_has_52_unique_cards() {
    let deck = CardFace::standard_deck();
    assert_eq!(deck.len(), 52);
    let unique: HashSet<CardFace> = deck.iter().copied().collect();
    assert_eq!(unique.len(), 52);
    // 第一张是黑桃 A
    assert_eq!(deck[0], CardFace::new(Suit::Spades, Rank::ACE));
}

#[test]
fn test_card_names_and_images() {
    let face = CardFace::new(Suit::Hearts, Rank::QUEEN);
    assert_eq!(face.to_string(), "Queen of Hearts");
    assert_eq!(face.image_id(), "card-3-12");
    assert_eq!(CardFace::new(Suit::Clubs, rank(7)).to_string(), "7 of Clubs");

    assert!(Rank::new(1).is_none());
    assert!(Rank::new(15).is_none());
    assert_eq!(Rank::ACE.sequence(), 1);
    assert_eq!(Suit::from_index(2), Some(Suit::Diamonds));
}

/// 翻面与颜色
#[test]
fn test_card_flip_and_colors() {
    let mut heart = Card::new(CardFace::new(Suit::Hearts, rank(9)));
    assert!(!heart.face_up);
    heart.flip();
    assert!(heart.face_up);
    heart.flip();
    assert!(!heart.face_up);
    assert!(heart.is_red() && !heart.is_black());

    let club = Card::new(CardFace::new(Suit::Clubs, Rank::ACE));
    assert!(club.is_black() && !club.is_red());
    assert!(club.is_ace());
}

/// 空牌列只收 K
#[test]
fn test_empty_play_stack_accepts_only_king() {
    let mut t = table();
    let s = play_stack(&mut t);
    let king = card(&mut t, Suit::Clubs, 13);
    let queen = card(&mut t, Suit::Hearts, 12);
    let ace = card(&mut t, Suit::Spades, 14);

    assert!(stack::can_add_card(&t, s, king));
    assert!(!stack::can_add_card(&t, s, queen));
    assert!(!stack::can_add_card(&t, s, ace));
}

/// 黑桃 10 上只能放红色 9
#[test]
fn test_play_stack_needs_one_lower_and_opposite_color() {
    let mut t = table();
    let s = play_stack(&mut t);
    let ten = card(&mut t, Suit::Spades, 10);
    stack::add_card(&mut t, s, ten);

    let hearts_nine = card(&mut t, Suit::Hearts, 9);
    let diamonds_nine = card(&mut t, Suit::Diamonds, 9);
    let clubs_nine = card(&mut t, Suit::Clubs, 9);
    let hearts_eight = card(&mut t, Suit::Hearts, 8);
    let hearts_jack = card(&mut t, Suit::Hearts, 11);

    assert!(stack::can_add_card(&t, s, hearts_nine));
    assert!(stack::can_add_card(&t, s, diamonds_nine));
    assert!(!stack::can_add_card(&t, s, clubs_nine));
    assert!(!stack::can_add_card(&t, s, hearts_eight));
    assert!(!stack::can_add_card(&t, s, hearts_jack));
}

/// 牌列里 A 按 14 计：红 2 上不能放 A，红 A 上可以放黑 K
#[test]
fn test_play_stack_ace_ranks_above_king() {
    let mut t = table();
    let s = play_stack(&mut t);
    let red_two = card(&mut t, Suit::Hearts, 2);
    stack::add_card(&mut t, s, red_two);
    let black_ace = card(&mut t, Suit::Spades, 14);
    assert!(!stack::can_add_card(&t, s, black_ace));

    let mut t = table();
    let s = play_stack(&mut t);
    let red_ace = card(&mut t, Suit::Hearts, 14);
    stack::add_card(&mut t, s, red_ace);
    let black_king = card(&mut t, Suit::Clubs, 13);
    assert!(stack::can_add_card(&t, s, black_king));
}

/// 牌不能放回自己所在的牌列
#[test]
fn test_card_cannot_return_to_own_play_stack() {
    let mut t = table();
    let s = play_stack(&mut t);
    let king = card(&mut t, Suit::Clubs, 13);
    stack::add_card(&mut t, s, king);

    assert!(!stack::can_add_card(&t, s, king));
}

/// 收牌区：只收绑定花色，从 A 开始依次递增
#[test]
fn test_ace_stack_builds_suit_from_ace() {
    let mut t = table();
    let s = t.add(CardStack::entity("ace-stack-3", 500.0, 50.0, CardStack::ace(Some(Suit::Hearts))));

    let spades_ace = card(&mut t, Suit::Spades, 14);
    let hearts_two = card(&mut t, Suit::Hearts, 2);
    let hearts_ace = card(&mut t, Suit::Hearts, 14);
    assert!(!stack::can_add_card(&t, s, spades_ace));
    assert!(!stack::can_add_card(&t, s, hearts_two));
    assert!(stack::can_add_card(&t, s, hearts_ace));

    stack::add_card(&mut t, s, hearts_ace);
    let hearts_three = card(&mut t, Suit::Hearts, 3);
    let diamonds_two = card(&mut t, Suit::Diamonds, 2);
    assert!(stack::can_add_card(&t, s, hearts_two));
    assert!(!stack::can_add_card(&t, s, hearts_three));
    assert!(!stack::can_add_card(&t, s, diamonds_two));
}

/// 未绑定的收牌区收下第一张 A 后绑定花色
#[test]
fn test_unbound_ace_stack_binds_on_first_card() {
    let mut t = table();
    let s = t.add(CardStack::entity("ace-stack", 500.0, 50.0, CardStack::ace(None)));
    let clubs_ace = card(&mut t, Suit::Clubs, 14);
    let spades_ace = card(&mut t, Suit::Spades, 14);
    assert!(stack::can_add_card(&t, s, spades_ace));

    stack::add_card(&mut t, s, clubs_ace);

    assert_eq!(stack::kind(&t, s), Some(StackKind::Ace { suit: Some(Suit::Clubs) }));
    let spades_two = card(&mut t, Suit::Spades, 2);
    let clubs_two = card(&mut t, Suit::Clubs, 2);
    assert!(!stack::can_add_card(&t, s, spades_two));
    assert!(stack::can_add_card(&t, s, clubs_two));
}

/// 收牌区不接受带着一串牌的牌
#[test]
fn test_ace_stack_rejects_runs() {
    let mut t = table();
    let s = t.add(CardStack::entity("ace-stack-1", 500.0, 50.0, CardStack::ace(Some(Suit::Clubs))));
    let clubs_ace = card(&mut t, Suit::Clubs, 14);
    let follower = card(&mut t, Suit::Hearts, 13);
    t.add_child(clubs_ace, follower);

    assert!(!stack::can_add_card(&t, s, clubs_ace));
}

#[test]
fn test_draw_and_pick_accept_nothing() {
    let mut t = table();
    let draw = t.add(CardStack::entity("draw-stack", 25.0, 50.0, CardStack::draw()));
    let pick = t.add(CardStack::entity("pick-stack", 160.0, 50.0, CardStack::pick()));
    let king = card(&mut t, Suit::Clubs, 13);

    assert!(!stack::can_add_card(&t, draw, king));
    assert!(!stack::can_add_card(&t, pick, king));
}

/// 顶牌为 K 时收牌区完成
#[test]
fn test_ace_stack_complete_with_king_on_top() {
    let mut t = table();
    let s = t.add(CardStack::entity("ace-stack-4", 500.0, 50.0, CardStack::ace(Some(Suit::Spades))));
    assert!(!stack::is_complete(&t, s));

    let ace = card(&mut t, Suit::Spades, 14);
    stack::add_card(&mut t, s, ace);
    for value in 2..=12 {
        let c = card(&mut t, Suit::Spades, value);
        assert!(stack::can_add_card(&t, s, c));
        stack::add_card(&mut t, s, c);
    }
    assert!(!stack::is_complete(&t, s));

    let king = card(&mut t, Suit::Spades, 13);
    stack::add_card(&mut t, s, king);
    assert!(stack::is_complete(&t, s));
    assert_eq!(stack::card_count(&t, s), 13);
}

/// 牌列排版：扣着的牌间距 15，翻开的 40，只有顶牌翻开
#[test]
fn test_play_layout_offsets_and_face_up_top() {
    let mut t = table();
    let cards: Vec<EntityId> = [9, 8, 7].iter().map(|&v| card(&mut t, Suit::Clubs, v)).collect();
    for &c in &cards {
        t[c].data.as_card_mut().unwrap().face_up = false;
    }
    let s = dealt_play_stack(&mut t, &cards);

    assert!(!face_up(&t, cards[0]));
    assert!(!face_up(&t, cards[1]));
    assert!(face_up(&t, cards[2]));

    assert_eq!(t[cards[0]].top(), 250.0);
    assert_eq!(t[cards[1]].top(), 265.0);
    assert_eq!(t[cards[2]].top(), 280.0);
    assert!(cards.iter().all(|&c| t[c].left() == 25.0 && t[c].visible));

    assert!(!t[cards[0]].draggable);
    assert!(t[cards[2]].draggable);

    // 碰撞盒延伸到最后一张牌的底部
    assert_eq!(t[s].collider().unwrap().height(), 30.0 + 175.0);

    // 翻开后的下一张牌间距 40
    let red_six = card(&mut t, Suit::Hearts, 6);
    stack::add_card(&mut t, s, red_six);
    assert_eq!(t[red_six].top(), 320.0);
}

/// 发牌完成前牌列不排版
#[test]
fn test_play_layout_waits_until_ready() {
    let mut t = table();
    let s = t.add(CardStack::entity("stack-1", 25.0, 250.0, CardStack::play()));
    let c = card(&mut t, Suit::Clubs, 9);
    t[c].data.as_card_mut().unwrap().face_up = false;
    stack::add_card(&mut t, s, c);

    assert!(!face_up(&t, c));
    assert!(!t[c].draggable);
}

/// 翻牌区：最上面三张扇形展开，只有最上面一张能拖
#[test]
fn test_pick_layout_fans_top_three() {
    let mut t = table();
    let pick = t.add(CardStack::entity("pick-stack", 160.0, 50.0, CardStack::pick()));
    let cards: Vec<EntityId> = (2..=6).map(|v| card(&mut t, Suit::Diamonds, v)).collect();
    stack::add_cards(&mut t, pick, &cards);

    for &c in &cards[..2] {
        assert!(!t[c].visible);
        assert!(!face_up(&t, c));
    }
    for (i, &c) in cards[2..].iter().enumerate() {
        assert!(t[c].visible);
        assert!(face_up(&t, c));
        assert_eq!(t[c].left(), 160.0 + 23.0 * i as f32);
        assert_eq!(t[c].top(), 50.0);
    }
    assert!(!t[cards[3]].draggable);
    assert!(t[cards[4]].draggable);
}

/// 牌库：全部扣着，只显示顶牌且顶牌可点击
#[test]
fn test_draw_layout_shows_clickable_top() {
    let mut t = table();
    let draw = t.add(CardStack::entity("draw-stack", 25.0, 50.0, CardStack::draw()));
    let cards: Vec<EntityId> = (2..=4).map(|v| card(&mut t, Suit::Clubs, v)).collect();
    stack::add_cards(&mut t, draw, &cards);

    assert!(cards.iter().all(|&c| !face_up(&t, c)));
    assert!(!t[cards[0]].visible);
    assert!(t[cards[2]].visible);
    assert!(t[cards[2]].clickable);
    assert!(!t[cards[1]].clickable);
}

/// 取牌从顶部开始
#[test]
fn test_draw_cards_takes_from_top() {
    let mut t = table();
    let draw = t.add(CardStack::entity("draw-stack", 25.0, 50.0, CardStack::draw()));
    let cards: Vec<EntityId> = (2..=6).map(|v| card(&mut t, Suit::Clubs, v)).collect();
    stack::add_cards(&mut t, draw, &cards);

    let drawn = stack::draw_cards(&mut t, draw, 3);
    assert_eq!(drawn, vec![cards[4], cards[3], cards[2]]);
    assert_eq!(stack::top_card(&t, draw), Some(cards[1]));

    let rest = stack::draw_cards(&mut t, draw, 3);
    assert_eq!(rest.len(), 2);
    assert_eq!(stack::card_count(&t, draw), 0);
}
