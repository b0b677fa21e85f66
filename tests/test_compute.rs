mod common;

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::SeedableRng;

use ocean_duel::assets::Image;
use ocean_duel::compute::*;
use ocean_duel::config::{GameConfig, ShieldStyle};
use ocean_duel::entities::ShipSlot;
use ocean_duel::geometry::{Rect, Vec2};
use ocean_duel::input::Key;

use common::{frames, DrawCall, RecordingRenderer};

// Distinct sizes so draw calls can be told apart.
const SHIP: (u32, u32) = (40, 40);
const BLINK: (u32, u32) = (30, 30);
const SHIELD1: (u32, u32) = (60, 60);
const BIRD: (u32, u32) = (16, 16);
const BOOM: (u32, u32) = (100, 100);
const BG: (u32, u32) = (800, 450);

fn sprites() -> Sprites {
    Sprites {
        idle: [frames(10, SHIP.0, SHIP.1), frames(10, SHIP.0, SHIP.1)],
        moving: [frames(10, SHIP.0, SHIP.1), frames(10, SHIP.0, SHIP.1)],
        blink: frames(8, BLINK.0, BLINK.1),
        shields: [frames(8, SHIELD1.0, SHIELD1.1), frames(7, 56, 56)],
        bird: frames(6, BIRD.0, BIRD.1),
        explosion: frames(10, BOOM.0, BOOM.1),
        background: Image::solid(BG.0, BG.1, [0, 40, 90, 255]),
    }
}

fn make_state_with(config: &GameConfig) -> GameState {
    init_state(config, &sprites(), &mut StdRng::seed_from_u64(42))
}

fn make_state() -> GameState {
    make_state_with(&GameConfig::default())
}

fn keys(list: &[Key]) -> HashSet<Key> {
    list.iter().copied().collect()
}

/// Drag ship 2 on top of ship 1; the bands never overlap in normal play.
fn force_overlap(state: &mut GameState) {
    state.ships[1].entity.rect = state.ships[0].rect();
}

fn first_index(r: &RecordingRenderer, size: (u32, u32)) -> Option<usize> {
    r.calls.iter().position(|c| {
        matches!(c, DrawCall::Image { width, height, .. } if (*width, *height) == size)
    })
}

fn last_index(r: &RecordingRenderer, size: (u32, u32)) -> Option<usize> {
    r.calls.iter().rposition(|c| {
        matches!(c, DrawCall::Image { width, height, .. } if (*width, *height) == size)
    })
}

// ── init_state ────────────────────────────────────────────────────────────────

#[test]
fn init_state_places_ships() {
    let s = make_state();
    assert_eq!(s.ship(ShipSlot::One).center(), Vec2::new(100, 200));
    assert_eq!(s.ship(ShipSlot::Two).center(), Vec2::new(1000, 500));
    assert!(s.ships.iter().all(|ship| ship.alive && !ship.blinking));
}

#[test]
fn init_state_bounds_are_fixed_bands() {
    let s = make_state();
    assert_eq!(s.ship(ShipSlot::One).bounds, Rect::from_edges(0, 0, 1600, 400));
    assert_eq!(s.ship(ShipSlot::Two).bounds, Rect::from_edges(0, 500, 1600, 900));
}

#[test]
fn init_state_collections() {
    let s = make_state();
    assert_eq!(s.birds.len(), 5);
    assert!(s.explosions.is_empty());
    assert!(s.pending_explosions.iter().all(Option::is_some));
    assert_eq!(s.status, GameStatus::Running);
    assert_eq!(s.frame, 0);
    assert_eq!(s.arena, (1600, 900));
}

#[test]
fn init_state_applies_config_motion() {
    let config = GameConfig {
        ship_speed: 4,
        blink_distance: 100,
        bird_count: 2,
        ..GameConfig::default()
    };
    let s = make_state_with(&config);
    assert_eq!(s.ships[0].speed, 4);
    assert_eq!(s.ships[1].blink_remaining_distance, 100);
    assert_eq!(s.birds.len(), 2);
}

// ── tick — movement ───────────────────────────────────────────────────────────

#[test]
fn tick_moves_ship_one_with_arrows() {
    let mut s = make_state();
    let mut r = RecordingRenderer::new();
    for _ in 0..10 {
        s.tick(&keys(&[Key::Right]), &mut r);
    }
    assert_eq!(s.ship(ShipSlot::One).center(), Vec2::new(200, 200));
    // Ship 2 only gets pulled down into its band.
    assert_eq!(s.ship(ShipSlot::Two).center(), Vec2::new(1000, 520));
    assert_eq!(s.frame, 10);
}

#[test]
fn tick_moves_both_ships_at_once() {
    let mut s = make_state();
    s.tick(&keys(&[Key::Down, Key::A]), &mut RecordingRenderer::new());
    assert_eq!(s.ship(ShipSlot::One).center(), Vec2::new(100, 210));
    assert_eq!(s.ship(ShipSlot::Two).center(), Vec2::new(990, 520));
}

#[test]
fn tick_first_clamp_pulls_ship_two_into_band() {
    // Ship 2 starts with its top edge at 480, above its band.
    let mut s = make_state();
    s.tick(&HashSet::new(), &mut RecordingRenderer::new());
    assert_eq!(s.ship(ShipSlot::Two).rect().top(), 500);
}

// ── tick — blink ──────────────────────────────────────────────────────────────

#[test]
fn blink_key_starts_rightward_dash() {
    let mut s = make_state();
    s.tick(&keys(&[Key::RightShift]), &mut RecordingRenderer::new());
    let ship = s.ship(ShipSlot::One);
    assert!(ship.blinking);
    assert_eq!(ship.blink_direction, Vec2::RIGHT);
    assert_eq!(ship.center(), Vec2::new(120, 200));
    assert!(s.blinks[0].active);
    assert!(!s.blinks[1].active);
}

#[test]
fn blink_key_with_left_dashes_left() {
    let mut s = make_state();
    s.tick(&keys(&[Key::LeftShift, Key::A]), &mut RecordingRenderer::new());
    let ship = s.ship(ShipSlot::Two);
    assert!(ship.blinking);
    assert_eq!(ship.blink_direction, Vec2::LEFT);
    assert!(s.blinks[1].mirrored);
    // Dash moves 20, the held A key does not add another 10.
    assert_eq!(ship.center().x, 980);
}

#[test]
fn holding_blink_key_does_not_restart_dash() {
    let mut s = make_state();
    let mut r = RecordingRenderer::new();
    s.tick(&keys(&[Key::RightShift]), &mut r);
    s.tick(&keys(&[Key::RightShift]), &mut r);
    assert_eq!(s.ship(ShipSlot::One).blink_remaining_distance, 460);
}

#[test]
fn dash_completes_after_twenty_five_ticks() {
    let mut s = make_state();
    let mut r = RecordingRenderer::new();
    s.tick(&keys(&[Key::RightShift]), &mut r);
    for _ in 0..24 {
        s.tick(&HashSet::new(), &mut r);
    }
    let ship = s.ship(ShipSlot::One);
    assert!(!ship.blinking);
    assert!(!s.blinks[0].active);
    assert_eq!(ship.blink_remaining_distance, 500);
    assert_eq!(ship.center(), Vec2::new(600, 200));
}

// ── tick — collision & explosions ─────────────────────────────────────────────

#[test]
fn collision_kills_both_ships_in_one_tick() {
    let mut s = make_state();
    force_overlap(&mut s);
    let centers = [s.ships[0].center(), s.ships[1].center()];

    assert!(s.tick(&HashSet::new(), &mut RecordingRenderer::new()));
    assert!(s.ships.iter().all(|ship| !ship.alive));
    assert_eq!(s.status, GameStatus::Ended);
    assert_eq!(s.explosions.len(), 2);
    assert_eq!(s.explosions[0].rect.center(), centers[0]);
    assert_eq!(s.explosions[1].rect.center(), centers[1]);
    assert!(s.pending_explosions.iter().all(Option::is_none));
}

#[test]
fn collision_fires_only_once() {
    let mut s = make_state();
    force_overlap(&mut s);
    let mut r = RecordingRenderer::new();
    assert!(s.tick(&HashSet::new(), &mut r));
    for _ in 0..10 {
        force_overlap(&mut s);
        assert!(!s.tick(&HashSet::new(), &mut r));
    }
    assert_eq!(s.explosions.len(), 2);
}

#[test]
fn no_collision_when_apart() {
    let mut s = make_state();
    assert!(!s.ships_collide());
    assert!(!s.tick(&HashSet::new(), &mut RecordingRenderer::new()));
    assert!(s.ships.iter().all(|ship| ship.alive));
}

#[test]
fn explosions_run_fifty_ticks_then_vanish() {
    let mut s = make_state();
    force_overlap(&mut s);
    let mut r = RecordingRenderer::new();
    s.tick(&HashSet::new(), &mut r);
    for _ in 0..44 {
        s.tick(&HashSet::new(), &mut r);
    }
    assert_eq!(s.explosions[0].frame_index, 9);
    for _ in 0..4 {
        s.tick(&HashSet::new(), &mut r);
    }
    assert_eq!(s.explosions.len(), 2);
    s.tick(&HashSet::new(), &mut r);
    assert!(s.explosions.is_empty());
}

#[test]
fn game_keeps_running_after_ending() {
    let mut s = make_state();
    force_overlap(&mut s);
    let mut r = RecordingRenderer::new();
    for _ in 0..80 {
        s.tick(&keys(&[Key::Right, Key::Enter]), &mut r);
    }
    assert_eq!(s.status, GameStatus::Ended);
    assert_eq!(s.frame, 80);

    let mut r = RecordingRenderer::new();
    s.tick(&keys(&[Key::Right, Key::Enter]), &mut r);
    assert!(first_index(&r, SHIP).is_none());
    assert!(first_index(&r, SHIELD1).is_none());
    assert!(first_index(&r, BG).is_some());
    assert!(first_index(&r, BIRD).is_some());
}

#[test]
fn blink_overlay_outlives_its_ship() {
    let mut s = make_state();
    let mut r = RecordingRenderer::new();
    s.tick(&keys(&[Key::RightShift]), &mut r);
    force_overlap(&mut s);
    s.tick(&HashSet::new(), &mut r);

    let mut r = RecordingRenderer::new();
    s.tick(&HashSet::new(), &mut r);
    assert!(s.blinks[0].active);
    assert!(first_index(&r, BLINK).is_some());
}

// ── tick — draw order ─────────────────────────────────────────────────────────

#[test]
fn draw_order_layers_scene() {
    let mut s = make_state();
    let mut r = RecordingRenderer::new();
    s.tick(&keys(&[Key::RightShift, Key::Enter]), &mut r);

    let bg = last_index(&r, BG).unwrap();
    let blink = first_index(&r, BLINK).unwrap();
    let bird = first_index(&r, BIRD).unwrap();
    let ship = first_index(&r, SHIP).unwrap();
    let shield = first_index(&r, SHIELD1).unwrap();

    assert_eq!(first_index(&r, BG), Some(0));
    assert!(bg < blink && blink < bird && bird < ship && ship < shield);
    // Each live ship is drawn by its update and once more afterwards.
    assert_eq!(r.rects_sized(SHIP.0, SHIP.1).len(), 4);
}

#[test]
fn explosions_are_drawn_on_top() {
    let mut s = make_state();
    force_overlap(&mut s);
    let mut r = RecordingRenderer::new();
    s.tick(&HashSet::new(), &mut r);
    s.tick(&HashSet::new(), &mut r);

    let mut r = RecordingRenderer::new();
    s.tick(&HashSet::new(), &mut r);
    assert_eq!(r.rects_sized(BOOM.0, BOOM.1).len(), 4);
    assert_eq!(last_index(&r, BOOM), Some(r.calls.len() - 1));
}

#[test]
fn shield_only_while_key_held() {
    let mut s = make_state();
    let mut r = RecordingRenderer::new();
    s.tick(&HashSet::new(), &mut r);
    assert!(first_index(&r, SHIELD1).is_none());

    let mut r = RecordingRenderer::new();
    s.tick(&keys(&[Key::Enter]), &mut r);
    let drawn = r.rects_sized(SHIELD1.0, SHIELD1.1);
    assert_eq!(drawn.len(), 1);
    assert_eq!(drawn[0].center(), s.ship(ShipSlot::One).center());
}

#[test]
fn ring_shield_style_draws_circle() {
    let config = GameConfig {
        shield_style: ShieldStyle::Ring,
        ..GameConfig::default()
    };
    let mut s = make_state_with(&config);
    let mut r = RecordingRenderer::new();
    s.tick(&keys(&[Key::Tab]), &mut r);
    let circles: Vec<_> = r
        .calls
        .iter()
        .filter(|c| matches!(c, DrawCall::Circle { .. }))
        .collect();
    assert_eq!(
        circles,
        vec![&DrawCall::Circle {
            center: s.ship(ShipSlot::Two).center(),
            radius: 75,
            color: (0, 0, 255),
            width: 2,
        }]
    );
}

// ── Background ────────────────────────────────────────────────────────────────

#[test]
fn background_scrolls_and_wraps() {
    let mut bg = Background::new(Image::solid(100, 10, [0, 0, 0, 255]), 1);
    assert_eq!((bg.offset, bg.offset_flipped), (0, 100));
    for _ in 0..100 {
        bg.scroll();
    }
    assert_eq!(bg.offset, -100);
    bg.scroll();
    assert_eq!(bg.offset, 100);
    assert_eq!(bg.offset_flipped, -1);
}

#[test]
fn background_tiles_cover_arena() {
    let bg = Background::new(Image::solid(700, 400, [0, 0, 0, 255]), 1);
    let mut r = RecordingRenderer::new();
    bg.draw(&mut r, (1600, 900));
    // 3 x 3 static tiles plus the two scrolling copies.
    assert_eq!(r.calls.len(), 11);
}
