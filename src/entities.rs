//! Game entity types and their per-tick state machines.
//!
//! Entities never own each other. A `Blink` or `Shield` is stored next to its
//! ship in the same slot of `GameState`, and the ship is handed in on every
//! call, so the owner always outlives the companion for the whole tick.

use std::collections::HashSet;

use rand::Rng;

use crate::assets::{flip_horizontal, Image};
use crate::display::{Renderer, Rgb};
use crate::geometry::{Rect, Vec2};
use crate::input::Key;

pub const SHIP_SPEED: i32 = 10;
pub const BLINK_SPEED: i32 = 20;
pub const BLINK_DISTANCE: i32 = 500;
pub const EXPLOSION_TICKS_PER_IMAGE: u32 = 5;

const SHIP_ANIMATION_SPEED: f32 = 0.2;
const BIRD_ANIMATION_SPEED: f32 = 0.2;
const SHIELD_ANIMATION_SPEED: f32 = 0.2;
const BLINK_ANIMATION_SPEED: f32 = 1.0;

// ── Entity ────────────────────────────────────────────────────────────────────

/// An animated sprite: a frame list, a fractional cursor into it and the
/// rectangle it occupies.
#[derive(Clone, Debug)]
pub struct Entity {
    pub frames: Vec<Image>,
    /// Always within `[0, frames.len())`.
    pub current_frame: f32,
    pub animation_speed: f32,
    pub image: Image,
    pub rect: Rect,
}

impl Entity {
    /// # Panics
    /// If `frames` is empty. Asset loading always yields at least one frame.
    pub fn new(frames: Vec<Image>, animation_speed: f32, center: Vec2) -> Self {
        let image = frames[0].clone();
        let rect = Rect::centered_at(center, image.width() as i32, image.height() as i32);
        Entity {
            frames,
            current_frame: 0.0,
            animation_speed,
            image,
            rect,
        }
    }

    pub fn frame_index(&self) -> usize {
        (self.current_frame as usize).min(self.frames.len() - 1)
    }

    pub fn advance_frame(&mut self) {
        self.current_frame += self.animation_speed;
        if self.current_frame >= self.frames.len() as f32 {
            self.current_frame = 0.0;
        }
        self.image = self.frames[self.frame_index()].clone();
    }

    /// Swap the frame list; the cursor is kept and wraps on the next advance.
    pub fn set_frames(&mut self, frames: Vec<Image>) {
        self.frames = frames;
        if self.current_frame >= self.frames.len() as f32 {
            self.current_frame = 0.0;
        }
    }

    pub fn draw(&self, renderer: &mut dyn Renderer) {
        renderer.draw(&self.image, self.rect);
    }
}

// ── Ship slots, bounds and controls ───────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShipSlot {
    One,
    Two,
}

impl ShipSlot {
    pub const ALL: [ShipSlot; 2] = [ShipSlot::One, ShipSlot::Two];

    pub fn index(self) -> usize {
        match self {
            ShipSlot::One => 0,
            ShipSlot::Two => 1,
        }
    }

    /// Ship 1 keeps to the upper band of the arena, ship 2 to the lower one.
    /// At 1600x900 these are `(0,0)-(1600,400)` and `(0,500)-(1600,900)`.
    pub fn bounds(self, width: i32, height: i32) -> Rect {
        match self {
            ShipSlot::One => Rect::from_edges(0, 0, width, height * 4 / 9),
            ShipSlot::Two => Rect::from_edges(0, height * 5 / 9, width, height),
        }
    }

    pub fn start_position(self) -> Vec2 {
        match self {
            ShipSlot::One => Vec2::new(100, 200),
            ShipSlot::Two => Vec2::new(1000, 500),
        }
    }

    pub fn controls(self) -> Controls {
        match self {
            ShipSlot::One => Controls::new(vec![
                (Key::Up, Vec2::UP),
                (Key::Down, Vec2::DOWN),
                (Key::Left, Vec2::LEFT),
                (Key::Right, Vec2::RIGHT),
            ]),
            ShipSlot::Two => Controls::new(vec![
                (Key::W, Vec2::UP),
                (Key::S, Vec2::DOWN),
                (Key::A, Vec2::LEFT),
                (Key::D, Vec2::RIGHT),
            ]),
        }
    }

    pub fn blink_key(self) -> Key {
        match self {
            ShipSlot::One => Key::RightShift,
            ShipSlot::Two => Key::LeftShift,
        }
    }

    /// Held together with the blink key to dash left instead of right.
    pub fn left_key(self) -> Key {
        match self {
            ShipSlot::One => Key::Left,
            ShipSlot::Two => Key::A,
        }
    }

    pub fn shield_key(self) -> Key {
        match self {
            ShipSlot::One => Key::Enter,
            ShipSlot::Two => Key::Tab,
        }
    }
}

/// Ordered key -> unit-vector bindings. Order matters: the last pressed
/// binding decides which way the ship faces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Controls {
    bindings: Vec<(Key, Vec2)>,
}

impl Controls {
    pub fn new(bindings: Vec<(Key, Vec2)>) -> Self {
        Controls { bindings }
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Key, Vec2)> {
        self.bindings.iter()
    }
}

// ── Ship ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Ship {
    pub slot: ShipSlot,
    pub entity: Entity,
    idle_frames: Vec<Image>,
    move_frames: Vec<Image>,
    move_frames_left: Vec<Image>,
    pub moving: bool,
    pub facing_left: bool,
    pub last_direction: Vec2,
    pub blinking: bool,
    pub blink_direction: Vec2,
    pub blink_remaining_distance: i32,
    pub alive: bool,
    pub bounds: Rect,
    pub controls: Controls,
    pub speed: i32,
    pub blink_speed: i32,
    /// Distance a full blink covers; `blink_remaining_distance` resets to it.
    pub blink_budget: i32,
}

impl Ship {
    pub fn new(
        slot: ShipSlot,
        center: Vec2,
        idle_frames: Vec<Image>,
        move_frames: Vec<Image>,
        bounds: Rect,
    ) -> Self {
        let move_frames_left = move_frames.iter().map(flip_horizontal).collect();
        Ship {
            slot,
            entity: Entity::new(idle_frames.clone(), SHIP_ANIMATION_SPEED, center),
            idle_frames,
            move_frames,
            move_frames_left,
            moving: false,
            facing_left: false,
            last_direction: Vec2::RIGHT,
            blinking: false,
            blink_direction: Vec2::RIGHT,
            blink_remaining_distance: BLINK_DISTANCE,
            alive: true,
            bounds,
            controls: slot.controls(),
            speed: SHIP_SPEED,
            blink_speed: BLINK_SPEED,
            blink_budget: BLINK_DISTANCE,
        }
    }

    pub fn with_motion(mut self, speed: i32, blink_speed: i32, blink_distance: i32) -> Self {
        self.speed = speed;
        self.blink_speed = blink_speed;
        self.blink_budget = blink_distance;
        self.blink_remaining_distance = blink_distance;
        self
    }

    pub fn rect(&self) -> Rect {
        self.entity.rect
    }

    pub fn center(&self) -> Vec2 {
        self.entity.rect.center()
    }

    /// One tick of movement, animation and drawing.
    ///
    /// Key movement is ignored while a blink is running; the blink moves the
    /// ship instead and hands control back through `blink.stop` once the
    /// distance budget is spent.
    pub fn update(&mut self, pressed: &HashSet<Key>, blink: &mut Blink, renderer: &mut dyn Renderer) {
        self.moving = false;

        if !self.blinking {
            let mut net = Vec2::ZERO;
            for &(key, mv) in self.controls.iter() {
                if pressed.contains(&key) {
                    self.entity.rect.translate(mv.scaled(self.speed));
                    net += mv;
                    self.moving = true;
                    self.facing_left = mv.x < 0;
                }
            }
            if !net.is_zero() {
                self.last_direction = net;
            }
        } else {
            self.entity.rect.translate(self.blink_direction.scaled(self.blink_speed));
            self.blink_remaining_distance -= self.blink_speed;
            if self.blink_remaining_distance <= 0 {
                self.blinking = false;
                self.blink_remaining_distance = self.blink_budget;
                self.blink_direction = Vec2::RIGHT;
                blink.stop(self);
            }
        }

        let frames = if self.moving { &self.move_frames } else { &self.idle_frames };
        if !self.entity.frames.first().zip(frames.first()).is_some_and(|(a, b)| a.same_as(b)) {
            self.entity.set_frames(frames.clone());
        }

        self.entity.rect.clamp_into(&self.bounds);

        self.entity.advance_frame();
        if self.moving && self.facing_left {
            self.entity.image = self.move_frames_left[self.entity.frame_index()].clone();
        }
        self.entity.draw(renderer);
    }

    pub fn draw(&self, renderer: &mut dyn Renderer) {
        self.entity.draw(renderer);
    }
}

// ── Blink ─────────────────────────────────────────────────────────────────────

/// Dash overlay. Starting it puts the owner into its blink state; the owner
/// stops it again when the dash distance runs out.
#[derive(Clone, Debug)]
pub struct Blink {
    pub active: bool,
    pub mirrored: bool,
    original_frames: Vec<Image>,
    mirrored_frames: Vec<Image>,
    pub entity: Entity,
}

impl Blink {
    pub fn new(frames: Vec<Image>, owner: &Ship) -> Self {
        let mirrored_frames = frames.iter().map(flip_horizontal).collect();
        Blink {
            active: false,
            mirrored: false,
            entity: Entity::new(frames.clone(), BLINK_ANIMATION_SPEED, owner.center()),
            original_frames: frames,
            mirrored_frames,
        }
    }

    pub fn start(&mut self, owner: &mut Ship, direction: Vec2) {
        self.active = true;
        owner.blinking = true;
        owner.blink_direction = direction;

        self.mirrored = direction.x < 0;
        let frames = if self.mirrored { &self.mirrored_frames } else { &self.original_frames };
        self.entity.set_frames(frames.clone());
        self.entity.current_frame = 0.0;
        self.entity.image = self.entity.frames[0].clone();
    }

    pub fn stop(&mut self, owner: &mut Ship) {
        self.active = false;
        owner.blinking = false;
    }

    /// Animate alongside the owner: the overlay's left edge meets the ship's
    /// right edge on a rightward dash, and the reverse on a leftward one.
    pub fn update(&mut self, owner: &Ship, renderer: &mut dyn Renderer) {
        if !self.active {
            return;
        }
        self.entity.advance_frame();
        let (w, h) = (self.entity.image.width() as i32, self.entity.image.height() as i32);
        let mut rect = Rect::centered_at(owner.center(), w, h);
        if owner.blink_direction.x > 0 {
            rect.set_left(owner.rect().right());
        } else {
            rect.set_right(owner.rect().left());
        }
        self.entity.rect = rect;
        self.entity.draw(renderer);
    }
}

// ── Shield ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub enum ShieldLook {
    Animated(Entity),
    Ring { radius: i32, color: Rgb, width: i32 },
}

/// Holds no on/off state: the caller decides every tick whether to update it.
#[derive(Clone, Debug)]
pub struct Shield {
    pub look: ShieldLook,
}

impl Shield {
    pub fn animated(frames: Vec<Image>, owner: &Ship) -> Self {
        Shield {
            look: ShieldLook::Animated(Entity::new(frames, SHIELD_ANIMATION_SPEED, owner.center())),
        }
    }

    pub fn ring(radius: i32, color: Rgb, width: i32) -> Self {
        Shield {
            look: ShieldLook::Ring { radius, color, width },
        }
    }

    pub fn update(&mut self, owner: &Ship, renderer: &mut dyn Renderer) {
        match &mut self.look {
            ShieldLook::Animated(entity) => {
                entity.advance_frame();
                entity.rect = Rect::centered_at(
                    owner.center(),
                    entity.image.width() as i32,
                    entity.image.height() as i32,
                );
                entity.draw(renderer);
            }
            ShieldLook::Ring { radius, color, width } => {
                renderer.draw_circle(owner.center(), *radius, *color, *width);
            }
        }
    }
}

// ── Explosion ─────────────────────────────────────────────────────────────────

/// One-shot animation: each image is held for `ticks_per_image` updates and
/// the explosion finishes once every tick has elapsed and the last image has
/// been shown. Finished explosions are dropped, never restarted.
#[derive(Clone, Debug)]
pub struct Explosion {
    frames: Vec<Image>,
    pub frame_index: usize,
    pub elapsed: u32,
    pub total_frames: u32,
    ticks_per_image: u32,
    pub rect: Rect,
    finished: bool,
}

impl Explosion {
    /// # Panics
    /// If `frames` is empty.
    pub fn new(frames: Vec<Image>, center: Vec2, ticks_per_image: u32) -> Self {
        let ticks_per_image = ticks_per_image.max(1);
        let (w, h) = (frames[0].width() as i32, frames[0].height() as i32);
        Explosion {
            total_frames: frames.len() as u32 * ticks_per_image,
            frames,
            frame_index: 0,
            elapsed: 0,
            ticks_per_image,
            rect: Rect::centered_at(center, w, h),
            finished: false,
        }
    }

    pub fn snap_to(&mut self, center: Vec2) {
        self.rect.set_center(center);
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn image(&self) -> &Image {
        &self.frames[self.frame_index]
    }

    pub fn update(&mut self) {
        if self.finished {
            return;
        }
        self.elapsed += 1;
        let last = self.frames.len() - 1;
        self.frame_index = ((self.elapsed / self.ticks_per_image) as usize).min(last);
        if self.elapsed >= self.total_frames && self.frame_index == last {
            self.finished = true;
        }
    }

    pub fn draw(&self, renderer: &mut dyn Renderer) {
        renderer.draw(self.image(), self.rect);
    }
}

// ── Bird ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Bird {
    pub entity: Entity,
    pub velocity: Vec2,
}

impl Bird {
    pub fn new(frames: Vec<Image>, center: Vec2, velocity: Vec2) -> Self {
        Bird {
            entity: Entity::new(frames, BIRD_ANIMATION_SPEED, center),
            velocity,
        }
    }

    /// Scatter `count` birds over the arena with small random drift.
    pub fn spawn_flock(
        frames: &[Image],
        count: usize,
        arena: (i32, i32),
        rng: &mut impl Rng,
    ) -> Vec<Bird> {
        (0..count)
            .map(|_| {
                let center = Vec2::new(rng.gen_range(0..=arena.0), rng.gen_range(0..=arena.1));
                let vx = rng.gen_range(1..=3);
                let vy = rng.gen_range(1..=3) * if rng.gen_bool(0.5) { 1 } else { -1 };
                Bird::new(frames.to_vec(), center, Vec2::new(vx, vy))
            })
            .collect()
    }

    /// Drift, then wrap each axis independently once the bird is fully off
    /// screen on that side.
    pub fn update(&mut self, arena: (i32, i32)) {
        let (width, height) = arena;
        self.entity.advance_frame();
        let rect = &mut self.entity.rect;
        rect.translate(self.velocity);

        if rect.right() < 0 {
            rect.set_left(width);
        } else if rect.left() > width {
            rect.set_right(0);
        }
        if rect.bottom() < 0 {
            rect.set_top(height);
        } else if rect.top() > height {
            rect.set_bottom(0);
        }
    }

    pub fn draw(&self, renderer: &mut dyn Renderer) {
        self.entity.draw(renderer);
    }
}
