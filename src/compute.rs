//! Per-tick game logic.
//!
//! `GameState::tick` runs one frame of simulation and drawing in a fixed
//! order; the order is also the layering order on screen. Input polling,
//! presenting and frame pacing stay with the caller.

use std::collections::HashSet;

use rand::Rng;

use crate::assets::{flip_horizontal, scale, AssetStore, Image};
use crate::config::{GameConfig, ShieldStyle};
use crate::display::Renderer;
use crate::entities::{Bird, Blink, Explosion, Shield, Ship, ShipSlot};
use crate::error::GameResult;
use crate::geometry::{Rect, Vec2};
use crate::input::Key;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Running,
    /// Both ships destroyed. The loop keeps running until quit.
    Ended,
}

// ── Sprites ──────────────────────────────────────────────────────────────────

/// Every image a session needs, already sliced and scaled.
#[derive(Clone, Debug)]
pub struct Sprites {
    pub idle: [Vec<Image>; 2],
    pub moving: [Vec<Image>; 2],
    pub blink: Vec<Image>,
    pub shields: [Vec<Image>; 2],
    pub bird: Vec<Image>,
    pub explosion: Vec<Image>,
    pub background: Image,
}

impl Sprites {
    pub fn load(store: &AssetStore, config: &GameConfig) -> GameResult<Self> {
        let ship = Some(config.ship_size);
        let explosion = (1..=config.explosion_images)
            .map(|i| {
                store
                    .load_spritesheet(&format!("fig/Explosion_{i}.png"))
                    .map(|img| scale(&img, config.explosion_size))
            })
            .collect::<GameResult<Vec<_>>>()?;
        let background = store.load_spritesheet("imgs/bg_ocean.png")?;

        Ok(Sprites {
            idle: [
                store.load_frames("fig/Idle1.png", config.ship_frames, ship)?,
                store.load_frames("fig/Idle2.png", config.ship_frames, ship)?,
            ],
            moving: [
                store.load_frames("fig/Move1.png", config.ship_frames, ship)?,
                store.load_frames("fig/Move2.png", config.ship_frames, ship)?,
            ],
            blink: store.load_frames("fig/blink.png", config.blink_frames, None)?,
            shields: [
                store.load_frames(
                    "fig/shield1.png",
                    config.shield_frames[0],
                    Some(config.shield_sizes[0]),
                )?,
                store.load_frames(
                    "fig/shield2.png",
                    config.shield_frames[1],
                    Some(config.shield_sizes[1]),
                )?,
            ],
            bird: store.load_frames("fig/Walk.png", config.bird_frames, None)?,
            explosion,
            background: scale(&background, (config.width as u32, config.height as u32)),
        })
    }
}

// ── Background ───────────────────────────────────────────────────────────────

/// Ocean backdrop: a static tiling plus a normal and a mirrored copy that
/// scroll left and wrap back to the right edge.
#[derive(Clone, Debug)]
pub struct Background {
    image: Image,
    flipped: Image,
    pub offset: i32,
    pub offset_flipped: i32,
    step: i32,
}

impl Background {
    pub fn new(image: Image, step: i32) -> Self {
        let width = image.width() as i32;
        Background {
            flipped: flip_horizontal(&image),
            image,
            offset: 0,
            offset_flipped: width,
            step,
        }
    }

    pub fn scroll(&mut self) {
        let width = self.image.width() as i32;
        self.offset -= self.step;
        self.offset_flipped -= self.step;
        if self.offset < -width {
            self.offset = width;
        }
        if self.offset_flipped < -width {
            self.offset_flipped = width;
        }
    }

    pub fn draw(&self, renderer: &mut dyn Renderer, arena: (i32, i32)) {
        let (tw, th) = (self.image.width() as i32, self.image.height() as i32);
        if tw <= 0 || th <= 0 {
            return;
        }
        let tiles_x = (arena.0 + tw - 1) / tw;
        let tiles_y = (arena.1 + th - 1) / th;
        for ty in 0..tiles_y {
            for tx in 0..tiles_x {
                renderer.draw(&self.image, Rect::new(tx * tw, ty * th, tw, th));
            }
        }
        renderer.draw(&self.image, Rect::new(self.offset, 0, tw, th));
        renderer.draw(&self.flipped, Rect::new(self.offset_flipped, 0, tw, th));
    }
}

// ── Game state ───────────────────────────────────────────────────────────────

/// Everything that lives for one run. Ships, blinks, shields and the
/// pre-built explosions are indexed by `ShipSlot::index()`.
#[derive(Clone, Debug)]
pub struct GameState {
    pub ships: [Ship; 2],
    pub blinks: [Blink; 2],
    pub shields: [Shield; 2],
    pub birds: Vec<Bird>,
    /// Built at startup, moved into `explosions` on collision.
    pub pending_explosions: [Option<Explosion>; 2],
    pub explosions: Vec<Explosion>,
    pub background: Background,
    pub status: GameStatus,
    pub frame: u64,
    pub arena: (i32, i32),
}

/// Build a fresh run: both ships at their start positions, a random flock.
pub fn init_state(config: &GameConfig, sprites: &Sprites, rng: &mut impl Rng) -> GameState {
    let arena = (config.width, config.height);

    let make_ship = |slot: ShipSlot| {
        let i = slot.index();
        Ship::new(
            slot,
            slot.start_position(),
            sprites.idle[i].clone(),
            sprites.moving[i].clone(),
            slot.bounds(config.width, config.height),
        )
        .with_motion(config.ship_speed, config.blink_speed, config.blink_distance)
    };
    let ships = [make_ship(ShipSlot::One), make_ship(ShipSlot::Two)];

    let blinks = [
        Blink::new(sprites.blink.clone(), &ships[0]),
        Blink::new(sprites.blink.clone(), &ships[1]),
    ];

    let make_shield = |i: usize| match config.shield_style {
        ShieldStyle::Animated => Shield::animated(sprites.shields[i].clone(), &ships[i]),
        ShieldStyle::Ring => Shield::ring(config.ring_radius, config.ring_color, config.ring_width),
    };
    let shields = [make_shield(0), make_shield(1)];

    let make_explosion = |i: usize| {
        Explosion::new(
            sprites.explosion.clone(),
            ships[i].center(),
            config.explosion_ticks_per_image,
        )
    };
    let pending_explosions = [Some(make_explosion(0)), Some(make_explosion(1))];

    GameState {
        birds: Bird::spawn_flock(&sprites.bird, config.bird_count, arena, rng),
        ships,
        blinks,
        shields,
        pending_explosions,
        explosions: Vec::new(),
        background: Background::new(sprites.background.clone(), config.background_scroll),
        status: GameStatus::Running,
        frame: 0,
        arena,
    }
}

impl GameState {
    pub fn ship(&self, slot: ShipSlot) -> &Ship {
        &self.ships[slot.index()]
    }

    /// Both ships alive and overlapping.
    pub fn ships_collide(&self) -> bool {
        let [a, b] = &self.ships;
        a.alive && b.alive && a.rect().intersects(&b.rect())
    }

    /// Start a blink for every ship whose blink key is held and which is not
    /// already blinking. Holding the ship's left key dashes left.
    fn start_blinks(&mut self, pressed: &HashSet<Key>) {
        for slot in ShipSlot::ALL {
            let i = slot.index();
            if !pressed.contains(&slot.blink_key()) {
                continue;
            }
            let direction = if pressed.contains(&slot.left_key()) {
                Vec2::LEFT
            } else {
                Vec2::RIGHT
            };
            if !self.ships[i].blinking {
                self.blinks[i].start(&mut self.ships[i], direction);
            }
        }
    }

    /// Swap both ships for their explosions. Runs at most once per game:
    /// dead ships are never tested for collision again.
    fn destroy_ships(&mut self) {
        for slot in ShipSlot::ALL {
            let i = slot.index();
            if let Some(mut explosion) = self.pending_explosions[i].take() {
                explosion.snap_to(self.ships[i].center());
                self.explosions.push(explosion);
            }
            self.ships[i].alive = false;
        }
        self.status = GameStatus::Ended;
    }

    /// Advance one tick and draw it. Returns `true` on the tick the ships
    /// collided.
    pub fn tick(&mut self, pressed: &HashSet<Key>, renderer: &mut dyn Renderer) -> bool {
        self.background.scroll();
        self.background.draw(renderer, self.arena);

        self.start_blinks(pressed);

        let collided = self.ships_collide();
        if collided {
            self.destroy_ships();
        }

        for explosion in &mut self.explosions {
            explosion.update();
            if !explosion.is_finished() {
                explosion.draw(renderer);
            }
        }
        self.explosions.retain(|e| !e.is_finished());

        // Blink overlays run even for dead ships.
        for (blink, ship) in self.blinks.iter_mut().zip(&self.ships) {
            blink.update(ship, renderer);
        }

        for bird in &mut self.birds {
            bird.update(self.arena);
            bird.draw(renderer);
        }

        for (ship, blink) in self.ships.iter_mut().zip(&mut self.blinks) {
            if ship.alive {
                ship.update(pressed, blink, renderer);
            }
        }
        for ship in self.ships.iter().filter(|s| s.alive) {
            ship.draw(renderer);
        }

        for (shield, ship) in self.shields.iter_mut().zip(&self.ships) {
            if ship.alive && pressed.contains(&ship.slot.shield_key()) {
                shield.update(ship, renderer);
            }
        }

        for explosion in &self.explosions {
            explosion.draw(renderer);
        }

        self.frame += 1;
        collided
    }
}
