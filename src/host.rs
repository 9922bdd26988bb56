//! Collaborator interfaces consumed by the simulation loop.
//!
//! The engine never talks to a window, a GPU or a global RNG directly. It goes
//! through the traits below, so the same loop runs under a real renderer, a
//! headless host for the CLI, or scripted collaborators in tests.

use crate::bounds::Rect;
use crate::config::Color;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;

/// Visual variant requested for an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sprite {
    HumanAdult,
    CorpseAdult,
    HumanChild,
    CorpseChild,
    Fruit,
}

impl Sprite {
    pub const ALL: [Sprite; 5] = [
        Sprite::HumanAdult,
        Sprite::CorpseAdult,
        Sprite::HumanChild,
        Sprite::CorpseChild,
        Sprite::Fruit,
    ];

    /// Sprite sheet selector
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Sprite::HumanAdult => 0,
            Sprite::CorpseAdult => 1,
            Sprite::HumanChild => 2,
            Sprite::CorpseChild => 3,
            Sprite::Fruit => 4,
        }
    }
}

/// Receives one draw request per visible entity per tick
pub trait Canvas {
    fn draw(&mut self, sprite: Sprite, x: i32, y: i32);
}

/// Window/frame lifecycle. Each call happens once per tick.
pub trait FrameHost: Canvas {
    /// Polled once at the top of every iteration
    fn should_close(&mut self) -> bool;
    fn begin_frame(&mut self);
    fn clear(&mut self, color: Color);
    fn end_frame(&mut self);
}

/// Uniform integer source, `min..=max`
pub trait RandomSource {
    fn uniform_int(&mut self, min: i32, max: i32) -> i32;
}

/// Axis-aligned box overlap test
pub trait Collider {
    fn boxes_overlap(&self, a: Rect, b: Rect) -> bool;
}

/// ChaCha8-backed random source, reproducible from its seed
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: ChaCha8Rng,
    seed: u64,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Seed drawn from the thread RNG
    pub fn from_entropy() -> Self {
        Self::new(rand::thread_rng().gen())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for SeededRandom {
    #[inline]
    fn uniform_int(&mut self, min: i32, max: i32) -> i32 {
        if min >= max {
            return min;
        }
        self.rng.gen_range(min..=max)
    }
}

/// Replays a fixed list of values. Values are clamped into the requested
/// range; once exhausted every draw returns `min`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    values: VecDeque<i32>,
    draws: usize,
}

impl ScriptedRandom {
    pub fn new<I: IntoIterator<Item = i32>>(values: I) -> Self {
        Self {
            values: values.into_iter().collect(),
            draws: 0,
        }
    }

    /// Number of values consumed so far
    pub fn draws(&self) -> usize {
        self.draws
    }

    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

impl RandomSource for ScriptedRandom {
    fn uniform_int(&mut self, min: i32, max: i32) -> i32 {
        self.draws += 1;
        match self.values.pop_front() {
            Some(v) => v.clamp(min, max.max(min)),
            None => min,
        }
    }
}

/// Strict overlap: boxes that only share an edge do not collide
#[derive(Debug, Clone, Copy, Default)]
pub struct Aabb;

impl Collider for Aabb {
    #[inline]
    fn boxes_overlap(&self, a: Rect, b: Rect) -> bool {
        a.x < b.x + b.w && a.x + a.w > b.x && a.y < b.y + b.h && a.y + a.h > b.y
    }
}

/// Draw counts for one frame or a whole run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawCounts {
    counts: [u64; 5],
}

impl DrawCounts {
    pub fn record(&mut self, sprite: Sprite) {
        self.counts[sprite.index()] += 1;
    }

    pub fn get(&self, sprite: Sprite) -> u64 {
        self.counts[sprite.index()]
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

/// Frame host without a window: closes after a fixed number of frames
#[derive(Debug, Clone)]
pub struct HeadlessHost {
    max_frames: u64,
    frames: u64,
    clears: u64,
    in_frame: bool,
    last_clear: Option<Color>,
    frame_draws: DrawCounts,
    total_draws: DrawCounts,
}

impl HeadlessHost {
    pub fn new(max_frames: u64) -> Self {
        Self {
            max_frames,
            frames: 0,
            clears: 0,
            in_frame: false,
            last_clear: None,
            frame_draws: DrawCounts::default(),
            total_draws: DrawCounts::default(),
        }
    }

    /// Completed frames
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn clears(&self) -> u64 {
        self.clears
    }

    pub fn last_clear(&self) -> Option<Color> {
        self.last_clear
    }

    /// Draws issued during the most recent frame
    pub fn frame_draws(&self) -> DrawCounts {
        self.frame_draws
    }

    pub fn total_draws(&self) -> DrawCounts {
        self.total_draws
    }
}

impl Canvas for HeadlessHost {
    fn draw(&mut self, sprite: Sprite, _x: i32, _y: i32) {
        debug_assert!(self.in_frame, "draw outside of a frame");
        self.frame_draws.record(sprite);
        self.total_draws.record(sprite);
    }
}

impl FrameHost for HeadlessHost {
    fn should_close(&mut self) -> bool {
        self.frames >= self.max_frames
    }

    fn begin_frame(&mut self) {
        self.in_frame = true;
        self.frame_draws = DrawCounts::default();
    }

    fn clear(&mut self, color: Color) {
        self.clears += 1;
        self.last_clear = Some(color);
    }

    fn end_frame(&mut self) {
        self.in_frame = false;
        self.frames += 1;
    }
}

/// A single recorded draw call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCall {
    pub sprite: Sprite,
    pub x: i32,
    pub y: i32,
}

/// Canvas that keeps every draw call
#[derive(Debug, Clone, Default)]
pub struct RecordingCanvas {
    pub calls: Vec<DrawCall>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, sprite: Sprite) -> usize {
        self.calls.iter().filter(|c| c.sprite == sprite).count()
    }
}

impl Canvas for RecordingCanvas {
    fn draw(&mut self, sprite: Sprite, x: i32, y: i32) {
        self.calls.push(DrawCall { sprite, x, y });
    }
}

/// Canvas that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCanvas;

impl Canvas for NullCanvas {
    #[inline]
    fn draw(&mut self, _sprite: Sprite, _x: i32, _y: i32) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sprite_indices() {
        let indices: Vec<usize> = Sprite::ALL.iter().map(|s| s.index()).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_seeded_random_in_range_and_reproducible() {
        let mut a = SeededRandom::new(7);
        let mut b = SeededRandom::new(7);
        for _ in 0..1000 {
            let v = a.uniform_int(-1, 1);
            assert!((-1..=1).contains(&v));
            assert_eq!(v, b.uniform_int(-1, 1));
        }
        assert_eq!(a.seed(), 7);
    }

    #[test]
    fn test_seeded_random_degenerate_range() {
        let mut r = SeededRandom::new(1);
        assert_eq!(r.uniform_int(5, 5), 5);
    }

    #[test]
    fn test_scripted_random() {
        let mut r = ScriptedRandom::new([1, -1, 7]);
        assert_eq!(r.uniform_int(-1, 1), 1);
        assert_eq!(r.uniform_int(-1, 1), -1);
        // Clamped into range
        assert_eq!(r.uniform_int(-1, 1), 1);
        // Exhausted
        assert_eq!(r.uniform_int(3, 9), 3);
        assert_eq!(r.draws(), 4);
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn test_aabb_overlap() {
        let c = Aabb;
        let a = Rect::square(0, 0, 16);
        assert!(c.boxes_overlap(a, Rect::square(15, 15, 16)));
        assert!(c.boxes_overlap(a, Rect::square(-15, 0, 16)));
        // Touching edges
        assert!(!c.boxes_overlap(a, Rect::square(16, 0, 16)));
        assert!(!c.boxes_overlap(a, Rect::square(0, -16, 16)));
    }

    #[test]
    fn test_headless_host_lifecycle() {
        let mut host = HeadlessHost::new(2);
        let color = Color {
            r: 1,
            g: 2,
            b: 3,
            a: 4,
        };

        for _ in 0..2 {
            assert!(!host.should_close());
            host.begin_frame();
            host.clear(color);
            host.draw(Sprite::Fruit, 0, 0);
            host.draw(Sprite::HumanChild, 0, 0);
            host.end_frame();
        }

        assert!(host.should_close());
        assert_eq!(host.frames(), 2);
        assert_eq!(host.clears(), 2);
        assert_eq!(host.last_clear(), Some(color));
        assert_eq!(host.frame_draws().total(), 2);
        assert_eq!(host.total_draws().get(Sprite::Fruit), 2);
        assert_eq!(host.total_draws().total(), 4);
    }

    #[test]
    fn test_recording_canvas() {
        let mut canvas = RecordingCanvas::new();
        canvas.draw(Sprite::Fruit, 3, 4);
        canvas.draw(Sprite::CorpseAdult, 5, 6);
        assert_eq!(canvas.count(Sprite::Fruit), 1);
        assert_eq!(
            canvas.calls[1],
            DrawCall {
                sprite: Sprite::CorpseAdult,
                x: 5,
                y: 6
            }
        );
    }
}
