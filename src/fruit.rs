//! Fruit lifecycle: spawn, age, rot.

use crate::bounds::Rect;
use crate::config::FruitRules;
use crate::host::{Canvas, Sprite};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fruit {
    pub x: i32,
    pub y: i32,
    pub timer: u32,
}

impl Fruit {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y, timer: 0 }
    }

    pub fn is_rotten(&self, rules: &FruitRules) -> bool {
        self.timer > rules.rot_age
    }

    pub fn bounding_box(&self, rules: &FruitRules) -> Rect {
        Rect::square(self.x, self.y, rules.box_size)
    }

    /// Age one tick and draw. Returns true once the fruit has rotted.
    pub fn tick<C: Canvas + ?Sized>(&mut self, rules: &FruitRules, canvas: &mut C) -> bool {
        self.timer = self.timer.saturating_add(1);
        canvas.draw(Sprite::Fruit, self.x, self.y);
        self.is_rotten(rules)
    }
}
