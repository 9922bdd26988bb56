//! Human lifecycle: random walk, ageing, starvation, old age and reproduction.

use crate::bounds::{Bounds, Rect};
use crate::config::HumanRules;
use crate::host::{Canvas, RandomSource, Sprite};
use serde::{Deserialize, Serialize};

/// Events produced by one tick of a living human.
///
/// Both flags can be set in the same tick: reproduction is evaluated after
/// the death check and does not look at it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HumanEvents {
    pub died: bool,
    pub multiplied: bool,
}

/// A wandering human. Alive humans live in the world's alive collection;
/// dead ones are moved, unchanged, into the dead collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Human {
    pub x: i32,
    pub y: i32,
    /// Ticks lived
    pub timer: u32,
    pub weight: i32,
}

/// Age in years for a timer value
#[inline]
pub fn age_from_timer(timer: u32, age_shift: u32) -> u32 {
    timer >> age_shift
}

/// Minimum weight a human of `age` must keep
#[inline]
pub fn lethal_weight(age: u32, rules: &HumanRules) -> i32 {
    if age < rules.juvenile_age {
        age as i32 * rules.juvenile_lethal_factor
    } else {
        rules.adult_lethal_weight
    }
}

impl Human {
    /// Newborn at `(x, y)`
    pub fn new(x: i32, y: i32, rules: &HumanRules) -> Self {
        Self {
            x,
            y,
            timer: 0,
            weight: rules.initial_weight,
        }
    }

    #[inline]
    pub fn age(&self, rules: &HumanRules) -> u32 {
        age_from_timer(self.timer, rules.age_shift)
    }

    #[inline]
    pub fn is_adult(&self, rules: &HumanRules) -> bool {
        self.age(rules) >= rules.adult_age
    }

    /// Collision box anchored at the human's position
    pub fn bounding_box(&self, rules: &HumanRules) -> Rect {
        Rect::square(self.x, self.y, rules.box_size)
    }

    /// Advance one tick
    pub fn tick<R, C>(
        &mut self,
        rules: &HumanRules,
        bounds: &Bounds,
        rng: &mut R,
        canvas: &mut C,
    ) -> HumanEvents
    where
        R: RandomSource + ?Sized,
        C: Canvas + ?Sized,
    {
        let mut events = HumanEvents::default();

        let age = self.age(rules);
        let adult = age >= rules.adult_age;
        let lethal = lethal_weight(age, rules);

        // Random walk, x before y
        let dx = rng.uniform_int(-1, 1);
        let dy = rng.uniform_int(-1, 1);
        (self.x, self.y) = bounds.clamp(self.x + dx, self.y + dy);

        self.timer = self.timer.saturating_add(1);
        if self.timer % rules.metabolism_period == 0 {
            self.weight -= 1 + adult as i32;

            if self.weight < lethal {
                events.died = true;
            } else if rng.uniform_int(0, rules.mortality_roll_max) < age as i32 {
                events.died = true;
            }
        }

        if adult && self.weight > lethal * 2 {
            events.multiplied = true;
            self.weight -= rules.reproduction_cost;
        }

        let sprite = if adult {
            Sprite::HumanAdult
        } else {
            Sprite::HumanChild
        };
        canvas.draw(sprite, self.x, self.y);

        events
    }

    /// Eat one fruit. Returns false when already satiated.
    pub fn eat(&mut self, rules: &HumanRules) -> bool {
        if self.weight < rules.satiation_weight {
            self.weight += rules.fruit_nourishment;
            true
        } else {
            false
        }
    }

    /// Draw the corpse of a dead human. The timer no longer advances, so the
    /// sprite reflects the age at death.
    pub fn draw_corpse<C: Canvas + ?Sized>(&self, rules: &HumanRules, canvas: &mut C) {
        let sprite = if self.is_adult(rules) {
            Sprite::CorpseAdult
        } else {
            Sprite::CorpseChild
        };
        canvas.draw(sprite, self.x, self.y);
    }
}
