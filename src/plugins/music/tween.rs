//! Linear scalar tweens, ticked by the owner.
//!
//! At most one tween runs per property; starting a new one replaces the old.
//! `tick` hands each sampled value to a setter, including the exact end value
//! on the tick that finishes the tween.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TweenProperty {
    Volume,
    Pitch,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub property: TweenProperty,
    pub from: f32,
    pub to: f32,
    pub duration: f32,
    pub elapsed: f32,
}

impl Tween {
    pub fn sample(&self) -> f32 {
        if self.is_finished() {
            return self.to;
        }
        let t = (self.elapsed / self.duration).clamp(0.0, 1.0);
        self.from + (self.to - self.from) * t
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

#[derive(Debug, Clone, Default)]
pub struct Tweener {
    active: Vec<Tween>,
}

impl Tweener {
    pub fn start(&mut self, property: TweenProperty, from: f32, to: f32, duration: f32) {
        self.cancel(property);
        self.active.push(Tween { property, from, to, duration: duration.max(0.0), elapsed: 0.0 });
    }

    /// Returns whether a tween was running.
    pub fn cancel(&mut self, property: TweenProperty) -> bool {
        let before = self.active.len();
        self.active.retain(|t| t.property != property);
        self.active.len() != before
    }

    pub fn is_active(&self, property: TweenProperty) -> bool {
        self.active.iter().any(|t| t.property == property)
    }

    pub fn get(&self, property: TweenProperty) -> Option<&Tween> {
        self.active.iter().find(|t| t.property == property)
    }

    pub fn tick(&mut self, dt: f32, mut apply: impl FnMut(TweenProperty, f32)) {
        for tween in &mut self.active {
            tween.elapsed += dt;
            apply(tween.property, tween.sample());
        }
        self.active.retain(|t| !t.is_finished());
    }
}
