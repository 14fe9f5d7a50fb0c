//! Per-button color tween
//!
//! Advanced once per rendered frame by the owning group. A new tween on the
//! same button replaces the old one; nothing is queued.

use tabstrip_scene::Color;

/// Clamped Hermite interpolation between `from` and `to`.
pub fn smoothstep(from: f32, to: f32, t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    let t = -2.0 * t * t * t + 3.0 * t * t;
    to * t + from * (1.0 - t)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TweenStep {
    Running(Color),
    Finished(Color),
}

impl TweenStep {
    pub fn color(&self) -> Color {
        match self {
            TweenStep::Running(c) | TweenStep::Finished(c) => *c,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColorTween {
    from: Color,
    to: Color,
    duration: f32,
    /// Normalized progress
    t: f32,
}

impl ColorTween {
    pub fn new(from: Color, to: Color, duration: f32) -> Self {
        Self {
            from,
            to,
            duration,
            t: 0.0,
        }
    }

    pub fn target(&self) -> Color {
        self.to
    }

    pub fn progress(&self) -> f32 {
        self.t.min(1.0)
    }

    pub fn advance(&mut self, dt: f32) -> TweenStep {
        if self.duration <= 0.0 {
            self.t = 1.0;
            return TweenStep::Finished(self.to);
        }

        // A frame landing exactly on t = 1 still runs; the next one finishes
        self.t += dt.max(0.0) / self.duration;
        if self.t > 1.0 {
            return TweenStep::Finished(self.to);
        }

        TweenStep::Running(Color::lerp(
            self.from,
            self.to,
            smoothstep(0.0, 1.0, self.t),
        ))
    }
}
