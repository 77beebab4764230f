pub const SQUARE_CLASS: &str = "floating-square";

const SPAWN_X_RATIO: f64 = 0.7;
const SPAWN_Y_RATIO: f64 = 0.35;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SquarePhysics {
    pub gravity: f64,
    pub bounce: f64,
    pub damping: f64,
    pub margin: f64,
    pub influence_radius: f64,
    pub pointer_strength: f64,
    pub scroll_impulse: f64,
    pub scroll_decay: f64,
}

impl Default for SquarePhysics {
    fn default() -> Self {
        Self {
            gravity: 0.12,
            bounce: 0.55,
            damping: 0.94,
            margin: 60.0,
            influence_radius: 220.0,
            pointer_strength: 0.9,
            scroll_impulse: 0.015,
            scroll_decay: 0.9,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

/// Slow sinusoidal wobble so the square never sits perfectly still.
pub fn drift(now_millis: f64) -> Vec2 {
    Vec2::new(
        (now_millis * 0.0015).sin() * 0.4,
        (now_millis * 0.0012).cos() * 0.3,
    )
}

#[derive(Clone, Debug, PartialEq)]
pub struct FloatingSquare {
    physics: SquarePhysics,
    position: Vec2,
    velocity: Vec2,
    pointer: Option<Vec2>,
    last_scroll_y: f64,
    scroll_velocity: f64,
}

impl FloatingSquare {
    pub fn spawn(viewport: Viewport, scroll_y: f64, physics: SquarePhysics) -> Self {
        Self {
            physics,
            position: Vec2::new(viewport.width * SPAWN_X_RATIO, viewport.height * SPAWN_Y_RATIO),
            velocity: Vec2::ZERO,
            pointer: None,
            last_scroll_y: scroll_y,
            scroll_velocity: 0.0,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn pointer_moved(&mut self, x: f64, y: f64) {
        self.pointer = Some(Vec2::new(x, y));
    }

    pub fn scrolled(&mut self, scroll_y: f64) {
        self.scroll_velocity = scroll_y - self.last_scroll_y;
        self.last_scroll_y = scroll_y;
    }

    /// Advances one animation frame and returns the new position.
    pub fn step(&mut self, now_millis: f64, viewport: Viewport) -> Vec2 {
        let physics = self.physics;
        let drift = drift(now_millis);

        if let Some(pointer) = self.pointer {
            let dx = pointer.x - self.position.x;
            let dy = pointer.y - self.position.y;
            let mut distance = dx.hypot(dy);
            if distance == 0.0 {
                distance = 1.0;
            }

            if distance < physics.influence_radius {
                let force = (1.0 - distance / physics.influence_radius) * physics.pointer_strength;
                self.velocity.x += dx / distance * force;
                self.velocity.y += dy / distance * force;
            }
        }

        self.velocity.y -= self.scroll_velocity * physics.scroll_impulse;
        self.scroll_velocity *= physics.scroll_decay;

        self.velocity.x *= physics.damping;
        self.velocity.y *= physics.damping;
        self.velocity.y += physics.gravity;

        self.position.x += self.velocity.x + drift.x;
        self.position.y += self.velocity.y + drift.y;

        let (x, vx) = bounce_axis(self.position.x, self.velocity.x, viewport.width, physics);
        let (y, vy) = bounce_axis(self.position.y, self.velocity.y, viewport.height, physics);
        self.position = Vec2::new(x, y);
        self.velocity = Vec2::new(vx, vy);

        self.position
    }
}

fn bounce_axis(position: f64, velocity: f64, extent: f64, physics: SquarePhysics) -> (f64, f64) {
    let low = physics.margin;
    let high = extent - physics.margin;

    if position < low {
        (low, velocity * -physics.bounce)
    } else if position > high {
        (high, velocity * -physics.bounce)
    } else {
        (position, velocity)
    }
}

pub fn transform_for(position: Vec2) -> String {
    format!("translate3d({}px, {}px, 0)", position.x, position.y)
}
