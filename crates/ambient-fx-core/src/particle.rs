use glam::Vec2;
use rand::Rng;
use std::f32::consts::TAU;

/// Smallest flake radius in CSS pixels.
pub const MIN_RADIUS: f32 = 1.0;
/// Radius spread above `MIN_RADIUS`; the largest flake is 3.6px.
pub const RADIUS_SPAN: f32 = 2.6;
/// Horizontal sway added per frame at the crest of the wobble.
pub const WOBBLE_AMPLITUDE: f32 = 0.25;
/// How far a flake may drift past a side edge before it wraps.
pub const EDGE_MARGIN: f32 = 10.0;
/// Maximum extra height above the top edge a recycled flake starts at.
pub const RESPAWN_JITTER: f32 = 20.0;

/// SoA flake storage. All vectors have length `count`.
pub struct FlakeSet {
    pub count: usize,
    pub position: Vec<Vec2>,
    /// Per-frame displacement; `y` is the constant downward drift.
    pub velocity: Vec<Vec2>,
    pub radius: Vec<f32>,
    /// Sway phase in radians.
    pub wobble: Vec<f32>,
    /// Phase increment per frame.
    pub wobble_speed: Vec<f32>,
}

impl FlakeSet {
    pub fn new(count: usize) -> Self {
        Self {
            count,
            position: vec![Vec2::ZERO; count],
            velocity: vec![Vec2::ZERO; count],
            radius: vec![MIN_RADIUS; count],
            wobble: vec![0.0; count],
            wobble_speed: vec![0.0; count],
        }
    }

    /// Allocate `count` flakes scattered uniformly over a `width` x `height`
    /// viewport.
    pub fn scatter<R: Rng + ?Sized>(count: usize, width: f32, height: f32, rng: &mut R) -> Self {
        let mut flakes = Self::new(count);
        for i in 0..count {
            let r = MIN_RADIUS + rng.gen::<f32>() * RADIUS_SPAN;
            flakes.radius[i] = r;
            flakes.position[i] = Vec2::new(rng.gen::<f32>() * width, rng.gen::<f32>() * height);
            // Bigger flakes fall faster and drift further.
            flakes.velocity[i] = Vec2::new(
                (-0.3 + rng.gen::<f32>() * 0.6) * (0.6 + r / 4.0),
                (0.7 + rng.gen::<f32>() * 1.6) * (0.7 + r / 4.0),
            );
            flakes.wobble[i] = rng.gen::<f32>() * TAU;
            flakes.wobble_speed[i] = 0.008 + rng.gen::<f32>() * 0.02;
        }
        flakes
    }

    /// Advance every flake by one frame and wrap the ones that left the
    /// viewport. The pool never grows or shrinks.
    pub fn step<R: Rng + ?Sized>(&mut self, width: f32, height: f32, rng: &mut R) {
        for i in 0..self.count {
            self.wobble[i] += self.wobble_speed[i];
            let sway = self.wobble[i].sin() * WOBBLE_AMPLITUDE;
            self.position[i].x += self.velocity[i].x + sway;
            self.position[i].y += self.velocity[i].y;
            self.wrap(i, width, height, rng);
        }
    }

    /// Recycle flake `i` to the top once it has fully passed the bottom
    /// edge, and carry it across a side edge once it drifts past the margin.
    pub fn wrap<R: Rng + ?Sized>(&mut self, i: usize, width: f32, height: f32, rng: &mut R) {
        let r = self.radius[i];
        let p = &mut self.position[i];

        if p.y - r > height {
            p.y = -r - rng.gen::<f32>() * RESPAWN_JITTER;
            p.x = rng.gen::<f32>() * width;
        }
        if p.x < -EDGE_MARGIN {
            p.x = width + EDGE_MARGIN;
        }
        if p.x > width + EDGE_MARGIN {
            p.x = -EDGE_MARGIN;
        }
    }
}
