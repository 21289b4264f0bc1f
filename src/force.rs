//! Force-directed packing of circles.
//!
//! Each tick pulls every body toward the centre on both axes, resolves
//! collisions between padded circles, then damps velocities and moves the
//! bodies. A global `alpha` scales the centring pull and decays geometrically
//! every tick; once it falls below `alpha_min` the simulation stops on its own
//! and a final separation pass removes any overlap that is left.
//!
//! ```
//! use gapviz::force::{ForceParams, ForcePackLayout};
//! use gapviz::models::{BubbleItem, Point};
//! use gapviz::color::Color;
//!
//! let items = vec![
//!     BubbleItem::new("a", "A", 100.0, Color::GREEN),
//!     BubbleItem::new("b", "B", 25.0, Color::RED),
//! ];
//! let mut layout = ForcePackLayout::new(&items, Point::new(300.0, 100.0), ForceParams::default());
//! layout.run_to_convergence(1_000);
//! assert!(!layout.is_running());
//! assert_eq!(layout.overlaps(), 0);
//! ```

use crate::config::Options;
use crate::models::{BubbleItem, Point};

/// Golden-angle step of the initial spiral.
const INITIAL_ANGLE: f64 = 2.399_963_229_728_653; // PI * (3 - sqrt(5))
const INITIAL_RADIUS: f64 = 10.0;

/// Slack allowed when checking separation.
const SEPARATION_EPS: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceParams {
    pub center_strength: f64,
    pub collision_strength: f64,
    pub decay_rate: f64,
    pub velocity_decay: f64,
    pub alpha_min: f64,
    pub reheat_alpha: f64,
    pub radius_scale: f64,
    /// Gap kept between two circles, split evenly between them.
    pub padding: f64,
}

impl Default for ForceParams {
    fn default() -> Self {
        Self::from(&Options::default())
    }
}

impl From<&Options> for ForceParams {
    fn from(o: &Options) -> Self {
        Self {
            center_strength: o.center_strength,
            collision_strength: o.collision_strength,
            decay_rate: o.decay_rate,
            velocity_decay: o.velocity_decay,
            alpha_min: o.alpha_min,
            reheat_alpha: o.reheat_alpha,
            radius_scale: o.radius_scale,
            padding: o.collision_padding,
        }
    }
}

/// Visual radius for a magnitude: area proportional to magnitude.
pub fn radius_for(magnitude: f64, k: f64) -> f64 {
    let m = if magnitude.is_finite() { magnitude.max(0.0) } else { 0.0 };
    k * m.sqrt()
}

/// Simulated position of one item.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub radius: f64,
}

impl Body {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

#[derive(Debug, Clone)]
pub struct ForcePackLayout {
    bodies: Vec<Body>,
    center: Point,
    params: ForceParams,
    alpha: f64,
    running: bool,
    ticks: usize,
}

impl ForcePackLayout {
    /// Seed bodies on a spiral around `center`, alpha at 1.
    pub fn new(items: &[BubbleItem], center: Point, params: ForceParams) -> Self {
        let bodies = items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let r = INITIAL_RADIUS * (0.5 + i as f64).sqrt();
                let a = i as f64 * INITIAL_ANGLE;
                Body {
                    id: item.id.clone(),
                    x: center.x + r * a.cos(),
                    y: center.y + r * a.sin(),
                    vx: 0.0,
                    vy: 0.0,
                    radius: radius_for(item.magnitude(), params.radius_scale),
                }
            })
            .collect();
        Self {
            bodies,
            center,
            params,
            alpha: 1.0,
            running: true,
            ticks: 0,
        }
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn position(&self, index: usize) -> Option<Point> {
        self.bodies.get(index).map(Body::position)
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn ticks(&self) -> usize {
        self.ticks
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Halt immediately. Positions stay where the last tick left them.
    pub fn stop(&mut self) {
        if self.running {
            log::debug!("force layout stopped at alpha {:.4}", self.alpha);
        }
        self.running = false;
    }

    /// Raise alpha to at least `alpha` and resume.
    pub fn reheat(&mut self, alpha: f64) {
        self.alpha = self.alpha.max(alpha.clamp(0.0, 1.0));
        self.running = self.alpha >= self.params.alpha_min;
    }

    /// Move the centring target and partially restart. Positions are kept.
    pub fn set_center(&mut self, center: Point) {
        self.center = center;
        self.reheat(self.params.reheat_alpha);
    }

    /// Advance one step. Returns whether the simulation still wants frames.
    pub fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.alpha += (0.0 - self.alpha) * self.params.decay_rate;
        self.apply_centering();
        self.apply_collisions();
        let keep = 1.0 - self.params.velocity_decay;
        for b in &mut self.bodies {
            b.vx *= keep;
            b.vy *= keep;
            b.x += b.vx;
            b.y += b.vy;
        }
        self.ticks += 1;

        if self.alpha < self.params.alpha_min {
            self.running = false;
            let rounds = self.settle();
            log::debug!(
                "force layout converged after {} ticks ({} settle rounds)",
                self.ticks,
                rounds
            );
        }
        self.running
    }

    /// Tick until converged or `max_ticks` spent. Returns ticks run.
    pub fn run_to_convergence(&mut self, max_ticks: usize) -> usize {
        let mut n = 0;
        while n < max_ticks && self.tick() {
            n += 1;
        }
        n
    }

    /// Number of pairs whose circles (without padding) intersect.
    pub fn overlaps(&self) -> usize {
        let mut count = 0;
        for i in 0..self.bodies.len() {
            for j in (i + 1)..self.bodies.len() {
                let (a, b) = (&self.bodies[i], &self.bodies[j]);
                if a.position().distance(b.position()) + SEPARATION_EPS < a.radius + b.radius {
                    count += 1;
                }
            }
        }
        count
    }

    fn apply_centering(&mut self) {
        let k = self.params.center_strength * self.alpha;
        for b in &mut self.bodies {
            b.vx += (self.center.x - b.x) * k;
            b.vy += (self.center.y - b.y) * k;
        }
    }

    fn collide_radius(&self, b: &Body) -> f64 {
        b.radius + self.params.padding / 2.0
    }

    /// Pairwise separation on predicted positions, pushing the smaller body further.
    fn apply_collisions(&mut self) {
        let n = self.bodies.len();
        let strength = self.params.collision_strength;
        for i in 0..n {
            let ri = self.collide_radius(&self.bodies[i]);
            for j in (i + 1)..n {
                let rj = self.collide_radius(&self.bodies[j]);
                let (a, b) = (&self.bodies[i], &self.bodies[j]);
                let mut dx = (a.x + a.vx) - (b.x + b.vx);
                let mut dy = (a.y + a.vy) - (b.y + b.vy);
                let r = ri + rj;
                let mut l2 = dx * dx + dy * dy;
                if l2 >= r * r {
                    continue;
                }
                if l2 == 0.0 {
                    (dx, dy) = jiggle(i, j);
                    l2 = dx * dx + dy * dy;
                }
                let l = l2.sqrt();
                let push = (r - l) / l * strength;
                dx *= push;
                dy *= push;
                let (ri2, rj2) = (ri * ri, rj * rj);
                let share = if ri2 + rj2 > 0.0 { rj2 / (ri2 + rj2) } else { 0.5 };
                self.bodies[i].vx += dx * share;
                self.bodies[i].vy += dy * share;
                self.bodies[j].vx -= dx * (1.0 - share);
                self.bodies[j].vy -= dy * (1.0 - share);
            }
        }
    }

    /// Hard separation of padded circles, positions only. Returns rounds used.
    fn settle(&mut self) -> usize {
        let n = self.bodies.len();
        let max_rounds = 64 + 8 * n;
        for round in 0..max_rounds {
            let mut moved = false;
            for i in 0..n {
                for j in (i + 1)..n {
                    let r = self.collide_radius(&self.bodies[i]) + self.collide_radius(&self.bodies[j]);
                    let mut dx = self.bodies[i].x - self.bodies[j].x;
                    let mut dy = self.bodies[i].y - self.bodies[j].y;
                    let mut l = dx.hypot(dy);
                    if l + SEPARATION_EPS >= r {
                        continue;
                    }
                    if l == 0.0 {
                        (dx, dy) = jiggle(i, j);
                        l = dx.hypot(dy);
                    }
                    // Slight overshoot so the pair clears the tolerance.
                    let half = (r - l) / 2.0 + SEPARATION_EPS;
                    let (ux, uy) = (dx / l, dy / l);
                    self.bodies[i].x += ux * half;
                    self.bodies[i].y += uy * half;
                    self.bodies[j].x -= ux * half;
                    self.bodies[j].y -= uy * half;
                    moved = true;
                }
            }
            if !moved {
                return round;
            }
        }
        log::debug!("settle pass hit its round limit");
        max_rounds
    }
}

/// Deterministic tiny offset for coincident centres.
fn jiggle(i: usize, j: usize) -> (f64, f64) {
    let a = (i * 31 + j) as f64 * INITIAL_ANGLE;
    (a.cos() * 1e-3, a.sin() * 1e-3)
}
