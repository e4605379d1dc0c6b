use crate::environment::{AgentId, Environment};
use crate::geometry::ellipse_perimeter;
use anyhow::Result;
use openfield_common::{angle_to_vec, vec_to_angle, SimError, SimParams, Vec2};
use rand::prelude::*;
use rand::distr::Uniform;
use rand_distr::Normal;
use std::f32::consts::TAU;

/// One ellipse-shaped agent performing a correlated random walk.
///
/// The agent owns its kinematic state and full movement history; the
/// [`Environment`] owns the committed footprint the rest of the arena sees.
/// The two are linked only through the agent's id handle.
pub struct Agent {
    id: AgentId,
    major_axis: f32,
    minor_axis: f32,
    angular_step: f32,

    speed_dist: Normal<f32>,
    heading_noise: Normal<f32>,
    uniform_heading: Uniform<f32>,

    x_center: f32,
    y_center: f32,

    // Append-only, one entry per tick (plus the initial placement).
    // All four always have equal length.
    x_center_history: Vec<f32>,
    y_center_history: Vec<f32>,
    x_perimeter_history: Vec<Vec<f32>>,
    y_perimeter_history: Vec<Vec<f32>>,
}

/// Initial center for the agent placed `order_placed`-th out of `n_agents`.
///
/// Positions are the interior breakpoints of `n_agents + 2` equally spaced
/// positions spanning each axis, skipping the two on the walls. A lone
/// agent starts at the exact arena center.
fn initial_center(n_agents: u32, order_placed: u32, width: f32, height: f32) -> Vec2 {
    if n_agents == 1 {
        Vec2::new(width / 2.0, height / 2.0)
    } else {
        let fraction = (order_placed + 1) as f32 / (n_agents + 1) as f32;
        Vec2::new(width * fraction, height * fraction)
    }
}

impl Agent {
    /// Creates an agent, registers it with the arena and commits its
    /// initial footprint.
    ///
    /// Initial positions are constructed spread out, so the t=0 commit
    /// skips validation; it also seeds both history sequences.
    pub fn new(
        env: &mut Environment,
        params: &SimParams,
        order_placed: u32,
        rng: &mut StdRng,
    ) -> Result<Self> {
        let id = env.allocate_id();
        if !env.register(id) {
            return Err(SimError::DuplicateIdentifier(id.0).into());
        }

        let speed_dist = Normal::new(params.avg_speed, params.speed_std)?;
        let heading_noise = Normal::new(0.0, params.heading_sigma)?;
        let uniform_heading = Uniform::new(0.0f32, TAU)?;

        let center = initial_center(params.n_agents, order_placed, env.width(), env.height());
        let heading = rng.sample(uniform_heading);
        let (xs, ys) = ellipse_perimeter(
            center,
            heading,
            params.major_axis,
            params.minor_axis,
            params.angular_step,
        );
        env.commit(id, &xs, &ys);

        let mut agent = Self {
            id,
            major_axis: params.major_axis,
            minor_axis: params.minor_axis,
            angular_step: params.angular_step,
            speed_dist,
            heading_noise,
            uniform_heading,
            x_center: center.x,
            y_center: center.y,
            x_center_history: Vec::new(),
            y_center_history: Vec::new(),
            x_perimeter_history: Vec::new(),
            y_perimeter_history: Vec::new(),
        };
        agent.push_history(xs, ys);
        Ok(agent)
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x_center, self.y_center)
    }

    /// Center positions over time, x and y sequences.
    pub fn center_history(&self) -> (&[f32], &[f32]) {
        (&self.x_center_history, &self.y_center_history)
    }

    /// Perimeter point sets over time, x and y sequences.
    pub fn perimeter_history(&self) -> (&[Vec<f32>], &[Vec<f32>]) {
        (&self.x_perimeter_history, &self.y_perimeter_history)
    }

    /// Number of recorded timepoints (initial placement included).
    pub fn timepoints(&self) -> usize {
        self.x_center_history.len()
    }

    /// Direction the agent came from, as the arctangent of the
    /// displacement between its last two committed centers.
    fn previous_heading(&self) -> f32 {
        let n = self.x_center_history.len();
        vec_to_angle(Vec2::new(
            self.x_center_history[n - 2] - self.x_center_history[n - 1],
            self.y_center_history[n - 2] - self.y_center_history[n - 1],
        ))
    }

    /// Draws the rotation angle for the next candidate: uniform on the
    /// first move or after a rejected candidate, otherwise Gaussian around
    /// the previous heading (the persistence bias).
    fn sample_heading(&self, hit_wall: bool, rng: &mut StdRng) -> f32 {
        if self.x_center_history.len() <= 1 || hit_wall {
            rng.sample(self.uniform_heading)
        } else {
            self.previous_heading() + self.heading_noise.sample(rng)
        }
    }

    /// Samples one candidate center and the heading that produced it.
    fn candidate_center(&self, tick_ms: f32, hit_wall: bool, rng: &mut StdRng) -> (Vec2, f32) {
        let speed = self.speed_dist.sample(rng);
        let distance = speed * tick_ms;
        let heading = self.sample_heading(hit_wall, rng);
        let center = self.center().add(angle_to_vec(heading).scale(distance));
        (center, heading)
    }

    /// Attempts one move of duration `tick_ms` via bounded rejection
    /// sampling: draw a candidate, ask the arena to validate it, redraw
    /// with the uniform-heading branch forced after any rejection.
    ///
    /// On acceptance the center is updated, both histories are appended and
    /// the footprint is committed; returns how many candidates were
    /// rejected along the way. Exhausting `max_retries` candidates leaves
    /// the agent's state untouched and surfaces [`SimError::NoValidMoveFound`]
    /// so the driver can apply its fallback policy.
    pub fn step(
        &mut self,
        env: &mut Environment,
        tick_ms: f32,
        max_retries: u32,
        rng: &mut StdRng,
    ) -> Result<u32, SimError> {
        let mut hit_wall = false;
        let mut rejected = 0u32;

        for _attempt in 0..max_retries {
            let (center, heading) = self.candidate_center(tick_ms, hit_wall, rng);
            let (xs, ys) = ellipse_perimeter(
                center,
                heading,
                self.major_axis,
                self.minor_axis,
                self.angular_step,
            );

            if env.valid_move(self.id, &xs, &ys) {
                self.x_center = center.x;
                self.y_center = center.y;
                env.commit(self.id, &xs, &ys);
                self.push_history(xs, ys);
                return Ok(rejected);
            }

            hit_wall = true;
            rejected += 1;
        }

        Err(SimError::NoValidMoveFound {
            agent: self.id.0,
            tick: self.x_center_history.len() as u32 - 1,
            attempts: max_retries,
            arena_width: env.width(),
            arena_height: env.height(),
        })
    }

    /// Fallback for a tick with no valid move: keep the current position,
    /// re-commit the current footprint and append it to the histories so
    /// timepoints stay aligned across agents.
    pub fn hold_position(&mut self, env: &mut Environment) {
        let xs = self.x_perimeter_history.last().cloned().unwrap_or_default();
        let ys = self.y_perimeter_history.last().cloned().unwrap_or_default();
        env.commit(self.id, &xs, &ys);
        self.push_history(xs, ys);
    }

    fn push_history(&mut self, xs: Vec<f32>, ys: Vec<f32>) {
        self.x_center_history.push(self.x_center);
        self.y_center_history.push(self.y_center);
        self.x_perimeter_history.push(xs);
        self.y_perimeter_history.push(ys);
    }
}
