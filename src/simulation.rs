use crate::agent::Agent;
use crate::environment::Environment;
use anyhow::Result;
use log::warn;
use openfield_common::{SimError, SimParams, SimulationConfig, TrajectoryDataset, TrajectoryMeta};
use rand::prelude::*;

/// Owns the arena, the agents and the run's RNG, and steps them in a
/// fixed, deterministic order.
///
/// Movement is strictly sequential: within one tick, each agent validates
/// its candidate against the registry as already updated by earlier movers,
/// so a later agent can be blocked by an earlier agent's brand-new
/// position. That ordering is part of the collision semantics.
pub struct ArenaSimulation {
    config: SimulationConfig,
    params: SimParams,
    env: Environment,
    agents: Vec<Agent>,
    rng: StdRng,
    current_tick: u32,
    rejected_candidates: u64,
    no_valid_move_events: u32,
}

impl ArenaSimulation {
    pub fn new(config: SimulationConfig) -> Result<Self> {
        let params = config.get_sim_params();
        let mut env = Environment::new(params.arena_width, params.arena_height);
        let mut rng = StdRng::seed_from_u64(config.movement.rng_seed);

        let agents = (0..params.n_agents)
            .map(|order| Agent::new(&mut env, &params, order, &mut rng))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            config,
            params,
            env,
            agents,
            rng,
            current_tick: 0,
            rejected_candidates: 0,
            no_valid_move_events: 0,
        })
    }

    /// Advances the simulation by one tick: every agent attempts exactly
    /// one move, in placement order.
    ///
    /// A tick whose retry budget runs out for some agent is not fatal: the
    /// agent keeps its previous position for this tick and the event is
    /// counted.
    pub fn tick(&mut self) -> Result<()> {
        for agent in &mut self.agents {
            match agent.step(
                &mut self.env,
                self.params.tick_ms,
                self.params.max_move_retries,
                &mut self.rng,
            ) {
                Ok(rejected) => self.rejected_candidates += u64::from(rejected),
                Err(e @ SimError::NoValidMoveFound { .. }) => {
                    warn!("{e}; agent keeps its previous position for this tick");
                    agent.hold_position(&mut self.env);
                    self.no_valid_move_events += 1;
                    self.rejected_candidates += u64::from(self.params.max_move_retries);
                }
                Err(e) => return Err(e.into()),
            }
        }
        self.current_tick += 1;
        Ok(())
    }

    pub fn params(&self) -> &SimParams {
        &self.params
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn current_tick(&self) -> u32 {
        self.current_tick
    }

    pub fn rejected_candidates(&self) -> u64 {
        self.rejected_candidates
    }

    pub fn no_valid_move_events(&self) -> u32 {
        self.no_valid_move_events
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Current center of every agent, in placement order.
    pub fn final_centers(&self) -> Vec<(f32, f32)> {
        self.agents
            .iter()
            .map(|agent| (agent.center().x, agent.center().y))
            .collect()
    }

    /// Assembles the per-agent histories into the persisted dataset layout:
    /// columns alternate x,y per agent in placement order.
    pub fn build_trajectory(&self) -> TrajectoryDataset {
        let n_agents = self.agents.len();
        let timepoints = self.agents.first().map_or(0, Agent::timepoints);

        let mut center_history = vec![vec![0.0f32; 2 * n_agents]; timepoints];
        let mut perimeter_history = vec![vec![Vec::new(); 2 * n_agents]; timepoints];

        for (i, agent) in self.agents.iter().enumerate() {
            let (cx, cy) = agent.center_history();
            let (px, py) = agent.perimeter_history();
            for t in 0..timepoints {
                center_history[t][2 * i] = cx[t];
                center_history[t][2 * i + 1] = cy[t];
                perimeter_history[t][2 * i] = px[t].clone();
                perimeter_history[t][2 * i + 1] = py[t].clone();
            }
        }

        TrajectoryDataset {
            meta: TrajectoryMeta {
                arena_width: self.params.arena_width,
                arena_height: self.params.arena_height,
                n_agents: self.params.n_agents,
                run_minutes: self.params.run_minutes,
                avg_speed: self.params.avg_speed,
                speed_std: self.params.speed_std,
                major_axis: self.params.major_axis,
                minor_axis: self.params.minor_axis,
            },
            center_history,
            perimeter_history,
        }
    }
}
