//! Built-in rosters.
//!
//! A scenario is just a list of [`AgentSpec`]s. [`populate`] turns specs
//! into agents with random spawn points inside the configured ranges.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use simulacrumbs_runner::CompletionSource;
use simulacrumbs_types::{Emotion, Position};

use crate::agent::Agent;
use crate::config::{SimulationConfig, SpawnRange};

/// Static description of an agent before it enters the arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentSpec {
    /// Display name.
    pub name: &'static str,
    /// Initial personality text.
    pub personality: &'static str,
    /// Emotion the agent tries to provoke.
    pub goal: Emotion,
}

/// The rosters the CLI can start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    /// A warrior and a ballerina.
    Warrior,
    /// Three housemates.
    Sims,
}

impl Scenario {
    /// Window title for the scenario.
    pub const fn title(self) -> &'static str {
        match self {
            Self::Warrior => "Warrior Game",
            Self::Sims => "Sims Game",
        }
    }

    /// Agents in this scenario, in roster order.
    pub fn roster(self) -> Vec<AgentSpec> {
        match self {
            Self::Warrior => vec![
                AgentSpec {
                    name: "warrior",
                    personality: "You are a warrior",
                    goal: Emotion::Sad,
                },
                AgentSpec {
                    name: "ballerina",
                    personality: "You are a ballerina",
                    goal: Emotion::Happy,
                },
            ],
            Self::Sims => vec![
                AgentSpec {
                    name: "chef",
                    personality: "You are a cheerful chef who loves feeding your housemates",
                    goal: Emotion::Happy,
                },
                AgentSpec {
                    name: "landlord",
                    personality: "You are a stern landlord collecting overdue rent",
                    goal: Emotion::Angry,
                },
                AgentSpec {
                    name: "poet",
                    personality: "You are a gloomy poet reading your verses to anyone nearby",
                    goal: Emotion::Sad,
                },
            ],
        }
    }
}

/// Random source for spawn points; seeded when `seed` is set.
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64)
}

/// Create agents for `specs`, all driven by `source`.
///
/// Spawn x is an offset from the arena's left edge so the agents never
/// start under a text panel.
pub fn populate(
    specs: &[AgentSpec],
    source: &Arc<dyn CompletionSource>,
    config: &SimulationConfig,
    rng: &mut impl Rng,
) -> Vec<Agent> {
    let left = config.arena.bounds(specs.len()).min_x;
    specs
        .iter()
        .map(|spec| {
            let x = left.saturating_add(pick(rng, config.arena.spawn_x));
            let y = pick(rng, config.arena.spawn_y);
            Agent::new(spec.name, spec.personality, spec.goal, Arc::clone(source))
                .with_position(Position::new(x, y))
                .with_step(config.arena.step)
                .with_move_delay(config.timing.move_delay())
        })
        .collect()
}

fn pick(rng: &mut impl Rng, range: SpawnRange) -> i32 {
    if range.start >= range.end {
        range.start
    } else {
        rng.random_range(range.start..range.end)
    }
}

#[cfg(test)]
mod tests {
    use simulacrumbs_runner::StubSource;

    use super::*;

    fn source() -> Arc<dyn CompletionSource> {
        Arc::new(StubSource::default())
    }

    #[test]
    fn warrior_roster_matches_goals() {
        let roster = Scenario::Warrior.roster();
        let goals: Vec<_> = roster.iter().map(|s| (s.personality, s.goal)).collect();
        assert_eq!(
            goals,
            vec![
                ("You are a warrior", Emotion::Sad),
                ("You are a ballerina", Emotion::Happy),
            ]
        );
    }

    #[test]
    fn sims_goals_are_distinct() {
        let roster = Scenario::Sims.roster();
        assert_eq!(roster.len(), 3);
        let mut goals: Vec<_> = roster.iter().map(|s| s.goal.as_str()).collect();
        goals.sort_unstable();
        goals.dedup();
        assert_eq!(goals.len(), 3);
    }

    #[test]
    fn spawns_inside_configured_ranges() {
        let config = SimulationConfig::default();
        let mut rng = seeded_rng(Some(1));
        let agents = populate(&Scenario::Sims.roster(), &source(), &config, &mut rng);
        let left = config.arena.bounds(3).min_x;

        for agent in &agents {
            let pos = agent.position();
            assert!(pos.x >= left.saturating_add(300) && pos.x < left.saturating_add(600));
            assert!(pos.y >= 200 && pos.y < 600);
        }
    }

    #[test]
    fn same_seed_same_spawns() {
        let config = SimulationConfig::default();
        let roster = Scenario::Warrior.roster();
        let first: Vec<_> = populate(&roster, &source(), &config, &mut seeded_rng(Some(9)))
            .iter()
            .map(Agent::position)
            .collect();
        let second: Vec<_> = populate(&roster, &source(), &config, &mut seeded_rng(Some(9)))
            .iter()
            .map(Agent::position)
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn empty_range_uses_start() {
        let mut rng = seeded_rng(Some(0));
        assert_eq!(pick(&mut rng, SpawnRange { start: 50, end: 50 }), 50);
        assert_eq!(pick(&mut rng, SpawnRange { start: 70, end: 10 }), 70);
    }
}
