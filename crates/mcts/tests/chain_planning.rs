//! End-to-end planning on the deterministic chain.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use replan_mcts::{envs::Chain, Planner, PlannerConfig, SearchOutcome, StatScope};

fn plan(config: PlannerConfig, seed: u64) -> SearchOutcome {
    let mut planner =
        Planner::new(Chain::new(), config, ChaCha8Rng::seed_from_u64(seed)).unwrap();
    planner.search()
}

fn chain_config() -> PlannerConfig {
    PlannerConfig {
        rollout_depth: 5,
        simulations: 100,
        exploration: 1.0,
        discount: 1.0,
        ..Default::default()
    }
}

/// Walking the chain pays 1 then 10; bailing out pays -1. The planner
/// must prefer the walk and rank its value higher.
#[test]
fn test_prefers_walking_the_chain() {
    let outcome = plan(chain_config(), 42);

    assert_eq!(outcome.best_action, Chain::WALK);
    assert!(
        outcome.action_values[Chain::WALK] > outcome.action_values[Chain::BAIL],
        "walk value {} should beat bail value {}",
        outcome.action_values[Chain::WALK],
        outcome.action_values[Chain::BAIL]
    );
}

/// Bailing out reaches a terminal node, so its rollout contributes
/// nothing: every sample of the bail edge is exactly the immediate -1,
/// at any discount.
#[test]
fn test_bail_out_value_is_exact() {
    for discount in [1.0, 0.5] {
        let mut config = chain_config();
        config.discount = discount;
        let outcome = plan(config, 7);

        assert!(outcome.visit_counts[Chain::BAIL] > 0);
        assert_eq!(outcome.action_values[Chain::BAIL], -1.0);
    }
}

/// With no discounting, a walk sample is 1 plus whatever the subtree and
/// rollout return below state 1 (at most 10), so Q stays within [0, 11].
#[test]
fn test_walk_value_within_return_bounds() {
    let outcome = plan(chain_config(), 42);

    let q = outcome.action_values[Chain::WALK];
    assert!(q > 0.0);
    assert!(q <= 11.0);
}

/// The aliasing policy is configuration, not correctness: both scopes
/// must solve the chain.
#[test]
fn test_both_stat_scopes_prefer_walking() {
    for scope in [StatScope::SharedByState, StatScope::PerNode] {
        let mut config = chain_config();
        config.stat_scope = scope;
        let outcome = plan(config, 42);

        assert_eq!(outcome.best_action, Chain::WALK, "scope {scope:?}");
    }
}

/// Identical seeds reproduce the search exactly.
#[test]
fn test_search_is_deterministic() {
    let first = plan(chain_config(), 12345);
    let second = plan(chain_config(), 12345);

    assert_eq!(first, second);
}

/// A single simulation still produces a usable outcome: one root edge
/// visited, best action pointing at it.
#[test]
fn test_single_simulation_budget() {
    let mut config = chain_config();
    config.simulations = 1;
    let outcome = plan(config, 3);

    assert_eq!(outcome.visit_counts.iter().sum::<u64>(), 1);
    assert_eq!(outcome.visit_counts[outcome.best_action], 1);
}

/// Default parameters (the harness values) also solve the chain.
#[test]
fn test_default_config_solves_chain() {
    let outcome = plan(PlannerConfig::default(), 9);
    assert_eq!(outcome.best_action, Chain::WALK);
}
