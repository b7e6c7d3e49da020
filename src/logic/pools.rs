//! Pool allocation and qualification for the pools + knockout format.

use crate::logic::standings::rank_teams;
use crate::models::{Pool, PoolKey, TeamKey, TournamentError};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeMap;

/// Shuffle `team_keys` and slice them into `pool_count` groups of `ceil(n / pool_count)`,
/// keyed `poolA..poolD` in order. The last pool takes the remainder.
///
/// Fails if `pool_count` is zero, above 4, above the team count, or if slicing would leave
/// a pool without teams.
pub fn allocate_pools<R: Rng + ?Sized>(
    team_keys: &[TeamKey],
    pool_count: usize,
    rng: &mut R,
) -> Result<BTreeMap<PoolKey, Vec<TeamKey>>, TournamentError> {
    let invalid = TournamentError::InvalidPoolConfig {
        pools: pool_count,
        teams: team_keys.len(),
    };
    if pool_count == 0 || pool_count > PoolKey::ALL.len() || pool_count > team_keys.len() {
        return Err(invalid);
    }
    let per_pool = team_keys.len().div_ceil(pool_count);
    if per_pool * (pool_count - 1) >= team_keys.len() {
        return Err(invalid);
    }

    let mut shuffled = team_keys.to_vec();
    shuffled.shuffle(rng);

    let pools: BTreeMap<PoolKey, Vec<TeamKey>> = PoolKey::ALL
        .into_iter()
        .zip(shuffled.chunks(per_pool))
        .map(|(key, chunk)| (key, chunk.to_vec()))
        .collect();
    log::debug!("allocated {} teams into {} pools", team_keys.len(), pools.len());
    Ok(pools)
}

/// Top `qualified_per_pool` teams of each pool by leaderboard order, pools in key order.
pub fn qualified_teams(pools: &BTreeMap<PoolKey, Pool>, qualified_per_pool: usize) -> Vec<TeamKey> {
    pools
        .values()
        .flat_map(|pool| {
            rank_teams(&pool.standings, &pool.teams)
                .into_iter()
                .take(qualified_per_pool)
        })
        .collect()
}
