//! Round index to war document resolution.

use serde_json::Value;

use crate::client::CocClient;
use crate::errors::{GatewayError, Result};
use crate::types::LeagueGroup;

/// Parses the human 1-based round index from a request path segment.
pub fn parse_round_index(raw: &str) -> Result<usize> {
    match raw.parse::<i64>() {
        Ok(index) if index >= 1 => Ok(index as usize),
        _ => Err(GatewayError::InvalidIndex),
    }
}

/// Resolves a 1-based round index against the group's ordered round list and
/// fetches the war document behind its war tag.
///
/// An out-of-range index and a war tag whose document 404s upstream are
/// reported identically as `RoundNotFound`; both usually mean an unstarted
/// war or a wrong clan tag. This also covers the `#0` placeholder tag
/// upstream emits for rounds that have not started.
pub async fn resolve_war(
    client: &CocClient,
    group: &LeagueGroup,
    index: usize,
) -> Result<Value> {
    // Guards its own lower bound rather than trusting callers to have run
    // parse_round_index first; index 0 must not underflow.
    let round = index
        .checked_sub(1)
        .and_then(|pos| group.rounds.get(pos))
        .ok_or(GatewayError::RoundNotFound)?;

    match client.war(&round.war_tag).await {
        Err(GatewayError::UpstreamNotFound) => Err(GatewayError::RoundNotFound),
        other => other,
    }
}
