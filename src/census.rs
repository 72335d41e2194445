//! Town-hall census over a league group.

use crate::types::{CensusTable, LeagueGroup, LevelDisplay};

/// Bucketing key for a town-hall level. Absent, zero, or negative levels all
/// land in the `"Unknown"` bucket.
pub fn normalize_level(level: Option<i64>) -> String {
    match level {
        Some(th) if th >= 1 => th.to_string(),
        _ => "Unknown".to_string(),
    }
}

/// Display form of a town-hall level: the number when known, `"?"` otherwise.
/// The census table and the missing-member list deliberately use different
/// fallbacks; these two functions are the only places that decide them.
pub fn normalize_level_for_display(level: Option<i64>) -> LevelDisplay {
    match level {
        Some(th) if th >= 1 => LevelDisplay::Known(th),
        _ => LevelDisplay::Unknown,
    }
}

/// Builds the level -> clan name -> member count table for a league group.
///
/// Counts for a clan always sum to that clan's member-list length; a clan
/// with a malformed or absent member list contributes nothing.
pub fn census_table(group: &LeagueGroup) -> CensusTable {
    let mut table = CensusTable::new();
    for clan in &group.clans {
        for member in &clan.members {
            let count = table
                .entry(normalize_level(member.town_hall_level))
                .or_default()
                .entry(clan.name.clone())
                .or_insert(0);
            *count += 1;
        }
    }
    table
}
