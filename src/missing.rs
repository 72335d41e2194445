//! Missing-member detection: league-group roster vs live clan rosters.

use serde_json::Value;
use std::collections::HashSet;

use crate::census::normalize_level_for_display;
use crate::client::CocClient;
use crate::errors::{GatewayError, Result};
use crate::types::{LeagueGroup, MissingEntry};

/// Reports every league-group member absent from their clan's live roster.
///
/// One profile fetch per clan, all issued before any is awaited; results are
/// merged in clan-list order, so the output is deterministic regardless of
/// completion order. A single failed fetch fails the whole comparison.
pub async fn missing_members(
    client: &CocClient,
    group: &LeagueGroup,
) -> Result<Vec<MissingEntry>> {
    let fetches: Vec<_> = group
        .clans
        .iter()
        .map(|clan| {
            let client = client.clone();
            // League clan tags already carry their # prefix.
            let tag = clan.tag.clone();
            tokio::spawn(async move { client.clan(&tag).await })
        })
        .collect();

    let mut missing = Vec::new();
    for (clan, fetch) in group.clans.iter().zip(fetches) {
        let profile = fetch
            .await
            .map_err(|e| GatewayError::UpstreamFailure(e.to_string()))??;
        let roster = live_roster_tags(&profile);

        for member in &clan.members {
            if !roster.contains(member.tag.as_str()) {
                missing.push(MissingEntry {
                    name: member.name.clone(),
                    tag: member.tag.clone(),
                    clan: clan.name.clone(),
                    th: normalize_level_for_display(member.town_hall_level),
                });
            }
        }
    }

    Ok(missing)
}

/// Tag set of a clan profile's `memberList`; absent or malformed lists count
/// as empty, which marks every declared league member as missing.
fn live_roster_tags(profile: &Value) -> HashSet<&str> {
    profile
        .get("memberList")
        .and_then(Value::as_array)
        .map(|members| {
            members
                .iter()
                .filter_map(|member| member.get("tag").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LevelDisplay;
    use serde_json::json;
    use url::Url;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> CocClient {
        let base_url = Url::parse(&format!("{}/v1", server.uri())).unwrap();
        CocClient::new(base_url, "test-token".to_string())
    }

    fn two_clan_group() -> LeagueGroup {
        LeagueGroup::from_value(&json!({
            "clans": [
                {"tag": "#AAA", "name": "ClanA", "members": [
                    {"name": "Alice", "tag": "#P1", "townHallLevel": 10},
                    {"name": "Bob", "tag": "#P2", "townHallLevel": 9}
                ]},
                {"tag": "#BBB", "name": "ClanB", "members": [
                    {"name": "Cleo", "tag": "#P3"}
                ]}
            ]
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn reports_only_members_absent_from_live_roster() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/clans/%23AAA"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "memberList": [{"tag": "#P1"}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/clans/%23BBB"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "memberList": []
            })))
            .mount(&server)
            .await;

        let missing = missing_members(&test_client(&server), &two_clan_group())
            .await
            .unwrap();

        assert_eq!(
            missing,
            vec![
                MissingEntry {
                    name: "Bob".to_string(),
                    tag: "#P2".to_string(),
                    clan: "ClanA".to_string(),
                    th: LevelDisplay::Known(9),
                },
                MissingEntry {
                    name: "Cleo".to_string(),
                    tag: "#P3".to_string(),
                    clan: "ClanB".to_string(),
                    th: LevelDisplay::Unknown,
                },
            ]
        );
    }

    #[tokio::test]
    async fn profile_without_member_list_marks_everyone_missing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/clans/%23AAA"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "ClanA"})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/clans/%23BBB"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "memberList": [{"tag": "#P3"}]
            })))
            .mount(&server)
            .await;

        let missing = missing_members(&test_client(&server), &two_clan_group())
            .await
            .unwrap();
        let tags: Vec<&str> = missing.iter().map(|entry| entry.tag.as_str()).collect();
        assert_eq!(tags, vec!["#P1", "#P2"]);
    }

    #[tokio::test]
    async fn one_failed_fetch_fails_the_whole_comparison() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/clans/%23AAA"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"memberList": []})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/clans/%23BBB"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let result = missing_members(&test_client(&server), &two_clan_group()).await;
        assert!(matches!(result, Err(GatewayError::UpstreamFailure(_))));
    }

    #[tokio::test]
    async fn empty_group_yields_no_entries() {
        let server = MockServer::start().await;
        let missing = missing_members(&test_client(&server), &LeagueGroup::default())
            .await
            .unwrap();
        assert!(missing.is_empty());
    }
}
