use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Live bot statistics, served by `GET /api/stats` and pushed over the WebSocket.
#[derive(Serialize, Deserialize, ToSchema, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatsDto {
    pub guilds: usize,
    pub members: u64,
    pub channels: u64,
    pub commands_executed: u64,
    pub uptime_secs: u64,
    pub memory_bytes: u64,
    /// Gateway heartbeat latency of the first shard; absent until the first heartbeat ACK.
    pub latency_ms: Option<u64>,
}

/// Envelope for messages sent on the dashboard WebSocket.
#[derive(Serialize, Deserialize, ToSchema, Clone, Debug)]
pub struct PushEventDto {
    pub event: String,
    pub data: StatsDto,
}

impl PushEventDto {
    pub fn stats_update(data: StatsDto) -> Self {
        Self {
            event: "statsUpdate".to_string(),
            data,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GuildSummaryDto {
    #[serde(
        serialize_with = "serialize_u64_as_string",
        deserialize_with = "deserialize_u64_from_string"
    )]
    #[schema(value_type = String)]
    pub id: u64,
    pub name: String,
    pub member_count: u64,
    pub channel_count: u64,
    pub icon_url: Option<String>,
}

#[derive(Serialize, Deserialize, ToSchema, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatusDto {
    pub online: bool,
    /// Activity text currently shown on the bot's profile.
    pub activity: Option<String>,
    /// Text pinned from the dashboard; overrides rotation while set.
    pub pinned: Option<String>,
    pub uptime_secs: u64,
}

/// Body of `POST /api/status`. A missing or empty `activity` unpins the status.
#[derive(Serialize, Deserialize, ToSchema, Clone, Debug, Default)]
pub struct UpdateStatusDto {
    pub activity: Option<String>,
}

fn serialize_u64_as_string<S>(value: &u64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&value.to_string())
}

fn deserialize_u64_from_string<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    String::deserialize(deserializer)?
        .parse::<u64>()
        .map_err(D::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_event_uses_stats_update_envelope() {
        let event = PushEventDto::stats_update(StatsDto {
            guilds: 2,
            members: 10,
            channels: 4,
            commands_executed: 7,
            uptime_secs: 60,
            memory_bytes: 1024,
            latency_ms: None,
        });

        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["event"], "statsUpdate");
        assert_eq!(json["data"]["commandsExecuted"], 7);
        assert_eq!(json["data"]["memoryBytes"], 1024);
    }

    #[test]
    fn guild_id_is_serialized_as_string() {
        let guild = GuildSummaryDto {
            id: 123456789012345678,
            name: "Test".to_string(),
            member_count: 3,
            channel_count: 1,
            icon_url: None,
        };

        let json = serde_json::to_value(&guild).unwrap();

        assert_eq!(json["id"], "123456789012345678");
    }
}
