use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorDto {
    pub error: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthDto {
    /// `ok` when every dependency answered, `degraded` otherwise.
    pub status: String,
    pub database: bool,
    pub uptime_secs: u64,
}
