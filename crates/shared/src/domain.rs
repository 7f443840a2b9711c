use serde::{Deserialize, Serialize};

/// One redirection period and the person responsible for it. Start and end
/// boundaries stay display strings; the client never parses them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub person: String,
    pub start: String,
    pub end: String,
}

/// Wire shape of `GET /status`. Each poll fetches a fresh snapshot that
/// replaces the rendered state wholesale; `null` entries map to `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    #[serde(default)]
    pub current: Option<ScheduleEntry>,
    #[serde(default)]
    pub next: Option<ScheduleEntry>,
}
