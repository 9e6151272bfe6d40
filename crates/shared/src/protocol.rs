use serde::{Deserialize, Serialize};

/// Collection body as served by the provider, before any mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEnvelope {
    pub info: RawPageInfo,
    pub results: Vec<RawRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPageInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<u64>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub prev: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    pub id: i64,
    pub name: String,
    pub status: String,
    pub species: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    pub gender: String,
    #[serde(default)]
    pub image: Option<String>,
}

impl RawEnvelope {
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
