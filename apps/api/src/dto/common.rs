use serde::Serialize;

/// Health response payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Listing of stored entry names.
#[derive(Debug, Serialize)]
pub struct KeysResponse {
    pub keys: Vec<String>,
}

/// Non-fatal notes produced by a write.
#[derive(Debug, Serialize)]
pub struct WarningsResponse {
    pub warnings: Vec<String>,
}
