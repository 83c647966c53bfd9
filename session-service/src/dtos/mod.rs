use serde::Serialize;

/// Acknowledgement for the write operations (create and update).
#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub id: String,
    pub message: String,
}

/// Acknowledgement for deletes; sent whether or not the id existed.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
}
