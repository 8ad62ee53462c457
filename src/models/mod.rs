//! HTTP request and response bodies

pub mod requests;
pub mod responses;

pub use requests::{SetRequest, MAX_KEY_LENGTH, MAX_VALUE_SIZE};
pub use responses::{
    Ack, CleanupResponse, ErrorResponse, ExistsResponse, HealthResponse, KeysResponse,
    TtlResponse, ValueResponse,
};
