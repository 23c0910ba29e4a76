pub mod auth;
pub mod response;

pub use auth::{authorization_gate, AuthGate, AuthUser, GateDecision, GateRejection};
pub use response::{ApiResponse, ApiResult, Created};
