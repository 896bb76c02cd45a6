//! API middleware components

pub mod auth_gate;
pub mod logging;

pub use auth_gate::{auth_gate, Caller, GateState};
pub use logging::{logging_middleware, make_request_span};
