//! sipdns application layer: ports and the RFC 3263 server-location state machine
pub mod ports;
pub mod services;
pub mod use_cases;
