//! Cross-cutting HTTP middleware shared by every route group.

pub mod access_log;
pub mod security_headers;
