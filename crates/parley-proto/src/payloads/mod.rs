//! JSON payload bodies, one struct per event shape.
//!
//! Field names are the wire names. Inbound payloads are lenient where the
//! server is known to vary (id types, legacy field names, optional fields);
//! outbound payloads are exact.

pub mod chat;
pub mod presence;
pub mod typing;
