//! Cross-component tests against in-memory services.

pub mod stubs;
