pub(crate) mod chunk;
pub(crate) mod config;
pub(crate) mod generator;

#[cfg(test)]
#[path = "../../tests/unit/support/mock_backend.rs"]
pub(crate) mod mock_backend;
