//! End-to-end tests for the crudkit workspace live in `tests/`.
