//! End-to-end tests for `am-export`; see `tests/`.
