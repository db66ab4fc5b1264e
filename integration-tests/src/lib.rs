//! End-to-end checks of the wheel engine through its public API. See `tests/`.
