//! Whole-program runs and property tests against the public API.
