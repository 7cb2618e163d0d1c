//! Property-based tests for the emission formula.
