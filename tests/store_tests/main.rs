//! Store test suite
