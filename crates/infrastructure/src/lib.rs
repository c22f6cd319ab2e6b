//! Ferrous Q Infrastructure Layer
pub mod dns;
