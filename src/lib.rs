//! goldsignal: momentum signal generator for a single instrument.
//!
//! Hexagonal architecture: the signal engine lives in [`domain`], port traits
//! in [`ports`], concrete price feeds and notifiers in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
pub mod logging;
