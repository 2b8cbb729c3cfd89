//! gatecheck - conformance harness for multi-protocol AI model gateways
//!
//! This library drives the full cross-product of wire protocols, route
//! prefixes and request scenarios against a running gateway and classifies
//! every response into a pass/fail [`validate::Verdict`].

pub mod cli;
pub mod config;
pub mod logging;
pub mod matrix;
pub mod protocol;
pub mod transport;
pub mod validate;
