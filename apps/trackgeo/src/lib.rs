//! # trackgeo
//!
//! Command-line front end for the trackgeo engine: load a PlanPro document
//! or snapshot, run one query, print the answer as text or JSON.

pub mod cli;
pub mod config;
