//! `support` CLI: memory setup and reports, routing checks, serving and invoking agents.

pub mod cli;
