//! Shared data model for driving a remote discrete-event simulation.
//!
//! Nothing in here talks to the network. The types describe what the remote
//! side hands back (object ids, output messages) and the state the client
//! keeps while stepping a run (simulated time bounds, simulator lifecycle).

pub mod common;
pub mod jsonrpc;
pub mod message;
pub mod model;
pub mod simulator;
pub mod time;
