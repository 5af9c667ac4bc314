//! Typewriter text animation for the terminal.
//!
//! The engine ([`animator`], [`state`], [`sequence`]) is independent of any
//! display: it advances one character per tick, hands each visible prefix to
//! a [`sink::RenderSink`] and asks a [`scheduler::Scheduler`] for the next
//! tick. The `typist` binary wires it to stdout and to a ratatui showcase.

pub mod animator;
pub mod config;
pub mod error;
pub mod logging;
pub mod render;
pub mod scheduler;
pub mod sequence;
pub mod showcase;
pub mod sink;
pub mod state;
pub mod tui;
