//! CLI command implementations for pairec.
//!
//! Each submodule implements one subcommand; shared option structs live in
//! [`common`]. The only processing command today is [`pair`], which turns
//! multi-way alignments into synthetic paired-end records.

#![allow(
    clippy::cast_precision_loss,
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::too_many_lines
)]

pub mod command;
pub mod common;
pub mod pair;
