//! # routegen-cli
//!
//! Command-line front end of `routegen-core`.
//!
//! This crate provides the `routegen` binary with the following commands:
//!
//! | Command | Description |
//! |---------|-------------|
//! | `routegen generate <dump>` | Emit the generated artifacts, to stdout or `--out-dir` |
//! | `routegen routes <dump>` | List every discovered route |
//! | `routegen types <dump>` | List the reachable serializable types |
//!
//! Every command also takes `--config <file>`; without it `./routegen.yaml`
//! is read when present. `ROUTEGEN_*` environment variables override both.

pub mod commands;
