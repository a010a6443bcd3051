// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! `fleet` - command-line front end for the rental fleet.
//!
//! Every subcommand opens the database, runs one coordinator operation or
//! query, prints the result as JSON on stdout and exits. Logs go to
//! stderr; `-v`/`-q` set the level unless `RUST_LOG` is present.
//!
//! Several `fleet` processes may run against the same database file at
//! once. Their transactions are serialised by the `SQLite` write lock, and
//! `--busy-timeout-ms` bounds how long one waits for another.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod args;
mod commands;
mod output;

#[cfg(test)]
mod tests;

use clap::Parser;
use color_eyre::Result;
use tracing_subscriber::EnvFilter;

use crate::args::Args;

fn main() -> Result<()> {
    color_eyre::install()?;
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(args.log_level().into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let rendered: String = commands::run(&args)?;
    println!("{rendered}");
    Ok(())
}
