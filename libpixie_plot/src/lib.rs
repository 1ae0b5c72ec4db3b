//! # pixie_plot
//!
//! pixie_plot is a plotting utility for XIA Pixie-16 acquisition data,
//! written in Rust. It reads either raw list-mode binary data straight off
//! the hardware or a pre-decoded CSV, and renders the standard diagnostic
//! plots: ADC traces, MCA spectra, baselines, and per-channel energy
//! histograms.
//!
//! ## Installation
//!
//! Install the CLI from source with `cargo install --path ./pixie_plot_cli`
//! from the top level repository. The binary lands in your cargo install
//! location (typically `~/.cargo/bin/`) and can be removed with
//! `cargo uninstall pixie_plot_cli`.
//!
//! ## Use
//!
//! Plot the MCA spectrum of channel 3 of a pre-decoded CSV:
//!
//! ```bash
//! pixie_plot_cli -f run_0042.csv -m -c 3
//! ```
//!
//! Decode a list-mode file taken with a 250 MSPS module running firmware
//! revision 30474 and render the per-channel energy histogram grid:
//!
//! ```bash
//! pixie_plot_cli -f run_0042.bin -l --freq 250 --rev 30474
//! ```
//!
//! The `-x/--xlim` flag narrows the x-axis of every chart (`-x 10,400`);
//! a reversed range is sorted rather than rejected. Rendered plots are
//! written as PNG files into the directory given by `-o/--output`
//! (default: the working directory).
//!
//! ## Data formats
//!
//! List-mode files are a stream of little-endian 32-bit words. Each event
//! carries a 4-word header (channel, slot, crate, times, energy, trace
//! length), optional extra header words, and an optional packed ADC trace.
//! The header layout varies with the ADC sampling frequency and firmware
//! revision, which is why `--lmd` requires both `--freq` and `--rev`.
//!
//! CSV files must carry a `bin` index column; channel series are named
//! `Chan0`, `Chan1`, and so on, with an optional `timestamp` column that is
//! dropped before plotting baselines.
pub mod chunk_reader;
pub mod config;
pub mod constants;
pub mod csv_data;
pub mod data_mask;
pub mod decoder;
pub mod dispatcher;
pub mod error;
pub mod event;
pub mod event_table;
pub mod layout;
pub mod plot;
pub mod process;
pub mod worker_status;
