//! # lcm_frontend
//!
//! lcm_frontend is the configuration front end for the ANL LBNE calibration module (LCM),
//! written in Rust. It edits the `lcm.conf` hardware configuration file read by the
//! calibration module DAQ, converting between the physical quantities shown to the
//! operator (volts, nanoseconds, pulse counts) and the fixed-point register codes stored
//! in the file. It also carries a small analysis routine for the trigger rate of an
//! LBNEWare CSV export.
//!
//! ## Installation
//!
//! The only method of install is from source.
//!
//! To build and install the GUI front end use `cargo install --path ./lcm_frontend` from
//! the top level repository.
//!
//! To build and install the CLI use `cargo install --path ./lcm_frontend_cli` from the top
//! level repository.
//!
//! ## Configuration file
//!
//! `lcm.conf` is line oriented:
//!
//! ```text
//! # comment
//! // comment
//! iu_pulse_delay = 0x800;
//! ```
//!
//! Any line that starts with `#` or `//`, or does not contain an `=`, is passed through
//! untouched when the file is written. Every save first copies the file to
//! `lcm.conf.bak`.
//!
//! The editable fields and their ranges are:
//!
//! - bias control: 0 or 1
//! - ip: address of the module, stored quoted
//! - number of pulse sets: 0 to 131071, stored as hex
//! - pulse height: 0 to 30 V, register 0x40000 to 0x40FFF
//! - per channel (IU, TPC, PD):
//!   - NOvA enable: 0 or 1
//!   - trigger source: 0 to 7
//!   - pulse delay: 0 to 13650 ns, register 0x0 to 0xFFF
//!   - second pulse width: 0 to 850 ns, register 0x0 to 0xFF
//!   - first pulse width: 0 to 850 ns, register 0x0 to 0xFF
//!
//! Edits are all-or-nothing: if any field fails validation nothing is written.
//!
//! ## Settings
//!
//! The GUI and CLI share a YAML settings file:
//!
//! ```yml
//! config_path: ../lcm.conf
//! backup_policy: BestEffort
//! ```
//!
//! `config_path` defaults to `$PROJECT_ROOT/lcm.conf`. With `backup_policy: Required` a
//! save is aborted if the `.bak` copy can't be written; `BestEffort` only logs a warning.
//!
//! ## Trigger rate
//!
//! The trigger rate of a CSV export is the number of 37-column event rows divided by the
//! time between the first and last event. Timestamps are rebuilt from columns 25-27 and
//! count ticks of the 150 MHz clock.
pub mod config_store;
pub mod constants;
pub mod error;
pub mod fields;
pub mod form;
pub mod register;
pub mod settings;
pub mod trigger_rate;
pub mod validate;
