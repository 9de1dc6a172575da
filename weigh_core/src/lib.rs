#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Core weigh-in logic (transport-agnostic).
//!
//! This crate turns a noisy stream of instantaneous Bluetooth scale readings
//! into discrete, high-confidence weigh-in events. Advertisement delivery
//! goes through the `weigh_traits::AdvertisementSource` trait; nothing here
//! touches a radio.
//!
//! ## Architecture
//!
//! - **Decoding**: vendor advertisement parsing and weight extraction
//!   (`decoder` module)
//! - **Stabilization**: windowed collect/confirm/lock state machine
//!   (`stabilizer` module)
//! - **Session**: advertisement routing and weigh-in record production
//!   (`session` module)
//! - **Orchestration**: scan loops and the background pump (`runner`,
//!   `scanner` modules)
//! - **Analytics**: summary statistics over recorded weigh-ins (`trend`)
//!
//! All weights are pounds (`f64`); settled values are rounded to one
//! decimal. See `util::round_to_tenth`.

pub mod config;
pub mod conversions;
pub mod decoder;
pub mod error;
pub mod event;
pub mod mocks;
pub mod runner;
pub mod scanner;
pub mod session;
pub mod stabilizer;
pub mod trend;
pub mod util;

pub use config::{ScanCfg, StabilizerCfg};
pub use error::{BuildError, WeighError};
pub use event::StabilizerEvent;
pub use session::{SessionUpdate, WeighIn, WeighSession};
pub use stabilizer::WeightStabilizer;
pub use weigh_traits::clock::Clock;
