//! # KeyRecon Testkit
//!
//! Testing utilities for KeyRecon.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Reference scenarios**: Known inputs with expected target contents and stats
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Temporary directory pairs, literal stores, and an
//!   access-recording store wrapper
//!
//! ## Reference Scenarios
//!
//! ```rust
//! use keyrecon_testkit::scenarios::verify_all_scenarios;
//!
//! for outcome in verify_all_scenarios() {
//!     assert!(outcome.passed, "{} failed", outcome.name);
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use keyrecon_sync::{reconcile, Identity};
//! use keyrecon_testkit::generators::StorePair;
//!
//! proptest! {
//!     #[test]
//!     fn stats_are_consistent(pair: StorePair) {
//!         let mut target = pair.target.clone();
//!         let stats = reconcile(&mut target, &pair.source, pair.policy, Identity, None).unwrap();
//!         prop_assert!(stats.is_consistent());
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use keyrecon_testkit::fixtures::TempDirs;
//!
//! let dirs = TempDirs::new();
//! dirs.write_source("notes.txt", "hello", 1_700_000_000);
//! let (target, source) = dirs.stores();
//! ```

pub mod fixtures;
pub mod generators;
pub mod scenarios;

pub use fixtures::{byte_store, memory_store, write_file_at, Access, RecordingStore, TempDirs};
pub use generators::StorePair;
pub use scenarios::{all_scenarios, run_scenario, verify_all_scenarios, Scenario, ScenarioOutcome};
