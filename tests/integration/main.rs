//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises the panel end to end
//! against mock adapters. All tests run on the host with no real
//! hardware required.

mod mock_out;
mod sequencer_tests;
mod status_tests;
