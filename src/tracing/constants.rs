// Copyright 2017-2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Tracing constants that are used elsewhere in chessmate.
//!
//! The match controller creates spans and events with known string values, so that they can be interpreted by
//! `tracing` Layers that are operating upon them. This module collects them all in one place.

/// The name of a span representing a call to `perform_move`.
pub const PERFORM_MOVE: &str = "perform_move";

/// A move passed validation and did not expose the mover's king.
pub const MOVE_COMMITTED: &str = "move committed";

/// A move was refused; the `reason` field holds the rule violation.
pub const MOVE_REJECTED: &str = "move rejected";

pub const CHECK: &str = "check";

pub const CHECK_MATE: &str = "checkmate";
