// src/exec/mode.rs

//! Supervision mode for a spawned process.

use std::fmt;
use std::ops::BitOr;

/// How a child's I/O and lifecycle are managed.
///
/// Two independent flags:
/// - `detached`: all three standard streams go to the null device instead of
///   the command's endpoints.
/// - `background`: the child gets its own process group and is released
///   right after it starts; nobody waits for it.
///
/// `ATTACHED` is the absence of both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Mode {
    detached: bool,
    background: bool,
}

impl Mode {
    pub const ATTACHED: Mode = Mode::from_flags(false, false);
    pub const DETACHED: Mode = Mode::from_flags(true, false);
    pub const BACKGROUND: Mode = Mode::from_flags(false, true);
    pub const DETACHED_BACKGROUND: Mode = Mode::from_flags(true, true);

    pub const fn from_flags(detached: bool, background: bool) -> Self {
        Self {
            detached,
            background,
        }
    }

    pub fn is_attached(self) -> bool {
        !self.detached && !self.background
    }

    pub fn is_detached(self) -> bool {
        self.detached
    }

    pub fn is_background(self) -> bool {
        self.background
    }
}

impl BitOr for Mode {
    type Output = Mode;

    fn bitor(self, rhs: Mode) -> Mode {
        Mode::from_flags(
            self.detached || rhs.detached,
            self.background || rhs.background,
        )
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.detached, self.background) {
            (false, false) => f.write_str("attached"),
            (true, false) => f.write_str("detached"),
            (false, true) => f.write_str("background"),
            (true, true) => f.write_str("detached+background"),
        }
    }
}
