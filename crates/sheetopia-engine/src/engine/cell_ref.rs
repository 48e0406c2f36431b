//! Cell positions, column letters and formula references.
//!
//! Provides bidirectional conversion between spreadsheet-style column letters
//! (`A`, `Z`, `AA`, ...) and zero-indexed column numbers, plus the two
//! coordinate types the engine works with:
//!
//! - [`CellPos`] - a concrete grid position, used as the sparse-map key
//! - [`CellRef`] - a parsed formula token such as `$A$1` or `B2`, carrying
//!   per-axis absolute flags and (for relative axes) an offset from the
//!   anchor cell it was parsed at
//!
//! # Examples
//!
//! ```ignore
//! let anchor = CellPos::new(4, 4);
//! let r = CellRef::parse_at("B3", anchor).unwrap();
//! assert_eq!((r.row, r.col), (-2, -3)); // offsets from E5
//! assert_eq!(r.resolve_pos(anchor), Some(CellPos::new(2, 1)));
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Convert a column index to spreadsheet-style letters (0 -> A, 25 -> Z, 26 -> AA).
///
/// Bijective base 26: there is no zero digit, so every index has exactly one
/// spelling.
pub fn col_to_letters(index: usize) -> String {
    let mut letters = Vec::new();
    let mut n = index as u128 + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - rem) / 26;
    }
    letters.iter().rev().collect()
}

/// Convert column letters back to a zero-based index (A -> 0, AA -> 26).
///
/// Returns `None` for empty input, characters outside `A-Z`, or overflow.
pub fn letters_to_col(letters: &str) -> Option<usize> {
    if letters.is_empty() {
        return None;
    }
    let mut acc = 0usize;
    for c in letters.bytes() {
        if !c.is_ascii_uppercase() {
            return None;
        }
        let digit = (c - b'A') as usize + 1;
        acc = acc.checked_mul(26)?.checked_add(digit)?;
    }
    acc.checked_sub(1)
}

/// A concrete cell position in the grid (0-indexed).
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct CellPos {
    pub row: usize,
    pub col: usize,
}

impl CellPos {
    pub fn new(row: usize, col: usize) -> CellPos {
        CellPos { row, col }
    }

    /// Parse a plain A1-style address ("B3", "aa10"). Case-insensitive,
    /// `$` markers are accepted and ignored.
    pub fn from_a1(name: &str) -> Option<CellPos> {
        let upper = name.trim().to_ascii_uppercase();
        let r = CellRef::parse(&upper)?;
        r.resolve_pos(CellPos::new(0, 0))
    }
}

impl fmt::Display for CellPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", col_to_letters(self.col), self.row + 1)
    }
}

fn reference_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\$?)([A-Z]+)(\$?)([0-9]+)$").expect("reference regex must compile")
    })
}

fn signed(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

/// A reference token parsed from formula text.
///
/// Absolute axes hold true grid coordinates. Relative axes hold an offset
/// from the anchor the token was parsed at (or the raw coordinate when parsed
/// without an anchor, i.e. an anchor of A1).
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub struct CellRef {
    pub row: i64,
    pub col: i64,
    pub row_absolute: bool,
    pub col_absolute: bool,
}

impl CellRef {
    /// Parse a token such as `A1`, `$A$1`, `A$1` or `$A1` without an anchor.
    /// Returns `None` for anything that is not a single upper-case reference.
    pub fn parse(token: &str) -> Option<CellRef> {
        let caps = reference_re().captures(token)?;
        let col = letters_to_col(&caps[2])?;
        let number = caps[4].parse::<i64>().ok()?;

        Some(CellRef {
            row: number - 1,
            col: signed(col),
            row_absolute: !caps[3].is_empty(),
            col_absolute: !caps[1].is_empty(),
        })
    }

    /// Parse a token relative to `anchor`: relative axes store
    /// `parsed - anchor`, absolute axes keep the parsed coordinate.
    pub fn parse_at(token: &str, anchor: CellPos) -> Option<CellRef> {
        let mut r = Self::parse(token)?;
        if !r.row_absolute {
            r.row -= signed(anchor.row);
        }
        if !r.col_absolute {
            r.col -= signed(anchor.col);
        }
        Some(r)
    }

    /// True (row, col) coordinates when dereferenced from `anchor`.
    /// May be negative when a relative offset points above/left of the grid.
    pub fn resolve(&self, anchor: CellPos) -> (i64, i64) {
        let row = if self.row_absolute {
            self.row
        } else {
            signed(anchor.row).saturating_add(self.row)
        };
        let col = if self.col_absolute {
            self.col
        } else {
            signed(anchor.col).saturating_add(self.col)
        };
        (row, col)
    }

    /// Like [`CellRef::resolve`], but `None` for coordinates left of or above the grid.
    pub fn resolve_pos(&self, anchor: CellPos) -> Option<CellPos> {
        let (row, col) = self.resolve(anchor);
        Some(CellPos::new(usize::try_from(row).ok()?, usize::try_from(col).ok()?))
    }
}

impl fmt::Display for CellRef {
    /// Formats the raw stored fields; only meaningful for references parsed
    /// without an anchor or with fully absolute axes.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let col = usize::try_from(self.col).map(col_to_letters).unwrap_or_else(|_| "?".into());
        write!(
            f,
            "{}{}{}{}",
            if self.col_absolute { "$" } else { "" },
            col,
            if self.row_absolute { "$" } else { "" },
            self.row + 1
        )
    }
}
