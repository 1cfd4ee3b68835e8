//! Two-symbol color codec.
//!
//! The marker dictionary has 100 entries, but the color catalogue has
//! about 1100 colors, so each color card carries two symbols:
//!
//! - the first is in `0..50` and stands for itself,
//! - the second is in `50..100` and stands for `(symbol - 50) * 50`.
//!
//! The color id is the sum of both decoded symbols. Decoding each symbol on
//! its own and adding makes the result independent of which symbol the
//! detector reported first.
//!
//! ```
//! use brickmark::color::{encode, ColorId};
//! use brickmark::marker::MarkerId;
//!
//! let (a, b) = encode(ColorId(226));
//! assert_eq!((a, b), (MarkerId(26), MarkerId(54)));
//! assert_eq!(ColorId::from_symbols(b, a), ColorId(226));
//! ```

mod catalogue;

pub use catalogue::{Color, ColorCatalogue, ColorReport, CsvColorCatalogue};

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::marker::MarkerId;

/// Symbols below this value stand for themselves.
const HALF: u32 = 50;

/// Canonical color identifier: the key into the color catalogue.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorId(pub u32);

impl ColorId {
    /// Largest id two printable color symbols can carry:
    /// 49 + (90 - 50) * 50.
    pub const MAX_ENCODABLE: ColorId = ColorId(2049);

    /// Creates a new ColorId.
    #[inline]
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the underlying u32 value.
    #[inline]
    pub fn as_u32(&self) -> u32 {
        self.0
    }

    /// Recovers a color from its two symbols, in either order.
    #[inline]
    pub fn from_symbols(a: MarkerId, b: MarkerId) -> Self {
        Self(decode_symbol(a) + decode_symbol(b))
    }
}

impl fmt::Debug for ColorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ColorId({})", self.0)
    }
}

impl fmt::Display for ColorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ColorId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// Splits a color id into the two symbols printed on its card.
///
/// Ids above [`ColorId::MAX_ENCODABLE`] cannot be printed with the marker
/// dictionary; passing one is a caller error.
pub fn encode(color: ColorId) -> (MarkerId, MarkerId) {
    debug_assert!(
        color <= ColorId::MAX_ENCODABLE,
        "color id {color} does not fit in two symbols"
    );
    let low = color.0 % HALF;
    let high = HALF + color.0 / HALF;
    (MarkerId(low as u8), MarkerId(high as u8))
}

/// Value a single symbol contributes to a color id.
#[inline]
pub fn decode_symbol(symbol: MarkerId) -> u32 {
    debug_assert!(
        symbol.is_in_dictionary(),
        "symbol {symbol} is outside the marker dictionary"
    );
    let s = u32::from(symbol.as_u8());
    if s < HALF {
        s
    } else {
        (s - HALF) * HALF
    }
}
