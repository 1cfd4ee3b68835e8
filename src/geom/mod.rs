//! Region algebra.
//!
//! Every detection the reconciliation layer sees (piece boxes, fiducial
//! quads, the final crop) is reduced to an axis-aligned [`Region`] and
//! reasoned about with the value-returning operations defined here.
//!
//! # Design Principles
//!
//! 1. **Type Safety**: marker types keep pixel and normalized coordinates
//!    apart at compile time.
//!
//! 2. **Permissive Construction**: regions may be inverted or extend past
//!    the frame; callers check [`Region::is_ordered`] or clamp explicitly.
//!
//! # Example
//!
//! ```
//! use brickmark::geom::{Point, Region};
//!
//! let quad = [
//!     Point::new(12.0, 10.0),
//!     Point::new(30.0, 11.0),
//!     Point::new(29.0, 28.0),
//!     Point::new(11.0, 27.0),
//! ];
//! let marker: Region = Region::from_corners(&quad);
//! assert_eq!(marker.width(), 19.0);
//! assert!(marker.square().width() == marker.square().height());
//! ```

mod cluster;
mod frame;
mod point;
mod region;
mod space;

pub use cluster::combine_nearby;
pub use frame::Frame;
pub use point::Point;
pub use region::Region;
pub use space::{Normalized, Pixel};
