//! kvsrtc Core
//!
//! Primitives shared by the SDP and signaling codecs.
//!
//! Every serializer in the workspace renders into a caller-supplied `&mut [u8]`
//! instead of allocating. [`BoundedWriter`] owns the cursor for such a buffer
//! and turns "the text does not fit" into a [`CapacityError`] at the exact
//! write that overflowed.

pub mod error;
pub mod writer;

pub use error::{CapacityError, Result};
pub use writer::{BoundedWriter, Reserve};
