#[cfg(any(feature = "precursor", feature = "renode"))]
mod precursor;
#[cfg(any(feature = "precursor", feature = "renode"))]
pub use precursor::*;

#[cfg(any(feature = "bao1x"))]
mod bao1x;
#[cfg(any(feature = "bao1x"))]
pub use bao1x::*;

#[cfg(feature = "atsama5d27")]
pub mod atsama5d27;
#[cfg(feature = "atsama5d27")]
pub use self::atsama5d27::*;
