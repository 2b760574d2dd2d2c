#[cfg(any(feature = "bao1x"))]
mod bao1x;
#[cfg(any(feature = "bao1x"))]
pub use bao1x::*;

#[cfg(any(feature = "artybio"))]
mod artybio;
#[cfg(any(feature = "artybio"))]
pub use artybio::*;

#[cfg(any(feature = "artyvexii"))]
mod artyvexii;
#[cfg(any(feature = "artyvexii"))]
pub use artyvexii::*;
