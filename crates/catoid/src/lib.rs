mod base36;
mod cate;
mod error;
mod generator;
mod id;
mod registry;
#[cfg(feature = "serde")]
mod serde;
mod time;

pub use crate::base36::*;
pub use crate::cate::*;
pub use crate::error::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::registry::*;
pub use crate::time::*;
