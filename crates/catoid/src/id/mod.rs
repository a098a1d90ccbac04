mod iid;
mod oid;
mod raw;

pub use iid::*;
pub use oid::*;
pub use raw::*;
