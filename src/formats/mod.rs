//! Binary layouts of the shipped asset containers.

pub mod ealib;
pub mod pic;
pub mod wav;
