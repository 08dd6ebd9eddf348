//! Palette handling and RGB composition for the PIC image pipeline.

pub mod palette;
pub mod render;
