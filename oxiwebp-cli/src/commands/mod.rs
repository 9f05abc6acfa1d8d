//! Command implementations for OxiWebP CLI.

pub mod decode;
pub mod detect;
pub mod encode;
pub mod info;

pub use decode::cmd_decode;
pub use detect::cmd_detect;
pub use encode::{EncodeArgs, Preset, cmd_encode};
pub use info::cmd_info;
