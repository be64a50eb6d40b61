//! ChanPak CLI internals: input scanning, filesystem side effects and the
//! command implementations behind the `chanpak` binary.

pub mod commands;
pub mod output;
pub mod printer;
pub mod workspace;
