//! C code generation modules.

pub mod functions;
pub mod helpers;
pub mod interface;

pub use functions::CodecGenerator;
pub use helpers::HelperGenerator;
pub use interface::InterfaceGenerator;

/// Status macro returned on success.
pub const STATUS_OK_MACRO: &str = "KISSBUF_OK";
/// Status macro returned when the buffer is shorter than the wire size.
pub const STATUS_BUFFER_TOO_SMALL_MACRO: &str = "KISSBUF_ERR_BUFFER_TOO_SMALL";

/// Banner placed at the top of every generated unit.
#[must_use]
pub fn banner(source_header: &str) -> String {
    format!("/* Generated by kissbuf from {source_header}. Do not edit by hand. */\n")
}
