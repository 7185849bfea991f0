/*!
Platform action codes.

Numeric codes follow the host platform's accessibility action taxonomy.
Callers of `execute-generic-action` may pass any code; the named constants
cover the actions the router issues itself.
*/

pub const FOCUS: i32 = 1;
pub const CLICK: i32 = 16;
pub const LONG_CLICK: i32 = 32;
pub const SCROLL_FORWARD: i32 = 4_096;
pub const SCROLL_BACKWARD: i32 = 8_192;
pub const SET_TEXT: i32 = 0x0020_0000;

/// Argument key carrying the text payload for [`SET_TEXT`].
pub const SET_TEXT_ARGUMENT: &str = "setTextCharSequence";
