mod directives;
mod markers;
mod output;
mod types;

pub use directives::{find_directive_lines, is_directive_line};
pub use markers::{find_markers, parse_marker_line, resolve_line};
pub use output::{is_noise, parse_compiler_output};
pub use types::{PositionalMarker, RawDiagnostic};
