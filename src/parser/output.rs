use super::types::RawDiagnostic;
use once_cell::sync::Lazy;
use regex::Regex;

static DIAGNOSTIC_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^[ \t]*(?P<path>(?:[A-Za-z]:)?[^\s:#][^:\r\n]*?):(?P<line>\d+)(?::(?P<col>\d+))?:[ \t]*(?P<msg>[^\r\n]*?)[ \t]*\r?$",
    )
    .expect("diagnostic pattern is valid")
});

/// Messages that the compiler prints in the diagnostic shape but which describe the build.
const NOISE_PREFIXES: &[&str] = &["too many errors"];

/// Skip build summaries and package headers (`# example.com/pkg`).
pub fn is_noise(diag: &RawDiagnostic) -> bool {
    diag.file.starts_with('#')
        || diag.message.is_empty()
        || NOISE_PREFIXES
            .iter()
            .any(|prefix| diag.message.starts_with(prefix))
}

/// Extract every diagnostic from a blob of combined stdout+stderr, in output order.
pub fn parse_compiler_output(text: &str) -> Vec<RawDiagnostic> {
    DIAGNOSTIC_LINE
        .captures_iter(text)
        .filter_map(|caps| {
            let line = caps.name("line")?.as_str().parse::<usize>().ok()?;
            if line == 0 {
                return None;
            }
            let column = caps
                .name("col")
                .and_then(|c| c.as_str().parse::<usize>().ok());
            Some(RawDiagnostic {
                file: caps.name("path")?.as_str().trim().to_string(),
                line,
                column,
                message: caps.name("msg")?.as_str().trim().to_string(),
            })
        })
        .filter(|diag| !is_noise(diag))
        .collect()
}
