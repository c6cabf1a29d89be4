use super::types::PositionalMarker;
use crate::config::ReconcileConfig;

/// Parse one physical line as a positional marker, returning `(path, line)`.
pub fn parse_marker_line(line: &str, config: &ReconcileConfig) -> Option<(String, usize)> {
    let rest = line.trim_start().strip_prefix(config.comment_prefix.as_str())?;
    let rest = rest.trim_start().strip_prefix(config.marker_token.as_str())?;
    // The token must be followed by whitespace, otherwise `ORIGLINEX` would match.
    if !rest.starts_with(|c: char| c.is_whitespace()) {
        return None;
    }
    let target = rest.trim();
    let (path, line_no) = target.rsplit_once(':')?;
    if path.is_empty() || !line_no.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let line_no = line_no.parse::<usize>().ok().filter(|n| *n >= 1)?;
    Some((path.to_string(), line_no))
}

/// Scan a generated file top to bottom for positional markers.
pub fn find_markers(text: &str, config: &ReconcileConfig) -> Vec<PositionalMarker> {
    text.lines()
        .enumerate()
        .filter_map(|(phys_line, line)| {
            parse_marker_line(line, config).map(|(declared_path, declared_line)| PositionalMarker {
                phys_line,
                declared_path,
                declared_line,
            })
        })
        .collect()
}

/// Map a 0-based physical line of a generated file to a 0-based original line.
///
/// Walks the markers backwards for the nearest one at or before `phys_line`;
/// the line after a marker is `declared_line`, and each following line adds one.
/// Linear in the number of markers, which stays in the hundreds for real files.
pub fn resolve_line(markers: &[PositionalMarker], phys_line: usize) -> Option<usize> {
    let marker = markers.iter().rev().find(|m| m.phys_line <= phys_line)?;
    let offset = phys_line.saturating_sub(marker.phys_line.saturating_add(1));
    // Out-of-range declared lines resolve to nothing; the caller keeps the raw line.
    marker.declared_line.checked_sub(1)?.checked_add(offset)
}
