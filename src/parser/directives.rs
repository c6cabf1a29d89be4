/// True when the line carries any directive marker, wherever it sits on the line.
///
/// Purely lexical: a marker inside a string literal counts too.
pub fn is_directive_line(line: &str, markers: &[String]) -> bool {
    markers
        .iter()
        .any(|marker| !marker.is_empty() && line.contains(marker.as_str()))
}

/// 0-based numbers of every directive line, strictly increasing.
pub fn find_directive_lines(text: &str, markers: &[String]) -> Vec<usize> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| is_directive_line(line, markers))
        .map(|(i, _)| i)
        .collect()
}
