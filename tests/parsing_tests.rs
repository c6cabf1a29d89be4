// Line-level behaviour of the scanners and lookup tables, without a workspace.

use shadowmap::config::DEFAULT_MAX_SNAP_DISTANCE;
use shadowmap::mapping::{is_within, normalize, DirectiveAnchorIndex, SubstitutionTable};
use shadowmap::parser::{
    find_directive_lines, find_markers, parse_compiler_output, parse_marker_line, resolve_line,
    PositionalMarker, RawDiagnostic,
};
use shadowmap::ReconcileConfig;
use std::path::{Path, PathBuf};

fn marker(phys_line: usize, declared_line: usize) -> PositionalMarker {
    PositionalMarker {
        phys_line,
        declared_path: "foo.go".to_string(),
        declared_line,
    }
}

#[cfg(test)]
mod output_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_line_and_column_forms() {
        let parsed = parse_compiler_output(
            "./foo.go:12:5: undefined: x\nbar/baz.go:7: syntax error: unexpected }\n",
        );
        assert_eq!(
            parsed,
            vec![
                RawDiagnostic {
                    file: "./foo.go".to_string(),
                    line: 12,
                    column: Some(5),
                    message: "undefined: x".to_string(),
                },
                RawDiagnostic {
                    file: "bar/baz.go".to_string(),
                    line: 7,
                    column: None,
                    message: "syntax error: unexpected }".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_crlf_and_indentation() {
        let parsed = parse_compiler_output("\t/abs/foo.go:3:1: bad thing  \r\nnext\r\n");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].file, "/abs/foo.go");
        assert_eq!(parsed[0].message, "bad thing");
        assert_eq!(parsed[0].line0(), 2);
    }

    #[test]
    fn test_windows_drive_prefix() {
        let parsed = parse_compiler_output("C:\\ws\\foo.go:3:1: bad\n");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].file, "C:\\ws\\foo.go");
        assert_eq!(parsed[0].line, 3);
    }

    #[test]
    fn test_noise_is_filtered() {
        let text = "\
# example.com/pkg
foo.go:1:1: too many errors
foo.go:0:1: line zero
foo.go:2:1:
go: downloading example.com/dep v1.0.0
foo.go:4:2: kept
";
        let parsed = parse_compiler_output(text);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].message, "kept");
    }
}

#[cfg(test)]
mod marker_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_marker_grammar() {
        let cfg = ReconcileConfig::default();
        assert_eq!(
            parse_marker_line("  // ORIGLINE foo.go:42", &cfg),
            Some(("foo.go".to_string(), 42))
        );
        assert_eq!(
            parse_marker_line("\t//ORIGLINE /a b/c.go:7  ", &cfg),
            Some(("/a b/c.go".to_string(), 7))
        );
        assert_eq!(
            parse_marker_line("// ORIGLINE C:\\ws\\c.go:3", &cfg),
            Some(("C:\\ws\\c.go".to_string(), 3))
        );
        assert_eq!(parse_marker_line("// ORIGLINEfoo.go:1", &cfg), None);
        assert_eq!(parse_marker_line("// ORIGLINE foo.go:0", &cfg), None);
        assert_eq!(parse_marker_line("// ORIGLINE foo.go:4x", &cfg), None);
        assert_eq!(parse_marker_line("// ORIGLINE foo.go", &cfg), None);
        assert_eq!(parse_marker_line("// ORIGLINE :4", &cfg), None);
        assert_eq!(parse_marker_line("x := 1 // ORIGLINE foo.go:3", &cfg), None);
    }

    #[test]
    fn test_find_markers_records_physical_lines() {
        let text = "package foo\n// ORIGLINE foo.go:10\nx\n  // ORIGLINE foo.go:20\ny\n";
        let markers = find_markers(text, &ReconcileConfig::default());
        assert_eq!(markers, vec![marker(1, 10), marker(3, 20)]);
    }

    #[test]
    fn test_resolve_line_from_nearest_marker() {
        let markers = vec![marker(10, 42)];
        assert_eq!(resolve_line(&markers, 12), Some(42));
        assert_eq!(resolve_line(&markers, 11), Some(41));
        assert_eq!(resolve_line(&markers, 9), None);
    }

    #[test]
    fn test_resolve_line_uses_latest_preceding_marker() {
        let markers = vec![marker(2, 5), marker(8, 40), marker(20, 90)];
        assert_eq!(resolve_line(&markers, 7), Some(4 + 4));
        assert_eq!(resolve_line(&markers, 15), Some(39 + 6));
        assert_eq!(resolve_line(&markers, 25), Some(89 + 4));
    }

    #[test]
    fn test_out_of_range_declared_line_does_not_resolve() {
        assert_eq!(resolve_line(&[marker(0, usize::MAX)], 1), Some(usize::MAX - 1));
        assert_eq!(resolve_line(&[marker(0, usize::MAX)], 3), None);
        assert_eq!(resolve_line(&[marker(0, 0)], 1), None);

        let huge = format!("// ORIGLINE foo.go:{}", usize::MAX);
        let markers = find_markers(&huge, &ReconcileConfig::default());
        assert_eq!(markers, vec![marker(0, usize::MAX)]);
        assert_eq!(resolve_line(&markers, 5), None);
    }

    #[test]
    fn test_marker_line_itself_resolves_to_declared_line() {
        assert_eq!(resolve_line(&[marker(3, 17)], 3), Some(16));
    }
}

#[cfg(test)]
mod anchor_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn markers() -> Vec<String> {
        vec!["//@".to_string()]
    }

    #[test]
    fn test_directive_scan_is_lexical() {
        let text = "//@ requires a\nx := 1\ny := 2 //@ ensures y\ns := \"//@\"\n// plain\n";
        assert_eq!(find_directive_lines(text, &markers()), vec![0, 2, 3]);
    }

    #[test]
    fn test_empty_marker_matches_nothing() {
        assert!(find_directive_lines("a\nb\n", &[String::new()]).is_empty());
    }

    #[test]
    fn test_snap_exact_and_preceding() {
        let index = DirectiveAnchorIndex::from_lines(vec![30]);
        assert_eq!(index.snap(30, DEFAULT_MAX_SNAP_DISTANCE), Some(30));
        assert_eq!(index.snap(31, DEFAULT_MAX_SNAP_DISTANCE), Some(30));
    }

    #[test]
    fn test_snap_distance_is_inclusive() {
        let index = DirectiveAnchorIndex::from_lines(vec![10]);
        assert_eq!(index.snap(40, 30), Some(10));
        assert_eq!(index.snap(41, 30), None);
    }

    #[test]
    fn test_snap_never_moves_forward() {
        let index = DirectiveAnchorIndex::from_lines(vec![50, 60]);
        assert_eq!(index.snap(49, 30), None);
        assert_eq!(index.snap(100, 30), None);
        assert_eq!(index.snap(59, 30), Some(50));
    }

    #[test]
    fn test_from_lines_sorts_and_dedups() {
        let index = DirectiveAnchorIndex::from_lines(vec![9, 3, 9, 1]);
        assert_eq!(index.lines(), &[1, 3, 9]);
        assert!(index.contains(3));
        assert!(!index.contains(4));
    }
}

#[cfg(test)]
mod table_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_artifact_parsing_and_reverse() {
        let table = SubstitutionTable::from_json_str(
            r#"{ "substitutions": { "/ws/a.go": "/ws/.shadowmap/a.go", "/ws/./b.go": "/ws/.shadowmap/x/../b.go" }, "version": 3 }"#,
        )
        .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.generated_for(Path::new("/ws/b.go")),
            Some(Path::new("/ws/.shadowmap/b.go"))
        );

        let reverse = table.reverse();
        assert_eq!(
            reverse.original_for(Path::new("/ws/.shadowmap/a.go")),
            Some(Path::new("/ws/a.go"))
        );
        assert_eq!(reverse.original_for(Path::new("/ws/a.go")), None);

        let originals: Vec<&Path> = table.iter().map(|(orig, _)| orig).collect();
        assert_eq!(originals, vec![Path::new("/ws/a.go"), Path::new("/ws/b.go")]);
    }

    #[test]
    fn test_reverse_first_match_wins() {
        let table = SubstitutionTable::from_entries([
            ("/ws/z.go", "/ws/.shadowmap/same.go"),
            ("/ws/a.go", "/ws/.shadowmap/same.go"),
        ]);
        let reverse = table.reverse();
        assert_eq!(reverse.len(), 1);
        assert_eq!(
            reverse.original_for(Path::new("/ws/.shadowmap/same.go")),
            Some(Path::new("/ws/a.go"))
        );
    }

    #[test]
    fn test_artifact_without_field_is_empty() {
        let table = SubstitutionTable::from_json_str("{}").unwrap();
        assert!(table.is_empty());
        assert!(table.reverse().is_empty());
        assert_eq!(table.iter().count(), 0);
        assert!(SubstitutionTable::from_json_str("[1, 2]").is_err());
    }

    #[test]
    fn test_load_missing_artifact_is_none() {
        let ws = tempfile::tempdir().unwrap();
        assert!(SubstitutionTable::load(ws.path(), &ReconcileConfig::default()).is_none());
    }
}

#[cfg(test)]
mod config_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let cfg = ReconcileConfig::from_json_str(r#"{ "max_snap_distance": 12 }"#).unwrap();
        assert_eq!(cfg.max_snap_distance, 12);
        assert_eq!(cfg.marker_token, "ORIGLINE");
        assert_eq!(cfg.directive_markers, vec!["//@".to_string()]);
    }

    #[test]
    fn test_config_file_errors_are_reported() {
        let ws = tempfile::tempdir().unwrap();
        let path = ws.path().join("shadowmap.json");
        assert!(matches!(
            ReconcileConfig::load(&path),
            Err(shadowmap::Error::Io { .. })
        ));

        std::fs::write(&path, "{ \"max_snap_distance\": \"far\" }").unwrap();
        assert!(matches!(
            ReconcileConfig::load(&path),
            Err(shadowmap::Error::Json { .. })
        ));
    }

    #[test]
    fn test_source_suffix_and_artifact_path() {
        let cfg = ReconcileConfig::default();
        assert!(cfg.is_source_file(Path::new("/ws/a.go")));
        assert!(!cfg.is_source_file(Path::new("/ws/a.go.txt")));
        assert_eq!(
            cfg.artifact_path(Path::new("/ws")),
            PathBuf::from("/ws/.shadowmap/substitutions.json")
        );
    }
}

#[cfg(test)]
mod path_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_is_lexical() {
        assert_eq!(normalize(Path::new("/ws/./a/../b.go")), PathBuf::from("/ws/b.go"));
        assert_eq!(normalize(Path::new("/../x.go")), PathBuf::from("/x.go"));
    }

    #[test]
    fn test_containment_is_component_wise() {
        assert!(is_within(Path::new("/ws/a/b.go"), Path::new("/ws")));
        assert!(!is_within(Path::new("/ws2/b.go"), Path::new("/ws")));
    }
}
