use super::*;

fn layout_args(extra: &[&str]) -> Result<LayoutArgs, clap::Error> {
    let argv = ["astgraph-cli", "layout", "tree.json"].into_iter().chain(extra.iter().copied());
    let cli = Cli::try_parse_from(argv)?;
    match cli.command {
        Command::Layout(args) => Ok(args),
        other => panic!("expected layout, got {other:?}"),
    }
}

#[test]
fn layout_defaults_match_library() {
    let args = layout_args(&[]).unwrap();
    assert!((args.node_width - DEFAULT_NODE_WIDTH).abs() < f64::EPSILON);
    assert!((args.node_height - DEFAULT_NODE_HEIGHT).abs() < f64::EPSILON);
    assert!((args.horizontal_gap - DEFAULT_HORIZONTAL_GAP).abs() < f64::EPSILON);
    assert!((args.vertical_gap - DEFAULT_VERTICAL_GAP).abs() < f64::EPSILON);
    assert!(!args.skip_untyped);
}

#[test]
fn layout_accepts_positive_geometry() {
    let args = layout_args(&["--node-width", "200", "--vertical-gap", "12.5"]).unwrap();
    assert!((args.node_width - 200.0).abs() < f64::EPSILON);
    assert!((args.vertical_gap - 12.5).abs() < f64::EPSILON);
}

#[test]
fn layout_rejects_degenerate_geometry() {
    for (flag, value) in [
        ("--node-width", "0"),
        ("--node-height", "-40"),
        ("--horizontal-gap", "NaN"),
        ("--vertical-gap", "inf"),
        ("--node-width", "wide"),
    ] {
        assert!(layout_args(&[flag, value]).is_err(), "{flag} {value} should be rejected");
    }
}

#[test]
fn positive_length_reports_bad_values() {
    assert_eq!(positive_length(" 50 "), Ok(50.0));
    assert!(positive_length("0").unwrap_err().contains("greater than zero"));
    assert!(positive_length("abc").is_err());
}

#[test]
fn print_document_tolerates_deep_trees() {
    let mut doc = r#"{"type":"var_ref","value":"a"}"#.to_owned();
    for _ in 0..1000 {
        doc = format!(r#"{{"type":"binary","left":{doc}}}"#);
    }
    assert!(print_document(&doc).is_ok());
    assert!(print_document("{not json").is_err());
}
