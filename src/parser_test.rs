use super::*;

fn shell(script: &str, timeout: Duration) -> CommandParser {
    CommandParser::new(ParserConfig {
        command: "sh".into(),
        args: vec!["-c".into(), script.into()],
        file_suffix: ".rb".into(),
        timeout,
    })
}

#[test]
fn default_config_runs_stree_json() {
    let config = ParserConfig::default();
    assert_eq!(config.command, "stree");
    assert_eq!(config.args, ["json"]);
    assert_eq!(config.file_suffix, ".rb");
    assert_eq!(config.timeout, Duration::from_secs(DEFAULT_PARSER_TIMEOUT_SECS));
}

#[test]
fn temp_paths_are_unique_and_suffixed() {
    let parser = CommandParser::new(ParserConfig::default());
    let a = parser.temp_path();
    let b = parser.temp_path();
    assert_ne!(a, b);
    assert!(a.to_string_lossy().ends_with(".rb"));
    assert!(a.file_name().unwrap().to_string_lossy().starts_with("code-"));
}

#[tokio::test]
async fn parse_decodes_stdout() {
    let parser = CommandParser::new(ParserConfig {
        command: "cat".into(),
        args: Vec::new(),
        file_suffix: ".json".into(),
        timeout: Duration::from_secs(5),
    });
    let value = parser.parse(r#"{"type":"int","value":"5"}"#).await.unwrap();
    assert_eq!(value.get(), r#"{"type":"int","value":"5"}"#);
}

#[tokio::test]
async fn deeply_nested_output_passes_through() {
    let mut doc = r#"{"type":"var_ref","value":"a"}"#.to_owned();
    for _ in 0..1000 {
        doc = format!(r#"{{"type":"binary","left":{doc},"operator":"+"}}"#);
    }
    let parser = CommandParser::new(ParserConfig {
        command: "cat".into(),
        args: Vec::new(),
        file_suffix: ".json".into(),
        timeout: Duration::from_secs(5),
    });
    let value = parser.parse(&format!("{doc}\n")).await.unwrap();
    assert_eq!(value.get(), doc);
}

#[tokio::test]
async fn parse_removes_temp_file() {
    // Echo the file path back as a JSON string.
    let parser = shell(r#"printf '"%s"' "$0""#, Duration::from_secs(5));
    let value = parser.parse("puts 1").await.unwrap();
    let path: String = serde_json::from_str(value.get()).unwrap();
    assert!(path.ends_with(".rb"));
    assert!(!std::path::Path::new(&path).exists());
}

#[tokio::test]
async fn nonzero_exit_is_failure() {
    let parser = shell("echo 'syntax error' >&2; exit 3", Duration::from_secs(5));
    let err = parser.parse("def").await.unwrap_err();
    match err {
        ParseError::Failed { stderr, .. } => assert_eq!(stderr, "syntax error"),
        other => panic!("expected Failed, got {other:?}"),
    }
}

#[tokio::test]
async fn non_json_output_is_invalid() {
    let parser = shell("echo not-json", Duration::from_secs(5));
    let err = parser.parse("1").await.unwrap_err();
    assert!(matches!(err, ParseError::InvalidOutput(_)));
}

#[tokio::test]
async fn missing_command_is_spawn_error() {
    let parser = CommandParser::new(ParserConfig {
        command: "definitely-not-a-parser-binary".into(),
        ..ParserConfig::default()
    });
    let err = parser.parse("1").await.unwrap_err();
    assert!(matches!(err, ParseError::Spawn { .. }));
    assert!(err.to_string().contains("definitely-not-a-parser-binary"));
}

#[tokio::test]
async fn slow_parser_times_out() {
    let parser = shell("sleep 5", Duration::from_millis(100));
    let err = parser.parse("1").await.unwrap_err();
    assert!(matches!(err, ParseError::Timeout { millis: 100 }));
}
