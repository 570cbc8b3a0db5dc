// tests/cli_tests.rs

use std::fs;
use std::path::{Path, PathBuf};

use rdd_translate::cli::{
    CheckOptions, CliError, DEFAULT_SUFFIX, TranslateOptions, execute_check, get_grammar_reference,
    output_path_for, translate_file,
};
use rdd_translate::{ErrorKind, Layout, TranslatorConfig};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("rdd2df-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_source(dir: &Path, name: &str, source: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, source).unwrap();
    path
}

#[test]
fn test_output_path_for() {
    assert_eq!(
        output_path_for(Path::new("jobs/wordcount.scala"), DEFAULT_SUFFIX).unwrap(),
        PathBuf::from("jobs/wordcount_output_in_dataframe.scala")
    );
    assert_eq!(
        output_path_for(Path::new("pipeline"), "_df").unwrap(),
        PathBuf::from("pipeline_df.scala")
    );
    assert!(matches!(
        output_path_for(Path::new(""), DEFAULT_SUFFIX),
        Err(CliError::InvalidPath(_))
    ));
}

#[test]
fn test_translate_file_writes_output() {
    let dir = scratch_dir("write");
    let input = write_source(&dir, "job.scala", "sc.range(1,10).map(x => x + 1).collect()\n");

    let outcome = translate_file(&input, &TranslateOptions::default()).unwrap();
    let output = dir.join("job_output_in_dataframe.scala");
    assert_eq!(outcome.output.as_deref(), Some(output.as_path()));
    assert_eq!(fs::read_to_string(&output).unwrap(), outcome.translation.text());
    assert!(outcome.translation.text().contains(".selectExpr(\"_1 + 1 as _1\")"));

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_failed_translation_writes_nothing() {
    let dir = scratch_dir("failed");
    let input = write_source(&dir, "bad.scala", "sc.range(1,10).map(x => y).collect()");

    let err = translate_file(&input, &TranslateOptions::default()).unwrap_err();
    match err {
        CliError::TranslateFile { path, source } => {
            assert_eq!(path, input);
            assert_eq!(source.kind(), ErrorKind::Semantic);
        }
        other => panic!("expected translation failure, got {other:?}"),
    }
    assert!(!dir.join("bad_output_in_dataframe.scala").exists());

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_files_are_independent_units() {
    let dir = scratch_dir("units");
    let good = write_source(&dir, "good.scala", "sc.range(0,3).collect()");
    let bad = write_source(&dir, "bad.scala", "sc.range(0,3).map(x => x @ 2).collect()");
    let options = TranslateOptions::default();

    assert!(translate_file(&bad, &options).is_err());
    assert!(translate_file(&good, &options).is_ok());
    assert!(dir.join("good_output_in_dataframe.scala").exists());
    assert!(!dir.join("bad_output_in_dataframe.scala").exists());

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_to_stdout_skips_writing() {
    let dir = scratch_dir("stdout");
    let input = write_source(&dir, "job.scala", "sc.range(1,2).collect()");
    let options = TranslateOptions {
        to_stdout: true,
        ..TranslateOptions::default()
    };

    let outcome = translate_file(&input, &options).unwrap();
    assert_eq!(outcome.output, None);
    assert!(!dir.join("job_output_in_dataframe.scala").exists());

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_missing_input_file() {
    let err = translate_file(
        Path::new("/nonexistent/rdd2df/input.scala"),
        &TranslateOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, CliError::Read { .. }));
}

#[test]
fn test_execute_check_uses_config() {
    let options = CheckOptions {
        source: "sc.range(1,10).map(x => (x, x)).collect()".to_string(),
        config: TranslatorConfig::default()
            .with_namespace("ss")
            .with_layout(Layout::Inline),
    };
    let translation = execute_check(&options).unwrap();
    assert_eq!(
        translation.text(),
        "ss.range(1,10).selectExpr(\"id as _1\").selectExpr(\"_1 as _1\", \"_1 as _2\").collect()"
    );

    let json = translation.to_json();
    assert_eq!(json["output"], translation.text());
    assert_eq!(json["symbol_tables"][0]["parameter"], "x");
}

#[test]
fn test_execute_check_reports_parse_error() {
    let options = CheckOptions {
        source: "sc.range(1,10)".to_string(),
        ..CheckOptions::default()
    };
    let err = execute_check(&options).unwrap_err();
    assert!(matches!(err, CliError::Translate(_)));
    assert!(err.to_string().starts_with("Parsing error: syntax error"));
}

#[test]
fn test_grammar_reference_mentions_every_construct() {
    let reference = get_grammar_reference();
    for needle in ["sc.range", ".map(", "val", "if (", "selectExpr", "collect()"] {
        assert!(reference.contains(needle), "{needle}");
    }
}
