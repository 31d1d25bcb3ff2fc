//! Integration Tests: source resolution feeding the normalizer.

use std::io::Write;

use logsage_core::config::{LogsageConfig, TruncationConfig};
use logsage_core::normalize::Normalizer;
use logsage_core::source;
use logsage_core::types::SourceKind;

/// A GitHub Actions style log: long dependency install, a Terraform failure
/// in the middle, and runner cleanup at the end.
fn terraform_job_log() -> String {
    let mut lines = vec![
        "2024-05-02T10:00:00Z ##[group]Run hashicorp/setup-terraform@v3".to_string(),
        "2024-05-02T10:00:01Z Terraform v1.7.5 on linux_amd64".to_string(),
    ];
    for i in 0..400 {
        lines.push(format!("2024-05-02T10:00:{:02}Z Downloading module registry.terraform.io/mod/{i}", i % 60));
    }
    lines.push("2024-05-02T10:01:00Z Run terraform plan -input=false".to_string());
    lines.push("2024-05-02T10:01:02Z Error: Unsupported argument".to_string());
    lines.push("2024-05-02T10:01:02Z   on main.tf line 12, in resource \"aws_vpc\" \"main\":".to_string());
    lines.push("2024-05-02T10:01:02Z   12:   enable_dns_hostname = true".to_string());
    for i in 0..300 {
        lines.push(format!("2024-05-02T10:02:{:02}Z Post job cleanup step {i}", i % 60));
    }
    lines.push("2024-05-02T10:03:00Z ##[error]Process completed with exit code 1.".to_string());
    lines.join("\n")
}

#[test]
fn large_file_is_resolved_and_truncated_around_the_failure() {
    let mut file = tempfile::NamedTempFile::new().expect("tempfile");
    file.write_all(terraform_job_log().as_bytes()).expect("write log");

    let payload = source::resolve(Some(file.path()), None).expect("file resolves");
    assert!(matches!(payload.source(), SourceKind::File(_)));
    assert!(payload.char_len() > 12_000);

    let normalizer = Normalizer::new(TruncationConfig {
        max_chars: 6_000,
        head_lines: 10,
        tail_lines: 20,
        ..TruncationConfig::default()
    });
    let out = normalizer.normalize(&payload);

    assert!(out.truncated());
    assert!(out.char_len() <= 6_000);
    let text = out.text();
    assert!(text.contains("Terraform v1.7.5"), "head window kept");
    assert!(text.contains("Error: Unsupported argument"), "marker window kept");
    assert!(text.contains("enable_dns_hostname"), "marker context kept");
    assert!(text.contains("Process completed with exit code 1."), "tail window kept");
    assert!(text.contains("lines omitted"));

    let report = out.report().expect("report");
    assert!(report.strategies().contains(&"keyword-window"));
    assert_eq!(report.original_chars, payload.char_len());
}

#[test]
fn configured_markers_drive_keyword_windows() {
    let config = LogsageConfig::from_toml(
        r#"
        [truncation]
        max_chars = 400
        head_lines = 1
        tail_lines = 1
        keyword_context_lines = 0
        markers = ["OOMKilled"]
        "#,
    )
    .expect("config parses");
    config.validate().expect("config valid");

    let mut lines: Vec<String> = (0..100).map(|i| format!("pod event {i}: Pulled image")).collect();
    lines[50] = "pod event 50: container api OOMKilled (exit 137)".to_string();
    lines[60] = "pod event 60: error pulling sidecar".to_string();
    let payload = source::resolve(None, Some(&lines.join("\n"))).expect("inline resolves");

    let out = Normalizer::new(config.truncation).normalize(&payload);
    assert!(out.text().contains("OOMKilled"));
    assert!(!out.text().contains("error pulling sidecar"), "default markers replaced");
}
