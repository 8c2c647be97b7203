//! CLI smoke tests: help/version output, configuration validation and exit codes.

mod common;

use std::fs;

#[test]
fn help_command_prints_usage() {
    let result = common::run_cli_case("help_command_prints_usage", &["--help"]);
    assert!(
        result.status.success(),
        "expected success; log: {}",
        result.log_path.display()
    );
    assert!(
        result.stdout.contains("Usage: oled-status [OPTIONS]"),
        "missing help banner; log: {}",
        result.log_path.display()
    );
    for flag in ["--detail", "--file", "--headless", "--i2c-bus", "--activity-log"] {
        assert!(
            result.stdout.contains(flag),
            "missing {flag} in help; log: {}",
            result.log_path.display()
        );
    }
}

#[test]
fn version_command_prints_version() {
    let result = common::run_cli_case("version_command_prints_version", &["--version"]);
    assert!(
        result.status.success(),
        "expected success; log: {}",
        result.log_path.display()
    );
    assert!(
        result.stdout.contains(env!("CARGO_PKG_VERSION")),
        "missing version; log: {}",
        result.log_path.display()
    );
}

#[test]
fn unknown_only_detail_exits_before_boot() {
    let result = common::run_cli_case(
        "unknown_only_detail_exits_before_boot",
        &["--detail", "weather,clock", "--headless"],
    );
    assert_eq!(
        result.status.code(),
        Some(1),
        "expected config exit code; log: {}",
        result.log_path.display()
    );
    assert!(
        result.stderr.contains("OST-1001"),
        "missing error code; log: {}",
        result.log_path.display()
    );
    assert!(
        !result.stderr.contains("[OST-DAEMON] started"),
        "daemon must not boot; log: {}",
        result.log_path.display()
    );
}

#[test]
fn check_prints_effective_config_with_flag_overrides() {
    let result = common::run_cli_case(
        "check_prints_effective_config_with_flag_overrides",
        &[
            "--check",
            "--detail",
            "mesh,bogus,adsb",
            "--file",
            "/var/lib/meshtracker/tracker_stats.json",
            "--interface",
            "eth0",
        ],
    );
    assert!(
        result.status.success(),
        "expected success; log: {}",
        result.log_path.display()
    );
    assert!(result.stdout.contains("# config_hash = "));
    assert!(result.stdout.contains("detail = \"mesh,bogus,adsb\""));
    assert!(result.stdout.contains("/var/lib/meshtracker/tracker_stats.json"));
    assert!(result.stdout.contains("interface = \"eth0\""));
}

#[test]
fn flags_win_over_environment() {
    let result = common::run_cli_case_with_env(
        "flags_win_over_environment",
        &["--check", "--detail", "sysstat"],
        &[
            ("OLED_STATUS_DETAIL", "adsb"),
            ("OLED_STATUS_PACING", "legacy"),
        ],
    );
    assert!(
        result.status.success(),
        "expected success; log: {}",
        result.log_path.display()
    );
    assert!(result.stdout.contains("detail = \"sysstat\""));
    assert!(result.stdout.contains("pacing = \"legacy\""));
}

#[test]
fn detail_flag_replaces_unusable_environment_detail() {
    let result = common::run_cli_case_with_env(
        "detail_flag_replaces_unusable_environment_detail",
        &["--check", "--detail", "sysstat"],
        &[("OLED_STATUS_DETAIL", "weather")],
    );
    assert_eq!(
        result.status.code(),
        Some(0),
        "expected success; log: {}",
        result.log_path.display()
    );
    assert!(result.stdout.contains("detail = \"sysstat\""));
}

#[test]
fn detail_flag_replaces_unusable_file_detail() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[display]\ndetail = \"weather\"\n").unwrap();
    let path_arg = path.to_string_lossy().to_string();
    let result = common::run_cli_case(
        "detail_flag_replaces_unusable_file_detail",
        &["--check", "--config", &path_arg, "--detail", "adsb,mesh"],
    );
    assert_eq!(
        result.status.code(),
        Some(0),
        "expected success; log: {}",
        result.log_path.display()
    );
    assert!(result.stdout.contains("detail = \"adsb,mesh\""));
}

#[test]
fn config_file_is_loaded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        "[display]\ndetail = \"adsb\"\nrotation_ticks = 7\n\n[timing]\nframe_interval_ms = 2000\n",
    )
    .unwrap();
    let path_arg = path.to_string_lossy().to_string();
    let result = common::run_cli_case("config_file_is_loaded", &["--check", "--config", &path_arg]);
    assert!(
        result.status.success(),
        "expected success; log: {}",
        result.log_path.display()
    );
    assert!(result.stdout.contains("rotation_ticks = 7"));
    assert!(result.stdout.contains("frame_interval_ms = 2000"));
}

#[test]
fn missing_explicit_config_is_config_error() {
    let result = common::run_cli_case(
        "missing_explicit_config_is_config_error",
        &["--check", "--config", "/nonexistent/oled-status/config.toml"],
    );
    assert_eq!(
        result.status.code(),
        Some(1),
        "expected config exit code; log: {}",
        result.log_path.display()
    );
    assert!(result.stderr.contains("OST-1002"));
}

#[test]
fn invalid_env_value_is_config_error() {
    let result = common::run_cli_case_with_env(
        "invalid_env_value_is_config_error",
        &["--check"],
        &[("OLED_STATUS_FRAME_INTERVAL_MS", "soon")],
    );
    assert_eq!(
        result.status.code(),
        Some(1),
        "expected config exit code; log: {}",
        result.log_path.display()
    );
    assert!(result.stderr.contains("OLED_STATUS_FRAME_INTERVAL_MS"));
}

#[cfg(not(feature = "hardware"))]
#[test]
fn panel_without_hardware_support_is_runtime_error() {
    let result = common::run_cli_case(
        "panel_without_hardware_support_is_runtime_error",
        &["--detail", "sysstat"],
    );
    assert_eq!(
        result.status.code(),
        Some(2),
        "expected runtime exit code; log: {}",
        result.log_path.display()
    );
    assert!(result.stderr.contains("--headless"));
}
