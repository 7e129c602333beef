#![cfg(all(unix, feature = "cli"))]

use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};
use std::thread;

const GLT_FAVORITES: &[u8] =
    b"GLT,<XML>,\n<GLT><FL Index=\"0\" Name=\"Metro\"/><Footer No=\"1\" EOT=\"1\"/></GLT>";
const MSI_MISSING_FOOTER: &[u8] =
    b"MSI,<XML>,\n<MSI Name=\"Top\" Index=\"0\" MenuType=\"TypeList\"/>";

fn hpwire(args: &[&str]) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_hpwire"));
    command.args(["--log-level", "error"]).args(args);
    command
}

fn run_with_stdin(args: &[&str], stdin: &[u8]) -> Output {
    let mut child = hpwire(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("hpwire should start");

    child
        .stdin
        .take()
        .expect("stdin should be piped")
        .write_all(stdin)
        .expect("stdin write should succeed");

    child.wait_with_output().expect("hpwire should finish")
}

fn capture() -> Vec<u8> {
    let mut wire = Vec::new();
    wire.extend_from_slice(GLT_FAVORITES);
    wire.push(b'\r');
    wire.extend_from_slice(MSI_MISSING_FOOTER);
    wire.push(b'\r');
    wire.extend_from_slice(b"STS,<XML>,\n<ScannerStatus/>");
    wire
}

fn unique_temp_file(tag: &str, contents: &[u8]) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "hpwire-{tag}-{}-{}.bin",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::write(&path, contents).expect("temp file should be writable");
    path
}

#[test]
fn encode_raw_writes_exact_wire_bytes() {
    let output = hpwire(&["--format", "raw", "encode", "PWR"])
        .output()
        .expect("encode should run");

    assert!(output.status.success());
    assert_eq!(output.stdout, b"PWR\t258\r");
}

#[test]
fn encode_json_reports_checksum() {
    let output = hpwire(&["--format", "json", "encode", "VOL", "15"])
        .output()
        .expect("encode should run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("command-encoded.schema.json"));
    assert!(stdout.contains("\"checksum\":361"));
    assert!(stdout.contains("\"args\":[\"VOL\",\"15\"]"));
}

#[test]
fn encode_rejects_embedded_tab() {
    let output = hpwire(&["encode", "KEY", "M\tP"])
        .output()
        .expect("encode should run");

    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn inspect_stdin_emits_one_json_line_per_frame() {
    let output = run_with_stdin(&["--format", "json", "inspect"], &capture());

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains("\"kind\":\"GLT/FL\""));
    assert!(lines[0].contains("\"accepted\":true"));
    assert!(lines[1].contains("\"kind\":\"MSI\""));
    assert!(lines[1].contains("\"accepted\":false"));
    assert!(lines[1].contains("Footer"));
    assert!(lines[2].contains("\"terminated\":false"));
    assert!(lines[2].contains("\"accepted\":true"));
}

#[test]
fn inspect_fail_on_reject_returns_60() {
    let output = run_with_stdin(
        &["--format", "json", "inspect", "-", "--fail-on-reject"],
        &capture(),
    );
    assert_eq!(output.status.code(), Some(60));
}

#[test]
fn inspect_file_accepted_only_raw_filters_frames() {
    let path = unique_temp_file("filter", &capture());
    let output = hpwire(&["--format", "raw", "inspect", "--accepted-only"])
        .arg(&path)
        .output()
        .expect("inspect should run");

    assert!(output.status.success());
    let mut expected = GLT_FAVORITES.to_vec();
    expected.push(b'\r');
    expected.extend_from_slice(b"STS,<XML>,\n<ScannerStatus/>");
    assert_eq!(output.stdout, expected);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn inspect_require_schema_rejects_status_frames() {
    let output = run_with_stdin(
        &[
            "--format",
            "json",
            "inspect",
            "--require-schema",
            "--fail-on-reject",
        ],
        b"STS,<XML>,\n<ScannerStatus/>\r",
    );

    assert_eq!(output.status.code(), Some(60));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("no schema registered for STS"));
}

#[test]
fn inspect_skips_oversized_frame_and_continues() {
    let mut wire = vec![b'x'; 20_000];
    wire.push(b'\r');
    wire.extend_from_slice(GLT_FAVORITES);
    wire.push(b'\r');

    let output = run_with_stdin(
        &["--format", "json", "inspect", "--max-frame-size", "256"],
        &wire,
    );
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 1);
    assert!(stdout.contains("\"kind\":\"GLT/FL\""));

    let output = run_with_stdin(
        &[
            "--format",
            "json",
            "inspect",
            "--max-frame-size",
            "256",
            "--fail-on-reject",
        ],
        &wire,
    );
    assert_eq!(output.status.code(), Some(60));
}

#[test]
fn inspect_missing_file_returns_1() {
    let output = hpwire(&["inspect", "/nonexistent/hpwire-capture.bin"])
        .output()
        .expect("inspect should run");

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed opening"));
}

#[test]
fn send_writes_command_and_validates_response() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind should succeed");
    let addr = listener.local_addr().expect("local addr").to_string();

    let bridge = thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept should succeed");
        let mut received = Vec::new();
        let mut byte = [0u8; 1];
        while stream.read(&mut byte).expect("read should succeed") == 1 {
            received.push(byte[0]);
            if byte[0] == b'\r' {
                break;
            }
        }
        stream.write_all(GLT_FAVORITES).expect("write should succeed");
        stream.write_all(b"\r").expect("write should succeed");
        received
    });

    let output = hpwire(&["--format", "json", "send", &addr, "GLT", "FL", "--wait"])
        .output()
        .expect("send should run");

    assert!(output.status.success(), "{output:?}");
    assert_eq!(bridge.join().expect("bridge thread"), b"GLT\tFL\t395\r");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"kind\":\"GLT/FL\""));
    assert!(stdout.contains("\"accepted\":true"));
}

#[test]
fn send_wait_timeout_returns_124() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind should succeed");
    let addr = listener.local_addr().expect("local addr").to_string();

    let bridge = thread::spawn(move || {
        let (stream, _) = listener.accept().expect("accept should succeed");
        thread::sleep(std::time::Duration::from_millis(500));
        drop(stream);
    });

    let output = hpwire(&[
        "send",
        &addr,
        "GSI",
        "--wait",
        "--wait-timeout",
        "100ms",
    ])
    .output()
    .expect("send should run");

    assert_eq!(output.status.code(), Some(124));
    bridge.join().expect("bridge thread");
}

#[test]
fn version_prints_package_version() {
    let output = hpwire(&["version"]).output().expect("version should run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), format!("hpwire {}", env!("CARGO_PKG_VERSION")));
}
