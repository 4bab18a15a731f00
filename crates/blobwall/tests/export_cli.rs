use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

fn blobwall(root: &TempDir) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_blobwall"));
    command
        .env("BLOBWALL_CONFIG_DIR", root.path().join("config"))
        .env("BLOBWALL_DATA_DIR", root.path().join("data"));
    command
}

/// Reads the dimensions from a PNG IHDR chunk.
fn png_dimensions(path: &Path) -> (u32, u32) {
    let bytes = fs::read(path).expect("read exported png");
    assert_eq!(&bytes[1..4], b"PNG", "missing png signature");
    let width = u32::from_be_bytes(bytes[16..20].try_into().unwrap());
    let height = u32::from_be_bytes(bytes[20..24].try_into().unwrap());
    (width, height)
}

#[test]
fn export_writes_a_frame_headless() {
    let root = TempDir::new().unwrap();
    let out = root.path().join("frame.png");

    let status = blobwall(&root)
        .arg("--export")
        .arg(&out)
        .args(["--size", "320x180", "--time", "1.5", "--seed", "7"])
        .status()
        .unwrap();

    assert!(status.success());
    assert_eq!(png_dimensions(&out), (320, 180));
}

#[test]
fn export_honors_the_config_window_size() {
    let root = TempDir::new().unwrap();
    let config_dir = root.path().join("config");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("blobwall.toml"),
        r#"
version = 1

[window]
width = 64
height = 48
"#,
    )
    .unwrap();

    let out = root.path().join("frame.png");
    let status = blobwall(&root)
        .arg("--export")
        .arg(&out)
        .args(["--seed", "3"])
        .status()
        .unwrap();

    assert!(status.success());
    assert_eq!(png_dimensions(&out), (64, 48));
}

#[test]
fn invalid_config_file_fails_loudly() {
    let root = TempDir::new().unwrap();
    let config_path = root.path().join("blobwall.toml");
    fs::write(&config_path, "version = 99").unwrap();

    let out = root.path().join("frame.png");
    let output = blobwall(&root)
        .arg("--config")
        .arg(&config_path)
        .arg("--export")
        .arg(&out)
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(!out.exists());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("version"), "stderr was: {stderr}");
}

#[test]
fn invalid_size_spec_is_rejected() {
    let root = TempDir::new().unwrap();
    let out = root.path().join("frame.png");
    let status = blobwall(&root)
        .arg("--export")
        .arg(&out)
        .args(["--size", "bogus"])
        .status()
        .unwrap();
    assert!(!status.success());
    assert!(!out.exists());
}
