use std::path::{Path, PathBuf};

fn exe() -> PathBuf {
    std::env::var_os("CARGO_BIN_EXE_scene-export")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let mut p = PathBuf::from("target").join("debug");
            p.push(if cfg!(windows) {
                "scene-export.exe"
            } else {
                "scene-export"
            });
            p
        })
}

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let p = dir.join(name);
    std::fs::write(&p, contents).unwrap();
    p
}

#[test]
fn cli_material_then_assemble_writes_scene() {
    let dir = tempfile::tempdir().unwrap();

    let mat_path = dir.path().join("mat.json");
    let status = std::process::Command::new(exe())
        .args(["material", "lambert", "--color", "#ff0000", "--opacity", "0.5", "--out"])
        .arg(&mat_path)
        .status()
        .unwrap();
    assert!(status.success());

    let geo_path = write(dir.path(), "geo.json", r#"{"uuid":"g1","type":"Geometry"}"#);
    let out_path = dir.path().join("scene.json");

    let output = std::process::Command::new(exe())
        .args(["assemble", "--write", "--print", "--geometry"])
        .arg(&geo_path)
        .arg("--material")
        .arg(&mat_path)
        .arg("--out")
        .arg(&out_path)
        .output()
        .unwrap();
    assert!(output.status.success());

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out_path).unwrap()).unwrap();
    let printed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(written, printed);
    assert_eq!(written["materials"][0]["type"], "MeshLambertMaterial");
    assert_eq!(written["materials"][0]["opacity"], 0.5);
    assert_eq!(
        written["scene"]["children"][0]["material"],
        written["materials"][0]["uuid"]
    );
}

#[test]
fn cli_without_write_flag_leaves_disk_alone() {
    let dir = tempfile::tempdir().unwrap();
    let geo_path = write(dir.path(), "geo.json", r#"{"uuid":"g1"}"#);
    let mat_path = write(dir.path(), "mat.json", r#"{"uuid":"m1"}"#);
    let out_path = dir.path().join("scene.json");

    let output = std::process::Command::new(exe())
        .arg("assemble")
        .arg("--geometry")
        .arg(&geo_path)
        .arg("--material")
        .arg(&mat_path)
        .arg("--out")
        .arg(&out_path)
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(!out_path.exists());
    assert!(String::from_utf8_lossy(&output.stderr).contains("write flag"));
}

#[test]
fn cli_rejects_wrong_extension() {
    let dir = tempfile::tempdir().unwrap();
    let geo_path = write(dir.path(), "geo.json", r#"{"uuid":"g1"}"#);
    let mat_path = write(dir.path(), "mat.json", r#"{"uuid":"m1"}"#);

    let status = std::process::Command::new(exe())
        .args(["assemble", "--write", "--geometry"])
        .arg(&geo_path)
        .arg("--material")
        .arg(&mat_path)
        .arg("--out")
        .arg(dir.path().join("scene.txt"))
        .status()
        .unwrap();

    assert!(!status.success());
}

#[test]
fn cli_phong_reports_shininess_warning() {
    let output = std::process::Command::new(exe())
        .args(["material", "phong", "--color", "#00ff00", "--shininess", "-5"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("warning:"), "{stderr}");

    let fragment: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(fragment["type"], "MeshPhongMaterial");
    assert_eq!(fragment["shininess"], 30.0);
}
