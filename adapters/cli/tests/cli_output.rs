use std::process::Command;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

fn splat(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_splat"))
        .args(args)
        .output()
        .expect("failed to run splat binary")
}

#[test]
fn seeded_sprite_is_written_to_stdout_reproducibly() {
    let args = ["--seed", "42", "--width", "12", "--height", "12", "--scaled-width", "48"];
    let first = splat(&args);
    let second = splat(&args);

    assert!(first.status.success(), "splat failed: {first:?}");
    assert!(first.stdout.starts_with(&PNG_SIGNATURE));
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn list_scalers_prints_registered_names() {
    let output = splat(&["--list-scalers"]);

    assert!(output.status.success());
    let names = String::from_utf8(output.stdout).expect("utf-8 listing");
    assert_eq!(
        names.lines().collect::<Vec<_>>(),
        ["Eagle2x", "Eagle3x", "NearestNeighbor", "Scale2x", "Scale3x"]
    );
}

#[test]
fn batch_files_are_numbered() {
    let dir = std::env::temp_dir().join(format!("splat-cli-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("temp dir");
    let base = dir.join("sprite");

    let output = splat(&[
        "--seed",
        "3",
        "--num-images",
        "3",
        "--random-seed",
        "--output",
        base.to_str().expect("utf-8 temp path"),
    ]);

    assert!(output.status.success(), "splat failed: {output:?}");
    for index in 0..3 {
        let bytes = std::fs::read(dir.join(format!("sprite_{index}.png"))).expect("image written");
        assert!(bytes.starts_with(&PNG_SIGNATURE));
    }
    std::fs::remove_dir_all(&dir).expect("cleanup");
}

#[test]
fn invalid_parameters_fail() {
    let output = splat(&["--scaler", "Hq4x"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Hq4x"), "unexpected stderr: {stderr}");
}

#[test]
fn format_picks_container_and_extension() {
    let dir = std::env::temp_dir().join(format!("splat-cli-format-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("temp dir");
    let base = dir.join("ship");

    let output = splat(&[
        "--seed",
        "5",
        "--format",
        "bmp",
        "--output",
        base.to_str().expect("utf-8 temp path"),
    ]);

    assert!(output.status.success(), "splat failed: {output:?}");
    let bytes = std::fs::read(dir.join("ship.bmp")).expect("bmp written");
    assert!(bytes.starts_with(b"BM"));
    std::fs::remove_dir_all(&dir).expect("cleanup");
}

#[test]
fn bits_write_an_indexed_png() {
    let output = splat(&["--seed", "8", "--width", "8", "--height", "8", "--bits", "8"]);

    assert!(output.status.success(), "splat failed: {output:?}");
    let bytes = output.stdout;
    assert!(bytes.starts_with(&PNG_SIGNATURE));
    assert_eq!(&bytes[12..16], b"IHDR");
    assert_eq!(bytes[24], 8, "bit depth");
    assert_eq!(bytes[25], 3, "indexed color type");
}

#[test]
fn bits_need_png_output() {
    let output = splat(&["--format", "gif", "--bits", "4"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--bits"), "unexpected stderr: {stderr}");
}
