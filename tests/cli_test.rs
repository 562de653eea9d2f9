use assert_cmd::prelude::*;
use std::io::Write;
use std::process::Command;

type STDRESULT = Result<(), Box<dyn std::error::Error>>;

fn write_integers(dir: &std::path::Path, name: &str, values: &[i32]) -> std::path::PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).expect("create fixture");
    for v in values {
        writeln!(file, "{v}").expect("write fixture");
    }
    path
}

#[test]
fn stats_reports_cardinality_and_words() -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let input = write_integers(temp_dir.path(), "a.txt", &[1, 2, 3, 100, 1000]);
    Command::cargo_bin("concise-cli")?
        .arg("stats")
        .arg("-i")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicates::str::contains("cardinality: 5"));
    Ok(())
}

#[test]
fn op_and_intersects_two_files() -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let a = write_integers(temp_dir.path(), "a.txt", &[1, 2, 3, 100, 1000]);
    let b = write_integers(temp_dir.path(), "b.txt", &[100, 101]);
    let out = temp_dir.path().join("out.txt");
    Command::cargo_bin("concise-cli")?
        .arg("op")
        .arg("--op")
        .arg("and")
        .arg("-a")
        .arg(&a)
        .arg("-b")
        .arg(&b)
        .arg("-o")
        .arg(&out)
        .assert()
        .success();
    let contents = std::fs::read_to_string(out)?;
    assert_eq!(contents.trim(), "100");
    Ok(())
}

#[test]
fn op_or_unions_two_files() -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let a = write_integers(temp_dir.path(), "a.txt", &[1, 2, 3]);
    let b = write_integers(temp_dir.path(), "b.txt", &[3, 4]);
    let out = temp_dir.path().join("out.txt");
    Command::cargo_bin("concise-cli")?
        .arg("op")
        .arg("--op")
        .arg("or")
        .arg("-a")
        .arg(&a)
        .arg("-b")
        .arg(&b)
        .arg("-o")
        .arg(&out)
        .assert()
        .success();
    let contents = std::fs::read_to_string(out)?;
    let values: Vec<i32> = contents.lines().map(|l| l.parse().unwrap()).collect();
    assert_eq!(values, vec![1, 2, 3, 4]);
    Ok(())
}

#[test]
fn dump_writes_a_hex_file() -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let input = write_integers(temp_dir.path(), "a.txt", &[1, 2, 3]);
    let out = temp_dir.path().join("a.hex");
    Command::cargo_bin("concise-cli")?
        .arg("dump")
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&out)
        .assert()
        .success();
    let contents = std::fs::read_to_string(out)?;
    assert!(!contents.is_empty());
    assert!(contents.chars().all(|c| c.is_ascii_hexdigit()));
    Ok(())
}

#[test]
fn rejects_unknown_operator() -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let a = write_integers(temp_dir.path(), "a.txt", &[1]);
    let b = write_integers(temp_dir.path(), "b.txt", &[2]);
    let out = temp_dir.path().join("out.txt");
    Command::cargo_bin("concise-cli")?
        .arg("op")
        .arg("--op")
        .arg("nand")
        .arg("-a")
        .arg(&a)
        .arg("-b")
        .arg(&b)
        .arg("-o")
        .arg(&out)
        .assert()
        .failure();
    Ok(())
}
