use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

const ISS_LINE1: &str = "1 25544U 98067A   25278.49802050  .00011384  00000+0  20935-3 0  9990";
const ISS_LINE2: &str = "2 25544  51.6327 120.3420 0000884 206.2421 153.8523 15.49697304532279";
const HST_LINE1: &str = "1 20580U 90037B   24001.50000000  .00000764  00000+0  34340-4 0  9990";
const HST_LINE2: &str = "2 20580  28.4700 100.2000 0002500 300.0000  60.0000 15.09000000400006";

fn tle_bstar(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tle-bstar"))
        .args(args)
        .output()
        .expect("binary should run")
}

fn write_catalogue(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("tle-bstar-{}-{name}.txt", std::process::id()));
    let contents = format!("HST\n{HST_LINE1}\n{HST_LINE2}\nISS (ZARYA)\n{ISS_LINE1}\n{ISS_LINE2}\n");
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn unrecognized_flag_aborts() {
    let out = tle_bstar(&["catalogue.txt", "-z"]);
    assert_eq!(out.status.code(), Some(255));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("'-z': unrecognized option"), "stdout: {stdout}");
    assert!(!stdout.lines().any(|l| l.starts_with("1 ") || l.starts_with("2 ")));
}

#[test]
fn extra_positional_arguments_are_ignored() {
    let path = write_catalogue("extra-args");
    let out = tle_bstar(&[path.to_str().unwrap(), "ignored.txt", "-n", "25544"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(!stdout.contains("unrecognized option"));
    assert!(stdout.contains("ISS (ZARYA)"));
    fs::remove_file(path).ok();
}

#[test]
fn help_exits_successfully() {
    let out = tle_bstar(&["--help"]);
    assert_eq!(out.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&out.stdout).contains("-n <NORAD>"));
}

#[test]
fn missing_input_file_fails() {
    let out = tle_bstar(&["/nonexistent/dir/no_such_catalogue.txt"]);
    assert_eq!(out.status.code(), Some(255));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Couldn't open '/nonexistent/dir/no_such_catalogue.txt'"), "stderr: {stderr}");
}

#[test]
fn filter_must_be_five_bytes() {
    let path = write_catalogue("short-filter");
    let out = tle_bstar(&[path.to_str().unwrap(), "-n", "255"]);
    assert_eq!(out.status.code(), Some(255));
    assert!(out.stdout.is_empty());
    fs::remove_file(path).ok();
}

#[test]
fn attached_and_separate_filter_values() {
    let path = write_catalogue("filters");
    for args in [vec!["-n25544"], vec!["-n", "25544"]] {
        let mut full = vec![path.to_str().unwrap()];
        full.extend(args);
        let out = tle_bstar(&full);
        assert!(out.status.success());
        let stdout = String::from_utf8_lossy(&out.stdout);
        let lines: Vec<&str> = stdout.lines().collect();
        assert_eq!(lines[0], "Looking for NORAD 25544");
        assert_eq!(lines[1], "ISS (ZARYA)");
        assert_eq!(lines.len(), 4);
        assert!(!stdout.contains("HST"));
    }
    fs::remove_file(path).ok();
}

#[test]
fn verbose_run_prints_legend_and_metrics() {
    let path = write_catalogue("verbose");
    let out = tle_bstar(&[path.to_str().unwrap(), "-v", "-i98067"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.starts_with("Looking for international ID 98067\n1 NoradU COSPAR"));
    assert_eq!(stdout.matches("Orbital period:").count(), 1);
    fs::remove_file(path).ok();
}
