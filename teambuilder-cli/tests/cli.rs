use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const SHEET: &str = "\
Name,Type,Set,Groups,nr wild,nr heroics,nr attacks,nr movements
Hulk,Hero,Set 1,Avengers,3,1,4,1
Loki,Villain,Set 2,Avengers,1,2,2,2
Classic Hero,,,,,,,
";

fn temp_path(label: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "teambuilder-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

/// Sheet plus portrait directory under a fresh temp dir.
fn fixture(label: &str) -> (PathBuf, PathBuf) {
    let dir = temp_path(label);
    let portraits = dir.join("portraits");
    std::fs::create_dir_all(&portraits).expect("create fixture dir");
    let sheet = dir.join("roster.csv");
    std::fs::write(&sheet, SHEET).expect("write sheet");
    for file in ["Hulk_Back.webp", "Venom_Villain_Back.webp", "Batman_29_Back.webp"] {
        std::fs::write(portraits.join(file), b"").expect("write portrait");
    }
    (sheet, portraits)
}

fn run(sheet: &Path, portraits: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_teambuilder"))
        .args(args)
        .arg("--sheet")
        .arg(sheet)
        .arg("--portraits")
        .arg(portraits)
        .env("NO_COLOR", "1")
        .output()
        .expect("run cli")
}

#[test]
fn cli_roster_writes_json_report() {
    let (sheet, portraits) = fixture("json");
    let output_path = temp_path("roster.json");
    let output_arg = output_path.to_string_lossy().into_owned();
    let output = run(
        &sheet,
        &portraits,
        &["roster", "--report", "json", "--sort", "alphabetical", "--output", &output_arg],
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let content = std::fs::read_to_string(output_path).expect("read output");
    let characters: serde_json::Value = serde_json::from_str(&content).expect("valid json");
    let ids: Vec<&str> = characters
        .as_array()
        .expect("array")
        .iter()
        .map(|c| c["id"].as_str().expect("id"))
        .collect();
    assert_eq!(ids, vec!["classic-hero-2", "hulk-0", "loki-1"]);
    assert_eq!(characters[1]["imageUrl"], "/portraits/Hulk_Back.webp");
    assert_eq!(characters[0]["imageUrl"], "/portraits/Batman_29_Back.webp");
}

#[test]
fn cli_roster_csv_applies_filters() {
    let (sheet, portraits) = fixture("csv");
    let output = run(
        &sheet,
        &portraits,
        &["roster", "--report", "csv", "--min-wild", "3", "--groups", "avengers"],
    );
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2, "{stdout}");
    assert!(lines[1].starts_with("hulk-0,HULK,Hero,Set 1,Avengers,3,1,4,1"));
}

#[test]
fn cli_resolve_reports_match_and_fallback() {
    let (sheet, portraits) = fixture("resolve");
    let output = run(&sheet, &portraits, &["resolve", "Venom", "--type", "dual"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("/portraits/Venom_Villain_Back.webp"), "{stdout}");

    let output = run(&sheet, &portraits, &["resolve", "Nobody Here"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("no portrait for `Nobody Here`"), "{stdout}");
}

#[test]
fn cli_team_code_round_trip() {
    let (sheet, portraits) = fixture("team");
    let encoded = run(&sheet, &portraits, &["team", "encode", "hulk-0", "loki-1"]);
    assert!(encoded.status.success());
    let code = String::from_utf8_lossy(&encoded.stdout).trim().to_string();
    assert!(!code.is_empty());

    let decoded = run(&sheet, &portraits, &["team", "decode", &code]);
    assert!(decoded.status.success());
    assert_eq!(String::from_utf8_lossy(&decoded.stdout), "hulk-0\nloki-1\n");
}

#[test]
fn cli_team_check_drops_unknown_ids() {
    let (sheet, portraits) = fixture("check");
    let encoded = run(&sheet, &portraits, &["team", "encode", "ghost-7", "hulk-0"]);
    let code = String::from_utf8_lossy(&encoded.stdout).trim().to_string();

    let output = run(&sheet, &portraits, &["team", "decode", &code, "--check"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stdout.contains("HULK (hulk-0)"), "{stdout}");
    assert!(!stdout.contains("ghost-7"));
    assert!(stderr.contains("ghost-7"), "{stderr}");
}

#[test]
fn cli_rejects_bad_input() {
    let (sheet, portraits) = fixture("bad");
    let output = run(&sheet, &portraits, &["team", "decode", "%%%"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid team code"));

    let output = run(&sheet, &portraits, &["team", "encode", "a,b"]);
    assert!(!output.status.success());

    let missing = sheet.with_file_name("absent.csv");
    let output = run(&missing, &portraits, &["roster"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to load roster"));
}
