use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

fn run_command(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_code-walk"))
        .args(args)
        .output()
        .expect("Failed to execute command")
}

fn demo(name: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("demos")
        .join(name)
        .to_string_lossy()
        .to_string()
}

#[test]
fn test_show_command_prints_step() {
    let output = run_command(&["show", &demo("blink.walk"), "--step", "3", "--context", "1"]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines[0],
        "[3/4] The setup function runs once when you press reset or power the board"
    );
    assert!(lines.contains(&">  3 | void setup() {"));
    assert!(lines.contains(&">  5 | }"));
    assert!(!stdout.contains("digitalWrite"));
}

#[test]
fn test_show_rejects_out_of_range_step() {
    let output = run_command(&["show", &demo("serial.walk"), "--step", "5"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("out of range"), "Unexpected stderr: {}", stderr);
}

#[test]
fn test_show_reports_script_errors() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let script = temp_dir.path().join("broken.walk");
    fs::write(&script, "% blink.ino\n# 1..two Broken\n").expect("Failed to write script");

    let output = run_command(&["show", script.to_str().unwrap()]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("line 2"), "Unexpected stderr: {}", stderr);
}

#[test]
fn test_html_command_with_glob() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let output_path = temp_dir.path().join("deck/index.html");
    let pattern = format!("{}/*.walk", PathBuf::from(demo("blink.walk")).parent().unwrap().display());

    let output = run_command(&[
        "html",
        "-i",
        &pattern,
        "-o",
        output_path.to_str().unwrap(),
        "--title",
        "Single-Board Microcontrollers",
        "--css",
        "https://example.com/monokai.css",
        "--mode",
        "link",
    ]);
    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(output_path.exists(), "Output file was not created");

    let html = fs::read_to_string(&output_path).expect("Failed to read output file");
    assert!(html.contains("<title>Single-Board Microcontrollers</title>"));
    assert!(html.contains(r#"<link rel="stylesheet" href="https://example.com/monokai.css">"#));
    assert_eq!(html.matches("<section class=\"walkthrough\"").count(), 3);
    assert!(html.contains("data-lang=\"javascript\""));
    // Glob matches are sorted: blink, johnny-five, serial
    let blink = html.find("Native Blink Sketch").unwrap();
    let johnny_five = html.find("Johnny-Five Blink Sketch").unwrap();
    let serial = html.find("Serial Monitoring").unwrap();
    assert!(blink < johnny_five && johnny_five < serial);
}

#[test]
fn test_present_reads_commands_from_stdin() {
    let mut child = Command::new(env!("CARGO_BIN_EXE_code-walk"))
        .args(["present", &demo("blink.walk"), "--context", "0"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn presenter");

    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(b"n\nn\nn\nn\np\nbogus\nq\n")
        .expect("Failed to write commands");

    let output = child.wait_with_output().expect("Presenter did not finish");
    assert!(output.status.success(), "Presenter failed: {:?}", output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[1/4] Native Blink Sketch"));
    assert!(stdout.contains("[4/4] The loop function runs over and over again forever"));
    assert!(stdout.contains("(still at step 4/4)"));
    let last_screen = stdout.rfind("[3/4]").unwrap();
    assert!(last_screen > stdout.find("[4/4]").unwrap());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unknown command"));
}

#[test]
fn test_no_command_prints_hint() {
    let output = run_command(&[]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("--help"));
}
