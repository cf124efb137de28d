use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use std::sync::atomic::{AtomicU16, Ordering};
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

// Helper function to get an available port with atomic counter to avoid conflicts
static PORT_COUNTER: AtomicU16 = AtomicU16::new(52000);

fn get_available_port() -> u16 {
    PORT_COUNTER.fetch_add(1, Ordering::SeqCst)
}

// Helper to create a simple mock server answering one request
fn start_mock_server(
    port: u16,
    status: &'static str,
    response_body: String,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        use std::io::{Read, Write};
        use std::net::TcpListener;

        let bind_addr = format!("127.0.0.1:{}", port);
        let listener = match TcpListener::bind(&bind_addr) {
            Ok(l) => l,
            Err(_) => return, // Port already in use, exit gracefully
        };

        if let Some(Ok(mut stream)) = listener.incoming().next() {
            let mut buffer = [0; 4096];
            if stream.read(&mut buffer).is_ok() {
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    response_body.len(),
                    response_body
                );
                let _ = stream.write_all(response.as_bytes());
            }
        }
    })
}

fn create_temp_dir() -> std::path::PathBuf {
    let mut dir = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    dir.push(format!("redmine-test-{}-{}", std::process::id(), nanos));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn redmine() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("redmine");
    cmd.env_remove("REDMINE_URL")
        .env_remove("REDMINE_TOKEN")
        .env_remove("REDMINE_CONFIG")
        .env_remove("REDMINE_DEFAULT_PROJECT")
        .env("XDG_CONFIG_HOME", create_temp_dir())
        .current_dir(create_temp_dir());
    cmd
}

#[test]
fn test_missing_config() {
    redmine()
        .args(["issue", "get", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("URL not configured"));
}

#[test]
fn test_missing_token() {
    redmine()
        .args(["--url", "http://127.0.0.1:9", "project", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("API key not configured"));
}

#[test]
fn test_help_command() {
    cargo_bin_cmd!("redmine")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Command-line client for Redmine"));
}

#[test]
fn test_issue_subcommand_help() {
    cargo_bin_cmd!("redmine")
        .args(["issue", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Issue operations"));
}

#[test]
fn test_version() {
    cargo_bin_cmd!("redmine")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_completions() {
    cargo_bin_cmd!("redmine")
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("redmine"));
}

#[test]
fn test_invalid_enum_kind() {
    cargo_bin_cmd!("redmine")
        .args(["enum", "colors"])
        .assert()
        .failure();
}

#[test]
fn test_config_file_is_used_for_defaults() {
    let temp_dir = create_temp_dir();
    let config_path = temp_dir.join("config.toml");

    let port = get_available_port();
    let url = format!("http://127.0.0.1:{}", port);

    let config_contents = format!("url = \"{}\"\ntoken = \"test-key\"\n", url);
    std::fs::write(&config_path, config_contents).unwrap();

    let mock_response = json!({
        "projects": [{
            "id": 1,
            "name": "Redmine",
            "identifier": "redmine",
            "description": "Project management",
            "status": 1,
            "is_public": true
        }],
        "total_count": 1,
        "offset": 0,
        "limit": 25
    });

    let _server = start_mock_server(port, "200 OK", mock_response.to_string());
    thread::sleep(Duration::from_millis(200));

    let output = redmine()
        .args([
            "--config",
            config_path.to_str().unwrap(),
            "--format",
            "json",
            "project",
            "list",
        ])
        .timeout(Duration::from_secs(5))
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let projects: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(projects[0]["identifier"], "redmine");
    assert_eq!(projects[0]["id"], 1);
}

#[test]
fn test_get_issue_text_output() {
    let port = get_available_port();
    let mock_response = json!({
        "issue": {
            "id": 42,
            "project": {"id": 1, "name": "Redmine"},
            "tracker": {"id": 1, "name": "Bug"},
            "status": {"id": 1, "name": "New"},
            "priority": {"id": 4, "name": "Normal"},
            "subject": "Crash on save",
            "description": "Steps to reproduce",
            "start_date": "2024-03-01",
            "done_ratio": 0,
            "created_on": "2024-03-01T09:00:00Z",
            "updated_on": "2024-03-01T09:00:00Z",
            "journals": [],
            "attachments": []
        }
    });

    let _server = start_mock_server(port, "200 OK", mock_response.to_string());
    thread::sleep(Duration::from_millis(200));

    redmine()
        .args(["--color", "never", "issue", "get", "42"])
        .env("REDMINE_URL", format!("http://127.0.0.1:{}", port))
        .env("REDMINE_TOKEN", "test-key")
        .timeout(Duration::from_secs(5))
        .assert()
        .success()
        .stdout(predicate::str::contains("#42 - Crash on save"))
        .stdout(predicate::str::contains("Redmine"));
}

#[test]
fn test_issue_message() {
    let port = get_available_port();
    let url = format!("http://127.0.0.1:{}", port);
    let mock_response = json!({
        "issue": {
            "id": 7,
            "subject": "Release 5.1",
            "description": "Ship it"
        }
    });

    let _server = start_mock_server(port, "200 OK", mock_response.to_string());
    thread::sleep(Duration::from_millis(200));

    redmine()
        .args(["--url", &url, "--token", "test-key", "issue", "get", "7", "--message"])
        .timeout(Duration::from_secs(5))
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "[#7 Release 5.1]({}/issues/7)",
            url
        )));
}

#[test]
fn test_not_found_json_error() {
    let port = get_available_port();
    let _server = start_mock_server(port, "404 Not Found", String::new());
    thread::sleep(Duration::from_millis(200));

    redmine()
        .args(["--format", "json", "issue", "get", "999"])
        .env("REDMINE_URL", format!("http://127.0.0.1:{}", port))
        .env("REDMINE_TOKEN", "test-key")
        .timeout(Duration::from_secs(5))
        .assert()
        .failure()
        .stderr(predicate::str::contains(r#""code": "not_found""#));
}

#[test]
fn test_config_show_masks_token() {
    let temp_dir = create_temp_dir();
    let config_path = temp_dir.join("config.toml");
    std::fs::write(
        &config_path,
        "url = \"https://redmine.example.com\"\ntoken = \"0123456789abcdef\"\ndefault_project = \"redmine\"\n",
    )
    .unwrap();

    redmine()
        .args(["--config", config_path.to_str().unwrap(), "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://redmine.example.com"))
        .stdout(predicate::str::contains("0123****"))
        .stdout(predicate::str::contains("0123456789abcdef").not());
}

#[test]
fn test_config_path_lists_local_file() {
    redmine()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("redmine.toml"));
}
