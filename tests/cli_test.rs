// Tests for the binary's startup checks. None of these reach a browser.

use std::process::Command;

fn notifier() -> Command {
    Command::new(env!("CARGO_BIN_EXE_relish-notifier"))
}

#[test]
fn test_help_lists_flags() {
    let output = notifier().arg("--help").output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    for flag in [
        "--no-headless",
        "--no-extensions",
        "--page-timeout",
        "--check-interval",
        "--once",
        "--verbose",
        "--command",
    ] {
        assert!(stdout.contains(flag), "help is missing {}", flag);
    }
}

#[test]
fn test_missing_credentials_exit_before_browser() {
    let output = notifier()
        .args(["--credentials", "env", "--webdriver-url", "http://localhost:65432"])
        .env_remove("RELISH_EMAIL")
        .env_remove("RELISH_PASSWORD")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("missing credentials"), "stderr: {}", stderr);
    assert!(stderr.contains("RELISH_EMAIL"), "stderr: {}", stderr);
}

#[test]
fn test_empty_password_is_missing() {
    let output = notifier()
        .args(["--credentials", "env", "--webdriver-url", "http://localhost:65432"])
        .env("RELISH_EMAIL", "me@example.com")
        .env("RELISH_PASSWORD", "")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("RELISH_PASSWORD"), "stderr: {}", stderr);
}

#[test]
fn test_unreachable_webdriver_is_an_error() {
    let output = notifier()
        .args(["--credentials", "env", "--webdriver-url", "http://localhost:65432"])
        .env("RELISH_EMAIL", "me@example.com")
        .env("RELISH_PASSWORD", "hunter2")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Cannot connect to WebDriver"), "stderr: {}", stderr);
}

#[test]
fn test_invalid_page_timeout() {
    let output = notifier().args(["--page-timeout", "0"]).output().unwrap();
    assert!(!output.status.success());
}

/// WebDriver stand-in: answers `/status` but never answers session creation.
/// Sends on `started` once a session has been requested.
#[cfg(unix)]
fn stalled_webdriver(started: std::sync::mpsc::Sender<()>) -> u16 {
    use std::io::{Read, Write};
    use std::net::TcpListener;

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    std::thread::spawn(move || {
        let mut held = Vec::new();
        for stream in listener.incoming() {
            let mut stream = match stream {
                Ok(stream) => stream,
                Err(_) => break,
            };

            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }

            if request.starts_with(b"GET /status") {
                let body = r#"{"value":{"ready":true,"message":"ready"}}"#;
                let _ = write!(
                    stream,
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
            } else {
                let _ = started.send(());
                held.push(stream);
            }
        }
    });

    port
}

#[cfg(unix)]
#[test]
fn test_interrupt_during_startup_exits_cleanly() {
    use std::time::{Duration, Instant};

    let (started, session_requested) = std::sync::mpsc::channel();
    let port = stalled_webdriver(started);

    let mut child = notifier()
        .args(["--credentials", "env", "--webdriver-url"])
        .arg(format!("http://127.0.0.1:{}", port))
        .env("RELISH_EMAIL", "me@example.com")
        .env("RELISH_PASSWORD", "hunter2")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn()
        .unwrap();

    session_requested
        .recv_timeout(Duration::from_secs(10))
        .expect("browser session was never requested");

    let status = Command::new("kill")
        .args(["-INT", &child.id().to_string()])
        .status()
        .unwrap();
    assert!(status.success());

    let deadline = Instant::now() + Duration::from_secs(10);
    let exit = loop {
        if let Some(exit) = child.try_wait().unwrap() {
            break exit;
        }
        if Instant::now() > deadline {
            let _ = child.kill();
            panic!("notifier did not exit after SIGINT");
        }
        std::thread::sleep(Duration::from_millis(50));
    };

    // Handled as a normal interrupt rather than killed by the signal
    assert_eq!(exit.code(), Some(0));
}
