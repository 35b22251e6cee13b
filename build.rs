// Build script - stamps the binary with commit and build time
use std::process::Command;

fn capture(program: &str, args: &[&str]) -> String {
    Command::new(program)
        .args(args)
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

fn main() {
    let timestamp = if cfg!(windows) {
        capture("powershell", &["-Command", "(Get-Date).ToUniversalTime().ToString('yyyy-MM-dd HH:mm:ss')"])
    } else {
        capture("date", &["-u", "+%Y-%m-%d %H:%M:%S"])
    };
    let commit = capture("git", &["rev-parse", "--short", "HEAD"]);

    println!("cargo:rustc-env=BUILD_TIMESTAMP={}", timestamp);
    println!("cargo:rustc-env=BUILD_COMMIT={}", commit);
}
