//! Build script for depscope
//!
//! Exports the commit, compiler and build timestamp read by `depscope::build_info`.

use std::process::Command;

fn main() {
    let built_at = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    println!("cargo:rustc-env=DEPSCOPE_BUILT_AT={}", built_at);

    let docs_build = std::env::var("DOCS_RS").is_ok();

    let commit = if docs_build {
        None
    } else {
        command_line("git", &["rev-parse", "--short=10", "HEAD"])
    };
    println!(
        "cargo:rustc-env=DEPSCOPE_COMMIT={}",
        commit.as_deref().unwrap_or("unknown")
    );

    let rustc = std::env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string());
    let compiler = if docs_build {
        None
    } else {
        command_line(&rustc, &["--version"])
    };
    println!(
        "cargo:rustc-env=DEPSCOPE_RUSTC={}",
        compiler.as_deref().unwrap_or("unknown")
    );

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=build.rs");
}

/// First line of a successful command's stdout
fn command_line(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let stdout = String::from_utf8(output.stdout).ok()?;
    stdout
        .lines()
        .next()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
}
