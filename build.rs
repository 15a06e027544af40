//! Build script for foodbuddy
//!
//! Embeds a build number and compile timestamp for the startup banner and
//! the `/status` endpoint.

use std::env;
use std::fs;
use std::path::Path;

fn main() {
    println!("cargo:rerun-if-changed=src");
    println!("cargo:rerun-if-env-changed=FOODBUDDY_BUILD_NUMBER");

    // CI can pin the number; local builds bump a counter kept next to Cargo.toml
    let build_number: u64 = match env::var("FOODBUDDY_BUILD_NUMBER") {
        Ok(pinned) => pinned.trim().parse().unwrap_or(0),
        Err(_) => bump_local_counter(Path::new("build_number.txt")),
    };

    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
    let profile = env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());

    println!("cargo:rustc-env=FOODBUDDY_BUILD_NUMBER={}", build_number);
    println!("cargo:rustc-env=FOODBUDDY_BUILD_TIMESTAMP={}", timestamp);
    println!("cargo:rustc-env=FOODBUDDY_BUILD_PROFILE={}", profile);
}

fn bump_local_counter(path: &Path) -> u64 {
    let current: u64 = fs::read_to_string(path)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0);
    let next = current + 1;
    // A read-only source tree still builds, just without a persisted counter
    if fs::write(path, next.to_string()).is_err() {
        println!("cargo:warning=could not persist {}", path.display());
    }
    next
}
