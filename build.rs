//! Build script for NutriFacts
//!
//! Bumps `build_number.txt` and embeds the build number and time.

use std::fs;

const BUILD_NUMBER_FILE: &str = "build_number.txt";

fn main() {
    println!("cargo:rerun-if-changed=src");

    let previous: u64 = fs::read_to_string(BUILD_NUMBER_FILE)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0);
    let build = previous + 1;

    if let Err(e) = fs::write(BUILD_NUMBER_FILE, build.to_string()) {
        println!("cargo:warning=Could not update {}: {}", BUILD_NUMBER_FILE, e);
    }

    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");

    println!("cargo:rustc-env=NUTRIFACTS_BUILD_NUMBER={}", build);
    println!("cargo:rustc-env=NUTRIFACTS_BUILD_TIMESTAMP={}", timestamp);
    println!("cargo:warning=NutriFacts build #{} at {}", build, timestamp);
}
