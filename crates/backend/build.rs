//! Кладёт config.toml из корня workspace рядом с собранным бинарником.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

fn target_profile_dir() -> Option<PathBuf> {
    // OUT_DIR: target/<profile>/build/crm-backend-xxx/out
    let out_dir = PathBuf::from(env::var("OUT_DIR").ok()?);
    let profile = env::var("PROFILE").ok()?;
    out_dir
        .ancestors()
        .find(|p| p.ends_with(&profile))
        .map(Path::to_path_buf)
}

fn main() {
    println!("cargo:rerun-if-changed=../../config.toml");

    let workspace_root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../..");
    let source_config = workspace_root.join("config.toml");

    let Some(target_dir) = target_profile_dir() else {
        println!("cargo:warning=Could not find target profile directory, config.toml not copied");
        return;
    };
    if !source_config.exists() {
        println!(
            "cargo:warning=config.toml not found at {:?}, using default config",
            source_config
        );
        return;
    }

    let dest_config = target_dir.join("config.toml");
    if let Err(e) = fs::copy(&source_config, &dest_config) {
        panic!("Failed to copy config.toml: {}", e);
    }
}
