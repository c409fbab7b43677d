// build.rs: stamps BUILD_DATE for the startup banner

use chrono::Utc;
use std::env;
use std::fs;
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let out_dir = env::var("OUT_DIR")?;
    let dest_path = Path::new(&out_dir).join("build_info.rs");

    let build_date = Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();
    fs::write(&dest_path, format!("pub const BUILD_DATE: &str = \"{}\";\n", build_date))?;

    // only re-stamp when the script itself changes
    println!("cargo:rerun-if-changed=build.rs");
    Ok(())
}
