use anyhow::Result;
use std::path::Path;
use std::process::Command;

use ytmash_core::config::Config;

pub async fn run(config_path: Option<&Path>) -> Result<()> {
    // Resolve tools the way the pipeline does, [paths] overrides included
    let config = Config::load(config_path)?;

    println!("ytmash dependency check\n");

    let mut all_ok = true;

    // Check yt-dlp
    print!("yt-dlp: ");
    match config.paths.yt_dlp_path() {
        Ok(path) => {
            let version = Command::new(&path).arg("--version").output();
            match version {
                Ok(out) => {
                    let v = String::from_utf8_lossy(&out.stdout);
                    println!("OK ({})", v.trim());
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    println!("NOT FOUND at {} (check [paths] in config)", path.display());
                    all_ok = false;
                }
                Err(_) => {
                    println!("FOUND but failed to get version");
                    all_ok = false;
                }
            }
        }
        Err(_) => {
            println!("NOT FOUND");
            println!("        Install with: brew install yt-dlp");
            all_ok = false;
        }
    }

    // Check FFmpeg
    print!("ffmpeg: ");
    match config.paths.ffmpeg_path() {
        Ok(path) => {
            let version = Command::new(&path).args(["-version"]).output();
            match version {
                Ok(out) => {
                    let first_line = String::from_utf8_lossy(&out.stdout)
                        .lines()
                        .next()
                        .unwrap_or("")
                        .to_string();
                    // Extract just version number
                    let version_part = first_line.split_whitespace().nth(2).unwrap_or("unknown");
                    println!("OK ({})", version_part);
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    println!("NOT FOUND at {} (check [paths] in config)", path.display());
                    all_ok = false;
                }
                Err(_) => {
                    println!("FOUND but failed to get version");
                    all_ok = false;
                }
            }
        }
        Err(_) => {
            println!("NOT FOUND");
            println!("        Install with: brew install ffmpeg");
            all_ok = false;
        }
    }

    println!();
    if all_ok {
        println!("All dependencies OK!");
    } else {
        println!("Some dependencies are missing. See above for installation instructions.");
    }

    Ok(())
}
