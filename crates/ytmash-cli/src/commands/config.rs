use anyhow::Result;
use std::path::Path;
use ytmash_core::config::Config;

pub async fn run(config_path: Option<&Path>) -> Result<()> {
    let config = Config::load(config_path)?;

    println!("ytmash configuration\n");

    println!("[paths]");
    if let Some(ref p) = config.paths.yt_dlp {
        println!("  yt_dlp = {:?}", p);
    } else {
        println!("  yt_dlp = (auto-detect)");
    }
    if let Some(ref p) = config.paths.ffmpeg {
        println!("  ffmpeg = {:?}", p);
    } else {
        println!("  ffmpeg = (auto-detect)");
    }

    println!("\n[output]");
    println!("  default_directory = {:?}", config.output.default_directory);

    println!("\n[temp]");
    println!("  cleanup = {}", config.temp.cleanup);
    if let Some(ref d) = config.temp.directory {
        println!("  directory = {:?}", d);
    } else {
        println!("  directory = (system temp)");
    }

    println!("\n[web]");
    println!("  bind_addr = {:?}", config.web.bind_addr);
    println!("  artifact_dir = {:?}", config.web.artifact_dir);

    println!("\n[smtp]");
    if let Some(ref h) = config.smtp.host {
        println!("  host = {:?}", h);
    } else {
        println!("  host = (not configured)");
    }
    println!("  port = {}", config.smtp.port);
    if let Some(ref u) = config.smtp.username {
        println!("  username = {:?}", u);
    } else {
        println!("  username = (none)");
    }
    // Never print credentials
    if config.smtp.password.is_some() {
        println!("  password = \"***\"");
    } else {
        println!("  password = (none)");
    }
    if let Some(ref f) = config.smtp.from {
        println!("  from = {:?}", f);
    } else {
        println!("  from = (not configured)");
    }

    // Show config file locations
    println!("\nConfig file locations (in priority order):");
    if let Some(p) = config_path {
        println!("  1. {} (specified)", p.display());
    }
    if let Some(config_dir) = dirs::config_dir() {
        println!("  2. {}/ytmash/config.toml", config_dir.display());
    }
    println!("  3. Environment variables (YTMASH_*)");

    Ok(())
}
