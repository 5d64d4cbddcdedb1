use std::env;

use kindling::minecraft::{command::build_command, listing, options::LaunchOptions};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dir = match listing::default_game_directory() {
        Some(dir) => dir,
        None => env::current_dir()?.join("game"),
    };

    println!("installed versions in {}:", dir.display());
    for version in listing::installed_versions(&dir).await? {
        println!("  {}", version.id);
    }

    // Pass an installed version id, e.g. "fabric-loader-0.15.6-1.20.1".
    let version = env::args().nth(1).unwrap_or_else(|| "1.20.1".to_string());

    let command = build_command(&version, &dir, &LaunchOptions::offline("Player")).await?;
    println!("{}", command.join(" "));

    Ok(())
}
