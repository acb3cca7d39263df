//! CLI mode
//!
//! One-shot maintenance commands that run instead of the server.

use std::io::{self, BufRead, IsTerminal, Write};

use anyhow::{Context, Result, anyhow, bail};
use colored::Colorize;

use crate::config::StaticConfig;
use crate::runtime::lifetime::startup::connect_database;
use crate::utils::password::hash_new_password;

/// Write a sample configuration file to `path`
pub fn run_config_gen(path: &str) -> Result<()> {
    println!(
        "{} {}",
        "Generating configuration file...".yellow(),
        path.blue()
    );

    StaticConfig::default()
        .save_to_file(path)
        .map_err(|e| anyhow!("Unable to write configuration file: {}", e))?;

    println!(
        "  {} {}",
        "Configuration file generated successfully".green(),
        path.blue()
    );
    println!(
        "  {}",
        "Please edit the configuration file and restart the service".yellow()
    );
    Ok(())
}

/// 读取一行作为密码（用于脚本）
fn read_password_line<R: BufRead>(mut reader: R) -> Result<String> {
    let mut line = String::new();
    reader
        .read_line(&mut line)
        .context("Failed to read from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// 交互式输入密码（带确认）
fn prompt_password_with_confirm() -> Result<String> {
    if !io::stdin().is_terminal() {
        bail!("No terminal available. Use --stdin to pipe the password in.");
    }

    print!("Enter new password: ");
    io::stdout().flush()?;
    let password = rpassword::read_password().context("Failed to read password")?;

    print!("Confirm password: ");
    io::stdout().flush()?;
    let confirm = rpassword::read_password().context("Failed to read password")?;

    if password != confirm {
        bail!("Passwords do not match");
    }
    Ok(password)
}

/// Replace the stored account password
///
/// Works whether or not an account exists, which also makes it the way to
/// recover from a lost password or an unreadable legacy hash.
pub async fn run_reset_password(config: &StaticConfig, stdin: bool) -> Result<()> {
    let password = if stdin {
        read_password_line(io::stdin().lock())?
    } else {
        prompt_password_with_confirm()?
    };

    let hashed = hash_new_password(&password)?;

    let db = connect_database(config).await?;
    db.set_user(&hashed)
        .await
        .context("Failed to update the stored password")?;

    println!("{} Password reset successfully", "✓".green().bold());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_password_line_strips_newline() {
        let input = io::Cursor::new("hunter22 \r\nignored\n");
        assert_eq!(read_password_line(input).unwrap(), "hunter22 ");
    }

    #[test]
    fn test_config_gen_writes_loadable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let path = path.to_str().unwrap();

        run_config_gen(path).unwrap();

        let content = std::fs::read_to_string(path).unwrap();
        let parsed: StaticConfig = toml::from_str(&content).unwrap();
        assert_eq!(parsed.server.port, 8080);
        assert_eq!(parsed.store.key_prefix, "Nyooom:");
    }
}
