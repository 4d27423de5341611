use std::path::PathBuf;

use anyhow::{Context, Result};

const DEFAULT_ALLOWED_ORIGINS: &[&str] = &[
    "http://localhost:3000",
    "http://localhost:5173",
    "https://sahilgogna.github.io",
];

/// Application configuration loaded from environment variables.
/// Every variable has a default; only a malformed `PORT` fails startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub template_dir: PathBuf,
    pub output_dir: PathBuf,
    pub latex_bin: String,
    pub allowed_origins: Vec<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            template_dir: env_or("TEMPLATE_DIR", "./templates").into(),
            output_dir: env_or("OUTPUT_DIR", "./output").into(),
            latex_bin: env_or("LATEX_BIN", "pdflatex"),
            allowed_origins: std::env::var("ALLOWED_ORIGINS")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(|v| parse_origins(&v))
                .unwrap_or_else(|| {
                    DEFAULT_ALLOWED_ORIGINS
                        .iter()
                        .map(|o| o.to_string())
                        .collect()
                }),
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

/// Empty values count as unset.
fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}
