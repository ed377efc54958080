use anyhow::{Context, Result};
use simplesearch::config::Config;
use std::path::{Path, PathBuf};

pub async fn init_config(path: PathBuf, force: bool) -> Result<()> {
    let config_path = if path.is_dir() {
        path.join("config.toml")
    } else {
        path
    };

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        );
    }

    write_default_config(&config_path)?;
    println!("Created configuration file: {}", config_path.display());
    Ok(())
}

fn write_default_config(path: &Path) -> Result<()> {
    let body = toml::to_string_pretty(&Config::default())
        .context("Failed to serialize default configuration")?;

    let content = format!(
        "# simplesearch configuration\n\
         #\n\
         # VESPA_URL, VESPA_PORT, VESPA_RESULT_LIMIT, VESPA_MAX_RESULT_LIMIT,\n\
         # SIMPLESEARCH_EMBEDDING_ENDPOINT and SIMPLESEARCH_LISTEN_ADDR override\n\
         # the matching settings at startup.\n\
         #\n\
         # Set [embedding] endpoint to enable the semantic and fusion profiles, e.g.\n\
         # endpoint = \"http://localhost:1234/v1/embeddings\"\n\n{}",
        body
    );

    std::fs::write(path, content)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
