use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;

pub fn run(secret_key: &str, file: Option<&Path>) -> Result<()> {
    let body = match file {
        Some(path) => std::fs::read(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .context("failed to read stdin")?;
            buf
        }
    };
    println!("{}", wrapweb_core::signature::sign(secret_key.as_bytes(), &body));
    Ok(())
}
