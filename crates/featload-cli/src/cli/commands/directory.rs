//! `featload directory` – print the directory listing for an extension point.

use anyhow::Result;
use featload_core::discovery::{DirectoryQuery, DirectoryResult};
use featload_core::Session;

pub async fn run_directory(session: &Session, path: &str, feature: Option<String>) -> Result<()> {
    let query = match feature {
        Some(f) => DirectoryQuery::for_feature(f, path),
        None => DirectoryQuery::new(path),
    };
    let task = session.discovery().directory(query, |result| print_listing(&result))?;
    task.await??;
    Ok(())
}

fn print_listing(result: &DirectoryResult) {
    println!(
        "[{}] {} entries for {}",
        format!("{:?}", result.freshness).to_lowercase(),
        result.directory.entries.len(),
        result.query.cache_key()
    );
    if result.directory.entries.is_empty() {
        return;
    }
    println!("{:<28} {:<20} {:<8} {}", "FEATURE", "NAME", "SIZE", "DOWNLOAD");
    for entry in &result.directory.entries {
        let size = entry
            .size
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string());
        let download = entry
            .download_link()
            .map(|l| l.href.as_str())
            .unwrap_or("-");
        println!("{:<28} {:<20} {:<8} {}", entry.feature, entry.name, size, download);
    }
}
