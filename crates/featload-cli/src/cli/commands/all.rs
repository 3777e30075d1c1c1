//! `featload all` – load every discovered JSON artifact as one batch.

use anyhow::Result;
use featload_core::Session;

pub async fn run_all(session: &Session, path: &str) -> Result<()> {
    let task = session.plugins().all_json(path, |items, result| {
        println!(
            "[{}] {} artifact(s) for {}",
            format!("{:?}", result.freshness).to_lowercase(),
            items.len(),
            result.query.path
        );
        for item in items {
            println!("{}\n{}", item.url, item.content);
        }
    })?;
    task.await??;
    Ok(())
}
