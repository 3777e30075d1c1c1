//! `featload each` – load each discovered JSON artifact as it arrives.

use anyhow::Result;
use featload_core::Session;

pub async fn run_each(session: &Session, path: &str) -> Result<()> {
    let task = session.plugins().each_json(
        path,
        |json, ctx| {
            println!(
                "[{}] {} {}\n{}",
                format!("{:?}", ctx.freshness).to_lowercase(),
                ctx.entry.feature,
                ctx.url,
                json
            );
        },
        (),
    )?;
    task.await??;
    Ok(())
}
