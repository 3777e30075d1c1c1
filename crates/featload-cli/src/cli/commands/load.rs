//! `featload load` – load a batch and report per-URL status.

use anyhow::{bail, Result};
use featload_core::loader::LoadOutcome;
use featload_core::registry::{Content, ResourceKind};
use featload_core::Session;

pub async fn run_load(session: &Session, kind: ResourceKind, urls: &[String]) -> Result<()> {
    let handle = session.loader().request(kind, urls)?;
    let canonical = handle.urls().to_vec();
    let outcome = handle.wait().await;

    println!("{:<12} {}", "STATUS", "URL");
    for url in &canonical {
        let status = session.registry().status(kind, url);
        println!("{:<12} {}", format!("{:?}", status).to_lowercase(), url);
    }

    match outcome {
        LoadOutcome::Complete(contents) => {
            for loaded in contents {
                match loaded.content {
                    Some(Content::Json(v)) => {
                        println!("\n{}:\n{}", loaded.url, serde_json::to_string_pretty(&v)?)
                    }
                    Some(Content::Text(text)) => println!("{}: {} bytes", loaded.url, text.len()),
                    None => println!("{}: already present", loaded.url),
                }
            }
            Ok(())
        }
        LoadOutcome::Failed(failed) => {
            for f in &failed {
                eprintln!("{}: {}", f.url, f.fault);
            }
            bail!("{} of {} resource(s) failed to load", failed.len(), canonical.len())
        }
        LoadOutcome::Aborted => bail!("load aborted"),
    }
}
