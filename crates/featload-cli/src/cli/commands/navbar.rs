//! `featload navbar` – install discovered navbar buttons into an in-memory bar.

use std::sync::{Arc, Mutex, PoisonError};

use anyhow::Result;
use featload_core::config::FeatloadConfig;
use featload_core::navbar::Navbar;
use featload_core::Session;

pub async fn run_navbar(
    session: &Session,
    cfg: &FeatloadConfig,
    order: Option<String>,
    home: Option<String>,
) -> Result<()> {
    let mut navbar_cfg = cfg.navbar();
    if let Some(order) = order {
        navbar_cfg.order = order;
    }
    if home.is_some() {
        navbar_cfg.home = home;
    }
    let navbar = Arc::new(Mutex::new(Navbar::from_config(&navbar_cfg)));

    let count = session.install_navbar(Arc::clone(&navbar)).await?;

    let navbar = navbar.lock().unwrap_or_else(PoisonError::into_inner);
    let active = navbar.active().map(|b| (b.feature.clone(), b.index));
    println!("{count} button(s) installed from {}", navbar_cfg.descriptor_path);
    println!("{:<4} {:<28} {:<6} {}", "POS", "FEATURE", "INDEX", "TAB");
    for (pos, b) in navbar.buttons().iter().enumerate() {
        let marker = if active == Some((b.feature.clone(), b.index)) { "*" } else { "" };
        println!(
            "{:<4} {:<28} {:<6} {}{}",
            pos,
            b.feature,
            b.index,
            b.tab.as_deref().unwrap_or("-"),
            marker
        );
    }
    Ok(())
}
