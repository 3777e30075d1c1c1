use super::*;

fn button(feature: &str, index: usize) -> NavButton {
    NavButton {
        feature: feature.to_string(),
        index,
        tab: None,
        markup: format!("<li>{feature}{index}</li>"),
    }
}

fn order(navbar: &Navbar) -> Vec<String> {
    navbar
        .buttons()
        .iter()
        .map(|b| format!("{}{}", b.feature, b.index))
        .collect()
}

#[test]
fn arrival_order_does_not_matter() {
    let mut navbar = Navbar::new("B, A ,C", None);
    for (f, i) in [("A", 0), ("C", 0), ("B", 0), ("B", 1)] {
        assert!(matches!(navbar.place(button(f, i)), Placed::At(_)));
    }
    assert_eq!(order(&navbar), ["B0", "B1", "A0", "C0"]);

    let mut reversed = Navbar::new("B,A,C", None);
    for (f, i) in [("B", 1), ("C", 0), ("B", 0), ("A", 0)] {
        reversed.place(button(f, i));
    }
    assert_eq!(order(&reversed), order(&navbar));
}

#[test]
fn unknown_feature_is_skipped() {
    let mut navbar = Navbar::new("A", None);
    assert_eq!(navbar.place(button("Z", 0)), Placed::Unranked);
    assert!(navbar.buttons().is_empty());
    assert!(navbar.active().is_none());
}

#[test]
fn same_button_is_not_placed_twice() {
    let mut navbar = Navbar::new("A", None);
    assert_eq!(navbar.place(button("A", 0)), Placed::At(0));
    assert_eq!(navbar.place(button("A", 0)), Placed::Duplicate);
    assert_eq!(navbar.buttons().len(), 1);
    assert!(navbar.contains_feature("A"));
}

#[test]
fn first_button_becomes_active_without_home() {
    let mut navbar = Navbar::new("A,B", None);
    navbar.place(button("B", 0));
    navbar.place(button("A", 0));
    // Activation happens once; a later button in front does not steal it.
    assert_eq!(navbar.active().map(|b| b.feature.as_str()), Some("B"));
}

#[test]
fn home_button_is_activated_when_nothing_is_active() {
    let mut navbar = Navbar::new("A,B", Some("B"));
    navbar.place(button("B", 0));
    assert_eq!(navbar.active().map(|b| b.feature.as_str()), Some("B"));

    let mut by_tab = Navbar::new("A,B", Some("dashboard"));
    let mut dash = button("B", 0);
    dash.tab = Some("dashboard".to_string());
    by_tab.place(dash);
    assert_eq!(by_tab.active().map(|b| b.index), Some(0));
}

#[test]
fn active_button_survives_later_insertions() {
    let mut navbar = Navbar::new("A,B", None);
    navbar.place(button("B", 0));
    assert!(navbar.activate("B", 0));
    navbar.place(button("A", 0));
    assert_eq!(navbar.active(), Some(&navbar.buttons()[1]));
    assert!(!navbar.activate("C", 0));
}

#[test]
fn order_csv_is_trimmed_and_blank_entries_dropped() {
    let navbar = Navbar::new(" a , ,b,", Some("  "));
    assert_eq!(navbar.rank("a"), Some(0));
    assert_eq!(navbar.rank("b"), Some(1));
    assert_eq!(navbar.rank(""), None);
}

mod install {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use url::Url;

    use crate::discovery::{Discovery, DiscoveryCache};
    use crate::injector::{Document, Injector};
    use crate::loader::{InertScriptHost, Loader};
    use crate::navbar::{install_buttons, Navbar};
    use crate::plugins::PluginIterator;
    use crate::registry::Registry;
    use crate::transport::memory::MemoryTransport;

    const MAIN: &str = "http://svc/v1/html5/directory?path=%2Fmtwilson-core-html5%2Fnavbar%2Fmain.json";

    fn entry(feature: &str) -> serde_json::Value {
        serde_json::json!({
            "feature": feature,
            "directory": "/mtwilson-core-html5/navbar",
            "name": "main.json",
            "links": [{"rel": "download", "href": format!("/html5/features/{feature}/navbar/main.json")}]
        })
    }

    fn transport() -> MemoryTransport {
        let listing = serde_json::json!({
            "entries": [entry("alpha"), entry("beta"), entry("stray")],
            "faults": []
        });
        MemoryTransport::with_delay(Duration::from_millis(5))
            .respond(MAIN, listing.to_string())
            .respond(
                "http://svc/v1/html5/features/alpha/navbar/main.json",
                r#"{"items":[{"href":"/html5/features/alpha/a.html","tab":"alpha-home"}]}"#,
            )
            .respond(
                "http://svc/v1/html5/features/beta/navbar/main.json",
                r#"{"items":[{"href":"/html5/features/beta/b0.html"},{"href":"/html5/features/beta/b1.html"}]}"#,
            )
            .respond(
                "http://svc/v1/html5/features/stray/navbar/main.json",
                r#"{"items":[{"href":"/html5/features/stray/s.html"}]}"#,
            )
            .respond("http://svc/v1/html5/features/alpha/a.html", "<li>a</li>")
            .respond("http://svc/v1/html5/features/beta/b0.html", "<li>b0</li>")
            .respond("http://svc/v1/html5/features/beta/b1.html", "<li>b1</li>")
            .respond("http://svc/v1/html5/features/stray/s.html", "<li>s</li>")
    }

    #[tokio::test]
    async fn installs_discovered_buttons_in_configured_order() {
        let transport = Arc::new(transport());
        let loader = Loader::new(
            Arc::new(Registry::new()),
            transport.clone(),
            Arc::new(InertScriptHost),
            Url::parse("http://svc/").unwrap(),
            Duration::from_millis(20),
        );
        let discovery = Discovery::new("http://svc/v1", transport.clone(), Arc::new(DiscoveryCache::new()));
        let plugins = PluginIterator::new(discovery, loader.clone());
        let injector = Injector::new(loader, Arc::new(Document::new()));
        let navbar = Arc::new(Mutex::new(Navbar::new("beta,alpha", Some("alpha-home"))));

        let count = install_buttons(
            &plugins,
            &injector,
            navbar.clone(),
            "/mtwilson-core-html5/navbar/main.json",
        )
        .await
        .unwrap();

        assert_eq!(count, 3);
        let navbar = navbar.lock().unwrap();
        let markup: Vec<_> = navbar.buttons().iter().map(|b| b.markup.as_str()).collect();
        assert_eq!(markup, ["<li>b0</li>", "<li>b1</li>", "<li>a</li>"]);
        assert!(navbar.active().is_some());
        assert_eq!(transport.hits("http://svc/v1/html5/features/stray/s.html"), 0);
    }
}
