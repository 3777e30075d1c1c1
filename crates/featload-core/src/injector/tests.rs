use std::sync::{Arc, Mutex};
use std::time::Duration;

use url::Url;

use super::*;
use crate::loader::InertScriptHost;
use crate::registry::Registry;
use crate::transport::memory::MemoryTransport;

fn injector(transport: &Arc<MemoryTransport>, doc: &Arc<Document>) -> Injector {
    let loader = Loader::new(
        Arc::new(Registry::new()),
        transport.clone(),
        Arc::new(InertScriptHost),
        Url::parse("http://h/").unwrap(),
        Duration::from_millis(20),
    );
    Injector::new(loader, doc.clone())
}

#[tokio::test]
async fn replaces_whole_container() {
    let transport = Arc::new(MemoryTransport::new().respond("http://h/dash.html", "<p>dash</p>"));
    let doc = Arc::new(Document::with_containers(["main"]));
    let injector = injector(&transport, &doc);

    let placed = injector
        .inject("dash.html", Placement::container("main"), ())
        .await
        .unwrap();

    assert_eq!(placed.url, "http://h/dash.html");
    assert_eq!(doc.container_markup("main").as_deref(), Some("<p>dash</p>"));
    assert_eq!(transport.accepts()[0].1, "text/html");
}

#[tokio::test]
async fn tab_region_is_created_once_then_reused() {
    let transport = Arc::new(
        MemoryTransport::new()
            .respond("http://h/a.html", "A")
            .respond("http://h/b.html", "B"),
    );
    let doc = Arc::new(Document::with_containers(["tabs"]));
    let injector = injector(&transport, &doc);

    injector
        .inject("a.html", Placement::tabbed("tabs", "settings", false), ())
        .await
        .unwrap();
    injector
        .inject("b.html", Placement::tabbed("tabs", "settings", true), ())
        .await
        .unwrap();

    assert_eq!(doc.regions("tabs"), vec!["settings".to_string()]);
    assert_eq!(doc.region_markup("tabs", "settings").as_deref(), Some("B"));
    assert_eq!(doc.active_region("tabs").as_deref(), Some("settings"));
}

#[tokio::test]
async fn same_url_fetched_once_placed_twice() {
    let transport = Arc::new(MemoryTransport::new().respond("http://h/nav.html", "<nav/>"));
    let doc = Arc::new(Document::with_containers(["left", "right"]));
    let injector = injector(&transport, &doc);

    injector
        .inject("nav.html", Placement::container("left"), ())
        .await
        .unwrap();
    injector
        .inject("/nav.html", Placement::container("right"), ())
        .await
        .unwrap();

    assert_eq!(transport.hits("http://h/nav.html"), 1);
    assert_eq!(doc.container_markup("left").as_deref(), Some("<nav/>"));
    assert_eq!(doc.container_markup("right").as_deref(), Some("<nav/>"));
}

#[tokio::test]
async fn callback_receives_markup_and_args() {
    let transport = Arc::new(MemoryTransport::new().respond("http://h/x.html", "<x/>"));
    let doc = Arc::new(Document::new());
    let injector = injector(&transport, &doc);
    let seen = Arc::new(Mutex::new(None));
    let sink = seen.clone();

    injector
        .inject(
            "x.html",
            Placement::callback(move |m: InjectedMarkup, n: u8| *sink.lock().unwrap() = Some((m, n))),
            7,
        )
        .await
        .unwrap();

    let (markup, n) = seen.lock().unwrap().clone().unwrap();
    assert_eq!(markup.content, "<x/>");
    assert_eq!(n, 7);
}

#[tokio::test]
async fn missing_container_still_runs_callback() {
    let transport = Arc::new(MemoryTransport::new().respond("http://h/x.html", "<x/>"));
    let doc = Arc::new(Document::new());
    let injector = injector(&transport, &doc);
    let fired = Arc::new(Mutex::new(false));
    let sink = fired.clone();

    injector
        .inject(
            "x.html",
            Placement::container("absent").with_callback(move |_, ()| *sink.lock().unwrap() = true),
            (),
        )
        .await
        .unwrap();

    assert!(*fired.lock().unwrap());
    assert!(!doc.has_container("absent"));
}

#[tokio::test]
async fn fetch_failure_is_reported() {
    let transport = Arc::new(MemoryTransport::new().fail("http://h/x.html", 500));
    let doc = Arc::new(Document::with_containers(["main"]));
    let injector = injector(&transport, &doc);

    let err = injector
        .inject("x.html", Placement::container("main"), ())
        .await
        .unwrap_err();

    assert!(matches!(err, LoadError::Failed(ref f) if f[0].0 == "http://h/x.html"));
    assert_eq!(doc.container_markup("main").as_deref(), Some(""));
}
