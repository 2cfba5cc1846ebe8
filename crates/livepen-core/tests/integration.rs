//! Integration tests for the edit -> debounce -> preview pipeline and persistence

// Tests are allowed to use expect/unwrap for cleaner error messages
#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]

use chrono::{TimeDelta, TimeZone, Utc};
use livepen_core::preview::{self, SCRIPT_ERROR_CLASS};
use livepen_core::prelude::*;
use livepen_core::share;

/// Surface that remembers every document written into it
#[derive(Default)]
struct FrameLog {
    documents: Vec<String>,
}

impl FrameLog {
    fn current(&self) -> &str {
        self.documents.last().map_or("", String::as_str)
    }
}

impl PreviewSurface for FrameLog {
    fn replace_and_write(&mut self, document: &str) -> std::result::Result<(), SurfaceError> {
        self.documents.push(document.to_string());
        Ok(())
    }
}

#[test]
fn debounced_render_reflects_last_edit_of_every_fragment() {
    let mut playground: Playground = Playground::default();
    let mut frame = FrameLog::default();

    let mut tickets = Vec::new();
    for i in 0..5 {
        tickets.push(playground.edit(FragmentKind::Markup, format!("<p>draft {i}</p>")));
        tickets.push(playground.edit(FragmentKind::Style, format!("p {{ order: {i}; }}")));
        tickets.push(playground.edit(FragmentKind::Script, format!("var step = {i};")));
    }

    // Every timer fires, in order; only the newest renders
    let last = tickets.pop().expect("at least one edit");
    for stale in tickets {
        assert_eq!(playground.debounce_elapsed(stale, &mut frame).unwrap(), None);
    }
    assert!(frame.documents.is_empty());

    assert_eq!(
        playground.debounce_elapsed(last, &mut frame).unwrap(),
        Some(RenderOutcome::Rendered)
    );
    assert_eq!(frame.documents.len(), 1);

    let doc = frame.current();
    assert!(doc.contains("<p>draft 4</p>"));
    assert!(doc.contains("p { order: 4; }"));
    assert!(doc.contains("var step = 4;"));
    assert!(!doc.contains("draft 3"));
    assert_eq!(playground.last_rendered(), Some(&playground.bundle()));
}

mod edit_sequences {
    use super::*;
    use proptest::prelude::*;

    fn edits() -> impl Strategy<Value = (Vec<(FragmentKind, String)>, Vec<usize>)> {
        let kind = prop::sample::select(FragmentKind::ALL.to_vec());
        prop::collection::vec((kind, "\\PC{0,40}"), 1..30).prop_flat_map(|edits| {
            let order = Just((0..edits.len()).collect::<Vec<_>>()).prop_shuffle();
            (Just(edits), order)
        })
    }

    proptest! {
        #[test]
        fn single_render_matches_final_sources((edits, firing_order) in edits()) {
            let mut playground: Playground = Playground::default();
            let mut frame = FrameLog::default();

            let tickets: Vec<Ticket> = edits
                .iter()
                .map(|(kind, text)| playground.edit(*kind, text.clone()))
                .collect();

            // Timers may wake in any order; only the newest one renders
            for index in firing_order {
                playground.debounce_elapsed(tickets[index], &mut frame).unwrap();
            }

            prop_assert_eq!(frame.documents.len(), 1);
            let bundle = playground.bundle();
            let expected = preview::assemble_document(&bundle);
            prop_assert_eq!(frame.current(), expected.as_str());
            prop_assert_eq!(playground.last_rendered(), Some(&bundle));
            prop_assert!(!playground.scheduler().is_pending());

            for kind in FragmentKind::ALL {
                if let Some((_, text)) = edits.iter().rev().find(|(k, _)| *k == kind) {
                    prop_assert_eq!(playground.fragment(kind), text.as_str());
                }
            }
        }
    }
}

#[test]
fn throwing_script_leaves_markup_and_style_in_place() {
    let mut playground: Playground = Playground::default();
    let mut frame = FrameLog::default();

    playground.load(
        SourceBundle::new(
            "<h1>Still here</h1>",
            "h1 { color: teal; }",
            "throw new Error('kaboom');",
        ),
        &mut frame,
    )
    .unwrap();

    let doc = frame.current();
    let markup = doc.find("<h1>Still here</h1>").unwrap();
    let throw_at = doc.find("throw new Error('kaboom');").unwrap();
    let guard = doc[..throw_at].rfind("try {").unwrap();

    assert!(markup < guard, "markup is parsed before the script runs");
    assert!(doc[throw_at..].contains("catch (error)"));
    assert!(doc.contains("h1 { color: teal; }"));
    assert!(doc.contains(SCRIPT_ERROR_CLASS));
}

#[test]
fn every_render_replaces_the_whole_document() {
    let mut playground: Playground = Playground::default();
    let mut frame = FrameLog::default();

    playground.edit(FragmentKind::Markup, "<p>one</p>");
    playground.run(&mut frame).unwrap();
    playground.edit(FragmentKind::Markup, "<p>two</p>");
    playground.run(&mut frame).unwrap();

    assert_eq!(frame.documents.len(), 2);
    assert!(frame.documents[1].starts_with("<!DOCTYPE html>"));
    assert!(!frame.documents[1].contains("<p>one</p>"));
    assert_eq!(
        frame.documents[1],
        preview::assemble_document(&playground.bundle())
    );
}

#[test]
fn snippets_survive_a_restart_of_the_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let saved_at = Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap();

    {
        let library = SnippetLibrary::new(FileStore::new(dir.path()));
        library
            .save("A", SourceBundle::new("<p>1</p>", "", ""), saved_at, OnConflict::Reject)
            .unwrap();

        // Declined overwrite keeps the original
        assert!(matches!(
            library.save("A", SourceBundle::new("<p>2</p>", "", ""), saved_at, OnConflict::Reject),
            Err(Error::SnippetExists(_))
        ));

        // Confirmed overwrite replaces it
        library
            .save("A", SourceBundle::new("<p>3</p>", "", ""), saved_at, OnConflict::Overwrite)
            .unwrap();
    }

    let reopened = SnippetLibrary::new(FileStore::new(dir.path()));
    let snippets = reopened.list().unwrap();
    assert_eq!(snippets.len(), 1);
    assert_eq!(snippets[0].name, "A");
    assert_eq!(snippets[0].sources.html, "<p>3</p>");
}

#[test]
fn auto_save_restore_window_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let saver = AutoSaver::new(FileStore::new(dir.path()));
    let saved = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();

    saver
        .save(SourceBundle::new("<p>wip</p>", "", ""), saved)
        .unwrap();

    let fresh = saver.restore_candidate(saved + TimeDelta::hours(2));
    assert_eq!(fresh.map(|r| r.sources.html), Some("<p>wip</p>".to_string()));

    assert!(saver.restore_candidate(saved + TimeDelta::hours(25)).is_none());
}

#[test]
fn shared_link_loads_into_a_new_playground() {
    let original = SourceBundle::new(
        "<button onclick=\"go()\">Go</button>",
        "button { padding: 1em; }",
        "function go() { alert(\"it's </script> time\"); }",
    );
    let link = share::share_link(share::DEFAULT_SHARE_BASE, &original).unwrap();

    let token = share::token_from_input(&link).expect("link carries a token");
    let decoded = share::decode(&token).unwrap();

    let mut playground: Playground = Playground::default();
    let mut frame = FrameLog::default();
    playground.load(decoded, &mut frame).unwrap();

    assert_eq!(playground.bundle(), original);
    assert!(frame.current().contains(r"it's <\/script> time"));
}
