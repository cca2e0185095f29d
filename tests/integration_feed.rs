use std::fs;
use std::io::{BufReader, Cursor};
use std::time::Duration;

use indoc::indoc;

use focus_lens::feed::{FeedStats, open_source, run_feed, spawn_feed};
use focus_lens::{FocusContext, IdentityRecord};

const FEED: &str = indoc! {"
    # captured from a desktop session
    window_state_changed\torg.mozilla.firefox\tNavigator
    window_content_changed\torg.mozilla.firefox\tNavigator
    focus\torg.mozilla.firefox\tNavigator
    view_focused\torg.gnome.Terminal\tTerminal

    focus\torg.gnome.Terminal\tTerminal
    focus\ttoo\tmany\tfields
    focus\t-\t-
"};

#[test]
fn file_feed_drives_state_and_history() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("events.tsv");
    fs::write(&path, FEED).unwrap();

    let (ctx, ingestor) = FocusContext::new();
    let stats = run_feed(open_source(&path).unwrap(), &ingestor).unwrap();
    assert_eq!(
        stats,
        FeedStats {
            lines: 9,
            ingested: 4,
            skipped: 4,
            malformed: 1,
        }
    );
    assert_eq!(ctx.current(), IdentityRecord::unknown());
    assert_eq!(
        ctx.history_snapshot().to_vec(),
        vec![
            IdentityRecord::new("org.gnome.Terminal", "Terminal"),
            IdentityRecord::new("org.mozilla.firefox", "Navigator"),
        ]
    );
}

#[test]
fn spawned_feed_is_the_single_writer() {
    let (ctx, ingestor) = FocusContext::new();
    let state = ctx.subscribe_state();
    let reader = BufReader::new(Cursor::new("focus\tcom.a\tMain\n"));
    let handle = spawn_feed(reader, ingestor).unwrap();
    handle.join().unwrap();
    assert_eq!(state.latest(), Some(IdentityRecord::new("com.a", "Main")));
    // The ingestor went away with the thread; nothing else arrives.
    assert_eq!(state.recv_timeout(Duration::from_millis(20)), None);
}

#[test]
fn missing_feed_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(open_source(&dir.path().join("absent.tsv")).is_err());
}
