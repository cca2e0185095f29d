//! Line-oriented host event source.
//!
//! An external producer writes one event per line:
//!
//! ```text
//! <kind>\t<app id>\t<window id>
//! ```
//!
//! Trailing fields may be omitted; empty fields and `-` mean "not reported".
//! Blank lines and lines starting with `#` are skipped.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::thread::{self, JoinHandle};

use thiserror::Error;

use crate::ingest::{EventIngestor, HostEvent, HostEventKind};

const MAX_FIELDS: usize = 3;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("line {line}: expected at most 3 tab-separated fields, found {found}")]
    Malformed { line: usize, found: usize },
    #[error("line {line}: not valid UTF-8")]
    Encoding { line: usize },
    #[error("failed to read event feed: {0}")]
    Io(#[from] io::Error),
}

/// Counters reported when a feed runs to completion.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FeedStats {
    pub lines: usize,
    pub ingested: usize,
    pub skipped: usize,
    pub malformed: usize,
}

fn optional_field(value: Option<&str>) -> Option<String> {
    match value.map(str::trim) {
        None | Some("") | Some("-") => None,
        Some(v) => Some(v.to_string()),
    }
}

/// Parse a single feed line. `line_no` is 1-based and only used for errors.
pub fn parse_line(line: &str, line_no: usize) -> Result<Option<HostEvent>, FeedError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() > MAX_FIELDS {
        return Err(FeedError::Malformed {
            line: line_no,
            found: fields.len(),
        });
    }
    let mut fields = fields.into_iter();
    let kind = HostEventKind::parse(fields.next().unwrap_or_default());
    Ok(Some(HostEvent {
        kind,
        app_id: optional_field(fields.next()),
        window_id: optional_field(fields.next()),
    }))
}

/// Read events until EOF and hand each one to the ingestor.
///
/// Malformed lines, including ones that are not valid UTF-8, are logged and
/// skipped. A read error ends the feed.
pub fn run_feed<R: BufRead>(
    mut reader: R,
    ingestor: &EventIngestor,
) -> Result<FeedStats, FeedError> {
    let mut stats = FeedStats::default();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        stats.lines += 1;
        let parsed = match std::str::from_utf8(&buf) {
            Ok(line) => parse_line(line, stats.lines),
            Err(_) => Err(FeedError::Encoding { line: stats.lines }),
        };
        match parsed {
            Ok(Some(event)) => {
                if ingestor.handle(&event).is_some() {
                    stats.ingested += 1;
                } else {
                    stats.skipped += 1;
                }
            }
            Ok(None) => stats.skipped += 1,
            Err(err) => {
                tracing::warn!(
                    line = %String::from_utf8_lossy(&buf).trim_end(),
                    "{err}"
                );
                stats.malformed += 1;
            }
        }
    }
    Ok(stats)
}

/// Run the feed on its own thread. The thread owns the ingestor, which makes
/// it the only writer of the focus state.
pub fn spawn_feed<R>(reader: R, ingestor: EventIngestor) -> io::Result<JoinHandle<()>>
where
    R: BufRead + Send + 'static,
{
    thread::Builder::new()
        .name("focus-feed".to_string())
        .spawn(move || match run_feed(reader, &ingestor) {
            Ok(stats) => tracing::info!(
                lines = stats.lines,
                ingested = stats.ingested,
                malformed = stats.malformed,
                "event feed closed"
            ),
            Err(err) => tracing::warn!("event feed stopped: {err}"),
        })
}

/// Open the feed named on the command line; `-` is stdin.
pub fn open_source(path: &Path) -> io::Result<Box<dyn BufRead + Send>> {
    if path.as_os_str() == "-" {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }
    let file = File::open(path)?;
    Ok(Box::new(BufReader::new(file)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::FocusContext;
    use crate::identity::IdentityRecord;

    #[test]
    fn parses_full_line() {
        let event = parse_line("window_state_changed\tcom.a\tActA", 1)
            .unwrap()
            .unwrap();
        assert_eq!(event, HostEvent::focus("com.a", "ActA"));
    }

    #[test]
    fn missing_and_dash_fields_are_absent() {
        let event = parse_line("focus\t-", 1).unwrap().unwrap();
        assert_eq!(event.kind, HostEventKind::WindowStateChanged);
        assert_eq!(event.app_id, None);
        assert_eq!(event.window_id, None);

        let event = parse_line("focus\t\tActA\r\n", 1).unwrap().unwrap();
        assert_eq!(event.app_id, None);
        assert_eq!(event.window_id.as_deref(), Some("ActA"));
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        assert!(parse_line("", 1).unwrap().is_none());
        assert!(parse_line("   ", 2).unwrap().is_none());
        assert!(parse_line("# producer v1", 3).unwrap().is_none());
    }

    #[test]
    fn too_many_fields_is_malformed() {
        let err = parse_line("focus\ta\tb\tc", 7).unwrap_err();
        assert!(matches!(err, FeedError::Malformed { line: 7, found: 4 }));
    }

    #[test]
    fn run_feed_counts_lines() {
        let (ctx, ingestor) = FocusContext::new();
        let input = "focus\tcom.a\tActA\nview_focused\tcom.a\tButton\nbad\t1\t2\t3\n\nfocus\tcom.b\tActB\n";
        let stats = run_feed(input.as_bytes(), &ingestor).unwrap();
        assert_eq!(
            stats,
            FeedStats {
                lines: 5,
                ingested: 2,
                skipped: 2,
                malformed: 1,
            }
        );
        assert_eq!(ctx.current(), IdentityRecord::new("com.b", "ActB"));
    }

    #[test]
    fn invalid_utf8_line_does_not_stop_the_feed() {
        let (ctx, ingestor) = FocusContext::new();
        let mut input = b"focus\tcom.a\tActA\n".to_vec();
        input.extend_from_slice(b"focus\tcom.bad\tWin\xff\n");
        input.extend_from_slice(b"focus\tcom.c\tActC\n");
        let stats = run_feed(input.as_slice(), &ingestor).unwrap();
        assert_eq!(stats.lines, 3);
        assert_eq!(stats.ingested, 2);
        assert_eq!(stats.malformed, 1);
        assert_eq!(ctx.current(), IdentityRecord::new("com.c", "ActC"));
        let recent: Vec<_> = ctx
            .history_snapshot()
            .iter()
            .map(|r| r.window_id().to_string())
            .collect();
        assert_eq!(recent, vec!["ActC", "ActA"]);
    }

    #[test]
    fn last_line_without_newline_is_read() {
        let (ctx, ingestor) = FocusContext::new();
        let stats = run_feed("focus\tcom.a\tActA".as_bytes(), &ingestor).unwrap();
        assert_eq!(stats.ingested, 1);
        assert_eq!(ctx.current(), IdentityRecord::new("com.a", "ActA"));
    }
}
