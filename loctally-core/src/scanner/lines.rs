use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{LocError, Result};
use crate::report::LineStats;

/// Prefixes that mark a trimmed line as comment-like
pub const COMMENT_PREFIXES: &[&str] = &["//", "#", "--", "rem "];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    Comment,
    Plain,
}

/// Whitespace plus the byte-order mark that starts many UTF-8 files
fn is_trimmable(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

pub fn classify_line(line: &str) -> LineKind {
    let trimmed = line.trim_matches(is_trimmable);
    if trimmed.is_empty() {
        LineKind::Blank
    } else if COMMENT_PREFIXES
        .iter()
        .any(|prefix| trimmed.starts_with(prefix))
    {
        LineKind::Comment
    } else {
        LineKind::Plain
    }
}

/// Stream a file and count its lines by kind
pub fn count_lines(path: &Path) -> Result<LineStats> {
    let file = File::open(path).map_err(|e| LocError::io(path, e))?;
    count_reader(BufReader::new(file)).map_err(|e| LocError::io(path, e))
}

/// Count lines from any buffered reader. A line ends at `\n`, `\r\n` or a
/// lone `\r`. Invalid UTF-8 is replaced rather than rejected.
pub fn count_reader<R: BufRead>(mut reader: R) -> std::io::Result<LineStats> {
    let mut stats = LineStats::default();
    let mut line = Vec::with_capacity(256);
    let mut after_cr = false;

    loop {
        let chunk = reader.fill_buf()?;
        if chunk.is_empty() {
            break;
        }
        let len = chunk.len();

        for &byte in chunk {
            match byte {
                b'\n' if after_cr => after_cr = false,
                b'\n' | b'\r' => {
                    tally(&mut stats, &line);
                    line.clear();
                    after_cr = byte == b'\r';
                }
                _ => {
                    line.push(byte);
                    after_cr = false;
                }
            }
        }
        reader.consume(len);
    }

    if !line.is_empty() {
        tally(&mut stats, &line);
    }

    Ok(stats)
}

fn tally(stats: &mut LineStats, line: &[u8]) {
    stats.total += 1;
    match classify_line(&String::from_utf8_lossy(line)) {
        LineKind::Blank => stats.blank += 1,
        LineKind::Comment => stats.comment += 1,
        LineKind::Plain => {}
    }
}
