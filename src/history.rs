//! The append-only log of titles that were already reported.
//!
//! One title per line. The file is read once when opened and is only ever
//! appended to afterwards.

use std::{
    fs::{File, OpenOptions},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use compact_str::CompactString;
use hashbrown::HashSet;

pub struct History {
    path: PathBuf,
    seen: HashSet<CompactString>,
    writer: BufWriter<File>,
    fresh: bool,
    /// The old log ends without a line break.
    unterminated: bool,
}

impl History {
    /// Loads every line of `path` and keeps the file open for appending.
    ///
    /// A log that cannot be read starts an empty history. A log that cannot
    /// be opened for writing is an error.
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref().to_owned();

        let (seen, fresh, unterminated) = match std::fs::read(&path) {
            Ok(bytes) => (
                parse(&String::from_utf8_lossy(&bytes)),
                false,
                bytes.last().is_some_and(|&b| b != b'\n'),
            ),
            Err(e) => {
                if e.kind() == io::ErrorKind::NotFound {
                    tracing::info!(target: "history", "no old results found in {}", path.display());
                } else {
                    tracing::info!(target: "history", "no old results readable from {}: {e}", path.display());
                }
                (HashSet::new(), true, false)
            }
        };
        tracing::debug!(target: "history", "{} titles already seen", seen.len());

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("cannot open {} for appending", path.display()))?;

        Ok(Self {
            path,
            seen,
            writer: BufWriter::new(file),
            fresh,
            unterminated,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the log was missing or unreadable at startup.
    pub const fn is_fresh(&self) -> bool {
        self.fresh
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    pub fn contains(&self, title: &str) -> bool {
        self.seen.contains(title)
    }

    /// `results` minus everything already seen, each title once, in the
    /// order it first shows up.
    pub fn novel<I>(&self, results: I) -> Vec<CompactString>
    where
        I: IntoIterator<Item = CompactString>,
    {
        let mut picked = HashSet::new();
        results
            .into_iter()
            .filter(|title| !self.seen.contains(title) && picked.insert(title.clone()))
            .collect()
    }

    /// Appends `titles` to the log and remembers them.
    pub fn record(&mut self, titles: &[CompactString]) -> anyhow::Result<()> {
        if titles.is_empty() {
            return Ok(());
        }

        if self.unterminated {
            self.writer
                .write_all(b"\n")
                .with_context(|| format!("cannot append to {}", self.path.display()))?;
            self.unterminated = false;
        }
        write_lines(&mut self.writer, titles)
            .with_context(|| format!("cannot append to {}", self.path.display()))?;

        self.seen.extend(titles.iter().cloned());
        Ok(())
    }

    pub fn close(mut self) -> anyhow::Result<()> {
        self.writer
            .flush()
            .with_context(|| format!("cannot flush {}", self.path.display()))
    }
}

fn write_lines(writer: &mut impl Write, titles: &[CompactString]) -> io::Result<()> {
    for title in titles {
        writeln!(writer, "{title}")?;
    }
    writer.flush()
}

fn parse(content: &str) -> HashSet<CompactString> {
    content
        .lines()
        .filter(|line| !line.is_empty())
        .map(CompactString::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(xs: &[&str]) -> Vec<CompactString> {
        xs.iter().copied().map(CompactString::from).collect()
    }

    #[test]
    fn missing_log_is_fresh_and_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("search_log.txt");

        let history = History::open(&path).unwrap();
        assert!(history.is_fresh());
        assert!(history.is_empty());
        assert!(path.exists());
    }

    #[test]
    fn existing_log_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("search_log.txt");
        std::fs::write(&path, "Ubuntu 22.04\n\nUbuntu 22.10\r\n").unwrap();

        let history = History::open(&path).unwrap();
        assert!(!history.is_fresh());
        assert_eq!(history.len(), 2);
        assert!(history.contains("Ubuntu 22.04"));
        assert!(history.contains("Ubuntu 22.10"));
        assert!(!history.contains(""));
    }

    #[test]
    fn novel_excludes_seen_and_repeats() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("search_log.txt");
        std::fs::write(&path, "b\n").unwrap();

        let history = History::open(&path).unwrap();
        let fresh = history.novel(titles(&["a", "b", "c", "a", "b"]));
        assert_eq!(fresh, ["a", "c"]);
        assert!(fresh.iter().all(|t| !history.contains(t)));
    }

    #[test]
    fn recorded_titles_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("search_log.txt");

        let mut history = History::open(&path).unwrap();
        history.record(&titles(&["x", "y"])).unwrap();
        assert!(history.contains("x"));
        history.close().unwrap();

        let history = History::open(&path).unwrap();
        assert!(history.contains("x"));
        assert!(history.contains("y"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "x\ny\n");
    }

    #[test]
    fn last_line_without_break_kept_apart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("search_log.txt");
        std::fs::write(&path, "Ubuntu 22.04").unwrap();

        let mut history = History::open(&path).unwrap();
        history.record(&titles(&["Ubuntu 22.10"])).unwrap();
        history.record(&titles(&["Ubuntu 23.04"])).unwrap();
        history.close().unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "Ubuntu 22.04\nUbuntu 22.10\nUbuntu 23.04\n"
        );
        let history = History::open(&path).unwrap();
        assert_eq!(history.len(), 3);
        assert!(history.contains("Ubuntu 22.04"));
        assert!(history.contains("Ubuntu 22.10"));
    }

    #[test]
    fn recording_nothing_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("search_log.txt");
        std::fs::write(&path, "a\n").unwrap();

        let mut history = History::open(&path).unwrap();
        history.record(&[]).unwrap();
        history.close().unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a\n");
    }

    #[test]
    fn unwritable_log_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(History::open(dir.path()).is_err());
    }
}
