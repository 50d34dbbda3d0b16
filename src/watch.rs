use core::fmt;

use compact_str::CompactString;

use crate::{history::History, scrape::Search};

const BANNER: &str = "-----------------------------------------";

/// The titles a single term turned up that were never reported before.
#[derive(Debug)]
pub struct Report {
    pub term: String,
    pub fresh: Vec<CompactString>,
}

impl Report {
    pub fn label(&self) -> String {
        self.term.to_uppercase()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{BANNER}")?;
        writeln!(f, "New results for {}", self.label())?;
        writeln!(f, "{BANNER}")?;
        for title in &self.fresh {
            writeln!(f, "{title}")?;
        }
        if self.fresh.is_empty() {
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Searches every term in order, hands each report to `emit` and logs the
/// new titles.
///
/// Titles logged for one term count as seen for the terms after it. Only a
/// failure to write the log stops the loop.
pub async fn process<S, F>(
    searcher: &S,
    history: &mut History,
    terms: &[String],
    mut emit: F,
) -> anyhow::Result<usize>
where
    S: Search,
    F: FnMut(&Report),
{
    let mut total = 0;

    for term in terms {
        tracing::info!(target: "watch", "searching {term:?}");

        let results = searcher.search(term).await;
        let fetched = results.len();
        let fresh = history.novel(results);
        tracing::info!(target: "watch", "\x1b[36m{term:?}: {} new of {fetched}\x1b[0m", fresh.len());

        let report = Report {
            term: term.clone(),
            fresh,
        };
        emit(&report);

        history.record(&report.fresh)?;
        total += report.fresh.len();
    }

    Ok(total)
}
