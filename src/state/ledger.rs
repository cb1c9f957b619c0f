use serde::Deserialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// How the dedup ledger is populated when a crawl starts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LedgerSeed {
    /// Start with no known queries; every query is processed again on rerun
    #[default]
    Empty,

    /// Treat every term already present in the output file as processed
    OutputFile,
}

/// Set of query names already processed
///
/// The ledger only grows. Its size bounds the number of detail pages fetched
/// during a run.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    seen: HashSet<String>,
}

impl Ledger {
    /// Creates an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a ledger according to the seed strategy
    ///
    /// With [`LedgerSeed::OutputFile`] a missing output file is not an error
    /// and yields an empty ledger.
    pub fn seeded(seed: LedgerSeed, output: &Path) -> io::Result<Self> {
        match seed {
            LedgerSeed::Empty => Ok(Self::new()),
            LedgerSeed::OutputFile => match File::open(output) {
                Ok(file) => Self::from_output(BufReader::new(file)),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::new()),
                Err(e) => Err(e),
            },
        }
    }

    /// Reads the terms of existing `term,title` lines
    ///
    /// The term is everything before the first comma. Terms that contain a
    /// comma themselves (written with comma stripping disabled) cannot be
    /// recovered exactly.
    pub fn from_output<R: BufRead>(reader: R) -> io::Result<Self> {
        let mut ledger = Self::new();

        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let term = line.split_once(',').map_or(line.as_str(), |(term, _)| term);
            ledger.add(term);
        }

        Ok(ledger)
    }

    /// Returns true if the query name was already processed
    pub fn contains(&self, name: &str) -> bool {
        self.seen.contains(name)
    }

    /// Marks a query name as processed
    pub fn add(&mut self, name: &str) {
        if !self.seen.contains(name) {
            self.seen.insert(name.to_string());
        }
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
