use std::fmt;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::ops::Index;
use std::path::Path;

use tracing::debug;

use crate::config::{IdKind, IdMapConfig};
use crate::error::RecordError;
use crate::interval::Interval;
use crate::interval_set::IntervalSet;
use crate::{Error, Result};

/// Map from user or group names to the subordinate ids delegated to them, in
/// the layout of `/etc/subuid` and `/etc/subgid`. Names keep the order in
/// which they were first seen.
#[must_use]
#[derive(Debug, Default, Eq, PartialEq, Clone)]
pub struct IdMap {
    entries: Vec<(String, IntervalSet)>,
}

impl IdMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the file configured for `kind`.
    pub fn open(kind: IdKind, config: &IdMapConfig) -> Result<Self> {
        let mut map = Self::new();
        map.read(config.path(kind))?;
        Ok(map)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Adds `name` with an empty set of ids. Existing names are left alone.
    pub fn append(&mut self, name: &str) -> Result<()> {
        self.entry(name).map(|_| ())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&IntervalSet> {
        self.position(name).map(|i| &self.entries[i].1)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut IntervalSet> {
        self.position(name).map(|i| &mut self.entries[i].1)
    }

    /// Removes `name` and returns its ids.
    pub fn remove(&mut self, name: &str) -> Result<IntervalSet> {
        let i = self.position(name).ok_or_else(|| Error::KeyNotFound(name.to_owned()))?;
        Ok(self.entries.remove(i).1)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &IntervalSet)> {
        self.entries.iter().map(|(name, s)| (name.as_str(), s))
    }

    /// Names whose ranges include `subid`.
    #[must_use]
    pub fn who_has(&self, subid: i64) -> Vec<&str> {
        self.iter().filter(|(_, s)| s.contains(subid)).map(|(name, _)| name).collect()
    }

    pub fn read(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let records = self.read_lines(BufReader::new(file), &path.display().to_string())?;
        debug!(path = %path.display(), records, names = self.len(), "read subordinate id file");
        Ok(())
    }

    /// Parses `name:first:count` records from `reader` and appends each range
    /// to its name. `file_name` only labels errors. Returns the number of
    /// records read.
    pub fn read_lines(&mut self, reader: impl BufRead, file_name: &str) -> Result<usize> {
        let mut records = 0;
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let malformed = |reason: RecordError| Error::MalformedRecord {
                file: file_name.to_owned(),
                line: i + 1,
                reason,
            };

            let fields: Vec<&str> = line.split(':').collect();
            let &[name, first, count] = fields.as_slice() else {
                return Err(malformed(RecordError::IncorrectFieldCount));
            };
            let (Ok(first), Ok(count)) =
                (first.trim().parse::<i64>(), count.trim().parse::<i64>())
            else {
                return Err(malformed(RecordError::BadIdRange));
            };

            let r = Interval::new(first, count)?;
            self.entry(name)?.push(r);
            records += 1;
        }
        Ok(records)
    }

    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.write_string())?;
        debug!(path = %path.display(), names = self.len(), "wrote subordinate id file");
        Ok(())
    }

    /// Serializes every range as a `name:first:count` line, in map order then
    /// set order. There is no trailing newline.
    #[must_use]
    pub fn write_string(&self) -> String {
        self.to_string()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(n, _)| n == name)
    }

    fn entry(&mut self, name: &str) -> Result<&mut IntervalSet> {
        if name.is_empty() {
            return Err(Error::invalid("name cannot be empty"));
        }
        let i = match self.position(name) {
            Some(i) => i,
            None => {
                self.entries.push((name.to_owned(), IntervalSet::new()));
                self.entries.len() - 1
            }
        };
        Ok(&mut self.entries[i].1)
    }
}

impl fmt::Display for IdMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sep = "";
        for (name, s) in self.iter() {
            for r in s {
                write!(f, "{sep}{name}:{}:{}", r.first(), r.count())?;
                sep = "\n";
            }
        }
        Ok(())
    }
}

impl Index<&str> for IdMap {
    type Output = IntervalSet;

    fn index(&self, name: &str) -> &Self::Output {
        match self.get(name) {
            Some(s) => s,
            None => panic!("unknown name: {name}"),
        }
    }
}
