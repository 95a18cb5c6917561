use crate::StorageError;
use rid_core::RecordTable;
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor, Lines};
use std::path::PathBuf;

/// Where the geofence reads its record tables from.
pub trait RecordSource {
    /// Whether the backing store is mounted at all.
    fn is_available(&self) -> bool;

    /// Opens a table for a single forward pass. Opening again starts from the first line.
    fn open(&self, table: RecordTable) -> Result<RecordReader<'_>, StorageError>;
}

/// Line iterator over one table.
pub struct RecordReader<'a> {
    table: RecordTable,
    lines: Lines<Box<dyn BufRead + 'a>>,
}

impl<'a> RecordReader<'a> {
    /// Wraps a reader, rejecting tables without a single byte.
    pub fn new(table: RecordTable, mut reader: Box<dyn BufRead + 'a>) -> Result<Self, StorageError> {
        let empty = reader
            .fill_buf()
            .map_err(|source| StorageError::Io { table, source })?
            .is_empty();
        if empty {
            return Err(StorageError::EmptyTable(table));
        }
        Ok(Self {
            table,
            lines: reader.lines(),
        })
    }

    pub fn table(&self) -> RecordTable {
        self.table
    }
}

impl Iterator for RecordReader<'_> {
    type Item = Result<String, StorageError>;

    fn next(&mut self) -> Option<Self::Item> {
        let table = self.table;
        self.lines
            .next()
            .map(|line| line.map_err(|source| StorageError::Io { table, source }))
    }
}

/// Tables stored as text files under one directory.
#[derive(Debug, Clone)]
pub struct DirectoryRecordSource {
    root: PathBuf,
}

impl DirectoryRecordSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn table_path(&self, table: RecordTable) -> PathBuf {
        self.root.join(table.file_name())
    }
}

impl RecordSource for DirectoryRecordSource {
    fn is_available(&self) -> bool {
        self.root.is_dir()
    }

    fn open(&self, table: RecordTable) -> Result<RecordReader<'_>, StorageError> {
        if !self.is_available() {
            return Err(StorageError::Unavailable);
        }
        let file = File::open(self.table_path(table)).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => StorageError::MissingTable(table),
            _ => StorageError::Io { table, source },
        })?;
        RecordReader::new(table, Box::new(BufReader::new(file)))
    }
}

/// Tables held in memory.
#[derive(Debug, Clone)]
pub struct MemoryRecordSource {
    available: bool,
    tables: HashMap<RecordTable, String>,
}

impl Default for MemoryRecordSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRecordSource {
    pub fn new() -> Self {
        Self {
            available: true,
            tables: HashMap::new(),
        }
    }

    /// A source whose store failed to mount.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            tables: HashMap::new(),
        }
    }

    pub fn with_table(mut self, table: RecordTable, content: impl Into<String>) -> Self {
        self.insert(table, content);
        self
    }

    pub fn with_lines<I, S>(self, table: RecordTable, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let content = lines
            .into_iter()
            .map(|line| line.as_ref().to_string())
            .collect::<Vec<_>>()
            .join("\n");
        self.with_table(table, content)
    }

    pub fn insert(&mut self, table: RecordTable, content: impl Into<String>) {
        self.tables.insert(table, content.into());
    }
}

impl RecordSource for MemoryRecordSource {
    fn is_available(&self) -> bool {
        self.available
    }

    fn open(&self, table: RecordTable) -> Result<RecordReader<'_>, StorageError> {
        if !self.available {
            return Err(StorageError::Unavailable);
        }
        let content = self
            .tables
            .get(&table)
            .ok_or(StorageError::MissingTable(table))?;
        RecordReader::new(table, Box::new(Cursor::new(content.as_bytes())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn collect(reader: RecordReader<'_>) -> Vec<String> {
        reader.map(|line| line.unwrap()).collect()
    }

    #[test]
    fn memory_source_reads_lines_and_rewinds() {
        let source = MemoryRecordSource::new().with_lines(RecordTable::Prisons, ["1.5,2.5", "3.5,4.5"]);
        let first = collect(source.open(RecordTable::Prisons).unwrap());
        let second = collect(source.open(RecordTable::Prisons).unwrap());
        assert_eq!(first, vec!["1.5,2.5", "3.5,4.5"]);
        assert_eq!(first, second);
    }

    #[test]
    fn memory_source_errors() {
        let source = MemoryRecordSource::new().with_table(RecordTable::Airports, "");
        assert!(matches!(
            source.open(RecordTable::Airports),
            Err(StorageError::EmptyTable(RecordTable::Airports))
        ));
        assert!(matches!(
            source.open(RecordTable::Countries),
            Err(StorageError::MissingTable(RecordTable::Countries))
        ));

        let source = MemoryRecordSource::unavailable();
        assert!(!source.is_available());
        assert!(matches!(source.open(RecordTable::Countries), Err(StorageError::Unavailable)));
    }

    #[test]
    fn directory_source_reads_table_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("world_airport_list.txt"), "0,40.0,-3.0\n2,41.0,-3.5\n").unwrap();
        fs::write(dir.path().join("world_prison_list.txt"), "").unwrap();

        let source = DirectoryRecordSource::new(dir.path());
        assert!(source.is_available());

        let reader = source.open(RecordTable::Airports).unwrap();
        assert_eq!(reader.table(), RecordTable::Airports);
        assert_eq!(collect(reader), vec!["0,40.0,-3.0", "2,41.0,-3.5"]);

        assert!(matches!(
            source.open(RecordTable::Prisons),
            Err(StorageError::EmptyTable(RecordTable::Prisons))
        ));
        assert!(matches!(
            source.open(RecordTable::Countries),
            Err(StorageError::MissingTable(RecordTable::Countries))
        ));
    }

    #[test]
    fn missing_directory_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let source = DirectoryRecordSource::new(dir.path().join("not-mounted"));
        assert!(!source.is_available());
        assert!(matches!(source.open(RecordTable::Airports), Err(StorageError::Unavailable)));
    }
}
