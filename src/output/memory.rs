use crate::output::record::shape_record;
use crate::output::traits::{OutputResult, ResultSink};
use crate::state::SeedReport;
use crate::storage::SeedRecord;

/// Keeps shaped records in memory, in the order they were emitted
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Vec<SeedRecord>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[SeedRecord] {
        &self.records
    }

    /// Latest record emitted for `row`
    pub fn get(&self, row: usize) -> Option<&SeedRecord> {
        self.records.iter().rev().find(|r| r.row_index == row)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl ResultSink for MemorySink {
    fn emit(&mut self, report: &SeedReport) -> OutputResult<()> {
        self.records.push(shape_record(report));
        Ok(())
    }
}
