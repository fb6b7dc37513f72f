use std::path::PathBuf;

use dsg_crossover::Crossover;
use dsg_model::{DataLocation, Diagnostic, SeverityCounts};
use dsg_validate::CheckStatus;

#[derive(Debug)]
pub struct StandardizeResult {
    pub dataset_id: String,
    pub samples: usize,
    pub columns: Vec<ColumnSummary>,
    pub counts: SeverityCounts,
    pub status: CheckStatus,
    pub diagnostics: Vec<Diagnostic>,
    pub output: Option<PathBuf>,
}

#[derive(Debug)]
pub struct ColumnSummary {
    pub header: String,
    pub data_type: String,
    pub unit: String,
    pub ignored: bool,
}

#[derive(Debug)]
pub struct InspectResult {
    pub path: PathBuf,
    pub dimensions: Vec<(String, usize)>,
    pub metadata: Vec<(String, String, String)>,
    pub samples: usize,
    pub not_found: Vec<String>,
}

#[derive(Debug)]
pub struct CrossoverResult {
    pub dataset_id: String,
    pub checked: usize,
    pub crossovers: Vec<Crossover>,
}

#[derive(Debug)]
pub struct FlagResult {
    pub flag_name: String,
    pub flag: char,
    pub requested: usize,
    pub unmatched: Vec<DataLocation>,
}
