/// Batch pipeline: load → reconcile → classify → export.
///
/// One call to [`run`] is one independent, idempotent run. Nothing is kept
/// between runs except the files written to the output directory.

use crate::config::{BoundarySource, Config};
use crate::export::{self, ExportError};
use crate::ingest::{boundaries, rainfall, LoadError};
use crate::logging::{self, Stage};
use crate::model::{BoundaryFeature, FatalInputError, RainfallRecord};
use crate::reconcile::{Reconciler, Reconciliation};
use std::fmt;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum PipelineError {
    Load(LoadError),
    Fatal(FatalInputError),
    Export(ExportError),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Load(e) => write!(f, "{}", e),
            PipelineError::Fatal(e) => write!(f, "{}", e),
            PipelineError::Export(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::Load(e) => Some(e),
            PipelineError::Fatal(e) => Some(e),
            PipelineError::Export(e) => Some(e),
        }
    }
}

impl From<LoadError> for PipelineError {
    fn from(e: LoadError) -> Self {
        PipelineError::Load(e)
    }
}

impl From<FatalInputError> for PipelineError {
    fn from(e: FatalInputError) -> Self {
        PipelineError::Fatal(e)
    }
}

impl From<ExportError> for PipelineError {
    fn from(e: ExportError) -> Self {
        PipelineError::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

fn load_source(source: &BoundarySource) -> Result<Vec<BoundaryFeature>, LoadError> {
    match boundaries::load_boundaries(&source.path, &source.state, source.name_property.as_deref()) {
        Err(LoadError::Io { path, source: io }) if source.optional && io.kind() == std::io::ErrorKind::NotFound => {
            logging::warn(
                Stage::Boundary,
                None,
                &format!("{} not found; {} will not be displayed", path, source.state),
            );
            Ok(Vec::new())
        }
        other => other,
    }
}

/// Loads every configured boundary source, in config order. Ids are unique
/// across all sources, not just within each file.
pub fn load_boundaries(config: &Config) -> Result<Vec<BoundaryFeature>, LoadError> {
    let mut features = Vec::new();
    for source in &config.boundaries {
        features.extend(load_source(source)?);
    }
    boundaries::ensure_unique_ids(&mut features);
    Ok(features)
}

pub fn load_rainfall(config: &Config) -> Result<Vec<RainfallRecord>, LoadError> {
    rainfall::load_rainfall(&config.rainfall.path, config.month)
}

// ---------------------------------------------------------------------------
// Run
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct PipelineOutput {
    pub reconciliation: Reconciliation,
    /// Paths of the files written.
    pub written: Vec<String>,
}

/// Reconciles already-loaded inputs under `config`. No I/O.
pub fn reconcile(
    config: &Config,
    features: &[BoundaryFeature],
    records: &[RainfallRecord],
) -> Result<Reconciliation, FatalInputError> {
    let aliases = config.alias_table();
    logging::debug(
        Stage::Reconcile,
        None,
        &format!("Alias table has {} entries", aliases.len()),
    );

    let reconciliation = Reconciler::new(&aliases, &config.states).reconcile(features, records, config.month)?;

    let matched = reconciliation.districts.iter().filter(|d| d.has_data()).count();
    logging::log_reconcile_summary(matched, reconciliation.districts.len(), &reconciliation.diagnostics);
    for (category, count) in reconciliation.category_counts() {
        logging::debug(Stage::Classify, None, &format!("{}: {} districts", category, count));
    }

    Ok(reconciliation)
}

/// Full run: load inputs, reconcile, write outputs.
pub fn run(config: &Config) -> Result<PipelineOutput, PipelineError> {
    logging::info(
        Stage::System,
        None,
        &format!("Rainfall map for {} {} ({})", config.month.name(), config.month.year, config.states.join(", ")),
    );

    let records = load_rainfall(config)?;
    let features = load_boundaries(config)?;

    let reconciliation = reconcile(config, &features, &records)?;
    let written = export::write_outputs(&reconciliation, &config.output.dir, config.output.geojson)?;

    Ok(PipelineOutput {
        reconciliation,
        written,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
