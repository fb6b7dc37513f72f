use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use dsg_crossover::{CrossoverLimits, CrossoverSeries, find_crossover};
use dsg_file::{DsgFile, FlagUpdate};
use dsg_ingest::load_submission;
use dsg_standards::{TypeRegistry, load_builtin_registries};
use dsg_cli::listing::{type_rows, types_table};
use dsg_cli::locations::read_locations;
use dsg_cli::logging::redact_value;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, info_span, trace, warn};

use crate::cli::{
    CrossoverArgs, InspectArgs, RegistryArg, StandardizeArgs, TypesArgs, UpdateFlagsArgs,
};
use crate::types::{
    ColumnSummary, CrossoverResult, FlagResult, InspectResult, StandardizeResult,
};

pub fn run_types(args: &TypesArgs) -> Result<()> {
    let registries = load_builtin_registries().context("load data types")?;
    let registry: &TypeRegistry = match args.registry {
        RegistryArg::User => &registries.user,
        RegistryArg::Metadata => &registries.metadata,
        RegistryArg::Data => &registries.data,
    };
    println!("{}", types_table(&type_rows(registry)));
    Ok(())
}

pub fn run_standardize(args: &StandardizeArgs) -> Result<StandardizeResult> {
    let submission = load_submission(&args.manifest)
        .with_context(|| format!("load submission {}", args.manifest.display()))?;
    let dataset_hint = submission.manifest.dataset.expocode.clone().unwrap_or_default();
    let span = info_span!("standardize", dataset = %dataset_hint);
    let _guard = span.enter();

    let checked = dsg_validate::standardize(
        &submission.table.rows,
        &submission.assignments,
        &submission.registries,
        &submission.manifest.options(),
    )
    .context("standardize data")?;
    for diagnostic in checked.diagnostics() {
        trace!(
            severity = %diagnostic.severity,
            row = diagnostic.row,
            detail = redact_value(&diagnostic.detailed),
            "{}",
            diagnostic.general
        );
    }
    let metadata = submission
        .metadata(&checked.data)
        .context("derive dataset metadata")?;
    let dataset_id = metadata.dataset_id().unwrap_or_default().to_string();

    if let Some(path) = &args.diagnostics {
        let file = File::create(path)
            .with_context(|| format!("create diagnostics file {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), checked.diagnostics())
            .with_context(|| format!("write diagnostics file {}", path.display()))?;
        debug!(path = %path.display(), "wrote diagnostics");
    }

    let output = if args.dry_run {
        info!("dry run; no DSG file written");
        None
    } else {
        let path = output_path(args, &submission.manifest.base_dir, &dataset_id)?;
        DsgFile::new(&path)
            .create_from_user_data(&metadata, &checked.data, &submission.registries.data)
            .with_context(|| format!("write DSG file {}", path.display()))?;
        Some(path)
    };

    let columns = submission
        .assignments
        .iter()
        .map(|assignment| ColumnSummary {
            header: assignment.header.clone(),
            data_type: assignment.data_type.var_name().to_string(),
            unit: if assignment.unit.is_empty() {
                assignment.data_type.canonical_unit().to_string()
            } else {
                assignment.unit.clone()
            },
            ignored: assignment.is_ignored(),
        })
        .collect();
    Ok(StandardizeResult {
        dataset_id,
        samples: checked.data.num_samples(),
        columns,
        counts: checked.severity_counts(),
        status: checked.status,
        diagnostics: checked.diagnostics().to_vec(),
        output,
    })
}

fn output_path(args: &StandardizeArgs, base_dir: &Path, dataset_id: &str) -> Result<PathBuf> {
    if let Some(path) = &args.output {
        return Ok(path.clone());
    }
    if dataset_id.is_empty() {
        bail!("the submission has no expocode; pass --output to name the DSG file");
    }
    Ok(base_dir.join(format!("{dataset_id}.nc")))
}

pub fn run_inspect(args: &InspectArgs) -> Result<InspectResult> {
    let registries = load_builtin_registries().context("load data types")?;
    let file = DsgFile::new(&args.file);
    let dimensions = file
        .dimensions()
        .with_context(|| format!("read {}", args.file.display()))?;
    let (record, mut not_found) = file
        .read_metadata(&registries.metadata)
        .context("read metadata")?;
    let (data, data_not_found) = file.read_data(&registries.data).context("read data")?;
    not_found.extend(data_not_found);

    let metadata = record
        .entries()
        .map(|(data_type, value)| {
            let shown = if data_type.is_missing_value(value) {
                String::new()
            } else {
                value.to_string()
            };
            (
                data_type.var_name().to_string(),
                data_type.display_name().to_string(),
                shown,
            )
        })
        .collect();
    Ok(InspectResult {
        path: args.file.clone(),
        dimensions,
        metadata,
        samples: data.num_samples(),
        not_found,
    })
}

pub fn run_crossover(args: &CrossoverArgs) -> Result<CrossoverResult> {
    let mut limits = CrossoverLimits::default();
    if let Some(distance) = args.max_distance {
        limits.max_distance = distance;
    }
    if let Some(speed) = args.seawater_speed {
        limits.seawater_speed = speed;
    }
    if !(limits.max_distance > 0.0 && limits.seawater_speed > 0.0) {
        bail!("the maximum distance and seawater speed must be positive");
    }

    let primary = CrossoverSeries::from_dsg_file(&DsgFile::new(&args.file))
        .with_context(|| format!("read {}", args.file.display()))?;
    let span = info_span!("crossover", dataset = primary.dataset_id());
    let _guard = span.enter();

    let progress = crossover_progress_bar(args.others.len() as u64);
    let mut crossovers = Vec::new();
    let mut checked = 0;
    for path in &args.others {
        progress.set_message(path.display().to_string());
        let other = match CrossoverSeries::from_dsg_file(&DsgFile::new(path)) {
            Ok(other) => other,
            Err(error) => {
                warn!(path = %path.display(), %error, "skipping unreadable DSG file");
                progress.inc(1);
                continue;
            }
        };
        checked += 1;
        if let Some(crossover) = find_crossover(&primary, &other, &limits)
            .with_context(|| format!("compare with {}", path.display()))?
        {
            debug!(%crossover, "crossover found");
            crossovers.push(crossover);
        }
        progress.inc(1);
    }
    progress.finish_and_clear();
    info!(checked, crossovers = crossovers.len(), "crossover search finished");
    Ok(CrossoverResult {
        dataset_id: primary.dataset_id().to_string(),
        checked,
        crossovers,
    })
}

fn crossover_progress_bar(total: u64) -> ProgressBar {
    let progress = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
    {
        progress.set_style(style.progress_chars("#>-"));
    }
    progress
}

pub fn run_update_flags(args: &UpdateFlagsArgs) -> Result<FlagResult> {
    let locations = read_locations(&args.locations)?;
    let requested = locations.len();
    let mut update = FlagUpdate::new(&args.flag, args.value, locations);
    if let Some(data) = &args.data {
        update = update.with_data_name(data);
    }
    let unmatched = DsgFile::new(&args.file)
        .update_flags_by_location(&mut update, false)
        .with_context(|| format!("update {} in {}", args.flag, args.file.display()))?;
    Ok(FlagResult {
        flag_name: args.flag.clone(),
        flag: args.value,
        requested,
        unmatched,
    })
}
