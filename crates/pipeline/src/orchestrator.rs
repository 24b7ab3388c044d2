//! End-to-end pipeline over a dataset's variables.
//!
//! One orchestrator drives all three products (images, per-variable tables,
//! the combined table); callers switch products on and off through
//! [`PipelineConfig`]. Every per-variable failure is recovered: the variable
//! is logged and skipped, and the remaining variables still run.

use std::collections::BTreeMap;

use tracing::{info, warn};
use viz_common::{ArtifactHandle, ArtifactKind, Dataset, Variable, VizError, VizResult};

use crate::policy::ColormapPolicy;
use crate::reduce::reduce;
use crate::sink::ArtifactSink;
use renderer::colormap::{self, Colormap, VIRIDIS};
use tabular::{flatten_variable, RowTable};

/// Which products a pipeline run should build.
#[derive(Debug, Clone, Copy)]
pub struct PipelineConfig {
    pub render_images: bool,
    pub export_tables: bool,
    /// Only meaningful when `export_tables` is set; the combined table is
    /// joined from the same flattened tables the exporter writes.
    pub build_combined: bool,
}

impl PipelineConfig {
    /// Images only, matching the upload-and-render endpoint.
    pub fn images() -> Self {
        Self {
            render_images: true,
            export_tables: false,
            build_combined: false,
        }
    }

    /// Per-variable tables plus the combined table, matching the CSV
    /// endpoint.
    pub fn tables() -> Self {
        Self {
            render_images: false,
            export_tables: true,
            build_combined: true,
        }
    }
}

/// Artifacts produced by one pipeline run, keyed by variable name, plus a
/// record of the variables that were skipped and why.
#[derive(Debug, Default)]
pub struct PipelineOutput {
    pub images: BTreeMap<String, ArtifactHandle>,
    pub tables: BTreeMap<String, ArtifactHandle>,
    pub combined_table: Option<ArtifactHandle>,
    /// Variable name to failure summary, for variables skipped in at least
    /// one product.
    pub failures: BTreeMap<String, String>,
}

/// Run the pipeline over every data variable of `dataset`.
///
/// Variables are processed in declaration order. A failure in one variable
/// (reduction, rendering, flattening, joining, or storing) never aborts the
/// run; it is logged, recorded in the output, and the next variable
/// proceeds.
pub fn run(
    dataset: &Dataset,
    config: &PipelineConfig,
    policy: &ColormapPolicy,
    sink: &dyn ArtifactSink,
) -> VizResult<PipelineOutput> {
    let mut output = PipelineOutput::default();
    let mut combined: Option<RowTable> = None;

    for variable in dataset.data_vars() {
        if config.render_images {
            match render_variable(variable, policy, sink) {
                Ok(handle) => {
                    output.images.insert(variable.name.clone(), handle);
                }
                Err(err) => {
                    // Export below still runs; the two products fail
                    // independently.
                    warn!(variable = %variable.name, error = %err, "skipping variable render");
                    output.failures.insert(variable.name.clone(), err.to_string());
                }
            }
        }

        if config.export_tables {
            let table = match flatten_variable(dataset, variable) {
                Ok(table) => table,
                Err(err) => {
                    warn!(variable = %variable.name, error = %err, "skipping variable export");
                    output.failures.insert(variable.name.clone(), err.to_string());
                    continue;
                }
            };

            match sink.store(ArtifactKind::Table, table.to_csv().as_bytes()) {
                Ok(handle) => {
                    output.tables.insert(variable.name.clone(), handle);
                }
                Err(err) => {
                    warn!(variable = %variable.name, error = %err, "skipping variable export");
                    output.failures.insert(variable.name.clone(), err.to_string());
                    continue;
                }
            }

            if config.build_combined {
                combined = match combined.take() {
                    None => Some(table),
                    Some(acc) => match acc.outer_join(&table) {
                        Ok(joined) => Some(joined),
                        Err(err) => {
                            warn!(
                                variable = %variable.name,
                                error = %err,
                                "variable left out of combined table"
                            );
                            output.failures.insert(variable.name.clone(), err.to_string());
                            Some(acc)
                        }
                    },
                };
            }
        }
    }

    if let Some(table) = combined {
        let handle = sink.store(ArtifactKind::CombinedTable, table.to_csv().as_bytes())?;
        output.combined_table = Some(handle);
    }

    info!(
        images = output.images.len(),
        tables = output.tables.len(),
        combined = output.combined_table.is_some(),
        skipped = output.failures.len(),
        "pipeline run complete"
    );
    Ok(output)
}

fn render_variable(
    variable: &Variable,
    policy: &ColormapPolicy,
    sink: &dyn ArtifactSink,
) -> VizResult<ArtifactHandle> {
    let slice = reduce(variable)?;
    if slice.ndim() != 2 {
        return Err(VizError::Render(format!(
            "variable '{}' reduces to {} dimensions, need 2",
            variable.name,
            slice.ndim()
        )));
    }
    let (height, width) = (slice.shape[0], slice.shape[1]);

    let cmap = resolve_colormap(policy, &variable.name);
    let png = renderer::render_field_png(&slice.data, width, height, cmap, &variable.name)
        .map_err(|e| VizError::Render(e.to_string()))?;
    sink.store(ArtifactKind::Image, &png)
}

fn resolve_colormap(policy: &ColormapPolicy, variable: &str) -> &'static Colormap {
    let name = policy.resolve(variable);
    if let Some(cmap) = colormap::by_name(name) {
        return cmap;
    }
    // A policy entry can name a colormap this build does not ship.
    warn!(variable, colormap = name, "unknown colormap, using viridis");
    colormap::by_name(policy.default_colormap()).unwrap_or(&VIRIDIS)
}
