//! Rendering of a purge result for the terminal

use crate::config::OutputFormat;
use crate::purge::{CascadeResult, RepositoryFailure};
use comfy_table::{Cell, ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};

/// Render the result in the requested format
pub fn render(result: &CascadeResult, format: OutputFormat) -> serde_json::Result<String> {
    match format {
        OutputFormat::Table => Ok(render_table(result)),
        OutputFormat::Json => serde_json::to_string_pretty(result),
    }
}

/// Human-readable summary: purged repositories, failures, stack status
pub fn render_table(result: &CascadeResult) -> String {
    let mut sections: Vec<String> = result
        .purged_repositories
        .iter()
        .map(|repository| format!("all images in {repository} successfully deleted"))
        .collect();

    for failed in &result.failures {
        sections.push(format!(
            "\nfailed to delete images of {}:\n{}",
            failed.repository,
            failure_table(failed)
        ));
    }

    let status = if result.stack_deleted {
        format!(
            "stack {} deletion requested, it continues asynchronously",
            result.stack_name
        )
    } else {
        format!(
            "stack {} was NOT deleted: remove the remaining images manually and run again",
            result.stack_name
        )
    };
    sections.push(format!("\n{status}"));

    sections.join("\n")
}

fn failure_table(failed: &RepositoryFailure) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![Cell::new("Image"), Cell::new("Code"), Cell::new("Reason")]);

    for failure in &failed.failures {
        table.add_row(vec![
            Cell::new(failure.identifier.as_str()),
            Cell::new(&failure.code),
            Cell::new(&failure.reason),
        ]);
    }

    table
}
