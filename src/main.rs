use anyhow::{Context, Result};
use clap::Parser;
use revivir::cli::{Cli, OutputFormat};
use revivir::{codegen, csv_output, json_output, lifetime, normalize, selection, smaps, stats, timeline};
use std::fs;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Short display name of the trace for the summary record
fn trace_file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Print the summary in the requested format, with the optional snapshot
/// report appended to the text rendering
fn print_summary(
    format: OutputFormat,
    file_name: &str,
    summary: &stats::TraceSummary,
    snapshots: Option<&smaps::SnapshotReport>,
) -> Result<()> {
    match format {
        OutputFormat::Text => {
            print!("{}", summary.render_text(file_name));
            if let Some(report) = snapshots {
                if report.is_empty() {
                    println!("No smaps snapshots found");
                } else {
                    println!("Snapshots         : {}", report.samples.len());
                    println!("Approx. total RSS : {} KiB", report.total_kib());
                }
            }
        }
        OutputFormat::Json => {
            let doc = json_output::JsonSummary::new(file_name, summary);
            println!("{}", doc.to_json()?);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Cli::parse();

    if args.max_objects == 0 {
        anyhow::bail!("Invalid value for --max-objects: 0 (the replay must allocate at least one object)");
    }

    init_tracing(args.debug);

    let events = normalize::load_trace(&args.trace)
        .with_context(|| format!("cannot analyze {}", args.trace.display()))?;

    let file_name = trace_file_name(&args.trace);
    let summary = stats::summarize(&events);
    let snapshots = args.smaps.as_deref().map(smaps::scan_snapshot_dir);

    print_summary(args.format, &file_name, &summary, snapshots.as_ref())?;

    if let Some(path) = &args.summary_json {
        let doc = json_output::JsonSummary::new(&file_name, &summary);
        fs::write(path, doc.to_json()? + "\n")
            .with_context(|| format!("cannot write summary to {}", path.display()))?;
    }

    if let Some(path) = &args.curve_csv {
        let curve = timeline::net_bytes_curve(&events);
        fs::write(path, csv_output::CurveCsv::from_points(curve).to_csv())
            .with_context(|| format!("cannot write curve to {}", path.display()))?;
    }

    // One reconstruction pass feeds every interval consumer
    if args.timeline_csv.is_some() || args.replay_out.is_some() {
        let recon = lifetime::reconstruct(&events);
        tracing::debug!(
            intervals = recon.intervals.len(),
            live = recon.live_set().len(),
            unmatched_frees = recon.unmatched_frees,
            "reconstructed allocation lifetimes"
        );

        if let Some(path) = &args.timeline_csv {
            let rows = timeline::gantt_rows(&recon.intervals);
            fs::write(path, csv_output::TimelineCsv::from_rows(rows).to_csv())
                .with_context(|| format!("cannot write timeline to {}", path.display()))?;
        }

        if let Some(path) = &args.replay_out {
            let budget = selection::ReplayBudget {
                max_objects: args.max_objects,
                max_object_bytes: args.max_object_bytes,
            };
            let picked = selection::select(&recon.live_set(), budget);
            fs::write(path, codegen::emit_replay_source(&picked))
                .with_context(|| format!("cannot write replay program to {}", path.display()))?;
            println!(
                "Wrote replay program to {} ({} objects, {} bytes requested)",
                path.display(),
                picked.len(),
                codegen::total_requested_bytes(&picked)
            );
        }
    }

    Ok(())
}
