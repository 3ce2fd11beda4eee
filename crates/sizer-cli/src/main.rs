use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

mod args;
mod config;
mod gitproc;
mod logging;
mod refs;

use args::CommandLineArgs;
use gitproc::{BatchBodySource, RevListHeaderSource};
use sizer_core::{
    build_report, render_table, AggregationGraph, CancellationToken, DefaultRefGrouper, ReferenceRoot,
    StructuredReport, WalkProgress, WalkerDriver,
};
use sizer_core::path_resolver::{FullResolver, HashResolver, PathResolver};

/// Adapts `sizer_progress::Progress`'s batched `inc` to `sizer_core`'s
/// `WalkProgress` callback, so the walker doesn't need to know the progress bar
/// crate exists.
struct ProgressAdapter(sizer_progress::Progress);

impl WalkProgress for ProgressAdapter {
    fn on_object_processed(&mut self, _kind: sizer_core::ObjectKind) {
        self.0.inc(1);
    }
}

fn resolve_effective_settings(args: &CommandLineArgs) -> Result<(u8, bool, bool)> {
    let mut threshold = args.threshold;
    let mut json = args.json;
    let mut no_names = args.no_names;

    if let Some(config_path) = &args.config {
        let file_config = config::FileConfig::load(config_path)?;
        if args.threshold == 1 {
            // 1 is clap's default; a config file value only applies if the user didn't
            // pass --threshold explicitly. clap doesn't expose "was this passed"
            // without ArgMatches plumbing, so an explicit --threshold 1 and "unset"
            // are indistinguishable here — acceptable since 1 is also the config
            // file's natural default.
            if let Some(t) = file_config.threshold {
                threshold = t;
            }
        }
        json = json || file_config.json.unwrap_or(false);
        no_names = no_names || file_config.no_names.unwrap_or(false);
    }

    Ok((threshold, json, no_names))
}

fn try_main(args: &CommandLineArgs) -> Result<()> {
    logging::configure_color(&args.global_args);
    logging::configure_tracing(&args.global_args).context("failed to initialize logging")?;

    let (threshold, json, no_names) = resolve_effective_settings(args)?;

    let repo_dir = args.repository.clone();
    debug!(repo = %repo_dir.display(), "starting walk");

    let mut root_source = refs::ForEachRefRootSource::new(&repo_dir, args.refs.clone());
    let grouper = DefaultRefGrouper;
    let mut roots = sizer_core::walk::root::resolve_roots(&mut root_source, &grouper)
        .context("failed to enumerate references")?;

    if roots.is_empty() && !args.refs.is_empty() {
        // The user named specific refs, but for-each-ref found none of them (maybe
        // they passed bare OIDs instead of ref names). Fall back to resolving each
        // argument with rev-parse.
        for name in &args.refs {
            let oid = refs::resolve_single_oid(&repo_dir, name)?;
            roots.push(ReferenceRoot {
                name: bstr::BString::from(name.as_str()),
                oid,
                group: sizer_core::RefGroup::Other,
            });
        }
    }

    let graph = AggregationGraph::new();
    let mut hash_resolver = HashResolver::new();
    let mut full_resolver = FullResolver::new();
    let resolver: &mut dyn PathResolver = if json || no_names {
        &mut hash_resolver
    } else {
        &mut full_resolver
    };

    let cancel = CancellationToken::new();
    let mut header_source = RevListHeaderSource::new(&repo_dir);
    let mut body_source = BatchBodySource::spawn(&repo_dir)?;

    let mut progress = ProgressAdapter(sizer_progress::Progress::new_spinner(
        "walking objects",
        args.global_args.use_progress(),
    ));

    let mut driver = WalkerDriver::new(&graph, &mut *resolver, cancel);
    driver
        .run(&roots, &mut header_source, &mut body_source, &mut progress)
        .context("walk failed")?;
    progress.0.finish_with_message("done");

    let snapshot = graph.snapshot_history(resolver);
    let report = build_report(&snapshot);

    if json {
        let structured = StructuredReport::from(&report);
        println!("{}", structured.to_json().context("failed to serialize report as JSON")?);
    } else {
        print!("{}", render_table(&report, threshold));
    }

    Ok(())
}

fn main() {
    let args = CommandLineArgs::parse_args();
    if let Err(e) = try_main(&args) {
        if args.global_args.verbose > 1 {
            eprintln!("Error: {e:?}");
        } else {
            eprintln!("Error: {e:#}");
        }
        std::process::exit(2);
    }
}
