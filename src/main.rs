use clap::{Args, Parser, Subcommand, ValueEnum};
use entsync::{
    Batch, BatchError, BatchMode, BatchOptions, BatchReport, DocumentOutcome, ExecutorImpl,
    FilesystemDocumentStore, Profile, ScanConvention, UnresolvedPolicy, discover_documents,
    discover_reference_files,
};
use log::error;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

// Use Mimalloc; batches make many small per-line allocations across worker threads.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser, Debug)]
#[command(version, about = "Rebuild DOCTYPE internal subsets from what each document references")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the header each document would get; write nothing
    Preview(RunArgs),
    /// Rewrite documents in place
    Apply(RunArgs),
    /// Print the built-in profile as JSON
    Profile,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Project directory; reference files and documents are discovered under it
    #[arg(long)]
    root: Option<PathBuf>,

    /// Reference (.ent) file, in addition to any discovered
    #[arg(long = "reference", value_name = "FILE")]
    references: Vec<PathBuf>,

    /// Document to process, in addition to any discovered
    #[arg(long = "document", value_name = "FILE")]
    documents: Vec<PathBuf>,

    /// Profile JSON replacing the built-in one
    #[arg(long, env = "ENTSYNC_PROFILE", value_name = "FILE")]
    profile: Option<PathBuf>,

    /// Root element convention, overriding the profile
    #[arg(long, value_enum)]
    convention: Option<ConventionArg>,

    /// Fail documents with entity references no rule resolves
    #[arg(long, default_value_t = false)]
    strict: bool,

    /// Worker threads (1 runs sequentially)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Print reports as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ConventionArg {
    RootTag,
    DoctypeLine,
}

impl From<ConventionArg> for ScanConvention {
    fn from(arg: ConventionArg) -> Self {
        match arg {
            ConventionArg::RootTag => ScanConvention::RootTag,
            ConventionArg::DoctypeLine => ScanConvention::DoctypeLine,
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Preview(args) => run(args, BatchMode::Preview),
        Command::Apply(args) => run(args, BatchMode::Apply),
        Command::Profile => {
            print!("{}", Profile::default_json());
            Ok(true)
        }
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            error!("{}", e);
            ExitCode::from(2)
        }
    }
}

/// Returns `Ok(false)` if any document failed.
fn run(args: RunArgs, mode: BatchMode) -> Result<bool, BatchError> {
    let mut profile = match &args.profile {
        Some(path) => Profile::from_json(&fs::read_to_string(path)?)?,
        None => Profile::builtin()?,
    };
    if let Some(convention) = args.convention {
        profile = profile.with_convention(convention.into());
    }

    let mut references = Vec::new();
    let mut documents = Vec::new();
    if let Some(root) = &args.root {
        references.extend(discover_reference_files(root, &profile));
        documents.extend(discover_documents(root, &profile));
    }
    references.extend(args.references);
    documents.extend(args.documents);
    if documents.is_empty() {
        return Err(BatchError::NoInput(
            "no documents found; pass --root or --document".to_string(),
        ));
    }

    let options = BatchOptions {
        mode,
        policy: if args.strict {
            UnresolvedPolicy::Fail
        } else {
            UnresolvedPolicy::Warn
        },
        executor: ExecutorImpl::with_jobs(args.jobs)?,
    };
    let batch = Batch::new(profile, Arc::new(FilesystemDocumentStore::new()), options);

    let load = batch.load_catalog(&references);
    let report = batch.run(load.catalog, documents);

    if args.json {
        let output = serde_json::json!({
            "summary": report.summary(),
            "documents": report.documents,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_report(&report);
    }

    Ok(!report.has_failures())
}

fn print_report(report: &BatchReport) {
    for document in &report.documents {
        match document.outcome {
            DocumentOutcome::Previewed => {
                println!("{}", document.path.display());
                if let Some(header) = &document.header {
                    print!("{}", header);
                }
                println!();
            }
            DocumentOutcome::Failed => {
                println!(
                    "{}: failed: {}",
                    document.path.display(),
                    document.error.as_deref().unwrap_or("unknown error")
                );
            }
            outcome => {
                println!("{}: {:?}", document.path.display(), outcome);
            }
        }
        for warning in &document.warnings {
            println!("  warning: {}", warning);
        }
    }

    let summary = report.summary();
    println!(
        "{} processed, {} skipped (empty), {} skipped (invalid), {} cancelled, {} failed",
        summary.processed, summary.skipped_empty, summary.skipped_invalid, summary.cancelled, summary.errors
    );
}
