use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use camino::Utf8PathBuf;
use clap::Parser;
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use genereviews_extractor::app::{App, BatchOptions};
use genereviews_extractor::cache::DiskCache;
use genereviews_extractor::error::ExtractError;
use genereviews_extractor::genelist;
use genereviews_extractor::genereviews::GeneReviewsHttpClient;
use genereviews_extractor::mapping::GeneMapping;
use genereviews_extractor::medline::MedlineHttpClient;
use genereviews_extractor::output::{JsonOutput, LogSink};

#[derive(Parser)]
#[command(name = "grx")]
#[command(about = "Extract disease sections from GeneReviews articles for a set of genes")]
#[command(version, author)]
struct Cli {
    #[arg(long, num_args = 1..)]
    genes: Vec<String>,

    #[arg(long, short = 'f')]
    gene_file: Option<PathBuf>,

    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    #[arg(long)]
    cache_dir: Option<Utf8PathBuf>,

    #[arg(long)]
    no_cache: bool,

    #[arg(long)]
    gene_info: bool,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(extract) = report.downcast_ref::<ExtractError>() {
            return ExitCode::from(map_exit_code(extract));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &ExtractError) -> u8 {
    match error {
        ExtractError::MissingGenes | ExtractError::GeneListRead(_) => 2,
        ExtractError::MappingHttp(_)
        | ExtractError::MappingStatus { .. }
        | ExtractError::GeneReviewsHttp(_)
        | ExtractError::GeneReviewsStatus { .. }
        | ExtractError::MedlineHttp(_) => 3,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("genereviews_extractor=info".parse().into_diagnostic()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.genes.is_empty() && cli.gene_file.is_none() {
        return Err(ExtractError::MissingGenes.into());
    }

    let mut tokens = cli.genes.clone();
    if let Some(path) = &cli.gene_file {
        tokens.extend(genelist::read_gene_file(path)?);
    }
    let genes = genelist::dedup_symbols(&tokens);

    let cache = if cli.no_cache {
        DiskCache::disabled()
    } else {
        let root = match cli.cache_dir {
            Some(dir) => dir,
            None => DiskCache::default_root()?,
        };
        DiskCache::new(root)?
    };

    let reviews = GeneReviewsHttpClient::new()?;
    let medline = MedlineHttpClient::new()?;

    let mapping = GeneMapping::load(&reviews)?;
    tracing::info!("Loaded mappings for {} genes", mapping.gene_count());

    let app = App::new(mapping, cache, reviews, medline);
    let options = BatchOptions {
        delay: Duration::from_secs(1),
        gene_info: cli.gene_info,
    };
    let report = app.run_batch(&genes, &options, &LogSink);

    match &cli.output {
        Some(path) => {
            JsonOutput::write_report(path, &report)?;
            tracing::info!("Results written to {}", path.display());
        }
        None => JsonOutput::print_report(&report).into_diagnostic()?,
    }

    Ok(())
}
