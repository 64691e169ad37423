//! codemark: mark a code corpus with SPT backdoors and write the dataset splits.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use codemark_analysis::corpus::{load_corpus, write_artifacts};
use codemark_analysis::marking::MarkingPipeline;
use codemark_core::MarkConfig;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "codemark")]
#[command(about = "Embed semantics-preserving backdoor triggers into a code corpus")]
#[command(version)]
struct Cli {
    /// Corpus language (python or java)
    #[arg(long)]
    language: Option<String>,

    /// Dataset name used in output file names
    #[arg(long)]
    dataset_name: Option<String>,

    /// Corpus file or directory
    #[arg(long)]
    data_path: Option<PathBuf>,

    /// Accepted for compatibility; has no effect
    #[arg(long)]
    get_popularity: bool,

    /// TOML config file; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output root (default: dataset)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Mark rate in (0, 1]; repeat for several
    #[arg(long = "mark-rate")]
    mark_rates: Vec<f64>,

    /// Comma-separated SPT ids for one corpus part; repeat per part
    #[arg(long = "backdoor")]
    backdoors: Vec<String>,

    /// Worker threads (0 = all cores)
    #[arg(long)]
    threads: Option<usize>,
}

impl Cli {
    /// Layer flags over the config file.
    fn into_config(self) -> Result<MarkConfig> {
        let mut config = match &self.config {
            Some(path) => MarkConfig::from_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => MarkConfig::default(),
        };
        if self.language.is_some() {
            config.language = self.language;
        }
        if self.dataset_name.is_some() {
            config.dataset_name = self.dataset_name;
        }
        if self.data_path.is_some() {
            config.data_path = self.data_path;
        }
        if self.output_dir.is_some() {
            config.output_dir = self.output_dir;
        }
        if !self.mark_rates.is_empty() {
            config.mark_rates = Some(self.mark_rates);
        }
        if !self.backdoors.is_empty() {
            config.backdoors = Some(self.backdoors.iter().map(|spec| split_spec(spec)).collect());
        }
        if self.threads.is_some() {
            config.threads = self.threads;
        }
        Ok(config)
    }
}

fn split_spec(spec: &str) -> Vec<String> {
    spec.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn main() -> Result<()> {
    codemark_core::tracing::init_tracing();

    let cli = Cli::parse();
    if cli.get_popularity {
        info!("--get-popularity is accepted but ignored");
    }
    let config = cli.into_config()?;

    let pipeline = MarkingPipeline::from_config(&config).context("invalid configuration")?;
    let dataset_name = config.effective_dataset_name()?.to_string();
    let data_path = config.effective_data_path()?.to_path_buf();

    let corpus = load_corpus(&data_path)
        .with_context(|| format!("loading corpus from {}", data_path.display()))?;
    let dataset = pipeline.run(corpus)?;
    let paths = write_artifacts(
        &dataset,
        &config.effective_output_dir(),
        pipeline.language(),
        &dataset_name,
    )?;

    let stats = &dataset.stats;
    println!(
        "{}: {} samples, {} parsed ({:.1}%), {} eligible, {} rewritten -> {}",
        dataset_name,
        stats.counts.total,
        stats.counts.parsed,
        stats.derived.parse_success_rate * 100.0,
        stats.counts.eligible,
        stats.counts.rewritten,
        paths.dir.display()
    );
    Ok(())
}
