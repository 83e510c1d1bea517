//! careervillage: load the dataset, snapshot it, reload and print a preview

use anyhow::Context;
use careervillage::{CareerVillage, Collection, Config, Entity};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "careervillage", version, about = "Load, link and snapshot the CareerVillage dataset")]
struct Cli {
    /// YAML configuration file
    #[arg(long, env = "CAREERVILLAGE_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding the `<table>.csv` files
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Snapshot file to write and reload
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Entities of each collection to print
    #[arg(long)]
    preview: Option<usize>,

    /// Write the snapshot without gzip
    #[arg(long)]
    no_compress: bool,

    /// Skip the raw load and read an existing snapshot
    #[arg(long)]
    from_snapshot: bool,
}

impl Cli {
    fn into_config(self) -> anyhow::Result<(Config, bool)> {
        let mut config = match &self.config {
            Some(path) => Config::from_yaml_file(path)
                .with_context(|| format!("reading config {}", path.display()))?,
            None => Config::default(),
        };
        if let Some(dir) = self.data_dir {
            config.data_dir = dir;
        }
        if let Some(path) = self.snapshot {
            config.snapshot.path = path;
        }
        if let Some(rows) = self.preview {
            config.preview_rows = rows;
        }
        if self.no_compress {
            config.snapshot.compress = false;
        }
        Ok((config, self.from_snapshot))
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let (config, from_snapshot) = Cli::parse().into_config()?;
    info!("careervillage v{}", careervillage::version());

    if !from_snapshot {
        let graph = CareerVillage::load_raw_with(&config)
            .with_context(|| format!("loading tables from {}", config.data_dir.display()))?;
        graph
            .save_with(&config.snapshot.path, config.snapshot_options())
            .with_context(|| format!("writing snapshot {}", config.snapshot.path.display()))?;
    }

    let graph = CareerVillage::load(&config.snapshot.path)
        .with_context(|| format!("reading snapshot {}", config.snapshot.path.display()))?;

    println!("{}", graph.stats());
    print_preview(&graph, graph.tags(), config.preview_rows)?;
    print_preview(&graph, graph.groups(), config.preview_rows)?;
    print_preview(&graph, graph.schools(), config.preview_rows)?;
    print_preview(&graph, graph.students(), config.preview_rows)?;
    print_preview(&graph, graph.professionals(), config.preview_rows)?;
    print_preview(&graph, graph.questions(), config.preview_rows)?;
    print_preview(&graph, graph.answers(), config.preview_rows)?;
    print_preview(&graph, graph.emails(), config.preview_rows)?;
    Ok(())
}

fn print_preview<T: Entity>(graph: &CareerVillage, collection: &Collection<T>, rows: usize) -> anyhow::Result<()> {
    if rows == 0 || collection.is_empty() {
        return Ok(());
    }
    println!();
    println!("=== {} ({}) ===", T::KIND, collection.len());
    for entity in collection.take(rows) {
        println!("{}", serde_json::to_string_pretty(&entity.to_json(graph))?);
    }
    Ok(())
}
