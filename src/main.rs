use anyhow::Result;

use fpl_fdr::config::{self, Config};
use fpl_fdr::pipeline;

fn main() -> Result<()> {
    config::load_dotenv();
    fpl_fdr::init_tracing();

    let cfg = Config::from_env();
    let summary = pipeline::run(&cfg)?;

    println!("FPL ingest complete");
    println!("Data dir: {}", summary.data_dir.display());
    for (file, rows) in &summary.tables {
        println!(" - {file}: {rows} rows");
    }

    Ok(())
}
