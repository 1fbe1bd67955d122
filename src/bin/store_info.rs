/// store_info: list the patients and datasets of a window store.
///
/// Output, one patient per block:
///   chb01
///     normal       growable  [N, C, S]
///     anomaly      K entries, W windows
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use ictal::store::{anomaly_group, normal_path, StoreReader};
use ictal::DatasetKind;

#[derive(Parser, Debug)]
#[command(name = "store_info", about = "Summarise a window store file")]
struct Args {
    /// Window store file.
    store: PathBuf,

    /// Print every anomaly entry instead of a total.
    #[arg(long)]
    all: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt().with_target(false).init();

    let store = StoreReader::open(&args.store)?;
    println!("{} ({} bytes)", args.store.display(), store.valid_len());

    for patient in store.children("") {
        println!("{patient}");
        let normal = normal_path(&patient);
        if let Some([n, c, s]) = store.shape(&normal) {
            let kind = match store.kind(&normal) {
                Some(DatasetKind::Growable) => "growable",
                _ => "fixed",
            };
            println!("  normal       {kind:<9} [{n}, {c}, {s}]");
        }

        let group = anomaly_group(&patient);
        let mut entries: Vec<(usize, [usize; 3])> = store
            .children(&group)
            .iter()
            .filter_map(|k| {
                let idx = k.parse::<usize>().ok()?;
                let shape = store.shape(&format!("{group}/{k}"))?;
                Some((idx, shape))
            })
            .collect();
        entries.sort_by_key(|(idx, _)| *idx);

        let windows: usize = entries.iter().map(|(_, s)| s[0]).sum();
        println!("  anomaly      {} entries, {windows} windows", entries.len());
        if args.all {
            for (idx, [n, c, s]) in entries {
                println!("    {idx:<4} [{n}, {c}, {s}]");
            }
        }
    }
    Ok(())
}
