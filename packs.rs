use log::warn;

use crate::config::Config;
use crate::error::Result;
use crate::fetch::Fetcher;
use crate::ingest::{self, Tally};
use crate::staging::Staging;

// Stage three: community compilation archives. A plain table so entries
// are easy to add or retire as collections come and go.
const COMPILATIONS: &[(&str, &str)] = &[
    (
        "vim-colorschemes.tar.gz",
        "https://github.com/flazz/vim-colorschemes/archive/refs/heads/master.tar.gz",
    ),
    (
        "ColorSamplerPack.zip",
        "https://www.vim.org/scripts/download_script.php?src_id=18915",
    ),
];

pub async fn run(fetcher: &Fetcher, staging: &Staging, config: &Config) -> Result<Tally> {
    let mut tally = Tally::default();
    for (name, url) in COMPILATIONS {
        println!("Fetching compilation {}", name);
        let dest = staging.download_dir().join(name);
        match fetcher.fetch_to(url, &dest).await {
            Ok(()) => ingest::ingest_artifact(&dest, staging, config, &mut tally),
            Err(e) => {
                warn!("skipping {}: {}", name, e);
                tally.failures += 1;
            }
        }
    }

    println!("Compilations: {}", tally.summary());
    Ok(tally)
}
