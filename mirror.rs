use std::collections::HashSet;

use log::{debug, warn};
use regex::Regex;
use url::Url;

use crate::config::Config;
use crate::error::Result;
use crate::fetch::Fetcher;
use crate::ingest::{self, Tally};
use crate::staging::Staging;

// Stage one: every *.vim file linked from the runtime mirror's colors/
// index page. These ship with Vim itself and seed the target directory
// before the community schemes arrive.
pub async fn run(fetcher: &Fetcher, staging: &Staging, config: &Config) -> Result<Tally> {
    println!("Fetching runtime color schemes from {}", config.mirror_url);
    let base = Url::parse(&config.mirror_url)?;
    let index = fetcher.fetch_text(&config.mirror_url).await?;

    let link = Regex::new(r#"href="([^"/?]+\.vim)""#).unwrap();
    let mut seen = HashSet::new();
    let mut tally = Tally::default();

    for caps in link.captures_iter(&index) {
        let name = caps[1].to_string();
        if !seen.insert(name.clone()) {
            continue;
        }
        let url = match base.join(&name) {
            Ok(url) => url,
            Err(e) => {
                warn!("bad link {} on mirror index: {}", name, e);
                continue;
            }
        };
        debug!("downloading {}", url);
        let dest = staging.download_dir().join(&name);
        match fetcher.fetch_to(url.as_str(), &dest).await {
            Ok(()) => ingest::merge_candidate(&dest, config, &mut tally),
            Err(e) => {
                warn!("skipping {}: {}", name, e);
                tally.failures += 1;
            }
        }
    }

    println!("Runtime mirror: {}", tally.summary());
    Ok(tally)
}
