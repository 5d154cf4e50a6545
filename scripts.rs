use std::collections::HashSet;

use log::{info, warn};
use regex::Regex;

use crate::config::Config;
use crate::error::Result;
use crate::fetch::Fetcher;
use crate::ingest::{self, Tally};
use crate::staging::Staging;

const SEARCH_URL: &str =
    "https://www.vim.org/scripts/script_search_results.php?script_type=color%20scheme&show_me=3000";
const SCRIPT_URL: &str = "https://www.vim.org/scripts/script.php?script_id=";
const DOWNLOAD_URL: &str = "https://www.vim.org/scripts/download_script.php?src_id=";

const IMAGE_EXTS: &[&str] = &[".png", ".jpg", ".jpeg", ".gif", ".bmp"];

// Stage two: individually hosted schemes on vim.org. The search results
// give us script ids; each script page lists its uploads newest first.
pub async fn run(fetcher: &Fetcher, staging: &Staging, config: &Config) -> Result<Tally> {
    println!("Discovering color scheme scripts on vim.org");
    let page = fetcher.fetch_text(SEARCH_URL).await?;
    let ids = discover_script_ids(&page);
    info!("found {} candidate scripts", ids.len());

    let mut tally = Tally::default();
    for id in &ids {
        if let Err(e) = ingest_script(fetcher, staging, config, id, &mut tally).await {
            warn!("skipping script {}: {}", id, e);
            tally.failures += 1;
        }
    }

    println!("vim.org scripts: {}", tally.summary());
    Ok(tally)
}

fn discover_script_ids(page: &str) -> Vec<String> {
    let id = Regex::new(r"script\.php\?script_id=(\d+)").unwrap();
    let mut seen = HashSet::new();
    let mut ids = Vec::new();
    for caps in id.captures_iter(page) {
        let id = caps[1].to_string();
        if seen.insert(id.clone()) {
            ids.push(id);
        }
    }
    ids
}

async fn ingest_script(
    fetcher: &Fetcher,
    staging: &Staging,
    config: &Config,
    id: &str,
    tally: &mut Tally,
) -> Result<()> {
    let page = fetcher.fetch_text(&format!("{}{}", SCRIPT_URL, id)).await?;
    let (src_id, filename) = match newest_download(&page) {
        Some(found) => found,
        None => {
            warn!("script {} offers no usable download", id);
            return Ok(());
        }
    };

    let dest = staging.download_dir().join(&filename);
    fetcher
        .fetch_to(&format!("{}{}", DOWNLOAD_URL, src_id), &dest)
        .await?;
    ingest::ingest_artifact(&dest, staging, config, tally);
    Ok(())
}

// First download row that is not a screenshot; some authors upload preview
// images alongside (or instead of) the scheme itself.
fn newest_download(page: &str) -> Option<(String, String)> {
    let row = Regex::new(r#"download_script\.php\?src_id=(\d+)"[^>]*>([^<]+)</a>"#).unwrap();
    for caps in row.captures_iter(page) {
        let filename = sanitize_filename(&caps[2]);
        let lower = filename.to_ascii_lowercase();
        if IMAGE_EXTS.iter().any(|ext| lower.ends_with(ext)) {
            continue;
        }
        return Some((caps[1].to_string(), filename));
    }
    None
}

fn sanitize_filename(name: &str) -> String {
    name.trim().replace(['/', '\\'], "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_ids_are_collected_in_page_order_without_repeats() {
        let page = r#"
            <a href="script.php?script_id=120">desert</a>
            <a href="script.php?script_id=625">sampler</a>
            <a href="script.php?script_id=120">desert again</a>
        "#;
        assert_eq!(discover_script_ids(page), ["120", "625"]);
    }

    #[test]
    fn screenshot_rows_are_skipped() {
        let page = r#"
            <a href="download_script.php?src_id=900">preview.png</a>
            <a href="download_script.php?src_id=899">night.vim</a>
            <a href="download_script.php?src_id=700">night_old.vim</a>
        "#;
        assert_eq!(
            newest_download(page),
            Some(("899".to_string(), "night.vim".to_string()))
        );
    }

    #[test]
    fn pages_without_downloads_yield_nothing() {
        assert_eq!(newest_download("<html>nothing here</html>"), None);
    }

    #[test]
    fn hostile_filenames_lose_their_separators() {
        assert_eq!(sanitize_filename("../../etc/passwd"), ".._.._etc_passwd");
    }
}
