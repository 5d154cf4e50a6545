use std::path::PathBuf;

use crate::cli::CliArgs;

pub const DEFAULT_MIRROR_URL: &str = "https://ftp.nluug.nl/pub/vim/runtime/colors/";

// Built once from the command line and passed by reference into every
// component; nothing configuration-shaped lives in globals or depends on
// the working directory after this point.
pub struct Config {
    pub target_dir: PathBuf,
    pub log_file: Option<PathBuf>,
    pub verbose: bool,
    pub run_mirror: bool,
    pub run_scripts: bool,
    pub run_packs: bool,
    pub run_resolve: bool,
    pub mirror_url: String,
}

impl Config {
    pub fn from_args(args: &CliArgs) -> Self {
        Self {
            target_dir: PathBuf::from(args.target_dir.as_deref().unwrap_or("colors")),
            log_file: args.log_file.as_ref().map(PathBuf::from),
            verbose: args.verbose,
            run_mirror: !args.skip_runtime,
            run_scripts: !args.skip_scripts,
            run_packs: !args.skip_packs,
            run_resolve: !args.skip_resolve,
            mirror_url: args
                .mirror_url
                .clone()
                .unwrap_or_else(|| DEFAULT_MIRROR_URL.to_string()),
        }
    }
}
