use std::env;

pub struct CliArgs {
    pub target_dir: Option<String>,
    pub log_file: Option<String>,
    pub verbose: bool,
    pub skip_runtime: bool,
    pub skip_scripts: bool,
    pub skip_packs: bool,
    pub skip_resolve: bool,
    pub mirror_url: Option<String>,
    pub show_version: bool,
    pub bad_args: Vec<String>,
}

impl CliArgs {
    pub fn parse() -> Self {
        Self::from_args(env::args().skip(1).collect())
    }

    fn from_args(args: Vec<String>) -> Self {
        let mut target_dir = None;
        let mut log_file = None;
        let mut verbose = false;
        let mut skip_runtime = false;
        let mut skip_scripts = false;
        let mut skip_packs = false;
        let mut skip_resolve = false;
        let mut mirror_url = None;
        let mut show_version = false;
        let mut bad_args = Vec::new();
        let mut i = 0;

        while i < args.len() {
            match args[i].as_str() {
                "-e" | "--verbose" => verbose = true,
                "--skip-runtime" => skip_runtime = true,
                "--skip-scripts" => skip_scripts = true,
                "--skip-packs" => skip_packs = true,
                "--skip-resolve" => skip_resolve = true,
                "-v" | "--version" => show_version = true,
                "-d" | "--dir" => {
                    if i + 1 < args.len() {
                        target_dir = Some(args[i + 1].clone());
                        i += 1;
                    } else {
                        bad_args.push(args[i].clone());
                    }
                }
                "-o" | "--output" => {
                    if i + 1 < args.len() {
                        log_file = Some(args[i + 1].clone());
                        i += 1;
                    } else {
                        bad_args.push(args[i].clone());
                    }
                }
                "--mirror" => {
                    if i + 1 < args.len() {
                        mirror_url = Some(args[i + 1].clone());
                        i += 1;
                    } else {
                        bad_args.push(args[i].clone());
                    }
                }
                other => bad_args.push(other.to_string()),
            }
            i += 1;
        }

        Self {
            target_dir,
            log_file,
            verbose,
            skip_runtime,
            skip_scripts,
            skip_packs,
            skip_resolve,
            mirror_url,
            show_version,
            bad_args,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.bad_args.is_empty()
    }

    pub fn print_usage(&self) {
        let program_name = env::args().next().unwrap_or_else(|| String::from("color-harvest"));
        for bad in &self.bad_args {
            eprintln!("Unrecognized argument: {}", bad);
        }
        println!("Usage: {} [OPTIONS]", program_name);
        println!("\nOptions:");
        println!("  -d, --dir <path>      Target directory for merged schemes (default: colors)");
        println!("  -o, --output <file>   Append log output to a file");
        println!("  -e, --verbose         Echo debug-level detail");
        println!("      --skip-runtime    Skip the runtime-mirror stage");
        println!("      --skip-scripts    Skip the vim.org scripts stage");
        println!("      --skip-packs      Skip the compilation-archives stage");
        println!("      --skip-resolve    Skip the final resolve pass");
        println!("      --mirror <url>    Override the runtime mirror base URL");
        println!("  -v, --version         Show version information");
        println!("\nExamples:");
        println!("  {} -d ~/.vim/colors", program_name);
        println!("  {} -e --skip-scripts --skip-packs", program_name);
        println!("  {} -o harvest.log --mirror https://ftp.vim.org/pub/vim/runtime/colors/", program_name);
    }
}
