use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Local;
use directories::ProjectDirs;

// Scratch space for downloads and archive extraction, kept under the user
// cache directory so repeated runs can be inspected after the fact. Each
// run gets its own timestamped download directory.
pub struct Staging {
    run_dir: PathBuf,
}

impl Staging {
    pub fn new() -> io::Result<Self> {
        let project_dirs = ProjectDirs::from("org", "color-harvest", "color-harvest")
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no home directory"))?;

        let stamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
        let run_dir = project_dirs.cache_dir().join(stamp);
        fs::create_dir_all(run_dir.join("downloads"))?;
        Ok(Self { run_dir })
    }

    pub fn download_dir(&self) -> PathBuf {
        self.run_dir.join("downloads")
    }

    // A fresh extraction directory for one archive; any leftovers from an
    // earlier artifact with the same name are cleared first.
    pub fn unpack_dir(&self, name: &str) -> io::Result<PathBuf> {
        let dir = self.run_dir.join("unpack").join(name);
        if dir.exists() {
            fs::remove_dir_all(&dir)?;
        }
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    pub fn path(&self) -> &Path {
        &self.run_dir
    }
}
