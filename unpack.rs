use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::Command;

use bzip2::read::BzDecoder;
use flate2::read::GzDecoder;
use log::debug;
use tar::Archive;
use walkdir::WalkDir;
use zip::ZipArchive;

use crate::error::{Error, Result};

// Plugin directories that never hold color schemes; files under these are
// dropped rather than merged.
const SKIP_DIRS: &[&str] = &["syntax", "autoload", "plugin", "after", "indent", "ftplugin"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArchiveKind {
    Zip,
    TarGz,
    TarBz2,
    Gz,
    Rar,
    Vimball,
}

pub fn detect_kind(name: &str) -> Option<ArchiveKind> {
    let lower = name.to_ascii_lowercase();
    if lower.ends_with(".zip") {
        Some(ArchiveKind::Zip)
    } else if lower.ends_with(".tar.gz") || lower.ends_with(".tgz") {
        Some(ArchiveKind::TarGz)
    } else if lower.ends_with(".tar.bz2") || lower.ends_with(".tbz2") {
        Some(ArchiveKind::TarBz2)
    } else if lower.ends_with(".vba")
        || lower.ends_with(".vmb")
        || lower.ends_with(".vba.gz")
        || lower.ends_with(".vmb.gz")
    {
        Some(ArchiveKind::Vimball)
    } else if lower.ends_with(".gz") {
        Some(ArchiveKind::Gz)
    } else if lower.ends_with(".rar") {
        Some(ArchiveKind::Rar)
    } else {
        None
    }
}

pub fn unpack(archive: &Path, kind: ArchiveKind, dest: &Path) -> Result<()> {
    fs::create_dir_all(dest)?;
    match kind {
        ArchiveKind::Zip => unpack_zip(archive, dest),
        ArchiveKind::TarGz => {
            let file = File::open(archive)?;
            Archive::new(GzDecoder::new(file))
                .unpack(dest)
                .map_err(|e| unpack_error(archive, e))
        }
        ArchiveKind::TarBz2 => {
            let file = File::open(archive)?;
            Archive::new(BzDecoder::new(file))
                .unpack(dest)
                .map_err(|e| unpack_error(archive, e))
        }
        ArchiveKind::Gz => unpack_gz(archive, dest),
        ArchiveKind::Rar => unpack_rar(archive, dest),
        ArchiveKind::Vimball => unpack_vimball(archive, dest),
    }
}

// Every .vim file from the extraction, except those inside known
// non-color-scheme plugin directories. Files under colors/ and at the
// archive root always qualify.
pub fn collect_candidates(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_candidate(root, path))
        .collect();
    files.sort();
    files
}

fn is_candidate(root: &Path, path: &Path) -> bool {
    if path.extension().and_then(|e| e.to_str()) != Some("vim") {
        return false;
    }
    let rel = match path.strip_prefix(root) {
        Ok(rel) => rel,
        Err(_) => return false,
    };
    !rel.components()
        .any(|c| SKIP_DIRS.contains(&c.as_os_str().to_str().unwrap_or("")))
}

fn unpack_error(archive: &Path, e: impl std::fmt::Display) -> Error {
    Error::Unpack {
        path: archive.to_path_buf(),
        message: e.to_string(),
    }
}

fn unpack_zip(archive: &Path, dest: &Path) -> Result<()> {
    let file = File::open(archive)?;
    let mut zip = ZipArchive::new(file).map_err(|e| unpack_error(archive, e))?;

    for i in 0..zip.len() {
        let mut entry = zip.by_index(i).map_err(|e| unpack_error(archive, e))?;
        let outpath = dest.join(entry.mangled_name());
        if entry.name().ends_with('/') {
            fs::create_dir_all(&outpath)?;
        } else {
            if let Some(parent) = outpath.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut outfile = File::create(&outpath)?;
            io::copy(&mut entry, &mut outfile)?;
        }
    }
    debug!("unpacked {} zip entries from {}", zip.len(), archive.display());
    Ok(())
}

// A bare gzip member holds exactly one file; it keeps the archive name
// minus the .gz suffix.
fn unpack_gz(archive: &Path, dest: &Path) -> Result<()> {
    let name = archive
        .file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.trim_end_matches(".gz").to_string())
        .unwrap_or_else(|| "unnamed.vim".to_string());

    let file = File::open(archive)?;
    let mut decoder = GzDecoder::new(file);
    let mut contents = Vec::new();
    decoder
        .read_to_end(&mut contents)
        .map_err(|e| unpack_error(archive, e))?;
    fs::write(dest.join(name), contents)?;
    Ok(())
}

// rar stays external; there is no maintained native decoder worth carrying.
fn unpack_rar(archive: &Path, dest: &Path) -> Result<()> {
    let status = Command::new("unrar")
        .arg("x")
        .arg("-y")
        .arg("-idq")
        .arg(archive)
        .arg(format!("{}/", dest.display()))
        .status()
        .map_err(|e| unpack_error(archive, format!("unrar unavailable: {}", e)))?;

    if status.success() {
        Ok(())
    } else {
        Err(unpack_error(archive, format!("unrar exited with {}", status)))
    }
}

// Vimball is a plain-text bundle: after a "finish" preamble, each member is
// announced by a `<path>\t[[[1` line followed by a line count and that many
// content lines.
fn unpack_vimball(archive: &Path, dest: &Path) -> Result<()> {
    let bytes = fs::read(archive)?;
    let text = if archive
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("gz"))
        .unwrap_or(false)
    {
        let mut decoder = GzDecoder::new(&bytes[..]);
        let mut out = String::new();
        decoder
            .read_to_string(&mut out)
            .map_err(|e| unpack_error(archive, e))?;
        out
    } else {
        String::from_utf8_lossy(&bytes).into_owned()
    };

    let mut members = 0;
    let mut lines = text.lines();
    while let Some(line) = lines.next() {
        let header = match line.strip_suffix("[[[1") {
            Some(header) => header.trim_end(),
            None => continue,
        };
        let count = match lines.next().and_then(|c| c.trim().parse::<usize>().ok()) {
            Some(count) => count,
            None => continue,
        };

        let mut contents = String::new();
        for _ in 0..count {
            match lines.next() {
                Some(body) => {
                    contents.push_str(body);
                    contents.push('\n');
                }
                None => break,
            }
        }

        let rel = Path::new(header);
        if rel.is_absolute() || rel.components().any(|c| c.as_os_str() == "..") {
            debug!("skipping unsafe vimball member {}", header);
            continue;
        }
        let out = dest.join(rel);
        if let Some(parent) = out.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(out, contents)?;
        members += 1;
    }

    if members == 0 {
        return Err(unpack_error(archive, "no vimball members found"));
    }
    debug!("unpacked {} vimball members from {}", members, archive.display());
    Ok(())
}
