use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use regex::Regex;

// Header metadata is only ever looked for near the top of the file.
const HEAD_LINES: usize = 10;
const TAIL_LINES: usize = 10;

pub struct SchemeFile {
    pub path: PathBuf,
    pub size: u64,
    pub head: Vec<String>,
    pub tail: Vec<String>,
}

impl SchemeFile {
    pub fn load(path: &Path) -> io::Result<Self> {
        let bytes = fs::read(path)?;
        // Scheme files on vim.org predate UTF-8 discipline; decode lossily.
        let text = String::from_utf8_lossy(&bytes);
        let lines: Vec<&str> = text.lines().collect();

        let head = lines.iter().take(HEAD_LINES).map(|s| s.to_string()).collect();
        let tail = lines
            .iter()
            .skip(lines.len().saturating_sub(TAIL_LINES))
            .map(|s| s.to_string())
            .collect();

        Ok(Self {
            path: path.to_path_buf(),
            size: bytes.len() as u64,
            head,
            tail,
        })
    }

    // "Maintainer:" is the convention, but plenty of files only carry an
    // "Author" or "author" line. Label priority spans the whole head: a
    // "Maintainer:" on line 8 beats an "Author" on line 2.
    pub fn maintainer(&self) -> Option<String> {
        for label in ["Maintainer:", "Author", "author"] {
            for line in &self.head {
                if let Some(idx) = line.find(label) {
                    let rest = line[idx + label.len()..].trim();
                    if !rest.is_empty() {
                        return Some(rest.to_string());
                    }
                }
            }
        }
        None
    }

    pub fn year(&self) -> Option<String> {
        let year = Regex::new(r"20\d\d").unwrap();
        for label in ["Last Change:", "Last Modified:"] {
            for line in &self.head {
                if let Some(idx) = line.find(label) {
                    if let Some(m) = year.find(&line[idx + label.len()..]) {
                        return Some(m.as_str().to_string());
                    }
                }
            }
        }
        None
    }

    pub fn version(&self) -> Option<String> {
        for line in &self.head {
            if let Some(idx) = line.find("Version:") {
                if let Some(token) = line[idx + "Version:".len()..].split_whitespace().next() {
                    return Some(token.to_string());
                }
            }
        }
        for line in &self.head {
            if let Some(idx) = line.find("version") {
                if let Some(token) = line[idx + "version".len()..].split_whitespace().next() {
                    return Some(token.to_string());
                }
            }
        }
        let bare = Regex::new(r" (v\d+\.\S*)").unwrap();
        for line in &self.head {
            if let Some(caps) = bare.captures(line) {
                return Some(caps[1].to_string());
            }
        }
        None
    }
}
