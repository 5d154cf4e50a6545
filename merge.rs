use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::classify::{resolve, same_scheme, Loser};
use crate::error::{Error, Result};
use crate::scheme::SchemeFile;

// A scheme may occupy the primary name plus four numbered overflow names.
pub const VARIANT_SLOTS: usize = 5;

#[derive(Debug, PartialEq, Eq)]
pub enum MergeOutcome {
    // Written into a previously vacant slot.
    Placed(PathBuf),
    // An obsolete occupant was overwritten in place.
    Replaced(PathBuf),
    // Byte-identical copy already present; incoming discarded.
    Identical,
}

fn slot_path(target: &Path, base: &str, index: usize) -> PathBuf {
    if index == 0 {
        target.join(format!("{}.vim", base))
    } else {
        target.join(format!("{}_{}.vim", base, index))
    }
}

// Walks the ordered variant slots for `base` and settles the incoming file
// into the first one it can claim: a vacant slot, a byte-identical copy, or
// an occupant the resolution policy judges obsolete. Anything else advances
// to the next slot. Exhausting all slots leaves the target directory
// untouched and the incoming file where it was staged.
pub fn merge_scheme(incoming: &Path, base: &str, target: &Path) -> Result<MergeOutcome> {
    let incoming_bytes = fs::read(incoming)?;
    let candidate = SchemeFile::load(incoming)?;
    let mut ambiguous = false;

    for index in 0..VARIANT_SLOTS {
        let slot = slot_path(target, base, index);
        if !slot.exists() {
            fs::write(&slot, &incoming_bytes)?;
            debug!("placed {} as {}", incoming.display(), slot.display());
            return Ok(MergeOutcome::Placed(slot));
        }

        let occupant_bytes = fs::read(&slot)?;
        if occupant_bytes == incoming_bytes {
            debug!("{} already present as {}", incoming.display(), slot.display());
            return Ok(MergeOutcome::Identical);
        }

        let occupant = SchemeFile::load(&slot)?;
        if same_scheme(&occupant, &candidate) {
            match resolve(&occupant, &candidate) {
                Some(Loser::First) => {
                    fs::write(&slot, &incoming_bytes)?;
                    info!("replaced stale {}", slot.display());
                    return Ok(MergeOutcome::Replaced(slot));
                }
                Some(Loser::Second) => {
                    // The incoming file lost, but a fresher copy of it may
                    // still be sitting in a later slot; keep walking.
                    debug!(
                        "{} is older than {}",
                        candidate.path.display(),
                        occupant.path.display()
                    );
                }
                None => {
                    ambiguous = true;
                    debug!(
                        "no winner between {} and {}",
                        candidate.path.display(),
                        occupant.path.display()
                    );
                }
            }
        }
    }

    if ambiguous {
        Err(Error::MergeAmbiguous { base: base.to_string() })
    } else {
        Err(Error::MergeSlotsExhausted { base: base.to_string() })
    }
}

// Post-ingestion sweep over every `<base>_1.vim` that has a primary. Slots
// filled mid-run may only become resolvable once both competitors are fully
// on disk, so each `_1` is re-judged against its primary here. Primaries
// are never deleted. Safe to run any number of times.
pub fn resolve_pass(target: &Path) -> io::Result<usize> {
    let mut names: Vec<String> = Vec::new();
    for entry in fs::read_dir(target)? {
        let entry = entry?;
        if let Some(name) = entry.file_name().to_str() {
            if name.ends_with("_1.vim") {
                names.push(name.to_string());
            }
        }
    }
    names.sort();

    let mut removed = 0;
    for name in names {
        let base = &name[..name.len() - "_1.vim".len()];
        let variant = target.join(&name);
        let primary = slot_path(target, base, 0);
        if !primary.exists() {
            continue;
        }

        if fs::read(&primary)? == fs::read(&variant)? {
            fs::remove_file(&variant)?;
            info!("removed exact duplicate {}", variant.display());
            removed += 1;
            continue;
        }

        let first = SchemeFile::load(&primary)?;
        let second = SchemeFile::load(&variant)?;
        if same_scheme(&first, &second) && resolve(&first, &second) == Some(Loser::Second) {
            fs::remove_file(&variant)?;
            info!("removed stale variant {}", variant.display());
            removed += 1;
        }
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn incoming_lands_in_empty_directory() {
        let target = tempdir().unwrap();
        let staging = tempdir().unwrap();
        let incoming = write(staging.path(), "desert.vim", "\" desert\nhi Normal\n");

        let outcome = merge_scheme(&incoming, "desert", target.path()).unwrap();
        assert_eq!(
            outcome,
            MergeOutcome::Placed(target.path().join("desert.vim"))
        );
        assert_eq!(
            fs::read_to_string(target.path().join("desert.vim")).unwrap(),
            "\" desert\nhi Normal\n"
        );
        assert_eq!(fs::read_dir(target.path()).unwrap().count(), 1);
    }

    #[test]
    fn merging_identical_bytes_twice_is_a_noop() {
        let target = tempdir().unwrap();
        let staging = tempdir().unwrap();
        let incoming = write(staging.path(), "desert.vim", "\" desert\nhi Normal\n");

        merge_scheme(&incoming, "desert", target.path()).unwrap();
        let outcome = merge_scheme(&incoming, "desert", target.path()).unwrap();
        assert_eq!(outcome, MergeOutcome::Identical);
        assert_eq!(fs::read_dir(target.path()).unwrap().count(), 1);
    }

    #[test]
    fn newer_version_overwrites_primary() {
        let target = tempdir().unwrap();
        let staging = tempdir().unwrap();
        write(
            target.path(),
            "desert.vim",
            "\" Maintainer: Foo Bar\n\" Version: 1.0\nhi Normal guibg=black\n",
        );
        let incoming = write(
            staging.path(),
            "desert.vim",
            "\" Maintainer: Foo Bar\n\" Version: 2.0\nhi Normal guibg=grey20\n",
        );

        let outcome = merge_scheme(&incoming, "desert", target.path()).unwrap();
        assert_eq!(
            outcome,
            MergeOutcome::Replaced(target.path().join("desert.vim"))
        );
        let kept = fs::read_to_string(target.path().join("desert.vim")).unwrap();
        assert!(kept.contains("Version: 2.0"));
        assert!(!target.path().join("desert_1.vim").exists());
    }

    #[test]
    fn older_version_slides_into_next_slot() {
        let target = tempdir().unwrap();
        let staging = tempdir().unwrap();
        write(
            target.path(),
            "desert.vim",
            "\" Maintainer: Foo Bar\n\" Version: 2.0\nnew body\n",
        );
        let incoming = write(
            staging.path(),
            "desert.vim",
            "\" Maintainer: Foo Bar\n\" Version: 1.0\nold body\n",
        );

        let outcome = merge_scheme(&incoming, "desert", target.path()).unwrap();
        assert_eq!(
            outcome,
            MergeOutcome::Placed(target.path().join("desert_1.vim"))
        );
        let primary = fs::read_to_string(target.path().join("desert.vim")).unwrap();
        assert!(primary.contains("Version: 2.0"));
    }

    #[test]
    fn unrelated_file_with_same_name_becomes_variant() {
        let target = tempdir().unwrap();
        let staging = tempdir().unwrap();
        write(target.path(), "desert.vim", "\" original desert\nfoo\nbar\n");
        let incoming = write(
            staging.path(),
            "desert.vim",
            "\" a totally different scheme\nbaz\nquux\nzot\n",
        );

        let outcome = merge_scheme(&incoming, "desert", target.path()).unwrap();
        assert_eq!(
            outcome,
            MergeOutcome::Placed(target.path().join("desert_1.vim"))
        );
        assert_eq!(
            fs::read_to_string(target.path().join("desert.vim")).unwrap(),
            "\" original desert\nfoo\nbar\n"
        );
    }

    #[test]
    fn exhausted_slots_report_an_error_and_change_nothing() {
        let target = tempdir().unwrap();
        let staging = tempdir().unwrap();
        // Five occupants, all unrelated to the incoming file and to each
        // other beyond their shared base name.
        for (i, name) in ["foo.vim", "foo_1.vim", "foo_2.vim", "foo_3.vim", "foo_4.vim"]
            .iter()
            .enumerate()
        {
            let body: String = (0..12).map(|n| format!("occupant {} line {}\n", i, n)).collect();
            write(target.path(), name, &body);
        }
        let incoming_body: String = (0..12).map(|n| format!("incoming line {}\n", n)).collect();
        let incoming = write(staging.path(), "foo.vim", &incoming_body);

        let err = merge_scheme(&incoming, "foo", target.path()).unwrap_err();
        assert!(matches!(err, Error::MergeSlotsExhausted { .. }));
        assert_eq!(fs::read_dir(target.path()).unwrap().count(), 5);
        assert!(incoming.exists());
    }

    #[test]
    fn ambiguous_same_scheme_collisions_are_reported_as_such() {
        let target = tempdir().unwrap();
        let staging = tempdir().unwrap();
        // Every occupant claims the same maintainer and version as the
        // incoming file, so the policy can never pick a winner.
        for (i, name) in ["foo.vim", "foo_1.vim", "foo_2.vim", "foo_3.vim", "foo_4.vim"]
            .iter()
            .enumerate()
        {
            let body = format!(
                "\" Maintainer: Foo Bar <foo@bar.net>\n\" Version: 1.0\nbody {}\n",
                i
            );
            write(target.path(), name, &body);
        }
        let incoming = write(
            staging.path(),
            "foo.vim",
            "\" Maintainer: Foo Bar <foo@bar.net>\n\" Version: 1.0\nincoming body\n",
        );

        let err = merge_scheme(&incoming, "foo", target.path()).unwrap_err();
        assert!(matches!(err, Error::MergeAmbiguous { .. }));
        assert_eq!(fs::read_dir(target.path()).unwrap().count(), 5);
    }

    #[test]
    fn resolve_pass_removes_stale_first_variant() {
        let target = tempdir().unwrap();
        write(
            target.path(),
            "bar.vim",
            "\" Maintainer: Ann Example\n\" Last Change: 2010\nnewer\n",
        );
        write(
            target.path(),
            "bar_1.vim",
            "\" Maintainer: Ann Example\n\" Last Change: 2008\nolder\n",
        );

        let removed = resolve_pass(target.path()).unwrap();
        assert_eq!(removed, 1);
        assert!(target.path().join("bar.vim").exists());
        assert!(!target.path().join("bar_1.vim").exists());
    }

    #[test]
    fn resolve_pass_keeps_variant_when_primary_is_older() {
        let target = tempdir().unwrap();
        write(
            target.path(),
            "bar.vim",
            "\" Maintainer: Ann Example\n\" Last Change: 2008\nolder\n",
        );
        write(
            target.path(),
            "bar_1.vim",
            "\" Maintainer: Ann Example\n\" Last Change: 2010\nnewer\n",
        );

        let removed = resolve_pass(target.path()).unwrap();
        // The pass never deletes a primary, even a stale one.
        assert_eq!(removed, 0);
        assert!(target.path().join("bar.vim").exists());
        assert!(target.path().join("bar_1.vim").exists());
    }

    #[test]
    fn resolve_pass_is_idempotent() {
        let target = tempdir().unwrap();
        write(
            target.path(),
            "bar.vim",
            "\" Maintainer: Ann Example\n\" Last Change: 2010\nnewer\n",
        );
        write(
            target.path(),
            "bar_1.vim",
            "\" Maintainer: Ann Example\n\" Last Change: 2008\nolder\n",
        );

        assert_eq!(resolve_pass(target.path()).unwrap(), 1);
        assert_eq!(resolve_pass(target.path()).unwrap(), 0);
    }

    #[test]
    fn resolve_pass_ignores_orphan_variants() {
        let target = tempdir().unwrap();
        write(target.path(), "lonely_1.vim", "\" no primary\n");

        assert_eq!(resolve_pass(target.path()).unwrap(), 0);
        assert!(target.path().join("lonely_1.vim").exists());
    }
}
