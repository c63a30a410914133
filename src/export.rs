//! Bulk per-verse change extraction, for "changes since last notification"
//! reports and audits.
//!
//! A chapter pair is cut into per-verse texts and every differing verse is
//! written three ways: flat old/new text files in matching line order, an
//! HTML report of rendered diffs, and per-verse records for a change log.

use std::{
    collections::BTreeMap,
    fmt::Write as _,
    fs, io,
    path::{Path, PathBuf},
};

use thiserror::Error;

use crate::{
    render::{diff_html, escape},
    store::{ChangeLog, VerseChange},
    tokenizer::line_tokenizer::{split_lines, verse_range},
};

/// A chapter whose before and after USFM are both on record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterChange {
    pub book: String,
    pub chapter: u32,
    pub old_usfm: String,
    pub new_usfm: String,
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSummary {
    pub changed_verses: usize,
}

const OLD_FILE: &str = "verses_old.txt";
const NEW_FILE: &str = "verses_new.txt";
const REPORT_FILE: &str = "changed_verses.html";

/// Writes every changed verse of the given chapters into `output_dir`:
/// `verses_old.txt` and `verses_new.txt` in matching line order, plus a
/// `changed_verses.html` report of rendered diffs.
///
/// A verse spanning several logical lines is flattened to one line in the
/// flat files so the two stay line-aligned.
///
/// # Errors
///
/// [`ExportError::Write`] when any of the three files cannot be written.
pub fn export_verse_level(
    changes: &[ChapterChange],
    output_dir: &Path,
) -> Result<ExportSummary, ExportError> {
    let mut old_lines = String::new();
    let mut new_lines = String::new();
    let mut report = String::from(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\"/>\n\
         <title>Changed verses</title>\n</head>\n<body>\n",
    );

    let mut changed_verses = 0;
    for chapter in changes {
        for (verse, old, new) in changed_verse_texts(&chapter.old_usfm, &chapter.new_usfm) {
            changed_verses += 1;

            old_lines.push_str(&flatten(&old));
            old_lines.push('\n');
            new_lines.push_str(&flatten(&new));
            new_lines.push('\n');

            let _ = writeln!(
                report,
                "<h2>{} {}:{}</h2>\n<p>{}</p>",
                escape(&chapter.book),
                chapter.chapter,
                verse,
                diff_html(&old, &new).html
            );
        }
    }
    report.push_str("</body>\n</html>\n");

    write_file(output_dir.join(OLD_FILE), &old_lines)?;
    write_file(output_dir.join(NEW_FILE), &new_lines)?;
    write_file(output_dir.join(REPORT_FILE), &report)?;

    log::info!(
        "exported {} changed verse(s) from {} chapter(s) to {}",
        changed_verses,
        changes.len(),
        output_dir.display()
    );

    Ok(ExportSummary { changed_verses })
}

/// Feeds one chapter's changed verses into a change log, each verse
/// rendered as escaped old text, inline diff, and escaped new text.
pub fn log_chapter_changes(
    book: &str,
    chapter: u32,
    old_usfm: &str,
    new_usfm: &str,
    change_log: &mut dyn ChangeLog,
) {
    for (verse, old, new) in changed_verse_texts(old_usfm, new_usfm) {
        let rendered = diff_html(&old, &new);
        change_log.record(VerseChange {
            book: book.to_owned(),
            chapter,
            verse,
            old_html: escape(&old),
            diff_html: rendered.html,
            new_html: escape(&new),
        });
    }
}

/// The verses whose text differs between the two chapter versions, in
/// verse order. A verse missing on one side compares against the empty
/// string.
fn changed_verse_texts(old_usfm: &str, new_usfm: &str) -> Vec<(u32, String, String)> {
    let old_verses = verse_texts(old_usfm);
    let new_verses = verse_texts(new_usfm);

    let mut verses: Vec<u32> = old_verses.keys().chain(new_verses.keys()).copied().collect();
    verses.sort_unstable();
    verses.dedup();

    verses
        .into_iter()
        .filter_map(|verse| {
            let old = old_verses.get(&verse).cloned().unwrap_or_default();
            let new = new_verses.get(&verse).cloned().unwrap_or_default();
            (old != new).then_some((verse, old, new))
        })
        .collect()
}

/// Cuts a chapter into per-verse texts. Verse 0 holds everything before the
/// first verse marker; a combined range is keyed by its first verse.
fn verse_texts(usfm: &str) -> BTreeMap<u32, String> {
    let mut result = BTreeMap::new();
    let mut current_verse = 0;

    for line in split_lines(usfm) {
        if let Some((from, _)) = verse_range(&line) {
            current_verse = from;
        }
        let entry: &mut String = result.entry(current_verse).or_default();
        if !entry.is_empty() {
            entry.push('\n');
        }
        entry.push_str(&line);
    }

    result
}

fn flatten(verse: &str) -> String { verse.replace('\n', " ") }

fn write_file(path: PathBuf, contents: &str) -> Result<(), ExportError> {
    fs::write(&path, contents).map_err(|source| ExportError::Write { path, source })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::store::MemoryChangeLog;

    #[test]
    fn test_verse_texts_keys_intro_as_zero() {
        let verses = verse_texts("\\c 1\n\\p\n\\v 1 first\n\\v 2-3 combined\nmore of it");
        assert_eq!(verses.len(), 3);
        assert_eq!(verses[&0], "\\c 1\n\\p");
        assert_eq!(verses[&1], "\\v 1 first");
        assert_eq!(verses[&2], "\\v 2-3 combined\nmore of it");
    }

    #[test]
    fn test_changed_verse_texts_reports_only_differences() {
        let old = "\\c 1\n\\v 1 same\n\\v 2 old wording";
        let new = "\\c 1\n\\v 1 same\n\\v 2 new wording\n\\v 3 appended";
        assert_eq!(
            changed_verse_texts(old, new),
            vec![
                (
                    2,
                    "\\v 2 old wording".to_owned(),
                    "\\v 2 new wording".to_owned()
                ),
                (3, String::new(), "\\v 3 appended".to_owned()),
            ]
        );
    }

    #[test]
    fn test_export_writes_aligned_files_and_report() {
        let output_dir = tempfile::tempdir().unwrap();
        let changes = vec![ChapterChange {
            book: "Genesis".to_owned(),
            chapter: 1,
            old_usfm: "\\c 1\n\\v 1 Old text\n\\v 2 stays".to_owned(),
            new_usfm: "\\c 1\n\\v 1 New text\n\\v 2 stays".to_owned(),
        }];

        let summary = export_verse_level(&changes, output_dir.path()).unwrap();
        assert_eq!(summary.changed_verses, 1);

        let old = fs::read_to_string(output_dir.path().join(OLD_FILE)).unwrap();
        let new = fs::read_to_string(output_dir.path().join(NEW_FILE)).unwrap();
        assert_eq!(old, "\\v 1 Old text\n");
        assert_eq!(new, "\\v 1 New text\n");

        let report = fs::read_to_string(output_dir.path().join(REPORT_FILE)).unwrap();
        assert!(report.contains("<h2>Genesis 1:1</h2>"));
        assert!(report.contains("line-through"));
        assert!(report.contains("Old"));
    }

    #[test]
    fn test_export_to_missing_directory_fails_with_path() {
        let output_dir = tempfile::tempdir().unwrap();
        let missing = output_dir.path().join("nowhere");

        let error = export_verse_level(&[], &missing).unwrap_err();
        let ExportError::Write { path, .. } = error;
        assert_eq!(path, missing.join(OLD_FILE));
    }

    #[test]
    fn test_change_log_receives_rendered_verses() {
        let mut change_log = MemoryChangeLog::new();
        log_chapter_changes(
            "Genesis",
            1,
            "\\v 1 Old text",
            "\\v 1 New text",
            &mut change_log,
        );

        let changes = change_log.changes();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].book, "Genesis");
        assert_eq!(changes[0].chapter, 1);
        assert_eq!(changes[0].verse, 1);
        assert_eq!(changes[0].old_html, "\\v 1 Old text");
        assert!(changes[0].diff_html.contains("font-weight: bold"));
        assert_eq!(changes[0].new_html, "\\v 1 New text");
    }
}
