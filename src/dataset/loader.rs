//! BBQ dataset loader.
//!
//! Flow:
//! category name → category files → raw rows → question entries → dataset

use super::raw::{CHOICE_COUNT, RawRecord, UnknownLookup, clean_choice_text};
use crate::models::{
    AnswerType, BbqAnnotations, BiasbenchError, Category, Choice, DatasetMetadata,
    QuestionAnsweringDataset, QuestionEntry, Result,
};
use indicatif::ProgressBar;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Reads BBQ category files from a root directory.
#[derive(Debug, Clone)]
pub struct BbqLoader {
    root: PathBuf,
}

impl BbqLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of a category's source file.
    pub fn category_path(&self, category: Category) -> PathBuf {
        self.root.join(category.file_name())
    }

    /// Load one category, or every category when `category` is `None`.
    pub fn fetch(&self, category: Option<&str>) -> Result<QuestionAnsweringDataset> {
        self.fetch_with_progress(category, &ProgressBar::hidden())
    }

    /// Like [`fetch`](Self::fetch), advancing `pb` by one per loaded file.
    pub fn fetch_with_progress(
        &self,
        category: Option<&str>,
        pb: &ProgressBar,
    ) -> Result<QuestionAnsweringDataset> {
        let categories = Category::select(category)?;
        pb.set_length(categories.len() as u64);

        let mut questions = Vec::new();
        for category in categories {
            pb.set_message(category.name());
            let entries = self.load_category(category)?;
            questions.extend(entries);
            pb.inc(1);
        }
        pb.finish_with_message(format!("{} questions", questions.len()));

        info!(
            root = %self.root.display(),
            count = questions.len(),
            "Loaded BBQ dataset"
        );
        Ok(QuestionAnsweringDataset::new(DatasetMetadata::bbq(), questions))
    }

    /// Load every row of a single category file.
    pub fn load_category(&self, category: Category) -> Result<Vec<QuestionEntry>> {
        let path = self.category_path(category);
        let file = File::open(&path)
            .map_err(|e| BiasbenchError::io(format!("opening {}", path.display()), e))?;
        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line =
                line.map_err(|e| BiasbenchError::io(format!("reading {}", path.display()), e))?;
            if line.trim().is_empty() {
                continue;
            }
            let raw: RawRecord =
                serde_json::from_str(&line).map_err(|e| BiasbenchError::Parse {
                    file: path.clone(),
                    line: line_num + 1,
                    message: e.to_string(),
                })?;
            entries.push(build_entry(raw, category, &path, line_num + 1)?);
        }

        info!(category = %category, count = entries.len(), "Loaded category");
        Ok(entries)
    }
}

/// Load a dataset from `root`. See [`BbqLoader::fetch`].
pub fn fetch_bbq_dataset(category: Option<&str>, root: &Path) -> Result<QuestionAnsweringDataset> {
    BbqLoader::new(root).fetch(category)
}

/// Reshape one raw row into a question entry.
fn build_entry(raw: RawRecord, category: Category, file: &Path, line: usize) -> Result<QuestionEntry> {
    let invalid = |reason: String| BiasbenchError::InvalidRecord {
        file: file.to_path_buf(),
        line,
        reason,
    };

    let choices: Vec<Choice> = raw
        .answers()
        .iter()
        .enumerate()
        .map(|(index, text)| Choice::new(index, clean_choice_text(text)))
        .collect();

    let unknown_answer = match raw.unknown_answer() {
        UnknownLookup::Found(index) => index,
        UnknownLookup::Missing => {
            debug!(file = %file.display(), line, "answer_info has no unknown tag");
            return Err(BiasbenchError::MissingUnknownAnswer {
                file: file.to_path_buf(),
                line,
            });
        }
        UnknownLookup::Ambiguous(indices) => {
            return Err(invalid(format!(
                "several choices are marked unknown: {indices:?}"
            )));
        }
        UnknownLookup::BadKey(key) => {
            return Err(invalid(format!(
                "answer_info key '{key}' does not name a choice"
            )));
        }
    };

    let example_id = raw
        .example_id
        .to_i64()
        .ok_or_else(|| invalid(format!("example_id is not an integer: {:?}", raw.example_id)))?;

    let correct_answer = raw
        .label
        .to_i64()
        .and_then(|l| usize::try_from(l).ok())
        .filter(|l| *l < CHOICE_COUNT)
        .ok_or_else(|| invalid(format!("label is not a choice index: {:?}", raw.label)))?;

    let mut bbq = BbqAnnotations::new(correct_answer, unknown_answer, example_id, category);
    bbq.context_condition = raw.context_condition.clone();
    bbq.question_polarity = raw.question_polarity.clone();

    Ok(QuestionEntry {
        question: raw.question_text(),
        answer_type: AnswerType::Int,
        correct_answer,
        choices,
        bbq: Some(bbq),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn row(example_id: i64, answers: [&str; 3], unknown: usize, label: usize) -> String {
        let mut info = serde_json::Map::new();
        for i in 0..3 {
            let tag = if i == unknown { "unknown" } else { "lab" };
            info.insert(format!("ans{i}"), serde_json::json!([answers[i], tag]));
        }
        serde_json::json!({
            "example_id": example_id,
            "context_condition": "ambig",
            "question_polarity": "neg",
            "context": "A context.",
            "question": "A question?",
            "ans0": answers[0],
            "ans1": answers[1],
            "ans2": answers[2],
            "answer_info": info,
            "label": label,
        })
        .to_string()
    }

    fn write_category(dir: &TempDir, category: Category, rows: &[String]) {
        fs::write(dir.path().join(category.file_name()), rows.join("\n") + "\n").unwrap();
    }

    fn full_root() -> TempDir {
        let dir = TempDir::new().unwrap();
        for (i, category) in Category::ALL.iter().enumerate() {
            let rows = vec![
                row(0, ["one", "two", "Unknown"], 2, i % 3),
                row(1, ["Not known", "three", "four"], 0, 1),
            ];
            write_category(&dir, *category, &rows);
        }
        dir
    }

    #[test]
    fn test_example_row() {
        let dir = TempDir::new().unwrap();
        write_category(
            &dir,
            Category::GenderIdentity,
            &[row(12, ["cat.", "dog", "unknown"], 2, 2)],
        );

        let ds = fetch_bbq_dataset(Some("gender_identity"), dir.path()).unwrap();
        assert_eq!(ds.len(), 1);

        let entry = &ds.questions[0];
        assert_eq!(
            entry.choices,
            vec![
                Choice::new(0, "cat"),
                Choice::new(1, "dog"),
                Choice::new(2, "unknown"),
            ]
        );
        assert_eq!(entry.correct_answer, 2);
        assert_eq!(entry.question, "A context. A question?");
        assert_eq!(entry.answer_type, AnswerType::Int);

        let bbq = entry.bbq.as_ref().unwrap();
        assert_eq!(bbq.unknown_answer, 2);
        assert_eq!(bbq.example_id, 12);
        assert!(bbq.correct_answer_unknown);
        assert_eq!(bbq.category, Category::GenderIdentity);
        assert_eq!(bbq.context_condition.as_deref(), Some("ambig"));
        assert_eq!(bbq.question_polarity.as_deref(), Some("neg"));
    }

    #[test]
    fn test_single_category_only_reads_its_file() {
        let dir = full_root();
        let ds = BbqLoader::new(dir.path()).fetch(Some("religion")).unwrap();
        assert_eq!(ds.len(), 2);
        assert!(
            ds.questions
                .iter()
                .all(|q| q.bbq.as_ref().unwrap().category == Category::Religion)
        );
    }

    #[test]
    fn test_all_categories_loaded_once_in_order() {
        let dir = full_root();
        let ds = BbqLoader::new(dir.path()).fetch(None).unwrap();
        assert_eq!(ds.len(), 20);

        let categories: Vec<Category> = ds
            .questions
            .iter()
            .map(|q| q.bbq.as_ref().unwrap().category)
            .collect();
        for (i, category) in Category::ALL.iter().enumerate() {
            assert_eq!(&categories[i * 2..i * 2 + 2], &[*category, *category]);
        }
        assert_eq!(ds.metadata.source, "https://github.com/nyu-mll/BBQ");
    }

    #[test]
    fn test_entry_invariants() {
        let dir = full_root();
        let ds = BbqLoader::new(dir.path()).fetch(None).unwrap();
        for entry in &ds.questions {
            let indices: Vec<usize> = entry.choices.iter().map(|c| c.index).collect();
            assert_eq!(indices, vec![0, 1, 2]);

            let bbq = entry.bbq.as_ref().unwrap();
            assert!(bbq.unknown_answer < 3);
            assert!(entry.correct_answer < 3);
            assert_eq!(
                bbq.correct_answer_unknown,
                entry.correct_answer == bbq.unknown_answer
            );
        }
        assert_eq!(ds.questions[1].bbq.as_ref().unwrap().unknown_answer, 0);
    }

    #[test]
    fn test_invalid_category() {
        let dir = TempDir::new().unwrap();
        let err = fetch_bbq_dataset(Some("foo"), dir.path()).unwrap_err();
        assert!(matches!(err, BiasbenchError::InvalidCategory { .. }));
        let message = err.to_string();
        assert!(message.starts_with("Invalid parameter: foo."));
        assert!(message.contains("sexual_orientation"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = fetch_bbq_dataset(Some("age"), dir.path()).unwrap_err();
        match err {
            BiasbenchError::Io { context, source } => {
                assert!(context.contains("Age.jsonl"));
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_unknown_marker_fails_loudly() {
        let dir = TempDir::new().unwrap();
        let no_marker = serde_json::json!({
            "example_id": 5, "context": "c", "question": "q",
            "ans0": "a", "ans1": "b", "ans2": "c", "label": 1,
            "answer_info": {"ans0": ["a", "x"], "ans1": ["b", "y"], "ans2": ["c", "z"]}
        })
        .to_string();
        write_category(
            &dir,
            Category::Age,
            &[row(4, ["a", "b", "c"], 1, 1), no_marker],
        );

        let err = fetch_bbq_dataset(Some("age"), dir.path()).unwrap_err();
        assert!(err.is_row_error());
        match err {
            BiasbenchError::MissingUnknownAnswer { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_blank_lines_skipped_and_parse_errors_located() {
        let dir = TempDir::new().unwrap();
        write_category(
            &dir,
            Category::Ses,
            &[row(0, ["a", "b", "c"], 2, 0), String::new(), "{not json".into()],
        );

        let err = fetch_bbq_dataset(Some("SES"), dir.path()).unwrap_err();
        match err {
            BiasbenchError::Parse { file, line, .. } => {
                assert_eq!(line, 3);
                assert!(file.ends_with("SES.jsonl"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_label_out_of_range() {
        let dir = TempDir::new().unwrap();
        write_category(&dir, Category::Nationality, &[row(0, ["a", "b", "c"], 2, 3)]);
        let err = fetch_bbq_dataset(Some("nationality"), dir.path()).unwrap_err();
        assert!(matches!(err, BiasbenchError::InvalidRecord { line: 1, .. }));
    }

    #[test]
    fn test_progress_bar_counts_files() {
        let dir = full_root();
        let pb = ProgressBar::hidden();
        BbqLoader::new(dir.path())
            .fetch_with_progress(None, &pb)
            .unwrap();
        assert_eq!(pb.position(), 10);
        assert_eq!(pb.length(), Some(10));
    }
}
