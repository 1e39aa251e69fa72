//! Implements DatasetPort. Loads report collections from CSV files with the `csv` crate.
//!
//! Every `*.csv` under the root directory (recursively) becomes one dataset named
//! after its file stem. Rows need `title` and `text` columns; others are ignored.

use crate::domain::{Dataset, DomainError, Report};
use crate::ports::DatasetPort;
use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

/// Parse report rows from CSV input with a header line.
pub fn reports_from_csv<R: Read>(input: R) -> Result<Vec<Report>, csv::Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);
    let rows: Result<Vec<Report>, csv::Error> = rdr.deserialize().collect();
    rows
}

fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// `<dir>/<stem>` with `dir` the parent directory name; just the stem for files at the root.
fn dir_and_stem(root: &Path, path: &Path) -> String {
    match path.parent().filter(|p| *p != root).and_then(Path::file_name) {
        Some(dir) => format!("{}/{}", dir.to_string_lossy(), stem(path)),
        None => stem(path),
    }
}

/// Path relative to `root` without extension, `/`-joined.
fn relative_name(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .with_extension("")
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

fn counts(names: &[String]) -> HashMap<&str, usize> {
    let mut counts = HashMap::new();
    for name in names {
        *counts.entry(name.as_str()).or_insert(0) += 1;
    }
    counts
}

/// Dataset names for a list of CSV paths under `root`.
///
/// The file stem is used unless two files share it; those get the parent
/// directory name as a prefix (`<dir>/<stem>`). If that still collides, the
/// full path relative to `root` is used.
fn dataset_names(root: &Path, paths: &[PathBuf]) -> Vec<String> {
    let stems: Vec<String> = paths.iter().map(|p| stem(p)).collect();
    let prefixed: Vec<String> = paths.iter().map(|p| dir_and_stem(root, p)).collect();
    let stem_counts = counts(&stems);
    let prefixed_counts = counts(&prefixed);

    paths
        .iter()
        .enumerate()
        .map(|(i, path)| {
            if stem_counts[stems[i].as_str()] == 1 {
                stems[i].clone()
            } else if prefixed_counts[prefixed[i].as_str()] == 1 {
                prefixed[i].clone()
            } else {
                relative_name(root, path)
            }
        })
        .collect()
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}

/// Walk `root` and load every CSV file. Unreadable files are skipped with a warning.
pub fn load_tree(root: &Path) -> Result<Vec<Dataset>, DomainError> {
    if !root.is_dir() {
        return Err(DomainError::Dataset(format!(
            "datasets directory not found: {}",
            root.display()
        )));
    }

    let mut paths: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
                None
            }
        })
        .filter(|e| e.file_type().is_file() && is_csv(e.path()))
        .map(|e| e.into_path())
        .collect();
    paths.sort();

    let names = dataset_names(root, &paths);
    let mut datasets = Vec::with_capacity(paths.len());
    for (path, name) in paths.into_iter().zip(names) {
        let file = match std::fs::File::open(&path) {
            Ok(f) => f,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot open dataset");
                continue;
            }
        };
        match reports_from_csv(file) {
            Ok(reports) => {
                info!(dataset = %name, reports = reports.len(), "loaded dataset");
                datasets.push(Dataset {
                    name,
                    path,
                    reports,
                });
            }
            Err(e) => warn!(path = %path.display(), error = %e, "invalid dataset, skipping"),
        }
    }
    datasets.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(datasets)
}

/// CSV dataset source rooted at one directory tree.
pub struct CsvDatasetRepo {
    root: PathBuf,
}

impl CsvDatasetRepo {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

#[async_trait::async_trait]
impl DatasetPort for CsvDatasetRepo {
    async fn load_datasets(&self) -> Result<Vec<Dataset>, DomainError> {
        let root = self.root.clone();
        tokio::task::spawn_blocking(move || load_tree(&root))
            .await
            .map_err(|e| DomainError::Dataset(format!("dataset loader panicked: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reports_from_csv_ignores_extra_columns() {
        let input = "url,title,text,rating\n\
                     http://x,First Light,\"Colours, then calm.\",5\n\
                     http://y,Second,\"Line one\nline two\",3\n";
        let reports = reports_from_csv(input.as_bytes()).unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].title, "First Light");
        assert_eq!(reports[0].text, "Colours, then calm.");
        assert_eq!(reports[1].text, "Line one\nline two");
    }

    #[test]
    fn test_reports_from_csv_requires_text_column() {
        let input = "title,body\nA,b\n";
        assert!(reports_from_csv(input.as_bytes()).is_err());
    }

    #[tokio::test]
    async fn test_load_tree_names_and_skips() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("lsd")).unwrap();
        std::fs::create_dir_all(root.join("dmt")).unwrap();
        std::fs::write(root.join("lsd/reports.csv"), "title,text\nA,a\nB,b\n").unwrap();
        std::fs::write(root.join("dmt/reports.csv"), "title,text\nC,c\n").unwrap();
        std::fs::write(root.join("mdma.CSV"), "title,text\nD,d\n").unwrap();
        std::fs::write(root.join("broken.csv"), "name\nx\n").unwrap();
        std::fs::write(root.join("notes.txt"), "ignored").unwrap();

        let repo = CsvDatasetRepo::new(root);
        let datasets = repo.load_datasets().await.unwrap();
        let names: Vec<&str> = datasets.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["dmt/reports", "lsd/reports", "mdma"]);
        assert_eq!(datasets[1].titles(), vec!["A", "B"]);
    }

    #[test]
    fn test_colliding_stems_get_parent_dir_prefix() {
        let root = Path::new("/data");
        let paths = vec![
            PathBuf::from("/data/a/lsd/reports.csv"),
            PathBuf::from("/data/b/dmt/reports.csv"),
            PathBuf::from("/data/reports.csv"),
            PathBuf::from("/data/x/mdma/notes.csv"),
        ];
        assert_eq!(
            dataset_names(root, &paths),
            vec!["lsd/reports", "dmt/reports", "reports", "notes"]
        );
    }

    #[test]
    fn test_same_parent_name_falls_back_to_relative_path() {
        let root = Path::new("/data");
        let paths = vec![
            PathBuf::from("/data/2023/lsd/reports.csv"),
            PathBuf::from("/data/2024/lsd/reports.csv"),
        ];
        assert_eq!(
            dataset_names(root, &paths),
            vec!["2023/lsd/reports", "2024/lsd/reports"]
        );
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_tree(&dir.path().join("nope")),
            Err(DomainError::Dataset(_))
        ));
    }
}
