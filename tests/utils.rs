#![allow(dead_code)]

use enumgen::{Codegen, PathBuf};
use serde_json::Value;
use tempfile::TempDir;

/// A temporary directory with a `schemas` tree to generate from and an empty
/// `out` directory to generate into
pub struct SchemaTree {
    _dir: TempDir,
    root: PathBuf,
}

impl SchemaTree {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let root = PathBuf::from_path_buf(dir.path().to_owned()).expect("temp dir is not utf-8");

        fs::create_dir_all(root.join("schemas")).unwrap();
        fs::create_dir_all(root.join("out")).unwrap();

        Self { _dir: dir, root }
    }

    pub fn schema(self, rel: &str, schema: Value) -> Self {
        let content = serde_json::to_string_pretty(&schema).unwrap();
        self.file(rel, &content)
    }

    pub fn file(self, rel: &str, content: &str) -> Self {
        let path = self.input_dir().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
        self
    }

    /// Adds a directory below `rel` whose full path is longer than
    /// `PATH_MAX`, so listing it fails even for privileged users. It is built
    /// as two shorter chains joined by a rename.
    pub fn too_long_to_list(self, rel: &str) -> Self {
        let segment = "d".repeat(200);
        let half = |base: PathBuf| {
            let mut path = base;
            for _ in 0..12 {
                path.push(&segment);
            }
            fs::create_dir_all(&path).unwrap();
            path
        };

        let upper = half(self.input_dir().join(rel));
        let lower = self.root.join("lower-half");
        half(lower.clone());

        fs::rename(lower.join(&segment), upper.join(&segment)).unwrap();
        fs::remove_dir(&lower).unwrap();
        self
    }

    pub fn input_dir(&self) -> PathBuf {
        self.root.join("schemas")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root.join("out")
    }

    pub fn output_path(&self) -> PathBuf {
        self.output_dir().join(enumgen::DEFAULT_FILE_NAME)
    }

    pub fn output(&self) -> Option<String> {
        let path = self.output_path();
        path.exists().then(|| fs::read_to_string(path).unwrap())
    }

    /// Names of all the files in the output directory, sorted
    pub fn output_files(&self) -> Vec<String> {
        let mut names: Vec<_> = fs::read_dir(self.output_dir())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    pub fn codegen(&self) -> Codegen {
        Codegen::builder()
            .input_dir(self.input_dir())
            .output_dir(self.output_dir())
            .build()
            .unwrap()
    }
}

/// Index of `needle` in `haystack`, panicking with both if it's not there
pub fn position(haystack: &str, needle: &str) -> usize {
    haystack
        .find(needle)
        .unwrap_or_else(|| panic!("`{needle}` not found in:\n{haystack}"))
}
