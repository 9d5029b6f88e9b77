//! Drives the whole pipeline: discovery, extraction and writing of the
//! generated file.

use crate::{discovery, extract, load, render};
use crate::{DiscoveryPolicy, EnumDecl, Path, PathBuf, DEFAULT_FILE_NAME};
use anyhow::{bail, Context as _, Result};
use buildstructor::buildstructor;
use indexmap::IndexMap;
use itertools::Itertools as _;
use rayon::prelude::*;
use std::fmt;
use std::io::Write as _;
use tracing::{debug, info, warn};

/// How to treat several enums that end up with the same name
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, clap::ValueEnum, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// Emit every declaration as is
    Allow,
    /// Emit every declaration, but log a warning for each duplicate name
    #[default]
    Warn,
    /// Fail the run before anything is written
    Deny,
}

/// An enum name shared by more than one declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateName {
    pub name: String,
    /// Schema file of each declaration, in output order
    pub sources: Vec<PathBuf>,
}

impl fmt::Display for DuplicateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` (in {})", self.name, self.sources.iter().join(", "))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CodegenError {
    #[error("enum names must be unique, but found duplicates: {}", .duplicates.iter().join(", "))]
    DuplicateEnumNames { duplicates: Vec<DuplicateName> },
}

/// What a successful [`Codegen::run`] did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The generated file was (over)written
    Written { path: PathBuf, enums: usize },
    /// No schema contained an enum, nothing was written
    NoEnums,
}

/// Generates a single TypeScript file with an `export enum` for every enum
/// found in the JSON schemas under [`Codegen::input_dir`].
#[derive(Debug)]
pub struct Codegen {
    input_dir: PathBuf,
    output_dir: PathBuf,
    file_name: String,
    discovery: DiscoveryPolicy,
    duplicates: DuplicatePolicy,
}

#[buildstructor]
impl Codegen {
    /// `file_name` defaults to [`DEFAULT_FILE_NAME`] and must be a plain file
    /// name, the file is always created directly inside of `output_dir`.
    #[builder]
    pub fn new(
        input_dir: PathBuf,
        output_dir: PathBuf,
        file_name: Option<String>,
        discovery: Option<DiscoveryPolicy>,
        duplicates: Option<DuplicatePolicy>,
    ) -> Result<Self> {
        let file_name = file_name.unwrap_or_else(|| DEFAULT_FILE_NAME.to_owned());

        if file_name.is_empty()
            || file_name == "."
            || file_name == ".."
            || file_name.contains(['/', '\\'])
        {
            bail!("Output file name must be a plain file name, but got `{file_name}`");
        }

        Ok(Self {
            input_dir,
            output_dir,
            file_name,
            discovery: discovery.unwrap_or_default(),
            duplicates: duplicates.unwrap_or_default(),
        })
    }

    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(&self.file_name)
    }

    pub fn run(&self) -> Result<Outcome> {
        info!(
            input_dir = %self.input_dir,
            output = %self.output_path(),
            discovery = %self.discovery,
            duplicates = %self.duplicates,
            "Generating enums from schemas"
        );

        let discovery = discovery::scan(&self.input_dir, self.discovery);

        if !discovery.is_complete() {
            warn!(
                skipped = discovery.errors.len(),
                "Some parts of the schema tree could not be listed, the generated \
                enums may be incomplete"
            );
        }

        let decls = extract_files(&discovery.files)?;

        if decls.is_empty() {
            info!(files = discovery.files.len(), "No enum found");
            return Ok(Outcome::NoEnums);
        }

        self.check_duplicates(&decls)?;

        let path = self.output_path();
        write_atomically(&self.output_dir, &path, &render::enum_decls(&decls))
            .with_context(|| format!("Unable to write the generated enums to `{path}`"))?;

        info!(
            %path,
            enums = decls.len(),
            files = discovery.files.len(),
            "Generated enums"
        );

        Ok(Outcome::Written {
            path,
            enums: decls.len(),
        })
    }

    fn check_duplicates(&self, decls: &[EnumDecl]) -> Result<()> {
        if self.duplicates == DuplicatePolicy::Allow {
            return Ok(());
        }

        let duplicates = duplicate_names(decls);
        if duplicates.is_empty() {
            return Ok(());
        }

        if self.duplicates == DuplicatePolicy::Deny {
            return Err(CodegenError::DuplicateEnumNames { duplicates }.into());
        }

        for duplicate in &duplicates {
            warn!(
                name = %duplicate.name,
                sources = %duplicate.sources.iter().join(", "),
                "Enum name is declared more than once"
            );
        }

        Ok(())
    }
}

/// Files are processed in parallel, but the declarations are returned in the
/// order of `files`, so the output doesn't depend on scheduling. If several
/// files fail, the error of the first one in that order is returned.
fn extract_files(files: &[PathBuf]) -> Result<Vec<EnumDecl>> {
    let per_file: Vec<_> = files.par_iter().map(|path| extract_file(path)).collect();

    let per_file = per_file.into_iter().collect::<Result<Vec<_>>>()?;

    Ok(per_file.into_iter().flatten().collect())
}

fn extract_file(path: &Path) -> Result<Vec<EnumDecl>> {
    let schema = load::json_file(path)?;

    let decls = extract::enums(&schema, extract::file_stem_name(path), path)
        .with_context(|| format!("Invalid schema in `{path}`"))?;

    debug!(%path, enums = decls.len(), "Processed schema file");

    Ok(decls)
}

fn duplicate_names(decls: &[EnumDecl]) -> Vec<DuplicateName> {
    let mut by_name: IndexMap<&str, Vec<&Path>> = IndexMap::new();

    for decl in decls {
        by_name.entry(decl.name.as_str()).or_default().push(&decl.source);
    }

    by_name
        .into_iter()
        .filter(|(_, sources)| sources.len() > 1)
        .map(|(name, sources)| DuplicateName {
            name: name.to_owned(),
            sources: sources.into_iter().map(Path::to_path_buf).collect(),
        })
        .collect()
}

/// The content lands in a temporary file inside of `dir` first and is then
/// renamed over `path`, so a failure never leaves a half written file behind.
/// The temporary file is removed whenever it isn't persisted.
fn write_atomically(dir: &Path, path: &Path, content: &str) -> Result<()> {
    let dir = if dir.as_str().is_empty() {
        Path::new(".")
    } else {
        dir
    };

    let mut tmp = tempfile::Builder::new()
        .prefix(".enumgen")
        .suffix(".tmp")
        .tempfile_in(dir)
        .with_context(|| format!("Unable to create a temporary file in `{dir}`"))?;

    tmp.write_all(content.as_bytes())
        .with_context(|| format!("Unable to write `{}`", tmp.path().display()))?;

    tmp.persist(path).map_err(|err| err.error)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decl(name: &str, source: &str) -> EnumDecl {
        EnumDecl {
            name: name.to_owned(),
            members: vec!["A".to_owned()],
            source: source.into(),
        }
    }

    #[test]
    fn finds_duplicates_in_first_seen_order() {
        let decls = [
            decl("status", "a.json"),
            decl("kind", "a.json"),
            decl("unique", "b.json"),
            decl("kind", "b.json"),
            decl("status", "c.json"),
            decl("status", "c.json"),
        ];

        let duplicates = duplicate_names(&decls);

        assert_eq!(
            duplicates,
            [
                DuplicateName {
                    name: "status".to_owned(),
                    sources: vec!["a.json".into(), "c.json".into(), "c.json".into()],
                },
                DuplicateName {
                    name: "kind".to_owned(),
                    sources: vec!["a.json".into(), "b.json".into()],
                },
            ]
        );

        let err = CodegenError::DuplicateEnumNames {
            duplicates: duplicates[1..].to_vec(),
        };
        assert_eq!(
            err.to_string(),
            "enum names must be unique, but found duplicates: `kind` (in a.json, b.json)"
        );
    }

    #[test]
    fn builder_defaults() {
        let codegen = Codegen::builder()
            .input_dir("schemas")
            .output_dir("out")
            .build()
            .unwrap();

        assert_eq!(codegen.input_dir(), "schemas");
        assert_eq!(codegen.output_path(), Path::new("out").join("types.ts"));
        assert_eq!(codegen.discovery, DiscoveryPolicy::FailOpen);
        assert_eq!(codegen.duplicates, DuplicatePolicy::Warn);
    }

    #[test]
    fn rejects_file_names_with_directories() {
        for file_name in ["", ".", "..", "nested/types.ts", r"nested\types.ts"] {
            let result = Codegen::builder()
                .input_dir("schemas")
                .output_dir("out")
                .file_name(file_name)
                .build();

            assert!(result.is_err(), "{file_name:?} should be rejected");
        }
    }

    #[test]
    fn failed_write_leaves_no_temporary_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = PathBuf::from_path_buf(dir.path().to_owned()).unwrap();

        // A non-empty directory can't be replaced by a file
        let path = out.join("types.ts");
        fs::create_dir_all(path.join("occupied")).unwrap();

        let content = "export enum big {\n\"A\" = \"A\"\n}\n\n".repeat(2000);
        assert!(write_atomically(&out, &path, &content).is_err());

        let entries: Vec<_> = fs::read_dir(&out)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(entries, ["types.ts"]);
        assert!(path.join("occupied").is_dir());
    }

    #[test]
    fn writes_through_a_temporary_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = PathBuf::from_path_buf(dir.path().to_owned()).unwrap();
        let path = out.join("types.ts");

        write_atomically(&out, &path, "first").unwrap();
        write_atomically(&out, &path, "second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
        assert_eq!(fs::read_dir(&out).unwrap().count(), 1);
    }
}
