//! Design file sets.
//!
//! A design is read from exactly one DEF file plus one or more LEF files.
//! Each LEF file carries technology data, cell library data, or both.
//! [`DesignFiles::validate`] checks a set against the rules the parser
//! expects before any file is opened:
//!
//! - at least one LEF file and exactly one DEF file,
//! - every LEF file tagged as technology, library, or both,
//! - exactly one technology LEF and at least one library LEF.
//!
//! [`DesignFiles::def_design_name`] additionally reads the DEF file and
//! returns the name its `DESIGN` statement declares.

use std::{
    fmt, fs,
    path::{Path, PathBuf},
    str::FromStr,
    sync::LazyLock,
};

use log::{debug, info};
use regex::Regex;
use thiserror::Error;

static DEF_DESIGN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?ms)^\s*DESIGN\s+([\w\\/\.$\[\]-]+?)\s*;.+^\s*END\s+DESIGN\s*$")
        .expect("DEF design pattern is a valid regex")
});

/// Errors raised while checking a set of design files.
#[derive(Debug, Error)]
pub enum FilesError {
    #[error("at least one LEF file is required")]
    MissingLef,

    #[error("one DEF file is required")]
    MissingDef,

    #[error("only one DEF file per design is supported")]
    MultipleDef,

    #[error("only one LEF technology file is allowed")]
    MultipleTechnology,

    #[error("LEF file must be technology or library file: {0}")]
    UntaggedLef(PathBuf),

    #[error("LEF technology file is required")]
    MissingTechnology,

    #[error("LEF library file is required")]
    MissingLibrary,

    #[error("invalid LEF file argument `{0}`, expected <path>[:tech|:lib|:tech+lib]")]
    InvalidLefArgument(String),

    #[error("{0} has no DESIGN ... END DESIGN block")]
    MissingDesignStatement(PathBuf),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A LEF file and what it provides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LefFile {
    path: PathBuf,
    is_tech: bool,
    is_library: bool,
}

impl LefFile {
    pub fn new(path: impl Into<PathBuf>, is_tech: bool, is_library: bool) -> Self {
        Self {
            path: path.into(),
            is_tech,
            is_library,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_tech(&self) -> bool {
        self.is_tech
    }

    pub fn is_library(&self) -> bool {
        self.is_library
    }
}

/// Parses `<path>`, `<path>:tech`, `<path>:lib` or `<path>:tech+lib`.
///
/// A bare path is accepted here and left untagged; validation rejects it.
/// A colon followed by a path separator belongs to the path, as in the drive
/// prefix of `C:\cells.lef`.
impl FromStr for LefFile {
    type Err = FilesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((path, role)) = s.rsplit_once(':') else {
            return Ok(Self::new(s, false, false));
        };
        let (is_tech, is_library) = match role {
            "tech" => (true, false),
            "lib" => (false, true),
            "tech+lib" | "lib+tech" => (true, true),
            _ if role.contains(['/', '\\']) => return Ok(Self::new(s, false, false)),
            _ => return Err(FilesError::InvalidLefArgument(s.to_string())),
        };
        if path.is_empty() {
            return Err(FilesError::InvalidLefArgument(s.to_string()));
        }
        Ok(Self::new(path, is_tech, is_library))
    }
}

impl fmt::Display for LefFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let role = match (self.is_tech, self.is_library) {
            (true, true) => ":tech+lib",
            (true, false) => ":tech",
            (false, true) => ":lib",
            (false, false) => "",
        };
        write!(f, "{}{role}", self.path.display())
    }
}

/// The files one design is read from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DesignFiles {
    def: Option<PathBuf>,
    lef: Vec<LefFile>,
}

impl DesignFiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the DEF file.
    ///
    /// # Errors
    ///
    /// Returns [`FilesError::MultipleDef`] if a DEF file is already set.
    pub fn add_def(&mut self, path: impl Into<PathBuf>) -> Result<(), FilesError> {
        if self.def.is_some() {
            return Err(FilesError::MultipleDef);
        }
        self.def = Some(path.into());
        Ok(())
    }

    pub fn add_lef(&mut self, file: LefFile) {
        self.lef.push(file);
    }

    pub fn def(&self) -> Option<&Path> {
        self.def.as_deref()
    }

    pub fn lef(&self) -> &[LefFile] {
        &self.lef
    }

    /// Checks the set without touching the filesystem.
    ///
    /// # Errors
    ///
    /// Returns the first rule the set breaks, in the order the module
    /// documentation lists them.
    pub fn validate(&self) -> Result<(), FilesError> {
        if self.lef.is_empty() {
            return Err(FilesError::MissingLef);
        }
        if self.def.is_none() {
            return Err(FilesError::MissingDef);
        }

        let mut has_tech = false;
        let mut has_lib = false;
        for file in &self.lef {
            if file.is_tech {
                if has_tech {
                    return Err(FilesError::MultipleTechnology);
                }
                has_tech = true;
            }
            has_lib |= file.is_library;
            if !file.is_tech && !file.is_library {
                return Err(FilesError::UntaggedLef(file.path.clone()));
            }
        }

        if !has_tech {
            return Err(FilesError::MissingTechnology);
        }
        if !has_lib {
            return Err(FilesError::MissingLibrary);
        }

        debug!(lef_files = self.lef.len(); "Design files validated");
        Ok(())
    }

    /// Validates the set and returns the design name declared in the DEF file.
    ///
    /// # Errors
    ///
    /// Returns a validation error, [`FilesError::Read`] if the DEF file
    /// cannot be read, or [`FilesError::MissingDesignStatement`] if it has
    /// no `DESIGN <name> ;` ... `END DESIGN` block.
    pub fn def_design_name(&self) -> Result<String, FilesError> {
        self.validate()?;
        let Some(path) = self.def.as_deref() else {
            return Err(FilesError::MissingDef);
        };

        let content = fs::read_to_string(path).map_err(|source| FilesError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let name = design_name(&content)
            .ok_or_else(|| FilesError::MissingDesignStatement(path.to_path_buf()))?;

        info!(path = path.display().to_string(), design = name; "DEF design found");
        Ok(name.to_string())
    }
}

fn design_name(def: &str) -> Option<&str> {
    DEF_DESIGN
        .captures(def)
        .and_then(|captures| captures.get(1))
        .map(|name| name.as_str())
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    // ===================
    // Strategies
    // ===================

    fn lef_strategy() -> impl Strategy<Value = LefFile> {
        (any::<bool>(), any::<bool>(), 0u8..8)
            .prop_map(|(is_tech, is_library, n)| LefFile::new(format!("f{n}.lef"), is_tech, is_library))
    }

    fn files_strategy() -> impl Strategy<Value = DesignFiles> {
        (any::<bool>(), prop::collection::vec(lef_strategy(), 0..5)).prop_map(|(def, lef)| {
            let mut files = DesignFiles::new();
            if def {
                files.def = Some(PathBuf::from("top.def"));
            }
            files.lef = lef;
            files
        })
    }

    // ===================
    // Property Test Functions
    // ===================

    /// A set validates exactly when it has a DEF, every LEF is tagged, one
    /// LEF carries technology and some LEF carries a library.
    fn check_validation_matches_rules(files: DesignFiles) -> Result<(), TestCaseError> {
        let tech = files.lef.iter().filter(|file| file.is_tech).count();
        let expected = files.def.is_some()
            && !files.lef.is_empty()
            && files.lef.iter().all(|file| file.is_tech || file.is_library)
            && tech == 1
            && files.lef.iter().any(|file| file.is_library);

        prop_assert_eq!(files.validate().is_ok(), expected, "files {:?}", files);
        Ok(())
    }

    /// A tagged LEF argument parses back to the same file.
    fn check_lef_argument_round_trip(file: LefFile) -> Result<(), TestCaseError> {
        prop_assume!(file.is_tech || file.is_library);
        let parsed: LefFile = file
            .to_string()
            .parse()
            .map_err(|e: FilesError| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(parsed, file);
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn validation_matches_rules(files in files_strategy()) {
            check_validation_matches_rules(files)?;
        }

        #[test]
        fn lef_argument_round_trip(file in lef_strategy()) {
            check_lef_argument_round_trip(file)?;
        }
    }
}
