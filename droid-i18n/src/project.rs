//! Discovery of the module projects of an Android build.
//!
//! A directory is a module project when it holds a `build.gradle`,
//! `build.gradle.kts` or `src/main/res`. The project root always counts as one.
//! Build outputs, sources, hidden and ignored directories are not descended into.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use tracing::debug;

use crate::{error::Error, traits::ImportStrategy, types::ModuleData};

const BUILD_FILES: [&str; 2] = ["build.gradle", "build.gradle.kts"];
const SKIPPED_DIRS: [&str; 2] = ["build", "src"];

/// Resource directory of a module, relative to the module directory.
pub const RES_DIR: &str = "src/main/res";

/// One module project of the build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleProject {
    /// Hierarchical path, e.g. `:features:feature-one`; the root is `:`.
    pub path: String,
    pub dir: PathBuf,
}

impl ModuleProject {
    /// Module name derived from the path, see [`ModuleData::name_from_path`].
    pub fn name(&self) -> String {
        ModuleData::name_from_path(&self.path)
    }

    pub fn res_dir(&self) -> PathBuf {
        self.dir.join(RES_DIR)
    }

    pub fn is_root(&self) -> bool {
        self.path == ":"
    }
}

/// Every module project found under a root directory, sorted by path.
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    pub root: PathBuf,
    pub modules: Vec<ModuleProject>,
}

impl ProjectLayout {
    /// Walks `root` and collects its module projects.
    pub fn discover<P: AsRef<Path>>(root: P) -> Result<Self, Error> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(Error::NotFound(root.display().to_string()));
        }

        let walker = WalkBuilder::new(&root)
            .hidden(true)
            .git_ignore(true)
            .git_exclude(true)
            .require_git(false)
            .parents(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .filter_entry(|entry| {
                entry.depth() == 0
                    || !SKIPPED_DIRS
                        .iter()
                        .any(|skipped| entry.file_name() == *skipped)
            })
            .build();

        let mut modules = vec![ModuleProject {
            path: ":".to_string(),
            dir: root.clone(),
        }];
        for entry in walker {
            let entry = entry.map_err(|e| Error::Io(std::io::Error::other(e.to_string())))?;
            if entry.depth() == 0 || !entry.file_type().is_some_and(|t| t.is_dir()) {
                continue;
            }
            let dir = entry.path();
            if !is_module_dir(dir) {
                continue;
            }
            let Ok(relative) = dir.strip_prefix(&root) else {
                continue;
            };
            let components: Vec<String> = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            let path = format!(":{}", components.join(":"));
            debug!("Found module {} in {}", path, dir.display());
            modules.push(ModuleProject {
                path,
                dir: dir.to_path_buf(),
            });
        }
        modules.sort_by(|a, b| a.path.cmp(&b.path));

        Ok(ProjectLayout { root, modules })
    }

    /// Module projects with no module project below them, sorted by path.
    pub fn leaves(&self) -> Vec<&ModuleProject> {
        self.modules
            .iter()
            .filter(|module| {
                !self
                    .modules
                    .iter()
                    .any(|other| other.dir != module.dir && other.dir.starts_with(&module.dir))
            })
            .collect()
    }

    /// Number of module projects directly under the root module.
    pub fn child_count(&self) -> usize {
        self.modules
            .iter()
            .filter(|module| !module.is_root())
            .filter(|module| {
                self.nearest_ancestor(module)
                    .is_some_and(ModuleProject::is_root)
            })
            .count()
    }

    fn nearest_ancestor(&self, module: &ModuleProject) -> Option<&ModuleProject> {
        self.modules
            .iter()
            .filter(|other| other.dir != module.dir && module.dir.starts_with(&other.dir))
            .max_by_key(|other| other.dir.components().count())
    }

    /// Single-module when the root has at most one child module.
    pub fn strategy(&self) -> ImportStrategy {
        if self.child_count() <= 1 {
            ImportStrategy::SingleModule
        } else {
            ImportStrategy::MultiModule
        }
    }

    /// Resource directory written by a single-module import: the sole leaf
    /// module's, or the root's when there is none or several.
    pub fn single_module_res_dir(&self) -> PathBuf {
        match self.leaves().as_slice() {
            [leaf] => leaf.res_dir(),
            _ => self.root.join(RES_DIR),
        }
    }

    /// Resource directory of the module named `name` in a multi-module import.
    ///
    /// `features.feature-one` lives in `<root>/features/feature-one`, `app` in `<root>/app`.
    /// Only the first `.` is a directory separator: a module exported as
    /// `a.b-c` (path `:a:b:c`) maps to `<root>/a/b-c`, not `<root>/a/b/c`.
    pub fn module_res_dir(&self, name: &str) -> PathBuf {
        let dir = match name.split_once('.') {
            Some((outer, inner)) => self.root.join(outer).join(inner),
            None => self.root.join(name),
        };
        dir.join(RES_DIR)
    }
}

fn is_module_dir(dir: &Path) -> bool {
    BUILD_FILES.iter().any(|file| dir.join(file).is_file()) || dir.join(RES_DIR).is_dir()
}
