//! Rename plan data model.

use crate::Error;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};

/// Ordered mapping from distinct source paths to target paths.
///
/// Insertion order is the order entries are displayed and executed in.
/// Serialized as a flat JSON object (`{"source": "target", ...}`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenamePlan {
    entries: Vec<(PathBuf, PathBuf)>,
}

impl RenamePlan {
    /// Create an empty plan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a plan from ordered pairs, rejecting repeated sources.
    pub fn from_pairs<I, S, T>(pairs: I) -> crate::Result<Self>
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<PathBuf>,
        T: Into<PathBuf>,
    {
        let mut plan = Self::new();
        for (source, target) in pairs {
            plan.insert(source, target)?;
        }
        Ok(plan)
    }

    /// Append an entry. A source can only appear once.
    pub fn insert(&mut self, source: impl Into<PathBuf>, target: impl Into<PathBuf>) -> crate::Result<()> {
        let source = source.into();
        if self.contains_source(&source) {
            return Err(Error::DuplicateSource(source.display().to_string()));
        }
        self.entries.push((source, target.into()));
        Ok(())
    }

    /// Whether the plan has an entry for `source`.
    pub fn contains_source(&self, source: &Path) -> bool {
        self.entries.iter().any(|(s, _)| s == source)
    }

    /// Target for a given source, if planned.
    pub fn target_of(&self, source: &Path) -> Option<&Path> {
        self.entries
            .iter()
            .find(|(s, _)| s == source)
            .map(|(_, t)| t.as_path())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in plan order.
    pub fn iter(&self) -> impl Iterator<Item = (&Path, &Path)> {
        self.entries.iter().map(|(s, t)| (s.as_path(), t.as_path()))
    }

    pub fn sources(&self) -> impl Iterator<Item = &Path> {
        self.entries.iter().map(|(s, _)| s.as_path())
    }

    /// The plan that moves every target back to its source, in reverse order.
    ///
    /// Fails when two entries share a target, since the inverse would then
    /// have a repeated source.
    pub fn inverted(&self) -> crate::Result<Self> {
        Self::from_pairs(
            self.entries
                .iter()
                .rev()
                .map(|(s, t)| (t.clone(), s.clone())),
        )
    }
}

impl Serialize for RenamePlan {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (source, target) in &self.entries {
            map.serialize_entry(source, target)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RenamePlan {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PlanVisitor;

        impl<'de> Visitor<'de> for PlanVisitor {
            type Value = RenamePlan;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of source paths to target paths")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut plan = RenamePlan::new();
                while let Some((source, target)) = access.next_entry::<PathBuf, PathBuf>()? {
                    plan.insert(source, target)
                        .map_err(serde::de::Error::custom)?;
                }
                Ok(plan)
            }
        }

        deserializer.deserialize_map(PlanVisitor)
    }
}

/// Outcome of applying a single plan entry.
#[derive(Debug)]
pub enum ExecutionResult {
    /// The file was moved. `created_dir` is set when the target's parent
    /// had to be created first.
    Renamed {
        from: PathBuf,
        to: PathBuf,
        created_dir: Option<PathBuf>,
        marker: Option<PathBuf>,
    },
    /// Source and target resolve to the same path.
    Unchanged { path: PathBuf },
    /// This entry failed; later entries were still attempted.
    Failed {
        from: PathBuf,
        to: PathBuf,
        error: Error,
    },
}

impl ExecutionResult {
    pub fn is_success(&self) -> bool {
        !matches!(self, ExecutionResult::Failed { .. })
    }

    /// Resolved source path of the entry.
    pub fn source(&self) -> &Path {
        match self {
            ExecutionResult::Renamed { from, .. } | ExecutionResult::Failed { from, .. } => from,
            ExecutionResult::Unchanged { path } => path,
        }
    }
}

/// Counts over a sequence of execution results.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionSummary {
    pub renamed: usize,
    pub unchanged: usize,
    pub failed: usize,
    pub dirs_created: usize,
}

impl ExecutionSummary {
    pub fn from_results(results: &[ExecutionResult]) -> Self {
        let mut summary = Self::default();
        for result in results {
            match result {
                ExecutionResult::Renamed { created_dir, .. } => {
                    summary.renamed += 1;
                    if created_dir.is_some() {
                        summary.dirs_created += 1;
                    }
                }
                ExecutionResult::Unchanged { .. } => summary.unchanged += 1,
                ExecutionResult::Failed { .. } => summary.failed += 1,
            }
        }
        summary
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}
