use std::path::PathBuf;

use protocc_core::{discover_for, BuildContext, InstructionBuilder, Language, ProtoDirs};
use tracing::info;

use crate::engine::ContainerEngine;
use crate::executor::Executor;
use crate::naming::ArtifactNames;
use crate::observer::CommandObserver;
use crate::ExecError;

/// What one language's run discovered and copied back.
#[derive(Debug, Clone)]
pub struct LanguageReport {
    pub language: Language,
    pub dirs: ProtoDirs,
    pub files: Vec<PathBuf>,
}

/// Discovery, instruction assembly, and remote execution for each requested language.
pub struct Pipeline<'a> {
    engine: &'a dyn ContainerEngine,
    observer: &'a dyn CommandObserver,
    root: PathBuf,
    builder: InstructionBuilder,
    unique_names: bool,
}

impl<'a> Pipeline<'a> {
    /// `root` is both the directory walked for protos and the engine's build context.
    pub fn new(
        engine: &'a dyn ContainerEngine,
        observer: &'a dyn CommandObserver,
        root: impl Into<PathBuf>,
        context: BuildContext,
    ) -> Self {
        Self {
            engine,
            observer,
            root: root.into(),
            builder: InstructionBuilder::new(context),
            unique_names: true,
        }
    }

    /// Use the shared `tmp/protocc` / `protocc` names instead of per-invocation ones.
    pub fn with_unique_names(mut self, unique: bool) -> Self {
        self.unique_names = unique;
        self
    }

    /// Every language name is validated before the engine is touched.
    pub fn run(&self, languages: &[String]) -> Result<Vec<LanguageReport>, ExecError> {
        if languages.is_empty() {
            return Err(ExecError::NoLanguageSelected);
        }
        let languages = languages
            .iter()
            .map(|name| name.parse::<Language>())
            .collect::<Result<Vec<_>, _>>()?;

        let mut reports = Vec::with_capacity(languages.len());
        for language in languages {
            reports.push(self.run_language(language)?);
        }
        Ok(reports)
    }

    pub fn run_language(&self, language: Language) -> Result<LanguageReport, ExecError> {
        let dirs = discover_for(language, &self.root)?;
        info!(%language, dirs = dirs.len(), "compiling protos");
        let definition = self.builder.build(language, &dirs)?;

        let names = if self.unique_names {
            ArtifactNames::unique()
        } else {
            ArtifactNames::fixed()
        };
        let files = Executor::new(self.engine, self.observer, names)
            .with_context(self.root.clone())
            .execute(&definition)?;

        Ok(LanguageReport {
            language,
            dirs,
            files,
        })
    }
}
