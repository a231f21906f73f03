use std::collections::HashSet;
use std::fmt;

use crate::BuildError;

/// Separator between chained sub-commands laid out one per line.
const CONTINUED_SEPARATOR: &str = " && \\\t\n";

/// Variables the base images provide before any instruction runs.
const INHERITED_VARIABLES: &[&str] = &["PATH", "HOME"];

/// How an `ENV` instruction is spelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvForm {
    /// `ENV KEY value`
    Space,
    /// `ENV KEY="value"`
    Assign,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainLayout {
    /// All sub-commands on the instruction's own line.
    Inline,
    /// One sub-command per line, joined with line continuations.
    Continued,
}

/// A `RUN` instruction made of ordered sub-commands.
///
/// With `abort_on_failure` the sub-commands are chained with `&&`, so the first
/// failing one fails the whole instruction and no partial layer is cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunStep {
    pub commands: Vec<String>,
    pub abort_on_failure: bool,
    pub layout: ChainLayout,
}

impl RunStep {
    pub fn single(command: impl Into<String>) -> Self {
        Self {
            commands: vec![command.into()],
            abort_on_failure: true,
            layout: ChainLayout::Inline,
        }
    }

    pub fn chained<I, S>(commands: I, layout: ChainLayout) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            commands: commands.into_iter().map(Into::into).collect(),
            abort_on_failure: true,
            layout,
        }
    }

    fn separator(&self) -> &'static str {
        match (self.abort_on_failure, self.layout) {
            (true, ChainLayout::Inline) => " && ",
            (true, ChainLayout::Continued) => CONTINUED_SEPARATOR,
            (false, ChainLayout::Inline) => "; ",
            (false, ChainLayout::Continued) => "; \\\t\n",
        }
    }
}

impl fmt::Display for RunStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RUN {}", self.commands.join(self.separator()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    From(String),
    Env {
        key: String,
        value: String,
        form: EnvForm,
    },
    Run(RunStep),
    Workdir(String),
    Add { src: String, dest: String },
    Entrypoint(String),
}

impl Instruction {
    pub fn env(key: impl Into<String>, value: impl Into<String>) -> Self {
        Instruction::Env {
            key: key.into(),
            value: value.into(),
            form: EnvForm::Space,
        }
    }

    pub fn env_assign(key: impl Into<String>, value: impl Into<String>) -> Self {
        Instruction::Env {
            key: key.into(),
            value: value.into(),
            form: EnvForm::Assign,
        }
    }

    /// Variable names this instruction expands with `${NAME}`.
    pub fn referenced_variables(&self) -> Vec<String> {
        match self {
            Instruction::From(image) => variable_refs(image),
            Instruction::Env { value, .. } => variable_refs(value),
            Instruction::Run(step) => step.commands.iter().flat_map(|c| variable_refs(c)).collect(),
            Instruction::Workdir(dir) => variable_refs(dir),
            Instruction::Add { src, dest } => {
                let mut refs = variable_refs(src);
                refs.extend(variable_refs(dest));
                refs
            }
            Instruction::Entrypoint(cmd) => variable_refs(cmd),
        }
    }

    pub fn declared_variable(&self) -> Option<&str> {
        match self {
            Instruction::Env { key, .. } => Some(key),
            _ => None,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::From(image) => write!(f, "FROM {image}"),
            Instruction::Env {
                key,
                value,
                form: EnvForm::Space,
            } => write!(f, "ENV {key} {value}"),
            Instruction::Env {
                key,
                value,
                form: EnvForm::Assign,
            } => write!(f, "ENV {key}=\"{value}\""),
            Instruction::Run(step) => fmt::Display::fmt(step, f),
            Instruction::Workdir(dir) => write!(f, "WORKDIR {dir}"),
            Instruction::Add { src, dest } => write!(f, "ADD {src} {dest}"),
            Instruction::Entrypoint(cmd) => write!(f, "ENTRYPOINT {cmd}"),
        }
    }
}

/// The ordered instruction list handed to the container engine as a Dockerfile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildDefinition {
    instructions: Vec<Instruction>,
}

impl BuildDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    pub fn extend(&mut self, instructions: impl IntoIterator<Item = Instruction>) {
        self.instructions.extend(instructions);
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// One rendered string per instruction.
    pub fn lines(&self) -> Vec<String> {
        self.instructions.iter().map(ToString::to_string).collect()
    }

    /// Dockerfile text: instructions joined by newlines.
    pub fn render(&self) -> String {
        self.lines().join("\n")
    }

    /// Check that every `${NAME}` is declared by an earlier `ENV` (or inherited).
    ///
    /// An `ENV` may reference its own key, which then resolves to the inherited value.
    pub fn check_variable_order(&self) -> Result<(), BuildError> {
        let mut declared: HashSet<&str> = INHERITED_VARIABLES.iter().copied().collect();
        for (index, instruction) in self.instructions.iter().enumerate() {
            for name in instruction.referenced_variables() {
                if !declared.contains(name.as_str()) {
                    return Err(BuildError::UndeclaredVariable { name, index });
                }
            }
            if let Some(key) = instruction.declared_variable() {
                declared.insert(key);
            }
        }
        Ok(())
    }
}

impl fmt::Display for BuildDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

fn variable_refs(text: &str) -> Vec<String> {
    let mut refs = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find("${") {
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                // `${NAME:-default}` style modifiers still reference NAME
                let name = after[..end].split(':').next().unwrap_or_default();
                if !name.is_empty() {
                    refs.push(name.to_string());
                }
                rest = &after[end + 1..];
            }
            None => break,
        }
    }
    refs
}
