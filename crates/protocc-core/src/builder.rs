use std::path::{Path, PathBuf};

use tracing::debug;

use crate::discovery::ProtoDirs;
use crate::instruction::{BuildDefinition, ChainLayout, Instruction, RunStep};
use crate::path::{absolutize, display};
use crate::{BuildError, Language, Versions};

/// Host-side facts the build definition is assembled against.
#[derive(Debug, Clone)]
pub struct BuildContext {
    /// Host working directory, mirrored as the image's `WORKDIR`.
    pub workdir: PathBuf,
    /// GOPATH inside the image; generated Go code lands under `$GOPATH/src`.
    pub gopath: String,
    pub versions: Versions,
}

impl BuildContext {
    pub fn new(workdir: impl Into<PathBuf>, gopath: impl Into<String>) -> Self {
        Self {
            workdir: workdir.into(),
            gopath: gopath.into(),
            versions: Versions::default(),
        }
    }

    pub fn with_versions(mut self, versions: Versions) -> Self {
        self.versions = versions;
        self
    }
}

pub struct InstructionBuilder {
    ctx: BuildContext,
}

impl InstructionBuilder {
    pub fn new(ctx: BuildContext) -> Self {
        Self { ctx }
    }

    /// Build for a language given by name, refusing names outside [`Language::NAMES`].
    pub fn build_named(&self, language: &str, dirs: &ProtoDirs) -> Result<BuildDefinition, BuildError> {
        let language: Language = language.parse()?;
        self.build(language, dirs)
    }

    pub fn build(&self, language: Language, dirs: &ProtoDirs) -> Result<BuildDefinition, BuildError> {
        let mut def = BuildDefinition::new();
        match language {
            Language::Go => {
                def.extend(self.go_base());
                def.extend(self.protoc_install());
                def.extend(self.go_install());
                def.push(self.workdir());
                def.extend(dirs.iter().map(add_protos));
                def.extend(dirs.iter().map(|dir| self.go_compile(dir)));
                def.push(self.entrypoint(language.generated_pattern()));
            }
        }
        def.check_variable_order()?;
        debug!(%language, dirs = dirs.len(), instructions = def.len(), "assembled build definition");
        Ok(def)
    }

    fn go_base(&self) -> Vec<Instruction> {
        vec![Instruction::From(format!("golang:{}", self.ctx.versions.go))]
    }

    fn protoc_install(&self) -> Vec<Instruction> {
        vec![
            Instruction::Run(RunStep::chained(
                ["apt update", "apt install unzip"],
                ChainLayout::Inline,
            )),
            Instruction::env("PROTOC_VERSION", &self.ctx.versions.protoc),
            Instruction::Run(RunStep::chained(
                [
                    "wget https://github.com/google/protobuf/releases/download/\
                     v${PROTOC_VERSION}/protoc-${PROTOC_VERSION}-linux-x86_64.zip",
                    "unzip protoc-${PROTOC_VERSION}-linux-x86_64.zip -d protoc",
                    "mv protoc/bin/protoc /usr/bin/protoc",
                ],
                ChainLayout::Continued,
            )),
        ]
    }

    fn go_install(&self) -> Vec<Instruction> {
        let gopath = &self.ctx.gopath;
        vec![
            Instruction::env("GOPATH", gopath),
            Instruction::env_assign("PATH", format!("{gopath}/bin:${{PATH}}")),
            Instruction::env("PROTOC_GEN_GO_VERSION", &self.ctx.versions.protoc_gen_go),
            Instruction::Run(RunStep::chained(
                [
                    "GOPATH=${GOPATH} mkdir -p ${GOPATH}/src/github.com/golang",
                    "cd ${GOPATH}/src/github.com/golang",
                    "git clone https://github.com/golang/protobuf",
                    "cd protobuf",
                    "git checkout ${PROTOC_GEN_GO_VERSION}",
                    "go get ./protoc-gen-go",
                ],
                ChainLayout::Continued,
            )),
        ]
    }

    fn workdir(&self) -> Instruction {
        Instruction::Workdir(display(&self.ctx.workdir))
    }

    fn go_compile(&self, dir: &Path) -> Instruction {
        let abs = display(&absolutize(&self.ctx.workdir, dir));
        Instruction::Run(RunStep::single(format!(
            "protoc --go_out=plugins=grpc:${{GOPATH}}/src -I${{GOPATH}}/src {abs}/*.proto"
        )))
    }

    fn entrypoint(&self, pattern: &str) -> Instruction {
        Instruction::Entrypoint(format!(
            "find {} -name '{pattern}'",
            display(&self.ctx.workdir)
        ))
    }
}

/// Stage only the `.proto` files of `dir` at the same relative path in the image.
fn add_protos(dir: &Path) -> Instruction {
    let dir = display(dir);
    Instruction::Add {
        src: format!("{dir}/*.proto"),
        dest: format!("{dir}/"),
    }
}
