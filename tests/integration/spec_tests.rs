use std::cell::RefCell;
use std::path::{Path, PathBuf};

use protocc_core::{BuildContext, BuildError, Language};
use protocc_exec::{
    CommandObserver, CommandOutput, ContainerEngine, EngineCommand, ExecError, Pipeline,
};

/// Engine that records every call and answers from a script instead of running docker.
struct RecordingEngine {
    calls: RefCell<Vec<EngineCommand>>,
    run_stdout: String,
    build_code: i32,
}

impl RecordingEngine {
    fn reporting(run_stdout: &str) -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            run_stdout: run_stdout.to_string(),
            build_code: 0,
        }
    }

    fn failing_build(code: i32) -> Self {
        Self {
            build_code: code,
            ..Self::reporting("")
        }
    }

    fn count(&self, pred: impl Fn(&EngineCommand) -> bool) -> usize {
        self.calls.borrow().iter().filter(|&c| pred(c)).count()
    }

    fn definitions(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| c.stdin().map(str::to_string))
            .collect()
    }

    fn copies(&self) -> Vec<(String, PathBuf, PathBuf)> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                EngineCommand::CopyOut {
                    container,
                    path,
                    dest,
                } => Some((container.clone(), path.clone(), dest.clone())),
                _ => None,
            })
            .collect()
    }
}

impl ContainerEngine for RecordingEngine {
    fn program(&self) -> &str {
        "docker"
    }

    fn execute(&self, command: &EngineCommand) -> Result<CommandOutput, ExecError> {
        self.calls.borrow_mut().push(command.clone());
        Ok(match command {
            EngineCommand::Build { .. } => CommandOutput {
                code: Some(self.build_code),
                stdout: Vec::new(),
            },
            EngineCommand::Run { .. } => {
                CommandOutput::success().with_stdout(self.run_stdout.clone())
            }
            _ => CommandOutput::success(),
        })
    }
}

#[derive(Default)]
struct Echoed(RefCell<Vec<String>>);

impl CommandObserver for Echoed {
    fn on_command(&self, command_line: &str) {
        self.0.borrow_mut().push(command_line.to_string());
    }
}

fn touch(root: &Path, rel: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, b"syntax = \"proto3\";\n").unwrap();
}

fn project() -> tempfile::TempDir {
    let tmp = tempfile::tempdir().unwrap();
    touch(tmp.path(), "api/v1/service.proto");
    touch(tmp.path(), "vendor/third_party/dep.proto");
    tmp
}

fn context() -> BuildContext {
    BuildContext::new("/go/src/example.com/proj", "/go")
}

fn langs(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

#[test]
fn go_run_skips_vendor_and_copies_reported_files() {
    let tmp = project();
    let engine = RecordingEngine::reporting("./api/v1/foo.pb.go\n./api/v1/bar.pb.go\n");
    let observer = Echoed::default();

    let reports = Pipeline::new(&engine, &observer, tmp.path(), context())
        .with_unique_names(false)
        .run(&langs(&["go"]))
        .unwrap();

    assert_eq!(reports.len(), 1);
    let report = &reports[0];
    assert_eq!(report.language, Language::Go);
    let dirs: Vec<&Path> = report.dirs.iter().collect();
    assert_eq!(dirs, [Path::new("./api/v1")]);

    let definitions = engine.definitions();
    assert_eq!(definitions.len(), 1);
    let lines: Vec<&str> = definitions[0].lines().collect();
    let adds: Vec<_> = lines.iter().filter(|l| l.starts_with("ADD ")).collect();
    let compiles: Vec<_> = lines.iter().filter(|l| l.starts_with("RUN protoc ")).collect();
    assert_eq!(adds, [&"ADD ./api/v1/*.proto ./api/v1/"]);
    assert_eq!(
        compiles,
        [&"RUN protoc --go_out=plugins=grpc:${GOPATH}/src -I${GOPATH}/src /go/src/example.com/proj/api/v1/*.proto"]
    );
    assert_eq!(
        lines.last(),
        Some(&"ENTRYPOINT find /go/src/example.com/proj -name '*.pb.go'")
    );

    let copies = engine.copies();
    assert_eq!(copies.len(), 2);
    for ((container, path, dest), expected) in copies
        .iter()
        .zip(["./api/v1/foo.pb.go", "./api/v1/bar.pb.go"])
    {
        assert_eq!(container, "protocc");
        assert_eq!(path, Path::new(expected));
        assert_eq!(dest, path);
    }
    assert_eq!(report.files.len(), 2);

    let echoed = observer.0.borrow();
    assert_eq!(echoed.len(), engine.calls.borrow().len());
    assert!(echoed.contains(&"docker cp protocc:./api/v1/foo.pb.go ./api/v1/foo.pb.go".to_string()));
}

#[test]
fn omitted_language_touches_no_engine() {
    let tmp = project();
    let engine = RecordingEngine::reporting("");
    let observer = Echoed::default();

    let err = Pipeline::new(&engine, &observer, tmp.path(), context())
        .run(&[])
        .unwrap_err();

    assert!(matches!(err, ExecError::NoLanguageSelected));
    assert!(engine.calls.borrow().is_empty());
    assert!(observer.0.borrow().is_empty());
}

#[test]
fn unsupported_language_touches_no_engine() {
    let tmp = project();
    let engine = RecordingEngine::reporting("");
    let observer = Echoed::default();

    let err = Pipeline::new(&engine, &observer, tmp.path(), context())
        .run(&langs(&["go", "java"]))
        .unwrap_err();

    assert!(matches!(
        err,
        ExecError::Build(BuildError::UnsupportedLanguage(ref l)) if l == "java"
    ));
    assert!(engine.calls.borrow().is_empty());
}

#[test]
fn build_failure_skips_run_and_copy() {
    let tmp = project();
    let engine = RecordingEngine::failing_build(1);
    let observer = Echoed::default();

    let err = Pipeline::new(&engine, &observer, tmp.path(), context())
        .run(&langs(&["go"]))
        .unwrap_err();

    assert!(matches!(err, ExecError::BuildFailed { code: Some(1), .. }));
    assert_eq!(engine.count(|c| matches!(c, EngineCommand::Build { .. })), 1);
    assert_eq!(engine.count(|c| matches!(c, EngineCommand::Run { .. })), 0);
    assert_eq!(engine.count(|c| matches!(c, EngineCommand::CopyOut { .. })), 0);
}

#[test]
fn each_invocation_gets_its_own_names() {
    let tmp = project();
    let engine = RecordingEngine::reporting("/w/a.pb.go\n");
    let observer = Echoed::default();

    Pipeline::new(&engine, &observer, tmp.path(), context())
        .run(&langs(&["go", "go"]))
        .unwrap();

    let calls = engine.calls.borrow();
    let runs: Vec<_> = calls
        .iter()
        .filter_map(|c| match c {
            EngineCommand::Run { name, image } => Some((name.clone(), image.clone())),
            _ => None,
        })
        .collect();
    assert_eq!(runs.len(), 2);
    assert_ne!(runs[0], runs[1]);
    for (name, image) in &runs {
        assert!(name.starts_with("protocc-"));
        assert!(image.starts_with("tmp/protocc:"));
        // the per-invocation image is cleaned up with the container
        assert!(calls.contains(&EngineCommand::RemoveImage { tag: image.clone() }));
        assert!(calls.contains(&EngineCommand::RemoveContainer { name: name.clone() }));
    }
}

#[test]
fn project_without_protos_still_runs_discovery_instruction() {
    let tmp = tempfile::tempdir().unwrap();
    let engine = RecordingEngine::reporting("");
    let observer = Echoed::default();

    let reports = Pipeline::new(&engine, &observer, tmp.path(), context())
        .with_unique_names(false)
        .run(&langs(&["go"]))
        .unwrap();

    assert!(reports[0].dirs.is_empty());
    assert!(reports[0].files.is_empty());
    assert!(!engine.definitions()[0].contains("ADD "));
    assert_eq!(engine.count(|c| matches!(c, EngineCommand::CopyOut { .. })), 0);
}
