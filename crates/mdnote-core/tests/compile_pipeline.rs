//! Integration tests for the notebook → manifest pipeline.
//!
//! Each test compiles a notebook into a temporary output root and checks the
//! artifacts on disk.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use mdnote_core::{CompileOptions, Error, ReferencePolicy, compile_to_dir};
use tempfile::TempDir;

// =============================================================================
// Test Helpers
// =============================================================================

/// A temporary workspace with a driver directory and an output root.
struct Workspace {
    temp: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let drivers = temp.path().join("drivers");
        fs::create_dir_all(&drivers).expect("Failed to create drivers dir");
        fs::write(drivers.join("bash"), "_pos:drivers:out/bash\n").unwrap();
        fs::write(drivers.join("python"), "  _pos:drivers:out/python  \n").unwrap();
        Self { temp }
    }

    fn drivers(&self) -> PathBuf {
        self.temp.path().join("drivers")
    }

    fn out(&self) -> PathBuf {
        self.temp.path().join("out")
    }

    fn compile(&self, source: &str) -> mdnote_core::Result<mdnote_core::Plan> {
        compile_to_dir(
            Cursor::new(source),
            self.drivers(),
            self.out(),
            CompileOptions::default(),
        )
    }

    fn read(&self, relative: &str) -> String {
        read(&self.out().join(relative))
    }
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {}: {e}", path.display()))
}

/// A notebook with prose, a fan-in dependency and a python cell.
fn pipeline_notebook() -> &'static str {
    r#"Pipeline notebook.

# split
```bash
cut -d, -f1 data.csv > out/names
cut -d, -f2 data.csv > out/scores
```

Reverse the letters.

# tac.py
- split
```python
import sys
for line in reversed(open('in/inputs/split/names').readlines()):
    sys.stdout.write(line)

```

# recombine
- split
- tac.py
```python
names = open('@OUT(split,out/names)')
print(names.read())
```
"#
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_hello_scenario() {
    let ws = Workspace::new();
    ws.compile("# hello\n```bash\necho hi\n```\n").unwrap();

    assert_eq!(ws.read("order"), "hello\n");
    assert_eq!(ws.read("scripts/hello"), "echo hi\n");
    assert_eq!(ws.read("cells/hello"), "# hello\n```bash\necho hi\n```\n");

    let plan = ws.read("plan");
    assert_eq!(
        plan,
        "_pos=hello\n\
         process=command:chmod +x in/driver && ./in/driver\n\
         in/driver=_pos:drivers:out/bash\n\
         in/script=file:scripts/hello\n\
         \n\
         _pos=main\n\
         process=identity\n\
         in/order=file:order\n\
         in/outs/hello/=_pos:hello:out/\n\
         in/cells/hello=file:cells/hello\n\
         \n"
    );
    assert!(!plan.contains("in/inputs/"));
}

#[test]
fn test_single_prerequisite_scenario() {
    let ws = Workspace::new();
    ws.compile("# a\n```bash\ntrue\n```\n# b\n- a\n```bash\ntrue\n```\n")
        .unwrap();

    let plan = ws.read("plan");
    let b_block = plan
        .split("\n\n")
        .find(|block| block.starts_with("_pos=b\n"))
        .expect("missing block for b");
    let inputs: Vec<_> = b_block
        .lines()
        .filter(|line| line.starts_with("in/inputs/"))
        .collect();
    assert_eq!(inputs, vec!["in/inputs/a/=_pos:a:out/"]);
}

// =============================================================================
// Artifact Properties
// =============================================================================

#[test]
fn test_order_lists_cells_in_document_order() {
    let ws = Workspace::new();
    let plan = ws.compile(pipeline_notebook()).unwrap();

    assert_eq!(plan.len(), 3);
    assert_eq!(ws.read("order"), "split\ntac.py\nrecombine\n");
}

#[test]
fn test_cell_records_reconstruct_source() {
    let ws = Workspace::new();
    let source = pipeline_notebook();
    ws.compile(source).unwrap();

    for name in ["split", "tac.py", "recombine"] {
        let record = ws.read(&format!("cells/{name}"));
        assert!(record.starts_with(&format!("# {name}\n")));
        assert!(record.ends_with("```\n"));
        assert!(source.contains(&record), "record for {name} not found verbatim");
    }
}

#[test]
fn test_scripts_are_byte_exact() {
    let ws = Workspace::new();
    ws.compile(pipeline_notebook()).unwrap();

    assert_eq!(
        ws.read("scripts/tac.py"),
        "import sys\nfor line in reversed(open('in/inputs/split/names').readlines()):\n    sys.stdout.write(line)\n\n"
    );
    assert_eq!(
        ws.read("scripts/recombine"),
        "names = open('@OUT(split,out/names)')\nprint(names.read())\n"
    );
}

#[test]
fn test_prerequisite_lines_follow_declaration_order() {
    let ws = Workspace::new();
    ws.compile(pipeline_notebook()).unwrap();

    let plan = ws.read("plan");
    let block = plan
        .split("\n\n")
        .find(|block| block.starts_with("_pos=recombine\n"))
        .expect("missing block for recombine");
    let lines: Vec<_> = block.lines().collect();
    assert_eq!(
        lines,
        vec![
            "_pos=recombine",
            "process=command:chmod +x in/driver && ./in/driver",
            "in/driver=_pos:drivers:out/python",
            "in/script=file:scripts/recombine",
            "in/inputs/split/=_pos:split:out/",
            "in/inputs/tac.py/=_pos:tac.py:out/",
        ]
    );
}

#[test]
fn test_main_block_lists_every_step_once() {
    let ws = Workspace::new();
    ws.compile(pipeline_notebook()).unwrap();

    let plan = ws.read("plan");
    let main = &plan[plan.find("_pos=main\n").expect("missing main block")..];
    let lines: Vec<_> = main.trim_end().lines().collect();
    assert_eq!(
        lines,
        vec![
            "_pos=main",
            "process=identity",
            "in/order=file:order",
            "in/outs/split/=_pos:split:out/",
            "in/cells/split=file:cells/split",
            "in/outs/tac.py/=_pos:tac.py:out/",
            "in/cells/tac.py=file:cells/tac.py",
            "in/outs/recombine/=_pos:recombine:out/",
            "in/cells/recombine=file:cells/recombine",
        ]
    );
    assert!(plan.ends_with("in/cells/recombine=file:cells/recombine\n\n"));
}

#[test]
fn test_compilation_is_idempotent() {
    let first = Workspace::new();
    let second = Workspace::new();
    first.compile(pipeline_notebook()).unwrap();
    second.compile(pipeline_notebook()).unwrap();

    assert_eq!(first.read("order"), second.read("order"));
    assert_eq!(first.read("plan"), second.read("plan"));
}

// =============================================================================
// Failures
// =============================================================================

#[test]
fn test_missing_driver_fence_writes_nothing() {
    let ws = Workspace::new();
    let err = ws
        .compile("# a\n```bash\ntrue\n```\n# b\n- a\n")
        .unwrap_err();

    assert!(matches!(err, Error::UnexpectedEof { .. }));
    assert!(!ws.out().join("order").exists());
    assert!(!ws.out().join("plan").exists());
    assert!(!ws.out().join("scripts/a").exists());
}

#[test]
fn test_unknown_driver_writes_nothing() {
    let ws = Workspace::new();
    let err = ws.compile("# a\n```perl\nprint 1\n```\n").unwrap_err();

    assert!(matches!(err, Error::DriverNotFound { ref name, .. } if name == "perl"));
    assert!(!ws.out().join("plan").exists());
}

#[test]
fn test_strict_references_report_all_issues() {
    let ws = Workspace::new();
    let source = "# a\n- later\n- ghost\n```bash\n```\n# later\n```bash\n```\n";
    let err = compile_to_dir(
        Cursor::new(source),
        ws.drivers(),
        ws.out(),
        CompileOptions {
            references: ReferencePolicy::Deny,
        },
    )
    .unwrap_err();

    match err {
        Error::UnresolvedPrerequisites(issues) => {
            let names: Vec<_> = issues.iter().map(|i| i.prerequisite.as_str()).collect();
            assert_eq!(names, vec!["later", "ghost"]);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!ws.out().join("order").exists());
}
