//! Import preprocessor.
//!
//! Before lexing, leading `import "relpath";` lines are replaced by the
//! imported file's text, recursively. A file splices at most once per run:
//! deduplication is by canonical absolute path, so diamond imports and
//! cycles contribute a single copy and terminate.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

/// Loads `path` with every import spliced in place of its `import` line.
pub fn load_program(path: &Path) -> Result<String> {
    let mut seen = HashSet::new();
    load_spliced(path, &mut seen)
}

fn load_spliced(path: &Path, seen: &mut HashSet<PathBuf>) -> Result<String> {
    let canonical =
        fs::canonicalize(path).with_context(|| format!("Resolving {}", path.display()))?;
    if !seen.insert(canonical) {
        return Ok(String::new());
    }
    let source =
        fs::read_to_string(path).with_context(|| format!("Reading {}", path.display()))?;
    let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();

    let lines: Vec<&str> = source.lines().collect();
    let mut output = String::new();
    let mut index = 0;
    while index < lines.len() {
        let line = lines[index].trim();
        if line.is_empty() {
            index += 1;
            continue;
        }
        match parse_import(line)
            .with_context(|| format!("In {}", path.display()))?
        {
            Some(relative) => {
                let spliced = load_spliced(&dir.join(&relative), seen)
                    .with_context(|| format!("Importing \"{relative}\""))?;
                output.push_str(&spliced);
                if !output.is_empty() && !output.ends_with('\n') {
                    output.push('\n');
                }
                index += 1;
            }
            None => break,
        }
    }
    for line in &lines[index..] {
        output.push_str(line);
        output.push('\n');
    }
    Ok(output)
}

/// `import "relpath";` → the relative path. A line that does not open an
/// import returns `None` and ends the import block.
fn parse_import(line: &str) -> Result<Option<String>> {
    let Some(rest) = line.strip_prefix("import") else {
        return Ok(None);
    };
    if !rest.starts_with([' ', '\t', '"']) {
        return Ok(None);
    }
    let rest = rest.trim_start();
    if !rest.starts_with('"') {
        return Ok(None);
    }
    let Some(rest) = rest.strip_suffix(';') else {
        bail!("Malformed import statement: {line}");
    };
    let quoted = rest.trim_end();
    let path = quoted
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .filter(|inner| !inner.contains('"'))
        .ok_or_else(|| anyhow::anyhow!("Malformed import statement: {line}"))?;
    Ok(Some(path.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write as _;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "tinylang-imports-{tag}-{}",
            std::process::id()
        ));
        fs::create_dir_all(&dir).expect("create scratch dir");
        dir
    }

    fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).expect("create file");
        file.write_all(contents.as_bytes()).expect("write file");
        path
    }

    #[test]
    fn splices_imported_statements_in_front() {
        let dir = scratch_dir("splice");
        write_file(&dir, "lib.tl", "int shared = 1;\n");
        let main = write_file(&dir, "main.tl", "import \"lib.tl\";\nprint(shared);\n");

        let program = load_program(&main).expect("load program");
        assert_eq!(program, "int shared = 1;\nprint(shared);\n");
    }

    #[test]
    fn deduplicates_by_canonical_path() {
        let dir = scratch_dir("dedup");
        write_file(&dir, "c.tl", "int c = 3;\n");
        write_file(&dir, "a.tl", "import \"c.tl\";\nint a = 1;\n");
        write_file(&dir, "b.tl", "import \"c.tl\";\nint b = 2;\n");
        let main = write_file(
            &dir,
            "main.tl",
            "import \"a.tl\";\nimport \"b.tl\";\nprint(a + b + c);\n",
        );

        let program = load_program(&main).expect("load program");
        assert_eq!(
            program,
            "int c = 3;\nint a = 1;\nint b = 2;\nprint(a + b + c);\n"
        );
    }

    #[test]
    fn import_cycles_terminate() {
        let dir = scratch_dir("cycle");
        write_file(&dir, "x.tl", "import \"y.tl\";\nint x = 1;\n");
        write_file(&dir, "y.tl", "import \"x.tl\";\nint y = 2;\n");
        let main = write_file(&dir, "main.tl", "import \"x.tl\";\nprint(x + y);\n");

        let program = load_program(&main).expect("load program");
        assert_eq!(program, "int y = 2;\nint x = 1;\nprint(x + y);\n");
    }

    #[test]
    fn imports_below_the_top_are_left_alone() {
        let dir = scratch_dir("top-only");
        let main = write_file(&dir, "main.tl", "int x = 1;\nimport \"lib.tl\";\n");

        let program = load_program(&main).expect("load program");
        assert_eq!(program, "int x = 1;\nimport \"lib.tl\";\n");
    }

    #[test]
    fn missing_import_is_an_error() {
        let dir = scratch_dir("missing");
        let main = write_file(&dir, "main.tl", "import \"ghost.tl\";\n");

        let err = load_program(&main).expect_err("expected missing import");
        assert!(err.to_string().contains("ghost.tl"));
    }

    #[test]
    fn malformed_import_is_an_error() {
        let dir = scratch_dir("malformed");
        let main = write_file(&dir, "main.tl", "import \"lib.tl\"\n");

        let err = load_program(&main).expect_err("expected malformed import");
        assert!(format!("{err:#}").contains("Malformed import"));
    }

    #[test]
    fn identifier_starting_with_import_is_not_an_import() {
        let dir = scratch_dir("prefix");
        let main = write_file(&dir, "main.tl", "imported = 1;\nprint(imported);\n");

        let program = load_program(&main).expect("load program");
        assert_eq!(program, "imported = 1;\nprint(imported);\n");
    }
}
