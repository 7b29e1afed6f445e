use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use ragcut_chunker::{
    chunk_documents, estimator_for, exports_to_json, reassemble, render, ChunkExport, Chunker,
};
use ragcut_core::{Config, Document, EstimatorKind, ExportFormat};

use crate::cli::{ChunkArgs, ChunkingArgs, Command, EstimateArgs};
use crate::config::RunSettings;

const STDIN_NAME: &str = "<stdin>";

pub fn run(command: Command, config: &Config, out: &mut impl Write) -> Result<()> {
    match command {
        Command::Chunk(args) => chunk(args, config, out),
        Command::Estimate(args) => estimate(args, config, out),
        Command::Reassemble { path, document } => reassemble_export(&path, document, out),
        Command::Config(args) => show_config(&args, config, out),
    }
}

// ── Input ───────────────────────────────────────────────────────────

/// Decode bytes as UTF-8, falling back to lossy conversion.
fn decode(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}

fn read_documents(files: &[PathBuf]) -> Result<Vec<Document>> {
    if files.is_empty() {
        let mut bytes = Vec::new();
        std::io::stdin()
            .read_to_end(&mut bytes)
            .context("failed to read stdin")?;
        return Ok(vec![Document::new(STDIN_NAME, decode(bytes))]);
    }

    files
        .iter()
        .map(|path| {
            let bytes = std::fs::read(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            Ok(Document::new(path.display().to_string(), decode(bytes)))
        })
        .collect()
}

// ── chunk ───────────────────────────────────────────────────────────

fn chunk(args: ChunkArgs, config: &Config, out: &mut impl Write) -> Result<()> {
    let settings = RunSettings::resolve(config, &args.chunking);
    settings.apply(config).log_summary();

    let documents = read_documents(&args.files)?;
    let chunker = Chunker::new(estimator_for(settings.estimator));

    if let Some(dir) = &settings.output_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create output dir: {}", dir.display()))?;
    }

    // Several JSON exports on stdout are collected into one array.
    let json_array = settings.output_dir.is_none()
        && settings.format == ExportFormat::Json
        && documents.len() > 1;
    let mut collected = Vec::new();
    let mut written = 0usize;
    let mut failed = 0usize;

    for doc in chunk_documents(&chunker, &documents, &settings.chunking) {
        let report = match doc.result {
            Ok(report) => report,
            Err(e) => {
                warn!("Failed to chunk {}: {}", doc.name, e);
                failed += 1;
                continue;
            }
        };
        for warning in &report.warnings {
            warn!("{}: {}", doc.name, warning);
        }

        let export = ChunkExport::new(
            Some(doc.name.clone()),
            settings.chunking,
            chunker.estimator(),
            report,
        );
        if json_array {
            collected.push(export);
            continue;
        }
        let rendered = render(&export, settings.format)?;

        match &settings.output_dir {
            Some(dir) => {
                let path = dir.join(export_file_name(&doc.name, settings.format.extension()));
                std::fs::write(&path, rendered)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                info!("{} → {} ({} chunks)", doc.name, path.display(), export.total_chunks);
            }
            None => {
                if written > 0 {
                    writeln!(out)?;
                }
                write_block(out, &rendered)?;
            }
        }
        written += 1;
    }

    if json_array {
        write_block(out, &exports_to_json(&collected)?)?;
    }

    if failed > 0 {
        bail!("{} of {} documents failed to chunk", failed, documents.len());
    }
    Ok(())
}

fn write_block(out: &mut impl Write, rendered: &str) -> Result<()> {
    write!(out, "{rendered}")?;
    if !rendered.ends_with('\n') {
        writeln!(out)?;
    }
    Ok(())
}

/// `notes/intro.md` + `json` → `intro.json`; stdin → `stdin.json`.
fn export_file_name(source: &str, extension: &str) -> String {
    let stem = if source == STDIN_NAME {
        "stdin"
    } else {
        Path::new(source)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("document")
    };
    format!("{stem}.{extension}")
}

// ── estimate ────────────────────────────────────────────────────────

fn estimate(args: EstimateArgs, config: &Config, out: &mut impl Write) -> Result<()> {
    let kind: EstimatorKind = args.estimator.unwrap_or(config.estimator);
    let estimator = estimator_for(kind);

    for doc in read_documents(&args.files)? {
        writeln!(
            out,
            "{}\t{} characters\t~{} tokens ({})",
            doc.name,
            doc.char_count(),
            estimator.estimate(&doc.text),
            estimator.name()
        )?;
    }
    Ok(())
}

// ── reassemble ──────────────────────────────────────────────────────

fn reassemble_export(path: &Path, document: Option<usize>, out: &mut impl Write) -> Result<()> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let mut exports = ChunkExport::from_json_many(&json)
        .with_context(|| format!("failed to parse export: {}", path.display()))?;

    let index = match (document, exports.len()) {
        (Some(i), n) if i >= n => bail!(
            "document {} not found: {} holds {} documents",
            i,
            path.display(),
            n
        ),
        (Some(i), _) => i,
        (None, 0) => bail!("{} holds no exports", path.display()),
        (None, 1) => 0,
        (None, n) => bail!(
            "{} holds {} documents; pick one with --document <0..{}>",
            path.display(),
            n,
            n - 1
        ),
    };
    let export = exports.swap_remove(index);

    let text = reassemble(&export.chunks)
        .with_context(|| format!("failed to reassemble {}", path.display()))?;
    write!(out, "{text}")?;
    Ok(())
}

// ── config ──────────────────────────────────────────────────────────

fn show_config(args: &ChunkingArgs, config: &Config, out: &mut impl Write) -> Result<()> {
    let merged = RunSettings::resolve(config, args).apply(config);
    writeln!(out, "{}", serde_json::to_string_pretty(&merged.summary())?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ragcut_core::config::OutputConfig;
    use ragcut_core::ChunkingConfig;

    fn test_config() -> Config {
        Config {
            profile: String::new(),
            chunking: ChunkingConfig::characters(4, 2),
            estimator: EstimatorKind::Heuristic,
            output: OutputConfig {
                format: ExportFormat::Json,
                dir: None,
            },
        }
    }

    fn write_input(dir: &Path, name: &str, text: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn chunk_writes_json_to_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), "letters.txt", "abcdefghij");

        let mut out = Vec::new();
        let command = Command::Chunk(ChunkArgs {
            files: vec![input],
            chunking: ChunkingArgs::default(),
        });
        run(command, &test_config(), &mut out).unwrap();

        let export = ChunkExport::from_json(&String::from_utf8(out).unwrap()).unwrap();
        assert_eq!(export.total_chunks, 4);
        assert_eq!(export.chunks[3].text, "ghij");
        assert!(export.source.unwrap().ends_with("letters.txt"));
    }

    #[test]
    fn chunk_writes_files_to_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_input(dir.path(), "a.txt", "first document");
        let b = write_input(dir.path(), "b.md", "second document");
        let out_dir = dir.path().join("exports");

        let mut out = Vec::new();
        let command = Command::Chunk(ChunkArgs {
            files: vec![a, b],
            chunking: ChunkingArgs {
                chunk_size: Some(100),
                overlap: Some(0),
                format: Some(ExportFormat::Markdown),
                output_dir: Some(out_dir.clone()),
                ..Default::default()
            },
        });
        run(command, &test_config(), &mut out).unwrap();

        assert!(out.is_empty());
        let a_md = std::fs::read_to_string(out_dir.join("a.md")).unwrap();
        assert!(a_md.contains("first document"));
        let b_md = std::fs::read_to_string(out_dir.join("b.md")).unwrap();
        assert!(b_md.contains("## Chunk 1 of 1"));
    }

    #[test]
    fn chunk_fails_on_zero_size() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), "x.txt", "text");

        let mut out = Vec::new();
        let command = Command::Chunk(ChunkArgs {
            files: vec![input],
            chunking: ChunkingArgs {
                chunk_size: Some(0),
                ..Default::default()
            },
        });
        let err = run(command, &test_config(), &mut out).unwrap_err();
        assert!(err.to_string().contains("1 of 1 documents failed"));
    }

    #[test]
    fn chunk_reports_missing_file() {
        let mut out = Vec::new();
        let command = Command::Chunk(ChunkArgs {
            files: vec![PathBuf::from("/definitely/not/here.txt")],
            chunking: ChunkingArgs::default(),
        });
        let err = run(command, &test_config(), &mut out).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }

    #[test]
    fn reassemble_restores_source() {
        let dir = tempfile::tempdir().unwrap();
        let source = "Overlapping chunks keep context.\nÜnïcödé too. ".repeat(5);
        let input = write_input(dir.path(), "src.txt", &source);

        let mut json = Vec::new();
        let command = Command::Chunk(ChunkArgs {
            files: vec![input],
            chunking: ChunkingArgs {
                chunk_size: Some(30),
                overlap: Some(7),
                ..Default::default()
            },
        });
        run(command, &test_config(), &mut json).unwrap();
        let export_path = write_input(dir.path(), "src.json", &String::from_utf8(json).unwrap());

        let mut out = Vec::new();
        let command = Command::Reassemble {
            path: export_path,
            document: None,
        };
        run(command, &test_config(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), source);
    }

    #[test]
    fn multiple_json_exports_on_stdout_form_an_array() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_input(dir.path(), "a.txt", "abcdefghij");
        let b = write_input(dir.path(), "b.txt", "Ünïcödé text");

        let mut json = Vec::new();
        let command = Command::Chunk(ChunkArgs {
            files: vec![a, b],
            chunking: ChunkingArgs::default(),
        });
        run(command, &test_config(), &mut json).unwrap();

        let json = String::from_utf8(json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(2));
        let exports = ChunkExport::from_json_many(&json).unwrap();
        assert!(exports[0].source.as_deref().unwrap().ends_with("a.txt"));
        assert!(exports[1].source.as_deref().unwrap().ends_with("b.txt"));

        let export_path = write_input(dir.path(), "all.json", &json);
        let mut out = Vec::new();
        let command = Command::Reassemble {
            path: export_path.clone(),
            document: Some(1),
        };
        run(command, &test_config(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Ünïcödé text");

        let mut out = Vec::new();
        let command = Command::Reassemble {
            path: export_path.clone(),
            document: None,
        };
        let err = run(command, &test_config(), &mut out).unwrap_err();
        assert!(err.to_string().contains("holds 2 documents"));

        let command = Command::Reassemble {
            path: export_path,
            document: Some(2),
        };
        let err = run(command, &test_config(), &mut out).unwrap_err();
        assert!(err.to_string().contains("document 2 not found"));
    }

    #[test]
    fn multiple_text_exports_on_stdout_are_separated() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_input(dir.path(), "a.txt", "abcd");
        let b = write_input(dir.path(), "b.txt", "efgh");

        let mut out = Vec::new();
        let command = Command::Chunk(ChunkArgs {
            files: vec![a, b],
            chunking: ChunkingArgs {
                format: Some(ExportFormat::Text),
                ..Default::default()
            },
        });
        run(command, &test_config(), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "=== Chunk 1/1 (4 characters, ~1 tokens) ===\nabcd\n\n\
             === Chunk 1/1 (4 characters, ~1 tokens) ===\nefgh\n"
        );
    }

    #[test]
    fn estimate_prints_counts() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), "e.txt", "one two three");

        let mut out = Vec::new();
        let command = Command::Estimate(EstimateArgs {
            files: vec![input],
            estimator: Some(EstimatorKind::Whitespace),
        });
        run(command, &test_config(), &mut out).unwrap();

        let line = String::from_utf8(out).unwrap();
        assert!(line.contains("13 characters"));
        assert!(line.contains("~3 tokens (whitespace)"));
    }

    #[test]
    fn config_prints_merged_json() {
        let mut out = Vec::new();
        let args = ChunkingArgs {
            overlap: Some(1),
            ..Default::default()
        };
        run(Command::Config(args), &test_config(), &mut out).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["chunking"]["chunkSize"], 4);
        assert_eq!(value["chunking"]["overlap"], 1);
        assert_eq!(value["profile"], "default");
    }

    #[test]
    fn export_file_names() {
        assert_eq!(export_file_name("notes/intro.md", "json"), "intro.json");
        assert_eq!(export_file_name(STDIN_NAME, "txt"), "stdin.txt");
    }

    #[test]
    fn decode_is_lossy_on_invalid_utf8() {
        assert_eq!(decode(b"ok".to_vec()), "ok");
        assert_eq!(decode(vec![b'a', 0xff, b'b']), "a\u{fffd}b");
    }
}
