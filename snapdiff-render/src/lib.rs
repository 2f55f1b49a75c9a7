//! # snapdiff-render
//!
//! Renders unified diffs to images through an external syntax-highlighting
//! tool and optionally uploads each image for a retrievable URI.
//!
//! A render pass walks the change set in order; individual files that fail
//! to render are recorded and skipped, never fatal. The whole pass fails
//! only when the renderer binary itself cannot be located.

pub mod error;
pub mod upload;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use log::warn;

use snapdiff_core::config::{RenderConfig, UploadConfig};
use snapdiff_core::tool::ExternalTool;
use snapdiff_core::types::{ChangeSet, RenderedImage};

use crate::error::io_err;
pub use error::RenderError;

// ---------------------------------------------------------------------------
// Render outcome
// ---------------------------------------------------------------------------

/// Result of a render pass over a change set.
#[derive(Debug, Default)]
pub struct RenderOutcome {
    /// Successfully rendered images, keyed by source path.
    pub images: HashMap<PathBuf, RenderedImage>,
    /// Paths whose diff extraction or render failed (logged, skipped).
    pub failed: Vec<PathBuf>,
}

// ---------------------------------------------------------------------------
// DiffRenderer
// ---------------------------------------------------------------------------

/// Drives the external renderer over every changed file.
pub struct DiffRenderer<'a> {
    config: &'a RenderConfig,
    /// Resolved output directory (the config value joined onto the tracked root).
    output_dir: PathBuf,
    upload: Option<&'a UploadConfig>,
    tool: &'a dyn ExternalTool,
}

impl<'a> DiffRenderer<'a> {
    pub fn new(
        config: &'a RenderConfig,
        output_dir: PathBuf,
        upload: Option<&'a UploadConfig>,
        tool: &'a dyn ExternalTool,
    ) -> Self {
        Self {
            config,
            output_dir,
            upload,
            tool,
        }
    }

    /// Render every changed path, in change-set order.
    ///
    /// `diff_of` yields the unified diff for one path. An empty diff skips
    /// the path with a warning — a freshly added file has no prior revision
    /// to diff against. Fails as a whole only when the renderer binary is
    /// missing or the output directory cannot be created.
    pub fn render_all<E: std::fmt::Display>(
        &self,
        changes: &ChangeSet,
        mut diff_of: impl FnMut(&Path) -> Result<String, E>,
    ) -> Result<RenderOutcome, RenderError> {
        if !self.tool.locate() {
            return Err(RenderError::RendererNotFound {
                binary: self.config.binary.clone(),
            });
        }
        std::fs::create_dir_all(&self.output_dir).map_err(|e| io_err(&self.output_dir, e))?;

        let mut outcome = RenderOutcome::default();
        for path in changes {
            let diff = match diff_of(path) {
                Ok(diff) => diff,
                Err(err) => {
                    warn!("diff extraction failed for {}: {err}", path.display());
                    outcome.failed.push(path.clone());
                    continue;
                }
            };
            if diff.trim().is_empty() {
                warn!("empty diff for {}; nothing to render", path.display());
                continue;
            }
            match self.render_one(path, &diff) {
                Ok(mut image) => {
                    if let Some(upload) = self.upload.filter(|u| u.enabled) {
                        image.remote_uri = upload::put_image(upload, &image.image_path);
                    }
                    outcome.images.insert(path.clone(), image);
                }
                Err(err) => {
                    warn!("render failed for {}: {err}", path.display());
                    outcome.failed.push(path.clone());
                }
            }
        }

        if !outcome.failed.is_empty() {
            warn!(
                "{} file(s) failed to render: {}",
                outcome.failed.len(),
                outcome
                    .failed
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
        Ok(outcome)
    }

    fn render_one(&self, source: &Path, diff: &str) -> Result<RenderedImage, RenderError> {
        let image_path = self.output_dir.join(image_file_name(source));
        let output_arg = image_path.display().to_string();
        let title_arg = source.display().to_string();
        let output = self
            .tool
            .run_with_stdin(
                &[
                    "--language",
                    "diff",
                    "--font",
                    &self.config.font,
                    "--output",
                    &output_arg,
                    "--window-title",
                    &title_arg,
                ],
                diff,
            )
            .map_err(RenderError::Spawn)?;

        if !output.success {
            return Err(RenderError::RenderFailed {
                path: source.to_path_buf(),
                code: output.code,
                stderr: output.stderr.trim().to_string(),
            });
        }
        if !image_path.exists() {
            return Err(RenderError::MissingOutput { path: image_path });
        }
        // Absolute path so the local-file fallback reference stays valid
        // regardless of the caller's working directory.
        let image_path = image_path.canonicalize().unwrap_or(image_path);
        Ok(RenderedImage {
            source_path: source.to_path_buf(),
            image_path,
            remote_uri: None,
        })
    }
}

/// `<basename of source>.jpg` — deterministic, so re-runs overwrite.
pub fn image_file_name(source: &Path) -> String {
    let base = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "diff".to_string());
    format!("{base}.jpg")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::convert::Infallible;

    use snapdiff_core::tool::ToolOutput;
    use tempfile::TempDir;

    use super::*;

    /// Fake renderer: honors `--output`, records every invocation, and can
    /// be scripted to fail for sources whose title contains a marker.
    struct FakeRenderer {
        present: bool,
        fail_marker: Option<&'static str>,
        calls: RefCell<Vec<Vec<String>>>,
    }

    impl FakeRenderer {
        fn new() -> Self {
            Self {
                present: true,
                fail_marker: None,
                calls: RefCell::new(Vec::new()),
            }
        }

        fn arg_after(args: &[&str], flag: &str) -> Option<String> {
            args.iter()
                .position(|a| *a == flag)
                .and_then(|i| args.get(i + 1))
                .map(|s| s.to_string())
        }
    }

    impl ExternalTool for FakeRenderer {
        fn locate(&self) -> bool {
            self.present
        }

        fn run(&self, _args: &[&str]) -> std::io::Result<ToolOutput> {
            unreachable!("renderer is always driven through stdin")
        }

        fn run_with_stdin(&self, args: &[&str], _input: &str) -> std::io::Result<ToolOutput> {
            self.calls
                .borrow_mut()
                .push(args.iter().map(|s| s.to_string()).collect());
            let title = Self::arg_after(args, "--window-title").unwrap_or_default();
            if let Some(marker) = self.fail_marker {
                if title.contains(marker) {
                    return Ok(ToolOutput {
                        success: false,
                        code: Some(1),
                        stdout: String::new(),
                        stderr: "fontconfig error".to_string(),
                    });
                }
            }
            let output = Self::arg_after(args, "--output").expect("--output flag");
            std::fs::write(&output, b"jpeg").expect("write fake image");
            Ok(ToolOutput {
                success: true,
                code: Some(0),
                stdout: String::new(),
                stderr: String::new(),
            })
        }
    }

    fn changes(paths: &[&str]) -> ChangeSet {
        ChangeSet::from(paths.iter().map(|p| PathBuf::from(*p)).collect::<Vec<_>>())
    }

    fn diff_stub(_: &Path) -> Result<String, Infallible> {
        Ok("--- a/x\n+++ b/x\n@@ -1 +1 @@\n-old\n+new\n".to_string())
    }

    #[test]
    fn renders_every_path_in_order() {
        let out = TempDir::new().expect("out");
        let config = RenderConfig::default();
        let fake = FakeRenderer::new();
        let renderer = DiffRenderer::new(&config, out.path().to_path_buf(), None, &fake);

        let outcome = renderer
            .render_all(&changes(&["characters.yaml", "events.yaml"]), diff_stub)
            .expect("render");

        assert_eq!(outcome.images.len(), 2);
        assert!(outcome.failed.is_empty());
        let calls = fake.calls.borrow();
        assert_eq!(calls.len(), 2);
        assert!(calls[0].contains(&"characters.yaml".to_string()));
        assert!(calls[1].contains(&"events.yaml".to_string()));
        assert!(out.path().join("characters.yaml.jpg").exists());
    }

    #[test]
    fn missing_renderer_fails_whole_pass() {
        let out = TempDir::new().expect("out");
        let config = RenderConfig::default();
        let fake = FakeRenderer {
            present: false,
            ..FakeRenderer::new()
        };
        let renderer = DiffRenderer::new(&config, out.path().to_path_buf(), None, &fake);
        let err = renderer
            .render_all(&changes(&["characters.yaml"]), diff_stub)
            .expect_err("should fail");
        assert!(matches!(err, RenderError::RendererNotFound { .. }));
        assert!(fake.calls.borrow().is_empty());
    }

    #[test]
    fn per_file_failure_is_recorded_and_skipped() {
        let out = TempDir::new().expect("out");
        let config = RenderConfig::default();
        let fake = FakeRenderer {
            fail_marker: Some("events"),
            ..FakeRenderer::new()
        };
        let renderer = DiffRenderer::new(&config, out.path().to_path_buf(), None, &fake);

        let outcome = renderer
            .render_all(&changes(&["characters.yaml", "events.yaml"]), diff_stub)
            .expect("render");

        assert_eq!(outcome.images.len(), 1);
        assert!(outcome.images.contains_key(Path::new("characters.yaml")));
        assert_eq!(outcome.failed, vec![PathBuf::from("events.yaml")]);
    }

    #[test]
    fn empty_diff_is_skipped_without_failure() {
        let out = TempDir::new().expect("out");
        let config = RenderConfig::default();
        let fake = FakeRenderer::new();
        let renderer = DiffRenderer::new(&config, out.path().to_path_buf(), None, &fake);

        let outcome = renderer
            .render_all(
                &changes(&["characters.yaml"]),
                |_: &Path| -> Result<String, Infallible> { Ok(String::new()) },
            )
            .expect("render");

        assert!(outcome.images.is_empty());
        assert!(outcome.failed.is_empty());
        assert!(fake.calls.borrow().is_empty(), "renderer must not run");
    }

    #[test]
    fn diff_extraction_failure_marks_path_failed() {
        let out = TempDir::new().expect("out");
        let config = RenderConfig::default();
        let fake = FakeRenderer::new();
        let renderer = DiffRenderer::new(&config, out.path().to_path_buf(), None, &fake);

        let outcome = renderer
            .render_all(
                &changes(&["characters.yaml"]),
                |_: &Path| -> Result<String, &'static str> { Err("object not found") },
            )
            .expect("render");

        assert_eq!(outcome.failed, vec![PathBuf::from("characters.yaml")]);
    }

    #[test]
    fn image_file_name_is_basename_plus_jpg() {
        assert_eq!(
            image_file_name(Path::new("characters.yaml")),
            "characters.yaml.jpg"
        );
        assert_eq!(
            image_file_name(Path::new("nested/dir/events.yaml")),
            "events.yaml.jpg"
        );
    }
}
