use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use tracing::warn;

use crate::backend::{Backend, HttpBackend};
use crate::commands::terminal::TerminalSurface;
use crate::config::Settings;
use crate::info::InfoFetch;
use crate::preview::{Preview, SelectedFile};
use crate::surface::Region;
use crate::upload::UploadFlow;

pub fn run(settings: &Settings, file: &Path, with_info: bool, quiet: bool) -> anyhow::Result<()> {
    if !file.exists() {
        anyhow::bail!("File not found: {}", file.display());
    }
    let backend = HttpBackend::new(&settings.base_url, settings.timeout);
    classify(&backend, file, with_info, &mut TerminalSurface::new(quiet), quiet)
}

fn classify(
    backend: &dyn Backend,
    path: &Path,
    with_info: bool,
    surface: &mut TerminalSurface,
    quiet: bool,
) -> anyhow::Result<()> {
    let selected = SelectedFile::read(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let preview = Preview::decode(&selected)
        .inspect_err(|e| warn!(file = %selected.name, "not a decodable image: {e}"))
        .ok();

    let mut upload = UploadFlow::default();
    upload.select_file(selected, preview.as_ref(), surface);
    let Some(file) = upload.submit(surface) else {
        anyhow::bail!("Nothing to upload");
    };

    if !quiet {
        println!("{} {}", "Uploading".cyan(), file.name);
    }
    upload.on_reply(backend.classify(&file), surface);

    let Some(label) = surface.link(Region::ResultText).map(str::to_owned) else {
        anyhow::bail!("{} was not classified", file.name);
    };

    if with_info {
        let mut fetch = InfoFetch::default();
        let label = fetch.request(&label);
        let reply = backend.tumor_info(&label);
        let failed = reply.is_err();
        fetch.on_reply(&label, reply, surface);
        if failed {
            anyhow::bail!("No description available for {label}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::UploadReply;
    use crate::worker::testing::ScriptedBackend;

    fn scan(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("scan.png");
        std::fs::write(&path, crate::preview::png_bytes(4, 4)).unwrap();
        path
    }

    #[test]
    fn test_classify_with_info() {
        let dir = tempfile::tempdir().unwrap();
        let backend = ScriptedBackend {
            upload: Some(UploadReply {
                error: None,
                result: Some("pituitary".into()),
            }),
            info: Some("Pituitary tumors grow in the pituitary gland.".into()),
            ..Default::default()
        };
        let mut surface = TerminalSurface::new(true);
        classify(&backend, &scan(dir.path()), true, &mut surface, true).unwrap();
        assert_eq!(surface.link(Region::ResultText), Some("PITUITARY"));
        assert_eq!(backend.calls(), vec!["upload scan.png", "info PITUITARY"]);
    }

    #[test]
    fn test_rejected_image_fails_without_info_request() {
        let dir = tempfile::tempdir().unwrap();
        let backend = ScriptedBackend {
            upload: Some(UploadReply {
                error: Some("Not an MRI image".into()),
                result: None,
            }),
            ..Default::default()
        };
        let mut surface = TerminalSurface::new(true);
        let err = classify(&backend, &scan(dir.path()), true, &mut surface, true).unwrap_err();
        assert!(err.to_string().contains("was not classified"));
        assert_eq!(surface.text(Region::ResultText), Some("Not an MRI image"));
        assert_eq!(backend.calls(), vec!["upload scan.png"]);
    }

    #[test]
    fn test_missing_info_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let backend = ScriptedBackend {
            upload: Some(UploadReply {
                error: None,
                result: Some("notumor".into()),
            }),
            ..Default::default()
        };
        let mut surface = TerminalSurface::new(true);
        let err = classify(&backend, &scan(dir.path()), true, &mut surface, true).unwrap_err();
        assert!(err.to_string().contains("NOTUMOR"));
    }
}
