use std::path::Path;

use crate::error::Result;

/// Longest edge of the decoded preview, in pixels.
const PREVIEW_MAX_EDGE: u32 = 512;

/// A file picked for upload, held until it is sent.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn read(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::from_bytes(name, bytes))
    }

    pub fn from_bytes(name: String, bytes: Vec<u8>) -> Self {
        let mime = mime_for(&name);
        Self { name, mime, bytes }
    }
}

fn mime_for(name: &str) -> &'static str {
    let ext = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Decoded RGBA thumbnail of a selected file.
#[derive(Debug, Clone)]
pub struct Preview {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl Preview {
    pub fn decode(file: &SelectedFile) -> Result<Self> {
        let image = image::load_from_memory(&file.bytes)?;
        let image = if image.width() > PREVIEW_MAX_EDGE || image.height() > PREVIEW_MAX_EDGE {
            image.thumbnail(PREVIEW_MAX_EDGE, PREVIEW_MAX_EDGE)
        } else {
            image
        };
        let rgba = image.to_rgba8();
        Ok(Self {
            width: rgba.width(),
            height: rgba.height(),
            rgba: rgba.into_raw(),
        })
    }
}

#[cfg(test)]
pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = image::RgbaImage::from_pixel(width, height, image::Rgba([40, 40, 40, 255]));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(image)
        .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_from_extension() {
        assert_eq!(mime_for("scan.PNG"), "image/png");
        assert_eq!(mime_for("scan.jpeg"), "image/jpeg");
        assert_eq!(mime_for("scan"), "application/octet-stream");
    }

    #[test]
    fn test_decode_keeps_small_images() {
        let file = SelectedFile::from_bytes("a.png".into(), png_bytes(32, 16));
        let preview = Preview::decode(&file).unwrap();
        assert_eq!((preview.width, preview.height), (32, 16));
        assert_eq!(preview.rgba.len(), 32 * 16 * 4);
    }

    #[test]
    fn test_decode_shrinks_large_images() {
        let file = SelectedFile::from_bytes("a.png".into(), png_bytes(1024, 512));
        let preview = Preview::decode(&file).unwrap();
        assert_eq!(preview.width, PREVIEW_MAX_EDGE);
        assert_eq!(preview.height, 256);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let file = SelectedFile::from_bytes("a.png".into(), b"not an image".to_vec());
        assert!(Preview::decode(&file).is_err());
    }

    #[test]
    fn test_read_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("brain.jpg");
        std::fs::write(&path, b"\xff\xd8").unwrap();
        let file = SelectedFile::read(&path).unwrap();
        assert_eq!(file.name, "brain.jpg");
        assert_eq!(file.mime, "image/jpeg");
        assert_eq!(file.bytes, b"\xff\xd8");
    }
}
