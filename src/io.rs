use image::codecs::png::PngEncoder;
use image::{ImageEncoder, ImageError, RgbaImage};
use rfd::FileDialog;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Error type for PNG export
#[derive(Debug)]
pub enum ExportError {
    Io(std::io::Error),
    Encode(String),
    /// The user dismissed the save dialog.
    Cancelled,
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::Io(e) => write!(f, "I/O error: {}", e),
            ExportError::Encode(e) => write!(f, "Encoding error: {}", e),
            ExportError::Cancelled => write!(f, "Export cancelled"),
        }
    }
}

impl std::error::Error for ExportError {}

impl From<std::io::Error> for ExportError {
    fn from(e: std::io::Error) -> Self {
        ExportError::Io(e)
    }
}

impl From<ImageError> for ExportError {
    fn from(e: ImageError) -> Self {
        match e {
            ImageError::IoError(io) => ExportError::Io(io),
            other => ExportError::Encode(other.to_string()),
        }
    }
}

/// `<prefix>-<unix millis>.png`
pub fn suggested_file_name(prefix: &str) -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    format!("{}-{}.png", prefix, millis)
}

/// Encode `image` as an RGBA PNG at `path`.
pub fn write_png(image: &RgbaImage, path: &Path) -> Result<(), ExportError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    PngEncoder::new(&mut writer).write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        image::ColorType::Rgba8,
    )?;
    Ok(())
}

/// Destination for exported images.  Returns where the file ended up.
pub trait ImageSink {
    fn save_png(&mut self, image: &RgbaImage, file_name: &str) -> Result<PathBuf, ExportError>;
}

/// Asks the user where to save through the native file dialog.
#[derive(Default)]
pub struct FileDialogSink {
    last_dir: Option<PathBuf>,
}

impl ImageSink for FileDialogSink {
    fn save_png(&mut self, image: &RgbaImage, file_name: &str) -> Result<PathBuf, ExportError> {
        let mut dialog = FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name(file_name);
        if let Some(dir) = &self.last_dir {
            dialog = dialog.set_directory(dir);
        }
        let mut path = dialog.save_file().ok_or(ExportError::Cancelled)?;
        if path.extension().is_none() {
            path.set_extension("png");
        }
        write_png(image, &path)?;
        self.last_dir = path.parent().map(Path::to_path_buf);
        Ok(path)
    }
}

/// Writes straight into a fixed directory, no prompting.
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ImageSink for DirectorySink {
    fn save_png(&mut self, image: &RgbaImage, file_name: &str) -> Result<PathBuf, ExportError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(file_name);
        write_png(image, &path)?;
        Ok(path)
    }
}
