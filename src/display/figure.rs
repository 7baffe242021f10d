use std::io;
use std::path::Path;
use std::sync::Mutex;

use once_cell::sync::Lazy;

use crate::display::error::ShowError;

/// Options applied when capturing a figure to a PNG file.
#[derive(Debug, Clone)]
pub struct SaveOptions {
    /// Crop the image to the drawn content instead of the full canvas.
    pub tight_bbox: bool,
    /// Padding margin (inches) kept around the content when cropping.
    pub pad_inches: f64,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            tight_bbox: true,
            pad_inches: 0.1,
        }
    }
}

/// A renderable plotting surface.
///
/// Plotting backends implement this so the display utilities can capture
/// their output; the rendering itself stays in the backend.
pub trait FigureSurface: Send {
    /// Render the figure as a PNG image at `path`.
    fn save_png(&self, path: &Path, options: &SaveOptions) -> io::Result<()>;
}

// Process-wide current-figure slot. One figure is active at a time; saving
// it through `show` closes it.
static CURRENT_FIGURE: Lazy<Mutex<Option<Box<dyn FigureSurface>>>> =
    Lazy::new(|| Mutex::new(None));

/// Install `figure` as the current figure, replacing any previous one.
pub fn set_current_figure(figure: Box<dyn FigureSurface>) {
    let mut slot = CURRENT_FIGURE.lock().unwrap();
    *slot = Some(figure);
}

/// Whether a figure is currently active.
pub fn has_current_figure() -> bool {
    CURRENT_FIGURE.lock().unwrap().is_some()
}

/// Drop the current figure without saving it. Returns whether one was open.
pub fn close_current_figure() -> bool {
    CURRENT_FIGURE.lock().unwrap().take().is_some()
}

/// Save the current figure to `path`, then close it. The figure stays open
/// if the save fails, so a retried call can capture it again.
pub(crate) fn save_current_figure(path: &Path, options: &SaveOptions) -> Result<(), ShowError> {
    let mut slot = CURRENT_FIGURE.lock().unwrap();
    let figure = slot.as_ref().ok_or(ShowError::NoActiveFigure)?;
    figure.save_png(path, options)?;
    slot.take();
    Ok(())
}
