use gst_data::error::DataError;
use plotters::drawing::DrawingAreaErrorKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlotError {
    /// The plotting backend failed to draw or present
    #[error("drawing failed: {0}")]
    Drawing(String),

    /// No finite values to derive axis ranges from
    #[error("nothing to plot: {0}")]
    Empty(String),

    #[error(transparent)]
    Data(#[from] DataError),
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for PlotError {
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        PlotError::Drawing(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PlotError>;
