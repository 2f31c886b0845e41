use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrackError {
    #[error("invalid tracker configuration: {0}")]
    InvalidConfig(String),
    #[error("failed to parse tracker configuration: {0}")]
    ConfigParse(String),
    #[error(
        "misaligned frame data: {boxes} box coordinates, {labels} labels, {scores} scores"
    )]
    MisalignedFrame {
        boxes: usize,
        labels: usize,
        scores: usize,
    },
}

impl From<serde_json::Error> for TrackError {
    fn from(err: serde_json::Error) -> Self {
        TrackError::ConfigParse(err.to_string())
    }
}
