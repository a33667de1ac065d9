use surround_engine::{CoordinateError, MoveError, PositionId};

#[derive(Debug)]
pub enum AppError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Move(MoveError),
    Coordinate(CoordinateError),
    InvalidRecord(String),
    Config(String),
    UnknownPosition(PositionId),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Io(e) => write!(f, "I/O error: {e}"),
            AppError::Json(e) => write!(f, "JSON error: {e}"),
            AppError::Move(e) => write!(f, "Illegal move: {e}"),
            AppError::Coordinate(e) => write!(f, "Bad coordinates: {e}"),
            AppError::InvalidRecord(msg) => write!(f, "Invalid game record: {msg}"),
            AppError::Config(msg) => write!(f, "Configuration error: {msg}"),
            AppError::UnknownPosition(id) => write!(f, "Position {id} is not in the move tree"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Io(e) => Some(e),
            AppError::Json(e) => Some(e),
            AppError::Move(e) => Some(e),
            AppError::Coordinate(e) => Some(e),
            AppError::InvalidRecord(_) | AppError::Config(_) | AppError::UnknownPosition(_) => None,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Io(e)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Json(e)
    }
}

impl From<MoveError> for AppError {
    fn from(e: MoveError) -> Self {
        AppError::Move(e)
    }
}

impl From<CoordinateError> for AppError {
    fn from(e: CoordinateError) -> Self {
        AppError::Coordinate(e)
    }
}
