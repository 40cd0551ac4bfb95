use std::fmt;

/// Failure talking to the RSVP API.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RepositoryError {
    Timeout,
    Transport(String),
    Status(u16),
    Decode(String),
}

impl fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepositoryError::Timeout => write!(f, "rsvp api request timed out"),
            RepositoryError::Transport(err) => write!(f, "rsvp api transport error: {err}"),
            RepositoryError::Status(status) => write!(f, "rsvp api upstream error {status}"),
            RepositoryError::Decode(err) => write!(f, "rsvp api response decode error: {err}"),
        }
    }
}

impl std::error::Error for RepositoryError {}

/// User-facing outcome of a failed flow step. `Display` yields the exact
/// message shown to the guest or admin.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FlowError {
    Validation(&'static str),
    NotFound(&'static str),
    BadRequest(&'static str),
    Unauthorized(&'static str),
    Server(u16),
    UnexpectedResponse,
    Timeout,
    Transport(&'static str),
}

impl fmt::Display for FlowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowError::Validation(message)
            | FlowError::NotFound(message)
            | FlowError::BadRequest(message)
            | FlowError::Unauthorized(message)
            | FlowError::Transport(message) => f.write_str(message),
            FlowError::Server(status) => write!(f, "Error del servidor ({status})."),
            FlowError::UnexpectedResponse => f.write_str("Respuesta inesperada del servidor."),
            FlowError::Timeout => f.write_str("Tiempo de espera agotado."),
        }
    }
}

impl std::error::Error for FlowError {}

/// Per-flow wording for the statuses a flow distinguishes.
pub(crate) struct FlowMessages {
    pub bad_request: &'static str,
    pub not_found: &'static str,
    pub unauthorized: &'static str,
    pub transport: &'static str,
}

impl FlowMessages {
    pub(crate) fn map(&self, err: RepositoryError) -> FlowError {
        match err {
            RepositoryError::Status(400) => FlowError::BadRequest(self.bad_request),
            RepositoryError::Status(401) => FlowError::Unauthorized(self.unauthorized),
            RepositoryError::Status(404) => FlowError::NotFound(self.not_found),
            RepositoryError::Status(status) => FlowError::Server(status),
            RepositoryError::Decode(_) => FlowError::UnexpectedResponse,
            RepositoryError::Timeout => FlowError::Timeout,
            RepositoryError::Transport(_) => FlowError::Transport(self.transport),
        }
    }
}
