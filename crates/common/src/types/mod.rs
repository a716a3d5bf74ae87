use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Generic `{ "error": "..." }` body returned by every failing endpoint.
#[derive(Serialize, Debug)]
pub struct ErrorBody {
    pub error: String,
}
