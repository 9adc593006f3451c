//! Application state for the pagestrip API

/// Per-request intake limits. The per-file ceiling and the aggregate
/// budget are enforced separately: a request can violate either.
#[derive(Clone, Copy, Debug)]
pub struct UploadLimits {
    pub max_files: usize,
    pub max_file_bytes: usize,
    pub max_total_bytes: usize,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_files: 20,
            max_file_bytes: 10 * 1024 * 1024,
            max_total_bytes: 100 * 1024 * 1024,
        }
    }
}

/// How the finished archive reaches the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeliveryMode {
    /// Pipe archive bytes into the response body as entries are
    /// appended. Headers are committed before processing begins, so a
    /// failure mid-archive can only terminate the connection.
    Stream,
    /// Build the archive into an anonymous temp file, then deliver it
    /// whole. Failures surface as JSON errors; the file is unlinked
    /// when the handle drops.
    TempFile,
}

pub struct AppState {
    pub limits: UploadLimits,
    pub delivery: DeliveryMode,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            limits: UploadLimits::default(),
            delivery: DeliveryMode::Stream,
        }
    }
}

impl AppState {
    pub fn from_env() -> Self {
        let delivery = match std::env::var("PAGESTRIP_DELIVERY").as_deref() {
            Ok("tempfile") => DeliveryMode::TempFile,
            _ => DeliveryMode::Stream,
        };

        Self {
            limits: UploadLimits {
                max_files: env_or("PAGESTRIP_MAX_FILES", 20),
                max_file_bytes: env_or("PAGESTRIP_MAX_FILE_BYTES", 10 * 1024 * 1024),
                max_total_bytes: env_or("PAGESTRIP_MAX_TOTAL_BYTES", 100 * 1024 * 1024),
            },
            delivery,
        }
    }
}

fn env_or(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
