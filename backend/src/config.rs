use std::env;

/// Which handler is mounted on `POST /get-img-data`. Only one variant runs
/// per process.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadMode {
    /// Echo the upload back as an HTML page with an inline data URI.
    Echo,
    /// Send the upload to the vision model and return the receipt fields.
    Extract,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub model: String,
    pub mode: UploadMode,
    pub port: u16,
}

impl AppConfig {
    /// Read the configuration from the environment once at startup. A
    /// missing API key is not an error here; the model call fails lazily.
    pub fn from_env() -> Self {
        let api_key = env::var("GEMINI_API_KEY").unwrap_or_default();
        let model =
            env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-1.5-flash".to_string());
        let mode = match env::var("UPLOAD_MODE").as_deref() {
            Ok("echo") => UploadMode::Echo,
            _ => UploadMode::Extract,
        };
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8000);

        Self {
            api_key,
            model,
            mode,
            port,
        }
    }
}
