//! Audio download and transcription.
//!
//! Downloads a YouTube video's audio track by shelling out to `yt-dlp`,
//! uploads it to an OpenAI-compatible Whisper endpoint, and cleans up the
//! temp file on every path.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

/// Whisper endpoint base (Groq's OpenAI-compatible surface).
const WHISPER_API_BASE: &str = "https://api.groq.com/openai/v1";
/// Transcription model.
const WHISPER_MODEL: &str = "whisper-large-v3";
/// How long a download may run before being abandoned.
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// Errors from the transcription pipeline.
#[derive(Debug, thiserror::Error)]
pub enum TranscribeError {
    #[error("Invalid YouTube URL")]
    InvalidUrl,

    #[error("Could not extract video ID")]
    NoVideoId,

    #[error(
        "Groq API key not configured. Please add GROQ_API_KEY to your environment variables."
    )]
    MissingApiKey,

    #[error(
        "Failed to download video audio. The video might be private, age-restricted, or unavailable."
    )]
    DownloadFailed,

    #[error("Failed to read downloaded audio file")]
    ReadAudio(#[source] std::io::Error),

    #[error("Transcription failed: {0}")]
    Whisper(String),
}

/// A completed transcription.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transcription {
    pub transcript: String,
    pub video_id: String,
}

static WATCH_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(https?://)?(www\.)?(youtube\.com/watch\?v=|youtu\.be/)[A-Za-z0-9_-]{11}")
        .expect("valid watch url pattern")
});

static VIDEO_ID_RES: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        Regex::new(r"(?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/|youtube\.com/shorts/)([A-Za-z0-9_-]{11})")
            .expect("valid id pattern"),
        Regex::new(r"youtube\.com/watch\?.*v=([A-Za-z0-9_-]{11})").expect("valid id pattern"),
    ]
});

/// Whether a string looks like a transcribable YouTube watch URL.
#[must_use]
pub fn is_youtube_url(url: &str) -> bool {
    WATCH_URL_RE.is_match(url)
}

/// Extract the 11-character video ID from the common YouTube URL forms.
#[must_use]
pub fn extract_video_id(url: &str) -> Option<String> {
    VIDEO_ID_RES
        .iter()
        .find_map(|re| re.captures(url))
        .map(|caps| caps[1].to_string())
}

/// Transcription service: yt-dlp download + Whisper upload.
#[derive(Debug, Clone)]
pub struct Transcriber {
    http: reqwest::Client,
    api_key: Option<String>,
    api_base: String,
    model: String,
}

impl Transcriber {
    /// Create a transcriber. A missing key only fails at call time.
    #[must_use]
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            api_base: WHISPER_API_BASE.to_string(),
            model: WHISPER_MODEL.to_string(),
        }
    }

    /// Transcribe the audio of a YouTube video.
    ///
    /// The downloaded audio file is removed afterwards regardless of
    /// outcome; cleanup failures only warn.
    pub async fn transcribe_url(&self, video_url: &str) -> Result<Transcription, TranscribeError> {
        if !is_youtube_url(video_url) {
            return Err(TranscribeError::InvalidUrl);
        }
        let video_id = extract_video_id(video_url).ok_or(TranscribeError::NoVideoId)?;

        // Fail before downloading anything if we can't transcribe anyway.
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(TranscribeError::MissingApiKey)?;

        info!(video_id = %video_id, "Starting transcription");

        let audio_path = download_audio(video_url, &video_id).await?;

        let result = self.upload(&audio_path, &video_id, api_key).await;

        if let Err(e) = tokio::fs::remove_file(&audio_path).await {
            warn!(path = ?audio_path, error = %e, "Failed to clean up audio file");
        }

        let transcript = result?;
        info!(video_id = %video_id, transcript_length = transcript.len(), "Transcription complete");

        Ok(Transcription {
            transcript,
            video_id,
        })
    }

    async fn upload(
        &self,
        audio_path: &Path,
        video_id: &str,
        api_key: &str,
    ) -> Result<String, TranscribeError> {
        let bytes = tokio::fs::read(audio_path)
            .await
            .map_err(TranscribeError::ReadAudio)?;

        let mime = mime_guess::from_path(audio_path)
            .first_or_octet_stream()
            .to_string();

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(format!("{video_id}.mp3"))
            .mime_str(&mime)
            .map_err(|e| TranscribeError::Whisper(e.to_string()))?;

        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("model", self.model.clone())
            .text("language", "en")
            .text("response_format", "text");

        let resp = self
            .http
            .post(format!("{}/audio/transcriptions", self.api_base))
            .bearer_auth(api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| TranscribeError::Whisper(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| TranscribeError::Whisper(e.to_string()))?;

        if !status.is_success() {
            return Err(TranscribeError::Whisper(format!("{status}: {body}")));
        }

        Ok(body.trim().to_string())
    }
}

/// Download a video's audio track as mp3 via `yt-dlp`.
///
/// Returns the path of the downloaded file.
async fn download_audio(video_url: &str, video_id: &str) -> Result<PathBuf, TranscribeError> {
    let dir = std::env::temp_dir().join("openscript-audio");
    if let Err(e) = tokio::fs::create_dir_all(&dir).await {
        warn!(error = %e, "Failed to create audio temp dir");
        return Err(TranscribeError::DownloadFailed);
    }

    // Unique stem per invocation so concurrent downloads don't collide.
    let stem = dir.join(format!("{video_id}-{}", Uuid::new_v4()));
    let output_template = format!("{}.%(ext)s", stem.display());
    let audio_path = PathBuf::from(format!("{}.mp3", stem.display()));

    info!(video_id = %video_id, "Downloading audio");

    let mut command = tokio::process::Command::new("yt-dlp");
    command.args([
        "-x",
        "--audio-format",
        "mp3",
        "--audio-quality",
        "0",
        "-o",
        &output_template,
        video_url,
    ]);

    let output = match tokio::time::timeout(DOWNLOAD_TIMEOUT, command.output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => {
            warn!(video_id = %video_id, error = %e, "Failed to run yt-dlp");
            return Err(TranscribeError::DownloadFailed);
        }
        Err(_) => {
            warn!(video_id = %video_id, "yt-dlp timed out");
            return Err(TranscribeError::DownloadFailed);
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        warn!(
            video_id = %video_id,
            status = ?output.status.code(),
            error = %stderr.trim(),
            "yt-dlp failed"
        );
        return Err(TranscribeError::DownloadFailed);
    }

    Ok(audio_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_video_id_forms() {
        let id = Some("dQw4w9WgXcQ".to_string());

        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            id
        );
        assert_eq!(extract_video_id("https://youtu.be/dQw4w9WgXcQ"), id);
        assert_eq!(
            extract_video_id("https://www.youtube.com/embed/dQw4w9WgXcQ"),
            id
        );
        assert_eq!(
            extract_video_id("https://www.youtube.com/shorts/dQw4w9WgXcQ"),
            id
        );
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?list=PL123&v=dQw4w9WgXcQ"),
            id
        );
        assert_eq!(extract_video_id("https://example.com/watch?v=nope"), None);
    }

    #[test]
    fn test_is_youtube_url() {
        assert!(is_youtube_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ"));
        assert!(is_youtube_url("youtube.com/watch?v=dQw4w9WgXcQ"));
        assert!(is_youtube_url("https://youtu.be/dQw4w9WgXcQ"));
        assert!(!is_youtube_url("https://vimeo.com/12345"));
        assert!(!is_youtube_url("not a url"));
    }

    #[tokio::test]
    async fn test_transcribe_rejects_invalid_url() {
        let transcriber = Transcriber::new(Some("key".to_string()));
        let err = transcriber
            .transcribe_url("https://vimeo.com/12345")
            .await
            .unwrap_err();
        assert!(matches!(err, TranscribeError::InvalidUrl));
    }

    #[tokio::test]
    async fn test_transcribe_requires_api_key() {
        let transcriber = Transcriber::new(None);
        let err = transcriber
            .transcribe_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
            .await
            .unwrap_err();
        assert!(matches!(err, TranscribeError::MissingApiKey));
    }
}
