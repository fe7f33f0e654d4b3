//! Image Sources
//! The forms a host can hand the image-to-image tool its input image in,
//! and the order they are tried in

use crate::providers::constants::IMAGE_FETCH_TIMEOUT_SECS;
use std::fmt;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::PathBuf;
use std::time::Duration;

/// Readable and rewindable
pub trait SeekRead: Read + Seek + Send {}
impl<T: Read + Seek + Send> SeekRead for T {}

/// A readable image stream; seekable streams are rewound after reading.
pub enum ImageStream {
    Forward(Box<dyn Read + Send>),
    Seekable(Box<dyn SeekRead>),
}

impl ImageStream {
    /// Read to the end on the blocking pool, then put the stream back.
    async fn read_all(&mut self) -> io::Result<Vec<u8>> {
        let mut stream = std::mem::replace(self, Self::Forward(Box::new(io::empty())));
        let (stream, result) = tokio::task::spawn_blocking(move || {
            let result = stream.read_blocking();
            (stream, result)
        })
        .await
        .map_err(io::Error::other)?;
        *self = stream;
        result
    }

    fn read_blocking(&mut self) -> io::Result<Vec<u8>> {
        let mut buffer = Vec::new();
        match self {
            Self::Forward(reader) => {
                reader.read_to_end(&mut buffer)?;
            }
            Self::Seekable(reader) => {
                reader.read_to_end(&mut buffer)?;
                reader.seek(SeekFrom::Start(0))?;
            }
        }
        Ok(buffer)
    }
}

/// One way of obtaining the input image bytes
pub enum ImageSource {
    /// Remote file URL
    Url(String),
    /// In-memory file content
    Bytes(Vec<u8>),
    Stream(ImageStream),
    /// Local filesystem path
    Path(PathBuf),
    /// Host-side cached copy of an uploaded file
    CachedPath(PathBuf),
}

impl fmt::Debug for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => f.debug_tuple("Url").field(url).finish(),
            Self::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
            Self::Stream(_) => f.write_str("Stream"),
            Self::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Self::CachedPath(path) => f.debug_tuple("CachedPath").field(path).finish(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ImageSourceError {
    #[error("{0}")]
    Fetch(String),
    #[error("{0}")]
    Io(#[from] io::Error),
    #[error("image data is empty")]
    Empty,
}

fn kilobytes(len: usize) -> f64 {
    len as f64 / 1024.0
}

impl ImageSource {
    /// Position in the fallback chain
    fn rank(&self) -> u8 {
        match self {
            Self::Url(_) => 0,
            Self::Bytes(_) => 1,
            Self::Stream(_) => 2,
            Self::Path(_) => 3,
            Self::CachedPath(_) => 4,
        }
    }

    /// Read the image bytes.
    pub async fn load(&mut self, http: &reqwest::Client) -> Result<Vec<u8>, ImageSourceError> {
        let bytes = match self {
            Self::Url(url) => {
                let response = http
                    .get(url.as_str())
                    .timeout(Duration::from_secs(IMAGE_FETCH_TIMEOUT_SECS))
                    .send()
                    .await
                    .and_then(reqwest::Response::error_for_status)
                    .map_err(|e| ImageSourceError::Fetch(e.to_string()))?;
                response
                    .bytes()
                    .await
                    .map_err(|e| ImageSourceError::Fetch(e.to_string()))?
                    .to_vec()
            }
            Self::Bytes(bytes) => bytes.clone(),
            Self::Stream(stream) => stream.read_all().await?,
            Self::Path(path) | Self::CachedPath(path) => tokio::fs::read(path.as_path()).await?,
        };

        if bytes.is_empty() {
            return Err(ImageSourceError::Empty);
        }
        Ok(bytes)
    }

    /// Status line emitted before a load attempt, if any
    pub fn start_message(&self) -> Option<String> {
        match self {
            Self::Url(url) => Some(format!(
                "Fetching image from URL: {}...",
                url.chars().take(30).collect::<String>()
            )),
            _ => None,
        }
    }

    pub fn success_message(&self, len: usize) -> String {
        match self {
            Self::Url(_) => format!("Downloaded image: size={:.2}KB", kilobytes(len)),
            Self::Bytes(_) => format!("Read image data from blob: size={:.2}KB", kilobytes(len)),
            Self::Stream(_) => "Read image data from readable stream".to_string(),
            Self::Path(path) => format!(
                "Read image data from file path: {}, size={:.2}KB",
                path.display(),
                kilobytes(len)
            ),
            Self::CachedPath(path) => format!(
                "Read image data from cached path: {}, size={:.2}KB",
                path.display(),
                kilobytes(len)
            ),
        }
    }

    pub fn failure_message(&self, error: &ImageSourceError) -> String {
        match self {
            Self::Url(_) => format!("Failed to download image from URL: {}", error),
            Self::Bytes(_) => format!("Failed to read image data from blob: {}", error),
            Self::Stream(_) => format!("Failed to read image data from stream: {}", error),
            Self::Path(_) => format!("Failed to read image data from file path: {}", error),
            Self::CachedPath(_) => format!("Failed to read image data from cached path: {}", error),
        }
    }
}

/// Everything the host supplied for the `image` parameter
#[derive(Debug, Default)]
pub struct ImageInput {
    sources: Vec<ImageSource>,
}

impl ImageInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, source: ImageSource) -> Self {
        self.sources.push(source);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Sources in fallback order: URL, bytes, stream, path, cached path.
    pub fn into_ordered(mut self) -> Vec<ImageSource> {
        self.sources.sort_by_key(ImageSource::rank);
        self.sources
    }
}

impl From<ImageSource> for ImageInput {
    fn from(source: ImageSource) -> Self {
        Self::new().with(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn ordering_follows_fallback_chain() {
        let input = ImageInput::new()
            .with(ImageSource::CachedPath("/tmp/cache.png".into()))
            .with(ImageSource::Path("/tmp/a.png".into()))
            .with(ImageSource::Bytes(vec![1]))
            .with(ImageSource::Url("https://example.com/a.png".into()));

        let ranks: Vec<u8> = input.into_ordered().iter().map(ImageSource::rank).collect();
        assert_eq!(ranks, vec![0, 1, 3, 4]);
    }

    #[tokio::test]
    async fn seekable_stream_is_rewound() {
        let http = reqwest::Client::new();
        let mut source = ImageSource::Stream(ImageStream::Seekable(Box::new(Cursor::new(vec![7, 8, 9]))));

        assert_eq!(source.load(&http).await.unwrap(), vec![7, 8, 9]);
        // a second read sees the full content again
        assert_eq!(source.load(&http).await.unwrap(), vec![7, 8, 9]);
        assert_eq!(source.success_message(3), "Read image data from readable stream");
    }

    #[tokio::test]
    async fn empty_and_missing_sources_fail() {
        let http = reqwest::Client::new();

        let mut empty = ImageSource::Bytes(Vec::new());
        assert!(matches!(empty.load(&http).await, Err(ImageSourceError::Empty)));

        let mut missing = ImageSource::Path("/definitely/not/here.png".into());
        let err = missing.load(&http).await.unwrap_err();
        assert!(missing
            .failure_message(&err)
            .starts_with("Failed to read image data from file path: "));
    }

    #[test]
    fn url_message_is_truncated() {
        let source = ImageSource::Url("https://files.example.com/uploads/very/long/path.png".into());
        assert_eq!(
            source.start_message().unwrap(),
            "Fetching image from URL: https://files.example.com/uplo..."
        );

        let short = ImageSource::Url("https://cdn.io/a.png".into());
        assert_eq!(
            short.start_message().unwrap(),
            "Fetching image from URL: https://cdn.io/a.png..."
        );

        let exact = ImageSource::Url("https://example.com/abcdefghij".into());
        assert_eq!(
            exact.start_message().unwrap(),
            "Fetching image from URL: https://example.com/abcdefghij..."
        );
        assert_eq!(ImageSource::Bytes(vec![1]).start_message(), None);
    }

    struct ThreadRecordingReader {
        inner: Cursor<Vec<u8>>,
        reader_thread: std::sync::Arc<std::sync::Mutex<Option<std::thread::ThreadId>>>,
    }

    impl Read for ThreadRecordingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            *self.reader_thread.lock().unwrap() = Some(std::thread::current().id());
            self.inner.read(buf)
        }
    }

    #[tokio::test]
    async fn stream_is_read_on_the_blocking_pool() {
        let http = reqwest::Client::new();
        let reader_thread = std::sync::Arc::new(std::sync::Mutex::new(None));
        let reader = ThreadRecordingReader {
            inner: Cursor::new(vec![4, 5]),
            reader_thread: reader_thread.clone(),
        };
        let mut source = ImageSource::Stream(ImageStream::Forward(Box::new(reader)));

        assert_eq!(source.load(&http).await.unwrap(), vec![4, 5]);
        let recorded = reader_thread.lock().unwrap().expect("reader was called");
        assert_ne!(recorded, std::thread::current().id());

        // the stream is handed back after the read
        assert!(matches!(source, ImageSource::Stream(ImageStream::Forward(_))));
        assert!(matches!(source.load(&http).await, Err(ImageSourceError::Empty)));
    }
}
