//! Response body types
//!
//! Small pages are sent as a single frame. Files are streamed from an open
//! handle in fixed-size chunks, so memory per request stays bounded by the
//! chunk size regardless of file size.

use futures::stream;
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Full, StreamBody};
use hyper::body::{Bytes, Frame};
use std::io;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Body type shared by every response this server produces
pub type ResponseBody = UnsyncBoxBody<Bytes, io::Error>;

/// Single-frame body
pub fn full(data: impl Into<Bytes>) -> ResponseBody {
    Full::new(data.into())
        .map_err(|never| match never {})
        .boxed_unsync()
}

/// Body with no content
pub fn empty() -> ResponseBody {
    full(Bytes::new())
}

/// Read state carried between chunks
struct FileChunks<R> {
    file: R,
    remaining: u64,
    chunk_size: usize,
    read_timeout: Duration,
}

/// Stream exactly `len` bytes from `file`
///
/// Each read is bounded by `read_timeout`. A timeout, an I/O error, or the file
/// ending early fails the stream, which aborts the connection instead of sending
/// fewer bytes than announced. The handle is dropped with the stream.
pub fn file_body<R>(file: R, len: u64, chunk_size: usize, read_timeout: Duration) -> ResponseBody
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let state = FileChunks {
        file,
        remaining: len,
        chunk_size: chunk_size.max(1),
        read_timeout,
    };

    let chunks = stream::try_unfold(state, |mut s| async move {
        if s.remaining == 0 {
            return Ok::<_, io::Error>(None);
        }

        let want = usize::try_from(s.remaining).map_or(s.chunk_size, |r| r.min(s.chunk_size));
        let mut buf = vec![0u8; want];
        let n = tokio::time::timeout(s.read_timeout, s.file.read(&mut buf))
            .await
            .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "file read timed out"))??;
        if n == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "file shrank while streaming",
            ));
        }

        buf.truncate(n);
        s.remaining -= n as u64;
        Ok(Some((Frame::data(Bytes::from(buf)), s)))
    });

    StreamBody::new(chunks).boxed_unsync()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::fs::File;

    fn temp_file(name: &str, content: &[u8]) -> std::path::PathBuf {
        let path =
            std::env::temp_dir().join(format!("hello_web_body_{}_{name}", std::process::id()));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[tokio::test]
    async fn test_full_body() {
        let bytes = full("<p>hi</p>").collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"<p>hi</p>");
        assert!(empty().collect().await.unwrap().to_bytes().is_empty());
    }

    #[tokio::test]
    async fn test_file_body_streams_in_chunks() {
        let content: Vec<u8> = (0..=255u8).cycle().take(10_000).collect();
        let path = temp_file("chunks", &content);

        let file = File::open(&path).await.unwrap();
        let mut body = file_body(file, content.len() as u64, 4096, Duration::from_secs(5));

        let mut frames = 0;
        let mut collected = Vec::new();
        while let Some(frame) = body.frame().await {
            let data = frame.unwrap().into_data().unwrap();
            assert!(data.len() <= 4096);
            collected.extend_from_slice(&data);
            frames += 1;
        }
        assert_eq!(frames, 3);
        assert_eq!(collected, content);
        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_file_body_errors_when_file_is_short() {
        let path = temp_file("short", b"abc");
        let file = File::open(&path).await.unwrap();
        let body = file_body(file, 10, 4, Duration::from_secs(5));

        let err = body.collect().await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_empty_file_body() {
        let path = temp_file("empty", b"");
        let file = File::open(&path).await.unwrap();
        let bytes = file_body(file, 0, 8192, Duration::from_secs(5))
            .collect()
            .await
            .unwrap()
            .to_bytes();
        assert!(bytes.is_empty());
        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_file_body_fails_when_read_stalls() {
        // The writer half stays alive, so reads on the other half never complete
        let (reader, _writer) = tokio::io::duplex(64);
        let body = file_body(reader, 10, 4, Duration::from_millis(20));

        let err = tokio::time::timeout(Duration::from_secs(5), body.collect())
            .await
            .expect("stalled read was not cut off")
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::TimedOut);
    }

    #[tokio::test]
    async fn test_file_body_keeps_partial_frames_before_stall() {
        use tokio::io::AsyncWriteExt;

        let (reader, mut writer) = tokio::io::duplex(64);
        writer.write_all(b"abcd").await.unwrap();
        let mut body = file_body(reader, 10, 4, Duration::from_millis(20));

        let first = body.frame().await.unwrap().unwrap().into_data().unwrap();
        assert_eq!(&first[..], b"abcd");
        let err = body.frame().await.unwrap().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::TimedOut);
        drop(writer);
    }
}
