//! Helpers for driving file uploads from the test body.

use docshelf::{DecodedFile, FilePicker, FileViewer, PickedFile};
use tokio::io::{duplex, AsyncWriteExt, DuplexStream};

/// A picked file whose bytes arrive only when the test writes them to the
/// returned stream. Dropping the stream ends the file.
pub fn piped(name: &str, mime_type: &str, size: u64) -> (PickedFile, DuplexStream) {
    let (reader, writer) = duplex(64);
    (PickedFile::new(name, mime_type, size, reader), writer)
}

/// Write `bytes` and close the stream.
pub async fn finish(mut writer: DuplexStream, bytes: &[u8]) {
    writer.write_all(bytes).await.unwrap();
    writer.shutdown().await.unwrap();
}

/// Hands out a fixed selection once.
pub struct FixedPicker(pub Vec<PickedFile>);

impl FilePicker for FixedPicker {
    fn pick(&mut self) -> Vec<PickedFile> {
        std::mem::take(&mut self.0)
    }
}

#[derive(Default)]
pub struct RecordingViewer {
    pub seen: Vec<(String, String, Vec<u8>)>,
}

impl FileViewer for RecordingViewer {
    fn view(&mut self, name: &str, file: &DecodedFile) {
        self.seen
            .push((name.to_string(), file.mime_type.clone(), file.bytes.clone()));
    }
}
