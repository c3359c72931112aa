use crate::error::InputError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::io::Read;
use std::path::{Path, PathBuf};

pub const MAX_ATTACHMENTS: usize = 3;
pub const MAX_ATTACHMENT_BYTES: u64 = 8 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl Attachment {
    pub fn is_text(&self) -> bool {
        self.mime_type.starts_with("text/")
    }

    /// `data:` URL carrying the base64-encoded payload.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.data))
    }
}

pub fn mime_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        "md" => "text/markdown",
        "csv" => "text/csv",
        _ => return None,
    };
    Some(mime)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Blocking read of one attachment. Runs on the worker thread.
pub fn read_attachment(path: &Path) -> Result<Attachment, InputError> {
    let name = display_name(path);
    let mime_type = mime_type_for(path)
        .ok_or_else(|| InputError::UnsupportedAttachment { name: name.clone() })?;
    let read_error = |e: std::io::Error| InputError::AttachmentRead {
        name: name.clone(),
        reason: e.to_string(),
    };
    let file = std::fs::File::open(path).map_err(read_error)?;
    let too_large = || InputError::AttachmentTooLarge {
        name: name.clone(),
        max_bytes: MAX_ATTACHMENT_BYTES,
    };
    if file.metadata().map_err(read_error)?.len() > MAX_ATTACHMENT_BYTES {
        return Err(too_large());
    }
    // The file may grow after the metadata check; never read past the limit.
    let mut data = Vec::new();
    file.take(MAX_ATTACHMENT_BYTES + 1)
        .read_to_end(&mut data)
        .map_err(read_error)?;
    if data.len() as u64 > MAX_ATTACHMENT_BYTES {
        return Err(too_large());
    }
    Ok(Attachment {
        name,
        mime_type: mime_type.to_string(),
        data,
    })
}

/// Attachments for the next search, plus reads still in flight. Searching
/// is blocked while any read is pending.
#[derive(Debug, Default)]
pub struct AttachmentSet {
    items: Vec<Attachment>,
    pending_reads: usize,
}

impl AttachmentSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Attachment] {
        &self.items
    }

    pub fn is_processing(&self) -> bool {
        self.pending_reads > 0
    }

    /// Validate `path` and reserve a slot for it. The caller then queues the
    /// actual read and reports back through [`finish_read`](Self::finish_read).
    pub fn begin_read(&mut self, path: &str) -> Result<PathBuf, InputError> {
        let path = PathBuf::from(path.trim());
        if self.items.len() + self.pending_reads >= MAX_ATTACHMENTS {
            return Err(InputError::TooManyAttachments {
                max: MAX_ATTACHMENTS,
            });
        }
        if mime_type_for(&path).is_none() {
            return Err(InputError::UnsupportedAttachment {
                name: display_name(&path),
            });
        }
        self.pending_reads += 1;
        Ok(path)
    }

    pub fn finish_read(&mut self, result: Result<Attachment, InputError>) -> Result<(), InputError> {
        self.pending_reads = self.pending_reads.saturating_sub(1);
        let attachment = result?;
        self.items.push(attachment);
        Ok(())
    }

    pub fn remove_last(&mut self) -> Option<Attachment> {
        self.items.pop()
    }

    pub fn take(&mut self) -> Vec<Attachment> {
        std::mem::take(&mut self.items)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
