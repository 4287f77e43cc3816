//! Asset capture from dropped files and text
//!
//! Turns what a user drops on a form slot into the reference stored on the
//! record. A privileged host keeps the file's local path; a browser keeps the
//! blob reference it minted for the file.

use crate::config::CatalogConfig;
use crate::path::{self, ExecutionContext};

/// Form slot receiving the drop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropSlot {
    /// Card thumbnail
    Thumbnail,
    /// Walkthrough video
    Video,
    /// Experience launch reference
    Launch,
}

/// File handed over by a drop or file picker
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DroppedFile {
    /// Local path, only exposed by privileged hosts
    pub path: Option<String>,
    /// MIME type reported for the file
    pub mime_type: String,
    /// Object URL minted by the renderer
    pub blob_ref: Option<String>,
}

/// Something dropped on a slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DroppedItem {
    /// A file
    File(DroppedFile),
    /// Plain text, e.g. a URL or a pasted path
    Text(String),
}

/// Why a drop was not accepted
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DropRejection {
    /// File type does not fit the slot
    #[error("{mime_type:?} is not accepted for {slot:?}")]
    UnsupportedType {
        /// Target slot
        slot: DropSlot,
        /// Reported type
        mime_type: String,
    },

    /// File dropped on the launch slot is not a local executable
    #[error("only a local executable can be dropped as a launch target")]
    NotExecutable,

    /// Neither a usable path nor a blob reference came with the file
    #[error("dropped file has no usable reference")]
    NoReference,

    /// Text drop was blank
    #[error("dropped text is empty")]
    EmptyText,
}

/// Reference to store for a drop on `slot`
///
/// # Errors
/// Returns [`DropRejection`] when the item does not fit the slot
pub fn capture_drop(
    slot: DropSlot,
    item: &DroppedItem,
    ctx: &ExecutionContext,
    config: &CatalogConfig,
) -> Result<String, DropRejection> {
    match item {
        DroppedItem::Text(text) => {
            let text = text.trim();
            if text.is_empty() {
                Err(DropRejection::EmptyText)
            } else {
                Ok(text.to_string())
            }
        }
        DroppedItem::File(file) => match slot {
            DropSlot::Launch => file
                .path
                .as_deref()
                .filter(|p| config.is_executable_name(p) && path::is_local_path(p))
                .map(str::to_string)
                .ok_or(DropRejection::NotExecutable),
            DropSlot::Thumbnail | DropSlot::Video => {
                if !accepts_type(slot, &file.mime_type) {
                    return Err(DropRejection::UnsupportedType {
                        slot,
                        mime_type: file.mime_type.clone(),
                    });
                }
                file_reference(file, ctx).ok_or(DropRejection::NoReference)
            }
        },
    }
}

/// Whether a MIME type fits a media slot
#[must_use]
pub fn accepts_type(slot: DropSlot, mime_type: &str) -> bool {
    let mime_type = mime_type.trim().to_ascii_lowercase();
    match slot {
        DropSlot::Thumbnail => mime_type.starts_with("image/"),
        // video/mp4 and video/webm included
        DropSlot::Video => mime_type.starts_with("video/"),
        DropSlot::Launch => false,
    }
}

fn file_reference(file: &DroppedFile, ctx: &ExecutionContext) -> Option<String> {
    let local = file
        .path
        .as_deref()
        .filter(|p| ctx.privileged && !p.is_empty());
    local
        .or(file.blob_ref.as_deref())
        .filter(|r| !r.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(path: Option<&str>, mime_type: &str, blob: Option<&str>) -> DroppedItem {
        DroppedItem::File(DroppedFile {
            path: path.map(Into::into),
            mime_type: mime_type.into(),
            blob_ref: blob.map(Into::into),
        })
    }

    fn capture(slot: DropSlot, item: &DroppedItem, ctx: ExecutionContext) -> Result<String, DropRejection> {
        capture_drop(slot, item, &ctx, &CatalogConfig::new())
    }

    #[test]
    fn host_keeps_local_path_browser_keeps_blob() {
        let item = file(Some(r"C:\shots\hero.png"), "image/png", Some("blob:http://localhost/1"));
        assert_eq!(
            capture(DropSlot::Thumbnail, &item, ExecutionContext::host()).unwrap(),
            r"C:\shots\hero.png"
        );
        assert_eq!(
            capture(DropSlot::Thumbnail, &item, ExecutionContext::browser()).unwrap(),
            "blob:http://localhost/1"
        );
    }

    #[test]
    fn media_types_are_checked() {
        let video = file(None, "video/webm", Some("blob:x"));
        assert!(capture(DropSlot::Video, &video, ExecutionContext::browser()).is_ok());
        assert!(matches!(
            capture(DropSlot::Thumbnail, &video, ExecutionContext::browser()),
            Err(DropRejection::UnsupportedType { slot: DropSlot::Thumbnail, .. })
        ));
        assert!(accepts_type(DropSlot::Video, "video/quicktime"));
        assert!(!accepts_type(DropSlot::Video, "image/gif"));
    }

    #[test]
    fn executable_on_launch_slot() {
        let exe = file(Some(r"C:\BUILDS\Tower\Blank.exe"), "application/x-msdownload", None);
        assert_eq!(
            capture(DropSlot::Launch, &exe, ExecutionContext::host()).unwrap(),
            r"C:\BUILDS\Tower\Blank.exe"
        );

        let not_exe = file(Some(r"C:\BUILDS\Tower\readme.txt"), "text/plain", None);
        assert_eq!(
            capture(DropSlot::Launch, &not_exe, ExecutionContext::host()),
            Err(DropRejection::NotExecutable)
        );
    }

    #[test]
    fn text_drops_are_trimmed() {
        let text = DroppedItem::Text("  https://walks.example.com/x \n".into());
        assert_eq!(
            capture(DropSlot::Launch, &text, ExecutionContext::browser()).unwrap(),
            "https://walks.example.com/x"
        );
        assert_eq!(
            capture(DropSlot::Video, &DroppedItem::Text("   ".into()), ExecutionContext::browser()),
            Err(DropRejection::EmptyText)
        );
    }

    #[test]
    fn file_without_reference_is_rejected() {
        let item = file(Some(r"C:\a.png"), "image/png", None);
        assert_eq!(
            capture(DropSlot::Thumbnail, &item, ExecutionContext::browser()),
            Err(DropRejection::NoReference)
        );
    }
}
