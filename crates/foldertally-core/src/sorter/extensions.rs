/// Extension classification and destination-folder naming for the sorter.
use compact_str::CompactString;
use std::borrow::Cow;
use std::path::Path;

/// Folder used for files without an extension when sorting every file.
pub const NO_EXTENSION_FOLDER: &str = "NO_EXTENSION";

/// Which files a sort run touches, and how their folders are named.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortScope {
    /// Known photo and video extensions only; folders use the lowercase
    /// extension (`jpg/`, `mp4/`).
    #[default]
    Media,
    /// Every file; folders use the uppercase extension (`JPG/`, `TXT/`) or
    /// [`NO_EXTENSION_FOLDER`].
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Photo,
    Video,
}

/// Classify an extension as photo, video or neither (case-insensitive).
///
/// The extension is lowercased into a stack buffer; anything longer than
/// 8 bytes cannot be a known media extension.
pub fn media_kind(ext: &str) -> Option<MediaKind> {
    let bytes = ext.as_bytes();
    if bytes.is_empty() || bytes.len() > 8 {
        return None;
    }

    let mut lower = [0u8; 8];
    for (dest, &src) in lower.iter_mut().zip(bytes.iter()) {
        *dest = src.to_ascii_lowercase();
    }
    let lower_str = std::str::from_utf8(&lower[..bytes.len()]).ok()?;

    match lower_str {
        "jpg" | "jpeg" | "png" | "gif" | "bmp" | "tif" | "tiff" | "heic" | "heif" | "raw"
        | "cr2" | "nef" | "arw" | "orf" | "dng" | "webp" | "psd" | "svg" => Some(MediaKind::Photo),
        "mp4" | "mov" | "avi" | "mkv" | "wmv" | "mpeg" | "mpg" | "m4v" | "flv" | "webm" | "3gp"
        | "mts" | "m2ts" => Some(MediaKind::Video),
        _ => None,
    }
}

/// The folder a file belongs in under `scope`, or `None` if the file is
/// left where it is.
///
/// In [`SortScope::All`] a dotfile with no further dot (`.bashrc`) is named
/// by what follows the dot (`BASHRC/`).
pub fn destination_folder(file: &Path, scope: SortScope) -> Option<CompactString> {
    let ext = file
        .extension()
        .map(|e| e.to_string_lossy())
        .filter(|e| !e.is_empty());

    match scope {
        SortScope::Media => {
            let ext = ext?;
            media_kind(&ext)?;
            Some(CompactString::new(ext.to_lowercase()))
        }
        SortScope::All => Some(match ext.or_else(|| dotfile_suffix(file)) {
            Some(ext) => CompactString::new(ext.to_uppercase()),
            None => CompactString::const_new(NO_EXTENSION_FOLDER),
        }),
    }
}

/// `bashrc` for `.bashrc`; `None` for names not starting with a dot.
fn dotfile_suffix(file: &Path) -> Option<Cow<'_, str>> {
    let name = file.file_name()?.to_str()?;
    let rest = name.strip_prefix('.')?;
    (!rest.is_empty() && !rest.contains('.')).then_some(Cow::Borrowed(rest))
}
