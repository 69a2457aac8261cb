/// One scan's worth of folder names.
///
/// Names are kept in the order the directory listing produced them. The
/// listing order is whatever the operating system returns; nothing here
/// sorts it.
use compact_str::CompactString;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// Folder names (final path component only), in enumeration order.
    pub names: Vec<CompactString>,
}

impl Session {
    pub fn new(names: Vec<CompactString>) -> Self {
        Self { names }
    }

    /// Number of folders recorded in this session.
    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(CompactString::as_str)
    }
}

impl<S: Into<CompactString>> FromIterator<S> for Session {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}
