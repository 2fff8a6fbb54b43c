/// An attribute slot on a record
///
/// Records fetched with a column projection leave the other attributes
/// `Unloaded`; reading one of those requires a live session.
#[derive(Debug, Clone, PartialEq)]
pub enum Attr<T> {
    Loaded(T),
    Unloaded,
}

impl<T> Attr<T> {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Attr::Loaded(_))
    }

    pub fn as_loaded(&self) -> Option<&T> {
        match self {
            Attr::Loaded(v) => Some(v),
            Attr::Unloaded => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Attr<U> {
        match self {
            Attr::Loaded(v) => Attr::Loaded(f(v)),
            Attr::Unloaded => Attr::Unloaded,
        }
    }
}

impl<T: Default> Default for Attr<T> {
    fn default() -> Self {
        Attr::Loaded(T::default())
    }
}
