use serde::{Deserialize, Serialize};

/// A page of items. The next page can be requested with the client's `next_page` function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub href: Option<String>,
    /// The URL of the next page, if there is one.
    pub next: Option<String>,
    pub previous: Option<String>,
    pub limit: u32,
    pub offset: u32,
    pub total: u32,
}

/// A page of items that is paged with a cursor instead of an offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorPage<T> {
    pub items: Vec<T>,
    pub href: Option<String>,
    /// The URL of the next page, if there is one.
    pub next: Option<String>,
    pub limit: u32,
    pub cursors: Option<Cursors>,
    pub total: Option<u32>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursors {
    /// The cursor to pass as `after` to get the next page.
    pub after: Option<String>,
    pub before: Option<String>,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    /// Map the items of this page, keeping the paging information.
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            href: self.href,
            next: self.next,
            previous: self.previous,
            limit: self.limit,
            offset: self.offset,
            total: self.total,
        }
    }
}

impl<T> CursorPage<T> {
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    /// The cursor of the next page, if there is one.
    pub fn after(&self) -> Option<&str> {
        self.cursors.as_ref().and_then(|cursors| cursors.after.as_deref())
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
