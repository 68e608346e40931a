//! Limit/offset pagination.

/// Page size settings.
#[derive(Debug, Clone, Copy)]
pub struct PageParams {
    pub default_limit: u64,
    pub max_limit: u64,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            default_limit: 10,
            max_limit: 100,
        }
    }
}

/// A requested window over an ordered collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: u64,
    pub offset: u64,
}

/// Where the previous page starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviousPage {
    /// The very beginning; links omit the offset.
    Start,
    Offset(u64),
}

impl PageRequest {
    /// Build a request from raw query values. Unparsable or non-positive
    /// limits fall back to the default; bad offsets fall back to zero.
    pub fn from_query(limit: Option<&str>, offset: Option<&str>, params: PageParams) -> Self {
        let limit = limit
            .and_then(|s| s.trim().parse::<i64>().ok())
            .filter(|&n| n > 0)
            .map(|n| (n as u64).min(params.max_limit))
            .unwrap_or(params.default_limit);
        let offset = offset
            .and_then(|s| s.trim().parse::<i64>().ok())
            .filter(|&n| n >= 0)
            .map(|n| n as u64)
            .unwrap_or(0);

        Self { limit, offset }
    }

    /// Offset of the following page, if any items remain.
    pub fn next_offset(&self, count: u64) -> Option<u64> {
        let next = self.offset + self.limit;
        (next < count).then_some(next)
    }

    pub fn previous(&self) -> Option<PreviousPage> {
        if self.offset == 0 {
            None
        } else if self.offset <= self.limit {
            Some(PreviousPage::Start)
        } else {
            Some(PreviousPage::Offset(self.offset - self.limit))
        }
    }
}

/// One page of results plus the size of the whole collection.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub count: u64,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            count: self.count,
            items: self.items.into_iter().map(f).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> PageParams {
        PageParams {
            default_limit: 10,
            max_limit: 50,
        }
    }

    #[test]
    fn test_defaults_when_absent_or_invalid() {
        let expected = PageRequest {
            limit: 10,
            offset: 0,
        };
        assert_eq!(PageRequest::from_query(None, None, params()), expected);
        assert_eq!(
            PageRequest::from_query(Some("abc"), Some("-3"), params()),
            expected
        );
        assert_eq!(
            PageRequest::from_query(Some("0"), Some("x"), params()),
            expected
        );
    }

    #[test]
    fn test_explicit_values_and_clamp() {
        assert_eq!(
            PageRequest::from_query(Some("2"), Some("1"), params()),
            PageRequest {
                limit: 2,
                offset: 1
            }
        );
        assert_eq!(
            PageRequest::from_query(Some("500"), None, params()).limit,
            50
        );
    }

    #[test]
    fn test_next_offset() {
        let request = PageRequest {
            limit: 2,
            offset: 1,
        };
        assert_eq!(request.next_offset(5), Some(3));
        assert_eq!(request.next_offset(3), None);
        assert_eq!(request.next_offset(0), None);
    }

    #[test]
    fn test_previous() {
        let at = |offset| PageRequest { limit: 2, offset };
        assert_eq!(at(0).previous(), None);
        assert_eq!(at(1).previous(), Some(PreviousPage::Start));
        assert_eq!(at(2).previous(), Some(PreviousPage::Start));
        assert_eq!(at(5).previous(), Some(PreviousPage::Offset(3)));
    }

    #[test]
    fn test_page_map() {
        let page = Page {
            count: 7,
            items: vec![1, 2],
        }
        .map(|n| n * 10);
        assert_eq!(page.count, 7);
        assert_eq!(page.items, vec![10, 20]);
    }
}
