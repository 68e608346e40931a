//! Limit/offset page links.

use actix_web::HttpRequest;
use url::Url;

use yatube_core::pagination::{Page, PageRequest, PreviousPage};
use yatube_shared::Paginated;

/// Absolute URL of the current request.
fn request_url(req: &HttpRequest) -> Option<Url> {
    let info = req.connection_info();
    Url::parse(&format!("{}://{}{}", info.scheme(), info.host(), req.uri())).ok()
}

/// Rewrite the query of `url`, replacing `set` keys and dropping `remove` keys.
fn with_query(mut url: Url, set: &[(&str, String)], remove: &[&str]) -> String {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| {
            !set.iter().any(|(name, _)| name == key) && !remove.contains(&key.as_ref())
        })
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    url.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .extend_pairs(set.iter().map(|(k, v)| (*k, v.as_str())));
    url.to_string()
}

/// Wrap a page of results with its total count and neighbour links.
pub fn paginate<T>(req: &HttpRequest, request: PageRequest, page: Page<T>) -> Paginated<T> {
    let url = request_url(req);
    let limit = ("limit", request.limit.to_string());

    let next = request.next_offset(page.count).and_then(|offset| {
        url.clone().map(|url| {
            with_query(url, &[limit.clone(), ("offset", offset.to_string())], &[])
        })
    });

    let previous = request.previous().and_then(|previous| {
        url.map(|url| match previous {
            PreviousPage::Start => with_query(url, &[limit.clone()], &["offset"]),
            PreviousPage::Offset(offset) => {
                with_query(url, &[limit.clone(), ("offset", offset.to_string())], &[])
            }
        })
    });

    Paginated {
        count: page.count,
        next,
        previous,
        results: page.items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    fn page(count: u64) -> Page<u32> {
        Page {
            count,
            items: Vec::new(),
        }
    }

    #[test]
    fn test_links_in_the_middle() {
        let req = TestRequest::get()
            .uri("/v1/posts/?limit=2&offset=4&foo=bar")
            .insert_header(("host", "api.test"))
            .to_http_request();

        let result = paginate(
            &req,
            PageRequest {
                limit: 2,
                offset: 4,
            },
            page(10),
        );

        assert_eq!(
            result.next.as_deref(),
            Some("http://api.test/v1/posts/?foo=bar&limit=2&offset=6")
        );
        assert_eq!(
            result.previous.as_deref(),
            Some("http://api.test/v1/posts/?foo=bar&limit=2&offset=2")
        );
    }

    #[test]
    fn test_previous_drops_offset_at_start() {
        let req = TestRequest::get()
            .uri("/v1/posts/?offset=1&limit=2")
            .insert_header(("host", "api.test"))
            .to_http_request();

        let result = paginate(
            &req,
            PageRequest {
                limit: 2,
                offset: 1,
            },
            page(3),
        );

        assert!(result.next.is_none());
        assert_eq!(
            result.previous.as_deref(),
            Some("http://api.test/v1/posts/?limit=2")
        );
    }

    #[test]
    fn test_single_page_has_no_links() {
        let req = TestRequest::get().uri("/v1/posts/").to_http_request();

        let result = paginate(
            &req,
            PageRequest {
                limit: 10,
                offset: 0,
            },
            page(3),
        );

        assert_eq!(result.count, 3);
        assert!(result.next.is_none());
        assert!(result.previous.is_none());
    }
}
