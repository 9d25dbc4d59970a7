//! The async boundary between a list controller and the network.

use std::future::Future;

use bazaar_shared::Page;

use crate::error::FetchError;
use crate::query::QueryParams;

/// Monotonically increasing tag of an issued list request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl RequestId {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Hands out request ids and remembers the latest one.
///
/// A response is committed only if it carries the latest id, so the last
/// *issued* request wins regardless of arrival order.
#[derive(Debug, Clone, Default)]
pub struct RequestTracker {
    latest: u64,
}

impl RequestTracker {
    pub fn issue(&mut self) -> RequestId {
        self.latest += 1;
        RequestId(self.latest)
    }

    pub fn is_current(&self, id: RequestId) -> bool {
        id.0 == self.latest
    }

    pub fn latest(&self) -> Option<RequestId> {
        (self.latest > 0).then_some(RequestId(self.latest))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub id: RequestId,
    pub params: QueryParams,
}

/// Something that can answer a list query, normally an HTTP endpoint.
pub trait ListSource<R> {
    fn fetch(&self, params: &QueryParams) -> impl Future<Output = Result<Page<R>, FetchError>>;
}

/// Run `request` against `source`, keeping the id with the outcome so it can
/// be handed back to [`ListController::resolve`](crate::ListController::resolve).
pub async fn perform<R, S>(source: &S, request: FetchRequest) -> (RequestId, Result<Page<R>, FetchError>)
where
    S: ListSource<R>,
{
    let outcome = source.fetch(&request.params).await;
    (request.id, outcome)
}

/// Await two unrelated requests concurrently. Each outcome is returned on its
/// own, so one failing never hides the other's data.
pub async fn join_independent<A, B, FA, FB>(a: FA, b: FB) -> (Result<A, FetchError>, Result<B, FetchError>)
where
    FA: Future<Output = Result<A, FetchError>>,
    FB: Future<Output = Result<B, FetchError>>,
{
    futures::join!(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bazaar_shared::PageMeta;
    use futures::executor::block_on;

    struct Numbers;

    impl ListSource<u32> for Numbers {
        async fn fetch(&self, params: &QueryParams) -> Result<Page<u32>, FetchError> {
            let page: u32 = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
            Ok(Page {
                items: vec![page * 10, page * 10 + 1],
                meta: PageMeta { page, limit: 2, total: 6 },
            })
        }
    }

    #[test]
    fn tracker_only_honours_latest() {
        let mut tracker = RequestTracker::default();
        assert_eq!(tracker.latest(), None);

        let a = tracker.issue();
        let b = tracker.issue();
        assert!(a < b);
        assert!(!tracker.is_current(a));
        assert!(tracker.is_current(b));
        assert_eq!(tracker.latest(), Some(b));
    }

    #[test]
    fn perform_keeps_request_id() {
        let mut tracker = RequestTracker::default();
        let mut params = QueryParams::default();
        params.insert("page", "2");
        let request = FetchRequest { id: tracker.issue(), params };

        let (id, outcome) = block_on(perform(&Numbers, request.clone()));
        assert_eq!(id, request.id);
        assert_eq!(outcome.unwrap().items, vec![20, 21]);
    }

    #[test]
    fn one_failure_does_not_block_the_other() {
        let list = async { Ok::<_, FetchError>(vec!["a", "b"]) };
        let stats = async { Err::<u64, _>(FetchError::Network("connection reset".into())) };

        let (list, stats) = block_on(join_independent(list, stats));
        assert_eq!(list.unwrap(), vec!["a", "b"]);
        assert!(matches!(stats, Err(FetchError::Network(_))));
    }
}
