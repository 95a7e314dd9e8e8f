//! News screen controller.

use super::error_message;
use crate::repository::Repository;
use crate::scope::Scope;
use crate::state::{NewsFilter, NewsState, Resource};
use futures::StreamExt;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

/// Controller behind the news screen.
///
/// `is_refreshing` is independent of `NewsState::is_loading`: it frames the
/// whole pull-to-refresh cycle so the UI can tell a refresh from the initial
/// load.
pub struct NewsController {
    repository: Arc<dyn Repository>,
    scope: Scope,
    news: watch::Sender<NewsState>,
    is_refreshing: watch::Sender<bool>,
    filter: Mutex<NewsFilter>,
}

impl NewsController {
    pub fn new(repository: Arc<dyn Repository>) -> Self {
        Self {
            repository,
            scope: Scope::new(),
            news: watch::channel(NewsState::default()).0,
            is_refreshing: watch::channel(false).0,
            filter: Mutex::new(NewsFilter::default()),
        }
    }

    pub fn news_state(&self) -> watch::Receiver<NewsState> {
        self.news.subscribe()
    }

    pub fn is_refreshing(&self) -> watch::Receiver<bool> {
        self.is_refreshing.subscribe()
    }

    /// Fetch the feed for the given filter.
    pub fn load(&self, filter: NewsFilter) {
        *self.filter.lock().expect("filter lock poisoned") = filter;
        let stream = self.repository.news(filter);
        let cell = self.news.clone();
        self.scope
            .spawn(async move { Self::fold(stream, cell).await });
    }

    /// Pull-to-refresh: re-fetch the current filter, framing the whole cycle
    /// with the `is_refreshing` flag.
    pub fn refresh(&self) {
        let filter = *self.filter.lock().expect("filter lock poisoned");
        let stream = self.repository.news(filter);
        let cell = self.news.clone();
        let refreshing = self.is_refreshing.clone();
        self.scope.spawn(async move {
            refreshing.send_replace(true);
            Self::fold(stream, cell).await;
            refreshing.send_replace(false);
        });
    }

    /// Tear the screen down; in-flight subscriptions stop publishing.
    pub fn close(&self) {
        self.scope.cancel();
    }

    async fn fold(
        mut stream: futures::stream::BoxStream<'static, Resource<Vec<crate::state::NewsItem>>>,
        cell: watch::Sender<NewsState>,
    ) {
        while let Some(result) = stream.next().await {
            match result {
                Resource::Loading => {
                    cell.send_replace(NewsState::loading());
                }
                Resource::Success(news) => {
                    cell.send_replace(NewsState::loaded(news.unwrap_or_default()));
                }
                Resource::Error(message) => {
                    cell.send_replace(NewsState::error(error_message(message)));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockRepository;
    use crate::state::NewsItem;
    use futures::stream;
    use pretty_assertions::assert_eq;
    use std::time::Duration;
    use tokio_stream::wrappers::ReceiverStream;

    fn article(id: &str) -> NewsItem {
        NewsItem {
            id: id.into(),
            title: format!("article {id}"),
            ..Default::default()
        }
    }

    async fn wait_until(mut condition: impl FnMut() -> bool) {
        for _ in 0..200 {
            if condition() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("condition not reached");
    }

    #[tokio::test]
    async fn test_load_replaces_state_per_emission() {
        let mut repository = MockRepository::new();
        repository.expect_news().return_once(|_| {
            stream::iter([
                Resource::Loading,
                Resource::success(vec![article("n1"), article("n2")]),
            ])
            .boxed()
        });

        let controller = NewsController::new(Arc::new(repository));
        let observed = controller.news_state();
        controller.load(NewsFilter::Trending);

        wait_until(|| observed.borrow().news.len() == 2).await;
        let state = observed.borrow().clone();
        assert!(!state.is_loading);
        assert_eq!(state.error, "");
    }

    #[tokio::test]
    async fn test_refresh_frames_the_whole_cycle() {
        let (tx, rx) = tokio::sync::mpsc::channel(4);
        let mut repository = MockRepository::new();
        repository
            .expect_news()
            .return_once(move |_| ReceiverStream::new(rx).boxed());

        let controller = NewsController::new(Arc::new(repository));
        let refreshing = controller.is_refreshing();
        let observed = controller.news_state();

        controller.refresh();
        wait_until(|| *refreshing.borrow()).await;

        tx.send(Resource::Loading).await.unwrap();
        tx.send(Resource::success(vec![article("n1")])).await.unwrap();
        // the flag only clears once the fetch-and-replace cycle finished
        assert!(*refreshing.borrow());
        drop(tx);

        wait_until(|| !*refreshing.borrow()).await;
        assert_eq!(observed.borrow().news.len(), 1);
    }

    #[tokio::test]
    async fn test_refresh_reuses_the_loaded_filter() {
        let mut repository = MockRepository::new();
        repository
            .expect_news()
            .with(mockall::predicate::eq(NewsFilter::Bullish))
            .times(2)
            .returning(|_| stream::iter([Resource::success(vec![])]).boxed());

        let controller = NewsController::new(Arc::new(repository));
        controller.load(NewsFilter::Bullish);
        controller.refresh();

        let refreshing = controller.is_refreshing();
        wait_until(|| !*refreshing.borrow()).await;
    }
}
