// Example: navigate from the feed to an item and back, restoring items and scroll.
use std::future::Future;

use masonry_feed::{FeedItem, FeedOptions, PageResult};
use masonry_feed_adapter::{FeedController, MemoryStorage, PageSource, Result, StateStore};
use serde_json::{Value, json};

struct FakeSource;

impl PageSource for FakeSource {
    type Payload = Value;

    fn fetch_page(
        &self,
        page: u32,
        page_size: u32,
    ) -> impl Future<Output = Result<PageResult<Value>>> + Send {
        let start = (page as usize - 1) * page_size as usize;
        let items = (start..start + page_size as usize).map(article).collect();
        async move { Ok(PageResult::new(items, true)) }
    }
}

fn article(n: usize) -> FeedItem<Value> {
    FeedItem::new(format!("a{n}"), json!({ "title": format!("Article {n}") }))
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let first_page: Vec<_> = (0..20).map(article).collect();
    let store = StateStore::new(MemoryStorage::new());

    let mut ctl = FeedController::mount(
        "/",
        first_page.clone(),
        FeedOptions::default(),
        FakeSource,
        store,
    );
    ctl.measure_viewport(1280);
    ctl.on_sentinel_near().await;
    println!(
        "before: items={} page={}",
        ctl.items().len(),
        ctl.feed().page()
    );

    ctl.navigate_to_item("a31", 2_480.0);
    let (source, store) = ctl.unmount();

    let mut ctl = FeedController::mount("/", first_page, FeedOptions::default(), source, store);
    ctl.measure_viewport(1280);
    println!(
        "after: items={} page={} restored={} scroll={:?}",
        ctl.items().len(),
        ctl.feed().page(),
        ctl.feed().is_restored(),
        ctl.take_scroll_restore()
    );
}
