// Example: a host loop driving the feed with scripted pages.
use masonry_feed::{Feed, FeedItem, FeedOptions, PageResult};

fn page(start: usize, len: usize, has_more: bool) -> PageResult<String> {
    let items = (start..start + len)
        .map(|n| FeedItem::new(format!("post-{n}"), format!("Post #{n}")))
        .collect();
    PageResult::new(items, has_more)
}

fn main() {
    let initial = page(0, 20, true).items;
    let mut feed = Feed::new(initial, FeedOptions::default());
    println!("pre-measure columns={}", feed.column_count());

    // First real width after mount, then a drag-resize burst.
    feed.measure_viewport(1100);
    for (i, width) in (700..760).step_by(10).enumerate() {
        feed.on_resize(width, i as u64 * 16);
    }
    feed.tick(400);
    println!("after resize columns={}", feed.column_count());

    // The sentinel scrolls into range a few times; page 3 overlaps page 2.
    let mut next = 20;
    while let Some(req) = feed.on_sentinel_near().or_else(|| feed.load_more()) {
        let has_more = req.page < 5;
        let result = if req.page == 3 {
            page(next - 10, 20, has_more)
        } else {
            page(next, 20, has_more)
        };
        next += 20;
        let outcome = feed.complete(req, Ok(result));
        println!(
            "page={} origin={:?} -> {:?}, footer={:?}",
            req.page,
            req.origin,
            outcome,
            feed.footer()
        );
    }

    for (i, column) in feed.columns().resolve(feed.items()).iter().enumerate() {
        let first: Vec<&str> = column.iter().take(3).map(|it| it.id.as_str()).collect();
        println!("column {i}: {} items, starts {first:?}", column.len());
    }
}
