use super::*;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use restock_watcher::models::NotificationState;
use restock_watcher::plugins::ChannelOutcome;

#[tokio::test]
async fn test_empty_listing_sends_status_message() -> anyhow::Result<()> {
    let site = TestSite::start().await;
    site.serve(LISTING_PATH, "<html><body><p>No results</p></body></html>".to_string()).await;
    mount_channel(&site.server, TELEGRAM_PATH, 200).await;
    mount_channel(&site.server, WEBHOOK_PATH, 204).await;

    let monitor = site.monitor(site.config());
    let report = monitor.run_cycle().await?;

    assert!(report.products.is_empty());
    let message = report.message.expect("status message");
    assert!(message.body.starts_with("🔍 **Nike Monitor Status**"));
    assert!(message.body.contains("**Status:** No AF1 City Pack Paris found"));
    assert!(!message.body.contains("**Product:**"));

    let texts = telegram_texts(&site.server).await;
    assert_eq!(texts.len(), 1);
    assert_eq!(texts[0], message.body);
    assert_eq!(webhook_posts(&site.server).await, 1);

    // Absence is never recorded
    assert!(!site.dir.path().join("last_notification.json").exists());
    Ok(())
}

#[tokio::test]
async fn test_status_message_carries_utc_timestamp() -> anyhow::Result<()> {
    let site = TestSite::start().await;
    site.serve(LISTING_PATH, "<html></html>".to_string()).await;

    let before = chrono::Utc::now().format("%Y-%m-%d").to_string();
    let report = site.monitor(site.config()).run_cycle().await?;
    let body = report.message.expect("status message").body;

    let time_line = body.lines().find(|l| l.starts_with("**Time:**")).expect("time line");
    assert!(time_line.ends_with(" UTC"));
    assert!(time_line.contains(&before) || time_line.contains(&chrono::Utc::now().format("%Y-%m-%d").to_string()));
    Ok(())
}

#[tokio::test]
async fn test_matching_product_with_sizes_is_announced() -> anyhow::Result<()> {
    let site = TestSite::start().await;
    site.serve(LISTING_PATH, listing_page()).await;
    site.serve(PARIS_PATH, detail_page(&["9", "10"])).await;
    mount_channel(&site.server, TELEGRAM_PATH, 200).await;
    mount_channel(&site.server, WEBHOOK_PATH, 204).await;

    let monitor = site.monitor(site.config());
    let report = monitor.run_cycle().await?;

    assert_eq!(report.products.len(), 1);
    let product = &report.products[0];
    assert_eq!(product.name, "Nike Air Force 1 Low City Pack Paris Patent");
    assert_eq!(product.price, "$130");
    assert_eq!(product.sizes, vec!["9", "10"]);
    assert!(product.in_stock);

    let body = report.message.expect("alert").body;
    assert!(body.starts_with("🚨 **NIKE ALERT — AF1 City Pack Paris (Patent)**"));
    assert!(body.contains("**Available Sizes:** 9, 10"));
    assert!(body.contains(&format!("🛒 **BUY NOW:** {}{}", site.server.uri(), PARIS_PATH)));

    let dispatch = report.dispatch.expect("dispatch");
    assert_eq!(dispatch.outcome("telegram"), Some(&ChannelOutcome::Sent));
    assert_eq!(dispatch.outcome("discord"), Some(&ChannelOutcome::Sent));

    let state = NotificationState::load(&site.dir.path().join("last_notification.json"))?;
    assert_eq!(state.products["HF1234-100"].sizes, vec!["10", "9"]);
    Ok(())
}

#[tokio::test]
async fn test_unchanged_product_is_not_announced_twice() -> anyhow::Result<()> {
    let site = TestSite::start().await;
    site.serve(LISTING_PATH, listing_page()).await;
    site.serve(PARIS_PATH, detail_page(&["9", "10"])).await;
    mount_channel(&site.server, TELEGRAM_PATH, 200).await;
    mount_channel(&site.server, WEBHOOK_PATH, 204).await;

    let monitor = site.monitor(site.config());
    let state_path = site.dir.path().join("last_notification.json");

    let first = monitor.run_cycle().await?;
    assert!(first.notified());
    let written = std::fs::read(&state_path)?;

    let second = monitor.run_cycle().await?;
    assert_eq!(second.products, first.products);
    assert!(!second.notified());
    assert!(second.message.is_none());

    assert_eq!(telegram_texts(&site.server).await.len(), 1);
    assert_eq!(webhook_posts(&site.server).await, 1);
    assert_eq!(std::fs::read(&state_path)?, written);
    Ok(())
}

#[tokio::test]
async fn test_detail_timeout_drops_product() -> anyhow::Result<()> {
    let site = TestSite::start().await;
    site.serve(LISTING_PATH, listing_page()).await;
    Mock::given(method("GET"))
        .and(path(PARIS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(detail_page(&["9"])).set_delay(Duration::from_secs(20)))
        .mount(&site.server)
        .await;

    let monitor = site.monitor(site.config());
    let products = monitor.check_availability().await?;

    assert!(products.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_sold_out_product_is_dropped() -> anyhow::Result<()> {
    let site = TestSite::start().await;
    site.serve(LISTING_PATH, listing_page()).await;
    site.serve(PARIS_PATH, detail_page(&[])).await;

    let products = site.monitor(site.config()).check_availability().await?;
    assert!(products.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_parallel_detail_fetches_keep_listing_order() -> anyhow::Result<()> {
    let site = TestSite::start().await;
    let listing = r#"<html><body>
        <a href="/t/af1-paris-white/A-1"><span class="card-title">Nike Air Force 1 Low City Pack Paris Patent White</span></a>
        <a href="/t/af1-paris-black/B-2"><span class="card-title">Nike Air Force 1 Low City Pack Paris Patent Black</span></a>
        <a href="/t/af1-paris-red/C-3"><span class="card-title">Nike Air Force 1 Low City Pack Paris Patent Red</span></a>
    </body></html>"#;
    site.serve(LISTING_PATH, listing.to_string()).await;

    // First product answers last
    for (page, delay_ms) in [("/t/af1-paris-white/A-1", 600), ("/t/af1-paris-black/B-2", 300), ("/t/af1-paris-red/C-3", 0)] {
        Mock::given(method("GET"))
            .and(path(page))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(detail_page(&["9"]))
                    .set_delay(Duration::from_millis(delay_ms)),
            )
            .mount(&site.server)
            .await;
    }

    let mut config = site.config();
    config.detail_concurrency = 3;
    let products = site.monitor(config).check_availability().await?;

    let ids: Vec<String> = products.iter().map(|p| p.identifier()).collect();
    assert_eq!(ids, vec!["A-1", "B-2", "C-3"]);
    Ok(())
}

#[tokio::test]
async fn test_listing_outage_is_treated_as_empty() -> anyhow::Result<()> {
    let site = TestSite::start().await;
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(ResponseTemplate::new(403))
        .mount(&site.server)
        .await;

    let report = site.monitor(site.config()).run_cycle().await?;
    assert!(report.products.is_empty());
    assert!(report.notified());
    Ok(())
}

#[tokio::test]
async fn test_single_run_stops_after_one_cycle() {
    let site = TestSite::start().await;
    site.serve(LISTING_PATH, listing_page()).await;
    site.serve(PARIS_PATH, detail_page(&["9", "10"])).await;
    mount_channel(&site.server, TELEGRAM_PATH, 200).await;
    mount_channel(&site.server, WEBHOOK_PATH, 204).await;

    let monitor = site.monitor(site.config());
    let summary = monitor.run(std::future::pending::<()>()).await;

    assert_eq!(summary.cycles, 1);
    assert_eq!(summary.failed_cycles, 0);
    assert_eq!(summary.notifications, 1);
    assert!(!summary.interrupted);
    assert_eq!(monitor.phase(), restock_watcher::MonitorPhase::Finished);
}
