use std::sync::Arc;

use configs::ClientConfig;
use dashboard::{Attachment, Dashboard, ListingDraft, ListingsClient, Notice, NoticeKind};
use server::routes::{self, ServerState};
use service::listing::ImagePolicy;
use service::test_support::{self, RecordingUploader};
use tokio::net::TcpListener;

async fn start_server() -> anyhow::Result<(String, Arc<RecordingUploader>)> {
    let (listings, uploads, _db) = test_support::listing_service(ImagePolicy::default()).await?;
    let app = routes::build_router(ServerState { listings }, tower_http::cors::CorsLayer::very_permissive(), 1024 * 1024);
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });
    Ok((format!("http://{}", addr), uploads))
}

async fn dashboard() -> anyhow::Result<(Dashboard, Arc<RecordingUploader>)> {
    let (base_url, uploads) = start_server().await?;
    let client = ListingsClient::new(&ClientConfig { base_url, timeout_secs: 5 })?;
    Ok((Dashboard::new(client), uploads))
}

fn png(name: &str) -> Attachment {
    Attachment { file_name: name.into(), content_type: "image/png".into(), bytes: vec![0x89, b'P', b'N', b'G'] }
}

fn texts(notices: Vec<Notice>) -> Vec<String> {
    notices.into_iter().map(|n| n.text).collect()
}

#[tokio::test]
async fn create_edit_delete_round() -> anyhow::Result<()> {
    let (mut d, uploads) = dashboard().await?;
    d.refresh().await;
    assert!(d.listings().is_empty());

    d.open_create();
    *d.draft_mut() = ListingDraft { name: "Loft".into(), about: "Sunny loft".into() };
    d.attach(png("loft.png"));
    d.submit().await?;
    assert_eq!(texts(d.take_notices()), vec!["Successfully created: Loft"]);
    assert!(!d.modal().open);
    assert_eq!(d.listings().len(), 1);
    assert!(d.listings()[0].image.is_some());
    assert_eq!(uploads.uploads().len(), 1);

    let loft = d.listings()[0].clone();
    d.open_edit(&loft);
    d.draft_mut().name = "Loft 2".into();
    d.submit().await?;
    assert_eq!(texts(d.take_notices()), vec!["Successfully modified: Loft 2"]);
    assert_eq!(d.listings()[0].id, loft.id);
    assert_eq!(d.listings()[0].name, "Loft 2");
    // saving without a new file drops the image
    assert!(d.listings()[0].image.is_none());

    d.delete(&loft.id, "Loft 2").await;
    assert_eq!(texts(d.take_notices()), vec!["Successfully deleted: Loft 2"]);
    assert!(d.listings().is_empty());
    Ok(())
}

#[tokio::test]
async fn editing_a_vanished_listing_reports_failure() -> anyhow::Result<()> {
    let (mut d, _uploads) = dashboard().await?;
    d.open_create();
    *d.draft_mut() = ListingDraft { name: "Gone".into(), about: "Soon".into() };
    d.submit().await?;
    d.take_notices();

    let gone = d.listings()[0].clone();
    d.delete(&gone.id, &gone.name).await;
    d.take_notices();

    d.open_edit(&gone);
    d.submit().await?;
    let notices = d.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].kind, NoticeKind::Failure);
    assert_eq!(notices[0].text, "Failed to modify: Gone");
    assert!(d.listings().is_empty());
    Ok(())
}

#[tokio::test]
async fn deleting_twice_reports_success_both_times() -> anyhow::Result<()> {
    let (mut d, _uploads) = dashboard().await?;
    d.open_create();
    *d.draft_mut() = ListingDraft { name: "Twice".into(), about: "x".into() };
    d.submit().await?;
    d.take_notices();
    let id = d.listings()[0].id.clone();

    d.delete(&id, "Twice").await;
    d.delete(&id, "Twice").await;
    assert_eq!(texts(d.take_notices()), vec!["Successfully deleted: Twice", "Successfully deleted: Twice"]);
    Ok(())
}

#[tokio::test]
async fn render_lists_server_data() -> anyhow::Result<()> {
    let (mut d, _uploads) = dashboard().await?;
    d.open_create();
    *d.draft_mut() = ListingDraft { name: "Shown".into(), about: "On screen".into() };
    d.submit().await?;

    let view = d.render();
    assert!(view.contains("Shown"));
    assert!(view.contains("On screen"));
    assert!(view.contains("Successfully created: Shown"));
    Ok(())
}
