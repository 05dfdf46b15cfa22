// ABOUTME: End-to-end extraction tests over HTML snapshots of supported sites.
// ABOUTME: Covers fallback resolution, structured-data backfill, and normalization.

use std::fs;
use std::sync::Arc;

use joblens_core::{
    AbsencePolicy, Client, ExtractionSpec, Field, ProfileRegistry, SiteProfile, StaticRenderer,
    Strategy,
};
use pretty_assertions::assert_eq;

/// Load an HTML snapshot from the fixtures directory.
fn load_fixture(name: &str) -> String {
    let path = format!("{}/tests/fixtures/{}.html", env!("CARGO_MANIFEST_DIR"), name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("failed to read fixture {}: {}", path, e))
}

#[tokio::test]
async fn townwork_page_extracts_and_normalizes() {
    let html = load_fixture("townwork");
    let client = Client::builder().build();
    let report = client
        .scrape_html(&html, "https://townwork.net/detail/clc_0123456789/job/")
        .await
        .expect("scrape succeeds");

    assert_eq!(report.source, "タウンワーク");

    let record = &report.record;
    // The page exposes the operating company; the brand post-pass corrects
    // it to the known parent.
    assert_eq!(record.company_name, "ワタミ株式会社");
    assert_eq!(record.store_name, vec!["ミライザカ 高幡不動店".to_string()]);
    assert_eq!(record.job_type, "ホールスタッフ募集");
    assert_eq!(record.salary, "時給1200円〜1500円 ※22時以降は時給25%UP");
    assert_eq!(record.work_hours, "17:00〜23:00（シフト制）");
    assert_eq!(record.location, "東京都日野市高幡1000-1");
    assert_eq!(record.transportation, "高幡不動駅から徒歩3分");
    assert_eq!(record.requirements, "未経験者歓迎、高校生OK");
    assert_eq!(record.benefits, "交通費支給、まかない有");
    assert_eq!(record.near_station, "京王線 高幡不動駅");
    // Not on the page at all; backfilled from the JobPosting block.
    assert_eq!(record.job_description, "接客、配膳、ドリンク作成など");
    // Never present anywhere.
    assert_eq!(record.work_days, "");

    // The raw record keeps the unnormalized values.
    assert_eq!(
        report.raw.get(Field::Company),
        Some("フードサービス運営株式会社")
    );
    assert_eq!(report.extracted_count, 10);
}

#[tokio::test]
async fn indeed_page_title_passes_through_as_job_type() {
    let html = load_fixture("indeed");
    let client = Client::builder().build();
    let report = client
        .scrape_html(&html, "https://jp.indeed.com/viewjob?jk=abc123")
        .await
        .expect("scrape succeeds");

    assert_eq!(report.source, "Indeed");

    let record = &report.record;
    assert_eq!(record.company_name, "株式会社ロジスティクス田中");
    assert_eq!(record.job_type, "倉庫内軽作業スタッフ");
    assert!(record.store_name.is_empty());
    assert_eq!(record.salary, "時給 1,100円 〜 1,300円");
    assert_eq!(record.location, "神奈川県横浜市鶴見区");
    assert_eq!(
        record.job_description,
        "倉庫内でのピッキング、梱包、仕分け作業です。 未経験の方も丁寧に教えます。"
    );
    assert_eq!(report.extracted_count, 5);
}

#[tokio::test]
async fn fallback_chain_recovers_title_from_later_strategy() {
    let mut registry = ProfileRegistry::new();
    registry.register(SiteProfile {
        hosts: vec!["jobsite-a.example".to_string()],
        source: "JobSiteA".to_string(),
        title: Some(ExtractionSpec {
            strategies: vec![
                Strategy::Css(".title-a".to_string()),
                Strategy::Css("h1[data-title]".to_string()),
            ],
        }),
        ..Default::default()
    });

    let html = "<html><body><h1 data-title>Night Shift Clerk</h1></body></html>";
    let client = Client::builder().registry(registry).build();
    let report = client
        .scrape_html(html, "https://jobsite-a.example/job/123")
        .await
        .expect("scrape succeeds");

    assert_eq!(report.raw.get(Field::Title), Some("Night Shift Clerk"));
    assert_eq!(report.record.job_type, "Night Shift Clerk");
}

#[tokio::test]
async fn structured_data_fills_an_otherwise_empty_page() {
    let html = r#"
        <html><head>
        <script type="application/ld+json">
        {"@type": "JobPosting", "hiringOrganization": {"name": "Acme Co"}, "title": "Clerk"}
        </script>
        </head><body><p>nothing selectable here</p></body></html>
    "#;
    let client = Client::builder().build();
    let report = client
        .scrape_html(html, "https://townwork.net/detail/xyz/")
        .await
        .expect("scrape succeeds");

    assert_eq!(report.raw.get(Field::Company), Some("Acme Co"));
    assert_eq!(report.raw.get(Field::Title), Some("Clerk"));
    assert_eq!(report.record.company_name, "株式会社Acme Co");
    assert_eq!(report.record.job_type, "Clerk");
    assert_eq!(report.extracted_count, 2);
}

#[tokio::test]
async fn company_is_recovered_from_incidental_page_text() {
    // No company anywhere in markup or metadata, but the legal name appears
    // in running page text, as it does on the brand's own listings.
    let html = r#"
        <html><body>
        <h1 class="jsc-job-header-ttl">ミライザカ 高幡不動店 ホールスタッフ募集</h1>
        <p>本求人はワタミ株式会社が運営する店舗の募集です。</p>
        </body></html>
    "#;
    let client = Client::builder().build();
    let report = client
        .scrape_html(html, "https://townwork.net/detail/brand/")
        .await
        .expect("scrape succeeds");

    assert_eq!(report.raw.get(Field::Company), Some("ワタミ株式会社"));
    assert_eq!(report.record.company_name, "ワタミ株式会社");
}

#[tokio::test]
async fn static_renderer_drives_the_full_scrape_path() {
    let html = load_fixture("townwork");
    let client = Client::builder()
        .renderer(Arc::new(StaticRenderer::new(html)))
        .absence_policy(AbsencePolicy::ElideEmpty)
        .build();

    let envelope = client
        .scrape_envelope("https://townwork.net/detail/clc_0123456789/job/")
        .await;
    assert!(envelope.is_success());

    let json = serde_json::to_value(&envelope).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["source"], "タウンワーク");
    assert_eq!(json["extractedCount"], 10);
    assert_eq!(json["data"]["companyName"], "ワタミ株式会社");
    // Elided under the deployment's absence policy.
    assert!(json["data"].get("workDays").is_none());
    assert!(json["data"].get("additionalInfo").is_none());
    assert!(json["timestamp"].as_str().is_some());
}
