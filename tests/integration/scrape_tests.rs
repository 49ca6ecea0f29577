use forum_sweep::config::Config;
use forum_sweep::crawler::{RowRecord, Scraper};
use forum_sweep::output::{discard_table, read_table};
use forum_sweep::SweepError;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BOARD_PATH: &str = "/lounge/7";

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str, table_path: &Path) -> Config {
    let mut config = Config::default();
    config.site.base_url = base_url.to_string();
    config.site.board_name = "lounge".to_string();
    config.site.board_id = 7;
    config.scraper.max_retries = 2;
    config.scraper.max_concurrent_pages = 4;
    config.output.table_path = table_path.to_string_lossy().into_owned();
    config
}

/// A listing page whose rows carry the given post numbers
fn listing_page(numbers: &[u64]) -> String {
    let rows: String = numbers
        .iter()
        .map(|n| {
            format!(
                r#"<tr class="lgtm">
                    <td class="num"><span>{n}</span></td>
                    <td class="tit"><div><div><a href="/lounge/7/{n}"><span class="category">[Q]</span> Post {n} <span class="con-comment">[2]</span></a></div></div></td>
                    <td class="user"><span>user{n}</span></td>
                    <td class="view">1,{n:03}</td>
                </tr>"#,
                n = n
            )
        })
        .collect();

    format!(
        r#"<html><body><div class="board-list"><table><tbody>{}</tbody></table></div></body></html>"#,
        rows
    )
}

fn no_result_page() -> String {
    r#"<html><body><div class="board-list"><table><tbody>
        <tr><td colspan="5"><div class="no-result">No results</div></td></tr>
    </tbody></table></div></body></html>"#
        .to_string()
}

async fn mount_page(server: &MockServer, page: &str, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(BOARD_PATH))
        .and(query_param("p", page))
        .respond_with(template)
        .mount(server)
        .await;
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html; charset=utf-8")
}

fn numbers(rows: &[RowRecord]) -> Vec<Option<u64>> {
    rows.iter().map(|r| r.number).collect()
}

#[tokio::test]
async fn test_full_scrape_three_pages() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let table = dir.path().join("pages.csv");

    // 75 results -> estimate of 3 pages
    mount_page(&mock_server, "1", html(listing_page(&[75, 74]))).await;
    mount_page(&mock_server, "2", html(listing_page(&[73, 72]))).await;
    mount_page(&mock_server, "3", html(listing_page(&[71]))).await;

    let config = create_test_config(&mock_server.uri(), &table);
    let scraper = Scraper::new(config).expect("Failed to create scraper");
    let report = scraper.run("  Post   Search ").await.expect("Scrape failed");

    assert_eq!(report.pages_discovered, 3);
    assert_eq!(report.keyword, "post search");
    assert!(report.is_complete());
    assert_eq!(report.rows_written, 5);

    let rows = read_table(&table).unwrap();
    assert_eq!(
        numbers(&rows),
        vec![Some(75), Some(74), Some(73), Some(72), Some(71)]
    );
    assert_eq!(rows[0].title, "Post 75");
    assert_eq!(rows[0].author, "user75");
    assert_eq!(rows[0].views, Some(1075));
    assert_eq!(rows[0].link.as_deref(), Some("/lounge/7/75"));

    let text = std::fs::read_to_string(&table).unwrap();
    assert!(text.starts_with("No.,Title,User,View,Link\n"));

    discard_table(&table).unwrap();
    assert!(!table.exists());
}

#[tokio::test]
async fn test_failed_page_is_left_out() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let table = dir.path().join("pages.csv");

    mount_page(&mock_server, "1", html(listing_page(&[75, 74]))).await;
    mount_page(&mock_server, "3", html(listing_page(&[71]))).await;

    // one attempt plus two retries, all failing
    Mock::given(method("GET"))
        .and(path(BOARD_PATH))
        .and(query_param("p", "2"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), &table);
    let report = Scraper::new(config)
        .expect("Failed to create scraper")
        .run("post")
        .await
        .expect("Scrape failed");

    assert_eq!(report.pages_discovered, 3);
    assert_eq!(report.failed_pages, vec![2]);
    assert_eq!(report.rows_written, 3);

    let rows = read_table(&table).unwrap();
    assert_eq!(numbers(&rows), vec![Some(75), Some(74), Some(71)]);
}

#[tokio::test]
async fn test_overcounted_pages_are_probed_away() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let table = dir.path().join("pages.csv");

    // 130 results -> estimate of 5 pages, only 2 exist
    mount_page(&mock_server, "1", html(listing_page(&[130, 129]))).await;
    mount_page(&mock_server, "2", html(listing_page(&[128]))).await;
    for page in ["3", "4", "5"] {
        mount_page(&mock_server, page, html(no_result_page())).await;
    }

    let config = create_test_config(&mock_server.uri(), &table);
    let report = Scraper::new(config)
        .expect("Failed to create scraper")
        .run("post")
        .await
        .expect("Scrape failed");

    assert_eq!(report.pages_discovered, 2);
    assert_eq!(
        numbers(&read_table(&table).unwrap()),
        vec![Some(130), Some(129), Some(128)]
    );
}

#[tokio::test]
async fn test_unreachable_first_page_is_fatal() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let table = dir.path().join("pages.csv");

    Mock::given(method("GET"))
        .and(path(BOARD_PATH))
        .and(query_param("p", "1"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    // No other page may be requested
    Mock::given(method("GET"))
        .and(path(BOARD_PATH))
        .respond_with(html(listing_page(&[1])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), &table);
    let err = Scraper::new(config)
        .expect("Failed to create scraper")
        .run("post")
        .await
        .unwrap_err();

    assert!(matches!(err, SweepError::Status { status: 503, .. }));
    assert!(!table.exists());
}

#[tokio::test]
async fn test_missing_result_count_is_fatal() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let table = dir.path().join("pages.csv");

    mount_page(
        &mock_server,
        "1",
        html("<html><body><p>Search is down</p></body></html>".to_string()),
    )
    .await;

    let config = create_test_config(&mock_server.uri(), &table);
    let err = Scraper::new(config)
        .expect("Failed to create scraper")
        .run("post")
        .await
        .unwrap_err();

    assert!(matches!(err, SweepError::MissingIndicator { .. }));
    assert!(!table.exists());
}

#[tokio::test]
async fn test_repeated_runs_are_identical() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let first = dir.path().join("first.csv");
    let second = dir.path().join("second.csv");

    let page_one: Vec<u64> = (31..=60).rev().collect();
    let page_two: Vec<u64> = (1..=30).rev().collect();
    mount_page(&mock_server, "1", html(listing_page(&page_one))).await;
    mount_page(&mock_server, "2", html(listing_page(&page_two))).await;
    mount_page(&mock_server, "3", html(no_result_page())).await;

    for table in [&first, &second] {
        let mut config = create_test_config(&mock_server.uri(), table);
        config.scraper.max_concurrent_pages = 0;
        Scraper::new(config)
            .expect("Failed to create scraper")
            .run("post")
            .await
            .expect("Scrape failed");
    }

    let a = std::fs::read(&first).unwrap();
    let b = std::fs::read(&second).unwrap();
    assert_eq!(a, b);
    assert_eq!(read_table(&first).unwrap().len(), 60);
}
