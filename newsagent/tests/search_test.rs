use mockito::Matcher;
use newsagent::search::{SearchProvider, SerpNewsProvider};

#[tokio::test]
async fn test_search_parses_news_results() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", "/search.json")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("q".into(), "rust language news".into()),
            Matcher::UrlEncoded("tbm".into(), "nws".into()),
            Matcher::UrlEncoded("num".into(), "5".into()),
            Matcher::UrlEncoded("api_key".into(), "fake-key".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "news_results": [
                    {
                        "title": "Rust 2.0 announced",
                        "link": "https://example.com/rust-2",
                        "source": "Example News",
                        "snippet": "The Rust project announced..."
                    },
                    {
                        "title": "Partial result",
                        "link": "https://example.com/partial"
                    }
                ]
            }"#,
        )
        .create_async()
        .await;

    let provider = SerpNewsProvider::new(format!("{}/search.json", server.url()), "fake-key");

    let results = provider
        .search_news("rust language news", 5)
        .await
        .expect("search results");

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].title, "Rust 2.0 announced");
    assert_eq!(results[0].source, "Example News");
    // Missing fields fall back to placeholders instead of failing the batch
    assert_eq!(results[1].source, "Unknown");
    assert_eq!(results[1].snippet, "");

    mock.assert_async().await;
}

#[tokio::test]
async fn test_search_without_news_results_is_empty() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", "/search.json")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"search_metadata": {"status": "Success"}}"#)
        .create_async()
        .await;

    let provider = SerpNewsProvider::new(format!("{}/search.json", server.url()), "fake-key");

    let results = provider.search_news("obscure query", 5).await.expect("empty");
    assert!(results.is_empty());

    mock.assert_async().await;
}

#[tokio::test]
async fn test_search_api_error_is_surfaced() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", "/search.json")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_body(r#"{"error": "Invalid API key"}"#)
        .create_async()
        .await;

    let provider = SerpNewsProvider::new(format!("{}/search.json", server.url()), "bad-key");

    let result = provider.search_news("anything", 5).await;
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("401"));

    mock.assert_async().await;
}

#[tokio::test]
async fn test_search_timeout_is_distinguishable() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("GET", "/search.json")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_chunked_body(|w| {
            std::thread::sleep(std::time::Duration::from_secs(3));
            w.write_all(b"too late")
        })
        .create_async()
        .await;

    let provider =
        SerpNewsProvider::new(format!("{}/search.json", server.url()), "fake-key").with_timeout(1);

    let result = provider.search_news("slow query", 5).await;
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("timed out"));
}
