use aiping_plugin::config::PluginConfig;
use aiping_plugin::modules::{
    Image2ImageParams, Image2ImageTool, ImageInput, ImageSource, PluginTool, Text2ImageParams,
    Text2ImageTool, ToolCredentials, ToolInvokeMessage,
};
use futures::StreamExt;
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;
use std::fs;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use tokio::net::TcpListener;

const ROUTE: &str = "/v1/images/generations";

fn credentials(server: &ServerGuard) -> ToolCredentials {
    ToolCredentials::new("sk-test").with_endpoint(format!("{}/v1", server.url()))
}

fn text(message: &str) -> ToolInvokeMessage {
    ToolInvokeMessage::text(message)
}

#[tokio::test]
async fn empty_prompt_makes_no_request() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", ROUTE)
        .expect(0)
        .create_async()
        .await;

    let text2image = Text2ImageTool::new(credentials(&server));
    let messages: Vec<_> = text2image.invoke(Text2ImageParams::new("")).collect().await;
    assert_eq!(messages, vec![text("Please enter a prompt.")]);

    let image2image = Image2ImageTool::new(credentials(&server));
    let params = Image2ImageParams::new("", ImageSource::Bytes(vec![1, 2, 3]));
    let messages: Vec<_> = image2image.invoke(params).collect().await;
    assert_eq!(messages[0], text("Please enter a prompt."));
    assert_eq!(messages.len(), 1);

    mock.assert_async().await;
}

#[tokio::test]
async fn text2image_streams_decoded_images() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", ROUTE)
        .match_header("authorization", "Bearer sk-test")
        .match_body(Matcher::PartialJson(json!({
            "model": "Qwen-Image",
            "input": {"prompt": "a cat", "negative_prompt": "模糊，低质量"},
            "extra_body": {"seed": 7}
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"data": [{"url": "data:image/jpeg;base64,QQ=="}]}).to_string())
        .create_async()
        .await;

    let tool = Text2ImageTool::new(credentials(&server));
    let params = Text2ImageParams {
        extra_body: Some(r#"{"seed": 7}"#.to_string()),
        ..Text2ImageParams::new("a cat")
    };
    let messages: Vec<_> = tool.invoke(params).collect().await;

    mock.assert_async().await;
    assert_eq!(
        messages,
        vec![
            text("Generating image with AIPing API..."),
            ToolInvokeMessage::blob(b"A".to_vec(), "image/jpeg"),
            text("Image generated successfully!"),
        ]
    );
}

#[tokio::test]
async fn error_status_is_reported_and_body_still_processed() {
    let mut server = Server::new_async().await;
    let body = json!({"error": "quota", "data": [{"url": "aGk="}]}).to_string();
    let _mock = server
        .mock("POST", ROUTE)
        .with_status(429)
        .with_body(body.clone())
        .create_async()
        .await;

    let tool = Text2ImageTool::new(credentials(&server));
    let messages: Vec<_> = tool.invoke(Text2ImageParams::new("a cat")).collect().await;

    assert_eq!(
        messages,
        vec![
            text("Generating image with AIPing API..."),
            text(&format!("Error generating image: {}", body)),
            ToolInvokeMessage::blob(b"hi".to_vec(), "image/png"),
            text("Image generated successfully!"),
        ]
    );
}

#[tokio::test]
async fn missing_image_list_ends_the_invocation() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", ROUTE)
        .with_status(200)
        .with_body(r#"{"data": []}"#)
        .create_async()
        .await;

    let tool = Text2ImageTool::new(credentials(&server));
    let messages: Vec<_> = tool.invoke(Text2ImageParams::new("a cat")).collect().await;

    assert_eq!(
        messages,
        vec![
            text("Generating image with AIPing API..."),
            text("Error generating image: image list is []"),
        ]
    );
}

#[tokio::test]
async fn invalid_entries_are_skipped_and_decode_failures_stop() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", ROUTE)
        .with_status(200)
        .with_body(
            json!({
                "data": [
                    {"url": 5},
                    {"url": "   "},
                    {"url": "data:image/png;base64,QQ=="},
                    {"url": "not base64!"},
                    {"url": "QQ=="}
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let tool = Text2ImageTool::new(credentials(&server));
    let messages: Vec<_> = tool.invoke(Text2ImageParams::new("a cat")).collect().await;

    assert_eq!(messages.len(), 5);
    assert_eq!(messages[1], text("Error generating image: image is not a string 5"));
    assert_eq!(messages[2], ToolInvokeMessage::blob(b"A".to_vec(), "image/png"));
    assert_eq!(messages[3], text("Image generated successfully!"));
    assert!(messages[4]
        .as_text()
        .unwrap()
        .contains("Invalid base64 payload in base64 string"));
}

#[tokio::test]
async fn remote_result_urls_are_downloaded() {
    let mut server = Server::new_async().await;
    let _download = server
        .mock("GET", "/files/out.webp")
        .with_status(200)
        .with_header("content-type", "application/octet-stream")
        .with_body(vec![1u8, 2, 3])
        .create_async()
        .await;
    let _generate = server
        .mock("POST", ROUTE)
        .with_status(200)
        .with_body(json!({"data": [{"url": format!("{}/files/out.webp", server.url())}]}).to_string())
        .create_async()
        .await;

    let tool = Text2ImageTool::new(credentials(&server));
    let messages: Vec<_> = tool.invoke(Text2ImageParams::new("a cat")).collect().await;

    assert_eq!(messages[1], ToolInvokeMessage::blob(vec![1, 2, 3], "image/webp"));
}

#[tokio::test]
async fn image2image_falls_back_to_cached_path() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", ROUTE)
        .match_body(Matcher::PartialJson(json!({
            "model": "Qwen-Image-Edit",
            "input": {"prompt": "make it blue", "image": "data:image/png;base64,QQ=="}
        })))
        .with_status(200)
        .with_body(json!({"data": [{"url": "data:image/png;base64,QQ=="}]}).to_string())
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let cached = dir.path().join("upload.png");
    fs::write(&cached, b"A").unwrap();

    let input = ImageInput::new()
        .with(ImageSource::CachedPath(cached.clone()))
        .with(ImageSource::Path(dir.path().join("missing.png")));

    let tool = Image2ImageTool::new(credentials(&server));
    let messages: Vec<_> = tool
        .invoke(Image2ImageParams::new("make it blue", input))
        .collect()
        .await;

    mock.assert_async().await;
    let texts: Vec<&str> = messages.iter().filter_map(ToolInvokeMessage::as_text).collect();
    assert!(texts[0].starts_with("Failed to read image data from file path: "));
    assert_eq!(
        texts[1],
        format!("Read image data from cached path: {}, size=0.00KB", cached.display())
    );
    assert_eq!(
        texts[2],
        "Image encoded: original size=0.00KB, encoded size=0.00KB"
    );
    assert_eq!(texts[3], "Generating image with AIPing API...");
    assert_eq!(texts[4], "Image generated successfully!");
}

#[tokio::test]
async fn image2image_reads_url_source_first() {
    let mut server = Server::new_async().await;
    let _upload = server
        .mock("GET", "/uploads/input.png")
        .with_status(200)
        .with_body(vec![0u8; 1024])
        .create_async()
        .await;
    let _generate = server
        .mock("POST", ROUTE)
        .with_status(200)
        .with_body(json!({"data": [{"url": "QQ=="}]}).to_string())
        .create_async()
        .await;

    let url = format!("{}/uploads/input.png", server.url());
    let input = ImageInput::new()
        .with(ImageSource::Bytes(vec![9, 9]))
        .with(ImageSource::Url(url.clone()));

    let tool = Image2ImageTool::new(credentials(&server));
    let messages: Vec<_> = tool
        .invoke(Image2ImageParams::new("make it blue", input))
        .collect()
        .await;

    let texts: Vec<&str> = messages.iter().filter_map(ToolInvokeMessage::as_text).collect();
    assert_eq!(
        texts[0],
        format!("Fetching image from URL: {}...", url.chars().take(30).collect::<String>())
    );
    assert_eq!(texts[1], "Downloaded image: size=1.00KB");
    assert!(texts[2].starts_with("Image encoded: original size=1.00KB"));
    assert!(messages.contains(&ToolInvokeMessage::blob(b"A".to_vec(), "image/png")));
}

/// Accepts connections and never answers them.
async fn silent_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    format!("http://{}/v1", addr)
}

#[tokio::test]
async fn configured_request_timeout_reaches_the_tools() {
    let endpoint = silent_endpoint().await;
    let config = PluginConfig {
        request_timeout: Duration::from_millis(200),
        ..PluginConfig::default()
    };

    let tool = Text2ImageTool::from_config(
        ToolCredentials::new("sk-test").with_endpoint(endpoint.clone()),
        &config,
    );
    let started = Instant::now();
    let messages: Vec<_> = tool.invoke(Text2ImageParams::new("a cat")).collect().await;

    assert!(started.elapsed() < Duration::from_secs(10));
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0], text("Generating image with AIPing API..."));
    assert!(messages[1]
        .as_text()
        .unwrap()
        .starts_with("Error generating image: "));

    let tool = Image2ImageTool::from_config(
        ToolCredentials::new("sk-test").with_endpoint(endpoint),
        &config,
    );
    let started = Instant::now();
    let messages: Vec<_> = tool
        .invoke(Image2ImageParams::new("make it blue", ImageSource::Bytes(vec![1])))
        .collect()
        .await;

    assert!(started.elapsed() < Duration::from_secs(10));
    let last = messages.last().and_then(ToolInvokeMessage::as_text).unwrap();
    assert!(last.starts_with("Error generating image: "));
}
