use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    println!(
        "mock nutrition API listening on {addr} (app_id={}, app_key={})",
        mock_server::APP_ID,
        mock_server::APP_KEY
    );
    mock_server::run(listener).await
}
