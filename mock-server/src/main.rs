use std::collections::HashMap;

use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let port = std::env::var("PORT").unwrap_or_else(|_| "8008".to_string());
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    println!("listening on {addr}");

    let mut accounts = HashMap::new();
    accounts.insert("alice".to_string(), "wonderland".to_string());
    mock_server::run(listener, accounts).await
}
