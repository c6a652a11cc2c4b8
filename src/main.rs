#[tokio::main]
async fn main() {
    loyalbook_backend::run().await;
}
