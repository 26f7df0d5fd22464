#[tokio::main]
async fn main() {
    storefront_revalidate::start_server().await;
}
