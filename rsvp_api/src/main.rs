#[tokio::main]
async fn main() {
    rsvp_api::run().await;
}
