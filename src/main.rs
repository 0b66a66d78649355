use sharewave::error::ShareWaveError;

#[tokio::main]
async fn main() -> Result<(), ShareWaveError> {
    sharewave::app::run().await
}
