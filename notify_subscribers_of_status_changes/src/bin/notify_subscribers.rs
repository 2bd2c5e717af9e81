use notify_subscribers_of_status_changes::StatusChangeNotifier;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    shared_kernel::tracing::config_telemetry();
    let summary = StatusChangeNotifier::new()?.run().await?;
    tracing::info!(
        "Pass complete: {} messages across {} cities",
        summary.messages_sent,
        summary.cities_notified
    );
    Ok(())
}
