use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::time;

use seal_server::services::transport::{PublishSession, Role, SubscribeSession};

use crate::schedule::{current_minute_of_day, Schedule};
use crate::settings::Settings;

pub mod schedule;
pub mod settings;

/// Plays the field device: follows schedules from the command topic and
/// reports motion on an interval until Ctrl-C.
pub async fn run(settings: &Arc<Settings>) -> anyhow::Result<()> {
    let schedule = Arc::new(Schedule::default());

    let commands = SubscribeSession::connect(
        settings.broker.connect_params(Role::Subscribe),
        settings.topics.time_range.clone(),
        schedule.clone(),
    )
    .await?;
    let publisher = PublishSession::connect(settings.broker.connect_params(Role::Publish)).await?;

    let probability = settings.mock.motion_probability.clamp(0.0, 1.0);
    let mut interval = time::interval(Duration::from_secs(settings.mock.publish_interval_secs.max(1)));

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let motion = rand::thread_rng().gen_bool(probability);
                let payload = schedule.report(current_minute_of_day(), motion);

                match publisher.publish(&settings.topics.motion, payload) {
                    Ok(()) => tracing::debug!("Send: {}", payload),
                    Err(e) => tracing::warn!("Failed to report {}: {}", payload, e),
                }
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    commands.disconnect().await;
    publisher.disconnect().await;

    Ok(())
}
