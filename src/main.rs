use homework_relay::logging;
use homework_relay::prelude::*;
use std::process::ExitCode;

fn main() -> ExitCode {
    let settings = RelaySettings::load();

    let log_file = settings.as_ref().ok().and_then(|s| s.log_file.as_deref());
    if let Err(e) = logging::init(log_file) {
        eprintln!("homework-relay: cannot open log file: {}", e);
        return ExitCode::FAILURE;
    }

    let settings = match settings {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("refusing to start: {}", e);
            return ExitCode::FAILURE;
        }
    };
    tracing::debug!(?settings, "settings loaded");

    match build(&settings) {
        Ok(relay) => relay.run(),
        Err(e) => {
            tracing::error!("refusing to start: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn build(settings: &RelaySettings) -> Result<Relay<PracticumClient, TelegramMessenger>> {
    let api = PracticumClient::builder()
        .with_url(&settings.endpoint)
        .with_token(&settings.practicum_token)
        .with_timeout(settings.request_timeout)
        .build()?;

    let bot = TelegramMessenger::builder()
        .with_api_url(&settings.telegram_api_url)
        .with_token(&settings.telegram_token)
        .with_chat_id(&settings.telegram_chat_id)
        .with_timeout(settings.request_timeout)
        .build()?;

    let relay = Relay::new(api, bot)
        .with_interval(settings.poll_interval)
        .with_failure_reports(settings.report_errors);

    #[cfg(feature = "metrics")]
    let relay = relay.with_metrics(homework_relay::metrics::RelayMetrics::new(
        opentelemetry::global::meter("homework-relay"),
    ));

    Ok(relay)
}
