/*
 * SPDX-FileCopyrightText: Copyright (c) 2025 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
 * SPDX-License-Identifier: LicenseRef-NvidiaProprietary
 *
 * NVIDIA CORPORATION, its affiliates and licensors retain all intellectual
 * property and proprietary rights in and to this material, related
 * documentation and any modifications thereto. Any use, reproduction,
 * disclosure or distribution of this material and related documentation
 * without an express license agreement from NVIDIA CORPORATION or
 * its affiliates is strictly prohibited.
 */

// src/main.rs
// ircmd-migrate loads the built-in IR command table onto the MQTT
// broker as retained messages, then exits.

mod config;
mod report;

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use config::{CliError, DEFAULT_CLIENT_ID, DEFAULT_PORT, MigrateConfig};
use ircmd::{Broker, CommandPublisher, CommandTable, MqttBroker};
use tracing::metadata::LevelFilter;
use tracing::{debug, info, warn};

#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(&cli);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("\n✗ Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

#[derive(clap::Parser)]
#[clap(
    name = "ircmd-migrate",
    about = "Publish the built-in IR command table to the MQTT broker as retained messages"
)]
struct Cli {
    #[clap(long, short, help = "Turn on debug logging (same as RUST_LOG=debug)")]
    debug: bool,
    #[clap(long, env = "MQTT_HOST", help = "MQTT broker hostname or address")]
    host: String,
    #[clap(long, env = "MQTT_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,
    #[clap(long, env = "MQTT_USER", help = "Broker username")]
    username: Option<String>,
    #[clap(
        long,
        env = "MQTT_PASS",
        hide_env_values = true,
        help = "Broker password. Prefer --password-file"
    )]
    password: Option<String>,
    #[clap(
        long,
        env = "MQTT_PASS_FILE",
        help = "Read the broker password from this file"
    )]
    password_file: Option<PathBuf>,
    #[clap(long, env = "MQTT_CLIENT_ID", default_value = DEFAULT_CLIENT_ID)]
    client_id: String,
    #[clap(
        long,
        value_parser = humantime::parse_duration,
        default_value = "10s",
        help = "How long to wait for the broker to accept the connection"
    )]
    connect_timeout: Duration,
    #[clap(
        long,
        value_parser = humantime::parse_duration,
        default_value = "5s",
        help = "How long to wait for acknowledgments after the last publish"
    )]
    ack_timeout: Duration,
    #[clap(long, value_parser = humantime::parse_duration, default_value = "60s")]
    keep_alive: Duration,
    #[clap(
        long,
        action,
        help = "Print the topics and payloads without connecting"
    )]
    dry_run: bool,
}

impl TryFrom<Cli> for MigrateConfig {
    type Error = CliError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        if cli.host.trim().is_empty() {
            return Err(CliError::EmptyHost);
        }
        config::validate_client_id(&cli.client_id)?;
        config::validate_keep_alive(cli.keep_alive)?;
        let credentials =
            config::resolve_credentials(cli.username, cli.password, cli.password_file.as_deref())?;

        Ok(MigrateConfig {
            host: cli.host,
            port: cli.port,
            client_id: cli.client_id,
            credentials,
            connect_timeout: cli.connect_timeout,
            ack_timeout: cli.ack_timeout,
            keep_alive: cli.keep_alive,
            dry_run: cli.dry_run,
        })
    }
}

// run returns the exit code for the outcomes it knows how to report.
// Anything else comes back as an Err for main to print.
async fn run(cli: Cli) -> eyre::Result<ExitCode> {
    let config = MigrateConfig::try_from(cli)?;
    debug!("Configuration: {:?}", config);

    let table = CommandTable::builtin();
    for issue in table.validate() {
        warn!("Command table: {}", issue);
    }

    print!("{}", report::banner());

    if config.dry_run {
        let plan = CommandPublisher::<MqttBroker>::plan(&table)?;
        print!("{}", report::plan(&table, &plan));
        return Ok(ExitCode::SUCCESS);
    }

    let broker = MqttBroker::new(
        &config.host,
        config.port,
        &config.client_id,
        Some(config.client_options()),
    );
    publish_and_report(&config, &table, broker, &mut std::io::stdout()).await
}

// publish_and_report runs one publish over `broker`, writing progress
// to `out` as it happens, and maps the result to an exit code.
async fn publish_and_report<B, W>(
    config: &MigrateConfig,
    table: &CommandTable,
    broker: B,
    out: &mut W,
) -> eyre::Result<ExitCode>
where
    B: Broker,
    W: Write,
{
    writeln!(out, "{}", report::connecting(config))?;
    out.flush()?;

    let mut publisher = CommandPublisher::new(broker, config.publish_settings());
    let result = publisher
        .run_with_progress(table, |event| {
            let _ = write!(out, "{}", report::progress(config, &event));
            let _ = out.flush();
        })
        .await;

    match result {
        Ok(summary) => {
            info!(
                "Published {} bytes ({} ok, {} failed)",
                summary.stats.total_bytes_published,
                summary.stats.total_published,
                summary.stats.total_failed
            );
            write!(out, "{}", report::summary(config, &summary))?;
            Ok(ExitCode::SUCCESS)
        }
        Err(e) if e.is_connection_error() => {
            write!(out, "{}", report::connection_failed(&e))?;
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e.into()),
    }
}

fn setup_logging(cli: &Cli) {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::util::SubscriberInitExt;

    let level = if cli.debug {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    if let Err(e) = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::Layer::default()
                .compact()
                .with_writer(std::io::stderr),
        )
        .with(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .try_init()
    {
        eprintln!("Failed to initialize logging for ircmd-migrate: {e}");
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use ircmd::{IrPublishError, QoS};

    use super::*;

    // ScriptedBroker accepts or refuses the session and acknowledges
    // every publish except the one on `unacked`.
    #[derive(Default)]
    struct ScriptedBroker {
        refuse: bool,
        unacked: Option<&'static str>,
        published: Vec<String>,
    }

    #[async_trait]
    impl Broker for ScriptedBroker {
        async fn connect(&mut self, _timeout: Duration) -> Result<(), IrPublishError> {
            if self.refuse {
                return Err(IrPublishError::ConnectionRefused(
                    "BadUserNamePassword".to_string(),
                ));
            }
            Ok(())
        }

        async fn publish(
            &mut self,
            topic: &str,
            _payload: Vec<u8>,
            _qos: QoS,
            _retain: bool,
        ) -> Result<(), IrPublishError> {
            self.published.push(topic.to_string());
            Ok(())
        }

        async fn wait_for_acks(&mut self, _timeout: Duration) -> Vec<String> {
            self.published
                .iter()
                .filter(|topic| self.unacked.is_some_and(|name| topic.ends_with(name)))
                .cloned()
                .collect()
        }

        async fn disconnect(&mut self) -> Result<(), IrPublishError> {
            Ok(())
        }
    }

    fn test_config() -> MigrateConfig {
        MigrateConfig::try_from(parse(&["--host", "broker.test"])).unwrap()
    }

    fn parse(args: &[&str]) -> Cli {
        match Cli::try_parse_from(std::iter::once("ircmd-migrate").chain(args.iter().copied())) {
            Ok(cli) => cli,
            Err(e) => panic!("failed to parse {args:?}: {e}"),
        }
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["--host", "homeassistant.local"]);
        assert_eq!(cli.connect_timeout, Duration::from_secs(10));
        assert_eq!(cli.ack_timeout, Duration::from_secs(5));
        assert_eq!(cli.keep_alive, Duration::from_secs(60));
        assert!(!cli.dry_run);
        assert!(!cli.debug);
    }

    #[test]
    fn test_full_command_line() {
        let cli = parse(&[
            "--host",
            "10.0.0.5",
            "--port",
            "8883",
            "--username",
            "matt",
            "--password",
            "hunter2",
            "--client-id",
            "loader-1",
            "--connect-timeout",
            "2s",
            "--ack-timeout",
            "1500ms",
            "--keep-alive",
            "30s",
            "--dry-run",
            "--debug",
        ]);
        assert!(cli.dry_run);
        assert!(cli.debug);

        let config = MigrateConfig::try_from(cli).unwrap();
        assert_eq!(config.broker_addr(), "10.0.0.5:8883");
        assert_eq!(config.client_id, "loader-1");
        assert_eq!(config.username(), Some("matt"));
        assert_eq!(config.connect_timeout, Duration::from_secs(2));
        assert_eq!(config.ack_timeout, Duration::from_millis(1500));
        assert_eq!(config.keep_alive, Duration::from_secs(30));
        assert!(config.dry_run);
    }

    #[test]
    fn test_bad_duration_is_rejected() {
        let result = Cli::try_parse_from([
            "ircmd-migrate",
            "--host",
            "localhost",
            "--ack-timeout",
            "soon",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_config_errors() {
        let err = MigrateConfig::try_from(parse(&["--host", "  "])).unwrap_err();
        assert!(matches!(err, CliError::EmptyHost));

        let err = MigrateConfig::try_from(parse(&["--host", "localhost", "--client-id", " x"]))
            .unwrap_err();
        assert!(matches!(err, CliError::InvalidClientId(_)));

        let err =
            MigrateConfig::try_from(parse(&["--host", "localhost", "--keep-alive", "200ms"]))
                .unwrap_err();
        assert!(matches!(err, CliError::InvalidKeepAlive(_)));
    }

    #[tokio::test]
    async fn test_refused_connection_exits_with_failure() {
        let mut out = Vec::new();
        let broker = ScriptedBroker {
            refuse: true,
            ..Default::default()
        };

        let code = publish_and_report(&test_config(), &CommandTable::builtin(), broker, &mut out)
            .await
            .unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(code, ExitCode::FAILURE);
        assert!(text.contains("Connecting to broker.test:1883..."));
        assert!(text.contains("✗ Connection failed: Broker refused connection: BadUserNamePassword"));
        assert!(!text.contains("✓ Published"));
        assert!(!text.contains("commands published successfully"));
    }

    #[tokio::test]
    async fn test_missing_ack_still_exits_with_success() {
        let mut out = Vec::new();
        let broker = ScriptedBroker {
            unacked: Some("tv_mute"),
            ..Default::default()
        };

        let code = publish_and_report(&test_config(), &CommandTable::builtin(), broker, &mut out)
            .await
            .unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(code, ExitCode::SUCCESS);
        assert!(text.contains("✓ Connected to MQTT broker"));
        assert_eq!(text.matches("✓ Published: ").count(), 8);
        assert!(text.contains("✗ Not acknowledged: tv_mute"));
        assert!(text.contains("7/8 commands published successfully"));
        assert!(text.contains("Migration complete!"));
    }
}
