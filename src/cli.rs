use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use log::{debug, info, warn};
use std::path::PathBuf;
use tokio::sync::broadcast::error::RecvError;

use crate::client::{status_url, ApiClient, SubmissionRequest};
use crate::config::Config;
use crate::error::AutoPrError;
use crate::output::{self, StageProgressView};
use crate::report::TrackingReport;
use crate::tracker::{JobId, Outcome, StageRegistry, StatusPoller, TrackerEvent, POLL_INTERVAL};

#[derive(Parser)]
#[command(name = "autopr")]
#[command(author, version, about = "AI-powered pull request automation", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Job submission endpoint; the status endpoint is derived from it
    #[arg(short, long, global = true, env = "AUTOPR_API_ENDPOINT")]
    endpoint: Option<String>,

    /// Configuration file (defaults to ./autopr.toml and friends)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Write the final tracking report as JSON to this file
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    #[arg(short, long, global = true, default_value_t = false)]
    pretty: bool,

    /// Restart tracking this many times after a failed status query
    #[arg(long, global = true, default_value_t = 0)]
    retries: u32,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a modification request and track it until the pull request is open
    Submit {
        /// Repository URL to fork
        #[arg(short, long)]
        repository: String,

        /// Description of the change to make
        #[arg(short = 'm', long)]
        prompt: String,

        /// GitHub username to credit
        #[arg(short, long)]
        username: Option<String>,

        /// Print the request id and exit without tracking
        #[arg(long, default_value_t = false)]
        no_track: bool,
    },
    /// Track a previously submitted request
    Track {
        request_id: String,

        /// Repository URL for status and failure messages; pass it so failures
        /// before the first status update can be correlated
        #[arg(short, long)]
        repository: Option<String>,
    },
}

impl Cli {
    async fn execute_submit(
        &self,
        client: ApiClient,
        request: SubmissionRequest,
        no_track: bool,
        pretty: bool,
    ) -> Result<()> {
        let receipt = match client.submit(&request).await {
            Ok(receipt) => receipt,
            Err(AutoPrError::RateLimited(notice)) => {
                output::print_rate_limit(&notice, &request.repository_url);
                bail!(
                    "Submission rate limited; try again {}",
                    notice.reset_time_relative.as_deref().unwrap_or("later")
                );
            }
            Err(e) => return Err(e).context("Failed to submit request"),
        };

        let repository = receipt
            .repository
            .clone()
            .unwrap_or_else(|| request.repository_url.clone());

        if let Some(message) = &receipt.message {
            info!("{message}");
        }

        if no_track {
            println!("{}", receipt.request_id);
            return Ok(());
        }

        self.execute_track(client, receipt.request_id, &repository, pretty)
            .await
    }

    async fn execute_track(
        &self,
        client: ApiClient,
        job_id: JobId,
        repository: &str,
        pretty: bool,
    ) -> Result<()> {
        debug!(
            "Polling status at {}",
            status_url(client.endpoint(), &job_id)?
        );

        let mut poller = StatusPoller::new(client, StageRegistry::default());
        let mut events = poller.subscribe();
        let mut view = StageProgressView::start(job_id.as_str());

        poller.start(job_id.clone());

        let mut retries_left = self.retries;
        let completion = loop {
            tokio::select! {
                event = events.recv() => match event {
                    Ok(TrackerEvent::Progress { snapshot, stages }) => {
                        view.update(poller.registry(), &snapshot, &stages);
                    }
                    Ok(TrackerEvent::Finished(completion)) => {
                        if let Outcome::TransportError(message) = &completion.outcome {
                            if retries_left > 0 {
                                retries_left -= 1;
                                warn!("{message}; restarting tracking ({retries_left} retries left)");
                                tokio::select! {
                                    () = tokio::time::sleep(POLL_INTERVAL) => {
                                        poller.restart(job_id.clone());
                                        continue;
                                    }
                                    _ = tokio::signal::ctrl_c() => {
                                        return Err(cancel_tracking(&mut poller, view, &job_id));
                                    }
                                }
                            }
                        }
                        break completion;
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("Missed {skipped} status updates");
                    }
                    Err(RecvError::Closed) => bail!("Status updates stopped unexpectedly"),
                },
                _ = tokio::signal::ctrl_c() => {
                    return Err(cancel_tracking(&mut poller, view, &job_id));
                }
            }
        };

        debug!("Poller finished in state {:?}", poller.state());

        if completion.outcome.is_success() {
            view.finish_success(poller.registry());
        } else {
            view.abandon();
        }

        let report = TrackingReport::new(&completion, poller.registry(), repository);
        output::print_summary(&report);

        if let Some(output_path) = &self.output {
            let json_output = if pretty {
                serde_json::to_string_pretty(&report)?
            } else {
                serde_json::to_string(&report)?
            };
            std::fs::write(output_path, json_output).with_context(|| {
                format!("Failed to write report to {}", output_path.display())
            })?;
            info!("Report written to: {}", output_path.display());
        }

        match &report.outcome {
            Outcome::Success(_) | Outcome::InProgress => Ok(()),
            Outcome::Rejected(_) => bail!(
                "Request {} for {} was rejected",
                report.request_id,
                report.repository
            ),
            Outcome::Error(_) => bail!(
                "Request {} for {} failed",
                report.request_id,
                report.repository
            ),
            Outcome::TransportError(message) => bail!(
                "Lost track of request {} for {}: {message}",
                report.request_id,
                report.repository
            ),
        }
    }

    pub async fn execute(&self) -> Result<()> {
        let config = Config::load(self.config.as_deref())?;
        let pretty = self.pretty || config.output.pretty;

        match &self.command {
            Commands::Submit {
                repository,
                prompt,
                username,
                no_track,
            } => {
                let request = SubmissionRequest::new(repository, prompt, username.as_deref())?;
                let client = self.client(&config)?;
                self.execute_submit(client, request, *no_track, pretty)
                    .await
            }
            Commands::Track {
                request_id,
                repository,
            } => {
                let client = self.client(&config)?;
                let repository = repository.as_deref().unwrap_or("unknown repository");
                self.execute_track(client, JobId::from(request_id.as_str()), repository, pretty)
                    .await
            }
        }
    }

    fn client(&self, config: &Config) -> Result<ApiClient> {
        let endpoint = config.api.resolve_endpoint(self.endpoint.as_deref())?;
        info!("Using API endpoint: {endpoint}");
        Ok(ApiClient::new(&endpoint, config.api.timeout())?)
    }
}

/// Stops polling after an interrupt and builds the error telling the user how to resume.
fn cancel_tracking(
    poller: &mut StatusPoller<ApiClient>,
    view: StageProgressView,
    job_id: &JobId,
) -> anyhow::Error {
    poller.stop();
    if let Some(snapshot) = poller.current() {
        info!("Last reported status: {}", snapshot.raw_status);
    }
    view.abandon();
    anyhow!("Tracking cancelled; resume with `autopr track {job_id}`")
}
