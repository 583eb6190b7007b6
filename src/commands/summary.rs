use crate::AppResult;
use crate::client::VelaClient;
use crate::config::PluginConfig;
use crate::model::{Build, Log, Service, Step};
use crate::summary::{Summary, SummaryInput};
use std::io::Write;
use tracing::{debug, info};

/// Everything the API returned for one build.
#[derive(Debug, Clone, Default)]
pub struct BuildResources {
    pub build: Build,
    pub services: Vec<Service>,
    pub steps: Vec<Step>,
    pub logs: Vec<Log>,
}

impl BuildResources {
    pub fn input(&self) -> SummaryInput<'_> {
        SummaryInput {
            build: &self.build,
            logs: &self.logs,
            services: &self.services,
            steps: &self.steps,
        }
    }
}

pub struct Plugin {
    config: PluginConfig,
}

impl Plugin {
    pub fn new(config: PluginConfig) -> Self {
        Plugin { config }
    }

    pub fn validate(&self) -> AppResult<()> {
        self.config.validate()
    }

    /// Captures the build, its services, steps and logs, in that order.
    /// The first failing request aborts the run.
    pub fn fetch(&self) -> AppResult<BuildResources> {
        let PluginConfig {
            build, client, repo, ..
        } = &self.config;
        let (org, name, number) = (repo.org.as_str(), repo.name.as_str(), build.number);

        info!("creating client for {}", client.server);
        let api = VelaClient::new(client)?;

        info!("capturing build {org}/{name}/{number}");
        let build = api.get_build(org, name, number)?;

        info!("capturing services for build {org}/{name}/{number}");
        let services = api.get_services(org, name, number)?;

        info!("capturing steps for build {org}/{name}/{number}");
        let steps = api.get_steps(org, name, number)?;

        info!("capturing logs for build {org}/{name}/{number}");
        let logs = api.get_logs(org, name, number)?;

        Ok(BuildResources {
            build,
            services,
            steps,
            logs,
        })
    }

    /// Validates, fetches and writes the summary table to `out`. `now` is
    /// the unix time used for anything still running.
    pub fn exec<W: Write>(&self, out: &mut W, now: i64) -> AppResult<()> {
        debug!("running plugin with provided configuration");
        self.validate()?;

        let resources = self.fetch()?;
        let table = Summary::compute(resources.input(), now).render(self.config.max_col_width);
        writeln!(out, "{table}")?;
        Ok(())
    }
}

pub fn run_summary(config: PluginConfig) -> AppResult<()> {
    info!(
        code = "https://github.com/go-vela/vela-build-summary",
        docs = "https://go-vela.github.io/docs/plugins/registry/build-summary",
        registry = "https://hub.docker.com/r/target/vela-build-summary",
        "Vela Build Summary Plugin"
    );

    let plugin = Plugin::new(config);
    let stdout = std::io::stdout();
    plugin.exec(&mut stdout.lock(), chrono::Utc::now().timestamp())
}
