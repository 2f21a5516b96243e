use env_logger::{Builder, Env};
use log::info;
use structopt::StructOpt;

use signet::config::{Opt, RunConfig};
use signet::context::EventContext;
use signet::error::ActionError;
use signet::git::GitCli;
use signet::github::GithubClient;
use signet::report;
use signet::run::{RunOutcome, SignedCommitRun};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    Builder::from_env(Env::default().default_filter_or("info")).init();

    let opt = Opt::from_args();
    match execute(opt).await {
        Ok(outcome) => {
            if let Some(commit) = &outcome.commit {
                report::set_output("commit-sha", &commit.oid)?;
            }
            if let Some(tag) = &outcome.tag {
                report::set_output("tag", tag)?;
            }
            info!("Run finished successfully! 🎉");
            Ok(())
        }
        Err(e) if e.is_soft() => {
            report::notice(&e.to_string());
            Ok(())
        }
        Err(e) if e.is_reportable() => {
            report::set_failed(&e.to_string());
            std::process::exit(1);
        }
        // Anything else is a programming error; let it surface raw.
        Err(e) => Err(e.into()),
    }
}

async fn execute(opt: Opt) -> Result<RunOutcome, ActionError> {
    let config = RunConfig::gather(opt)?;
    let context = EventContext::from_env()?;
    let github = GithubClient::new(config.graphql_url.clone(), config.token.clone())?;
    let git = GitCli::new(config.workspace.clone());

    SignedCommitRun::new(&config, context, &github, &git)
        .run()
        .await
}
