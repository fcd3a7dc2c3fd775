use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use hubmirror_fetch::{ReqwestClient, is_reachable};
use hubmirror_mirror::{HttpProbe, MirrorResolver, MirrorSet, RaceCoordinator, get_mirrors};
use tracing::warn;

use crate::cli::app::{Commands, DownloadArg, ResolveArg, UrlArg};
use crate::config::Config;
use crate::download::download_to;

pub async fn run(cmd: Commands, config: &Config) -> Result<ExitCode> {
    match cmd {
        Commands::Mirrors(arg) => Ok(mirrors(&arg)),
        Commands::Resolve(arg) => resolve(arg, config).await,
        Commands::Race(arg) => race(&arg, config).await,
        Commands::Check(arg) => check(&arg, config).await,
        Commands::Download(arg) => download(arg, config).await,
    }
}

fn resolver(config: &Config) -> Result<MirrorResolver<HttpProbe<ReqwestClient>>> {
    let resolver = MirrorResolver::from_setting(&config.client_setting(), config.probe_options())
        .context("failed to set up mirror resolver")?;
    if let Some(test_url) = &config.test_url {
        resolver.set_test_url(test_url.clone());
    }
    Ok(resolver)
}

fn client(config: &Config) -> Result<ReqwestClient> {
    ReqwestClient::new(&config.client_setting()).context("failed to build HTTP client")
}

fn mirrors(arg: &UrlArg) -> ExitCode {
    for mirror in get_mirrors(&arg.url) {
        println!("{mirror}");
    }
    ExitCode::SUCCESS
}

async fn resolve(arg: ResolveArg, config: &Config) -> Result<ExitCode> {
    let resolver = resolver(config)?;
    if let Some(test_url) = arg.test_url {
        resolver.set_test_url(test_url);
    }

    match resolver.get_fastest_mirror(&arg.url).await {
        Some(mirror) => println!("{mirror}"),
        None => {
            warn!(url = %arg.url, "no mirror reachable, using the original URL");
            println!("{}", arg.url);
        }
    }
    Ok(ExitCode::SUCCESS)
}

async fn race(arg: &UrlArg, config: &Config) -> Result<ExitCode> {
    let probe = HttpProbe::new(client(config)?, config.probe_options());
    let coordinator = RaceCoordinator::new(Arc::new(probe));
    let mirrors = get_mirrors(&arg.url);

    let result = coordinator.race(MirrorSet::candidates(&arg.url)).await;

    for outcome in &result.outcomes {
        let status = if outcome.succeeded { "ok" } else { "failed" };
        println!("#{} {status:<6} {}", outcome.index, mirrors[outcome.index]);
    }

    match result.winner {
        Some(index) => {
            println!("winner: #{index} {}", mirrors[index]);
            Ok(ExitCode::SUCCESS)
        }
        None => {
            println!("winner: none");
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn check(arg: &UrlArg, config: &Config) -> Result<ExitCode> {
    let client = client(config)?;
    if is_reachable(&client, &arg.url).await {
        println!("reachable: {}", arg.url);
        Ok(ExitCode::SUCCESS)
    } else {
        println!("unreachable: {}", arg.url);
        Ok(ExitCode::FAILURE)
    }
}

async fn download(arg: DownloadArg, config: &Config) -> Result<ExitCode> {
    let resolver = resolver(config)?;
    let source = match resolver.get_fastest_mirror(&arg.url).await {
        Some(mirror) => mirror,
        None => {
            warn!(url = %arg.url, "no mirror reachable, downloading from the original URL");
            arg.url.clone()
        }
    };

    let client = resolver.coordinator().prober().client();
    let downloaded = download_to(client, &source, arg.output.as_deref()).await?;

    println!(
        "{} ({} bytes) <- {source}",
        downloaded.path.display(),
        downloaded.bytes
    );
    Ok(ExitCode::SUCCESS)
}
