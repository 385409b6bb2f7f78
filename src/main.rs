use std::{error::Error as StdError, future::IntoFuture, process, sync::Arc, time::Duration};

use blogsite::{
    application::{
        blog::BlogController,
        chrome::{ChromeService, SiteProfile},
        error::AppError,
    },
    config,
    infra::{
        content::{self, ContentSummary},
        error::InfraError,
        http::{self, HttpState},
        memory::InMemoryPostsRepo,
        telemetry,
    },
    presentation::views::ViewResolver,
};
use time::OffsetDateTime;
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    let causes = error_causes(error);
    if dispatcher::has_been_set() {
        error!(error = %error, causes = %causes, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, causes = %causes, "application error");
    });
}

fn error_causes(error: &AppError) -> String {
    let mut causes = Vec::new();
    let mut current = StdError::source(error);
    while let Some(inner) = current {
        causes.push(inner.to_string());
        current = inner.source();
    }
    causes.join(": ")
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::CheckContent(_) => run_check_content(settings).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let posts = content::load_posts(&settings.content.file)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;
    let repo = InMemoryPostsRepo::new(posts);
    if repo.is_empty() {
        warn!(
            target = "blogsite::content",
            path = %settings.content.file.display(),
            "content file has no posts"
        );
    }

    let state = build_http_state(&settings, repo);
    serve_http(&settings, state).await
}

async fn run_check_content(settings: config::Settings) -> Result<(), AppError> {
    let posts = content::load_posts(&settings.content.file)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;
    let summary = ContentSummary::at(&posts, OffsetDateTime::now_utc());

    info!(
        target = "blogsite::content",
        path = %settings.content.file.display(),
        total = posts.len(),
        published = summary.published,
        scheduled = summary.scheduled,
        drafts = summary.drafts,
        broadcasts = summary.broadcasts,
        "content check passed"
    );
    Ok(())
}

fn build_http_state(settings: &config::Settings, repo: InMemoryPostsRepo) -> HttpState {
    let profile = Arc::new(SiteProfile {
        title: settings.site.title.clone(),
        description: settings.site.description.clone(),
        public_url: settings.site.public_url.clone(),
        footer_copy: settings.site.footer_copy.clone(),
    });

    HttpState {
        blog: Arc::new(BlogController::new(Arc::new(repo))),
        chrome: Arc::new(ChromeService::new(Arc::clone(&profile))),
        views: Arc::new(ViewResolver::new(profile)),
    }
}

async fn serve_http(settings: &config::Settings, state: HttpState) -> Result<(), AppError> {
    let router = http::build_router(state);

    let addr = settings.server.addr;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| AppError::from(InfraError::Bind { addr, source }))?;
    info!(addr = %addr, "listening");

    let server = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .into_future();
    let grace = settings.server.graceful_shutdown;

    tokio::select! {
        result = server => {
            result.map_err(|err| AppError::unexpected(format!("server error: {err}")))?;
        }
        _ = shutdown_deadline(grace) => {
            warn!(
                grace_seconds = grace.as_secs(),
                "graceful shutdown timed out; dropping open connections"
            );
        }
    }

    info!("server stopped");
    Ok(())
}

async fn shutdown_deadline(grace: Duration) {
    shutdown_signal().await;
    tokio::time::sleep(grace).await;
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
