use std::future::Future;
use std::io;

use axum::Router;
use counter_logging::counter_info;
use tokio::net::TcpListener;

use crate::ServiceSettings;

pub async fn bind(settings: &ServiceSettings) -> io::Result<TcpListener> {
    let listener = TcpListener::bind(settings.bind_addr).await?;
    counter_info!("Listening on {}", listener.local_addr()?);
    Ok(listener)
}

/// Serves `router` until `shutdown` resolves, then drains in-flight requests.
pub async fn serve<F>(listener: TcpListener, router: Router, shutdown: F) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await?;
    counter_info!("Server stopped");
    Ok(())
}
