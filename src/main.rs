use std::convert::Infallible;
use std::sync::Arc;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::TcpListener;

use asset_server::{config, handler, http, logger, AssetOptions};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::Config::load()?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    logger::init(
        cfg.logging.access_log_file.as_deref(),
        cfg.logging.error_log_file.as_deref(),
    )?;

    let addr = cfg.get_socket_addr()?;
    let options = Arc::new(cfg.asset_options()?);
    let listener = create_reusable_listener(addr)?;

    logger::log_server_start(&addr, &options.root);

    loop {
        match listener.accept().await {
            Ok((stream, _peer_addr)) => {
                handle_connection(
                    stream,
                    Arc::clone(&options),
                    cfg.logging.access_log,
                    cfg.server.keep_alive,
                );
            }
            Err(e) => {
                logger::log_error(&format!("Failed to accept connection: {e}"));
            }
        }
    }
}

/// Serve a single connection in a spawned task.
fn handle_connection(
    stream: tokio::net::TcpStream,
    options: Arc<AssetOptions>,
    access_log: bool,
    keep_alive: bool,
) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let mut builder = http1::Builder::new();
        builder.keep_alive(keep_alive);

        let conn = builder.serve_connection(
            io,
            service_fn(move |req| {
                let options = Arc::clone(&options);
                async move {
                    if access_log {
                        logger::log_request(req.method(), req.uri(), req.version());
                    }
                    let response =
                        handler::handle(&req, &options, |_| http::build_404_response()).await;
                    if access_log {
                        logger::log_response(response.status().as_u16());
                    }
                    Ok::<_, Infallible>(response)
                }
            }),
        );

        if let Err(err) = conn.await {
            logger::log_connection_error(&err);
        }
    });
}

/// Create a `TcpListener` with `SO_REUSEPORT` and `SO_REUSEADDR` enabled,
/// allowing a replacement process to bind before this one releases the port.
fn create_reusable_listener(addr: std::net::SocketAddr) -> std::io::Result<TcpListener> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    socket.set_reuse_port(true)?;
    socket.set_reuse_address(true)?;
    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;
    socket.listen(128)?;

    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}
