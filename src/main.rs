//! Process entry point and dispatcher (component C7): CLI argument parsing,
//! config file loading, socket setup, and the per-packet receive loop. The
//! core pipeline in `nibblet::pipeline` knows nothing about any of this.

use std::fs;
use std::net::{IpAddr, SocketAddr, UdpSocket};
use std::process;
use std::sync::Arc;
use std::thread;

use clap::{App, Arg};
use log::{debug, error, info};
use socket2::{Domain, Socket, Type};

use nibblet::config::{self, FileConfig};
use nibblet::dns::DnsPacket;
use nibblet::error::ServerError;
use nibblet::pipeline;
use nibblet::registry::Registry;
use nibblet::upstream::UdpUpstreamResolver;

type Result<T> = std::result::Result<T, ServerError>;

struct CliOptions {
    configfile: String,
    extra_listen: Vec<IpAddr>,
    port: u16,
    querylog: bool,
}

impl CliOptions {
    fn parse() -> CliOptions {
        let matches = App::new("nibblet")
            .version("0.1")
            .about("Synthesizes IPv6 PTR/AAAA answers from a template")
            .arg(
                Arg::new("configfile")
                    .long("configfile")
                    .takes_value(true)
                    .required(true)
                    .help("Path to the configuration file"),
            )
            .arg(
                Arg::new("listen")
                    .long("listen")
                    .takes_value(true)
                    .multiple_occurrences(true)
                    .help("Additional bind address; repeatable, augments the config file"),
            )
            .arg(
                Arg::new("port")
                    .long("port")
                    .takes_value(true)
                    .default_value("53")
                    .help("UDP port to listen on"),
            )
            .arg(
                Arg::new("querylog")
                    .long("querylog")
                    .takes_value(false)
                    .help("Log one line per query to stdout"),
            )
            .get_matches();

        let extra_listen = matches
            .values_of("listen")
            .map(|values| {
                values
                    .map(|v| {
                        v.parse().unwrap_or_else(|_| {
                            eprintln!("invalid --listen address: {}", v);
                            process::exit(2);
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        let port: u16 = matches.value_of("port").unwrap().parse().unwrap_or_else(|_| {
            eprintln!("invalid --port value");
            process::exit(2);
        });

        CliOptions {
            configfile: matches.value_of("configfile").unwrap().to_string(),
            extra_listen,
            port,
            querylog: matches.is_present("querylog"),
        }
    }
}

fn load_config(path: &str) -> Result<FileConfig> {
    let text = fs::read_to_string(path).map_err(|source| ServerError::ConfigRead {
        path: path.to_string(),
        source,
    })?;
    config::parse(&text).map_err(ServerError::from)
}

fn bind_listener(addr: IpAddr, port: u16) -> Result<UdpSocket> {
    let sock_addr = SocketAddr::new(addr, port);
    let domain = if addr.is_ipv6() { Domain::IPV6 } else { Domain::IPV4 };
    let socket = Socket::new(domain, Type::DGRAM, None).map_err(|source| ServerError::Bind {
        addr: sock_addr,
        source,
    })?;
    socket.set_reuse_port(true).map_err(|source| ServerError::Bind {
        addr: sock_addr,
        source,
    })?;
    socket.bind(&sock_addr.into()).map_err(|source| ServerError::Bind {
        addr: sock_addr,
        source,
    })?;
    Ok(socket.into())
}

fn serve(listener: UdpSocket, registry: Arc<Registry>, querylog: bool) {
    let local_addr = listener.local_addr().ok();
    let resolver = UdpUpstreamResolver;
    let mut buf = [0u8; 512];
    loop {
        let (amt, src) = match listener.recv_from(&mut buf) {
            Ok(result) => result,
            Err(e) => {
                error!("error receiving on {:?}: {}", local_addr, e);
                continue;
            }
        };

        let response = match DnsPacket::from_bytes(&buf[..amt]) {
            Ok(query) => {
                let response = pipeline::handle_query(&query, &registry, &resolver);
                if querylog {
                    let qname = query.questions[0].qname.join(".");
                    info!(
                        "{} {:?} {:?} -> {:?}",
                        src, query.questions[0].qtype, qname, response.flags.rcode
                    );
                }
                response
            }
            Err(format_error) => {
                if querylog {
                    info!("{} <malformed request> -> FormErr", src);
                }
                format_error.to_response_packet()
            }
        };

        if let Err(e) = listener.send_to(&response.to_bytes(), src) {
            error!("error sending response to {}: {}", src, e);
        }
    }
}

fn run() -> Result<()> {
    let options = CliOptions::parse();
    debug!("configfile: {}", options.configfile);

    let file_config = load_config(&options.configfile)?;
    let mut listen_addrs = file_config.listen;
    listen_addrs.extend(options.extra_listen);
    if listen_addrs.is_empty() {
        return Err(ServerError::NoListenAddresses);
    }

    let registry = Arc::new(file_config.registry);

    let sockets: Result<Vec<UdpSocket>> = listen_addrs
        .iter()
        .map(|addr| bind_listener(*addr, options.port))
        .collect();
    let sockets = sockets?;

    info!("nibblet listening on {} address(es), port {}", sockets.len(), options.port);

    let mut handles = Vec::new();
    for socket in sockets {
        let registry = Arc::clone(&registry);
        let querylog = options.querylog;
        handles.push(thread::spawn(move || serve(socket, registry, querylog)));
    }
    for handle in handles {
        let _ = handle.join();
    }

    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        error!("{}", e);
        process::exit(1);
    }
}
