//! The configuration file loader (component C6, added for a complete
//! dispatcher): a line-based grammar for `listen`/`network` directives,
//! grounded on the same line-by-line, whitespace-split approach a
//! `resolv.conf` parser uses, generalized for this format's indented
//! network blocks.

use std::net::{IpAddr, SocketAddr};

use thiserror::Error;

use crate::registry::{NetworkRecord, Prefix, PrefixError, Registry};
use crate::template::{CompiledTemplate, TemplateError};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("line {line}: {message}")]
    InvalidLine { line: usize, message: String },
    #[error("line {line}: invalid prefix: {source}")]
    InvalidPrefix { line: usize, source: PrefixError },
    #[error("line {line}: invalid template: {source}")]
    InvalidTemplate { line: usize, source: TemplateError },
    #[error("network block starting at line {line} has no `resolves to` directive")]
    MissingTemplate { line: usize },
    #[error("line {line}: `resolves to` may only appear once per network block (first given at line {first_line})")]
    DuplicateTemplate { line: usize, first_line: usize },
    #[error("line {line}: `network` directive outside of any indentation context expected a CIDR, got {value:?}")]
    MalformedCidr { line: usize, value: String },
}

/// Configuration as read from the config file, before CLI flags are layered
/// on top (spec §6: `--listen` augments, `--port`/`--querylog` are CLI-only).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileConfig {
    pub listen: Vec<IpAddr>,
    pub registry: Registry,
}

struct PendingNetwork {
    start_line: usize,
    prefix: Prefix,
    upstream: Option<SocketAddr>,
    template: Option<String>,
    template_line: Option<usize>,
}

/// Parse a complete config file. `#` introduces a line comment; blank lines
/// are ignored; a `network` block continues as long as subsequent lines are
/// indented, ending at the first non-indented line or EOF.
pub fn parse(text: &str) -> Result<FileConfig, ConfigError> {
    let mut listen = Vec::new();
    let mut networks = Vec::new();
    let mut pending: Option<PendingNetwork> = None;

    for (idx, raw_line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let stripped = strip_comment(raw_line);
        if stripped.trim().is_empty() {
            continue;
        }

        let is_indented = stripped.starts_with(' ') || stripped.starts_with('\t');
        if !is_indented {
            if let Some(finished) = pending.take() {
                networks.push(finish_network(finished)?);
            }
        }

        let words: Vec<&str> = stripped.split_whitespace().collect();

        if is_indented {
            let Some(block) = pending.as_mut() else {
                return Err(ConfigError::InvalidLine {
                    line: line_no,
                    message: "indented line outside of a network block".to_string(),
                });
            };
            parse_network_directive(&words, line_no, block)?;
            continue;
        }

        match words.as_slice() {
            ["listen", addr] => {
                let parsed: IpAddr = addr.parse().map_err(|_| ConfigError::InvalidLine {
                    line: line_no,
                    message: format!("not a valid IP address: {:?}", addr),
                })?;
                listen.push(parsed);
            }
            ["network", cidr] => {
                pending = Some(parse_network_header(cidr, line_no)?);
            }
            _ => {
                return Err(ConfigError::InvalidLine {
                    line: line_no,
                    message: format!("unrecognized directive: {:?}", stripped.trim()),
                });
            }
        }
    }

    if let Some(finished) = pending.take() {
        networks.push(finish_network(finished)?);
    }

    Ok(FileConfig {
        listen,
        registry: Registry::new(networks),
    })
}

fn parse_network_header(cidr: &str, line_no: usize) -> Result<PendingNetwork, ConfigError> {
    let mut parts = cidr.splitn(2, '/');
    let addr_part = parts.next().unwrap_or("");
    let len_part = parts.next().ok_or_else(|| ConfigError::MalformedCidr {
        line: line_no,
        value: cidr.to_string(),
    })?;

    let addr: std::net::Ipv6Addr = addr_part.parse().map_err(|_| ConfigError::MalformedCidr {
        line: line_no,
        value: cidr.to_string(),
    })?;
    let len: u8 = len_part.parse().map_err(|_| ConfigError::MalformedCidr {
        line: line_no,
        value: cidr.to_string(),
    })?;
    let prefix = Prefix::new(addr, len).map_err(|source| ConfigError::InvalidPrefix {
        line: line_no,
        source,
    })?;

    Ok(PendingNetwork {
        start_line: line_no,
        prefix,
        upstream: None,
        template: None,
        template_line: None,
    })
}

fn parse_network_directive(
    words: &[&str],
    line_no: usize,
    block: &mut PendingNetwork,
) -> Result<(), ConfigError> {
    match words {
        ["resolves", "to", template] => {
            if let Some(first_line) = block.template_line {
                return Err(ConfigError::DuplicateTemplate {
                    line: line_no,
                    first_line,
                });
            }
            block.template = Some((*template).to_string());
            block.template_line = Some(line_no);
        }
        ["with", "upstream", addr] => {
            let endpoint = parse_upstream_endpoint(addr, line_no)?;
            block.upstream = Some(endpoint);
        }
        _ => {
            return Err(ConfigError::InvalidLine {
                line: line_no,
                message: format!("unrecognized network directive: {:?}", words.join(" ")),
            });
        }
    }
    Ok(())
}

/// Open question in spec §9: an upstream without an explicit port defaults
/// to UDP/53; `addr:port` introduces an explicit port.
fn parse_upstream_endpoint(addr: &str, line_no: usize) -> Result<SocketAddr, ConfigError> {
    if let Ok(endpoint) = addr.parse::<SocketAddr>() {
        return Ok(endpoint);
    }
    if let Ok(ip) = addr.parse::<IpAddr>() {
        return Ok(SocketAddr::new(ip, 53));
    }
    Err(ConfigError::InvalidLine {
        line: line_no,
        message: format!("not a valid upstream address: {:?}", addr),
    })
}

fn finish_network(block: PendingNetwork) -> Result<NetworkRecord, ConfigError> {
    let template_text = block.template.ok_or(ConfigError::MissingTemplate {
        line: block.start_line,
    })?;
    let template = CompiledTemplate::compile(&template_text, block.prefix.host_digit_count())
        .map_err(|source| ConfigError::InvalidTemplate {
            line: block.start_line,
            source,
        })?;

    Ok(NetworkRecord {
        prefix: block.prefix,
        template,
        upstream: block.upstream,
    })
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(idx) => &line[..idx],
        None => line,
    }
}
