use clap::Parser;

/// Command-line surface of the relay.
///
/// Two values are required: the local listen port and the backend address the
/// relay forwards every accepted connection to. The public address override is
/// optional; when absent, startup resolves it through the self-address lookup
/// (see [`crate::resolver`]).
#[derive(Parser, Debug, Clone)]
#[command(name = "rideau")]
#[command(version)]
#[command(about = "A transparent capturing TCP relay")]
pub struct Args {
    /// Local TCP port to listen on for incoming peers
    ///
    /// # Command Line
    /// Use `--port <PORT>` to set this value from the CLI
    #[arg(long)]
    pub port: u16,

    /// Backend address to forward accepted connections to, as `host:port`
    ///
    /// # Command Line
    /// Use `--addr <HOST:PORT>` to set this value from the CLI
    #[arg(long)]
    pub addr: String,

    /// Externally visible IP address of this relay
    ///
    /// When set, the startup HTTP lookup is skipped. Useful behind NAT or in
    /// cloud environments where the lookup would return the wrong address.
    ///
    /// # Command Line
    /// Use `--public-ip <IP>` to set this value from the CLI
    #[arg(long)]
    pub public_ip: Option<String>,
}

impl Args {
    /// Parses the command line, exiting with a usage error when required
    /// values are missing or malformed.
    pub fn from_args() -> Self {
        Args::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_required_args() {
        let args =
            Args::try_parse_from(["rideau", "--port", "8022", "--addr", "10.0.0.5:9000"]).unwrap();

        assert_eq!(args.port, 8022);
        assert_eq!(args.addr, "10.0.0.5:9000");
        assert!(args.public_ip.is_none());
    }

    #[test]
    fn test_parse_public_ip_override() {
        let args = Args::try_parse_from([
            "rideau",
            "--port",
            "8022",
            "--addr",
            "10.0.0.5:9000",
            "--public-ip",
            "203.0.113.7",
        ])
        .unwrap();

        assert_eq!(args.public_ip.as_deref(), Some("203.0.113.7"));
    }

    #[test]
    fn test_parse_rejects_missing_addr() {
        let result = Args::try_parse_from(["rideau", "--port", "8022"]);

        assert!(result.is_err());
    }

    #[test]
    fn test_parse_rejects_bad_port() {
        let result = Args::try_parse_from(["rideau", "--port", "99999", "--addr", "a:1"]);

        assert!(result.is_err());
    }
}
