use solana_client::client_error::{ClientError, ClientErrorKind};
use solana_client::rpc_request::RpcError;
use thiserror::Error;

/// Failure of a single holder count fetch attempt
///
/// Both variants are handled the same way by the poller: bounded retry, then a
/// silent give-up until the next cycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HolderFetchError {
    /// Transport-level errors (network, connection, RPC server)
    #[error("Transport error: {message} (endpoint: {endpoint})")]
    Transport { endpoint: String, message: String },

    /// Malformed or undecodable response
    #[error("Parse error: {message} (endpoint: {endpoint})")]
    Parse { endpoint: String, message: String },
}

impl HolderFetchError {
    pub fn transport(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        HolderFetchError::Transport {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    pub fn parse(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        HolderFetchError::Parse {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Short label for logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            HolderFetchError::Transport { .. } => "transport",
            HolderFetchError::Parse { .. } => "parse",
        }
    }

    /// Create from ClientError with context
    ///
    /// A body that is not JSON fails inside reqwest's decoder, so decode errors
    /// count as parse failures alongside serde and RPC result mismatches.
    pub fn from_client_error(err: ClientError, endpoint: &str) -> Self {
        let message = err.to_string();
        match err.kind() {
            ClientErrorKind::SerdeJson(_) => Self::parse(endpoint, message),
            ClientErrorKind::RpcError(RpcError::ParseError(_)) => Self::parse(endpoint, message),
            ClientErrorKind::Reqwest(e) if e.is_decode() => Self::parse(endpoint, message),
            _ => Self::transport(endpoint, message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_names_endpoint() {
        let err = HolderFetchError::transport("https://rpc.test", "reset");
        assert_eq!(err.kind(), "transport");
        assert!(err.to_string().contains("https://rpc.test"));
    }

    #[test]
    fn test_serde_errors_classified_as_parse() {
        let json_err = serde_json::from_str::<u64>("not json").unwrap_err();
        let client_err = ClientError::from(ClientErrorKind::SerdeJson(json_err));

        let err = HolderFetchError::from_client_error(client_err, "https://rpc.test");
        assert!(matches!(err, HolderFetchError::Parse { .. }));
        assert!(err.to_string().contains("https://rpc.test"));
    }

    #[test]
    fn test_rpc_parse_error_classified_as_parse() {
        let client_err = ClientError::from(ClientErrorKind::RpcError(RpcError::ParseError(
            "Vec<RpcKeyedAccount>".to_string(),
        )));

        let err = HolderFetchError::from_client_error(client_err, "rpc");
        assert_eq!(err.kind(), "parse");
    }

    #[test]
    fn test_other_errors_classified_as_transport() {
        let client_err = ClientError::from(ClientErrorKind::Custom(
            "error sending request".to_string(),
        ));

        let err = HolderFetchError::from_client_error(client_err, "rpc");
        assert!(matches!(err, HolderFetchError::Transport { .. }));
        assert!(err.to_string().contains("error sending request"));
    }
}
