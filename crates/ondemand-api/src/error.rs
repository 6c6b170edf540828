//! `OnDemandError` - failure taxonomy for index retrieval and flattening.

use url::Url;

/// Classification of a failure, used by the CLI to pick a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The `-d` value is not `SITEID_CORNERID`.
    MalformedFilter,
    /// Transport failure, non-200 status, or an undecodable response body.
    Remote,
    /// Anything else (missing upstream fields, I/O on output, config).
    Unexpected,
}

/// Structured error carrying a kind tag and the original cause.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub enum OnDemandError {
    /// The filter string does not split into exactly two non-empty tokens.
    MalformedFilter {
        /// Value as given on the command line.
        value: String,
    },
    /// A fetch against `url` failed.
    Remote {
        /// Requested URL.
        url: Url,
        /// Underlying transport, status or decode failure.
        cause: anyhow::Error,
    },
    /// Upstream data or the local environment is not usable.
    Unexpected {
        /// Human-readable description.
        message: String,
    },
}

impl OnDemandError {
    /// Builds a `Remote` error for `url`.
    pub fn remote(url: &Url, cause: impl Into<anyhow::Error>) -> Self {
        Self::Remote {
            url: url.clone(),
            cause: cause.into(),
        }
    }

    /// Builds an `Unexpected` error.
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected {
            message: message.into(),
        }
    }

    /// Returns the kind tag.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedFilter { .. } => ErrorKind::MalformedFilter,
            Self::Remote { .. } => ErrorKind::Remote,
            Self::Unexpected { .. } => ErrorKind::Unexpected,
        }
    }

    /// Finds the first `OnDemandError` in an `anyhow` chain.
    #[must_use]
    pub fn find(err: &anyhow::Error) -> Option<&Self> {
        err.chain().find_map(|e| e.downcast_ref::<Self>())
    }

    /// Classifies an `anyhow` error; untagged failures are `Unexpected`.
    #[must_use]
    pub fn classify(err: &anyhow::Error) -> ErrorKind {
        Self::find(err).map_or(ErrorKind::Unexpected, Self::kind)
    }
}

impl std::fmt::Display for OnDemandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedFilter { value } => {
                write!(f, "invalid option -d '{value}' (expected SITEID_CORNERID)")
            }
            Self::Remote { url, .. } => write!(f, "request to {url} failed"),
            Self::Unexpected { message } => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for OnDemandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Remote { cause, .. } => {
                let source: &(dyn std::error::Error + 'static) = cause.as_ref();
                Some(source)
            }
            Self::MalformedFilter { .. } | Self::Unexpected { .. } => None,
        }
    }
}
